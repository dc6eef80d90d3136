//! Peripheral Direct Memory Access (PDMA) driver for NUC4xx processors.
//!
//! `nuc4xx-pdma` provides
//!
//! - dynamic channel assignment. Describe a transfer with a source and a
//!   destination [`Request`], and the driver picks a free channel, routes
//!   the peripheral's request signal to it, and sets the transfer direction.
//! - one interrupt entry point for the whole controller, which delivers
//!   completion and error events to per-channel [`Handler`]s.
//! - a [`Channel`](channel::Channel) handle for programming and inspecting
//!   transfers.
//!
//! # Getting started
//!
//! Assign a [`Pdma`] driver to a static. Then, use that object to assign
//! channels, and route the PDMA interrupt to [`Pdma::on_interrupt`].
//!
//! ```no_run
//! use nuc4xx_pdma::{channel::Interrupt, Event, Pdma, Request, CHANNEL_COUNT, PDMA_BASE};
//!
//! // Safety: base address and channel count are valid for this target.
//! static PDMA: Pdma<CHANNEL_COUNT> = unsafe { Pdma::new(PDMA_BASE as *const ()) };
//!
//! fn on_uart_tx(event: Event) {
//!     // Wake the UART task...
//! #   let _ = event;
//! }
//! static ON_UART_TX: fn(Event) = on_uart_tx;
//!
//! // #[cortex_m_rt::interrupt]
//! fn PDMA_IRQ() {
//!     PDMA.on_interrupt();
//! }
//!
//! # fn main() -> nuc4xx_pdma::Result<()> {
//! let index = PDMA.assign(Request::MEM, Request::UART0_TX)?;
//! PDMA.set_handler(index, Some(&ON_UART_TX))?;
//!
//! // Safety: we own the channel we just assigned.
//! let mut channel = unsafe { PDMA.channel(index)? };
//! channel.enable_interrupt(Interrupt::Complete);
//! # Ok(()) }
//! ```
//!
//! # Validation
//!
//! By default, every operation that takes a channel index or a request
//! checks its inputs and returns an [`Error`] when they're invalid. Enable
//! the `unchecked` feature to turn those checks into debug assertions.
//!
//! # Concurrency
//!
//! The channel table is shared with the interrupt handler, and it's guarded
//! by a [`critical_section`] mutex. Enable `critical-section-single-core` if
//! nothing else in your firmware provides a critical section implementation.
//!
//! Releasing a channel doesn't stop the hardware. Disable the channel and its
//! interrupts before handing it to someone else.
//!
//! ### License
//!
//! Licensed under either of
//!
//! - [Apache License, Version 2.0](http://www.apache.org/licenses/LICENSE-2.0) ([LICENSE-APACHE](./LICENSE-APACHE))
//! - [MIT License](http://opensource.org/licenses/MIT) ([LICENSE-MIT](./LICENSE-MIT))
//!
//! at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted
//! for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
//! dual licensed as above, without any additional terms or conditions.

#![cfg_attr(not(test), no_std)]

pub mod channel;
mod element;
mod error;
mod interrupt;
mod ral;
mod registry;
mod request;
mod router;

#[cfg(test)]
mod testing;

#[cfg(feature = "critical-section-single-core")]
use cortex_m as _;

pub use element::Element;
pub use error::Error;
pub use interrupt::{Event, Handler};
pub use request::Request;
pub use router::Direction;

use channel::Channel;
use registry::Registry;

/// A PDMA result
pub type Result<T> = core::result::Result<T, Error>;

/// The number of channels implemented by the PDMA controller
pub const CHANNEL_COUNT: usize = ral::pdma::CHANNELS;

/// The PDMA controller's base address
pub const PDMA_BASE: usize = 0x4000_8000;

/// A PDMA driver.
///
/// `Pdma` owns the channel table: which channels are assigned, and which
/// [`Handler`] receives each channel's events. It's configured with a pointer
/// to the PDMA register block.
///
/// `CHANNELS` is the number of channels the driver hands out, starting from
/// channel 0. It can't exceed [`CHANNEL_COUNT`].
pub struct Pdma<const CHANNELS: usize> {
    registers: ral::Static<ral::pdma::RegisterBlock>,
    registry: Registry<CHANNELS>,
}

// Safety: OK to allocate a PDMA driver in a static context. The channel
// table is behind a critical section.
unsafe impl<const CHANNELS: usize> Sync for Pdma<CHANNELS> {}
// Safety: the register pointer is peripheral memory, valid from any context.
unsafe impl<const CHANNELS: usize> Send for Pdma<CHANNELS> {}

impl<const CHANNELS: usize> Pdma<CHANNELS> {
    /// Create the PDMA driver.
    ///
    /// Note that this can evaluate at compile time. All channels start
    /// unassigned, with no handler.
    ///
    /// # Safety
    ///
    /// Caller must make sure that `registers` points to the start of the
    /// PDMA register block (see [`PDMA_BASE`]). Caller must also make sure
    /// that there's only one `Pdma` for the controller.
    ///
    /// # Panics
    ///
    /// Panics if `CHANNELS` exceeds [`CHANNEL_COUNT`]. In a `static`, this is
    /// a compile-time error.
    pub const unsafe fn new(registers: *const ()) -> Self {
        assert!(
            CHANNELS <= CHANNEL_COUNT,
            "The PDMA controller has 16 channels"
        );
        Self {
            registers: ral::Static(registers.cast()),
            registry: Registry::new(),
        }
    }

    /// Return `channel` to the pool of free channels.
    ///
    /// This only updates the channel table. The hardware keeps running; disable
    /// the channel and its interrupts if they may still fire. The channel's
    /// handler stays installed.
    pub fn release(&self, channel: usize) -> Result<()> {
        self.check_channel(channel)?;
        self.registry.release(channel);
        log::debug!("Released PDMA channel {}", channel);
        Ok(())
    }

    /// Install the handler that receives `channel`'s events.
    ///
    /// Replaces any previous handler. `None` removes the handler.
    pub fn set_handler(&self, channel: usize, handler: Option<&'static dyn Handler>) -> Result<()> {
        self.check_channel(channel)?;
        self.registry.set_handler(channel, handler);
        log::debug!(
            "PDMA channel {} handler {}",
            channel,
            if handler.is_some() { "installed" } else { "removed" }
        );
        Ok(())
    }

    /// Returns the handler installed for `channel`, if any.
    pub fn handler(&self, channel: usize) -> Result<Option<&'static dyn Handler>> {
        self.check_channel(channel)?;
        Ok(self.registry.handler(channel))
    }

    /// Returns `true` if `channel` is currently assigned.
    pub fn is_assigned(&self, channel: usize) -> Result<bool> {
        self.check_channel(channel)?;
        Ok(self.registry.is_assigned(channel))
    }

    /// Creates a handle for the PDMA channel described by `index`.
    ///
    /// # Safety
    ///
    /// This will create a handle that may alias global, mutable state. You should only create
    /// one channel per index, and only for channels that you've assigned. If there are
    /// multiple channels for the same index, you're responsible for ensuring synchronized
    /// access.
    pub unsafe fn channel(&self, index: usize) -> Result<Channel> {
        self.check_channel(index)?;
        Ok(Channel::new(index, self.registers))
    }

    fn check_channel(&self, channel: usize) -> Result<()> {
        check(channel < CHANNELS, Error::InvalidChannel(channel))
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "unchecked")] {
        /// The caller is trusted; only debug builds look at `valid`.
        #[inline(always)]
        pub(crate) fn check(valid: bool, error: Error) -> Result<()> {
            debug_assert!(valid, "{}", error);
            Ok(())
        }
    } else {
        #[inline(always)]
        pub(crate) fn check(valid: bool, error: Error) -> Result<()> {
            if valid {
                Ok(())
            } else {
                Err(error)
            }
        }
    }
}
