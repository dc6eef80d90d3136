//! PDMA interrupt support

use crate::{
    channel::{Channel, Interrupt},
    ral, Pdma,
};

/// A channel event, delivered by [`Pdma::on_interrupt`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    /// The transfer completed
    Complete,
    /// The transfer stopped on an error
    Error,
}

impl Event {
    /// Returns `true` if the transfer completed
    pub const fn is_complete(self) -> bool {
        matches!(self, Event::Complete)
    }
}

/// Receives a channel's events
///
/// Install a handler with [`Pdma::set_handler`]. Handlers run in the PDMA
/// interrupt, so keep them short. A handler may release its channel, or
/// install a different handler.
///
/// Plain functions are handlers:
///
/// ```
/// use nuc4xx_pdma::{Event, Handler};
///
/// fn on_event(event: Event) {
///     assert!(event.is_complete());
/// }
/// static ON_EVENT: fn(Event) = on_event;
///
/// let handler: &'static dyn Handler = &ON_EVENT;
/// handler.on_event(Event::Complete);
/// ```
pub trait Handler: Sync {
    /// Called once for each serviced event
    fn on_event(&self, event: Event);
}

impl Handler for fn(Event) {
    fn on_event(&self, event: Event) {
        self(event)
    }
}

impl<const CHANNELS: usize> Pdma<CHANNELS> {
    /// Handle a PDMA interrupt
    ///
    /// Call this from the PDMA interrupt handler. It takes one snapshot of the
    /// global interrupt status, then visits every assigned channel whose
    /// status bit is set, lowest channel first. If the channel completed, or
    /// if it's in an error state, `on_interrupt` clears that flag and
    /// notifies the channel's handler. Completion wins when both flags are set;
    /// the error stays pending for the next interrupt.
    ///
    /// Unassigned channels are never inspected or cleared.
    ///
    /// ```no_run
    /// use nuc4xx_pdma::{Pdma, CHANNEL_COUNT, PDMA_BASE};
    ///
    /// static PDMA: Pdma<CHANNEL_COUNT> = unsafe { Pdma::new(PDMA_BASE as *const ()) };
    ///
    /// // #[cortex_m_rt::interrupt]
    /// fn PDMA_IRQ() {
    ///     PDMA.on_interrupt();
    /// }
    /// ```
    pub fn on_interrupt(&self) {
        let status = ral::read_reg!(crate::ral::pdma, self.registers, GCRISR);

        for index in 0..CHANNELS {
            let Some(descriptor) = self.registry.descriptor(index) else {
                continue;
            };
            if !descriptor.assigned || status & (1 << index) == 0 {
                continue;
            }

            let channel = Channel::new(index, self.registers);
            let event = if channel.is_interrupt(Interrupt::Complete) {
                channel.clear_interrupt(Interrupt::Complete);
                Event::Complete
            } else if channel.is_interrupt(Interrupt::Abort) {
                channel.clear_interrupt(Interrupt::Abort);
                Event::Error
            } else {
                continue;
            };

            log::trace!("PDMA channel {} {:?}", index, event);
            // Called outside of the registry's critical section.
            if let Some(handler) = descriptor.handler {
                handler.on_event(event);
            }
        }
    }
}
