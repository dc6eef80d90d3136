//! PDMA channel

use crate::{
    element::Element,
    ral::{self, pdma, Static},
    Direction,
};

/// A PDMA channel
///
/// Use [`Pdma::assign`](crate::Pdma::assign) to pick a channel for your
/// transfer, then [`Pdma::channel`](crate::Pdma::channel) to create the
/// `Channel`.
///
/// The `Channel` stores memory addresses independent of the memory lifetime. You must make
/// sure that the channel's state is valid before starting a transfer!
pub struct Channel {
    /// Our channel number, expected to be between [0, 16)
    index: usize,
    /// Reference to the PDMA registers
    registers: Static<pdma::RegisterBlock>,
}

// It's OK to send a channel across an execution context.
// They can't be cloned or copied, so there's no chance of
// them being (mutably) shared.
unsafe impl Send for Channel {}

/// A channel interrupt source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// The transfer completed
    Complete,
    /// The transfer stopped on a bus error (target abort)
    Abort,
}

/// How the channel steps through an address range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum AddressMode {
    /// Advance by the transfer width after each transfer
    Increment = 0b00,
    /// Always use the same address, like a peripheral data register
    Fixed = 0b10,
    /// Wrap around at the end of the buffer
    Wrap = 0b11,
}

/// Size of each peripheral bus access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Width {
    /// 32-bit accesses
    Word = 0b00,
    /// 8-bit accesses
    Byte = 0b01,
    /// 16-bit accesses
    HalfWord = 0b10,
}

/// Channel transfer control
///
/// See [`Channel::set_control`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    /// Source address stepping
    pub source: AddressMode,
    /// Destination address stepping
    pub destination: AddressMode,
    /// Peripheral bus access size
    pub width: Width,
}

impl Control {
    /// Control for moving elements of type `E`
    pub const fn new<E: Element>(source: AddressMode, destination: AddressMode) -> Self {
        Control {
            source,
            destination,
            width: E::WIDTH,
        }
    }
}

impl Channel {
    pub(crate) fn new(index: usize, registers: Static<pdma::RegisterBlock>) -> Self {
        Channel { index, registers }
    }

    /// Returns the PDMA channel number
    ///
    /// Channels are unique and numbered within the half-open range `[0, CHANNEL_COUNT)`.
    pub fn channel(&self) -> usize {
        self.index
    }

    /// Returns this channel's register file
    fn registers(&self) -> &pdma::channel::RegisterBlock {
        &self.registers.CH[self.index]
    }

    /// Reset the channel's internal state machine
    ///
    /// The reset bit clears itself.
    pub fn reset(&mut self) {
        let ch = self.registers();
        ral::modify_reg!(crate::ral::pdma::channel, ch, CSR, SW_RST: 1);
    }

    pub(crate) fn set_direction(&mut self, direction: Direction) {
        let ch = self.registers();
        match direction {
            Direction::MemoryToMemory => {
                ral::modify_reg!(crate::ral::pdma::channel, ch, CSR, MODE: MEMORY_TO_MEMORY)
            }
            Direction::PeripheralToMemory => {
                ral::modify_reg!(crate::ral::pdma::channel, ch, CSR, MODE: PERIPHERAL_TO_MEMORY)
            }
            Direction::MemoryToPeripheral => {
                ral::modify_reg!(crate::ral::pdma::channel, ch, CSR, MODE: MEMORY_TO_PERIPHERAL)
            }
        }
    }

    /// Returns the transfer direction programmed into the channel
    ///
    /// Returns `None` if the mode field holds a reserved value.
    pub fn direction(&self) -> Option<Direction> {
        use crate::ral::pdma::channel::CSR::MODE::RW::*;
        let ch = self.registers();
        match ral::read_reg!(crate::ral::pdma::channel, ch, CSR, MODE) {
            MEMORY_TO_MEMORY => Some(Direction::MemoryToMemory),
            PERIPHERAL_TO_MEMORY => Some(Direction::PeripheralToMemory),
            MEMORY_TO_PERIPHERAL => Some(Direction::MemoryToPeripheral),
            _ => None,
        }
    }

    /// Set the address stepping and the transfer width
    ///
    /// Leaves the transfer direction and the enable bits as they are.
    pub fn set_control(&mut self, control: Control) {
        let ch = self.registers();
        ral::modify_reg!(
            crate::ral::pdma::channel,
            ch,
            CSR,
            SAD: control.source as u32,
            DAD: control.destination as u32,
            TWS: control.width as u32
        );
    }

    /// Start a transfer of `bytes` bytes from `source` to `destination`
    ///
    /// The channel must be enabled, and its control set, before the transfer
    /// starts. For peripheral transfers, the routed peripheral paces the
    /// transfer.
    ///
    /// # Safety
    ///
    /// This could initiate a PDMA transaction that uses an invalid source or destination.
    /// Caller must ensure that the source and destination are valid for the lifetime of
    /// the transfer.
    pub unsafe fn start<E: Element>(&self, source: *const E, destination: *const E, bytes: u32) {
        let ch = self.registers();
        ral::modify_reg!(crate::ral::pdma::channel, ch, CSR, PDMACEN: 1);
        ral::write_reg!(crate::ral::pdma::channel, ch, SAR, source as u32);
        ral::write_reg!(crate::ral::pdma::channel, ch, DAR, destination as u32);
        ral::write_reg!(crate::ral::pdma::channel, ch, BCR, bytes);
        ral::modify_reg!(crate::ral::pdma::channel, ch, CSR, TRIG_EN: 1);
    }

    /// Enable the channel's clock
    ///
    /// # Safety
    ///
    /// This could resume a PDMA transaction that uses an invalid source or destination.
    /// Caller must ensure that the channel's source and destination are valid for the
    /// lifetime of the transfer.
    pub unsafe fn enable(&self) {
        let bit = self.clock_enable_bit();
        // GCRCSR is shared by all channels.
        critical_section::with(|_| {
            ral::modify_reg!(crate::ral::pdma, self.registers, GCRCSR, |gcrcsr: u32| gcrcsr | bit)
        });
    }

    /// Disable the channel's clock, stopping any transfer
    pub fn disable(&self) {
        let bit = self.clock_enable_bit();
        critical_section::with(|_| {
            ral::modify_reg!(crate::ral::pdma, self.registers, GCRCSR, |gcrcsr: u32| gcrcsr & !bit)
        });
    }

    /// Indicates if this channel is enabled
    pub fn is_enabled(&self) -> bool {
        ral::read_reg!(crate::ral::pdma, self.registers, GCRCSR) & self.clock_enable_bit() != 0
    }

    fn clock_enable_bit(&self) -> u32 {
        1 << (pdma::RegisterBlock::GCRCSR_CLK_EN + self.index as u32)
    }

    /// Let `interrupt` reach the PDMA interrupt handler
    ///
    /// You're responsible for unmasking the PDMA interrupt in the NVIC.
    pub fn enable_interrupt(&mut self, interrupt: Interrupt) {
        let ch = self.registers();
        match interrupt {
            Interrupt::Complete => ral::modify_reg!(crate::ral::pdma::channel, ch, IER, BLKD: 1),
            Interrupt::Abort => ral::modify_reg!(crate::ral::pdma::channel, ch, IER, TABORT: 1),
        }
    }

    /// Keep `interrupt` from reaching the PDMA interrupt handler
    pub fn disable_interrupt(&mut self, interrupt: Interrupt) {
        let ch = self.registers();
        match interrupt {
            Interrupt::Complete => ral::modify_reg!(crate::ral::pdma::channel, ch, IER, BLKD: 0),
            Interrupt::Abort => ral::modify_reg!(crate::ral::pdma::channel, ch, IER, TABORT: 0),
        }
    }

    /// Returns `true` if `interrupt` is pending for this channel
    pub fn is_interrupt(&self, interrupt: Interrupt) -> bool {
        let ch = self.registers();
        match interrupt {
            Interrupt::Complete => ral::read_reg!(crate::ral::pdma::channel, ch, ISR, BLKD == 1),
            Interrupt::Abort => ral::read_reg!(crate::ral::pdma::channel, ch, ISR, TABORT == 1),
        }
    }

    /// Clear the pending `interrupt` flag
    pub fn clear_interrupt(&self, interrupt: Interrupt) {
        // Immutable write OK. ISR is write-one-to-clear; other flags are untouched.
        let ch = self.registers();
        match interrupt {
            Interrupt::Complete => ral::write_reg!(crate::ral::pdma::channel, ch, ISR, BLKD: 1),
            Interrupt::Abort => ral::write_reg!(crate::ral::pdma::channel, ch, ISR, TABORT: 1),
        }
    }

    /// Returns the address the channel reads next
    pub fn current_source_address(&self) -> u32 {
        let ch = self.registers();
        ral::read_reg!(crate::ral::pdma::channel, ch, CSAR)
    }

    /// Returns the address the channel writes next
    pub fn current_destination_address(&self) -> u32 {
        let ch = self.registers();
        ral::read_reg!(crate::ral::pdma::channel, ch, CDAR)
    }

    /// Returns the number of bytes left in the current transfer
    pub fn remaining_count(&self) -> u32 {
        let ch = self.registers();
        ral::read_reg!(crate::ral::pdma::channel, ch, CBCR)
    }

    /// Returns the contents of the channel's shared buffer
    pub fn shared_buffer_data(&self) -> u32 {
        let ch = self.registers();
        ral::read_reg!(crate::ral::pdma::channel, ch, SBUF)
    }

    /// Returns the channel's internal buffer pointer
    pub fn internal_buffer_pointer(&self) -> u32 {
        let ch = self.registers();
        ral::read_reg!(crate::ral::pdma::channel, ch, POINT)
    }
}
