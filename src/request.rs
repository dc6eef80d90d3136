//! PDMA request identifiers

use core::fmt::{self, Debug};

/// A hardware signal line that can request a PDMA transfer
///
/// A `Request` packs everything the driver needs to route the signal to a
/// channel:
///
/// - bits 29..28 select one of the three service selection registers
///   (`PDSSR0`, `PDSSR1`, `PDSSR2`).
/// - bits 20..16 hold the bit offset of the signal's 4-bit channel slot in
///   that register.
/// - bit 8 is set for receive-class signals, which move data *to* memory.
/// - bit 9 marks the memory pseudo-request, [`Request::MEM`].
///
/// Use the associated constants. [`from_raw`](Request::from_raw) exists
/// for drivers that carry request codes around as integers.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Request(u32);

const REGISTER_OFFSET: u32 = 28;
const REGISTER_MASK: u32 = 0b11;
const SLOT_OFFSET: u32 = 16;
const SLOT_MASK: u32 = 0x1F;
const RECEIVE: u32 = 1 << 8;
const MEMORY: u32 = 1 << 9;

/// Width of one channel slot in a service selection register
const SLOT_WIDTH: u32 = 4;

const fn signal(register: u32, slot: u32, receive: bool) -> Request {
    let receive = if receive { RECEIVE } else { 0 };
    Request(
        (register << REGISTER_OFFSET) | ((slot * SLOT_WIDTH) << SLOT_OFFSET) | receive,
    )
}

impl Request {
    /// The memory bus itself
    pub const MEM: Request = Request(MEMORY);

    pub const SPI0_RX: Request = signal(0, 0, true);
    pub const SPI0_TX: Request = signal(0, 1, false);
    pub const SPI1_RX: Request = signal(0, 2, true);
    pub const SPI1_TX: Request = signal(0, 3, false);
    pub const SPI2_RX: Request = signal(0, 4, true);
    pub const SPI2_TX: Request = signal(0, 5, false);
    pub const SPI3_RX: Request = signal(0, 6, true);
    pub const SPI3_TX: Request = signal(0, 7, false);

    pub const UART0_RX: Request = signal(1, 0, true);
    pub const UART0_TX: Request = signal(1, 1, false);
    pub const UART1_RX: Request = signal(1, 2, true);
    pub const UART1_TX: Request = signal(1, 3, false);
    pub const UART2_RX: Request = signal(1, 4, true);
    pub const UART2_TX: Request = signal(1, 5, false);
    pub const UART3_RX: Request = signal(1, 6, true);
    pub const UART3_TX: Request = signal(1, 7, false);

    pub const UART4_RX: Request = signal(2, 0, true);
    pub const UART4_TX: Request = signal(2, 1, false);
    pub const UART5_RX: Request = signal(2, 2, true);
    pub const UART5_TX: Request = signal(2, 3, false);
    pub const IIS0_RX: Request = signal(2, 4, true);
    pub const IIS0_TX: Request = signal(2, 5, false);
    pub const IIS1_TX: Request = signal(2, 6, false);
    pub const ADC_RX: Request = signal(2, 7, true);

    /// Requests that can provide data for a transfer
    pub const SOURCES: [Request; 13] = [
        Request::MEM,
        Request::UART0_RX,
        Request::UART1_RX,
        Request::UART2_RX,
        Request::UART3_RX,
        Request::UART4_RX,
        Request::UART5_RX,
        Request::ADC_RX,
        Request::SPI0_RX,
        Request::SPI1_RX,
        Request::SPI2_RX,
        Request::SPI3_RX,
        Request::IIS0_RX,
    ];

    /// Requests that can receive data from a transfer
    pub const DESTINATIONS: [Request; 13] = [
        Request::MEM,
        Request::UART0_TX,
        Request::UART1_TX,
        Request::UART2_TX,
        Request::UART3_TX,
        Request::UART4_TX,
        Request::UART5_TX,
        Request::SPI0_TX,
        Request::SPI1_TX,
        Request::SPI2_TX,
        Request::SPI3_TX,
        Request::IIS0_TX,
        Request::IIS1_TX,
    ];

    /// Wraps a raw request code
    ///
    /// The code isn't checked here. [`Pdma::assign`](crate::Pdma::assign)
    /// rejects unknown codes unless the crate is built with `unchecked`.
    pub const fn from_raw(raw: u32) -> Self {
        Request(raw)
    }

    /// Returns the raw request code
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns `true` if this is the memory pseudo-request
    pub const fn is_memory(self) -> bool {
        self.0 & MEMORY != 0
    }

    /// Returns `true` if this is a receive-class signal
    pub const fn is_receive(self) -> bool {
        !self.is_memory() && self.0 & RECEIVE != 0
    }

    /// Returns `true` if this is a transmit-class signal
    pub const fn is_transmit(self) -> bool {
        !self.is_memory() && self.0 & RECEIVE == 0
    }

    /// Index of the service selection register that routes this signal
    pub const fn register_index(self) -> usize {
        ((self.0 >> REGISTER_OFFSET) & REGISTER_MASK) as usize
    }

    /// Bit offset of this signal's channel slot
    pub const fn slot_offset(self) -> u32 {
        (self.0 >> SLOT_OFFSET) & SLOT_MASK
    }

    /// Mask covering this signal's channel slot
    pub const fn slot_mask(self) -> u32 {
        0xF << self.slot_offset()
    }

    /// Returns `true` if this request can provide data for a transfer
    pub fn is_source(self) -> bool {
        Request::SOURCES.contains(&self)
    }

    /// Returns `true` if this request can receive data from a transfer
    pub fn is_destination(self) -> bool {
        Request::DESTINATIONS.contains(&self)
    }
}

impl Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Request({:#010X})", self.0)
    }
}
