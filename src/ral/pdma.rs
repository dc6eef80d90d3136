//! PDMA register blocks and fields

use super::{RORegister, RWRegister};

/// Declares a RAL field module with no enumerated values.
macro_rules! field {
    ($name:ident, $offset:expr, $width:expr) => {
        pub mod $name {
            pub const offset: u32 = $offset;
            pub const mask: u32 = ((1 << $width) - 1) << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
    };
}

/// Per-channel registers.
pub mod channel {
    use super::{RORegister, RWRegister};

    #[repr(C)]
    pub struct RegisterBlock {
        /// Control and Status Register
        pub CSR: RWRegister<u32>,
        /// Source Address Register
        pub SAR: RWRegister<u32>,
        /// Destination Address Register
        pub DAR: RWRegister<u32>,
        /// Transfer Byte Count Register
        pub BCR: RWRegister<u32>,
        /// Internal Buffer Pointer Register
        pub POINT: RORegister<u32>,
        /// Current Source Address Register
        pub CSAR: RORegister<u32>,
        /// Current Destination Address Register
        pub CDAR: RORegister<u32>,
        /// Current Transfer Byte Count Register
        pub CBCR: RORegister<u32>,
        /// Interrupt Enable Register
        pub IER: RWRegister<u32>,
        /// Interrupt Status Register (write one to clear)
        pub ISR: RWRegister<u32>,
        /// Shared Buffer Data Register
        pub SBUF: RORegister<u32>,
        _reserved0: [u32; 5],
    }

    const _: () = assert!(core::mem::size_of::<RegisterBlock>() == 0x40);
    const _: () = assert!(core::mem::offset_of!(RegisterBlock, ISR) == 0x24);

    pub mod CSR {
        field!(PDMACEN, 0, 1);
        field!(SW_RST, 1, 1);

        /// Transfer direction
        pub mod MODE {
            pub const offset: u32 = 2;
            pub const mask: u32 = 0b11 << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {
                pub const MEMORY_TO_MEMORY: u32 = 0b00;
                pub const PERIPHERAL_TO_MEMORY: u32 = 0b01;
                pub const MEMORY_TO_PERIPHERAL: u32 = 0b10;
            }
        }

        field!(SAD, 4, 2);
        field!(DAD, 6, 2);
        field!(TWS, 19, 2);
        field!(TRIG_EN, 23, 1);
    }

    pub mod IER {
        field!(TABORT, 0, 1);
        field!(BLKD, 1, 1);
    }

    pub mod ISR {
        field!(TABORT, 0, 1);
        field!(BLKD, 1, 1);
    }
}

/// Number of channel register files in the controller.
pub const CHANNELS: usize = 16;

/// PDMA controller registers.
#[repr(C)]
pub struct RegisterBlock {
    /// Channel register files
    pub CH: [channel::RegisterBlock; CHANNELS],
    _reserved0: [u8; 0xF00 - 0x400],
    /// Global Control Register
    pub GCRCSR: RWRegister<u32>,
    /// Service Selection Register 0
    pub PDSSR0: RWRegister<u32>,
    /// Service Selection Register 1
    pub PDSSR1: RWRegister<u32>,
    /// Global Interrupt Status Register
    pub GCRISR: RORegister<u32>,
    /// Service Selection Register 2
    pub PDSSR2: RWRegister<u32>,
}

// Did I calculate my reservations correctly?
const _: () = assert!(core::mem::offset_of!(RegisterBlock, GCRCSR) == 0xF00);
const _: () = assert!(core::mem::offset_of!(RegisterBlock, PDSSR2) == 0xF10);

impl RegisterBlock {
    /// Offset of channel `n`'s clock enable bit in `GCRCSR`.
    pub const GCRCSR_CLK_EN: u32 = 8;

    /// Returns the peripheral service selection register at `index`.
    ///
    /// The selection registers cannot be accessed as an array: `PDSSR2`
    /// follows the global interrupt status register.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than 2.
    pub fn service_selection(&self, index: usize) -> &RWRegister<u32> {
        match index {
            0 => &self.PDSSR0,
            1 => &self.PDSSR1,
            2 => &self.PDSSR2,
            _ => panic!("PDMA service selection register {} does not exist", index),
        }
    }
}
