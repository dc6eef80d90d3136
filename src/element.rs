//! DMA elements

use crate::channel::Width;

mod private {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
}

/// An element that the PDMA controller can move on the peripheral bus
///
/// This trait is sealed. It's implemented for `u8`, `u16` and `u32`.
pub trait Element: Sized + Copy + private::Sealed {
    /// The transfer width used when moving one element
    const WIDTH: Width;
}

impl Element for u8 {
    const WIDTH: Width = Width::Byte;
}

impl Element for u16 {
    const WIDTH: Width = Width::HalfWord;
}

impl Element for u32 {
    const WIDTH: Width = Width::Word;
}
