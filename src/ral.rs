//! A RAL-like module to support PDMA register access
//!
//! The PDMA controller is one block of sixteen identical channel register
//! files followed by a small set of global registers. The global registers
//! aren't contiguous with the channels, and the three peripheral selection
//! registers aren't contiguous with each other. This module describes that
//! layout as `#[repr(C)]` structs, and exposes field definitions that work
//! with the RAL macros.

#![allow(
    non_snake_case, // Compatibility with RAL
    non_upper_case_globals, // Compatibility with RAL
)]

pub mod pdma;

pub use ral_registers::{modify_reg, read_reg, write_reg};
use ral_registers::{RORegister, RWRegister};

//
// Helper types for static memory
//
// Similar to the RAL's `Instance` type, but more copy.
//

pub(crate) struct Static<T>(pub(crate) *const T);
impl<T> core::ops::Deref for Static<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        // Safety: pointer points to static memory (peripheral memory)
        unsafe { &*self.0 }
    }
}
impl<T> Clone for Static<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Static<T> {}
