//! Test support: a PDMA driver backed by plain memory

use crate::{ral::pdma::RegisterBlock, Event, Handler, Pdma};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Zeroed memory with the size and layout of the PDMA register block
///
/// The memory is leaked, so drivers created from it can outlive the
/// `Memory`.
pub(crate) struct Memory {
    base: *mut u32,
}

pub(crate) const CSR: usize = 0x00;
pub(crate) const SAR: usize = 0x04;
pub(crate) const DAR: usize = 0x08;
pub(crate) const BCR: usize = 0x0C;
pub(crate) const POINT: usize = 0x10;
pub(crate) const CSAR: usize = 0x14;
pub(crate) const CDAR: usize = 0x18;
pub(crate) const CBCR: usize = 0x1C;
pub(crate) const IER: usize = 0x20;
pub(crate) const ISR: usize = 0x24;
pub(crate) const SBUF: usize = 0x28;

pub(crate) const GCRCSR: usize = 0xF00;
pub(crate) const PDSSR: [usize; 3] = [0xF04, 0xF08, 0xF10];
pub(crate) const GCRISR: usize = 0xF0C;

/// Offset of `register` in `channel`'s register file
pub(crate) const fn channel(channel: usize, register: usize) -> usize {
    channel * 0x40 + register
}

impl Memory {
    pub(crate) fn new() -> Self {
        let words = core::mem::size_of::<RegisterBlock>() / 4;
        let block = vec![0u32; words].into_boxed_slice();
        Memory {
            base: Box::into_raw(block) as *mut u32,
        }
    }

    pub(crate) fn pdma<const CHANNELS: usize>(&self) -> Pdma<CHANNELS> {
        // Safety: memory is as large as the register block, and it's never freed.
        unsafe { Pdma::new(self.base as *const ()) }
    }

    pub(crate) fn read(&self, offset: usize) -> u32 {
        // Safety: offsets come from the register map above.
        unsafe { self.base.add(offset / 4).read_volatile() }
    }

    pub(crate) fn write(&self, offset: usize, value: u32) {
        // Safety: offsets come from the register map above.
        unsafe { self.base.add(offset / 4).write_volatile(value) }
    }
}

/// Counts the events it receives
#[derive(Default)]
pub(crate) struct Recorder {
    complete: AtomicUsize,
    error: AtomicUsize,
}

impl Recorder {
    pub(crate) fn leak() -> &'static Recorder {
        Box::leak(Box::default())
    }

    pub(crate) fn complete(&self) -> usize {
        self.complete.load(Ordering::SeqCst)
    }

    pub(crate) fn error(&self) -> usize {
        self.error.load(Ordering::SeqCst)
    }
}

impl Handler for Recorder {
    fn on_event(&self, event: Event) {
        match event {
            Event::Complete => self.complete.fetch_add(1, Ordering::SeqCst),
            Event::Error => self.error.fetch_add(1, Ordering::SeqCst),
        };
    }
}
