//! The channel table

use crate::Handler;
use core::cell::RefCell;
use critical_section::Mutex;

/// What the driver knows about one channel
#[derive(Clone, Copy)]
pub(crate) struct Descriptor {
    /// Some client owns the channel
    pub(crate) assigned: bool,
    /// Receives the channel's events
    pub(crate) handler: Option<&'static dyn Handler>,
}

impl Descriptor {
    const FREE: Self = Descriptor {
        assigned: false,
        handler: None,
    };
}

/// Fixed table of channel descriptors, indexed by channel number
///
/// Every operation runs in its own critical section, so it's safe to use the
/// table from the PDMA interrupt. Operations on an index outside of the table
/// do nothing.
pub(crate) struct Registry<const CHANNELS: usize> {
    table: Mutex<RefCell<[Descriptor; CHANNELS]>>,
}

impl<const CHANNELS: usize> Registry<CHANNELS> {
    pub(crate) const fn new() -> Self {
        Self {
            table: Mutex::new(RefCell::new([Descriptor::FREE; CHANNELS])),
        }
    }

    /// Assign the lowest-numbered free channel, and return its index
    ///
    /// Returns `None` if all channels are assigned.
    pub(crate) fn allocate_first_free(&self) -> Option<usize> {
        critical_section::with(|cs| {
            let mut table = self.table.borrow_ref_mut(cs);
            let (index, descriptor) = table
                .iter_mut()
                .enumerate()
                .find(|(_, descriptor)| !descriptor.assigned)?;
            descriptor.assigned = true;
            Some(index)
        })
    }

    pub(crate) fn release(&self, channel: usize) {
        critical_section::with(|cs| {
            if let Some(descriptor) = self.table.borrow_ref_mut(cs).get_mut(channel) {
                descriptor.assigned = false;
            }
        })
    }

    pub(crate) fn set_handler(&self, channel: usize, handler: Option<&'static dyn Handler>) {
        critical_section::with(|cs| {
            if let Some(descriptor) = self.table.borrow_ref_mut(cs).get_mut(channel) {
                descriptor.handler = handler;
            }
        })
    }

    pub(crate) fn handler(&self, channel: usize) -> Option<&'static dyn Handler> {
        self.descriptor(channel)?.handler
    }

    pub(crate) fn is_assigned(&self, channel: usize) -> bool {
        self.descriptor(channel)
            .map_or(false, |descriptor| descriptor.assigned)
    }

    /// Returns a copy of the channel's descriptor
    pub(crate) fn descriptor(&self, channel: usize) -> Option<Descriptor> {
        critical_section::with(|cs| self.table.borrow_ref(cs).get(channel).copied())
    }
}
