//! Dynamic channel assignment and request routing

use crate::{channel::Channel, check, Error, Pdma, Request, Result};

/// The direction of a PDMA transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Memory to a peripheral's transmit register
    MemoryToPeripheral,
    /// A peripheral's receive register to memory
    PeripheralToMemory,
    /// Memory to memory
    MemoryToMemory,
}

impl Direction {
    /// Classify a transfer from `source` to `destination`
    ///
    /// Returns `None` when no direction fits, like a transfer between two
    /// peripherals, or a transmit signal used as a source.
    pub const fn classify(source: Request, destination: Request) -> Option<Direction> {
        match (source.is_memory(), destination.is_memory()) {
            (true, true) => Some(Direction::MemoryToMemory),
            (true, false) if destination.is_transmit() => Some(Direction::MemoryToPeripheral),
            (false, true) if source.is_receive() => Some(Direction::PeripheralToMemory),
            _ => None,
        }
    }
}

impl<const CHANNELS: usize> Pdma<CHANNELS> {
    /// Assign a free channel to a transfer from `source` to `destination`
    ///
    /// `source` must be one of [`Request::SOURCES`], and `destination` one of
    /// [`Request::DESTINATIONS`]. At least one of them must be
    /// [`Request::MEM`].
    ///
    /// On success, the lowest-numbered free channel is marked assigned, the
    /// peripheral's request signal is routed to it, and the channel's transfer
    /// direction is set. The returned index identifies the channel until you
    /// [`release`](Pdma::release) it.
    ///
    /// # Errors
    ///
    /// - [`Error::PeripheralToPeripheral`] if neither side is memory.
    /// - [`Error::NoChannel`] if every channel is assigned.
    /// - [`Error::InvalidSource`] / [`Error::InvalidDestination`] if a request
    ///   isn't usable on that side of the transfer. Not reported with the
    ///   `unchecked` feature.
    ///
    /// No channel is held when this returns an error.
    pub fn assign(&self, source: Request, destination: Request) -> Result<usize> {
        check(source.is_source(), Error::InvalidSource(source))?;
        check(
            destination.is_destination(),
            Error::InvalidDestination(destination),
        )?;
        self.allocate_and_route(source, destination)
    }

    /// Assign a channel once the requests have passed, or skipped, their checks
    fn allocate_and_route(&self, source: Request, destination: Request) -> Result<usize> {
        if !source.is_memory() && !destination.is_memory() {
            return Err(Error::PeripheralToPeripheral);
        }

        // Classify before allocating, so a mismatched pair holds no channel.
        let direction = Direction::classify(source, destination).ok_or(Error::NoChannel)?;

        let index = self.registry.allocate_first_free().ok_or_else(|| {
            log::warn!(
                "No PDMA channel for {:?} -> {:?}",
                source,
                destination
            );
            Error::NoChannel
        })?;

        match direction {
            Direction::MemoryToPeripheral => self.route(destination, index),
            Direction::PeripheralToMemory => self.route(source, index),
            Direction::MemoryToMemory => {}
        }
        let mut channel = Channel::new(index, self.registers);
        channel.set_direction(direction);

        log::debug!(
            "Assigned PDMA channel {} to {:?} -> {:?} ({:?})",
            index,
            source,
            destination,
            direction
        );
        Ok(index)
    }

    /// Route `request` to `channel` in the request's service selection register
    fn route(&self, request: Request, channel: usize) {
        let pdssr = self.registers.service_selection(request.register_index());
        let slot = ((channel as u32) << request.slot_offset()) & request.slot_mask();
        // Service selection registers are shared by all channels.
        critical_section::with(|_| pdssr.write((pdssr.read() & !request.slot_mask()) | slot));
    }
}

#[cfg(all(test, not(feature = "unchecked")))]
mod tests {
    use super::Direction;
    use crate::testing::{self, Memory};
    use crate::{Error, Request, CHANNEL_COUNT};

    #[test]
    fn classify_directions() {
        assert_eq!(
            Direction::classify(Request::MEM, Request::SPI1_TX),
            Some(Direction::MemoryToPeripheral)
        );
        assert_eq!(
            Direction::classify(Request::ADC_RX, Request::MEM),
            Some(Direction::PeripheralToMemory)
        );
        assert_eq!(
            Direction::classify(Request::MEM, Request::MEM),
            Some(Direction::MemoryToMemory)
        );
        assert_eq!(Direction::classify(Request::UART0_RX, Request::UART1_TX), None);
        assert_eq!(Direction::classify(Request::UART0_TX, Request::MEM), None);
        assert_eq!(Direction::classify(Request::MEM, Request::UART0_RX), None);
    }

    #[test]
    fn memory_to_uart() {
        let memory = Memory::new();
        let pdma = memory.pdma::<CHANNEL_COUNT>();

        let index = pdma.assign(Request::MEM, Request::UART0_TX).unwrap();
        assert_eq!(index, 0);
        assert_eq!(pdma.is_assigned(index), Ok(true));

        let channel = unsafe { pdma.channel(index) }.unwrap();
        assert_eq!(channel.direction(), Some(Direction::MemoryToPeripheral));
        assert_eq!(memory.read(testing::channel(0, testing::CSR)), 0b10 << 2);
    }

    #[test]
    fn uart_slot_holds_the_channel() {
        let memory = Memory::new();
        let pdma = memory.pdma::<CHANNEL_COUNT>();
        pdma.assign(Request::MEM, Request::MEM).unwrap();
        pdma.assign(Request::MEM, Request::MEM).unwrap();

        let index = pdma.assign(Request::MEM, Request::UART0_TX).unwrap();
        assert_eq!(index, 2);
        // UART0 TX is the second slot of PDSSR1
        assert_eq!(memory.read(testing::PDSSR[1]), 2 << 4);
        assert_eq!(memory.read(testing::PDSSR[0]), 0);
        assert_eq!(memory.read(testing::PDSSR[2]), 0);
    }

    #[test]
    fn uart_to_memory() {
        let memory = Memory::new();
        let pdma = memory.pdma::<CHANNEL_COUNT>();
        for _ in 0..5 {
            pdma.assign(Request::MEM, Request::MEM).unwrap();
        }

        let index = pdma.assign(Request::UART0_RX, Request::MEM).unwrap();
        assert_eq!(index, 5);
        let channel = unsafe { pdma.channel(index) }.unwrap();
        assert_eq!(channel.direction(), Some(Direction::PeripheralToMemory));
        assert_eq!(memory.read(testing::PDSSR[1]), 5);
    }

    #[test]
    fn routing_preserves_other_slots() {
        let memory = Memory::new();
        let pdma = memory.pdma::<CHANNEL_COUNT>();
        memory.write(testing::PDSSR[2], 0xFFFF_FFFF);

        // ADC RX is the last slot of PDSSR2
        let index = pdma.assign(Request::ADC_RX, Request::MEM).unwrap();
        assert_eq!(index, 0);
        assert_eq!(memory.read(testing::PDSSR[2]), 0x0FFF_FFFF);

        let index = pdma.assign(Request::MEM, Request::UART4_TX).unwrap();
        assert_eq!(index, 1);
        assert_eq!(memory.read(testing::PDSSR[2]), 0x0FFF_FF1F);
    }

    #[test]
    fn rerouting_replaces_the_slot() {
        let memory = Memory::new();
        let pdma = memory.pdma::<CHANNEL_COUNT>();
        for _ in 0..9 {
            pdma.assign(Request::MEM, Request::MEM).unwrap();
        }
        let first = pdma.assign(Request::SPI3_RX, Request::MEM).unwrap();
        assert_eq!(memory.read(testing::PDSSR[0]), 9 << 24);

        pdma.release(first).unwrap();
        pdma.release(0).unwrap();
        let second = pdma.assign(Request::SPI3_RX, Request::MEM).unwrap();
        assert_eq!(second, 0);
        assert_eq!(memory.read(testing::PDSSR[0]), 0);
    }

    #[test]
    fn memory_to_memory_touches_no_selection_register() {
        let memory = Memory::new();
        let pdma = memory.pdma::<CHANNEL_COUNT>();
        for offset in testing::PDSSR {
            memory.write(offset, 0x1234_5678);
        }

        let index = pdma.assign(Request::MEM, Request::MEM).unwrap();
        let channel = unsafe { pdma.channel(index) }.unwrap();
        assert_eq!(channel.direction(), Some(Direction::MemoryToMemory));
        for offset in testing::PDSSR {
            assert_eq!(memory.read(offset), 0x1234_5678);
        }
    }

    #[test]
    fn peripheral_to_peripheral_holds_no_channel() {
        let memory = Memory::new();
        let pdma = memory.pdma::<CHANNEL_COUNT>();

        assert_eq!(
            pdma.assign(Request::UART0_RX, Request::UART1_TX),
            Err(Error::PeripheralToPeripheral)
        );
        for channel in 0..CHANNEL_COUNT {
            assert_eq!(pdma.is_assigned(channel), Ok(false));
        }
        assert_eq!(pdma.assign(Request::MEM, Request::MEM), Ok(0));
    }

    #[test]
    fn mismatched_requests_are_contract_violations() {
        let memory = Memory::new();
        let pdma = memory.pdma::<CHANNEL_COUNT>();

        assert_eq!(
            pdma.assign(Request::UART0_TX, Request::MEM),
            Err(Error::InvalidSource(Request::UART0_TX))
        );
        assert_eq!(
            pdma.assign(Request::MEM, Request::SPI0_RX),
            Err(Error::InvalidDestination(Request::SPI0_RX))
        );
        assert_eq!(
            pdma.assign(Request::from_raw(0x3000_0000), Request::MEM),
            Err(Error::InvalidSource(Request::from_raw(0x3000_0000)))
        );
        assert_eq!(pdma.is_assigned(0), Ok(false));
    }

    #[test]
    fn mismatched_requests_never_hold_a_channel() {
        let memory = Memory::new();
        let pdma = memory.pdma::<CHANNEL_COUNT>();

        // Skip the request checks, as the unchecked build does.
        assert_eq!(
            pdma.allocate_and_route(Request::UART0_TX, Request::MEM),
            Err(Error::NoChannel)
        );
        assert_eq!(
            pdma.allocate_and_route(Request::MEM, Request::SPI0_RX),
            Err(Error::NoChannel)
        );
        assert_eq!(pdma.is_assigned(0), Ok(false));
        assert_eq!(memory.read(testing::channel(0, testing::CSR)), 0);
        assert_eq!(pdma.assign(Request::MEM, Request::MEM), Ok(0));
    }

    #[test]
    fn exhaustion_and_recovery() {
        let memory = Memory::new();
        let pdma = memory.pdma::<CHANNEL_COUNT>();
        for expected in 0..CHANNEL_COUNT {
            assert_eq!(pdma.assign(Request::MEM, Request::MEM), Ok(expected));
        }

        let error = pdma.assign(Request::MEM, Request::UART2_TX).unwrap_err();
        assert_eq!(error, Error::NoChannel);
        assert!(error.is_not_exist());
        // A failed assignment routes nothing
        assert_eq!(memory.read(testing::PDSSR[1]), 0);

        pdma.release(11).unwrap();
        assert_eq!(pdma.assign(Request::MEM, Request::UART2_TX), Ok(11));
        assert_eq!(memory.read(testing::PDSSR[1]), 11 << 20);
    }

    #[test]
    fn smaller_drivers_exhaust_sooner() {
        let memory = Memory::new();
        let pdma = memory.pdma::<2>();
        assert_eq!(pdma.assign(Request::MEM, Request::MEM), Ok(0));
        assert_eq!(pdma.assign(Request::MEM, Request::MEM), Ok(1));
        assert_eq!(pdma.assign(Request::MEM, Request::MEM), Err(Error::NoChannel));
    }
}

#[cfg(all(test, feature = "unchecked"))]
mod unchecked_tests {
    use crate::testing::{self, Memory};
    use crate::{Request, CHANNEL_COUNT};

    #[test]
    fn valid_requests_route_as_usual() {
        let memory = Memory::new();
        let pdma = memory.pdma::<CHANNEL_COUNT>();
        pdma.assign(Request::MEM, Request::MEM).unwrap();

        assert_eq!(pdma.assign(Request::MEM, Request::UART0_TX).unwrap(), 1);
        assert_eq!(memory.read(testing::PDSSR[1]), 1 << 4);
    }

    // Without request checks, a transmit signal can reach the router as a
    // source. It fits no direction, so no channel is assigned.
    #[test]
    #[cfg(not(debug_assertions))]
    fn misclassified_request_does_not_hold_a_channel() {
        let memory = Memory::new();
        let pdma = memory.pdma::<CHANNEL_COUNT>();

        assert_eq!(
            pdma.assign(Request::UART0_TX, Request::MEM),
            Err(crate::Error::NoChannel)
        );
        assert_eq!(pdma.is_assigned(0), Ok(false));
        assert_eq!(pdma.assign(Request::MEM, Request::MEM), Ok(0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn misclassified_request_fails_debug_assertions() {
        let memory = Memory::new();
        let pdma = memory.pdma::<CHANNEL_COUNT>();
        let _ = pdma.assign(Request::UART0_TX, Request::MEM);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn unknown_channel_release_is_a_no_op() {
        let memory = Memory::new();
        let pdma = memory.pdma::<CHANNEL_COUNT>();
        assert_eq!(pdma.release(CHANNEL_COUNT + 3), Ok(()));
        assert!(matches!(pdma.handler(CHANNEL_COUNT), Ok(None)));
    }
}
