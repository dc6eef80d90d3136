//! PDMA errors

use crate::Request;
use core::fmt::{self, Display};

/// An error from the PDMA driver
///
/// [`NoChannel`](Error::NoChannel) and
/// [`PeripheralToPeripheral`](Error::PeripheralToPeripheral) mean that no
/// channel exists for the request. The other variants describe a caller
/// contract violation; they're only reported when the crate is built
/// without the `unchecked` feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The channel index is outside of the driver's channel table
    InvalidChannel(usize),
    /// The request cannot be the source of a transfer
    InvalidSource(Request),
    /// The request cannot be the destination of a transfer
    InvalidDestination(Request),
    /// Neither side of the transfer is memory
    PeripheralToPeripheral,
    /// Every channel is assigned
    NoChannel,
}

impl Error {
    /// Returns `true` if the error means "the channel does not exist"
    ///
    /// These errors are expected at runtime. Callers may try again once
    /// another channel is released.
    pub const fn is_not_exist(self) -> bool {
        matches!(self, Error::PeripheralToPeripheral | Error::NoChannel)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidChannel(channel) => write!(f, "PDMA channel {} does not exist", channel),
            Error::InvalidSource(request) => {
                write!(f, "{:?} is not a PDMA source request", request)
            }
            Error::InvalidDestination(request) => {
                write!(f, "{:?} is not a PDMA destination request", request)
            }
            Error::PeripheralToPeripheral => {
                f.write_str("PDMA cannot transfer between two peripherals")
            }
            Error::NoChannel => f.write_str("no PDMA channel available"),
        }
    }
}
