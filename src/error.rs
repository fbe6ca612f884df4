//! Error handling primitives for the capability layer and the LS7366R driver.

/// Result alias used by the capability wrappers.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Result alias used by the LS7366R driver.
pub type DriverResult<T, BusE, PinE> = core::result::Result<T, DriverError<BusE, PinE>>;

/// Error variants produced by the capability wrappers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying transport.
    Interface(E),
    /// The listener table of an interrupt line is full.
    ListenerCapacity,
    /// The listener token does not belong to a registered listener.
    UnknownListener,
    /// The payload does not fit into the fixed scratch buffer.
    BufferTooSmall,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}

/// Error variants produced by the LS7366R driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError<BusE, PinE> {
    /// The synchronous bus transfer failed.
    Bus(BusE),
    /// Driving the count-enable line failed.
    Enable(PinE),
    /// The driver already handed its bus and enable line back.
    Released,
}
