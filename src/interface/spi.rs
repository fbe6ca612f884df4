//! Synchronous bus capability built on top of `embedded-hal` `SpiDevice`.

use embedded_hal::spi::{Operation, SpiDevice};

/// Duplex byte-transfer bus.
///
/// The single primitive is [`transfer`](Self::transfer); every other
/// operation is expressed through it.
pub trait SynchronousBus {
    /// Error type produced by the concrete transport.
    type Error;

    /// Clocks `write` out while clocking `read` in. Either side may be absent.
    fn transfer(
        &mut self,
        write: Option<&[u8]>,
        read: Option<&mut [u8]>,
    ) -> Result<(), Self::Error>;

    /// Write-only transfer.
    fn write(&mut self, buffer: &[u8]) -> Result<(), Self::Error> {
        self.transfer(Some(buffer), None)
    }

    /// Read-only transfer.
    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.transfer(None, Some(buffer))
    }

    /// Single simultaneous transfer.
    fn transfer_full_duplex(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        self.transfer(Some(write), Some(read))
    }

    /// Clocks `write` out completely, then clocks `read` in.
    ///
    /// Used when the device needs the command fully shifted in before it can
    /// answer.
    fn transfer_sequential(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        self.transfer(Some(write), None)?;
        self.transfer(None, Some(read))
    }
}

/// [`SynchronousBus`] over an `embedded-hal` `SpiDevice`.
///
/// Each call maps to one `SpiDevice` transaction, so chip select stays
/// asserted across the write and read phases of a sequential transfer.
pub struct SpiSyncBus<SPI> {
    spi: SPI,
}

impl<SPI> SpiSyncBus<SPI> {
    /// Creates a new bus from the provided SPI device abstraction.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the bus and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> SynchronousBus for SpiSyncBus<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn transfer(
        &mut self,
        write: Option<&[u8]>,
        read: Option<&mut [u8]>,
    ) -> Result<(), Self::Error> {
        match (write, read) {
            (Some(write), Some(read)) => self.spi.transfer(read, write),
            (Some(write), None) => self.spi.write(write),
            (None, Some(read)) => self.spi.read(read),
            (None, None) => Ok(()),
        }
    }

    fn transfer_sequential(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Self::Error> {
        let mut operations = [Operation::Write(write), Operation::Read(read)];
        self.spi.transaction(&mut operations)
    }
}
