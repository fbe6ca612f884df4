//! Register-addressed bus capability built on `embedded-hal` I2C.

use embedded_hal::i2c::I2c;

use crate::error::{Error, Result};

/// Raw primitives of a register-addressed bus.
pub trait RegisterBus {
    /// Error type produced by the concrete transport.
    type Error;

    /// Writes the whole buffer in one transaction.
    fn write(&mut self, buffer: &[u8]) -> core::result::Result<(), Self::Error>;

    /// Fills the whole buffer in one transaction.
    fn read(&mut self, buffer: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Writes `write`, then reads into `read` without releasing the bus.
    fn write_read(&mut self, write: &[u8], read: &mut [u8])
    -> core::result::Result<(), Self::Error>;
}

/// Register access on top of a [`RegisterBus`].
///
/// Reuses fixed scratch buffers on every call, so one instance must not be
/// driven from more than one context at a time. `N` bounds the payload of
/// [`write_registers`](Self::write_registers).
pub struct RegisterDevice<B, const N: usize = 32> {
    bus: B,
    write1: [u8; 1],
    write2: [u8; 2],
    read1: [u8; 1],
    block: [u8; N],
}

impl<B, const N: usize> RegisterDevice<B, N> {
    /// Wraps `bus` with zeroed scratch buffers.
    pub const fn new(bus: B) -> Self {
        Self {
            bus,
            write1: [0; 1],
            write2: [0; 2],
            read1: [0; 1],
            block: [0; N],
        }
    }

    /// Provides mutable access to the wrapped bus.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Consumes the device and returns the owned bus.
    pub fn release(self) -> B {
        self.bus
    }
}

impl<B, E, const N: usize> RegisterDevice<B, N>
where
    B: RegisterBus<Error = E>,
{
    /// Writes a single register.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), E> {
        self.write2 = [register, value];
        self.bus.write(&self.write2)?;
        Ok(())
    }

    /// Writes `values` to consecutive registers starting at `register`.
    pub fn write_registers(&mut self, register: u8, values: &[u8]) -> Result<(), E> {
        let len = values.len() + 1;
        if len > N {
            return Err(Error::BufferTooSmall);
        }

        self.block[0] = register;
        self.block[1..len].copy_from_slice(values);
        self.bus.write(&self.block[..len])?;
        Ok(())
    }

    /// Reads a single register.
    pub fn read_register(&mut self, register: u8) -> Result<u8, E> {
        self.write1[0] = register;
        self.bus.write_read(&self.write1, &mut self.read1)?;
        Ok(self.read1[0])
    }

    /// Reads consecutive registers starting at `register` into `values`.
    pub fn read_registers_into(&mut self, register: u8, values: &mut [u8]) -> Result<(), E> {
        self.write1[0] = register;
        self.bus.write_read(&self.write1, values)?;
        Ok(())
    }

    /// Reads `COUNT` consecutive registers starting at `register`.
    pub fn read_registers<const COUNT: usize>(&mut self, register: u8) -> Result<[u8; COUNT], E> {
        let mut values = [0u8; COUNT];
        self.read_registers_into(register, &mut values)?;
        Ok(values)
    }
}

/// [`RegisterBus`] over an `embedded-hal` I2C bus and a 7-bit device address.
pub struct I2cRegisterBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cRegisterBus<I2C> {
    /// Binds `i2c` to the device at `address`.
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Device address used for every transaction.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Consumes the bus and returns the owned I2C peripheral.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> RegisterBus for I2cRegisterBus<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn write(&mut self, buffer: &[u8]) -> core::result::Result<(), Self::Error> {
        self.i2c.write(self.address, buffer)
    }

    fn read(&mut self, buffer: &mut [u8]) -> core::result::Result<(), Self::Error> {
        self.i2c.read(self.address, buffer)
    }

    fn write_read(
        &mut self,
        write: &[u8],
        read: &mut [u8],
    ) -> core::result::Result<(), Self::Error> {
        self.i2c.write_read(self.address, write, read)
    }
}
