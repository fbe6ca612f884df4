//! Capability contracts shared by every transport and driver.
//!
//! Each capability is a trait whose required methods are the primitives a
//! concrete transport implements. Everything else is derived from them here.

pub mod analog;
pub mod digital;
pub mod pwm;
pub mod register_bus;
pub mod serial;
pub mod spi;

pub use analog::AnalogLine;
pub use digital::{DigitalLine, DriveMode, InterruptEdge, InterruptLine, InterruptSource, PinLine};
pub use pwm::{PulseOutput, PwmChannel};
pub use register_bus::{I2cRegisterBus, RegisterBus, RegisterDevice};
pub use serial::{ByteStreamBus, CanBus, SerialSettings};
pub use spi::{SpiSyncBus, SynchronousBus};
