//! Analog I/O capability.

use super::digital::DriveMode;

/// One ADC/DAC-capable pin.
///
/// `proportion = voltage / max_voltage`. The layer does not clamp the
/// result, so a misbehaving converter can report values outside `[0, 1]`.
pub trait AnalogLine {
    /// Error type produced by the concrete transport.
    type Error;

    /// Reference voltage of the converter. Fixed for the lifetime of the pin.
    fn max_voltage(&self) -> f32;

    /// Returns the current drive direction.
    fn drive_mode(&self) -> DriveMode;

    /// Reconfigures the drive direction.
    fn set_drive_mode(&mut self, mode: DriveMode) -> Result<(), Self::Error>;

    /// Samples the pin voltage without touching the drive direction.
    fn sample_voltage(&mut self) -> Result<f32, Self::Error>;

    /// Drives the pin voltage without touching the drive direction.
    fn drive_voltage(&mut self, voltage: f32) -> Result<(), Self::Error>;

    /// Switches the pin to input, then samples its voltage.
    fn read_voltage(&mut self) -> Result<f32, Self::Error> {
        self.set_drive_mode(DriveMode::Input)?;
        self.sample_voltage()
    }

    /// Switches the pin to output, then drives `voltage`.
    fn write_voltage(&mut self, voltage: f32) -> Result<(), Self::Error> {
        self.set_drive_mode(DriveMode::Output)?;
        self.drive_voltage(voltage)
    }

    /// Switches the pin to input, then samples it as a fraction of the reference.
    fn read_proportion(&mut self) -> Result<f32, Self::Error> {
        self.read_voltage().map(|voltage| voltage / self.max_voltage())
    }

    /// Switches the pin to output, then drives `proportion` of the reference.
    fn write_proportion(&mut self, proportion: f32) -> Result<(), Self::Error> {
        let voltage = proportion * self.max_voltage();
        self.write_voltage(voltage)
    }

    /// Samples the voltage for callers that already manage the direction.
    fn voltage(&mut self) -> Result<f32, Self::Error> {
        self.sample_voltage()
    }

    /// Drives the voltage for callers that already manage the direction.
    fn set_voltage(&mut self, voltage: f32) -> Result<(), Self::Error> {
        self.drive_voltage(voltage)
    }

    /// Samples the proportion for callers that already manage the direction.
    fn proportion(&mut self) -> Result<f32, Self::Error> {
        self.sample_voltage().map(|voltage| voltage / self.max_voltage())
    }

    /// Drives the proportion for callers that already manage the direction.
    fn set_proportion(&mut self, proportion: f32) -> Result<(), Self::Error> {
        let voltage = proportion * self.max_voltage();
        self.drive_voltage(voltage)
    }
}
