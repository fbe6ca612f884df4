//! Configuration primitives for the LS7366R driver.

use embedded_hal::spi::{MODE_0, Mode};

use crate::params::{CountEnable, CountMode};

/// SPI clock frequency the LS7366R is driven at.
pub const CLOCK_FREQUENCY_HZ: u32 = 1_000_000;
/// Bits per SPI word.
pub const DATA_BIT_LENGTH: u8 = 8;

/// User-facing configuration applied during driver construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Count mode selected after the registers are cleared.
    pub count_mode: CountMode,
    /// Whether the counter runs once construction completes.
    pub count_enable: CountEnable,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count_mode: CountMode::Quad1,
            count_enable: CountEnable::Enabled,
        }
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the initial count mode.
    pub fn count_mode(mut self, count_mode: CountMode) -> Self {
        self.config.count_mode = count_mode;
        self
    }

    /// Overrides whether counting starts enabled.
    pub fn count_enable(mut self, count_enable: CountEnable) -> Self {
        self.config.count_enable = count_enable;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether other devices may share the bus while this one is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SharingMode {
    /// The device owns the bus.
    Exclusive,
    /// Other devices on different chip selects may use the bus.
    Shared,
}

/// Bus configuration the transport must apply before talking to the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Chip-select line index on the bus.
    pub chip_select: u8,
    /// Clock frequency in hertz.
    pub clock_frequency: u32,
    /// Bits per word.
    pub data_bit_length: u8,
    /// Bus sharing mode.
    pub sharing_mode: SharingMode,
    /// Clock polarity and phase.
    pub mode: Mode,
}

impl ConnectionSettings {
    /// LS7366R settings for the device on `chip_select`: 1 MHz, 8-bit words,
    /// shared bus, SPI mode 0.
    pub const fn new(chip_select: u8) -> Self {
        Self {
            chip_select,
            clock_frequency: CLOCK_FREQUENCY_HZ,
            data_bit_length: DATA_BIT_LENGTH,
            sharing_mode: SharingMode::Shared,
            mode: MODE_0,
        }
    }
}
