//! Strongly typed parameter enumerations for the LS7366R driver.
//!
//! These enums map directly to datasheet field encodings and are used by the
//! register bitfields in [`registers`](crate::registers) and by the driver API.
//!
//! # Examples
//!
//! ```rust
//! use peripheral_io::params::{CountMode, Quadrature};
//!
//! assert_eq!(CountMode::Quad4.quadrature(), Quadrature::X4);
//! ```

use modular_bitfield::prelude::Specifier;

/// Operation encoded in the upper two bits of the instruction register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum Command {
    /// Clear the selected register (`0x00`).
    Clear = 0b00,
    /// Read the selected register (`0x40`).
    Read = 0b01,
    /// Write the selected register (`0x80`).
    Write = 0b10,
    /// Load the selected register (`0xC0`).
    Load = 0b11,
}

/// Register selected by bits 5:3 of the instruction register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum RegisterSelect {
    /// `MDR0`, count configuration (`0x08`).
    Mode0 = 0b001,
    /// `MDR1`, counter width and flags (`0x10`).
    Mode1 = 0b010,
    /// `DTR`, data input register (`0x18`).
    Input = 0b011,
    /// `CNTR`, the live counter (`0x20`).
    Counter = 0b100,
    /// `OTR`, output snapshot of the counter (`0x28`).
    Output = 0b101,
    /// `STR`, status flags (`0x30`).
    Status = 0b110,
}

/// Quadrature multiplication factor (`MDR0[1:0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum Quadrature {
    /// Non-quadrature mode, A is clock and B is direction.
    NonQuadrature = 0b00,
    /// One count per quadrature cycle.
    X1 = 0b01,
    /// Two counts per quadrature cycle.
    X2 = 0b10,
    /// Four counts per quadrature cycle.
    X4 = 0b11,
}

/// Count cycle behaviour (`MDR0[3:2]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum CountCycle {
    /// Free-running count.
    FreeRunning = 0b00,
    /// Single-cycle count.
    SingleCycle = 0b01,
    /// Range-limited count bounded by `DTR`.
    Range = 0b10,
    /// Modulo-n count with `n = DTR + 1`.
    ModuloN = 0b11,
}

/// Index input function (`MDR0[5:4]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum IndexMode {
    /// Index input ignored.
    Disabled = 0b00,
    /// Index loads `CNTR` from `DTR`.
    LoadCounter = 0b01,
    /// Index resets `CNTR`.
    ResetCounter = 0b10,
    /// Index loads `OTR` from `CNTR`.
    LoadOutput = 0b11,
}

/// Index synchronisation (`MDR0[6]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum IndexSync {
    /// Asynchronous index.
    Asynchronous = 0,
    /// Synchronous index, quadrature modes only.
    Synchronous = 1,
}

/// Filter clock division factor (`MDR0[7]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum FilterDivision {
    /// Filter clock equals the reference clock.
    DivideByOne = 0,
    /// Filter clock is half the reference clock.
    DivideByTwo = 1,
}

/// Counter width (`MDR1[1:0]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum CounterWidth {
    /// 32-bit counter.
    FourByte = 0b00,
    /// 24-bit counter.
    ThreeByte = 0b01,
    /// 16-bit counter.
    TwoByte = 0b10,
    /// 8-bit counter.
    OneByte = 0b11,
}

/// Counting enable bit (`MDR1[2]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum CountEnable {
    /// Counting enabled (bit cleared, default).
    Enabled = 0,
    /// Counting disabled (bit set).
    Disabled = 1,
}

/// Count direction reported in `STR[1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum Direction {
    /// Counting down.
    CounterClockwise = 0,
    /// Counting up.
    Clockwise = 1,
}

/// Encoder count mode exposed by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CountMode {
    /// Non-quadrature counting.
    None,
    /// Count once per quadrature cycle.
    #[default]
    Quad1,
    /// Count twice per quadrature cycle.
    Quad2,
    /// Count on every quadrature edge.
    Quad4,
}

impl CountMode {
    /// Maps the mode onto its `MDR0` quadrature field.
    pub const fn quadrature(self) -> Quadrature {
        match self {
            Self::None => Quadrature::NonQuadrature,
            Self::Quad1 => Quadrature::X1,
            Self::Quad2 => Quadrature::X2,
            Self::Quad4 => Quadrature::X4,
        }
    }
}
