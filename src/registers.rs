//! Register map definitions for the LS7366R quadrature counter.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{
    Command, CountCycle, CountEnable, CountMode, CounterWidth, Direction, FilterDivision,
    IndexMode, IndexSync, Quadrature, RegisterSelect,
};

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Register selector placed in the instruction byte.
    const SELECT: RegisterSelect;
    /// Value after a `Clear` instruction.
    const CLEAR_VALUE: u8;
}

/// Instruction register (`IR`), the first byte of every transfer.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    #[skip]
    __: B3,
    // Target register (bits 5:3).
    pub register: RegisterSelect,
    // Operation (bits 7:6).
    pub command: Command,
}

impl Instruction {
    /// Encodes `command | register` as the byte clocked to the chip.
    pub fn encode(command: Command, register: RegisterSelect) -> u8 {
        u8::from(Self::new().with_register(register).with_command(command))
    }
}

impl From<u8> for Instruction {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Instruction> for u8 {
    fn from(value: Instruction) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of `MDR0`.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode0 {
    // Quadrature factor (bits 1:0).
    pub quadrature: Quadrature,
    // Count cycle (bits 3:2).
    pub count_cycle: CountCycle,
    // Index function (bits 5:4).
    pub index_mode: IndexMode,
    // Index synchronisation (bit 6).
    pub index_sync: IndexSync,
    // Filter clock division (bit 7).
    pub filter_division: FilterDivision,
}

impl Mode0 {
    /// Free-running, index disabled, filter clock divided by two, with the
    /// quadrature factor of `mode`.
    pub fn for_count_mode(mode: CountMode) -> Self {
        Self::new()
            .with_quadrature(mode.quadrature())
            .with_count_cycle(CountCycle::FreeRunning)
            .with_index_mode(IndexMode::Disabled)
            .with_index_sync(IndexSync::Asynchronous)
            .with_filter_division(FilterDivision::DivideByTwo)
    }
}

impl From<u8> for Mode0 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Mode0> for u8 {
    fn from(value: Mode0) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of `MDR1`.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode1 {
    // Counter width (bits 1:0).
    pub counter_width: CounterWidth,
    // Counting enable (bit 2).
    pub count_enable: CountEnable,
    #[skip]
    __: B1,
    // Flag on index (bit 4).
    pub flag_index: bool,
    // Flag on compare (bit 5).
    pub flag_compare: bool,
    // Flag on borrow (bit 6).
    pub flag_borrow: bool,
    // Flag on carry (bit 7).
    pub flag_carry: bool,
}

impl From<u8> for Mode1 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Mode1> for u8 {
    fn from(value: Mode1) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of `STR`.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    // Counter sign (bit 0).
    pub sign: bool,
    // Count direction (bit 1).
    pub direction: Direction,
    // Power loss latch (bit 2).
    pub power_loss: bool,
    // Counting enabled (bit 3).
    pub count_enabled: bool,
    // Index latch (bit 4).
    pub index: bool,
    // Compare latch, CNTR == DTR (bit 5).
    pub compare: bool,
    // Borrow latch, CNTR underflow (bit 6).
    pub borrow: bool,
    // Carry latch, CNTR overflow (bit 7).
    pub carry: bool,
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Status> for u8 {
    fn from(value: Status) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for Mode0 {
    const SELECT: RegisterSelect = RegisterSelect::Mode0;
    const CLEAR_VALUE: u8 = 0x00;
}

impl Register for Mode1 {
    const SELECT: RegisterSelect = RegisterSelect::Mode1;
    const CLEAR_VALUE: u8 = 0x00;
}

impl Register for Status {
    const SELECT: RegisterSelect = RegisterSelect::Status;
    const CLEAR_VALUE: u8 = 0x00;
}

/// Decodes a big-endian 32-bit counter transfer as two's complement.
pub fn decode_count(raw: [u8; 4]) -> i32 {
    i32::from_be_bytes(raw)
}

/// Encodes a counter value for a 32-bit `DTR` write.
pub fn encode_count(value: i32) -> [u8; 4] {
    value.to_be_bytes()
}
