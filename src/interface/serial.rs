//! Byte-stream and CAN capability contracts.
//!
//! These only describe the surface; no behaviour is layered on top of them.

/// Parity bit selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    /// No parity bit.
    #[default]
    None,
    /// Odd parity.
    Odd,
    /// Even parity.
    Even,
    /// Parity bit always set.
    Mark,
    /// Parity bit always cleared.
    Space,
}

/// Stop bit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    /// One stop bit.
    #[default]
    One,
    /// One and a half stop bits.
    OnePointFive,
    /// Two stop bits.
    Two,
}

/// Flow control selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Handshake {
    /// No flow control.
    #[default]
    None,
    /// RTS/CTS hardware flow control.
    RequestToSend,
    /// XON/XOFF software flow control.
    XOnXOff,
    /// Hardware and software flow control together.
    RequestToSendXOnXOff,
}

/// Line settings of a byte-stream port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialSettings {
    /// Baud rate in bits per second.
    pub baud_rate: u32,
    /// Data bits per character.
    pub data_bits: u8,
    /// Parity bit selection.
    pub parity: Parity,
    /// Stop bit count.
    pub stop_bits: StopBits,
    /// Flow control selection.
    pub handshake: Handshake,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: 9_600,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: StopBits::One,
            handshake: Handshake::None,
        }
    }
}

/// Byte-stream bus such as a UART.
pub trait ByteStreamBus {
    /// Error type produced by the concrete transport.
    type Error;

    /// Name of the underlying port.
    fn port_name(&self) -> &str;

    /// Current line settings.
    fn settings(&self) -> SerialSettings;

    /// Reconfigures the line.
    fn set_settings(&mut self, settings: SerialSettings) -> Result<(), Self::Error>;

    /// Writes the whole buffer.
    fn write(&mut self, buffer: &[u8]) -> Result<(), Self::Error>;

    /// Fills the whole buffer.
    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error>;
}

/// CAN bus capability. Carries no operations yet.
pub trait CanBus {}
