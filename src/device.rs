//! High-level LS7366R quadrature counter driver.

use core::mem;

use embedded_hal::spi::SpiDevice;

use crate::config::{Config, ConnectionSettings};
use crate::error::{DriverError, DriverResult};
use crate::interface::digital::DigitalLine;
use crate::interface::spi::{SpiSyncBus, SynchronousBus};
use crate::params::{Command, CountEnable, CountMode, CounterWidth, Direction, RegisterSelect};
use crate::registers::{
    decode_count, encode_count, Instruction, Mode0, Mode1, Register, Status,
};

/// Ownership state of the bus and count-enable line.
enum State<BUS, EN> {
    Active { bus: BUS, enable: EN },
    Released,
}

/// Synchronous driver for the LS7366R 32-bit quadrature counter.
///
/// The count mode has no authoritative source other than this driver, so the
/// cached value is only updated after the corresponding register write
/// succeeds. Scratch buffers are reused on every call.
pub struct Ls7366r<BUS, EN> {
    state: State<BUS, EN>,
    config: Config,
    mode: Option<CountMode>,
    mode1: Mode1,
    write1: [u8; 1],
    write2: [u8; 2],
    write5: [u8; 5],
    read1: [u8; 1],
    read4: [u8; 4],
}

/// Decoded view of the `STR` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// STR[7] CY, counter overflow latched.
    pub carry: bool,
    /// STR[6] BW, counter underflow latched.
    pub borrow: bool,
    /// STR[5] CMP, counter matched `DTR`.
    pub compare: bool,
    /// STR[4] IDX, index input latched.
    pub index: bool,
    /// STR[3] CEN, counting enabled.
    pub count_enabled: bool,
    /// STR[2] PLS, power loss latched.
    pub power_loss: bool,
    /// STR[1] U/D, count direction.
    pub direction: Direction,
    /// STR[0] S, counter sign.
    pub negative: bool,
}

impl StatusSnapshot {
    /// Builds a snapshot from the raw STR bitfield.
    pub fn from_register(status: Status) -> Self {
        Self {
            carry: status.carry(),
            borrow: status.borrow(),
            compare: status.compare(),
            index: status.index(),
            count_enabled: status.count_enabled(),
            power_loss: status.power_loss(),
            direction: status.direction(),
            negative: status.sign(),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusSnapshot {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "StatusSnapshot {{\n    CY: {},\n    BW: {},\n    CMP: {},\n    IDX: {},\n    CEN: {},\n    PLS: {},\n    U/D: {},\n    S: {}\n}}",
            self.carry,
            self.borrow,
            self.compare,
            self.index,
            self.count_enabled,
            self.power_loss,
            self.direction,
            self.negative
        );
    }
}

impl<BUS, EN> Ls7366r<BUS, EN> {
    // ==================================================================
    // == Ownership & Settings ==========================================
    // ==================================================================
    /// Bus configuration the transport must apply for the chip on `chip_select`.
    pub const fn connection_settings(chip_select: u8) -> ConnectionSettings {
        ConnectionSettings::new(chip_select)
    }

    /// Returns the configuration applied at construction.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Last count mode written to `MDR0`.
    pub fn count_mode(&self) -> Option<CountMode> {
        self.mode
    }

    /// Returns `true` once [`release`](Self::release) handed the handles back.
    pub fn is_released(&self) -> bool {
        matches!(self.state, State::Released)
    }

    /// Provides mutable access to the underlying bus while the driver is active.
    pub fn bus_mut(&mut self) -> Option<&mut BUS> {
        match &mut self.state {
            State::Active { bus, .. } => Some(bus),
            State::Released => None,
        }
    }

    /// Hands the bus and the count-enable line back, in that order.
    ///
    /// Only the first call returns the handles; later calls return `None`.
    pub fn release(&mut self) -> Option<(BUS, EN)> {
        match mem::replace(&mut self.state, State::Released) {
            State::Active { bus, enable } => {
                debug!("ls7366r: released");
                Some((bus, enable))
            }
            State::Released => None,
        }
    }
}

impl<SPI, EN> Ls7366r<SpiSyncBus<SPI>, EN>
where
    SPI: SpiDevice,
    EN: DigitalLine,
{
    // ==================================================================
    // == SPI Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for `embedded-hal` SPI devices.
    pub fn new_spi(
        spi: SPI,
        enable: EN,
        config: Config,
    ) -> DriverResult<Self, SPI::Error, EN::Error> {
        Self::new(SpiSyncBus::new(spi), enable, config)
    }

    /// Releases the driver, returning the SPI device and the enable line.
    pub fn release_spi(&mut self) -> Option<(SPI, EN)> {
        self.release().map(|(bus, enable)| (bus.release(), enable))
    }
}

impl<BUS, EN> Ls7366r<BUS, EN>
where
    BUS: SynchronousBus,
    EN: DigitalLine,
{
    // ==================================================================
    // == Construction ==================================================
    // ==================================================================
    /// Takes ownership of the bus and count-enable line and initializes the chip.
    ///
    /// The enable line is driven high, every mode, status and counter register
    /// is cleared, the output register is loaded, the configured count mode is
    /// written and the counter is set to 4-byte width. A failure at any step
    /// drops both handles and returns the transport error.
    pub fn new(bus: BUS, enable: EN, config: Config) -> DriverResult<Self, BUS::Error, EN::Error> {
        let mut driver = Self {
            state: State::Active { bus, enable },
            config,
            mode: None,
            mode1: Mode1::from(Mode1::CLEAR_VALUE),
            write1: [0; 1],
            write2: [0; 2],
            write5: [0; 5],
            read1: [0; 1],
            read4: [0; 4],
        };
        driver.init()?;
        Ok(driver)
    }

    fn init(&mut self) -> DriverResult<(), BUS::Error, EN::Error> {
        if let State::Active { enable, .. } = &mut self.state {
            enable
                .write_forcing_output(true)
                .map_err(DriverError::Enable)?;
        }

        self.instruction(Command::Clear, Mode0::SELECT)?;
        self.instruction(Command::Clear, Mode1::SELECT)?;
        self.instruction(Command::Clear, Status::SELECT)?;
        self.instruction(Command::Clear, RegisterSelect::Counter)?;
        self.instruction(Command::Load, RegisterSelect::Output)?;

        self.set_count_mode(self.config.count_mode)?;

        let mode1 = Mode1::new()
            .with_counter_width(CounterWidth::FourByte)
            .with_count_enable(self.config.count_enable);
        self.write_mode1(mode1)?;

        debug!("ls7366r: initialized");
        Ok(())
    }

    // ==================================================================
    // == Counter Access ================================================
    // ==================================================================
    /// Snapshots the live counter into `OTR` and reads it back.
    ///
    /// Issues exactly two transactions: a `Load, Output` write and a
    /// sequential 1-byte write / 4-byte read of `Read, Output`.
    pub fn get_count(&mut self) -> DriverResult<i32, BUS::Error, EN::Error> {
        self.instruction(Command::Load, RegisterSelect::Output)?;

        self.write1[0] = Instruction::encode(Command::Read, RegisterSelect::Output);
        Self::bus(&mut self.state)?
            .transfer_sequential(&self.write1, &mut self.read4)
            .map_err(DriverError::Bus)?;

        let count = decode_count(self.read4);
        trace!("ls7366r: count {=i32}", count);
        Ok(count)
    }

    /// Clears the live counter.
    pub fn reset_count(&mut self) -> DriverResult<(), BUS::Error, EN::Error> {
        self.instruction(Command::Clear, RegisterSelect::Counter)
    }

    /// Writes `value` to `DTR` and transfers it into the live counter.
    pub fn preset_count(&mut self, value: i32) -> DriverResult<(), BUS::Error, EN::Error> {
        self.write5[0] = Instruction::encode(Command::Write, RegisterSelect::Input);
        self.write5[1..].copy_from_slice(&encode_count(value));
        Self::bus(&mut self.state)?
            .write(&self.write5)
            .map_err(DriverError::Bus)?;

        self.instruction(Command::Load, RegisterSelect::Counter)
    }

    // ==================================================================
    // == Mode Configuration ============================================
    // ==================================================================
    /// Selects the count mode.
    ///
    /// Does nothing when `mode` is already the cached mode. Otherwise writes
    /// `MDR0` as free-running, index disabled, filter clock divided by two,
    /// with the quadrature factor of `mode`.
    pub fn set_count_mode(&mut self, mode: CountMode) -> DriverResult<(), BUS::Error, EN::Error> {
        if self.mode == Some(mode) {
            return Ok(());
        }

        let mode0 = Mode0::for_count_mode(mode);
        self.write_register(Mode0::SELECT, u8::from(mode0))?;
        self.mode = Some(mode);

        debug!("ls7366r: count mode {}", mode);
        Ok(())
    }

    /// Reads `MDR0` back and compares it with the cached count mode.
    ///
    /// Returns `false` when the chip disagrees or no mode was written yet.
    pub fn verify_count_mode(&mut self) -> DriverResult<bool, BUS::Error, EN::Error> {
        let raw = self.read_register(Mode0::SELECT)?;

        let matches = self
            .mode
            .is_some_and(|mode| u8::from(Mode0::for_count_mode(mode)) == raw);
        if !matches {
            warn!("ls7366r: MDR0 read back {=u8:#x}", raw);
        }

        Ok(matches)
    }

    /// Starts or stops counting without touching the counter width.
    pub fn set_counting_enabled(&mut self, enabled: bool) -> DriverResult<(), BUS::Error, EN::Error> {
        let count_enable = if enabled {
            CountEnable::Enabled
        } else {
            CountEnable::Disabled
        };

        self.write_mode1(self.mode1.with_count_enable(count_enable))
    }

    /// Returns `true` when the last `MDR1` write left counting enabled.
    pub fn counting_enabled(&self) -> bool {
        self.mode1.count_enable() == CountEnable::Enabled
    }

    // ==================================================================
    // == Status ========================================================
    // ==================================================================
    /// Returns a snapshot of the `STR` register.
    pub fn read_status(&mut self) -> DriverResult<StatusSnapshot, BUS::Error, EN::Error> {
        let raw = self.read_register(Status::SELECT)?;
        Ok(StatusSnapshot::from_register(Status::from(raw)))
    }

    // ==================================================================
    // == Internal Transfer Helpers =====================================
    // ==================================================================
    fn bus(state: &mut State<BUS, EN>) -> DriverResult<&mut BUS, BUS::Error, EN::Error> {
        match state {
            State::Active { bus, .. } => Ok(bus),
            State::Released => Err(DriverError::Released),
        }
    }

    fn instruction(
        &mut self,
        command: Command,
        register: RegisterSelect,
    ) -> DriverResult<(), BUS::Error, EN::Error> {
        self.write1[0] = Instruction::encode(command, register);
        trace!("ls7366r: instruction {=u8:#x}", self.write1[0]);

        Self::bus(&mut self.state)?
            .write(&self.write1)
            .map_err(DriverError::Bus)
    }

    fn write_register(
        &mut self,
        register: RegisterSelect,
        value: u8,
    ) -> DriverResult<(), BUS::Error, EN::Error> {
        self.write2 = [Instruction::encode(Command::Write, register), value];
        trace!("ls7366r: write {=u8:#x} {=u8:#x}", self.write2[0], value);

        Self::bus(&mut self.state)?
            .write(&self.write2)
            .map_err(DriverError::Bus)
    }

    fn read_register(&mut self, register: RegisterSelect) -> DriverResult<u8, BUS::Error, EN::Error> {
        self.write1[0] = Instruction::encode(Command::Read, register);

        Self::bus(&mut self.state)?
            .transfer_sequential(&self.write1, &mut self.read1)
            .map_err(DriverError::Bus)?;

        Ok(self.read1[0])
    }

    fn write_mode1(&mut self, mode1: Mode1) -> DriverResult<(), BUS::Error, EN::Error> {
        self.write_register(Mode1::SELECT, u8::from(mode1))?;
        self.mode1 = mode1;
        Ok(())
    }
}
