//! Pulse-width output capability.

/// Hardware primitives of a PWM-capable pin.
pub trait PwmChannel {
    /// Error type produced by the concrete transport.
    type Error;

    /// Starts or stops the output.
    fn apply_enabled(&mut self, enabled: bool) -> Result<(), Self::Error>;

    /// Programs frequency (Hz) and duty cycle (`0.0..=1.0`) in one update.
    fn apply_values(&mut self, frequency: f32, duty_cycle: f32) -> Result<(), Self::Error>;
}

/// PWM output with cached state.
///
/// Frequency and duty cycle always reach the hardware together, so changing
/// one keeps the other. The cache is only updated after the hardware call
/// succeeds.
pub struct PulseOutput<P> {
    channel: P,
    enabled: bool,
    frequency: f32,
    duty_cycle: f32,
}

impl<P> PulseOutput<P> {
    /// Wraps `channel`, assuming it starts disabled with zeroed settings.
    pub const fn new(channel: P) -> Self {
        Self {
            channel,
            enabled: false,
            frequency: 0.0,
            duty_cycle: 0.0,
        }
    }

    /// Last applied enable state.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Last applied frequency in hertz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Last applied duty cycle.
    pub fn duty_cycle(&self) -> f32 {
        self.duty_cycle
    }

    /// Consumes the output and returns the channel.
    pub fn release(self) -> P {
        self.channel
    }
}

impl<P> PulseOutput<P>
where
    P: PwmChannel,
{
    /// Applies frequency and duty cycle together.
    pub fn set(&mut self, frequency: f32, duty_cycle: f32) -> Result<(), P::Error> {
        self.channel.apply_values(frequency, duty_cycle)?;
        self.frequency = frequency;
        self.duty_cycle = duty_cycle;
        Ok(())
    }

    /// Starts or stops the output.
    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), P::Error> {
        self.channel.apply_enabled(enabled)?;
        self.enabled = enabled;
        Ok(())
    }

    /// Changes the frequency, keeping the duty cycle.
    pub fn set_frequency(&mut self, frequency: f32) -> Result<(), P::Error> {
        self.set(frequency, self.duty_cycle)
    }

    /// Changes the duty cycle, keeping the frequency.
    pub fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<(), P::Error> {
        self.set(self.frequency, duty_cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeChannel {
        applied: Option<(f32, f32)>,
        enabled: bool,
        fail: bool,
    }

    impl PwmChannel for FakeChannel {
        type Error = ();

        fn apply_enabled(&mut self, enabled: bool) -> Result<(), Self::Error> {
            if self.fail {
                return Err(());
            }
            self.enabled = enabled;
            Ok(())
        }

        fn apply_values(&mut self, frequency: f32, duty_cycle: f32) -> Result<(), Self::Error> {
            if self.fail {
                return Err(());
            }
            self.applied = Some((frequency, duty_cycle));
            Ok(())
        }
    }

    #[test]
    fn frequency_change_keeps_duty_cycle() {
        let mut output = PulseOutput::new(FakeChannel::default());
        output.set(1_000.0, 0.25).unwrap();

        output.set_frequency(2_000.0).unwrap();
        assert_eq!(output.frequency(), 2_000.0);
        assert_eq!(output.duty_cycle(), 0.25);

        output.set_duty_cycle(0.75).unwrap();
        assert_eq!(output.release().applied, Some((2_000.0, 0.75)));
    }

    #[test]
    fn enable_flag_follows_hardware() {
        let mut output = PulseOutput::new(FakeChannel::default());
        output.set_enabled(true).unwrap();
        assert!(output.enabled());
        assert!(output.release().enabled);
    }

    #[test]
    fn failed_update_keeps_cache() {
        let mut output = PulseOutput::new(FakeChannel::default());
        output.set(500.0, 0.5).unwrap();
        output.channel.fail = true;

        assert_eq!(output.set_frequency(800.0), Err(()));
        assert_eq!(output.set_enabled(true), Err(()));
        assert_eq!(output.frequency(), 500.0);
        assert!(!output.enabled());
    }
}
