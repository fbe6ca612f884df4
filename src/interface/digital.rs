//! Digital I/O capability: level access, drive direction and edge events.

use core::cell::RefCell;

use critical_section::Mutex;

use embedded_hal::digital::{InputPin, OutputPin};

use crate::error::{Error, Result};

/// Drive direction of a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveMode {
    /// The pin senses the external level.
    #[default]
    Input,
    /// The pin drives its level.
    Output,
}

/// Edge filter applied to interrupt notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptEdge {
    /// Notifications are never dispatched.
    #[default]
    None,
    /// Dispatch when the line reports a high level.
    Rising,
    /// Dispatch when the line reports a low level.
    Falling,
}

impl InterruptEdge {
    /// Returns `true` when a notification carrying `level` passes this filter.
    pub const fn accepts(self, level: bool) -> bool {
        match self {
            Self::None => false,
            Self::Rising => level,
            Self::Falling => !level,
        }
    }
}

/// A level change delivered to interrupt listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValueChanged {
    /// Sampled level, `true` for high.
    pub level: bool,
    /// Transport timestamp of the edge in microseconds.
    pub timestamp_us: u64,
}

/// One GPIO-capable pin.
///
/// Implementors provide the raw primitives. The provided methods layer the
/// direction-forcing and convenience accessors on top of them.
pub trait DigitalLine {
    /// Error type produced by the concrete transport.
    type Error;

    /// Samples the pin level without touching the drive direction.
    fn read_level(&mut self) -> core::result::Result<bool, Self::Error>;

    /// Drives the pin level without touching the drive direction.
    fn write_level(&mut self, high: bool) -> core::result::Result<(), Self::Error>;

    /// Returns the current drive direction.
    fn drive_mode(&self) -> DriveMode;

    /// Reconfigures the drive direction.
    fn set_drive_mode(&mut self, mode: DriveMode) -> core::result::Result<(), Self::Error>;

    /// Switches the pin to input, then samples it.
    fn read_forcing_input(&mut self) -> core::result::Result<bool, Self::Error> {
        self.set_drive_mode(DriveMode::Input)?;
        self.read_level()
    }

    /// Switches the pin to output, then drives `high`.
    fn write_forcing_output(&mut self, high: bool) -> core::result::Result<(), Self::Error> {
        self.set_drive_mode(DriveMode::Output)?;
        self.write_level(high)
    }

    /// Samples the pin for callers that already manage its direction.
    fn value(&mut self) -> core::result::Result<bool, Self::Error> {
        self.read_level()
    }

    /// Drives the pin for callers that already manage its direction.
    fn set_value(&mut self, high: bool) -> core::result::Result<(), Self::Error> {
        self.write_level(high)
    }

    /// Drives the pin high.
    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.write_level(true)
    }

    /// Drives the pin low.
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.write_level(false)
    }

    /// Returns `true` when the pin reads high.
    fn is_high(&mut self) -> core::result::Result<bool, Self::Error> {
        self.read_level()
    }

    /// Returns `true` when the pin reads low.
    fn is_low(&mut self) -> core::result::Result<bool, Self::Error> {
        self.read_level().map(|level| !level)
    }
}

/// Interrupt source attached to a pin.
pub trait InterruptSource {
    /// Error type produced by the concrete transport.
    type Error;

    /// Arms edge detection on the pin.
    fn enable_interrupt(&mut self) -> core::result::Result<(), Self::Error>;

    /// Disarms edge detection on the pin.
    fn disable_interrupt(&mut self) -> core::result::Result<(), Self::Error>;
}

/// Token identifying a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ListenerId(usize);

/// Listener callback invoked with every accepted edge.
///
/// Listeners run in the interrupt-notification context, so they must be
/// shareable across execution contexts.
pub type Listener<'a> = &'a (dyn Fn(ValueChanged) + Sync);

struct Subscriptions<'a, L, const N: usize> {
    line: L,
    edge: InterruptEdge,
    listeners: [Option<Listener<'a>>; N],
    count: usize,
}

/// A digital line with edge event delivery.
///
/// Holds up to `N` listeners. The interrupt source is armed when the first
/// listener subscribes and disarmed when the last one leaves. All state sits
/// behind a `critical_section::Mutex`, so a shared reference can live in a
/// `static` reached from both thread mode and the interrupt handler.
pub struct InterruptLine<'a, L, const N: usize = 4> {
    inner: Mutex<RefCell<Subscriptions<'a, L, N>>>,
}

impl<'a, L, const N: usize> InterruptLine<'a, L, N> {
    /// Wraps `line` with no listeners and the edge filter set to `None`.
    pub const fn new(line: L) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Subscriptions {
                line,
                edge: InterruptEdge::None,
                listeners: [None; N],
                count: 0,
            })),
        }
    }

    /// Returns the configured edge filter.
    pub fn interrupt_edge(&self) -> InterruptEdge {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().edge)
    }

    /// Replaces the edge filter.
    pub fn set_interrupt_edge(&self, edge: InterruptEdge) {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().edge = edge);
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().count)
    }

    /// Runs `f` against the wrapped line inside a critical section.
    pub fn with_line<R>(&self, f: impl FnOnce(&mut L) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow(cs).borrow_mut().line))
    }

    /// Provides mutable access to the wrapped line.
    pub fn line_mut(&mut self) -> &mut L {
        &mut self.inner.get_mut().get_mut().line
    }

    /// Consumes the wrapper and returns the line.
    pub fn release(self) -> L {
        self.inner.into_inner().into_inner().line
    }

    /// Entry point for the transport's edge-detected callback.
    ///
    /// Dispatches synchronously to every listener when `level` passes the
    /// configured edge filter. The listener table is copied out first, so
    /// listeners may subscribe or unsubscribe while being dispatched.
    pub fn notify_edge(&self, level: bool, timestamp_us: u64) {
        let listeners = critical_section::with(|cs| {
            let subscriptions = self.inner.borrow(cs).borrow();
            subscriptions
                .edge
                .accepts(level)
                .then_some(subscriptions.listeners)
        });
        let Some(listeners) = listeners else {
            return;
        };

        let event = ValueChanged { level, timestamp_us };
        for listener in listeners.iter().flatten() {
            listener(event);
        }
    }
}

impl<'a, L, E, const N: usize> InterruptLine<'a, L, N>
where
    L: InterruptSource<Error = E>,
{
    /// Registers `listener`, arming the interrupt source on the first one.
    ///
    /// Nothing changes when arming fails.
    pub fn subscribe(&self, listener: Listener<'a>) -> Result<ListenerId, E> {
        critical_section::with(|cs| -> Result<ListenerId, E> {
            let mut subscriptions = self.inner.borrow(cs).borrow_mut();
            let slot = subscriptions
                .listeners
                .iter()
                .position(Option::is_none)
                .ok_or(Error::ListenerCapacity)?;

            if subscriptions.count == 0 {
                subscriptions.line.enable_interrupt()?;
                debug!("interrupt source armed");
            }

            subscriptions.listeners[slot] = Some(listener);
            subscriptions.count += 1;
            Ok(ListenerId(slot))
        })
    }

    /// Removes the listener behind `id`, disarming the interrupt source when
    /// it was the last one.
    ///
    /// Nothing changes when disarming fails; the listener stays registered.
    pub fn unsubscribe(&self, id: ListenerId) -> Result<(), E> {
        critical_section::with(|cs| -> Result<(), E> {
            let mut subscriptions = self.inner.borrow(cs).borrow_mut();
            if !matches!(subscriptions.listeners.get(id.0), Some(Some(_))) {
                return Err(Error::UnknownListener);
            }

            if subscriptions.count == 1 {
                subscriptions.line.disable_interrupt()?;
                debug!("interrupt source disarmed");
            }

            subscriptions.listeners[id.0] = None;
            subscriptions.count -= 1;
            Ok(())
        })
    }
}

/// [`DigitalLine`] over an `embedded-hal` pin that supports both directions.
///
/// `embedded-hal` has no direction primitive, so the drive mode is tracked
/// here and the pin is expected to follow whichever accessor is used.
pub struct PinLine<P> {
    pin: P,
    mode: DriveMode,
}

impl<P> PinLine<P> {
    /// Creates a line that starts in `mode`.
    pub const fn new(pin: P, mode: DriveMode) -> Self {
        Self { pin, mode }
    }

    /// Consumes the line and returns the owned pin.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P> DigitalLine for PinLine<P>
where
    P: InputPin + OutputPin,
{
    type Error = P::Error;

    fn read_level(&mut self) -> core::result::Result<bool, Self::Error> {
        self.pin.is_high()
    }

    fn write_level(&mut self, high: bool) -> core::result::Result<(), Self::Error> {
        if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }

    fn drive_mode(&self) -> DriveMode {
        self.mode
    }

    fn set_drive_mode(&mut self, mode: DriveMode) -> core::result::Result<(), Self::Error> {
        self.mode = mode;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};

    #[derive(Default)]
    struct FakeLine {
        mode: DriveMode,
        level: bool,
        enables: usize,
        disables: usize,
        mode_changes: usize,
    }

    impl FakeLine {
        const fn new() -> Self {
            Self {
                mode: DriveMode::Input,
                level: false,
                enables: 0,
                disables: 0,
                mode_changes: 0,
            }
        }
    }

    /// Interrupt source whose arm and disarm calls fail on demand.
    #[derive(Default)]
    struct FlakyLine {
        fail: bool,
        armed: bool,
        enables: usize,
    }

    impl InterruptSource for FlakyLine {
        type Error = ();

        fn enable_interrupt(&mut self) -> core::result::Result<(), Self::Error> {
            if self.fail {
                return Err(());
            }
            self.enables += 1;
            self.armed = true;
            Ok(())
        }

        fn disable_interrupt(&mut self) -> core::result::Result<(), Self::Error> {
            if self.fail {
                return Err(());
            }
            self.armed = false;
            Ok(())
        }
    }

    impl DigitalLine for FakeLine {
        type Error = Infallible;

        fn read_level(&mut self) -> core::result::Result<bool, Self::Error> {
            Ok(self.level)
        }

        fn write_level(&mut self, high: bool) -> core::result::Result<(), Self::Error> {
            self.level = high;
            Ok(())
        }

        fn drive_mode(&self) -> DriveMode {
            self.mode
        }

        fn set_drive_mode(&mut self, mode: DriveMode) -> core::result::Result<(), Self::Error> {
            self.mode = mode;
            self.mode_changes += 1;
            Ok(())
        }
    }

    impl InterruptSource for FakeLine {
        type Error = Infallible;

        fn enable_interrupt(&mut self) -> core::result::Result<(), Self::Error> {
            self.enables += 1;
            Ok(())
        }

        fn disable_interrupt(&mut self) -> core::result::Result<(), Self::Error> {
            self.disables += 1;
            Ok(())
        }
    }

    #[test]
    fn read_and_write_force_direction() {
        let mut line = FakeLine::default();

        line.write_forcing_output(true).unwrap();
        assert_eq!(line.drive_mode(), DriveMode::Output);

        assert!(line.read_forcing_input().unwrap());
        assert_eq!(line.drive_mode(), DriveMode::Input);
    }

    #[test]
    fn plain_accessors_leave_direction_alone() {
        let mut line = FakeLine::default();
        line.set_drive_mode(DriveMode::Output).unwrap();

        line.set_value(true).unwrap();
        line.set_low().unwrap();
        assert!(line.is_low().unwrap());
        line.set_high().unwrap();
        assert!(line.is_high().unwrap());
        assert!(line.value().unwrap());

        assert_eq!(line.drive_mode(), DriveMode::Output);
        assert_eq!(line.mode_changes, 1);
    }

    #[test]
    fn rising_edge_fires_only_on_high_level() {
        let hits = AtomicUsize::new(0);
        let listener = |event: ValueChanged| {
            assert!(event.level);
            assert_eq!(event.timestamp_us, 42);
            hits.fetch_add(1, Ordering::Relaxed);
        };

        let line: InterruptLine<'_, FakeLine> = InterruptLine::new(FakeLine::default());
        line.set_interrupt_edge(InterruptEdge::Rising);
        line.subscribe(&listener).unwrap();

        line.notify_edge(true, 42);
        line.notify_edge(false, 43);
        assert_eq!(hits.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn falling_edge_fires_only_on_low_level() {
        let hits = AtomicUsize::new(0);
        let listener = |event: ValueChanged| {
            assert!(!event.level);
            hits.fetch_add(1, Ordering::Relaxed);
        };

        let line: InterruptLine<'_, FakeLine> = InterruptLine::new(FakeLine::default());
        line.set_interrupt_edge(InterruptEdge::Falling);
        assert_eq!(line.interrupt_edge(), InterruptEdge::Falling);
        line.subscribe(&listener).unwrap();

        line.notify_edge(true, 1);
        line.notify_edge(false, 2);
        assert_eq!(hits.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn edge_none_never_fires() {
        let hits = AtomicUsize::new(0);
        let listener = |_: ValueChanged| {
            hits.fetch_add(1, Ordering::Relaxed);
        };

        let line: InterruptLine<'_, FakeLine> = InterruptLine::new(FakeLine::default());
        line.subscribe(&listener).unwrap();

        line.notify_edge(true, 1);
        line.notify_edge(false, 2);
        assert_eq!(hits.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn interrupt_source_follows_first_and_last_listener() {
        let first = |_: ValueChanged| {};
        let second = |_: ValueChanged| {};

        let mut line: InterruptLine<'_, FakeLine> = InterruptLine::new(FakeLine::default());
        let a = line.subscribe(&first).unwrap();
        let b = line.subscribe(&second).unwrap();
        assert_eq!(line.line_mut().enables, 1);

        line.unsubscribe(a).unwrap();
        assert_eq!(line.line_mut().disables, 0);
        assert_eq!(line.listener_count(), 1);

        line.unsubscribe(b).unwrap();
        assert_eq!(line.line_mut().enables, 1);
        assert_eq!(line.line_mut().disables, 1);
        assert_eq!(line.listener_count(), 0);
    }

    #[test]
    fn unsubscribing_twice_is_rejected_without_disabling_again() {
        let listener = |_: ValueChanged| {};

        let line: InterruptLine<'_, FakeLine> = InterruptLine::new(FakeLine::default());
        let id = line.subscribe(&listener).unwrap();
        line.unsubscribe(id).unwrap();

        assert_eq!(line.unsubscribe(id), Err(Error::UnknownListener));
        assert_eq!(line.release().disables, 1);
    }

    #[test]
    fn subscribe_past_capacity_fails() {
        let listener = |_: ValueChanged| {};

        let line: InterruptLine<'_, FakeLine, 1> = InterruptLine::new(FakeLine::default());
        line.subscribe(&listener).unwrap();

        assert_eq!(line.subscribe(&listener), Err(Error::ListenerCapacity));
        assert_eq!(line.listener_count(), 1);
        assert_eq!(line.with_line(|fake| fake.enables), 1);
    }

    #[test]
    fn failed_arm_leaves_no_listener_behind() {
        let listener = |_: ValueChanged| {};

        let line: InterruptLine<'_, FlakyLine> = InterruptLine::new(FlakyLine::default());
        line.with_line(|flaky| flaky.fail = true);
        assert_eq!(line.subscribe(&listener), Err(Error::Interface(())));
        assert_eq!(line.listener_count(), 0);

        line.with_line(|flaky| flaky.fail = false);
        line.subscribe(&listener).unwrap();
        assert_eq!(line.with_line(|flaky| flaky.enables), 1);
        assert!(line.with_line(|flaky| flaky.armed));
    }

    #[test]
    fn failed_disarm_keeps_listener_registered() {
        let hits = AtomicUsize::new(0);
        let listener = |_: ValueChanged| {
            hits.fetch_add(1, Ordering::Relaxed);
        };
        let other = |_: ValueChanged| {};

        let line: InterruptLine<'_, FlakyLine> = InterruptLine::new(FlakyLine::default());
        line.set_interrupt_edge(InterruptEdge::Rising);
        let id = line.subscribe(&listener).unwrap();

        line.with_line(|flaky| flaky.fail = true);
        assert_eq!(line.unsubscribe(id), Err(Error::Interface(())));
        assert_eq!(line.listener_count(), 1);
        assert!(line.with_line(|flaky| flaky.armed));

        line.notify_edge(true, 7);
        assert_eq!(hits.load(Ordering::Relaxed), 1);

        // A later subscriber must not arm the still-armed source again.
        line.with_line(|flaky| flaky.fail = false);
        line.subscribe(&other).unwrap();
        assert_eq!(line.with_line(|flaky| flaky.enables), 1);

        line.unsubscribe(id).unwrap();
        assert_eq!(line.listener_count(), 1);
        assert!(line.with_line(|flaky| flaky.armed));
    }

    #[test]
    fn listener_may_unsubscribe_itself_during_dispatch() {
        static LINE: InterruptLine<'static, FakeLine> = InterruptLine::new(FakeLine::new());
        static HITS: AtomicUsize = AtomicUsize::new(0);

        fn once(_: ValueChanged) {
            HITS.fetch_add(1, Ordering::Relaxed);
            LINE.unsubscribe(ListenerId(0)).unwrap();
        }

        LINE.set_interrupt_edge(InterruptEdge::Rising);
        assert_eq!(LINE.subscribe(&once), Ok(ListenerId(0)));

        LINE.notify_edge(true, 1);
        LINE.notify_edge(true, 2);
        assert_eq!(HITS.load(Ordering::Relaxed), 1);
        assert_eq!(LINE.listener_count(), 0);
        assert_eq!(LINE.with_line(|fake| fake.disables), 1);
    }

    #[test]
    fn interrupt_line_can_be_shared_with_an_interrupt_context() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<InterruptLine<'static, ()>>();
        assert_sync::<InterruptLine<'static, ()>>();
        assert_sync::<InterruptLine<'static, FakeLine, 8>>();
    }

    #[test]
    fn pin_line_drives_and_samples_hal_pin() {
        let expectations = [
            PinTransaction::set(State::High),
            PinTransaction::set(State::Low),
            PinTransaction::get(State::High),
        ];
        let mut line = PinLine::new(PinMock::new(&expectations), DriveMode::Input);

        line.write_forcing_output(true).unwrap();
        assert_eq!(line.drive_mode(), DriveMode::Output);
        line.set_low().unwrap();
        assert!(line.read_forcing_input().unwrap());
        assert_eq!(line.drive_mode(), DriveMode::Input);

        line.release().done();
    }
}
