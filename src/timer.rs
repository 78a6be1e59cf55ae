use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant};

/// Periodic timer driving continuous measurements.
///
/// The owner of the timer calls [`crate::compass::Compass::on_timer_tick`] once
/// per elapsed interval while the timer is running.
pub trait PeriodicTimer {
    fn start(&mut self);

    fn stop(&mut self);

    fn is_running(&self) -> bool;

    fn interval(&self) -> Duration;

    /// Takes effect from the next `start`
    fn set_interval(&mut self, interval: Duration);
}

/// Deadline based timer for the embassy time driver.
///
/// It only keeps the schedule, [`crate::dispatch::run`] sleeps until the
/// deadline. Any schedule change raises `wake` so that a pending sleep is
/// re-evaluated.
pub struct TickerTimer<'a, M: RawMutex> {
    interval: Duration,
    deadline: Option<Instant>,
    wake: &'a Signal<M, ()>,
}

impl<'a, M: RawMutex> TickerTimer<'a, M> {
    pub fn new(interval: Duration, wake: &'a Signal<M, ()>) -> Self {
        Self {
            interval,
            deadline: None,
            wake,
        }
    }

    /// Instant of the next tick, `None` when stopped
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn wake_signal(&self) -> &'a Signal<M, ()> {
        self.wake
    }

    /// Consume the tick scheduled at `at`.
    ///
    /// Returns `false` if the schedule changed since `at` was read, in which
    /// case the tick must not be delivered. Intervals missed while the tick
    /// was late are skipped rather than delivered back to back.
    pub(crate) fn fire(&mut self, at: Instant) -> bool {
        if self.deadline != Some(at) {
            return false;
        }

        let now = Instant::now();
        let next = self.after(at);

        self.deadline = Some(if next > now { next } else { self.after(now) });

        true
    }

    fn after(&self, instant: Instant) -> Instant {
        instant.checked_add(self.interval).unwrap_or(Instant::MAX)
    }
}

impl<M: RawMutex> PeriodicTimer for TickerTimer<'_, M> {
    fn start(&mut self) {
        if self.deadline.is_none() {
            self.deadline = Some(self.after(Instant::now()));
            self.wake.signal(());
        }
    }

    fn stop(&mut self) {
        if self.deadline.take().is_some() {
            self.wake.signal(());
        }
    }

    fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }
}
