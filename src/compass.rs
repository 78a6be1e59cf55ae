//! Measurement state machine.
//!
//! [`Compass`] takes single measurements on request, or periodic ones from a
//! [`PeriodicTimer`]. The device signals finished conversions on its DRDY
//! line, the platform then calls [`Compass::on_data_ready`], which reads and
//! decodes the data registers and hands valid samples to the observer.
//!
//! All methods take `&mut self`. Sharing the controller between the
//! application, the timer and the interrupt handler goes through one lock, see
//! [`crate::dispatch`].

use embassy_time::Duration;
use embedded_hal_async::i2c::I2c;

use crate::register_map::{Gain, Mode};
use crate::sample::{Discard, MeasurementObserver, Sample};
use crate::timer::PeriodicTimer;
use crate::Hmc5883;

/// Interval between continuous measurements unless configured otherwise
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Idle,
    /// Single measurement requested, waiting for data ready
    AwaitingSingle,
    Continuous,
}

/// Settings held for the controller's lifetime, changed only through its setters
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SensorConfig {
    pub gain: Gain,
    pub interval: Duration,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            gain: Gain::default(),
            interval: DEFAULT_INTERVAL,
        }
    }
}

pub struct Compass<T, K, O = Discard> {
    dev: Hmc5883<T>,
    timer: K,
    observer: O,
    state: State,
    config: SensorConfig,
}

impl<T, K> Compass<T, K, Discard>
where
    T: I2c,
    K: PeriodicTimer,
{
    /// Samples are discarded until an observer is attached with
    /// [`Compass::with_observer`]. The timer interval becomes the
    /// continuous measurement interval.
    pub fn new(dev: Hmc5883<T>, timer: K) -> Self {
        let config = SensorConfig {
            interval: timer.interval(),
            ..SensorConfig::default()
        };

        Self {
            dev,
            timer,
            observer: Discard,
            state: State::Idle,
            config,
        }
    }
}

impl<T, K, O> Compass<T, K, O>
where
    T: I2c,
    K: PeriodicTimer,
    O: MeasurementObserver,
{
    pub fn with_observer<N: MeasurementObserver>(self, observer: N) -> Compass<T, K, N> {
        Compass {
            dev: self.dev,
            timer: self.timer,
            observer,
            state: self.state,
            config: self.config,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn config(&self) -> SensorConfig {
        self.config
    }

    pub fn device(&self) -> &Hmc5883<T> {
        &self.dev
    }

    /// Direct register access, bypasses the state machine
    pub fn device_mut(&mut self) -> &mut Hmc5883<T> {
        &mut self.dev
    }

    pub fn timer(&self) -> &K {
        &self.timer
    }

    pub(crate) fn timer_mut(&mut self) -> &mut K {
        &mut self.timer
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Start a single conversion.
    ///
    /// Returns once the mode write is done, the result is delivered from
    /// [`Compass::on_data_ready`].
    pub async fn request_measurement(&mut self) -> Result<(), T::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("Request measurement in state {:?}", self.state);

        self.dev.set_mode(Mode::SingleShot).await?;

        if self.state == State::Idle {
            self.state = State::AwaitingSingle;
        }

        Ok(())
    }

    pub async fn set_gain(&mut self, gain: Gain) -> Result<(), T::Error> {
        self.dev.set_gain(gain).await?;
        self.config.gain = gain;

        Ok(())
    }

    /// Last gain written
    pub fn gain(&self) -> Gain {
        self.config.gain
    }

    pub fn start_continuous_measurements(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::trace!(
            "Start continuous measurements every {} ms",
            self.config.interval.as_millis()
        );

        self.state = State::Continuous;
        self.timer.start();
    }

    pub fn start_continuous_measurements_every(&mut self, interval: Duration) {
        self.set_continuous_measurement_interval(interval);
        self.start_continuous_measurements();
    }

    /// No further timer driven request is made once this returns. Calling it
    /// when not running is a no-op apart from the state becoming idle.
    pub fn stop_continuous_measurements(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::trace!("Stop continuous measurements");

        self.timer.stop();
        self.state = State::Idle;
    }

    pub fn continuous_measurement_interval(&self) -> Duration {
        self.config.interval
    }

    /// A running timer is restarted so the next tick is one new interval away.
    /// A pending measurement is left untouched.
    pub fn set_continuous_measurement_interval(&mut self, interval: Duration) {
        self.config.interval = interval;

        if self.timer.is_running() {
            self.timer.stop();
            self.timer.set_interval(interval);
            self.timer.start();
        } else {
            self.timer.set_interval(interval);
        }
    }

    /// Periodic timer callback
    pub async fn on_timer_tick(&mut self) -> Result<(), T::Error> {
        if self.state != State::Continuous {
            self.timer.stop();
            return Ok(());
        }

        self.request_measurement().await
    }

    /// Data-ready interrupt callback.
    ///
    /// Reads the data registers whatever the state. A bus error is returned
    /// as is and leaves the state unchanged. A block with an overflowed axis
    /// ends the cycle without notification.
    pub async fn on_data_ready(&mut self) -> Result<(), T::Error> {
        let raw = self.dev.read_raw_data().await?;

        if self.state == State::AwaitingSingle {
            self.state = State::Idle;
        }

        match Sample::from_raw(raw) {
            Some(sample) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("Measurement complete: {:?}", sample);

                self.observer.measurement_complete(sample);
            }
            None => {
                #[cfg(feature = "defmt")]
                defmt::debug!("Invalid data read, measurement discarded: {:?}", raw);
            }
        }

        Ok(())
    }
}
