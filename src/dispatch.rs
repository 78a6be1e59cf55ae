//! Event pump for embassy.
//!
//! The controller is kept in an async [`Mutex`]. Data-ready edges, timer
//! ticks and application calls each lock it for their whole step, so bus
//! transfers never interleave and a stop observed under the lock cancels
//! any tick that has not been delivered yet.
//!
//! ```ignore
//! static WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();
//!
//! let timer = TickerTimer::new(DEFAULT_INTERVAL, &WAKE);
//! let compass = Mutex::new(Compass::new(Hmc5883::new(i2c), timer).with_observer(&SAMPLES));
//!
//! // in a task of its own
//! let error = dispatch::run(&compass, &mut drdy).await;
//!
//! // anywhere else
//! compass.lock().await.start_continuous_measurements();
//! ```

use core::convert::Infallible;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Instant, Timer};
use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::I2c;

use crate::compass::Compass;
use crate::sample::MeasurementObserver;
use crate::timer::{PeriodicTimer, TickerTimer};

/// Failure surfaced to the task running the pump
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError<E, P> {
    /// Bus transfer failed
    Transport(E),
    /// Data-ready line could not be awaited
    Interrupt(P),
}

/// Serve data-ready edges and timer ticks until one of them fails.
pub async fn run<M, R, T, O, P>(
    compass: &Mutex<M, Compass<T, TickerTimer<'_, R>, O>>,
    data_ready: &mut P,
) -> Result<Infallible, DispatchError<T::Error, P::Error>>
where
    M: RawMutex,
    R: RawMutex,
    T: I2c,
    O: MeasurementObserver,
    P: Wait,
{
    match select(run_data_ready(compass, data_ready), run_timer(compass)).await {
        Either::First(result) => result,
        Either::Second(result) => result.map_err(DispatchError::Transport),
    }
}

/// Handle every rising edge on the data-ready line
pub async fn run_data_ready<M, K, T, O, P>(
    compass: &Mutex<M, Compass<T, K, O>>,
    data_ready: &mut P,
) -> Result<Infallible, DispatchError<T::Error, P::Error>>
where
    M: RawMutex,
    K: PeriodicTimer,
    T: I2c,
    O: MeasurementObserver,
    P: Wait,
{
    loop {
        data_ready
            .wait_for_rising_edge()
            .await
            .map_err(DispatchError::Interrupt)?;

        compass
            .lock()
            .await
            .on_data_ready()
            .await
            .map_err(DispatchError::Transport)?;
    }
}

/// Deliver ticks of the controller's [`TickerTimer`]
pub async fn run_timer<M, R, T, O>(
    compass: &Mutex<M, Compass<T, TickerTimer<'_, R>, O>>,
) -> Result<Infallible, T::Error>
where
    M: RawMutex,
    R: RawMutex,
    T: I2c,
    O: MeasurementObserver,
{
    loop {
        let (deadline, wake) = {
            let locked = compass.lock().await;
            (locked.timer().deadline(), locked.timer().wake_signal())
        };

        let Some(at) = deadline else {
            wake.wait().await;
            continue;
        };

        if let Either::Second(()) = select(Timer::at(at), wake.wait()).await {
            continue;
        }

        deliver_tick(compass, at).await?;
    }
}

/// Hand the tick scheduled at `at` to the controller.
///
/// Returns `false` without touching the controller when the timer was
/// stopped or rescheduled after `at` was read.
pub async fn deliver_tick<M, R, T, O>(
    compass: &Mutex<M, Compass<T, TickerTimer<'_, R>, O>>,
    at: Instant,
) -> Result<bool, T::Error>
where
    M: RawMutex,
    R: RawMutex,
    T: I2c,
    O: MeasurementObserver,
{
    let mut locked = compass.lock().await;

    if !locked.timer_mut().fire(at) {
        return Ok(false);
    }

    locked.on_timer_tick().await?;

    Ok(true)
}
