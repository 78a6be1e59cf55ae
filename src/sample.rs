use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use crate::heading::heading_degrees;
use crate::raw_data::RawData;

/// Completed measurement
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    angle: f64,
    x: i16,
    y: i16,
    z: i16,
}

impl Sample {
    /// Build a sample from a decoded block, `None` if any axis overflowed
    pub fn from_raw(raw: RawData) -> Option<Self> {
        if !raw.is_valid() {
            return None;
        }

        Some(Self {
            angle: heading_degrees(raw.x as f64, raw.y as f64),
            x: raw.x,
            y: raw.y,
            z: raw.z,
        })
    }

    /// Heading in the XY plane, degrees in `[0, 360)`
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn x(&self) -> i16 {
        self.x
    }

    pub fn y(&self) -> i16 {
        self.y
    }

    pub fn z(&self) -> i16 {
        self.z
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Angle: {:.2} X: {} Y: {} Z: {}",
            self.angle, self.x, self.y, self.z
        )
    }
}

/// Receives every valid sample, synchronously, from the context that
/// handled the data-ready interrupt.
pub trait MeasurementObserver {
    fn measurement_complete(&mut self, sample: Sample);
}

/// No consumer registered, samples are dropped
#[derive(Copy, Clone, Debug, Default)]
pub struct Discard;

impl MeasurementObserver for Discard {
    fn measurement_complete(&mut self, _sample: Sample) {}
}

/// Single-slot channel, a newer sample replaces one not yet taken
impl<M: RawMutex> MeasurementObserver for &Signal<M, Sample> {
    fn measurement_complete(&mut self, sample: Sample) {
        self.signal(sample);
    }
}
