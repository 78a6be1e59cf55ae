#![cfg_attr(not(test), no_std)]

pub mod compass;
pub mod dispatch;
pub mod heading;
pub mod raw_data;
pub mod register_map;
pub mod sample;
pub mod timer;

#[cfg(test)]
mod mock;

use embedded_hal_async::i2c::{I2c, SevenBitAddress};
use raw_data::RawData;
use register_map::{ConfigA, Gain, Mode, Register};

pub use compass::{Compass, SensorConfig, State};
pub use sample::{Discard, MeasurementObserver, Sample};
pub use timer::{PeriodicTimer, TickerTimer};

const I2C_ADDR: SevenBitAddress = 0x1E;

const IDENTIFICATION: [u8; 3] = *b"H43";

/// Content of the status register
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    /// New data is available in the output registers
    pub ready: bool,
    /// Output registers are locked until all six are read
    pub locked: bool,
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        Self {
            ready: value & 1 != 0,
            locked: value & (1 << 1) != 0,
        }
    }
}

pub struct Hmc5883<T> {
    dev: T,
    address: SevenBitAddress,
    last_mode: Option<Mode>,
}

impl<T> Hmc5883<T>
where
    T: I2c,
{
    /// Use driver with default I2C address
    pub fn new(dev: T) -> Self {
        Self {
            dev,
            address: I2C_ADDR,
            last_mode: None,
        }
    }

    /// Compatible part answering on another address
    pub fn with_address(self, address: SevenBitAddress) -> Self {
        Self { address, ..self }
    }

    /// Give back the bus
    pub fn release(self) -> T {
        self.dev
    }

    /// Check identification registers, the device answers `H43`
    pub async fn detected(&mut self) -> Result<bool, T::Error> {
        let mut id = [0; 3];

        self.read_registers(Register::IdentA, &mut id).await?;

        Ok(id == IDENTIFICATION)
    }

    pub async fn read_register(&mut self, register: Register) -> Result<u8, T::Error> {
        let mut buf = [0; 1];

        self.dev
            .write_read(self.address, &[register as u8], &mut buf)
            .await?;

        Ok(buf[0])
    }

    /// Read consecutive registers in one transfer, the device auto-increments
    /// its register pointer
    pub async fn read_registers(
        &mut self,
        register: Register,
        buf: &mut [u8],
    ) -> Result<(), T::Error> {
        self.dev
            .write_read(self.address, &[register as u8], buf)
            .await
    }

    pub async fn write_register(
        &mut self,
        register: Register,
        value: u8,
    ) -> Result<(), T::Error> {
        self.dev.write(self.address, &[register as u8, value]).await
    }

    pub async fn read_status(&mut self) -> Result<Status, T::Error> {
        let value = self.read_register(Register::Status).await?;

        Ok(value.into())
    }

    /// Averaging, output rate and bias
    pub async fn set_config_a(&mut self, config: ConfigA) -> Result<(), T::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("Apply configuration A: {:?}", config);

        self.write_register(Register::ConfigA, config.bits()).await
    }

    pub async fn set_gain(&mut self, gain: Gain) -> Result<(), T::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("Set gain: {:?}", gain);

        self.write_register(Register::ConfigB, gain as u8).await
    }

    pub async fn set_mode(&mut self, mode: Mode) -> Result<(), T::Error> {
        self.write_register(Register::Mode, mode as u8).await?;
        self.last_mode = Some(mode);

        Ok(())
    }

    /// Last mode successfully written, `None` before the first write
    pub fn last_mode(&self) -> Option<Mode> {
        self.last_mode
    }

    /// Read the six data output registers
    pub async fn read_raw_data(&mut self) -> Result<RawData, T::Error> {
        let mut data = [0; RawData::SIZE];

        self.read_registers(Register::DataOutXMsb, &mut data).await?;

        Ok(data.into())
    }
}
