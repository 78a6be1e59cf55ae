#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    ConfigA = 0x00,
    ConfigB = 0x01,
    Mode = 0x02,
    DataOutXMsb = 0x03,
    DataOutXLsb = 0x04,
    DataOutZMsb = 0x05,
    DataOutZLsb = 0x06,
    DataOutYMsb = 0x07,
    DataOutYLsb = 0x08,
    Status = 0x09,
    IdentA = 0x0A,
    IdentB = 0x0B,
    IdentC = 0x0C,
}

/// Operating mode, written to the mode register
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Continuous = 0b00,
    SingleShot = 0b01,
    Idle = 0b10,
    Sleep = 0b11,
}

/// Field range and resolution, written to configuration register B.
///
/// Decoding does not depend on the selected gain, raw counts are reported as-is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// ±0.88 Ga
    Gain1 = 0x00,
    /// ±1.3 Ga
    #[default]
    Gain2 = 0x20,
    /// ±1.9 Ga
    Gain3 = 0x40,
    /// ±2.5 Ga
    Gain4 = 0x60,
    /// ±4.0 Ga
    Gain5 = 0x80,
    /// ±4.7 Ga
    Gain6 = 0xA0,
    /// ±5.6 Ga
    Gain7 = 0xC0,
    /// ±8.1 Ga
    Gain8 = 0xE0,
}

impl Gain {
    /// Sensitivity in LSB per gauss
    pub fn lsb_per_gauss(&self) -> u16 {
        match self {
            Gain::Gain1 => 1370,
            Gain::Gain2 => 1090,
            Gain::Gain3 => 820,
            Gain::Gain4 => 660,
            Gain::Gain5 => 440,
            Gain::Gain6 => 390,
            Gain::Gain7 => 330,
            Gain::Gain8 => 230,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SamplesAveraged {
    #[default]
    Samples1 = 0b00,
    Samples2 = 0b01,
    Samples4 = 0b10,
    Samples8 = 0b11,
}

/// Output rate used in continuous mode
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataOutputRate {
    Hz0_75 = 0b000,
    Hz1_5 = 0b001,
    Hz3 = 0b010,
    Hz7_5 = 0b011,
    #[default]
    Hz15 = 0b100,
    Hz30 = 0b101,
    Hz75 = 0b110,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementBias {
    #[default]
    Normal = 0b00,
    Positive = 0b01,
    Negative = 0b10,
}

/// Configuration register A content
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigA {
    pub samples: SamplesAveraged,
    pub rate: DataOutputRate,
    pub bias: MeasurementBias,
}

impl ConfigA {
    pub fn bits(&self) -> u8 {
        (self.samples as u8) << 5 | (self.rate as u8) << 2 | self.bias as u8
    }
}
