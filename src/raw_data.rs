/// One reading of the three axes, in raw counts.
///
/// The device returns the data registers in X, Z, Y order. Each axis is
/// decoded as `-32767 + (raw & 0x7FFF)` when the top bit is set, which is
/// off by one from two's complement. Consumers rely on this range, so keep it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawData {
    pub(crate) x: i16,
    pub(crate) y: i16,
    pub(crate) z: i16,
    overflow: bool,
}

impl RawData {
    pub const SIZE: usize = 6;

    /// Value reported on an axis whose ADC overflowed
    pub const OVERFLOW: i16 = -4096;

    /// Register pattern the device writes on overflow
    const OVERFLOW_WORD: u16 = 0xF000;

    pub fn x(&self) -> i16 {
        self.x
    }

    pub fn y(&self) -> i16 {
        self.y
    }

    pub fn z(&self) -> i16 {
        self.z
    }

    pub fn new(x: i16, y: i16, z: i16) -> Self {
        let overflow = [x, y, z].contains(&Self::OVERFLOW);

        Self { x, y, z, overflow }
    }

    /// `false` when any axis hit the overflow sentinel
    pub fn is_valid(&self) -> bool {
        !self.overflow
    }

    fn decode_axis(word: u16) -> i16 {
        let magnitude = (word & 0x7FFF) as i16;

        if word & 0x8000 != 0 {
            magnitude - 32767
        } else {
            magnitude
        }
    }
}

impl From<[u8; Self::SIZE]> for RawData {
    fn from(value: [u8; Self::SIZE]) -> Self {
        let words = [
            u16::from_be_bytes([value[0], value[1]]),
            u16::from_be_bytes([value[2], value[3]]),
            u16::from_be_bytes([value[4], value[5]]),
        ];

        let x = Self::decode_axis(words[0]);
        let z = Self::decode_axis(words[1]);
        let y = Self::decode_axis(words[2]);

        let overflow =
            words.contains(&Self::OVERFLOW_WORD) || [x, y, z].contains(&Self::OVERFLOW);

        Self { x, y, z, overflow }
    }
}
