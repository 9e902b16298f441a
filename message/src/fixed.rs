//! Fixed-point measurement values carried in a report.

use std::fmt::{
    Display,
    Formatter,
};

/// Temperature in hundredths of a degree Celsius.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Temperature(i16);

impl Temperature {
    #[inline]
    pub const fn from_centi_celsius(val: i16) -> Self {
        Self(val)
    }

    /// Rounds to the nearest hundredth and saturates at the representable range.
    #[inline]
    pub fn from_celsius(celsius: f32) -> Self {
        Self((celsius * 100.).round() as i16)
    }

    #[inline]
    pub const fn centi_celsius(self) -> i16 {
        self.0
    }

    #[inline]
    pub fn celsius(self) -> f32 {
        f32::from(self.0) / 100.
    }

    #[inline]
    pub fn fahrenheit(self) -> f32 {
        self.celsius() * 9. / 5. + 32.
    }
}

impl Display for Temperature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = i32::from(self.0).abs();

        write!(f, "{sign}{}.{:02}C", abs / 100, abs % 100)
    }
}

/// Lower and upper bound of a single lithium cell, used to map between the two
/// battery encodings.
pub const CELL_EMPTY_MV: u16 = 3200;
pub const CELL_FULL_MV: u16 = 4200;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Battery {
    Percent(u8),
    Millivolts(u16),
}

impl Battery {
    pub fn percent(self) -> u8 {
        match self {
            Self::Percent(p) => p.min(100),
            Self::Millivolts(mv) => {
                let span = u32::from(CELL_FULL_MV - CELL_EMPTY_MV);
                let above_empty = u32::from(mv.clamp(CELL_EMPTY_MV, CELL_FULL_MV) - CELL_EMPTY_MV);

                ((above_empty * 100 + span / 2) / span) as u8
            },
        }
    }

    pub fn millivolts(self) -> u16 {
        match self {
            Self::Percent(p) => {
                let span = CELL_FULL_MV - CELL_EMPTY_MV;
                CELL_EMPTY_MV + u16::from(p.min(100)) * (span / 100)
            },
            Self::Millivolts(mv) => mv,
        }
    }
}

impl Display for Battery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Millivolts(mv) => write!(f, "{}.{:02}V", mv / 1000, (mv % 1000) / 10),
        }
    }
}

/// Supply current in milliamps. `i16::MIN` is the on-air marker for "not measured",
/// so it is never a valid reading.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Current(i16);

impl Current {
    pub const NOT_MEASURED: i16 = i16::MIN;

    #[inline]
    pub const fn from_milliamps(ma: i16) -> Self {
        if ma == Self::NOT_MEASURED {
            Self(Self::NOT_MEASURED + 1)
        } else {
            Self(ma)
        }
    }

    #[inline]
    pub const fn milliamps(self) -> i16 {
        self.0
    }
}

impl Display for Current {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}mA", self.0)
    }
}
