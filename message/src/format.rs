//! Operator-tunable layout parameters. Every node and station in one key domain
//! must agree on these or nothing will verify.

use std::{
    fmt::{
        Display,
        Formatter,
    },
    str::FromStr,
};

use crate::header::ReportHeader;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("tag length {0} outside 4..=20 bytes")]
    TagLength(usize),

    #[error("unknown battery encoding {0:?} (expected percent or millivolts)")]
    BatteryField(String),

    #[error(transparent)]
    Parse(#[from] std::num::ParseIntError),
}

/// Number of leading HMAC bytes kept as the authentication tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagLength(u8);

impl TagLength {
    pub const DEFAULT: Self = Self(4);
    pub const MAX: usize = 20;
    pub const MIN: usize = 4;

    pub fn new(len: usize) -> Result<Self, FormatError> {
        if !(Self::MIN..=Self::MAX).contains(&len) {
            return Err(FormatError::TagLength(len));
        }

        Ok(Self(len as u8))
    }

    #[inline]
    pub const fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for TagLength {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for TagLength {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim().parse()?)
    }
}

impl Display for TagLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BatteryField {
    #[default]
    Percent,
    Millivolts,
}

impl BatteryField {
    #[inline]
    pub const fn width(self) -> usize {
        match self {
            Self::Percent => 1,
            Self::Millivolts => 2,
        }
    }
}

impl FromStr for BatteryField {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percent" | "pct" => Ok(Self::Percent),
            "millivolts" | "mv" => Ok(Self::Millivolts),
            other => Err(FormatError::BatteryField(other.to_string())),
        }
    }
}

impl Display for BatteryField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Percent => write!(f, "percent"),
            Self::Millivolts => write!(f, "millivolts"),
        }
    }
}

/// Canonical packet layout:
///
/// `node(1) | seq(4) | temperature(2) | battery(1 or 2) | [current(2)] | tag(N)`
///
/// All integers big-endian. The tag covers every byte before it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct WireFormat {
    pub tag_len: TagLength,
    pub battery: BatteryField,
    pub current: bool,
}

impl WireFormat {
    pub const CURRENT_WIDTH: usize = 2;

    /// Size of the signed portion of a packet.
    #[inline]
    pub const fn report_len(&self) -> usize {
        let current = if self.current { Self::CURRENT_WIDTH } else { 0 };

        ReportHeader::SIZE + self.battery.width() + current
    }

    #[inline]
    pub const fn packet_len(&self) -> usize {
        self.report_len() + self.tag_len.get()
    }
}

impl Display for WireFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} byte packets (battery: {}, current: {}, tag: {} bytes)",
            self.packet_len(),
            self.battery,
            self.current,
            self.tag_len
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tag_length_bounds() {
        assert!(TagLength::new(3).is_err());
        assert!(TagLength::new(21).is_err());
        assert_eq!(TagLength::new(8).map(TagLength::get), Ok(8));
        assert_eq!("4".parse::<TagLength>(), Ok(TagLength::DEFAULT));
        assert!(matches!("x".parse::<TagLength>(), Err(FormatError::Parse(_))));
    }

    #[test]
    fn packet_lengths() {
        let default = WireFormat::default();
        assert_eq!(default.report_len(), 8);
        assert_eq!(default.packet_len(), 12);

        let wide = WireFormat {
            tag_len: TagLength::new(8).unwrap(),
            battery: BatteryField::Millivolts,
            current: true,
        };
        assert_eq!(wide.report_len(), 11);
        assert_eq!(wide.packet_len(), 19);
    }

    #[test]
    fn battery_field_names() {
        assert_eq!("mV".parse::<BatteryField>(), Ok(BatteryField::Millivolts));
        assert_eq!("percent".parse::<BatteryField>(), Ok(BatteryField::Percent));
        assert!("volts".parse::<BatteryField>().is_err());
    }
}
