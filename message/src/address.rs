use std::{
    fmt::{
        Display,
        Formatter,
    },
    ops::RangeInclusive,
};

/// Identity of a node inside one shared-key domain.
///
/// Sensors and stations draw from disjoint ranges: `0x01..=0x7f` for sensors,
/// `0x80..=0xfe` for base stations. `0x00` is reserved and `0xff` is broadcast.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::From,
    derive_more::Into,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct NodeAddress(u8);

impl NodeAddress {
    pub const BROADCAST: Self = Self(0xff);
    pub const SENSORS: RangeInclusive<u8> = 0x01..=0x7f;
    pub const STATIONS: RangeInclusive<u8> = 0x80..=0xfe;

    #[inline]
    pub const fn new(val: u8) -> Self {
        Self(val)
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_sensor(self) -> bool {
        Self::SENSORS.contains(&self.0)
    }

    #[inline]
    pub fn is_station(self) -> bool {
        Self::STATIONS.contains(&self.0)
    }

    #[inline]
    pub fn is_broadcast(self) -> bool {
        self == Self::BROADCAST
    }
}

/// Per-node report counter. Strictly increasing for the lifetime of a sensor's
/// current sequence origin.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::From,
    derive_more::Into,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct SequenceNumber(u32);

impl SequenceNumber {
    #[inline]
    pub const fn new(val: u32) -> Self {
        Self(val)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// The pair that identifies one report across retransmissions and relay paths.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReportId {
    pub node: NodeAddress,
    pub seq:  SequenceNumber,
}

impl Display for ReportId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "node {} [seq {}]", self.node, self.seq)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn address_domains_are_disjoint() {
        for raw in 0..=u8::MAX {
            let addr = NodeAddress::new(raw);
            assert!(!(addr.is_sensor() && addr.is_station()), "{raw:#x} in both domains");
        }

        assert!(!NodeAddress::new(0).is_sensor());
        assert!(!NodeAddress::BROADCAST.is_station());
    }
}
