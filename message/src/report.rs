use std::fmt::{
    Display,
    Formatter,
};

use crate::{
    Battery,
    Current,
    NodeAddress,
    ReportId,
    SequenceNumber,
    Temperature,
};

/// One measurement cycle from one sensor. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SensorReport {
    node:        NodeAddress,
    seq:         SequenceNumber,
    temperature: Temperature,
    battery:     Battery,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current:     Option<Current>,
}

impl SensorReport {
    #[inline]
    pub fn new(
        node: NodeAddress,
        seq: SequenceNumber,
        temperature: Temperature,
        battery: Battery,
    ) -> Self {
        Self {
            node,
            seq,
            temperature,
            battery,
            current: None,
        }
    }

    #[inline]
    pub fn with_current(self, current: impl Into<Option<Current>>) -> Self {
        Self {
            current: current.into(),
            ..self
        }
    }

    #[inline]
    pub fn node(&self) -> NodeAddress {
        self.node
    }

    #[inline]
    pub fn seq(&self) -> SequenceNumber {
        self.seq
    }

    #[inline]
    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    #[inline]
    pub fn battery(&self) -> Battery {
        self.battery
    }

    #[inline]
    pub fn current(&self) -> Option<Current> {
        self.current
    }

    #[inline]
    pub fn id(&self) -> ReportId {
        ReportId {
            node: self.node,
            seq:  self.seq,
        }
    }
}

impl Display for SensorReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} {}", self.id(), self.temperature, self.battery)?;

        if let Some(current) = self.current {
            write!(f, " {current}")?;
        }

        Ok(())
    }
}
