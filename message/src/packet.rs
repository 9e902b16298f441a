use std::fmt::{
    Debug,
    Display,
    Formatter,
};

use smallvec::SmallVec;

use crate::{
    ReportId,
    SensorReport,
    TagLength,
};

/// Truncated keyed hash over a packet's report bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Tag(SmallVec<[u8; TagLength::MAX]>);

impl Tag {
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for Tag {
    #[inline]
    fn from(bytes: &[u8]) -> Self {
        Self(SmallVec::from_slice(bytes))
    }
}

impl AsRef<[u8]> for Tag {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tag(0x{})", hex::encode(&self.0))
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

/// The unit sent over the long-range radio.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AuthenticatedPacket {
    report: SensorReport,
    tag:    Tag,
}

impl AuthenticatedPacket {
    #[inline]
    pub fn new(report: SensorReport, tag: Tag) -> Self {
        Self {
            report,
            tag,
        }
    }

    #[inline]
    pub fn report(&self) -> &SensorReport {
        &self.report
    }

    #[inline]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    #[inline]
    pub fn id(&self) -> ReportId {
        self.report.id()
    }

    #[inline]
    pub fn into_parts(self) -> (SensorReport, Tag) {
        (self.report, self.tag)
    }
}

impl Display for AuthenticatedPacket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (tag: 0x{})", self.report, self.tag)
    }
}
