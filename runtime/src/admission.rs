use bytes::Bytes;

use codec::PacketCodec;
use message::{
    AuthenticatedPacket,
    DecodeError,
    NodeAddress,
    ReportId,
    SensorReport,
    Tag,
};
use net::{
    Frame,
    LinkQuality,
};

use crate::{
    AuthError,
    Authenticator,
    SeqError,
    SequenceState,
};

/// How an accepted report reached this station.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Path {
    Direct,
    Relayed { relay: NodeAddress },
}

/// A report that passed every check, with the exact bytes it arrived as.
#[derive(Clone, Debug, PartialEq)]
pub struct Accepted {
    pub packet: AuthenticatedPacket,
    pub raw:    Bytes,
    pub link:   LinkQuality,
    pub path:   Path,
}

impl Accepted {
    #[inline]
    pub fn report(&self) -> &SensorReport {
        self.packet.report()
    }

    #[inline]
    pub fn id(&self) -> ReportId {
        self.packet.id()
    }
}

/// Why a frame was not surfaced. None of these stop a station.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("malformed: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Replay(#[from] SeqError),

    #[error("{0} already surfaced")]
    Duplicate(ReportId),

    #[error("frame addressed to {0}")]
    Misaddressed(NodeAddress),
}

/// Verifies raw packets and owns the replay state for one station.
#[derive(Debug, Clone)]
pub struct Admission {
    codec:     PacketCodec,
    auth:      Authenticator,
    sequences: SequenceState,
}

impl Admission {
    pub fn new(codec: PacketCodec, auth: Authenticator) -> Self {
        Self {
            codec,
            auth,
            sequences: SequenceState::new(),
        }
    }

    /// Length, then tag, then field ranges. Sequence state is not consulted.
    pub fn authenticate(&self, raw: &[u8]) -> Result<AuthenticatedPacket, Rejection> {
        let (message, tag) = self.codec.split(raw)?;
        self.auth.verify(message, tag)?;

        let report = self.codec.decode_report(message)?;

        Ok(AuthenticatedPacket::new(report, Tag::from(tag)))
    }

    #[inline]
    pub fn track(&mut self, packet: &AuthenticatedPacket) -> Result<(), SeqError> {
        let report = packet.report();
        self.sequences.check_and_update(report.node(), report.seq())
    }

    pub fn admit(&mut self, frame: Frame) -> Result<Accepted, Rejection> {
        let packet = self.authenticate(&frame.payload)?;
        self.track(&packet)?;

        Ok(Accepted {
            packet,
            raw: frame.payload,
            link: frame.link,
            path: Path::Direct,
        })
    }

    #[inline]
    pub fn sequences(&self) -> &SequenceState {
        &self.sequences
    }
}

#[cfg(test)]
mod test {
    use message::SequenceNumber;

    use super::*;
    use crate::test_util::{
        protocol,
        signed,
    };

    #[test]
    fn admits_then_rejects_replay() {
        let protocol = protocol();
        let mut admission = protocol.admission().unwrap();

        let frame = Frame::new(signed(&protocol, 1, 1001));
        let accepted = admission.admit(frame.clone()).unwrap();

        assert_eq!(accepted.path, Path::Direct);
        assert_eq!(accepted.raw, frame.payload);
        assert_eq!(accepted.report().seq(), SequenceNumber::new(1001));

        assert!(matches!(admission.admit(frame), Err(Rejection::Replay(_))));
    }

    #[test]
    fn bad_tag_leaves_state_alone() {
        let protocol = protocol();
        let mut admission = protocol.admission().unwrap();

        let mut forged = signed(&protocol, 1, 7).to_vec();
        let last = forged.len() - 1;
        forged[last] ^= 0x01;

        assert_eq!(
            admission.admit(Frame::new(forged)),
            Err(Rejection::Auth(AuthError::BadTag))
        );
        assert!(admission.sequences().is_empty());
    }

    #[test]
    fn length_checked_before_tag() {
        let protocol = protocol();
        let mut admission = protocol.admission().unwrap();

        let short = signed(&protocol, 1, 7).slice(1..);
        assert!(matches!(
            admission.admit(Frame::new(short)),
            Err(Rejection::Decode(DecodeError::WrongLength { .. }))
        ));
    }

    #[test]
    fn authenticate_does_not_track() {
        let protocol = protocol();
        let mut admission = protocol.admission().unwrap();
        let raw = signed(&protocol, 3, 10);

        admission.authenticate(&raw).unwrap();
        admission.authenticate(&raw).unwrap();
        assert!(admission.admit(Frame::new(raw)).is_ok());
    }
}
