use std::fmt::{
    Display,
    Formatter,
};

use bytes::Bytes;

use crate::{
    header::LocalMagic,
    BytesWrap,
    HeaderPacket,
    LocalHeader,
    NodeAddress,
};

/// An authenticated packet as carried on the local radio. The payload is the
/// unmodified long-range packet, tag included.
pub type LocalFrame = HeaderPacket<LocalHeader, BytesWrap>;

impl HeaderPacket<LocalHeader, BytesWrap> {
    pub fn new(destination: NodeAddress, relay: NodeAddress, payload: Bytes) -> Self {
        Self {
            header:  LocalHeader {
                magic:       LocalMagic::INSTANCE,
                destination: destination.get(),
                relay:       relay.get(),
            },
            payload: payload.into(),
        }
    }

    #[inline]
    pub fn broadcast(relay: NodeAddress, payload: Bytes) -> Self {
        Self::new(NodeAddress::BROADCAST, relay, payload)
    }

    #[inline]
    pub fn relay(&self) -> NodeAddress {
        NodeAddress::new(self.header.relay)
    }

    #[inline]
    pub fn destination(&self) -> NodeAddress {
        NodeAddress::new(self.header.destination)
    }

    /// Whether a receiver at `address` should look at this frame at all.
    #[inline]
    pub fn is_for(&self, address: NodeAddress) -> bool {
        let dest = self.destination();
        dest.is_broadcast() || dest == address
    }
}

impl Display for HeaderPacket<LocalHeader, BytesWrap> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "relay {} -> {} / payload: 0x{}",
            self.relay(),
            self.destination(),
            hex::encode(self.payload.bytes())
        )
    }
}
