//! Gateway relay and its counterpart on the local radio.
//!
//! A gateway station rebroadcasts every report it accepts off the long-range
//! link onto the local link, wrapped in a [`message::LocalFrame`]. The relay
//! does no cryptography of its own: the receiving station verifies the sensor's
//! tag end to end.

use tokio_retry::{
    strategy::FixedInterval,
    Retry,
};

use codec::LocalFrameCodec;
use message::{
    LocalFrame,
    NodeAddress,
};
use net::{
    Frame,
    RadioTransmitter,
};

use crate::{
    Accepted,
    Admission,
    DedupeWindow,
    Path,
    Rejection,
};

/// Retries after the first failed local transmission.
pub const RELAY_RETRIES: usize = 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RelayOutcome {
    Forwarded,
    AlreadyRelayed,
    Dropped,
}

pub struct Relay<T> {
    radio:   T,
    address: NodeAddress,
    codec:   LocalFrameCodec,
    window:  DedupeWindow,
}

impl<T> Relay<T>
where
    T: RadioTransmitter + Send + Sync,
{
    pub fn new(radio: T, address: NodeAddress, window: DedupeWindow) -> Self {
        Self {
            radio,
            address,
            codec: LocalFrameCodec,
            window,
        }
    }

    /// Rebroadcast an accepted report unless it was already relayed. A report
    /// is only remembered once it has actually gone out, so a dropped report
    /// can still be relayed if it arrives again.
    #[tracing::instrument(skip_all, fields(id = %accepted.id()))]
    pub async fn forward(&mut self, accepted: &Accepted) -> RelayOutcome {
        let id = accepted.id();

        if self.window.contains(&id) {
            tracing::debug!("already relayed");
            return RelayOutcome::AlreadyRelayed;
        }

        let frame = LocalFrame::broadcast(self.address, accepted.raw.clone());
        let bytes = match self.codec.encode_frame(&frame) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "unable to frame report for local radio");
                return RelayOutcome::Dropped;
            },
        };

        let radio = &self.radio;
        let payload = &bytes[..];
        let result = Retry::spawn(FixedInterval::from_millis(0).take(RELAY_RETRIES), move || {
            radio.transmit(payload)
        })
        .await;

        match result {
            Ok(()) => {
                self.window.insert(id);
                tracing::debug!(len = bytes.len(), "relayed to local radio");

                RelayOutcome::Forwarded
            },
            Err(e) => {
                tracing::warn!(error = %e, "local transmission failed after retry, dropping from relay");

                RelayOutcome::Dropped
            },
        }
    }

    #[inline]
    pub fn address(&self) -> NodeAddress {
        self.address
    }

    #[inline]
    pub fn radio(&self) -> &T {
        &self.radio
    }
}

/// Local-radio side of the bridge. Unwraps frames addressed here, verifies the
/// inner packet and suppresses copies already surfaced.
#[derive(Debug)]
pub struct LocalReceiver {
    address:   NodeAddress,
    admission: Admission,
    codec:     LocalFrameCodec,
    window:    DedupeWindow,
}

impl LocalReceiver {
    pub fn new(address: NodeAddress, admission: Admission, window: DedupeWindow) -> Self {
        Self {
            address,
            admission,
            codec: LocalFrameCodec,
            window,
        }
    }

    pub fn admit(&mut self, frame: Frame) -> Result<Accepted, Rejection> {
        let local = self.codec.decode_frame(&frame.payload)?;

        if !local.is_for(self.address) {
            return Err(Rejection::Misaddressed(local.destination()));
        }

        let raw = local.payload.bytes().clone();
        let packet = self.admission.authenticate(&raw)?;
        let id = packet.id();

        if self.window.contains(&id) {
            return Err(Rejection::Duplicate(id));
        }

        self.admission.track(&packet)?;
        self.window.insert(id);

        Ok(Accepted {
            packet,
            raw,
            link: frame.link,
            path: Path::Relayed {
                relay: local.relay(),
            },
        })
    }

    #[inline]
    pub fn address(&self) -> NodeAddress {
        self.address
    }
}
