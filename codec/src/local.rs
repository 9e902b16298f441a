use bytes::Bytes;
use packed_struct::{
    PackedStructSlice,
    PackingError,
};

use message::{
    header::LocalMagic,
    DecodeError,
    LocalFrame,
    LocalHeader,
};

use crate::Error;

/// Wraps authenticated packets in local-radio addressing. The payload is opaque
/// here and checked by whoever unwraps it.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LocalFrameCodec;

impl LocalFrameCodec {
    pub fn encode_frame(&self, frame: &LocalFrame) -> Result<Bytes, Error> {
        Ok(frame.pack_to_vec()?.into())
    }

    pub fn decode_frame(&self, src: &[u8]) -> Result<LocalFrame, DecodeError> {
        tracing::trace!(magic = LocalMagic::VALUE, len = src.len(), "decoding local frame");

        if src.len() <= LocalHeader::SIZE {
            return Err(DecodeError::WrongLength {
                expected: LocalHeader::SIZE + 1,
                got:      src.len(),
            });
        }

        LocalFrame::unpack_from_slice(src).map_err(|e| match e {
            PackingError::InvalidValue => DecodeError::out_of_range("magic", src[0]),
            _ => DecodeError::WrongLength {
                expected: LocalHeader::SIZE + 1,
                got:      src.len(),
            },
        })
    }
}
