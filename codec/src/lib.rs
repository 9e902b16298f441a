mod local;
mod packet;

pub use self::{
    local::LocalFrameCodec,
    packet::PacketCodec,
};

/// Failure to lay a value out on the wire. Decoding failures are
/// [`message::DecodeError`]s instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("packing: {0}")]
    Packing(#[from] packed_struct::PackingError),
}
