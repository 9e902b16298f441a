use codec::PacketCodec;
use message::WireFormat;

use crate::{
    Admission,
    Authenticator,
    KeyError,
    SharedKey,
};

/// Everything two parties must agree on before a report can cross between them.
#[derive(Clone, Debug)]
pub struct Protocol {
    pub format: WireFormat,
    pub key:    SharedKey,
}

impl Protocol {
    #[inline]
    pub fn new(format: WireFormat, key: SharedKey) -> Self {
        Self {
            format,
            key,
        }
    }

    #[inline]
    pub fn codec(&self) -> PacketCodec {
        PacketCodec::new(self.format)
    }

    #[inline]
    pub fn authenticator(&self) -> Result<Authenticator, KeyError> {
        Authenticator::new(&self.key, self.format.tag_len)
    }

    /// Fresh verifier with empty sequence state.
    pub fn admission(&self) -> Result<Admission, KeyError> {
        Ok(Admission::new(self.codec(), self.authenticator()?))
    }
}
