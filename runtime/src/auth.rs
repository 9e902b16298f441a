//! Truncated HMAC-SHA1 tags over the canonical report bytes.
//!
//! This is HOTP with the moving counter replaced by the report itself: the
//! sequence number is part of the signed message, so one tag authenticates both
//! the measurement and its freshness claim.

use std::{
    fmt::{
        Debug,
        Formatter,
    },
    str::FromStr,
};

use hmac::{
    Hmac,
    Mac,
};
use sha1::Sha1;

use message::{
    Tag,
    TagLength,
};

type HmacSha1 = Hmac<Sha1>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authentication tag mismatch")]
    BadTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("shared key is empty")]
    Empty,

    #[error("shared key of {0} bytes rejected by hmac")]
    Rejected(usize),
}

/// Pre-shared secret, identical on every node and station of one domain.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedKey(Vec<u8>);

impl SharedKey {
    /// Placeholder used when no key is configured. Anyone can forge reports
    /// under it.
    pub const PLACEHOLDER: &'static [u8] = b"Please set your own HMAC_KEY";

    pub fn new(key: impl Into<Vec<u8>>) -> Result<Self, KeyError> {
        let key = key.into();

        if key.is_empty() {
            return Err(KeyError::Empty);
        }

        Ok(Self(key))
    }

    pub fn placeholder() -> Self {
        Self(Self::PLACEHOLDER.to_vec())
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.0 == Self::PLACEHOLDER
    }
}

impl FromStr for SharedKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.as_bytes())
    }
}

impl Debug for SharedKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SharedKey(<{} bytes>)", self.0.len())
    }
}

/// Keyed signer/verifier. The HMAC key schedule runs once here and is cloned
/// for every message.
#[derive(Clone)]
pub struct Authenticator {
    keyed:   HmacSha1,
    tag_len: TagLength,
}

impl Authenticator {
    pub fn new(key: &SharedKey, tag_len: TagLength) -> Result<Self, KeyError> {
        let keyed = <HmacSha1 as Mac>::new_from_slice(&key.0)
            .map_err(|_| KeyError::Rejected(key.0.len()))?;

        Ok(Self {
            keyed,
            tag_len,
        })
    }

    #[inline]
    pub fn tag_len(&self) -> TagLength {
        self.tag_len
    }

    pub fn sign(&self, message: &[u8]) -> Tag {
        let mut mac = self.keyed.clone();
        mac.update(message);

        let digest = mac.finalize().into_bytes();
        Tag::from(&digest[..self.tag_len.get()])
    }

    /// Constant-time check of a received tag against the recomputed one.
    pub fn verify(&self, message: &[u8], tag: &[u8]) -> Result<(), AuthError> {
        if tag.len() != self.tag_len.get() {
            return Err(AuthError::BadTag);
        }

        let mut mac = self.keyed.clone();
        mac.update(message);

        mac.verify_truncated_left(tag).map_err(|_| AuthError::BadTag)
    }
}

impl Debug for Authenticator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Authenticator(hmac-sha1, {} byte tags)", self.tag_len)
    }
}
