use bytes::Bytes;
use packed_struct::{
    PackedStructSlice,
    PackingError,
    PackingResult,
};

/// Opaque payload bytes that pack verbatim into whatever space is left.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Into, derive_more::AsRef,
)]
pub struct BytesWrap(Bytes);

impl BytesWrap {
    #[inline]
    pub fn bytes(&self) -> &Bytes {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Bytes> for BytesWrap {
    #[inline]
    fn from(b: Bytes) -> Self {
        Self(b)
    }
}

impl PackedStructSlice for BytesWrap {
    fn pack_to_slice(&self, output: &mut [u8]) -> PackingResult<()> {
        if output.len() != self.0.len() {
            return Err(PackingError::BufferSizeMismatch {
                expected: self.0.len(),
                actual:   output.len(),
            });
        }

        output.copy_from_slice(self.0.as_ref());
        Ok(())
    }

    fn unpack_from_slice(src: &[u8]) -> PackingResult<Self> {
        Ok(Self(Bytes::copy_from_slice(src)))
    }

    fn packed_bytes_size(opt_self: Option<&Self>) -> PackingResult<usize> {
        let slf = opt_self.ok_or(PackingError::InstanceRequiredForSize)?;

        Ok(slf.0.len())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pack_requires_exact_buffer() {
        let b = BytesWrap::from(Bytes::from_static(&[1, 2, 3, 4]));

        let mut exact = [0u8; 4];
        assert_eq!(b.pack_to_slice(&mut exact), Ok(()));
        assert_eq!(exact, [1, 2, 3, 4]);

        let mut short = [0u8; 3];
        assert!(b.pack_to_slice(&mut short).is_err());

        assert_eq!(b.pack_to_vec(), Ok(vec![1, 2, 3, 4]));
    }
}
