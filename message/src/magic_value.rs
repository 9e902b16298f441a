use std::{
    cmp::Ordering,
    hash::Hasher,
};

use packed_struct::{
    prelude::*,
    PackedStructInfo,
    PackingResult,
};

/// A single constant byte that must be present at its position in a frame.
#[derive(Copy, Clone, Debug, Eq, Ord, Default)]
pub struct MagicValue<const C: u8>;

impl<const C: u8> MagicValue<C> {
    pub const INSTANCE: Self = Self;
    pub const VALUE: u8 = C;
}

impl<const C: u8> PackedStruct for MagicValue<C> {
    type ByteArray = [u8; 1];

    #[inline]
    fn pack(&self) -> PackingResult<Self::ByteArray> {
        Ok([C])
    }

    fn unpack(src: &Self::ByteArray) -> PackingResult<Self> {
        if src[0] == C {
            Ok(Self)
        } else {
            tracing::debug!(expected = C, got = src[0], "invalid magic byte");
            Err(PackingError::InvalidValue)
        }
    }
}

impl<const C: u8> PackedStructInfo for MagicValue<C> {
    #[inline]
    fn packed_bits() -> usize {
        8
    }
}

impl<const C: u8, const D: u8> PartialEq<MagicValue<D>> for MagicValue<C> {
    #[inline]
    fn eq(&self, _other: &MagicValue<D>) -> bool {
        C == D
    }
}

impl<const C: u8, const D: u8> PartialOrd<MagicValue<D>> for MagicValue<C> {
    fn partial_cmp(&self, _other: &MagicValue<D>) -> Option<Ordering> {
        C.partial_cmp(&D)
    }
}

impl<const C: u8> std::hash::Hash for MagicValue<C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        C.hash(state)
    }
}
