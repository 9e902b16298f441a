use packed_struct::prelude::*;

use crate::MagicValue;

/// Fixed-width leading fields of every sensor report.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PackedStruct)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "7", endian = "msb")]
pub struct ReportHeader {
    pub node:        u8,
    pub seq:         u32,
    pub temperature: i16,
}

impl ReportHeader {
    pub const SIZE: usize = 7;
}

pub type LocalMagic = MagicValue<0x5a>;

/// Addressing prepended to an authenticated packet on the local radio.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PackedStruct)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "3")]
pub struct LocalHeader {
    #[packed_field(size_bytes = "1")]
    pub magic:       LocalMagic,
    pub destination: u8,
    pub relay:       u8,
}

impl LocalHeader {
    pub const SIZE: usize = 3;
}
