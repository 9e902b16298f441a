//! Wire-level types shared by sensor nodes, base stations and local receivers.
//!
//! Nothing in here does I/O or cryptography: these are the values that the codec
//! packs and the runtime authenticates.

mod address;
mod bytes_wrap;
pub mod error;
pub mod fixed;
pub mod format;
pub mod header;
mod header_packet;
mod local;
mod magic_value;
mod packet;
mod report;

pub use address::{
    NodeAddress,
    ReportId,
    SequenceNumber,
};
pub use bytes_wrap::BytesWrap;
pub use error::DecodeError;
pub use fixed::{
    Battery,
    Current,
    Temperature,
};
pub use format::{
    BatteryField,
    FormatError,
    TagLength,
    WireFormat,
};
pub use header::{
    LocalHeader,
    ReportHeader,
};
pub use header_packet::HeaderPacket;
pub use local::LocalFrame;
pub use magic_value::MagicValue;
pub use packet::{
    AuthenticatedPacket,
    Tag,
};
pub use report::SensorReport;
