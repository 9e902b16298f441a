//! Radio seams. The protocol core only ever sees whole datagrams plus whatever
//! link-quality metadata the transceiver reports.

pub use datagram::{
    channel,
    ChannelReceiver,
    DatagramOps,
    Frame,
    LinkQuality,
    RadioReceiver,
    RadioTransmitter,
    MAX_PAYLOAD,
};

mod datagram;
