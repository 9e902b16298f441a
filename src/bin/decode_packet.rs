use std::{
    io,
    io::Read,
};

use structopt::StructOpt;

use codec::PacketCodec;
use loratel::options::ProtocolOptions;
use runtime::Protocol;

#[derive(Debug, Clone, structopt::StructOpt)]
#[structopt(about = "decode one sensor packet from stdin (default raw binary format)")]
pub struct Mode {
    #[structopt(
        long,
        help = "interpret stdin as hex (can be space and/or newline separated, does not strip 0x)"
    )]
    hex: bool,

    #[structopt(flatten)]
    protocol: ProtocolOptions,
}

fn main() -> eyre::Result<()> {
    let mode = Mode::from_args();
    loratel::trace::init();

    let buf = if mode.hex {
        let mut s = String::new();
        io::stdin().read_to_string(&mut s)?;

        hex::decode(s.trim().replace(&[' ', '\t', '\n', '\r'][..], ""))?
    } else {
        let mut buf = vec![];
        io::stdin().read_to_end(&mut buf)?;

        buf
    };

    let format = mode.protocol.format();
    let codec = PacketCodec::new(format);

    println!("FORMAT\n\t{}", format);

    let packet = codec.decode(&buf)?;
    println!("REPORT\n\t{}", packet.report());
    println!("TAG\n\t{}", packet.tag());

    if let Some(key) = mode.protocol.key.clone() {
        let (message, tag) = codec.split(&buf)?;
        let verdict = match Protocol::new(format, key).authenticator()?.verify(message, tag) {
            Ok(()) => "ok".to_owned(),
            Err(e) => e.to_string(),
        };

        println!("VERIFY\n\t{}", verdict);
    }

    Ok(())
}
