use tracing_subscriber::{
    fmt::format::FmtSpan,
    prelude::*,
    EnvFilter,
};

use util::bootstrap;

/// Log targets emitted by this workspace. Library crates log under their lib
/// names, the binaries under their own.
const TARGETS: &[&str] = &[
    "loratel",
    "decode_packet",
    "loratel_message",
    "loratel_codec",
    "loratel_net",
    "loratel_runtime",
];

pub fn init() {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE);

    let stderr_layer = {
        cfg_if::cfg_if! {
            if #[cfg(debug_assertions)] {
                stderr_layer.pretty()
            } else {
                stderr_layer.json().with_current_span(false)
            }
        }
    };

    let level_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(default_directive(cfg!(debug_assertions)))
    });
    bootstrap!("enabling tracing with filter directive: {}", level_filter);

    tracing_subscriber::registry().with(level_filter).with(stderr_layer).init();
}

/// Dependencies stay at `warn`/`info`; our own targets get one level more.
fn default_directive(verbose: bool) -> String {
    let (global, ours) = match verbose {
        true => ("info", "debug"),
        false => ("warn", "info"),
    };

    std::iter::once(global.to_owned())
        .chain(TARGETS.iter().map(|target| format!("{}={}", target, ours)))
        .collect::<Vec<_>>()
        .join(",")
}
