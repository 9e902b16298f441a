//! Host-side glue for the `loratel` binaries: option parsing, tracing, signal
//! handling, console output and host sensor sources.

pub use codec;
pub use message;
pub use net;
pub use runtime;
pub use util::{
    self,
    build,
};

pub mod console;
pub mod options;
pub mod sensors;
pub mod signals;
pub mod trace;
