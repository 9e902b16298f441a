use std::{
    future::Future,
    io,
};

/// Register for SIGINT and SIGTERM now and return a future that resolves on
/// the first of them. Must be called from inside the runtime.
#[cfg(unix)]
pub fn shutdown() -> io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{
        signal,
        SignalKind,
    };

    let mut ints = signal(SignalKind::interrupt())?;
    let mut terms = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = ints.recv() => tracing::info!("interrupted"),
            _ = terms.recv() => tracing::info!("terminated"),
        }
    })
}

#[cfg(not(unix))]
pub fn shutdown() -> io::Result<impl Future<Output = ()>> {
    Ok(async {
        util::trace_catch!(tokio::signal::ctrl_c().await, "waiting for ctrl-c");
        tracing::info!("interrupted");
    })
}
