use std::{
    future::Future,
    io,
    time::Duration,
};

/// Failures of the local hardware. Unlike a [`crate::Rejection`] these are
/// fatal to the running role.
#[derive(Debug, thiserror::Error)]
pub enum HardwareFault {
    #[error("radio: {0}")]
    Radio(#[source] io::Error),

    #[error("sensor bus: {0}")]
    Bus(#[source] io::Error),

    #[error("{what} did not finish within {limit:?}")]
    Watchdog {
        what:  &'static str,
        limit: Duration,
    },
}

/// Bound a hardware operation that may wedge instead of failing.
pub async fn watchdog<F>(what: &'static str, limit: Duration, fut: F) -> Result<F::Output, HardwareFault>
where
    F: Future,
{
    tokio::time::timeout(limit, fut).await.map_err(|_| {
        tracing::error!(what, ?limit, "watchdog expired");

        HardwareFault::Watchdog {
            what,
            limit,
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_on_hang() {
        let result = watchdog("sensor sampling", Duration::from_secs(3), futures::future::pending::<()>()).await;

        assert!(matches!(
            result,
            Err(HardwareFault::Watchdog {
                what: "sensor sampling",
                ..
            })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn passes_through() {
        let result = watchdog("radio init", Duration::from_secs(3), async { 5 }).await;
        assert_eq!(result.unwrap(), 5);
    }
}
