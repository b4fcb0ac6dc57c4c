use std::time::{Duration, Instant};

use crate::error::{BenchError, TransportError};
use crate::transport::Transport;

const MIN_BACKOFF: Duration = Duration::from_millis(10);
const MAX_BACKOFF: Duration = Duration::from_millis(200);

/// Опрашивать `transport.probe()` до первого успеха или до `timeout`.
///
/// Возвращает время ожидания.
pub async fn wait_ready(transport: &dyn Transport, timeout: Duration) -> Result<Duration, BenchError> {
    let start = Instant::now();
    let mut backoff = MIN_BACKOFF;

    loop {
        let remaining = timeout.saturating_sub(start.elapsed());
        let err = match tokio::time::timeout(remaining, transport.probe()).await {
            Ok(Ok(())) => {
                let waited = start.elapsed();
                tracing::info!(transport = transport.name(), waited = ?waited, "service ready");
                return Ok(waited);
            }
            Ok(Err(e)) => e,
            Err(_) => TransportError::Timeout(timeout),
        };

        if start.elapsed() + backoff >= timeout {
            return Err(BenchError::NotReady {
                transport: transport.name().to_string(),
                waited: start.elapsed(),
                source: err,
            });
        }
        tracing::debug!(transport = transport.name(), error = %err, "not ready yet");
        tokio::time::sleep(backoff).await;
        backoff = (backoff * 2).min(MAX_BACKOFF);
    }
}
