use std::time::Instant;

use echo_api::Record;

use crate::error::BenchError;
use crate::policy::FailurePolicy;
use crate::report::{Mode, Report, Tally};
use crate::transport::Transport;

/// Последовательный прогон: `iterations` вызовов по одному.
///
/// `total` — wall clock от начала первого вызова до конца последнего,
/// среднее — `total / iterations`.
pub async fn run_sequential(
    transport: &dyn Transport,
    record: &Record,
    iterations: usize,
    policy: FailurePolicy,
) -> Result<Report, BenchError> {
    if iterations == 0 {
        return Err(BenchError::InvalidParams("iterations must be > 0".into()));
    }

    let mut tally = Tally::default();
    let start = Instant::now();

    for i in 0..iterations {
        tally.issued += 1;
        match transport.call(record).await {
            Ok(exchange) => tally.observe(&exchange),
            Err(source) => match policy {
                FailurePolicy::Abort => {
                    return Err(BenchError::CallFailed {
                        transport: transport.name().to_string(),
                        source,
                    });
                }
                FailurePolicy::Skip => {
                    tracing::warn!(transport = transport.name(), iteration = i, error = %source, "call failed");
                    tally.failed += 1;
                }
            },
        }
    }

    let total = start.elapsed();
    tracing::debug!(
        transport = transport.name(),
        iterations,
        completed = tally.completed,
        total = ?total,
        "sequential run complete"
    );
    Ok(tally.into_report(transport.name(), Mode::Sequential, iterations, total))
}
