use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use echo_api::Record;

use crate::error::BenchError;
use crate::policy::FailurePolicy;
use crate::report::{Mode, Report, Tally};
use crate::transport::Transport;

/// Конкурентный прогон: `concurrency` задач, каждая делает
/// `iterations / concurrency` вызовов (остаток от деления не выполняется).
///
/// Латентность каждого вызова уходит в bounded канал ёмкостью `iterations`.
/// После join всех задач канал вычитывается и суммируется; среднее в отчёте
/// делится на запрошенное `iterations`.
pub async fn run_concurrent(
    transport: Arc<dyn Transport>,
    record: &Record,
    iterations: usize,
    concurrency: usize,
    policy: FailurePolicy,
) -> Result<Report, BenchError> {
    if iterations == 0 {
        return Err(BenchError::InvalidParams("iterations must be > 0".into()));
    }
    if concurrency == 0 {
        return Err(BenchError::InvalidParams("concurrency must be > 0".into()));
    }

    let per_worker = iterations / concurrency;
    if per_worker * concurrency != iterations {
        tracing::debug!(
            iterations,
            concurrency,
            dropped = iterations - per_worker * concurrency,
            "iterations not divisible by concurrency"
        );
    }

    let (tx, mut rx) = mpsc::channel::<Duration>(iterations);
    let cancel = CancellationToken::new();

    let handles: Vec<JoinHandle<Result<Tally, BenchError>>> = (0..concurrency)
        .map(|worker| {
            let transport = transport.clone();
            let record = record.clone();
            let tx = tx.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                run_worker(worker, transport, record, per_worker, policy, tx, cancel).await
            })
        })
        .collect();
    drop(tx);

    // Барьер: канал читается только после завершения всех worker'ов.
    // При ошибке или панике одного worker'а остальные отменяются,
    // но join'ятся все.
    let mut tally = Tally::default();
    let mut first_err = None;
    for h in handles {
        match h.await {
            Ok(Ok(t)) => tally.merge(t),
            Ok(Err(e)) => {
                cancel.cancel();
                first_err.get_or_insert(e);
            }
            Err(e) => {
                cancel.cancel();
                first_err.get_or_insert(BenchError::Join(e));
            }
        }
    }
    if let Some(e) = first_err {
        return Err(e);
    }

    let mut total = Duration::ZERO;
    while let Some(latency) = rx.recv().await {
        total += latency;
    }

    tracing::debug!(
        transport = transport.name(),
        iterations,
        concurrency,
        issued = tally.issued,
        completed = tally.completed,
        total = ?total,
        "concurrent run complete"
    );
    Ok(tally.into_report(transport.name(), Mode::Concurrent { concurrency }, iterations, total))
}

async fn run_worker(
    worker: usize,
    transport: Arc<dyn Transport>,
    record: Record,
    calls: usize,
    policy: FailurePolicy,
    tx: mpsc::Sender<Duration>,
    cancel: CancellationToken,
) -> Result<Tally, BenchError> {
    let mut tally = Tally::default();

    for _ in 0..calls {
        if cancel.is_cancelled() {
            break;
        }
        tally.issued += 1;
        let start = Instant::now();
        match transport.call(&record).await {
            Ok(exchange) => {
                let latency = start.elapsed();
                tally.observe(&exchange);
                // Ёмкость канала >= числа вызовов, send не ждёт.
                if tx.send(latency).await.is_err() {
                    break;
                }
            }
            Err(source) => match policy {
                FailurePolicy::Skip => {
                    tracing::warn!(transport = transport.name(), worker, error = %source, "call failed");
                    tally.failed += 1;
                }
                FailurePolicy::Abort => {
                    cancel.cancel();
                    return Err(BenchError::CallFailed {
                        transport: transport.name().to_string(),
                        source,
                    });
                }
            },
        }
    }

    Ok(tally)
}
