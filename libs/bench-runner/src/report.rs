use std::fmt;
use std::time::Duration;

use crate::transport::Exchange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Sequential,
    Concurrent { concurrency: usize },
}

/// Результат одного прогона против одного транспорта.
///
/// `total` — wall clock от первого до последнего вызова в последовательном
/// режиме и сумма латентностей отдельных вызовов в конкурентном.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub label: String,
    pub mode: Mode,
    /// Запрошенное число итераций.
    pub requested: usize,
    /// Реально начатые вызовы (в конкурентном режиме `C * (N / C)`).
    pub issued: usize,
    /// Вызовы, получившие ответ (echo или отказ сервиса).
    pub completed: usize,
    /// Из `completed` — ответы с ошибкой клиента.
    pub rejected: usize,
    /// Сбои транспорта, пропущенные по `FailurePolicy::Skip`.
    pub failed: usize,
    pub total: Duration,
}

impl Report {
    /// Заменить метку транспорта на метку прогона.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// `total / requested` — среднее, которое печатает бенчмарк.
    pub fn avg_per_requested(&self) -> Duration {
        div_duration(self.total, self.requested).unwrap_or_default()
    }

    /// `total / completed`; `None`, если ни один вызов не завершился.
    pub fn avg_per_completed(&self) -> Option<Duration> {
        div_duration(self.total, self.completed)
    }
}

fn div_duration(total: Duration, n: usize) -> Option<Duration> {
    if n == 0 {
        return None;
    }
    let nanos = total.as_nanos() / n as u128;
    Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Sequential => {
                writeln!(
                    f,
                    "{} Total Time for {} iterations: {:?}",
                    self.label, self.requested, self.total
                )?;
                writeln!(f, "{} Average Time per Call: {:?}", self.label, self.avg_per_requested())?;
            }
            Mode::Concurrent { concurrency } => {
                writeln!(f, "{} - Total Time: {:?}", self.label, self.total)?;
                writeln!(
                    f,
                    "{} - Average Time per Call: {:?}",
                    self.label,
                    self.avg_per_requested()
                )?;
                writeln!(f, "{} - Workers: {concurrency}", self.label)?;
            }
        }
        match self.avg_per_completed() {
            Some(avg) => write!(f, "{} - Average per Completed Call: {avg:?}", self.label)?,
            None => write!(f, "{} - Average per Completed Call: n/a", self.label)?,
        }
        write!(
            f,
            " ({}/{} completed, {} issued, {} rejected, {} failed)",
            self.completed, self.requested, self.issued, self.rejected, self.failed
        )
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tally — счётчики одного прогона / одного worker'а
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Tally {
    pub issued: usize,
    pub completed: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl Tally {
    pub fn observe(&mut self, exchange: &Exchange) {
        self.completed += 1;
        if let Exchange::Rejected { status } = exchange {
            self.rejected += 1;
            tracing::debug!(status, "call rejected by service");
        }
    }

    pub fn merge(&mut self, other: Tally) {
        self.issued += other.issued;
        self.completed += other.completed;
        self.rejected += other.rejected;
        self.failed += other.failed;
    }

    pub fn into_report(self, label: &str, mode: Mode, requested: usize, total: Duration) -> Report {
        Report {
            label: label.to_string(),
            mode,
            requested,
            issued: self.issued,
            completed: self.completed,
            rejected: self.rejected,
            failed: self.failed,
            total,
        }
    }
}
