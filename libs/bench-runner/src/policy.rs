use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Что делать, если вызов упал на уровне транспорта
/// (connection refused, timeout, gRPC status).
///
/// Ответ сервиса с ошибкой клиента (HTTP 4xx) — не сбой транспорта:
/// такой вызов завершён и учитывается в замере.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Первый сбой прерывает прогон и возвращается как ошибка.
    Abort,
    /// Сбой логируется, замер пропускается, прогон продолжается.
    Skip,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => f.write_str("abort"),
            FailurePolicy::Skip => f.write_str("skip"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(format!("unknown failure policy '{other}' (expected abort|skip)")),
        }
    }
}
