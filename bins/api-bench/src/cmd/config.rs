use std::net::SocketAddr;
use std::time::Duration;

use clap::Args;
use serde::Deserialize;

use bench_runner::FailurePolicy;
use echo_api::Record;

use super::error::AppError;

const DEFAULT_ITERATIONS: usize = 100;
const DEFAULT_CONCURRENCY: usize = 10;
const DEFAULT_REST_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_GRPC_ADDR: &str = "127.0.0.1:50051";
const DEFAULT_READY_TIMEOUT_MS: u64 = 2000;

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub iterations: Option<usize>,
    pub concurrency: Option<usize>,
    pub rest_addr: Option<SocketAddr>,
    pub grpc_addr: Option<SocketAddr>,
    pub ready_timeout_ms: Option<u64>,
    pub sequential_policy: Option<FailurePolicy>,
    pub concurrent_policy: Option<FailurePolicy>,
    pub record: Option<RecordConfig>,
}

/// Запись, которую шлёт бенчмарк. Незаданные поля — из `Record::sample()`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordConfig {
    pub id: Option<String>,
    pub name: Option<String>,
    pub value: Option<i32>,
}

pub fn parse_config(content: &str, path: &str) -> Result<Config, AppError> {
    toml::from_str(content).map_err(|e| AppError::Config(format!("bad config {path}: {e}")))
}

pub fn load_config(path: &str) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read config {path}: {e}")))?;
    parse_config(&content, path)
}

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Args, Clone, Debug, Default)]
pub struct BenchArgs {
    /// Путь к TOML конфигу (отсутствующий файл — значения по умолчанию)
    #[arg(long, default_value = "api-bench.toml", env = "API_BENCH_CONFIG")]
    pub config: String,

    /// Число запросов на каждый прогон
    #[arg(long, env = "API_BENCH_ITERATIONS")]
    pub iterations: Option<usize>,

    /// Число конкурентных worker'ов
    #[arg(long, env = "API_BENCH_CONCURRENCY")]
    pub concurrency: Option<usize>,

    /// Адрес REST сервиса (0 = любой свободный порт)
    #[arg(long)]
    pub rest_addr: Option<SocketAddr>,

    /// Адрес gRPC сервиса
    #[arg(long)]
    pub grpc_addr: Option<SocketAddr>,

    /// Сколько ждать готовности сервисов, мс
    #[arg(long)]
    pub ready_timeout_ms: Option<u64>,

    /// Сбой транспорта в последовательном прогоне: abort | skip
    #[arg(long)]
    pub sequential_policy: Option<FailurePolicy>,

    /// Сбой транспорта в конкурентном прогоне: abort | skip
    #[arg(long)]
    pub concurrent_policy: Option<FailurePolicy>,
}

// ═══════════════════════════════════════════════════════════════
//  Effective — merged config
// ═══════════════════════════════════════════════════════════════

/// Итоговая конфигурация после мержа: defaults < config.toml < env/CLI
#[derive(Debug, Clone, PartialEq)]
pub struct Effective {
    pub iterations: usize,
    pub concurrency: usize,
    pub rest_addr: SocketAddr,
    pub grpc_addr: SocketAddr,
    pub ready_timeout: Duration,
    pub sequential_policy: FailurePolicy,
    pub concurrent_policy: FailurePolicy,
    pub record: Record,
}

impl Effective {
    pub fn new(args: &BenchArgs) -> Result<Self, AppError> {
        let cfg = match load_config(&args.config) {
            Ok(c) => c,
            Err(e) => {
                if std::path::Path::new(&args.config).exists() {
                    return Err(e);
                }
                tracing::debug!(config = %args.config, "config file not found, using defaults");
                Config::default()
            }
        };
        Self::merge(args, cfg)
    }

    pub fn merge(args: &BenchArgs, cfg: Config) -> Result<Self, AppError> {
        let iterations = args.iterations.or(cfg.iterations).unwrap_or(DEFAULT_ITERATIONS);
        let concurrency = args.concurrency.or(cfg.concurrency).unwrap_or(DEFAULT_CONCURRENCY);
        if iterations == 0 {
            return Err(AppError::Config("iterations must be > 0".into()));
        }
        if concurrency == 0 {
            return Err(AppError::Config("concurrency must be > 0".into()));
        }

        let sample = Record::sample();
        let record = match cfg.record {
            Some(r) => Record {
                id: r.id.unwrap_or(sample.id),
                name: r.name.unwrap_or(sample.name),
                value: r.value.unwrap_or(sample.value),
            },
            None => sample,
        };

        Ok(Self {
            iterations,
            concurrency,
            rest_addr: args.rest_addr.or(cfg.rest_addr).unwrap_or_else(|| default_addr(DEFAULT_REST_ADDR)),
            grpc_addr: args.grpc_addr.or(cfg.grpc_addr).unwrap_or_else(|| default_addr(DEFAULT_GRPC_ADDR)),
            ready_timeout: Duration::from_millis(
                args.ready_timeout_ms
                    .or(cfg.ready_timeout_ms)
                    .unwrap_or(DEFAULT_READY_TIMEOUT_MS),
            ),
            sequential_policy: args
                .sequential_policy
                .or(cfg.sequential_policy)
                .unwrap_or(FailurePolicy::Abort),
            concurrent_policy: args
                .concurrent_policy
                .or(cfg.concurrent_policy)
                .unwrap_or(FailurePolicy::Skip),
            record,
        })
    }
}

fn default_addr(s: &str) -> SocketAddr {
    s.parse().unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 0)))
}
