use std::future::Future;
use std::pin::Pin;

use tonic::transport::{Channel, Endpoint};

use echo_api::rpc::api_client::ApiClient;
use echo_api::{proto, JsonFormat, Record, WireFormat};

use crate::error::TransportError;

/// Итог завершённого вызова.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exchange {
    /// Сервис вернул запись.
    Echoed(Record),
    /// Сервис ответил ошибкой клиента (напр. HTTP 400).
    Rejected { status: u16 },
}

pub type CallFuture<'a> = Pin<Box<dyn Future<Output = Result<Exchange, TransportError>> + Send + 'a>>;
pub type ProbeFuture<'a> = Pin<Box<dyn Future<Output = Result<(), TransportError>> + Send + 'a>>;

/// Клиентская сторона одного протокола.
///
/// Реализации держат своё соединение/клиент и передаются в runner'ы явно.
pub trait Transport: Send + Sync {
    /// Метка для отчётов ("REST API", "RPC API").
    fn name(&self) -> &str;

    /// Один request/response.
    fn call<'a>(&'a self, record: &'a Record) -> CallFuture<'a>;

    /// Проверка готовности сервиса (без учёта в замерах).
    ///
    /// Не должна прогревать клиент `call()`: оба транспорта начинают
    /// замер с холодного соединения.
    fn probe(&self) -> ProbeFuture<'_>;
}

// ═══════════════════════════════════════════════════════════════
//  REST (JSON over HTTP/1.1)
// ═══════════════════════════════════════════════════════════════

pub struct RestTransport {
    client: reqwest::Client,
    api_url: String,
    health_url: String,
}

impl RestTransport {
    /// `base_url` — без пути, напр. `http://127.0.0.1:8080`.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            client,
            api_url: format!("{base}/api"),
            health_url: format!("{base}/health"),
        }
    }
}

impl Transport for RestTransport {
    fn name(&self) -> &str {
        "REST API"
    }

    fn call<'a>(&'a self, record: &'a Record) -> CallFuture<'a> {
        Box::pin(async move {
            let body = JsonFormat.encode(record)?;
            let resp = self
                .client
                .post(&self.api_url)
                .header(reqwest::header::CONTENT_TYPE, JsonFormat.content_type())
                .body(body)
                .send()
                .await?;
            let status = resp.status();
            let bytes = resp.bytes().await?;
            if !status.is_success() {
                return Ok(Exchange::Rejected {
                    status: status.as_u16(),
                });
            }
            Ok(Exchange::Echoed(JsonFormat.decode(&bytes)?))
        })
    }

    fn probe(&self) -> ProbeFuture<'_> {
        Box::pin(async move {
            // Отдельный клиент: keep-alive соединение проверки не должно
            // попасть в пул клиента, который потом меряется.
            reqwest::Client::builder()
                .build()?
                .get(&self.health_url)
                .send()
                .await?
                .error_for_status()?;
            Ok(())
        })
    }
}

// ═══════════════════════════════════════════════════════════════
//  gRPC (protobuf over HTTP/2)
// ═══════════════════════════════════════════════════════════════

pub struct GrpcTransport {
    endpoint: Endpoint,
    client: ApiClient<Channel>,
}

impl GrpcTransport {
    /// Канал создаётся лениво: соединение устанавливается первым вызовом,
    /// все вызовы мультиплексируются в нём. `probe()` открывает и закрывает
    /// отдельный канал.
    pub fn new(url: &str) -> Result<Self, TransportError> {
        let endpoint = Endpoint::from_shared(url.to_string())?;
        let client = ApiClient::new(endpoint.connect_lazy());
        Ok(Self { endpoint, client })
    }
}

impl Transport for GrpcTransport {
    fn name(&self) -> &str {
        "RPC API"
    }

    fn call<'a>(&'a self, record: &'a Record) -> CallFuture<'a> {
        Box::pin(async move {
            // Channel клонируется дёшево и разделяет одно соединение.
            let mut client = self.client.clone();
            let reply = client.send_data(proto::Data::from(record.clone())).await?;
            Ok(Exchange::Echoed(reply.into_inner().into()))
        })
    }

    fn probe(&self) -> ProbeFuture<'_> {
        Box::pin(async move {
            self.endpoint.connect().await?;
            Ok(())
        })
    }
}
