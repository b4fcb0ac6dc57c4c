use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::ServeError;
use crate::{grpc, rest};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Оба echo-сервиса, запущенные фоновыми задачами.
///
/// Listener'ы биндятся до spawn'а, поэтому после `start()` оба адреса
/// уже принимают соединения. Фактические адреса (в т.ч. при порте 0)
/// доступны через `rest_addr()` / `rest_url()` / `grpc_url()`.
pub struct EchoServices {
    rest_addr: SocketAddr,
    grpc_addr: SocketAddr,
    shutdown: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl EchoServices {
    pub async fn start(rest_addr: SocketAddr, grpc_addr: SocketAddr) -> Result<Self, ServeError> {
        let shutdown = CancellationToken::new();

        let rest_listener = bind(rest_addr).await?;
        let grpc_listener = bind(grpc_addr).await?;
        let rest_addr = rest_listener.local_addr()?;
        let grpc_addr = grpc_listener.local_addr()?;

        let handles = vec![
            spawn_service("rest", rest::serve(rest_listener, shutdown.clone())),
            spawn_service("grpc", grpc::serve(grpc_listener, shutdown.clone())),
        ];

        tracing::info!(%rest_addr, %grpc_addr, "echo services listening");

        Ok(Self {
            rest_addr,
            grpc_addr,
            shutdown,
            handles,
        })
    }

    pub fn rest_addr(&self) -> SocketAddr {
        self.rest_addr
    }

    /// Base URL текстового сервиса, напр. `http://127.0.0.1:8080`.
    pub fn rest_url(&self) -> String {
        format!("http://{}", self.rest_addr)
    }

    pub fn grpc_url(&self) -> String {
        format!("http://{}", self.grpc_addr)
    }

    /// Остановить оба сервиса: graceful shutdown, по истечении
    /// `SHUTDOWN_GRACE` оставшиеся задачи прерываются.
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        for mut h in self.handles {
            if tokio::time::timeout(SHUTDOWN_GRACE, &mut h).await.is_err() {
                tracing::warn!("service did not stop in time, aborting");
                h.abort();
                let _ = h.await;
            }
        }
        tracing::info!("echo services stopped");
    }
}

async fn bind(addr: SocketAddr) -> Result<TcpListener, ServeError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })
}

fn spawn_service<F>(name: &'static str, fut: F) -> JoinHandle<()>
where
    F: Future<Output = Result<(), ServeError>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = fut.await {
            tracing::error!(service = name, error = %e, "service error");
        }
    })
}
