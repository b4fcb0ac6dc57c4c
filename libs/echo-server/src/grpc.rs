use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tonic::transport::server::TcpIncoming;
use tonic::{Request, Response, Status};

use echo_api::proto::Data;
use echo_api::Record;
use echo_api::rpc::api_server::{Api, ApiServer};

use crate::error::ServeError;

/// Echo-сервис бинарного протокола (protobuf over gRPC).
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoRpc;

#[tonic::async_trait]
impl Api for EchoRpc {
    async fn send_data(&self, request: Request<Data>) -> Result<Response<Data>, Status> {
        let record = Record::from(request.into_inner()).bumped();
        Ok(Response::new(record.into()))
    }
}

pub async fn serve(listener: TcpListener, shutdown: CancellationToken) -> Result<(), ServeError> {
    let incoming = TcpIncoming::from_listener(listener, true, None)
        .map_err(|e| ServeError::Incoming(e.to_string()))?;

    tonic::transport::Server::builder()
        .add_service(ApiServer::new(EchoRpc))
        .serve_with_incoming_shutdown(incoming, shutdown.cancelled_owned())
        .await?;
    Ok(())
}
