//! gRPC stubs для сервиса `benchmark.API`.
//!
//! Повторяют код, который генерирует `tonic-build`, но без `protoc`
//! в сборке: сервис состоит из одного unary метода.

pub const SERVICE_NAME: &str = "benchmark.API";
pub const SEND_DATA_PATH: &str = "/benchmark.API/SendData";

pub mod api_client {
    use tonic::codegen::*;

    use crate::proto::Data;

    #[derive(Debug, Clone)]
    pub struct ApiClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl ApiClient<tonic::transport::Channel> {
        /// Подключиться к серверу (eager connect).
        pub async fn connect<D>(dst: D) -> Result<Self, tonic::transport::Error>
        where
            D: TryInto<tonic::transport::Endpoint>,
            D::Error: Into<StdError>,
        {
            let conn = tonic::transport::Endpoint::new(dst)?.connect().await?;
            Ok(Self::new(conn))
        }
    }

    impl<T> ApiClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::BoxBody>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + Send,
    {
        pub fn new(inner: T) -> Self {
            Self {
                inner: tonic::client::Grpc::new(inner),
            }
        }

        pub async fn send_data(
            &mut self,
            request: impl tonic::IntoRequest<Data>,
        ) -> Result<tonic::Response<Data>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
            })?;
            let codec = tonic::codec::ProstCodec::default();
            let path = http::uri::PathAndQuery::from_static(super::SEND_DATA_PATH);
            self.inner.unary(request.into_request(), path, codec).await
        }
    }
}

pub mod api_server {
    use tonic::codegen::*;

    use crate::proto::Data;

    #[async_trait]
    pub trait Api: Send + Sync + 'static {
        async fn send_data(
            &self,
            request: tonic::Request<Data>,
        ) -> Result<tonic::Response<Data>, tonic::Status>;
    }

    #[derive(Debug)]
    pub struct ApiServer<T> {
        inner: Arc<T>,
    }

    impl<T> ApiServer<T> {
        pub fn new(inner: T) -> Self {
            Self::from_arc(Arc::new(inner))
        }

        pub fn from_arc(inner: Arc<T>) -> Self {
            Self { inner }
        }
    }

    impl<T, B> Service<http::Request<B>> for ApiServer<T>
    where
        T: Api,
        B: Body + Send + 'static,
        B::Error: Into<StdError> + Send + 'static,
    {
        type Response = http::Response<tonic::body::BoxBody>;
        type Error = std::convert::Infallible;
        type Future = BoxFuture<Self::Response, Self::Error>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: http::Request<B>) -> Self::Future {
            match req.uri().path() {
                super::SEND_DATA_PATH => {
                    struct SendDataSvc<T: Api>(Arc<T>);

                    impl<T: Api> tonic::server::UnaryService<Data> for SendDataSvc<T> {
                        type Response = Data;
                        type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;

                        fn call(&mut self, request: tonic::Request<Data>) -> Self::Future {
                            let inner = Arc::clone(&self.0);
                            Box::pin(async move { <T as Api>::send_data(&inner, request).await })
                        }
                    }

                    let inner = self.inner.clone();
                    Box::pin(async move {
                        let method = SendDataSvc(inner);
                        let codec = tonic::codec::ProstCodec::default();
                        let mut grpc = tonic::server::Grpc::new(codec);
                        Ok(grpc.unary(method, req).await)
                    })
                }
                _ => Box::pin(async move {
                    let mut response = http::Response::new(empty_body());
                    let headers = response.headers_mut();
                    headers.insert(
                        "grpc-status",
                        http::HeaderValue::from(tonic::Code::Unimplemented as i32),
                    );
                    headers.insert(
                        http::header::CONTENT_TYPE,
                        tonic::metadata::GRPC_CONTENT_TYPE,
                    );
                    Ok(response)
                }),
            }
        }
    }

    impl<T> Clone for ApiServer<T> {
        fn clone(&self) -> Self {
            Self {
                inner: self.inner.clone(),
            }
        }
    }

    impl<T> tonic::server::NamedService for ApiServer<T> {
        const NAME: &'static str = super::SERVICE_NAME;
    }
}
