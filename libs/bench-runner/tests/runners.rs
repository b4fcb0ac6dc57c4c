use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};

use bench_runner::transport::{CallFuture, ProbeFuture};
use bench_runner::{
    run_concurrent, run_sequential, wait_ready, BenchError, Exchange, FailurePolicy, GrpcTransport,
    Mode, RestTransport, Transport,
};
use echo_api::Record;
use echo_server::EchoServices;

const READY: Duration = Duration::from_secs(5);

struct Fixture {
    services: EchoServices,
    rest: Arc<RestTransport>,
    grpc: Arc<GrpcTransport>,
}

async fn fixture() -> Fixture {
    let any: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let services = EchoServices::start(any, any).await.unwrap();
    let rest = Arc::new(RestTransport::new(&services.rest_url()).unwrap());
    let grpc = Arc::new(GrpcTransport::new(&services.grpc_url()).unwrap());
    wait_ready(rest.as_ref(), READY).await.unwrap();
    wait_ready(grpc.as_ref(), READY).await.unwrap();
    Fixture { services, rest, grpc }
}

fn transports(f: &Fixture) -> [Arc<dyn Transport>; 2] {
    [f.rest.clone(), f.grpc.clone()]
}

#[tokio::test]
async fn both_transports_echo_incremented_record() {
    let f = fixture().await;
    for t in transports(&f) {
        let out = t.call(&Record::sample()).await.unwrap();
        assert_eq!(out, Exchange::Echoed(Record::new("123", "Test", 43)), "{}", t.name());
    }
    f.services.shutdown().await;
}

#[tokio::test]
async fn sequential_issues_exactly_n_calls() {
    let f = fixture().await;
    for t in transports(&f) {
        let report = run_sequential(t.as_ref(), &Record::sample(), 100, FailurePolicy::Abort)
            .await
            .unwrap();
        assert_eq!(report.mode, Mode::Sequential);
        assert_eq!(report.requested, 100);
        assert_eq!(report.issued, 100);
        assert_eq!(report.completed, 100);
        assert_eq!(report.failed, 0);
        assert!(report.total > Duration::ZERO);
        assert!(report.avg_per_requested() > Duration::ZERO);
        assert_eq!(
            report.avg_per_requested().as_nanos(),
            report.total.as_nanos() / 100
        );
    }
    f.services.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_issues_divisible_share() {
    let f = fixture().await;
    for t in transports(&f) {
        let report = run_concurrent(t.clone(), &Record::sample(), 100, 10, FailurePolicy::Skip)
            .await
            .unwrap();
        assert_eq!(report.mode, Mode::Concurrent { concurrency: 10 });
        assert_eq!(report.issued, 100);
        assert_eq!(report.completed, 100);
        assert!(report.avg_per_requested() > Duration::ZERO);

        // Остаток от деления не выполняется, но знаменатель — запрошенное N.
        let report = run_concurrent(t.clone(), &Record::sample(), 105, 10, FailurePolicy::Skip)
            .await
            .unwrap();
        assert_eq!(report.requested, 105);
        assert_eq!(report.issued, 100);
        assert_eq!(report.completed, 100);
        assert_eq!(
            report.avg_per_requested().as_nanos(),
            report.total.as_nanos() / 105
        );
    }
    f.services.shutdown().await;
}

#[tokio::test]
async fn concurrency_larger_than_iterations_issues_nothing() {
    let f = fixture().await;
    let report = run_concurrent(f.grpc.clone(), &Record::sample(), 5, 10, FailurePolicy::Skip)
        .await
        .unwrap();
    assert_eq!(report.issued, 0);
    assert_eq!(report.total, Duration::ZERO);
    assert_eq!(report.avg_per_completed(), None);
    f.services.shutdown().await;
}

#[tokio::test]
async fn rest_client_error_counts_as_completed() {
    let f = fixture().await;
    let wrong_path = RestTransport::new(&format!("{}/missing", f.services.rest_url())).unwrap();
    assert_eq!(
        wrong_path.call(&Record::sample()).await.unwrap(),
        Exchange::Rejected { status: 404 }
    );

    let report = run_sequential(&wrong_path, &Record::sample(), 3, FailurePolicy::Abort)
        .await
        .unwrap();
    assert_eq!(report.completed, 3);
    assert_eq!(report.rejected, 3);
    f.services.shutdown().await;
}

#[tokio::test]
async fn not_ready_when_nothing_listens() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let rest = RestTransport::new(&format!("http://{addr}")).unwrap();
    let err = wait_ready(&rest, Duration::from_millis(200)).await.unwrap_err();
    assert!(matches!(err, BenchError::NotReady { .. }), "{err}");

    let grpc = GrpcTransport::new(&format!("http://{addr}")).unwrap();
    let err = wait_ready(&grpc, Duration::from_millis(200)).await.unwrap_err();
    assert!(matches!(err, BenchError::NotReady { .. }), "{err}");
}

#[tokio::test]
async fn sequential_abort_surfaces_transport_failure() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let rest = RestTransport::new(&format!("http://{addr}")).unwrap();
    let err = run_sequential(&rest, &Record::sample(), 10, FailurePolicy::Abort)
        .await
        .unwrap_err();
    assert!(matches!(err, BenchError::CallFailed { ref transport, .. } if transport == "REST API"));
}

// ═══════════════════════════════════════════════════════════════
//  Содержимое ответов и соединения
// ═══════════════════════════════════════════════════════════════

/// Обёртка, запоминающая каждый успешный ответ внутреннего транспорта.
struct Recording {
    inner: Arc<dyn Transport>,
    seen: Mutex<Vec<Exchange>>,
}

impl Recording {
    fn new(inner: Arc<dyn Transport>) -> Self {
        Self {
            inner,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn take(&self) -> Vec<Exchange> {
        std::mem::take(&mut *self.seen.lock().unwrap())
    }
}

impl Transport for Recording {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn call<'a>(&'a self, record: &'a Record) -> CallFuture<'a> {
        Box::pin(async move {
            let out = self.inner.call(record).await?;
            self.seen.lock().unwrap().push(out.clone());
            Ok(out)
        })
    }

    fn probe(&self) -> ProbeFuture<'_> {
        self.inner.probe()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_timed_call_echoes_incremented_record() {
    let f = fixture().await;
    let expected = Exchange::Echoed(Record::new("123", "Test", 43));
    for t in transports(&f) {
        let rec = Arc::new(Recording::new(t));

        run_sequential(rec.as_ref(), &Record::sample(), 100, FailurePolicy::Abort)
            .await
            .unwrap();
        let seen = rec.take();
        assert_eq!(seen.len(), 100, "{}", rec.name());
        assert!(seen.iter().all(|e| *e == expected), "{}", rec.name());

        run_concurrent(rec.clone(), &Record::sample(), 100, 10, FailurePolicy::Abort)
            .await
            .unwrap();
        let seen = rec.take();
        assert_eq!(seen.len(), 100, "{}", rec.name());
        assert!(seen.iter().all(|e| *e == expected), "{}", rec.name());
    }
    f.services.shutdown().await;
}

/// TCP-прокси перед `target`, считающий принятые соединения.
async fn counting_proxy(target: SocketAddr) -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();
    tokio::spawn(async move {
        while let Ok((mut inbound, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                if let Ok(mut outbound) = TcpStream::connect(target).await {
                    let _ = tokio::io::copy_bidirectional(&mut inbound, &mut outbound).await;
                }
            });
        }
    });
    (addr, accepted)
}

fn addr_of(url: &str) -> SocketAddr {
    url.trim_start_matches("http://").parse().unwrap()
}

#[tokio::test]
async fn first_timed_call_opens_fresh_connection_on_both_transports() {
    let any: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let services = EchoServices::start(any, any).await.unwrap();
    let (rest_proxy, rest_conns) = counting_proxy(services.rest_addr()).await;
    let (grpc_proxy, grpc_conns) = counting_proxy(addr_of(&services.grpc_url())).await;

    let rest = RestTransport::new(&format!("http://{rest_proxy}")).unwrap();
    let grpc = GrpcTransport::new(&format!("http://{grpc_proxy}")).unwrap();
    wait_ready(&rest, READY).await.unwrap();
    wait_ready(&grpc, READY).await.unwrap();

    let before = (rest_conns.load(Ordering::SeqCst), grpc_conns.load(Ordering::SeqCst));
    assert!(before.0 >= 1 && before.1 >= 1);

    rest.call(&Record::sample()).await.unwrap();
    grpc.call(&Record::sample()).await.unwrap();

    // Проверка готовности не оставила соединений, которые переиспользует замер.
    assert_eq!(rest_conns.load(Ordering::SeqCst), before.0 + 1);
    assert_eq!(grpc_conns.load(Ordering::SeqCst), before.1 + 1);

    // Дальнейшие вызовы идут по тому же соединению.
    rest.call(&Record::sample()).await.unwrap();
    grpc.call(&Record::sample()).await.unwrap();
    assert_eq!(rest_conns.load(Ordering::SeqCst), before.0 + 1);
    assert_eq!(grpc_conns.load(Ordering::SeqCst), before.1 + 1);

    services.shutdown().await;
}
