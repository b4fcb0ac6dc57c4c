use std::sync::Arc;

use bench_runner::{run_concurrent, run_sequential, wait_ready, GrpcTransport, RestTransport};
use echo_api::{probe, JsonFormat, ProtobufFormat};
use echo_server::EchoServices;

use super::config::Effective;
use super::error::AppError;

// ═══════════════════════════════════════════════════════════════
//  Main dispatch
// ═══════════════════════════════════════════════════════════════

pub async fn run(eff: &Effective) -> Result<(), AppError> {
    tracing::info!(
        iterations = eff.iterations,
        concurrency = eff.concurrency,
        sequential_policy = %eff.sequential_policy,
        concurrent_policy = %eff.concurrent_policy,
        "api-bench starting"
    );

    let services = EchoServices::start(eff.rest_addr, eff.grpc_addr).await?;
    let result = run_benchmarks(eff, &services).await;
    services.shutdown().await;
    result
}

async fn run_benchmarks(eff: &Effective, services: &EchoServices) -> Result<(), AppError> {
    let rest = Arc::new(RestTransport::new(&services.rest_url())?);
    let grpc = Arc::new(GrpcTransport::new(&services.grpc_url())?);

    wait_ready(rest.as_ref(), eff.ready_timeout).await?;
    wait_ready(grpc.as_ref(), eff.ready_timeout).await?;

    println!("Measure Payload size...");
    for size in probe(&eff.record, &[&JsonFormat, &ProtobufFormat])? {
        println!("{size}");
    }

    println!("Benchmarking REST API...");
    let report = run_sequential(rest.as_ref(), &eff.record, eff.iterations, eff.sequential_policy).await?;
    println!("{report}");

    println!("Benchmarking RPC API...");
    let report = run_sequential(grpc.as_ref(), &eff.record, eff.iterations, eff.sequential_policy).await?;
    println!("{report}");

    println!("Benchmarking gRPC API with Concurrency...");
    let report = run_concurrent(
        grpc.clone(),
        &eff.record,
        eff.iterations,
        eff.concurrency,
        eff.concurrent_policy,
    )
    .await?
    .with_label("gRPC API");
    println!("{report}");

    println!("Benchmarking REST API with Concurrency...");
    let report = run_concurrent(
        rest.clone(),
        &eff.record,
        eff.iterations,
        eff.concurrency,
        eff.concurrent_policy,
    )
    .await?;
    println!("{report}");

    tracing::info!("benchmarks complete");
    Ok(())
}
