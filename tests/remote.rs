//! Remote dispatch against an in-process server.
#![cfg(feature = "remote")]

mod support;

use std::{
    net::SocketAddr,
    sync::{Arc, mpsc},
    thread,
};

use rstest::{fixture, rstest};
use support::StubPipeline;
use text_classification::remote::{RemoteError, RemoteFunction, router};
use text_classification::{
    DEFAULT_INPUT, ErrorKind, InferenceService, Predictor, ServiceError, entrypoint,
};

/// Serve `service` on an ephemeral port from a background runtime.
fn spawn_server(service: InferenceService<StubPipeline>) -> SocketAddr {
    let (tx, rx) = mpsc::channel();
    let service = Arc::new(service);
    thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new()
            .unwrap_or_else(|e| panic!("build runtime: {e}"));
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .unwrap_or_else(|e| panic!("bind listener: {e}"));
            let addr = listener
                .local_addr()
                .unwrap_or_else(|e| panic!("local addr: {e}"));
            tx.send(addr)
                .unwrap_or_else(|e| panic!("report addr: {e}"));
            axum::serve(listener, router(service))
                .await
                .unwrap_or_else(|e| panic!("serve: {e}"));
        });
    });
    rx.recv().unwrap_or_else(|e| panic!("server did not start: {e}"))
}

fn loaded_service() -> InferenceService<StubPipeline> {
    let mut service = InferenceService::new(StubPipeline::default());
    service
        .load()
        .unwrap_or_else(|e| panic!("stub load failed: {e}"));
    service
}

#[fixture]
fn remote() -> RemoteFunction {
    let addr = spawn_server(loaded_service());
    RemoteFunction::new(format!("http://{addr}/"))
        .unwrap_or_else(|e| panic!("build remote function: {e}"))
}

#[rstest]
fn remote_result_matches_local_predict(remote: RemoteFunction) {
    let local = loaded_service()
        .predict(DEFAULT_INPUT)
        .unwrap_or_else(|e| panic!("local predict failed: {e}"));
    let dispatched = remote
        .remote(DEFAULT_INPUT)
        .unwrap_or_else(|e| panic!("remote predict failed: {e}"));
    assert_eq!(dispatched, local);
}

#[rstest]
fn remote_entrypoint_loads_then_predicts(mut remote: RemoteFunction) {
    let mut out = Vec::new();
    let result = entrypoint::run(&mut remote, DEFAULT_INPUT, &mut out)
        .unwrap_or_else(|e| panic!("entrypoint failed: {e}"));
    assert_eq!(result.label, "POSITIVE");
    let printed: serde_json::Value = serde_json::from_slice(&out)
        .unwrap_or_else(|e| panic!("output is not JSON: {e}"));
    assert_eq!(printed["label"], "POSITIVE");
}

#[rstest]
fn inference_failure_crosses_the_wire(remote: RemoteFunction) {
    let Err(err) = remote.remote("") else {
        panic!("expected the empty input to fail");
    };
    assert_eq!(err.kind(), Some(ErrorKind::InferenceFailure));
}

#[test]
fn unloaded_server_reports_not_loaded() {
    let addr = spawn_server(InferenceService::new(StubPipeline::default()));
    let mut remote = RemoteFunction::new(format!("http://{addr}"))
        .unwrap_or_else(|e| panic!("build remote function: {e}"));

    let health = remote
        .health()
        .unwrap_or_else(|e| panic!("health failed: {e}"));
    assert!(!health.loaded);

    let load = Predictor::load(&mut remote);
    assert!(matches!(
        load,
        Err(RemoteError::Service { kind: ErrorKind::NotLoaded, .. })
    ));
    let predicted = remote.remote(DEFAULT_INPUT);
    assert_eq!(
        predicted.err().and_then(|e| e.kind()),
        Some(ServiceError::NotLoaded.kind())
    );
}

#[test]
fn unreachable_server_is_a_request_error() {
    let remote = RemoteFunction::new("http://127.0.0.1:9")
        .unwrap_or_else(|e| panic!("build remote function: {e}"));
    assert!(matches!(
        remote.remote(DEFAULT_INPUT),
        Err(RemoteError::Request(_))
    ));
}
