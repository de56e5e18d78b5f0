use std::{io, sync::Arc, time::Duration};

use support::{Level, RecordingLogger};
use transfer::{
    ExceptionClassifier, FailureCause, GatewayError, NoopLogger, SetupError, Transfer,
    TransferFutureExt, TransferStatus, logger,
};

mod support;

fn classifier() -> (Arc<RecordingLogger>, ExceptionClassifier) {
    let recorder = Arc::new(RecordingLogger::default());
    let classifier = ExceptionClassifier::new(recorder.clone());
    (recorder, classifier)
}

#[test]
fn expected_causes_log_at_info() {
    let (recorder, classifier) = classifier();

    let statuses = [
        classifier.classify(FailureCause::Canceled("stop".into())).status(),
        classifier.classify(FailureCause::UnknownHost("dns".into())).status(),
        classifier.classify(FailureCause::SocketTimeout("slow".into())).status(),
        classifier.classify(FailureCause::InterruptedIo("eintr".into())).status(),
        classifier.classify(FailureCause::Tls("handshake".into())).status(),
        classifier
            .classify(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"))
            .status(),
    ];

    assert_eq!(
        statuses,
        [
            TransferStatus::Canceled,
            TransferStatus::NetworkError,
            TransferStatus::TimeoutError,
            TransferStatus::TimeoutError,
            TransferStatus::IoError,
            TransferStatus::IoError,
        ]
    );
    assert!(recorder.levels().iter().all(|level| *level == Level::Info));
    assert_eq!(recorder.levels().len(), 6);
}

#[test]
fn unexpected_causes_log_at_error() {
    let (recorder, classifier) = classifier();

    let failure = classifier.classify("null dereference in mapper");

    assert_eq!(failure.status(), TransferStatus::GeneralError);
    assert_eq!(recorder.levels(), vec![Level::Error]);
    let lines = recorder.lines();
    assert_eq!(lines[0].message, "null dereference in mapper");
    assert_eq!(lines[0].tag.as_deref(), Some("Transfer::from_error"));
}

#[test]
fn classification_is_idempotent() {
    let (_, classifier) = classifier();
    let make = || io::Error::new(io::ErrorKind::ConnectionRefused, "refused");

    let first = classifier.classify(make());
    let second = classifier.classify(make());
    assert_eq!(first.status(), second.status());

    let reclassified = ExceptionClassifier::status_of(&**first.error().cause());
    assert_eq!(reclassified, first.status());
}

#[tokio::test]
async fn tokio_causes_are_recognised() {
    let (_, classifier) = classifier();

    let elapsed = tokio::time::timeout(
        Duration::from_millis(1),
        std::future::pending::<()>(),
    )
    .await
    .unwrap_err();
    assert_eq!(classifier.classify(elapsed).status(), TransferStatus::TimeoutError);

    let (tx, rx) = tokio::sync::oneshot::channel::<u8>();
    drop(tx);
    let closed = rx.await.unwrap_err();
    assert_eq!(classifier.classify(closed).status(), TransferStatus::Canceled);

    let handle = tokio::spawn(std::future::pending::<()>());
    handle.abort();
    let aborted = handle.await.unwrap_err();
    assert_eq!(classifier.classify(aborted).status(), TransferStatus::Canceled);
}

fn gateway(message: &str, code: u16) -> GatewayError {
    GatewayError {
        message: message.to_string(),
        code: Some(code),
        classification: String::new(),
    }
}

#[test]
fn empty_gateway_list_logs_at_error() {
    let (recorder, classifier) = classifier();

    let failure = classifier.gateway_failure(&[]);

    assert_eq!(failure.status(), TransferStatus::IoError);
    assert_eq!(failure.message(), "No gateway errors found.");
    let lines = recorder.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].level, Level::Error);
    assert_eq!(lines[0].message, "No errors found. Should never happen.");
    assert_eq!(lines[0].tag.as_deref(), Some("Transfer::gateway_error"));
}

#[test]
fn extra_gateway_errors_log_an_anomaly() {
    let (recorder, classifier) = classifier();

    let failure = classifier.gateway_failure(&[gateway("denied", 401), gateway("taken", 409)]);

    assert_eq!(failure.status(), TransferStatus::AuthorizationError);
    assert_eq!(failure.message(), "denied");
    let lines = recorder.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].level, Level::Error);
    assert_eq!(lines[0].message, "More than one error message");
}

#[test]
fn single_gateway_error_logs_nothing() {
    let (recorder, classifier) = classifier();

    let failure = classifier.gateway_failure(&[gateway("bad field", 400)]);

    assert_eq!(failure.status(), TransferStatus::UserError);
    assert!(recorder.lines().is_empty());
}

#[tokio::test(start_paused = true)]
async fn timeout_expiry_logs_at_info() {
    let (recorder, classifier) = classifier();

    let result = std::future::pending::<Transfer<u32>>()
        .timeout_with(Duration::from_millis(250), classifier)
        .await;

    assert_eq!(result.status(), TransferStatus::Canceled);
    let lines = recorder.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].level, Level::Info);
    assert_eq!(lines[0].message, "Failure happened due to Timeout (250 ms)");
    assert_eq!(lines[0].tag.as_deref(), Some("Transfer::timeout"));
}

#[tokio::test(start_paused = true)]
async fn completed_wait_logs_nothing() {
    let (recorder, classifier) = classifier();

    let result = async { Transfer::success(3) }
        .timeout_with(Duration::from_millis(250), classifier)
        .await;

    assert_eq!(result, Transfer::success(3));
    assert!(recorder.lines().is_empty());
}

#[test]
fn logger_can_only_be_installed_once() {
    assert_eq!(logger::install(Arc::new(NoopLogger)), Ok(()));
    assert_eq!(
        logger::install(Arc::new(NoopLogger)),
        Err(SetupError::LoggerInstalled)
    );
    assert!(logger::installed().is_some());
}
