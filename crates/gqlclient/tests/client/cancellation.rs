use std::time::Duration;

use gqlclient::{Client, Discard, Error, Request};
use tokio_util::sync::CancellationToken;

use crate::utils::SpyExecutor;

#[tokio::test]
async fn cancelled_token_sends_nothing() {
    let spy = SpyExecutor::responding(200, r#"{"data": null}"#);
    let client = Client::builder("http://localhost:4000/graphql".parse().unwrap())
        .http_executor(spy.clone())
        .build();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let error = client
        .execute::<Discard>(&cancel, Request::new("{ a }"))
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Cancelled));
    assert!(error.is_cancelled());
    assert!(error.response().is_none());
    assert!(spy.requests().is_empty());
}

#[tokio::test]
async fn cancellation_is_checked_before_files() {
    let spy = SpyExecutor::responding(200, r#"{"data": null}"#);
    let client = Client::builder("http://localhost:4000/graphql".parse().unwrap())
        .http_executor(spy.clone())
        .build();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut request = Request::new("mutation");
    request.add_file("upload", "a.txt", &b"a"[..]);

    let error = client.execute::<Discard>(&cancel, request).await.unwrap_err();
    assert!(error.is_cancelled());
}

#[tokio::test]
async fn cancellation_aborts_a_request_in_flight() {
    let spy = SpyExecutor::hanging();
    let client = Client::builder("http://localhost:4000/graphql".parse().unwrap())
        .http_executor(spy.clone())
        .build();

    let cancel = CancellationToken::new();
    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        })
    };

    let error = client
        .execute::<Discard>(&cancel, Request::new("{ a }"))
        .await
        .unwrap_err();

    canceller.await.unwrap();

    assert!(error.is_cancelled());
    assert_eq!(spy.requests().len(), 1);
}
