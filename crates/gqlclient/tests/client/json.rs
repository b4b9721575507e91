use gqlclient::{Client, Discard, Request};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::ResponseTemplate;

use crate::utils::{endpoint, graphql_server, single_request, variables, SpyExecutor};

#[tokio::test]
async fn sends_query_and_variables() {
    let server = graphql_server(ResponseTemplate::new(200).set_body_json(json!({
        "data": { "x": 1 },
        "errors": []
    })))
    .await;

    let client = Client::new(endpoint(&server));
    let request = Request::new("query ($id: ID!) { user(id: $id) { name } }").with_variables(variables(json!({ "id": "1" })));

    let response = client
        .execute::<serde_json::Value>(&CancellationToken::new(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.data(), Some(&json!({ "x": 1 })));

    let request = single_request(&server).await;
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();

    insta::assert_json_snapshot!(body, @r#"
    {
      "query": "query ($id: ID!) { user(id: $id) { name } }",
      "variables": {
        "id": "1"
      }
    }
    "#);
}

#[tokio::test]
async fn unset_variables_are_null() {
    let server = graphql_server(ResponseTemplate::new(200).set_body_json(json!({ "data": null }))).await;

    let query = indoc::indoc! {r"
        query {
          items {
            field1
          }
        }
    "};

    let response = Client::new(endpoint(&server))
        .execute::<serde_json::Value>(&CancellationToken::new(), Request::new(query))
        .await
        .unwrap();

    assert!(response.data().is_none());

    let request = single_request(&server).await;
    let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body, json!({ "query": query, "variables": null }));
}

#[tokio::test]
async fn decodes_into_typed_data() {
    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Data {
        user: User,
    }

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct User {
        name: String,
        age: u32,
    }

    let server = graphql_server(ResponseTemplate::new(200).set_body_json(json!({
        "data": { "user": { "name": "Jane Doe", "age": 25 } },
        "extensions": { "cost": 1 }
    })))
    .await;

    let data = Client::new(endpoint(&server))
        .execute::<Data>(&CancellationToken::new(), Request::new("{ user { name age } }"))
        .await
        .unwrap()
        .into_data();

    assert_eq!(
        data,
        Some(Data {
            user: User {
                name: "Jane Doe".into(),
                age: 25
            }
        })
    );
}

#[tokio::test]
async fn discarded_data() {
    let server = graphql_server(ResponseTemplate::new(200).set_body_json(json!({
        "data": { "deleteUser": { "id": "1", "friends": [1, 2, 3] } }
    })))
    .await;

    let response = Client::new(endpoint(&server))
        .execute::<Discard>(&CancellationToken::new(), Request::new("mutation { deleteUser { id } }"))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn identical_requests_encode_identically() {
    let spy = SpyExecutor::responding(200, r#"{"data": {}}"#);
    let client = Client::builder("http://localhost:4000/graphql".parse().unwrap())
        .http_executor(spy.clone())
        .build();

    for _ in 0..2 {
        let request = Request::new("query ($a: Int, $b: [String]) { f(a: $a, b: $b) }")
            .with_variables(variables(json!({ "b": ["x", "y"], "a": 1, "c": { "z": null, "y": 2.5 } })));

        client
            .execute::<Discard>(&CancellationToken::new(), request)
            .await
            .unwrap();
    }

    let requests = spy.requests();
    assert_eq!(requests.len(), 2);

    let first = requests[0].body.clone().unwrap();
    let second = requests[1].body.clone().unwrap();
    assert_eq!(first, second);
    assert_eq!(
        String::from_utf8(first).unwrap(),
        r#"{"query":"query ($a: Int, $b: [String]) { f(a: $a, b: $b) }","variables":{"b":["x","y"],"a":1,"c":{"z":null,"y":2.5}}}"#
    );
}

#[tokio::test]
async fn posts_to_the_endpoint() {
    let spy = SpyExecutor::responding(200, r#"{"data": null}"#);
    let client = Client::builder("https://api.example.com/v1/graphql?tenant=a".parse().unwrap())
        .http_executor(spy.clone())
        .build();

    client
        .execute::<Discard>(&CancellationToken::new(), Request::new("{ a }"))
        .await
        .unwrap();

    let request = spy.requests().pop().unwrap();
    assert_eq!(request.method, http::Method::POST);
    assert_eq!(request.url.as_str(), "https://api.example.com/v1/graphql?tenant=a");
}
