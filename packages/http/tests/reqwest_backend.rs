#![cfg(feature = "reqwest")]

use placeholder_http::{Client, StatusCode};
use pretty_assertions::assert_eq;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

#[test_log::test(tokio::test)]
async fn forwards_query_params_and_reads_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("_limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("[1,2,3]", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let mut response = Client::new()
        .get(&format!("{}/posts", server.uri()))
        .query_param("_limit", "3")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(response.text().await.unwrap(), "[1,2,3]");
}

#[test_log::test(tokio::test)]
async fn forwards_request_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/1"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let response = Client::new()
        .get(&format!("{}/posts/1", server.uri()))
        .header("accept", "application/json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn reports_non_success_status_without_failing_send() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/9999999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let response = Client::new()
        .get(&format!("{}/posts/9999999", server.uri()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!response.status().is_success());
}

#[cfg(feature = "json")]
#[test_log::test(tokio::test)]
async fn json_decodes_typed_body() {
    #[derive(Debug, PartialEq, Eq, serde::Deserialize)]
    struct Post {
        id: u64,
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts/7"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"id":7}"#, "application/json"))
        .mount(&server)
        .await;

    let post: Post = Client::new()
        .get(&format!("{}/posts/7", server.uri()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(post, Post { id: 7 });
}

#[test_log::test(tokio::test)]
async fn connection_failure_is_a_transport_error() {
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let result = Client::new().get(&format!("{uri}/posts")).send().await;

    assert!(matches!(result, Err(placeholder_http::Error::Reqwest(_))));
}
