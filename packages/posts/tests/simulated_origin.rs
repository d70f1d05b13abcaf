use std::time::Duration;

use placeholder_http::{Client, StatusCode, simulator::SimulatorClient};
use placeholder_posts::{Error, Item, PostsClient};
use pretty_assertions::assert_eq;

const ORIGIN: &str = "https://origin.test";

fn fixture() -> Vec<Item> {
    serde_json::from_str(
        r#"[
            {"userId":1,"id":1,"title":"sunt aut facere","body":"quia et suscipit"},
            {"userId":1,"id":2,"title":"qui est esse","body":"est rerum tempore"},
            {"userId":1,"id":3,"title":"ea molestias quasi","body":"et iusto sed quo"},
            {"userId":1,"id":4,"title":"eum et est occaecati","body":"ullam et saepe"},
            {"userId":1,"id":5,"title":"nesciunt quas odio","body":"repudiandae veniam"}
        ]"#,
    )
    .unwrap()
}

fn posts_client(simulator: &SimulatorClient) -> PostsClient {
    PostsClient::builder()
        .with_origin(ORIGIN)
        .with_http_client(Client::from_backend(simulator.clone()))
        .build()
}

#[test_log::test(tokio::test)]
async fn list_fetch_returns_fixture_verbatim() {
    let simulator = SimulatorClient::new()
        .route_json("https://origin.test/posts?_limit=5", &fixture())
        .unwrap();

    let items = posts_client(&simulator)
        .get_items(Some(5), Some(Duration::ZERO))
        .await
        .unwrap();

    assert_eq!(items.len(), 5);
    assert_eq!(items, fixture());
}

#[test_log::test(tokio::test)]
async fn list_fetch_is_bounded_by_the_remote_collection() {
    let simulator = SimulatorClient::new()
        .route_json("https://origin.test/posts?_limit=50", &fixture())
        .unwrap();

    let items = posts_client(&simulator)
        .get_items(Some(50), Some(Duration::ZERO))
        .await
        .unwrap();

    assert!(items.len() <= 50);
    assert_eq!(items.len(), fixture().len());
}

#[test_log::test(tokio::test)]
async fn single_fetch_returns_the_requested_item() {
    let third = fixture().swap_remove(2);
    let simulator = SimulatorClient::new()
        .route_json("https://origin.test/posts/3", &third)
        .unwrap();

    let item = posts_client(&simulator)
        .get_item_by_id(3, Some(Duration::ZERO))
        .await
        .unwrap();

    assert_eq!(item.id, 3);
    assert_eq!(item, third);
}

#[test_log::test(tokio::test)]
async fn unknown_id_fails_with_not_found() {
    let simulator = SimulatorClient::new().route(
        "https://origin.test/posts/9999999",
        StatusCode::NOT_FOUND,
        "{}",
    );

    let result = posts_client(&simulator)
        .get_item_by_id(9_999_999, Some(Duration::ZERO))
        .await;

    let error = result.unwrap_err();
    assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(error.to_string(), "HTTP error! status: 404");
}

#[test_log::test(tokio::test)]
async fn transport_failure_propagates() {
    let simulator = SimulatorClient::new().fail_transport("https://origin.test/posts?_limit=10");

    let result = posts_client(&simulator)
        .get_items(None, Some(Duration::ZERO))
        .await;

    assert!(matches!(
        result,
        Err(Error::Transport(placeholder_http::Error::Simulated(_)))
    ));
}

#[test_log::test(tokio::test)]
async fn malformed_body_is_a_decode_failure() {
    let simulator = SimulatorClient::new()
        .route(
            "https://origin.test/posts?_limit=2",
            StatusCode::OK,
            "<html>not json</html>",
        )
        .route(
            "https://origin.test/posts/1",
            StatusCode::OK,
            r#"{"id":1,"title":"missing body and userId"}"#,
        );
    let client = posts_client(&simulator);

    let list = client.get_items(Some(2), Some(Duration::ZERO)).await;
    let single = client.get_item_by_id(1, Some(Duration::ZERO)).await;

    assert!(matches!(list, Err(Error::Decode(_))));
    assert!(matches!(single, Err(Error::Decode(_))));
}

#[test_log::test(tokio::test)]
async fn concurrent_calls_do_not_interact() {
    let items = fixture();
    let simulator = SimulatorClient::new()
        .route_json("https://origin.test/posts/1", &items[0])
        .unwrap()
        .route_json("https://origin.test/posts/2", &items[1])
        .unwrap();
    let client = posts_client(&simulator);

    let (first, second) = tokio::join!(
        client.get_item_by_id(1, Some(Duration::from_millis(20))),
        client.get_item_by_id(2, Some(Duration::ZERO)),
    );

    assert_eq!(first.unwrap(), items[0]);
    assert_eq!(second.unwrap(), items[1]);
}

#[tokio::test(start_paused = true)]
async fn delay_elapses_before_the_request_is_sent() {
    let simulator = SimulatorClient::new()
        .route_json("https://origin.test/posts?_limit=5", &fixture())
        .unwrap();
    let client = posts_client(&simulator);

    let handle = tokio::spawn(async move {
        client
            .get_items(Some(5), Some(Duration::from_millis(1500)))
            .await
    });

    tokio::time::sleep(Duration::from_millis(1400)).await;
    assert!(simulator.requests().is_empty());

    let items = handle.await.unwrap().unwrap();

    assert_eq!(items.len(), 5);
    assert_eq!(
        simulator.requests(),
        vec!["https://origin.test/posts?_limit=5"]
    );
}
