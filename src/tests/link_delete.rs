use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[tokio::test]
async fn test_link_delete() {
    let mut app = helper::setup_test_app().await;

    // setup
    let code = "remove1";
    let url = "https://www.example.com/";

    let (status_code, _, _) = helper::maybe_create_link(&mut app, url, Some(code)).await;
    assert_eq!(StatusCode::CREATED, status_code);

    // delete link
    let (status_code, body, _) = helper::maybe_delete_link(&mut app, code).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(Some(json!({ "ok": true })), body);

    // verify it is gone
    let (status_code, _, error) = helper::single_link(&mut app, code).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Not found".to_string()), error);

    let (status_code, location, _) = helper::root(&mut app, code).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(None, location);

    // deleting again is reported
    let (status_code, _, error) = helper::maybe_delete_link(&mut app, code).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Not found".to_string()), error);

    // the code can be used again, with fresh counters
    let (status_code, link, _) =
        helper::maybe_create_link(&mut app, "https://www.example.org/", Some(code)).await;
    assert_eq!(StatusCode::CREATED, status_code);
    assert_eq!(0, link.unwrap().click_count);
}

#[tokio::test]
async fn test_link_delete_not_found() {
    let mut app = helper::setup_test_app().await;

    let (status_code, body, error) = helper::maybe_delete_link(&mut app, "abcdef").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert!(body.is_none());
    assert_eq!(Some("Not found".to_string()), error);
}
