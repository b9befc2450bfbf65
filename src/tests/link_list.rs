use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_link_list() {
    let mut app = helper::setup_test_app().await;

    // empty list
    let (status_code, links) = helper::list_links(&mut app).await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(links.unwrap().is_empty());

    // setup
    let url = "https://www.example.com/";
    for code in ["first1", "second", "third3"] {
        let (status_code, _, _) = helper::maybe_create_link(&mut app, url, Some(code)).await;
        assert_eq!(StatusCode::CREATED, status_code);
    }

    let (status_code, _, _) = helper::root(&mut app, "second").await;
    assert_eq!(StatusCode::FOUND, status_code);

    // newest first
    let (status_code, links) = helper::list_links(&mut app).await;
    assert_eq!(StatusCode::OK, status_code);
    let links = links.unwrap();
    assert_eq!(
        vec!["third3", "second", "first1"],
        links.iter().map(|link| link.code.as_str()).collect::<Vec<&str>>()
    );

    // only the public fields are listed
    assert!(links.iter().all(|link| link.created_at.is_none()));
    assert!(links.iter().all(|link| link.url == url));

    let second = links.iter().find(|link| link.code == "second").unwrap();
    assert_eq!(1, second.click_count);
    assert!(second.last_clicked.is_some());

    let first = links.iter().find(|link| link.code == "first1").unwrap();
    assert_eq!(0, first.click_count);
    assert!(first.last_clicked.is_none());

    // deleted links are not listed
    let (status_code, _, _) = helper::maybe_delete_link(&mut app, "second").await;
    assert_eq!(StatusCode::OK, status_code);

    let (_, links) = helper::list_links(&mut app).await;
    assert_eq!(
        vec!["third3", "first1"],
        links
            .unwrap()
            .iter()
            .map(|link| link.code.clone())
            .collect::<Vec<String>>()
    );
}
