use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::sync::oneshot;

use crate::serve;
use crate::tests::helper;

async fn request(address: std::net::SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(address).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    response
}

#[tokio::test]
async fn test_serve_over_tcp() {
    let mut app = helper::setup_test_app().await;

    let (status_code, _, _) =
        helper::maybe_create_link(&mut app, "https://www.example.com/", Some("abcdef")).await;
    assert_eq!(axum::http::StatusCode::CREATED, status_code);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    let (shutdown, signal) = oneshot::channel::<()>();
    let server = tokio::spawn(serve(listener, app, async move {
        let _ = signal.await;
    }));

    let response = request(
        address,
        "GET /healthz HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.contains(r#""status":"healthy""#), "{response}");

    let response = request(
        address,
        "GET /abcdef HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 302 Found"), "{response}");
    assert!(
        response
            .to_lowercase()
            .contains("location: https://www.example.com/"),
        "{response}"
    );

    shutdown.send(()).unwrap();
    server.await.unwrap().unwrap();
}
