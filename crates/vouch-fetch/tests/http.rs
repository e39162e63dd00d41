//! Integration tests for the reqwest transport against a local HTTP responder.

#![cfg(feature = "reqwest")]

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use vouch_fetch::{AttemptController, AttemptError, ReqwestTransport, Transport, TransportError};

const BODY: &[u8] = b"\xef\xbb\xbfvar lib = 1;\r\n\xe9";

/// Serve a fixed set of responses on an ephemeral port.
///
/// `/ok` returns [`BODY`], `/hang` never answers, anything else is a 404.
async fn serve() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let line = String::from_utf8_lossy(&request);
                let path = line.split_whitespace().nth(1).unwrap_or("/").to_string();

                let response = match path.as_str() {
                    "/ok" => {
                        let mut r = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: text/javascript; charset=iso-8859-1\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                            BODY.len()
                        )
                        .into_bytes();
                        r.extend_from_slice(BODY);
                        r
                    }
                    "/hang" => {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        return;
                    }
                    _ => b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_vec(),
                };
                let _ = stream.write_all(&response).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn test_reqwest_preserves_raw_bytes() {
    let base = serve().await;
    let transport = ReqwestTransport::new().unwrap();
    let content = transport.fetch(&format!("{base}/ok")).await.unwrap();
    assert_eq!(&content[..], BODY);
}

#[tokio::test]
async fn test_reqwest_maps_status() {
    let base = serve().await;
    let transport = ReqwestTransport::builder().user_agent("vouch-test").build().unwrap();
    let err = transport.fetch(&format!("{base}/missing")).await.unwrap_err();
    assert_eq!(err, TransportError::Status(404));
}

#[tokio::test]
async fn test_reqwest_connection_refused() {
    // Bind then drop to get a port nobody listens on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let transport = ReqwestTransport::new().unwrap();
    let err = transport.fetch(&format!("http://127.0.0.1:{port}/ok")).await.unwrap_err();
    assert!(matches!(err, TransportError::Transport(_)));
}

#[tokio::test]
async fn test_controller_times_out_hanging_source() {
    let base = serve().await;
    let controller = AttemptController::new(ReqwestTransport::new().unwrap());
    let err = controller
        .run(&format!("{base}/hang"), Some(Duration::from_millis(200)))
        .await
        .unwrap_err();
    assert_eq!(err, AttemptError::Timeout(Duration::from_millis(200)));
}
