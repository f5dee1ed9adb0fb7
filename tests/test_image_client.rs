use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose;
use storyboard_frames::client::{GeminiClient, ImageGenerator};
use storyboard_frames::error::ImageError;

/// What the stub server saw.
struct Captured {
    request_line: String,
    body: String,
}

/// Serves exactly one canned response on a local port.
fn serve_once(status: &'static str, body: impl Into<Vec<u8>>) -> (String, JoinHandle<Captured>) {
    let body: Vec<u8> = body.into();
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}/v1beta/models", listener.local_addr().expect("addr"));

    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("request line");
        let mut content_length = 0usize;
        let mut chunked = false;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("header line");
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().expect("content length");
            } else if name.eq_ignore_ascii_case("transfer-encoding") {
                chunked = value.trim().eq_ignore_ascii_case("chunked");
            }
        }
        let request_body = if chunked {
            read_chunked(&mut reader)
        } else {
            let mut request_body = vec![0; content_length];
            reader.read_exact(&mut request_body).expect("request body");
            request_body
        };

        let mut stream = stream;
        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .expect("write response head");
        stream.write_all(&body).expect("write response body");
        stream.flush().expect("flush");

        Captured {
            request_line: request_line.trim_end().to_string(),
            body: String::from_utf8(request_body).expect("utf8 body"),
        }
    });
    (base, handle)
}

fn read_chunked(reader: &mut impl BufRead) -> Vec<u8> {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        reader.read_line(&mut size_line).expect("chunk size");
        let size = usize::from_str_radix(size_line.trim(), 16).expect("hex chunk size");
        let mut chunk = vec![0; size + 2];
        reader.read_exact(&mut chunk).expect("chunk");
        if size == 0 {
            return body;
        }
        body.extend_from_slice(&chunk[..size]);
    }
}

fn client_for(base: &str) -> GeminiClient {
    GeminiClient::new(base, "gemini-test", "secret", Duration::from_secs(10)).expect("client")
}

#[test]
fn returns_decoded_image_bytes() {
    let png = b"\x89PNG\r\n\x1a\nfake image".to_vec();
    let body = serde_json::json!({
        "candidates": [{"content": {"parts": [
            {"text": "Here is your frame."},
            {"inlineData": {"mimeType": "image/png", "data": general_purpose::STANDARD.encode(&png)}}
        ]}}]
    })
    .to_string();
    let (base, server) = serve_once("200 OK", body);

    let bytes = client_for(&base).generate("a dune").expect("generate");
    assert_eq!(bytes, png);

    let captured = server.join().expect("server thread");
    assert_eq!(
        captured.request_line,
        "POST /v1beta/models/gemini-test:generateContent?key=secret HTTP/1.1"
    );
    let sent: serde_json::Value = serde_json::from_str(&captured.body).expect("json body");
    assert_eq!(sent["contents"][0]["parts"][0]["text"], "a dune");
    assert_eq!(
        sent["generationConfig"]["responseModalities"],
        serde_json::json!(["TEXT", "IMAGE"])
    );
}

#[test]
fn error_status_carries_code_and_body() {
    let (base, server) = serve_once(
        "429 Too Many Requests",
        r#"{"error":{"code":429,"message":"slow down"}}"#.to_string(),
    );

    match client_for(&base).generate("a dune") {
        Err(ImageError::Http { status, body }) => {
            assert_eq!(status, 429);
            assert!(body.contains("slow down"));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
    server.join().expect("server thread");
}

#[test]
fn error_status_with_binary_body_keeps_the_status() {
    let (base, server) = serve_once("502 Bad Gateway", b"\xff\xfe bad gateway".to_vec());

    match client_for(&base).generate("a dune") {
        Err(ImageError::Http { status, body }) => {
            assert_eq!(status, 502);
            assert!(body.ends_with(" bad gateway"));
            assert!(body.starts_with('\u{FFFD}'));
        }
        other => panic!("expected Http error, got {other:?}"),
    }
    server.join().expect("server thread");
}

#[test]
fn success_without_image_is_an_error() {
    let (base, server) = serve_once(
        "200 OK",
        r#"{"candidates":[{"content":{"parts":[{"text":"no can do"}]}}]}"#.to_string(),
    );
    let err = client_for(&base).generate("a dune").expect_err("no image");
    assert!(matches!(err, ImageError::NoImage(ref snapshot) if snapshot.contains("no can do")));
    server.join().expect("server thread");
}

#[test]
fn connection_refused_is_a_network_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let client = client_for(&format!("http://127.0.0.1:{port}/v1beta/models"));
    assert!(matches!(
        client.generate("a dune"),
        Err(ImageError::Network(_))
    ));
}
