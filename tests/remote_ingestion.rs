use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use tabular_io::TableError;
use tabular_io::ingestion::{
    DelimitedOptions, StructuredOptions, read_delimited, read_structured,
};
use tabular_io::types::{DType, Value};

/// Serve one canned HTTP response on a loopback port and return the URL.
fn serve_once(status_line: &str, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let body = body.to_string();
    let status_line = status_line.to_string();

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            // Drain the request head before answering.
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{addr}/data")
}

#[test]
fn remote_delimited_ingestion_happy_path() {
    let url = serve_once("200 OK", "a,b\n1,2\n3,4\n");
    let table = read_delimited(url, &DelimitedOptions::default()).unwrap();

    assert_eq!(table.row_count(), 2);
    assert_eq!(table.columns()[0].dtype, DType::Int32);
    assert_eq!(
        table.columns()[1].values,
        vec![Value::Int32(2), Value::Int32(4)]
    );
}

#[test]
fn non_success_status_fails_with_http_error() {
    let url = serve_once("404 Not Found", "missing");
    let err = read_delimited(url, &DelimitedOptions::default()).unwrap_err();
    match err {
        TableError::Http { status, .. } => assert_eq!(status, 404),
        other => panic!("expected Http, got {other:?}"),
    }
}

#[test]
fn refused_connection_fails_with_transport_error() {
    // Bind then immediately drop to find a port nothing listens on.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let err = read_delimited(format!("http://{addr}/data"), &DelimitedOptions::default())
        .unwrap_err();
    assert!(matches!(err, TableError::Transport { .. }));
}

#[test]
fn remote_structured_ingestion_happy_path() {
    let url = serve_once("200 OK", r#"[{"id":1,"ok":true},{"id":2,"ok":false}]"#);
    let table = read_structured(url, &StructuredOptions::default()).unwrap();

    assert_eq!(table.row_count(), 2);
    assert_eq!(table.columns()[1].dtype, DType::Bool);
}

#[test]
fn remote_structured_non_success_status_fails_with_http_error() {
    let url = serve_once("500 Internal Server Error", "boom");
    let err = read_structured(url, &StructuredOptions::default()).unwrap_err();
    assert!(matches!(err, TableError::Http { status: 500, .. }));
}
