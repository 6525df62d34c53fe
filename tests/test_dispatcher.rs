//! Tests for control command decoding and dispatch

mod common;

use std::collections::HashMap;

use common::{dispatcher, KICK_BODY};
use stream_monitor::config::StreamPorts;
use stream_monitor::control::{Command, DispatchError, StreamType};
use stream_monitor::http::request::{Method, Request};
use stream_monitor::http::response::StatusCode;

fn request(method: Method, body: &str) -> Request {
    Request {
        method,
        path: "/control".to_string(),
        version: "HTTP/1.1".to_string(),
        headers: HashMap::new(),
        content_length: body.len(),
        body: body.as_bytes().to_vec(),
    }
}

#[test]
fn test_decode_kick_command() {
    let command = Command::from_request(&request(Method::POST, KICK_BODY)).unwrap();

    assert_eq!(
        command,
        Command::Kick {
            tc_url: "rtz://h:8000".to_string(),
            stream: "s1".to_string(),
        }
    );
}

#[test]
fn test_extra_fields_are_ignored() {
    let body = r#"{"control":"kick","tcUrl":"u","stream":"s","reason":"abuse"}"#;

    assert!(Command::from_request(&request(Method::POST, body)).is_ok());
}

#[test]
fn test_method_checked_before_json() {
    // Invalid JSON, but the wrong method is reported first.
    let err = Command::from_request(&request(Method::PUT, "{bad}")).unwrap_err();

    assert!(matches!(err, DispatchError::NotPostWithBody { method: Method::PUT, .. }));
}

#[test]
fn test_empty_body_rejected() {
    let err = Command::from_request(&request(Method::POST, "")).unwrap_err();

    assert!(matches!(err, DispatchError::NotPostWithBody { body_len: 0, .. }));
}

#[test]
fn test_json_checked_before_fields() {
    let err = Command::from_request(&request(Method::POST, "{bad}")).unwrap_err();

    assert!(matches!(err, DispatchError::InvalidJson(_)));
}

#[test]
fn test_non_object_json_rejected() {
    let err = Command::from_request(&request(Method::POST, r#"["kick","u","s"]"#)).unwrap_err();

    assert!(matches!(err, DispatchError::NotAnObject));
}

#[test]
fn test_fields_checked_before_command_name() {
    let err = Command::from_request(&request(Method::POST, r#"{"control":"ban","tcUrl":"u"}"#))
        .unwrap_err();

    assert!(matches!(err, DispatchError::MissingField(_)));
}

#[test]
fn test_null_field_counts_as_missing() {
    let body = r#"{"control":"kick","tcUrl":"u","stream":null}"#;
    let err = Command::from_request(&request(Method::POST, body)).unwrap_err();

    assert!(matches!(err, DispatchError::MissingField(_)));
}

#[test]
fn test_non_string_field_counts_as_missing() {
    let body = r#"{"control":"kick","tcUrl":"u","stream":42}"#;
    let err = Command::from_request(&request(Method::POST, body)).unwrap_err();

    assert!(matches!(err, DispatchError::MissingField(_)));
}

#[test]
fn test_unknown_command() {
    let body = r#"{"control":"mute","tcUrl":"u","stream":"s"}"#;
    let err = Command::from_request(&request(Method::POST, body)).unwrap_err();

    assert!(matches!(err, DispatchError::UnknownCommand(ref name) if name == "mute"));
}

#[test]
fn test_dispatch_kick_replies_ok() {
    let (kicker, dispatcher) = dispatcher();

    let response = dispatcher.dispatch(&request(Method::POST, KICK_BODY));

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, br#"{"code":1,"data":"OK"}"#.to_vec());
    assert_eq!(
        kicker.kicks(),
        vec![("rtz://h:8000".to_string(), "s1".to_string())]
    );
}

#[test]
fn test_dispatch_failure_is_bodyless_500() {
    let (kicker, dispatcher) = dispatcher();

    for (method, body) in [
        (Method::GET, ""),
        (Method::POST, "{bad}"),
        (Method::POST, r#"{"control":"kick","tcUrl":"u"}"#),
        (Method::POST, r#"{"control":"mute","tcUrl":"u","stream":"s"}"#),
    ] {
        let response = dispatcher.dispatch(&request(method, body));
        assert_eq!(response.status, StatusCode::InternalServerError, "{body}");
        assert!(response.body.is_empty());
    }
    assert!(kicker.kicks().is_empty());
}

#[test]
fn test_stream_type_classification() {
    let ports = StreamPorts {
        signal_port: 8000,
        hls_port: 8080,
    };

    assert_eq!(StreamType::classify("rtz://h:8000", &ports), StreamType::Rtz);
    assert_eq!(StreamType::classify("rtmp://10.0.0.1:8080/live", &ports), StreamType::Hls);
    assert_eq!(StreamType::classify("rtz://h:9000", &ports), StreamType::Unknown);
    assert_eq!(StreamType::classify("rtz://h", &ports), StreamType::Unknown);
    assert_eq!(StreamType::classify("not a url", &ports), StreamType::Unknown);
}

#[test]
fn test_stream_type_default_port() {
    let ports = StreamPorts {
        signal_port: 443,
        hls_port: 80,
    };

    assert_eq!(StreamType::classify("http://h:80/live", &ports), StreamType::Hls);
    assert_eq!(StreamType::classify("http://h/live", &ports), StreamType::Hls);
    assert_eq!(StreamType::classify("https://h/live", &ports), StreamType::Rtz);
    assert_eq!(StreamType::classify("rtz://h/live", &ports), StreamType::Unknown);
}
