use serde::Deserialize;
use thiserror::Error;

use crate::http::request::{Method, Request};

/// Why a request could not be turned into a [`Command`].
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("expected POST with a body, got {method} with {body_len} body bytes")]
    NotPostWithBody { method: Method, body_len: usize },
    #[error("body is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("body is not a JSON object")]
    NotAnObject,
    #[error("body is missing control, tcUrl or stream: {0}")]
    MissingField(#[source] serde_json::Error),
    #[error("unknown control command {0:?}")]
    UnknownCommand(String),
}

/// Wire shape of a control request body. All three fields are required strings.
#[derive(Debug, Deserialize)]
struct ControlMessage {
    control: String,
    #[serde(rename = "tcUrl")]
    tc_url: String,
    stream: String,
}

/// A validated control command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Disconnect `stream` published or played on `tc_url`.
    Kick { tc_url: String, stream: String },
}

impl Command {
    /// Validates `request` and decodes its body.
    ///
    /// Checks run in a fixed order and the first failure wins: method and
    /// body presence, JSON syntax, required fields, command name.
    pub fn from_request(request: &Request) -> Result<Self, DispatchError> {
        if request.method != Method::POST || request.body.is_empty() {
            return Err(DispatchError::NotPostWithBody {
                method: request.method,
                body_len: request.body.len(),
            });
        }

        let value: serde_json::Value =
            serde_json::from_slice(&request.body).map_err(DispatchError::InvalidJson)?;
        if !value.is_object() {
            return Err(DispatchError::NotAnObject);
        }
        let message: ControlMessage =
            serde_json::from_value(value).map_err(DispatchError::MissingField)?;

        match message.control.as_str() {
            "kick" => Ok(Command::Kick {
                tc_url: message.tc_url,
                stream: message.stream,
            }),
            _ => Err(DispatchError::UnknownCommand(message.control)),
        }
    }
}
