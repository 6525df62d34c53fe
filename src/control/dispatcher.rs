use std::sync::Arc;

use tracing::{error, info, trace};

use crate::config::StreamPorts;
use crate::control::command::{Command, DispatchError};
use crate::control::stream_type::StreamType;
use crate::http::peer::RequestHandler;
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::shard::StreamKicker;

/// Body of every successful reply.
pub const OK_BODY: &str = r#"{"code":1,"data":"OK"}"#;

/// Executes control commands against the sharding subsystem.
pub struct Dispatcher {
    kicker: Arc<dyn StreamKicker>,
    ports: StreamPorts,
}

impl Dispatcher {
    pub fn new(kicker: Arc<dyn StreamKicker>, ports: StreamPorts) -> Self {
        Self { kicker, ports }
    }

    /// Runs one request to completion and returns the reply.
    ///
    /// Any validation failure is answered with a bodyless 500.
    pub fn dispatch(&self, request: &Request) -> Response {
        match Command::from_request(request) {
            Ok(command) => self.execute(command),
            Err(e) => {
                match &e {
                    DispatchError::NotPostWithBody { .. } => {
                        trace!(method = %request.method, path = %request.path, error = %e, "rejected request");
                    }
                    _ => {
                        error!(
                            body = %String::from_utf8_lossy(&request.body),
                            error = %e,
                            "invalid control request"
                        );
                    }
                }
                Response::internal_error()
            }
        }
    }

    fn execute(&self, command: Command) -> Response {
        match command {
            Command::Kick { tc_url, stream } => {
                let stream_type = StreamType::classify(&tc_url, &self.ports);
                info!(tc_url = %tc_url, stream = %stream, ?stream_type, "kick stream");
                self.kicker.kick_stream(&tc_url, &stream);
                Response::json(StatusCode::Ok, OK_BODY)
            }
        }
    }
}

impl RequestHandler for Dispatcher {
    fn handle(&self, request: &Request) -> Response {
        self.dispatch(request)
    }
}
