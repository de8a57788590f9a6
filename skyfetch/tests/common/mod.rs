//! Scripted HTTP stand-in shared by the pipeline tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use skyfetch::{FetchError, FetchResult, HttpGet};

/// What the stub answers for a request.
#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Status(u16),
}

/// Answers requests from a script keyed by the Horizons `COMMAND` parameter,
/// falling back to a default reply (used for the single catalog request).
#[derive(Default)]
pub struct ScriptedHttp {
    by_command: HashMap<String, Reply>,
    fallback: Option<Reply>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedHttp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply used for any request without a scripted `COMMAND`.
    pub fn always(reply: Reply) -> Self {
        Self {
            fallback: Some(reply),
            ..Self::default()
        }
    }

    pub fn on_command(mut self, command: &str, reply: Reply) -> Self {
        self.by_command.insert(command.to_string(), reply);
        self
    }

    /// `COMMAND` values (or the URL, for requests without one) in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl HttpGet for ScriptedHttp {
    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> FetchResult<String> {
        let command = query
            .iter()
            .find(|(k, _)| *k == "COMMAND")
            .map(|(_, v)| v.to_string());
        self.calls
            .borrow_mut()
            .push(command.clone().unwrap_or_else(|| url.to_string()));

        let reply = command
            .and_then(|c| self.by_command.get(&c))
            .or(self.fallback.as_ref())
            .cloned()
            .unwrap_or(Reply::Status(404));

        match reply {
            Reply::Body(body) => Ok(body),
            Reply::Status(status) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
        }
    }
}

/// A Horizons reply wrapping `result` text the way the API does.
pub fn horizons_reply(result: &str) -> Reply {
    Reply::Body(
        serde_json::json!({
            "signature": {"source": "NASA/JPL Horizons API", "version": "1.2"},
            "result": result,
        })
        .to_string(),
    )
}

/// A Horizons reply with no `result` field.
pub fn horizons_error(message: &str) -> Reply {
    Reply::Body(
        serde_json::json!({
            "signature": {"source": "NASA/JPL Horizons API", "version": "1.2"},
            "error": message,
        })
        .to_string(),
    )
}
