use chrono::{DateTime, Utc};
use tracing::Span;

use crate::providers::types::objectid::create_object_id;

/// Request-scoped values threaded through the gateway and dispatcher.
///
/// `now` is the reference clock for relative dates and list defaults; it is
/// captured once so every step of a request agrees on "today".
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub now: DateTime<Utc>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            request_id: create_object_id("req"),
            now,
        }
    }

    /// Current date as `YYYY-MM-DD`
    pub fn today(&self) -> String {
        self.now.format("%Y-%m-%d").to_string()
    }

    pub fn span(&self) -> Span {
        tracing::info_span!("request", request_id = %self.request_id)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
