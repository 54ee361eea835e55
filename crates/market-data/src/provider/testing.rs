//! Scripted transport for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::traits::HttpTransport;
use crate::errors::MarketDataError;

enum MockReply {
    Body(String),
    Error(MarketDataError),
}

/// Answers each URL with a canned body or error and records every call.
/// Unknown URLs fail as unreachable.
#[derive(Default)]
pub(crate) struct MockTransport {
    replies: HashMap<String, MockReply>,
    calls: Mutex<Vec<(String, Duration)>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_body(mut self, url: &str, body: &str) -> Self {
        self.replies
            .insert(url.to_string(), MockReply::Body(body.to_string()));
        self
    }

    pub(crate) fn with_error(mut self, url: &str, error: MarketDataError) -> Self {
        self.replies.insert(url.to_string(), MockReply::Error(error));
        self
    }

    pub(crate) fn calls_to(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(called, _)| called == url)
            .count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn last_timeout(&self) -> Option<Duration> {
        self.calls.lock().unwrap().last().map(|(_, timeout)| *timeout)
    }
}

fn replay(error: &MarketDataError) -> MarketDataError {
    match error {
        MarketDataError::Timeout { source_id } => MarketDataError::Timeout {
            source_id: source_id.clone(),
        },
        MarketDataError::HttpStatus { source_id, status } => MarketDataError::HttpStatus {
            source_id: source_id.clone(),
            status: *status,
        },
        other => MarketDataError::SourceUnavailable {
            source_id: "mock".to_string(),
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get_text(
        &self,
        source_id: &str,
        url: &str,
        timeout: Duration,
    ) -> Result<String, MarketDataError> {
        self.calls.lock().unwrap().push((url.to_string(), timeout));

        match self.replies.get(url) {
            Some(MockReply::Body(body)) => Ok(body.clone()),
            Some(MockReply::Error(error)) => Err(replay(error)),
            None => Err(MarketDataError::SourceUnavailable {
                source_id: source_id.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }
}
