//! Scripted ClassyFire transport
//!
//! Replies per identifier come from a queue; the last reply repeats once the
//! queue is down to one. Every request is recorded with its (virtual) time.

use async_trait::async_trait;
use classyfire::error::{ClassyFireError, Result};
use classyfire::services::ClassificationTransport;
use classyfire::Identifier;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::time::Instant;

/// One scripted reply
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    /// Service answered but had nothing (`{}`)
    Empty,
    /// HTTP error status
    Status(u16),
}

#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue replies for `identifier` (normalized form)
    pub fn script(self, identifier: &str, replies: Vec<Reply>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(identifier.to_string(), replies.into());
        self
    }

    /// Identifiers in request order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, identifier: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == identifier)
            .count()
    }

    /// Time each request was issued
    pub fn call_instants(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }
}

#[async_trait]
impl ClassificationTransport for FakeTransport {
    async fn request(&self, identifier: &Identifier) -> Result<Value> {
        let key = identifier.as_str().to_string();
        self.calls.lock().unwrap().push((key.clone(), Instant::now()));

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            match replies.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Json(value)) => Ok(value),
            Some(Reply::Empty) => Ok(serde_json::json!({})),
            Some(Reply::Status(status)) => Err(ClassyFireError::RemoteService {
                identifier: key,
                status: Some(status),
                message: format!("HTTP {}", status),
            }),
            None => Err(ClassyFireError::RemoteService {
                identifier: key,
                status: Some(404),
                message: "not scripted".to_string(),
            }),
        }
    }
}
