//! Deterministic scripted model client for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{ModelClient, RemoteError};

#[derive(Debug, Clone)]
enum Scripted {
    Value(Value),
    Unavailable(String),
    Delayed(Duration, Value),
}

#[derive(Debug, Default)]
struct MockState {
    queues: HashMap<String, VecDeque<Scripted>>,
    sticky: HashMap<String, Scripted>,
    calls: HashMap<String, u32>,
}

/// Scripted [`ModelClient`] with per-model call counting.
///
/// Responses are served from a per-model FIFO queue first, then from the
/// sticky response, and finally as an unavailability error for unscripted
/// models. Call counts include failed calls.
#[derive(Debug, Default)]
pub struct MockModelClient {
    state: Mutex<MockState>,
}

impl MockModelClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `value` for every call to `model` once its queue is drained.
    pub fn sticky_value(&self, model: &str, value: Value) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.sticky.insert(model.to_string(), Scripted::Value(value));
    }

    /// Makes `model` permanently unavailable once its queue is drained.
    pub fn sticky_unavailable(&self, model: &str, reason: &str) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .sticky
            .insert(model.to_string(), Scripted::Unavailable(reason.to_string()));
    }

    /// Queues one successful response for `model`.
    pub fn push_value(&self, model: &str, value: Value) {
        self.push(model, Scripted::Value(value));
    }

    /// Queues one unavailability failure for `model`.
    pub fn push_unavailable(&self, model: &str, reason: &str) {
        self.push(model, Scripted::Unavailable(reason.to_string()));
    }

    /// Queues one response served only after `delay` elapses.
    pub fn push_delayed(&self, model: &str, delay: Duration, value: Value) {
        self.push(model, Scripted::Delayed(delay, value));
    }

    /// Calls observed for `model` (including failures).
    pub fn call_count(&self, model: &str) -> u32 {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.get(model).copied().unwrap_or(0)
    }

    /// Calls observed across all models.
    pub fn total_calls(&self) -> u32 {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.values().sum()
    }

    fn push(&self, model: &str, scripted: Scripted) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .queues
            .entry(model.to_string())
            .or_default()
            .push_back(scripted);
    }

    fn next_for(&self, model: &str) -> Option<Scripted> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *state.calls.entry(model.to_string()).or_insert(0) += 1;

        if let Some(queued) = state.queues.get_mut(model).and_then(VecDeque::pop_front) {
            return Some(queued);
        }
        state.sticky.get(model).cloned()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn call(&self, model: &str, _payload: &Value) -> Result<Value, RemoteError> {
        match self.next_for(model) {
            Some(Scripted::Value(value)) => Ok(value),
            Some(Scripted::Delayed(delay, value)) => {
                tokio::time::sleep(delay).await;
                Ok(value)
            }
            Some(Scripted::Unavailable(reason)) => Err(RemoteError::Unavailable {
                model: model.to_string(),
                attempts: 1,
                reason,
            }),
            None => Err(RemoteError::Unavailable {
                model: model.to_string(),
                attempts: 1,
                reason: "no scripted response".to_string(),
            }),
        }
    }
}
