//! Scripted `RawApiPort` for tests
//!
//! Responses are queued per path and handed out in order. Every call is
//! recorded so tests can assert on what was sent. Calls to a path with an
//! empty queue fail with `RequestFailed`.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::ports::outbound::{ApiError, RawApiPort, UploadForm};

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Get { path: String },
    Post { path: String, body: Value },
    Multipart { path: String, file_name: String, fields: Vec<(String, String)> },
    Download { path: String, body: Value },
}

impl RecordedCall {
    pub fn path(&self) -> &str {
        match self {
            Self::Get { path }
            | Self::Post { path, .. }
            | Self::Multipart { path, .. }
            | Self::Download { path, .. } => path,
        }
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Post { body, .. } | Self::Download { body, .. } => Some(body),
            _ => None,
        }
    }
}

enum Reply {
    Json(Result<Value, ApiError>),
    Bytes(Result<Vec<u8>, ApiError>),
}

struct Queued {
    reply: Reply,
    delay: Option<Duration>,
}

#[derive(Default)]
struct State {
    queues: HashMap<String, VecDeque<Queued>>,
    calls: Vec<RecordedCall>,
}

#[derive(Clone, Default)]
pub struct ScriptedApi {
    state: Arc<Mutex<State>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enqueue(&self, path: &str, reply: Reply, delay: Option<Duration>) {
        self.lock()
            .queues
            .entry(path.to_string())
            .or_default()
            .push_back(Queued { reply, delay });
    }

    pub fn respond(&self, path: &str, body: Value) -> &Self {
        self.enqueue(path, Reply::Json(Ok(body)), None);
        self
    }

    /// Like [`respond`](Self::respond), but the reply only arrives after `delay`.
    pub fn respond_after(&self, path: &str, body: Value, delay: Duration) -> &Self {
        self.enqueue(path, Reply::Json(Ok(body)), Some(delay));
        self
    }

    pub fn fail(&self, path: &str, error: ApiError) -> &Self {
        self.enqueue(path, Reply::Json(Err(error)), None);
        self
    }

    pub fn respond_bytes(&self, path: &str, bytes: Vec<u8>) -> &Self {
        self.enqueue(path, Reply::Bytes(Ok(bytes)), None);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.path() == path).collect()
    }

    pub fn pending(&self, path: &str) -> usize {
        self.lock().queues.get(path).map_or(0, VecDeque::len)
    }

    fn next(&self, path: &str, call: RecordedCall) -> Option<Queued> {
        let mut state = self.lock();
        state.calls.push(call);
        state.queues.get_mut(path).and_then(VecDeque::pop_front)
    }

    async fn next_json(&self, path: &str, call: RecordedCall) -> Result<Value, ApiError> {
        let queued = self.next(path, call);
        match queued {
            Some(Queued { reply, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                match reply {
                    Reply::Json(result) => result,
                    Reply::Bytes(_) => Err(ApiError::ParseError("queued bytes for a JSON call".into())),
                }
            }
            None => Err(ApiError::RequestFailed(format!("no scripted response for {path}"))),
        }
    }
}

#[async_trait]
impl RawApiPort for ScriptedApi {
    async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        self.next_json(path, RecordedCall::Get { path: path.to_string() })
            .await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let call = RecordedCall::Post {
            path: path.to_string(),
            body: body.clone(),
        };
        self.next_json(path, call).await
    }

    async fn post_multipart(&self, path: &str, form: UploadForm) -> Result<Value, ApiError> {
        let call = RecordedCall::Multipart {
            path: path.to_string(),
            file_name: form.file_name,
            fields: form.fields,
        };
        self.next_json(path, call).await
    }

    async fn post_for_bytes(&self, path: &str, body: &Value) -> Result<Vec<u8>, ApiError> {
        let call = RecordedCall::Download {
            path: path.to_string(),
            body: body.clone(),
        };
        match self.next(path, call) {
            Some(Queued {
                reply: Reply::Bytes(result),
                ..
            }) => result,
            Some(Queued {
                reply: Reply::Json(result),
                ..
            }) => result.map(|value| value.to_string().into_bytes()),
            None => Err(ApiError::RequestFailed(format!("no scripted response for {path}"))),
        }
    }
}
