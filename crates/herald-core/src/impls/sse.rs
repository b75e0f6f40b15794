//! Server-sent events over HTTP.
//!
//! `SseDecoder` turns raw bytes into frames (`event:` / `data:` lines ended
//! by a blank line). `HttpEventSource` opens `{base}/tasks/{task_id}/events`
//! and maps the frames onto task events.

use std::collections::VecDeque;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use tracing::{debug, warn};

use crate::domain::{ProgressPayload, TaskEvent, TaskEventKind, TaskId, TransportError};
use crate::ports::{TaskEventSource, TaskEventStream};

/// One dispatched SSE frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
}

/// Incremental SSE decoder. Chunks may split lines (and UTF-8 sequences)
/// anywhere.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk; returns every frame completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);
            if let Some(frame) = self.process_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            // id / retry are not used by task streams
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseFrame {
            event: event.unwrap_or_else(|| "message".to_string()),
            data,
        })
    }
}

/// Map a frame onto a task event. Unknown event names and undecodable
/// payloads are skipped.
pub fn frame_to_event(task_id: &TaskId, frame: SseFrame) -> Option<TaskEvent> {
    let Some(kind) = TaskEventKind::from_wire(&frame.event) else {
        debug!(task_id = %task_id, event = %frame.event, "skipping unknown task event");
        return None;
    };
    match serde_json::from_str::<ProgressPayload>(&frame.data) {
        Ok(payload) => Some(TaskEvent::new(kind, payload)),
        Err(e) => {
            warn!(task_id = %task_id, event = %frame.event, error = %e, "undecodable task event");
            None
        }
    }
}

/// HTTP transport for task events.
pub struct HttpEventSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEventSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn url_for(&self, task_id: &TaskId) -> String {
        format!("{}/tasks/{}/events", self.base_url.trim_end_matches('/'), task_id)
    }
}

struct StreamState {
    bytes: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    decoder: SseDecoder,
    queue: VecDeque<TaskEvent>,
    finished: bool,
}

#[async_trait]
impl TaskEventSource for HttpEventSource {
    async fn open(&self, task_id: &TaskId) -> Result<TaskEventStream, TransportError> {
        let response = self
            .client
            .get(self.url_for(task_id))
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                task_id: task_id.clone(),
                status: status.as_u16(),
            });
        }

        let state = StreamState {
            bytes: response
                .bytes_stream()
                .map(|chunk| chunk.map(|b| b.to_vec()))
                .boxed(),
            decoder: SseDecoder::new(),
            queue: VecDeque::new(),
            finished: false,
        };
        let task_id = task_id.clone();

        let stream = futures::stream::unfold(state, move |mut state| {
            let task_id = task_id.clone();
            async move {
                loop {
                    if let Some(event) = state.queue.pop_front() {
                        return Some((event, state));
                    }
                    if state.finished {
                        return None;
                    }
                    match state.bytes.next().await {
                        Some(Ok(chunk)) => {
                            let frames = state.decoder.feed(&chunk);
                            state
                                .queue
                                .extend(frames.into_iter().filter_map(|f| frame_to_event(&task_id, f)));
                        }
                        Some(Err(e)) => {
                            warn!(task_id = %task_id, error = %e, "task event stream broke");
                            state.finished = true;
                            state.queue.push_back(TaskEvent::new(
                                TaskEventKind::StreamFailed,
                                ProgressPayload::default().with_message(e.to_string()),
                            ));
                        }
                        None => return None,
                    }
                }
            }
        });
        Ok(stream.boxed())
    }
}
