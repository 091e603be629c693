//! Backend REST contract.
//!
//! Every endpoint the UI talks to is one method on [`Backend`]. The browser
//! build uses [`http::HttpBackend`]; tests script a fake.

#[cfg(target_arch = "wasm32")]
pub mod http;

use thiserror::Error;

use crate::types::{JobRequest, Listing, Settings, TaskKind, TaskSnapshot, TaskTicket};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status}{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    Status { status: u16, detail: Option<String> },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text for the user: the server's `detail` when it sent one, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status { detail: Some(detail), .. } => detail.clone(),
            ApiError::Status { .. } => fallback.to_string(),
            other => format!("{fallback} ({other})"),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait Backend {
    /// `GET /`; any 2xx means the backend is alive.
    async fn ping(&self) -> Result<(), ApiError>;

    async fn load_settings(&self) -> Result<Settings, ApiError>;

    async fn save_settings(&self, settings: &Settings) -> Result<(), ApiError>;

    /// `POST /api/download` or `POST /api/pack`.
    async fn submit(&self, job: &JobRequest) -> Result<TaskTicket, ApiError>;

    async fn task_status(&self, kind: TaskKind, task_id: &str) -> Result<TaskSnapshot, ApiError>;

    /// Full terminal history for the task, replayed from the start.
    async fn terminal_output(&self, task_id: &str) -> Result<Vec<String>, ApiError>;

    /// Empty `path` lists the volumes.
    async fn browse(&self, path: &str) -> Result<Listing, ApiError>;

    async fn shutdown(&self) -> Result<(), ApiError>;
}
