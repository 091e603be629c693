use std::rc::Rc;

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::{ApiError, Backend};
use crate::config::Config;
use crate::types::{
    DownloadSnapshot, JobRequest, Listing, PackSnapshot, Settings, TaskKind, TaskSnapshot,
    TaskTicket, TerminalOutput,
};

impl From<gloo_net::Error> for ApiError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(e) => ApiError::Decode(e.to_string()),
            other => ApiError::Network(other.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

/// JSON-over-fetch client for the crawler API.
#[derive(Clone)]
pub struct HttpBackend {
    config: Rc<Config>,
}

impl HttpBackend {
    pub fn new(config: Rc<Config>) -> Self {
        Self { config }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = Request::get(&self.config.url(path)).send().await?;
        Ok(check(response).await?.json::<T>().await?)
    }
}

/// Turns a non-2xx response into [`ApiError::Status`], keeping a string `detail`.
async fn check(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.detail)
        .and_then(|d| d.as_str().map(str::to_string));
    Err(ApiError::Status { status, detail })
}

impl Backend for HttpBackend {
    async fn ping(&self) -> Result<(), ApiError> {
        let response = Request::get(&self.config.url("/")).send().await?;
        check(response).await.map(|_| ())
    }

    async fn load_settings(&self) -> Result<Settings, ApiError> {
        self.get_json("/api/settings").await
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), ApiError> {
        let response = Request::post(&self.config.url("/api/settings"))
            .json(settings)?
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    async fn submit(&self, job: &JobRequest) -> Result<TaskTicket, ApiError> {
        let url = self.config.url(&format!("/api/{}", job.kind().route()));
        let request = match job {
            JobRequest::Download(body) => Request::post(&url).json(body)?,
            JobRequest::Pack(body) => Request::post(&url).json(body)?,
        };
        let response = check(request.send().await?).await?;
        Ok(response.json::<TaskTicket>().await?)
    }

    async fn task_status(&self, kind: TaskKind, task_id: &str) -> Result<TaskSnapshot, ApiError> {
        let path = format!("/api/{}/{}", kind.route(), task_id);
        match kind {
            TaskKind::Download => self.get_json::<DownloadSnapshot>(&path).await.map(Into::into),
            TaskKind::Pack => self.get_json::<PackSnapshot>(&path).await.map(Into::into),
        }
    }

    async fn terminal_output(&self, task_id: &str) -> Result<Vec<String>, ApiError> {
        let body: TerminalOutput = self.get_json(&format!("/api/terminal/{task_id}")).await?;
        Ok(body.output)
    }

    async fn browse(&self, path: &str) -> Result<Listing, ApiError> {
        let response = Request::get(&self.config.url("/api/browse"))
            .query([("path", path)])
            .send()
            .await?;
        Ok(check(response).await?.json::<Listing>().await?)
    }

    async fn shutdown(&self) -> Result<(), ApiError> {
        let response = Request::post(&self.config.url("/api/shutdown"))
            .header("Content-Type", "application/json")
            .send()
            .await?;
        check(response).await.map(|_| ())
    }
}
