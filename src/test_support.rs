use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::api::{ApiError, Backend};
use crate::tasks::poller::{CancelToken, Timer};
use crate::types::{
    JobRequest, Listing, ListingItem, LogEntry, LogLevel, Progress, Settings, TaskKind,
    TaskSnapshot, TaskStatus, TaskTicket,
};

/// Scripted backend. Status and terminal replies are consumed in order;
/// every call is recorded in `calls`.
#[derive(Default)]
pub struct FakeBackend {
    ping: RefCell<Option<ApiError>>,
    settings: RefCell<Settings>,
    saved: RefCell<Vec<Settings>>,
    fail_saves: Cell<bool>,
    submit_reply: RefCell<Option<Result<TaskTicket, ApiError>>>,
    submitted: RefCell<Vec<JobRequest>>,
    statuses: RefCell<VecDeque<Result<TaskSnapshot, ApiError>>>,
    terminal: RefCell<VecDeque<Result<Vec<String>, ApiError>>>,
    listings: RefCell<HashMap<String, Listing>>,
    calls: RefCell<Vec<String>>,
}

impl FakeBackend {
    pub fn set_ping(&self, reply: Result<(), ApiError>) {
        *self.ping.borrow_mut() = reply.err();
    }

    pub fn set_settings(&self, settings: Settings) {
        *self.settings.borrow_mut() = settings;
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    pub fn saved_settings(&self) -> Vec<Settings> {
        self.saved.borrow().clone()
    }

    pub fn set_submit(&self, reply: Result<TaskTicket, ApiError>) {
        *self.submit_reply.borrow_mut() = Some(reply);
    }

    pub fn submitted(&self) -> Vec<JobRequest> {
        self.submitted.borrow().clone()
    }

    pub fn push_status(&self, reply: Result<TaskSnapshot, ApiError>) {
        self.statuses.borrow_mut().push_back(reply);
    }

    pub fn push_terminal(&self, reply: Result<Vec<String>, ApiError>) {
        self.terminal.borrow_mut().push_back(reply);
    }

    pub fn add_listing(&self, path: &str, listing: Listing) {
        self.listings.borrow_mut().insert(path.to_string(), listing);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl Backend for FakeBackend {
    async fn ping(&self) -> Result<(), ApiError> {
        self.record("GET /".into());
        match self.ping.borrow().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn load_settings(&self) -> Result<Settings, ApiError> {
        self.record("GET /api/settings".into());
        Ok(self.settings.borrow().clone())
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), ApiError> {
        self.record("POST /api/settings".into());
        if self.fail_saves.get() {
            return Err(ApiError::Status { status: 500, detail: None });
        }
        self.saved.borrow_mut().push(settings.clone());
        Ok(())
    }

    async fn submit(&self, job: &JobRequest) -> Result<TaskTicket, ApiError> {
        self.record(format!("POST /api/{}", job.kind().route()));
        self.submitted.borrow_mut().push(job.clone());
        self.submit_reply
            .borrow()
            .clone()
            .unwrap_or_else(|| Ok(ticket(&format!("{}_1", job.kind().route()))))
    }

    async fn task_status(&self, kind: TaskKind, task_id: &str) -> Result<TaskSnapshot, ApiError> {
        self.record(format!("GET /api/{}/{}", kind.route(), task_id));
        self.statuses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted status".into())))
    }

    async fn terminal_output(&self, task_id: &str) -> Result<Vec<String>, ApiError> {
        self.record(format!("GET /api/terminal/{task_id}"));
        self.terminal.borrow_mut().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn browse(&self, path: &str) -> Result<Listing, ApiError> {
        self.record(format!("GET /api/browse?path={path}"));
        self.listings.borrow().get(path).cloned().ok_or(ApiError::Status {
            status: 404,
            detail: Some("directory not found".into()),
        })
    }

    async fn shutdown(&self) -> Result<(), ApiError> {
        self.record("POST /api/shutdown".into());
        Ok(())
    }
}

/// Records requested sleeps and returns immediately. Optionally cancels a
/// token once a given number of sleeps has been requested.
#[derive(Default)]
pub struct FakeTimer {
    sleeps: RefCell<Vec<Duration>>,
    cancel_after: RefCell<Option<(usize, CancelToken)>>,
}

impl FakeTimer {
    pub fn cancel_after(&self, sleeps: usize, token: CancelToken) {
        *self.cancel_after.borrow_mut() = Some((sleeps, token));
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Timer for FakeTimer {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        if let Some((after, token)) = self.cancel_after.borrow().as_ref() {
            if self.sleeps.borrow().len() >= *after {
                token.cancel();
            }
        }
    }
}

pub fn ticket(task_id: &str) -> TaskTicket {
    TaskTicket { task_id: task_id.into() }
}

pub fn snapshot(status: TaskStatus, total: u64, completed: u64, failed: u64) -> TaskSnapshot {
    TaskSnapshot {
        status,
        progress: Progress { total, completed, failed },
        logs: Vec::new(),
    }
}

pub fn entry(level: LogLevel, message: &str) -> LogEntry {
    LogEntry { level, message: message.into() }
}

pub fn dir(name: &str, path: &str) -> ListingItem {
    ListingItem { name: name.into(), path: path.into(), is_dir: true }
}

pub fn file(name: &str, path: &str) -> ListingItem {
    ListingItem { name: name.into(), path: path.into(), is_dir: false }
}

pub fn listing(current: &str, parent: Option<&str>, items: Vec<ListingItem>) -> Listing {
    Listing {
        current: current.into(),
        parent: parent.map(str::to_string),
        is_root: false,
        items,
    }
}

pub fn root_listing(volumes: Vec<ListingItem>) -> Listing {
    Listing {
        current: "This PC".into(),
        parent: None,
        is_root: true,
        items: volumes,
    }
}
