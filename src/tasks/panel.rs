use crate::api::ApiError;
use crate::tasks::poller::PollEvent;
use crate::types::{LogEntry, LogLevel, Progress, TaskKind, TaskStatus};

pub const TERMINAL_PLACEHOLDER: &str = "waiting for task output...";

/// A rendered log line with its local display time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub time: String,
    pub level: LogLevel,
    pub message: String,
}

impl LogLine {
    pub fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            time: chrono::Local::now().format("%H:%M:%S").to_string(),
            level,
            message: message.into(),
        }
    }
}

/// Escapes `&`, `<` and `>` and nothing else.
pub fn escape_terminal_line(line: &str) -> String {
    line.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Progress, log and terminal state for one task kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPanel {
    kind: TaskKind,
    task_id: Option<String>,
    busy: bool,
    visible: bool,
    progress: Progress,
    status: Option<TaskStatus>,
    logs: Vec<LogLine>,
    /// `None` until the first terminal reply; the view shows a placeholder.
    terminal: Option<Vec<String>>,
    /// Snapshot log entries already rendered for `task_id`.
    cursor: usize,
}

impl TaskPanel {
    pub fn new(kind: TaskKind) -> Self {
        Self {
            kind,
            task_id: None,
            busy: false,
            visible: false,
            progress: Progress::default(),
            status: None,
            logs: Vec::new(),
            terminal: None,
            cursor: 0,
        }
    }

    pub fn task_id(&self) -> Option<&str> {
        self.task_id.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn logs(&self) -> &[LogLine] {
        &self.logs
    }

    pub fn terminal(&self) -> Option<&[String]> {
        self.terminal.as_deref()
    }

    pub fn status_label(&self) -> String {
        match &self.status {
            None => "pending".into(),
            Some(TaskStatus::Running) => match self.kind {
                TaskKind::Download => "downloading...".into(),
                TaskKind::Pack => "packing...".into(),
            },
            Some(other) => other.as_str().into(),
        }
    }

    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        self.logs.push(LogLine::now(level, message));
    }

    /// Resets everything for a new submission and disables the submit control.
    pub fn begin(&mut self, intro: impl Into<String>) {
        *self = TaskPanel::new(self.kind);
        self.busy = true;
        self.visible = true;
        self.push(LogLevel::Info, intro);
    }

    pub fn started(&mut self, task_id: &str) {
        self.task_id = Some(task_id.to_string());
        self.cursor = 0;
    }

    pub fn rejected(&mut self, err: &ApiError) {
        let label = match self.kind {
            TaskKind::Download => "download request failed",
            TaskKind::Pack => "pack request failed",
        };
        self.push(LogLevel::Error, format!("Could not start: {}", err.user_message(label)));
        self.busy = false;
    }

    pub fn apply(&mut self, event: PollEvent) {
        match event {
            PollEvent::Snapshot(snapshot) => {
                self.progress = snapshot.progress;
                self.status = Some(snapshot.status);
                self.append_new_logs(&snapshot.logs);
            }
            PollEvent::Terminal(lines) => self.terminal = Some(lines),
            PollEvent::Finished(status) => {
                self.busy = false;
                let (level, message) = self.finish_message(&status);
                self.push(level, message);
            }
        }
    }

    /// Renders each server log entry exactly once. If the server's list
    /// shrank, re-anchor at its new end instead of replaying it.
    fn append_new_logs(&mut self, entries: &[LogEntry]) {
        if entries.len() < self.cursor {
            self.cursor = entries.len();
            return;
        }
        for entry in &entries[self.cursor..] {
            self.logs.push(LogLine::now(entry.level, entry.message.clone()));
        }
        self.cursor = entries.len();
    }

    fn finish_message(&self, status: &TaskStatus) -> (LogLevel, String) {
        match (self.kind, status) {
            (TaskKind::Download, TaskStatus::Completed) => {
                (LogLevel::Success, "All downloads finished!".into())
            }
            (TaskKind::Pack, TaskStatus::Completed) => (
                LogLevel::Success,
                format!(
                    "Pack finished! Succeeded: {}, failed: {}",
                    self.progress.completed, self.progress.failed
                ),
            ),
            (TaskKind::Download, _) => (LogLevel::Error, "Download task ended abnormally".into()),
            (TaskKind::Pack, _) => (LogLevel::Error, "Pack task ended abnormally".into()),
        }
    }
}
