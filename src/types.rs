use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Persisted backend settings. Always sent as a whole object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub download_path: String,
    pub thread_count: u32,
    pub image_format: String,
    pub client_type: String,
    pub kavita_output_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            download_path: String::new(),
            thread_count: 5,
            image_format: ".jpg".into(),
            client_type: "html".into(),
            kavita_output_dir: String::new(),
        }
    }
}

pub const IMAGE_FORMATS: &[&str] = &[".jpg", ".png", ".webp"];
pub const CLIENT_TYPES: &[&str] = &["html", "api"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Download,
    Pack,
}

impl TaskKind {
    /// Path segment under `/api/`.
    pub fn route(self) -> &'static str {
        match self {
            TaskKind::Download => "download",
            TaskKind::Pack => "pack",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Error,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    /// Pending and running tasks keep the poller alive; anything else is terminal.
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Error => "error",
            TaskStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    #[serde(alias = "warn")]
    Warning,
    Error,
    #[serde(other)]
    Other,
}

impl LogLevel {
    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Info | LogLevel::Other => "INFO",
            LogLevel::Success => "SUCCESS",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    pub album_ids: Vec<String>,
    pub download_path: String,
    pub thread_count: u32,
    pub image_format: String,
    pub client_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackRequest {
    pub source_dir: String,
    pub output_dir: String,
    pub overwrite: bool,
    pub compress_level: u32,
}

/// A submission for either task kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobRequest {
    Download(DownloadRequest),
    Pack(PackRequest),
}

impl JobRequest {
    pub fn kind(&self) -> TaskKind {
        match self {
            JobRequest::Download(_) => TaskKind::Download,
            JobRequest::Pack(_) => TaskKind::Pack,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskTicket {
    pub task_id: String,
}

/// `GET /api/download/{task_id}` body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownloadSnapshot {
    pub status: TaskStatus,
    #[serde(default)]
    pub album_ids: Vec<String>,
    /// Only counted; entries are opaque.
    #[serde(default)]
    pub completed: Vec<Value>,
    #[serde(default)]
    pub failed: Vec<Value>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PackStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub success: u64,
    #[serde(default)]
    pub failed: u64,
}

/// `GET /api/pack/{task_id}` body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackSnapshot {
    pub status: TaskStatus,
    #[serde(default)]
    pub stats: PackStats,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub total: u64,
    pub completed: u64,
    pub failed: u64,
}

impl Progress {
    /// `round(100 * (completed + failed) / total)`, 0 for an empty task.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let done = (self.completed + self.failed) as f64;
        let pct = (done / self.total as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }
}

/// Status snapshot normalised across task kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub status: TaskStatus,
    pub progress: Progress,
    pub logs: Vec<LogEntry>,
}

impl From<DownloadSnapshot> for TaskSnapshot {
    fn from(s: DownloadSnapshot) -> Self {
        TaskSnapshot {
            status: s.status,
            progress: Progress {
                total: s.album_ids.len() as u64,
                completed: s.completed.len() as u64,
                failed: s.failed.len() as u64,
            },
            logs: s.logs,
        }
    }
}

impl From<PackSnapshot> for TaskSnapshot {
    fn from(s: PackSnapshot) -> Self {
        TaskSnapshot {
            status: s.status,
            progress: Progress {
                total: s.stats.total,
                completed: s.stats.success,
                failed: s.stats.failed,
            },
            logs: s.logs,
        }
    }
}

/// `GET /api/terminal/{task_id}` body; the full history on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TerminalOutput {
    #[serde(default)]
    pub output: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListingItem {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
}

/// `GET /api/browse` body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Listing {
    pub current: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub is_root: bool,
    #[serde(default)]
    pub items: Vec<ListingItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_zero_for_empty_task() {
        let p = Progress { total: 0, completed: 0, failed: 0 };
        assert_eq!(p.percent(), 0);
    }

    #[test]
    fn percent_rounds_completed_plus_failed() {
        let p = Progress { total: 3, completed: 1, failed: 1 };
        assert_eq!(p.percent(), 67);
        let p = Progress { total: 8, completed: 1, failed: 0 };
        assert_eq!(p.percent(), 13);
        let p = Progress { total: 4, completed: 3, failed: 1 };
        assert_eq!(p.percent(), 100);
    }

    #[test]
    fn download_snapshot_counts_lists() {
        let raw = r#"{
            "status": "running",
            "album_ids": ["1", "2", "3", "4"],
            "completed": [{"id": "1", "name": "A", "path": "/d"}],
            "failed": [{"id": "2", "error": "boom"}],
            "logs": [{"level": "warning", "message": "skip"}]
        }"#;
        let snap: TaskSnapshot = serde_json::from_str::<DownloadSnapshot>(raw).unwrap().into();
        assert_eq!(snap.status, TaskStatus::Running);
        assert_eq!(snap.progress, Progress { total: 4, completed: 1, failed: 1 });
        assert_eq!(snap.progress.percent(), 50);
        assert_eq!(snap.logs[0].level, LogLevel::Warning);
    }

    #[test]
    fn pack_snapshot_maps_stats() {
        let raw = r#"{
            "status": "completed",
            "source_dir": "/in",
            "output_dir": "/out",
            "stats": {"success": 2, "failed": 1, "total": 3},
            "files": ["/out/a.cbz"],
            "logs": []
        }"#;
        let snap: TaskSnapshot = serde_json::from_str::<PackSnapshot>(raw).unwrap().into();
        assert_eq!(snap.progress, Progress { total: 3, completed: 2, failed: 1 });
        assert!(!snap.status.is_active());
    }

    #[test]
    fn unknown_status_is_terminal() {
        let status: TaskStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, TaskStatus::Unknown);
        assert!(!status.is_active());
        assert!(TaskStatus::Pending.is_active());
    }

    #[test]
    fn settings_fill_missing_fields_with_defaults() {
        let s: Settings = serde_json::from_str(r#"{"download_path": "/x"}"#).unwrap();
        assert_eq!(s.download_path, "/x");
        assert_eq!(s.thread_count, 5);
        assert_eq!(s.client_type, "html");
    }

    #[test]
    fn listing_without_parent_parses() {
        let raw = r#"{"current": "This PC", "parent": null, "items": [], "is_root": true}"#;
        let listing: Listing = serde_json::from_str(raw).unwrap();
        assert!(listing.is_root);
        assert_eq!(listing.parent, None);
    }
}
