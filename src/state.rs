use std::rc::Rc;

use yew::Reducible;

use crate::api::ApiError;
use crate::browser::{DirectoryBrowser, PickTarget};
use crate::connectivity::Connectivity;
use crate::settings::SettingsStore;
use crate::tasks::panel::TaskPanel;
use crate::tasks::submit::{DownloadForm, PackForm, ValidationError};
use crate::tasks::TaskEvent;
use crate::types::{JobRequest, Listing, LogLevel, Settings, TaskKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Download,
    Pack,
    Settings,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::Download => "Downloads",
            Page::Pack => "Kavita Pack",
            Page::Settings => "Settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Banner message; replaces blocking alerts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShutdownState {
    #[default]
    Idle,
    Sending,
    Sent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadField {
    Albums(String),
    Path(String),
    Threads(u32),
    ImageFormat(String),
    ClientType(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackField {
    Source(String),
    Output(String),
    Overwrite(bool),
    CompressLevel(u32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsField {
    DownloadPath(String),
    Threads(u32),
    ImageFormat(String),
    ClientType(String),
    KavitaOutput(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserNav {
    Open { initial: String, target: PickTarget },
    Enter(String),
    Back,
    Home,
    Select,
    Close,
}

pub enum AppAction {
    Navigate(Page),
    Connectivity(Connectivity),
    SettingsLoaded(Settings),
    SettingsUnavailable(ApiError),
    SettingsSaved(Settings),
    SettingsFailed(ApiError),
    EditSettings(SettingsField),
    ResetSettings,
    EditDownload(DownloadField),
    ClearAlbums,
    EditPack(PackField),
    /// Local validation failed; nothing was sent.
    Invalid(String),
    TaskStarting { kind: TaskKind, intro: String },
    Task { kind: TaskKind, event: TaskEvent },
    Browser(BrowserNav),
    BrowserLoaded { seq: u64, result: Result<Listing, ApiError> },
    ShutdownSending,
    ShutdownFinished(Result<(), ApiError>),
    DismissNotice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub page: Page,
    pub connectivity: Connectivity,
    pub settings: SettingsStore,
    pub download_form: DownloadForm,
    pub pack_form: PackForm,
    pub download: TaskPanel,
    pub pack: TaskPanel,
    pub browser: DirectoryBrowser,
    pub shutdown: ShutdownState,
    pub notice: Option<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            page: Page::Download,
            connectivity: Connectivity::Unknown,
            settings: SettingsStore::default(),
            download_form: DownloadForm::default(),
            pack_form: PackForm::default(),
            download: TaskPanel::new(TaskKind::Download),
            pack: TaskPanel::new(TaskKind::Pack),
            browser: DirectoryBrowser::default(),
            shutdown: ShutdownState::Idle,
            notice: None,
        }
    }
}

impl AppState {
    /// Validates the form of `kind` against the canonical settings and
    /// returns the job with the panel's opening line.
    pub fn prepare_job(&self, kind: TaskKind) -> Result<(JobRequest, String), ValidationError> {
        let settings = self.settings.canonical();
        match kind {
            TaskKind::Download => {
                let request = self.download_form.build_request(settings)?;
                let intro = format!("Starting download of {} album(s)...", request.album_ids.len());
                Ok((JobRequest::Download(request), intro))
            }
            TaskKind::Pack => {
                let request = self.pack_form.build_request(settings)?;
                Ok((JobRequest::Pack(request), "Scanning source directory...".into()))
            }
        }
    }

    fn panel_mut(&mut self, kind: TaskKind) -> &mut TaskPanel {
        match kind {
            TaskKind::Download => &mut self.download,
            TaskKind::Pack => &mut self.pack,
        }
    }

    fn info(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice { kind: NoticeKind::Info, text: text.into() });
    }

    fn error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice { kind: NoticeKind::Error, text: text.into() });
    }

    /// Loaded or saved settings become canonical; forms follow them again.
    fn adopt_settings(&mut self, settings: Settings) {
        self.settings.replace(settings);
        self.download_form.follow_settings();
        self.pack_form.follow_settings();
    }

    fn pick(&mut self, target: PickTarget, path: String) {
        match target {
            PickTarget::DownloadPath => self.download_form.download_path = Some(path),
            PickTarget::PackSource => self.pack_form.source_dir = path,
            PickTarget::PackOutput => self.pack_form.output_dir = Some(path),
            PickTarget::SettingsDownloadPath => {
                self.settings.edit_draft(|s| s.download_path = path)
            }
            PickTarget::SettingsKavitaOutput => {
                self.settings.edit_draft(|s| s.kavita_output_dir = path)
            }
        }
    }

    pub fn apply(&mut self, action: AppAction) {
        match action {
            AppAction::Navigate(page) => self.page = page,
            AppAction::Connectivity(c) => self.connectivity = c,
            AppAction::SettingsLoaded(settings) => self.adopt_settings(settings),
            AppAction::SettingsUnavailable(err) => {
                self.error(format!("Loading settings failed: {}", err.user_message("check the API connection")));
            }
            AppAction::SettingsSaved(settings) => {
                self.adopt_settings(settings);
                self.info("Settings saved");
            }
            AppAction::SettingsFailed(err) => {
                self.error(format!("Saving settings failed: {}", err.user_message("check the API connection")));
            }
            AppAction::EditSettings(field) => self.settings.edit_draft(|s| match field {
                SettingsField::DownloadPath(v) => s.download_path = v,
                SettingsField::Threads(v) => s.thread_count = v,
                SettingsField::ImageFormat(v) => s.image_format = v,
                SettingsField::ClientType(v) => s.client_type = v,
                SettingsField::KavitaOutput(v) => s.kavita_output_dir = v,
            }),
            AppAction::ResetSettings => self.settings.reset_draft(),
            AppAction::EditDownload(field) => {
                let form = &mut self.download_form;
                match field {
                    DownloadField::Albums(v) => form.album_text = v,
                    DownloadField::Path(v) => form.download_path = Some(v),
                    DownloadField::Threads(v) => form.thread_count = Some(v),
                    DownloadField::ImageFormat(v) => form.image_format = Some(v),
                    DownloadField::ClientType(v) => form.client_type = Some(v),
                }
            }
            AppAction::ClearAlbums => {
                self.download_form.album_text.clear();
                self.download.push(LogLevel::Info, "Album list cleared");
            }
            AppAction::EditPack(field) => {
                let form = &mut self.pack_form;
                match field {
                    PackField::Source(v) => form.source_dir = v,
                    PackField::Output(v) => form.output_dir = Some(v),
                    PackField::Overwrite(v) => form.overwrite = v,
                    PackField::CompressLevel(v) => form.compress_level = v,
                }
            }
            AppAction::Invalid(text) => self.error(text),
            AppAction::TaskStarting { kind, intro } => self.panel_mut(kind).begin(intro),
            AppAction::Task { kind, event } => {
                let panel = self.panel_mut(kind);
                match event {
                    TaskEvent::Started(ticket) => panel.started(&ticket.task_id),
                    TaskEvent::Rejected(err) => panel.rejected(&err),
                    TaskEvent::Poll { task_id, event } => {
                        if panel.task_id() == Some(task_id.as_str()) {
                            panel.apply(event);
                        } else {
                            tracing::debug!(%task_id, "ignoring event for superseded task");
                        }
                    }
                }
            }
            AppAction::Browser(nav) => match nav {
                BrowserNav::Open { initial, target } => self.browser.open(&initial, target),
                BrowserNav::Enter(path) => self.browser.enter(&path),
                BrowserNav::Back => self.browser.back(),
                BrowserNav::Home => self.browser.home(),
                BrowserNav::Close => self.browser.close(),
                BrowserNav::Select => match self.browser.select() {
                    Ok((target, path)) => {
                        self.pick(target, path);
                        self.browser.close();
                    }
                    Err(err) => self.error(err.to_string()),
                },
            },
            AppAction::BrowserLoaded { seq, result } => self.browser.apply(seq, result),
            AppAction::ShutdownSending => self.shutdown = ShutdownState::Sending,
            AppAction::ShutdownFinished(Ok(())) => {
                self.shutdown = ShutdownState::Sent;
                self.info("Stop request sent; the service is shutting down");
            }
            AppAction::ShutdownFinished(Err(err)) => {
                tracing::warn!(%err, "shutdown request failed");
                self.shutdown = ShutdownState::Idle;
                self.error("Stop request could not be sent; stop the service manually");
            }
            AppAction::DismissNotice => self.notice = None,
        }
    }
}

impl Reducible for AppState {
    type Action = AppAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        Rc::new(next)
    }
}
