//! Remote directory picker.
//!
//! Navigation is two-phase: a request (`open`, `enter`, `home`, `back`)
//! records a pending [`NavStep`]; the view fetches its path and feeds the
//! reply to [`DirectoryBrowser::apply`]. Replies for anything but the latest
//! step are dropped.

use thiserror::Error;

use crate::api::{ApiError, Backend};
use crate::types::{Listing, ListingItem};

/// Label shown for the volume list.
pub const ROOT_LABEL: &str = "This PC";

/// Which field receives the selected directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    DownloadPath,
    PackSource,
    PackOutput,
    SettingsDownloadPath,
    SettingsKavitaOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Choose a directory first")]
pub struct SelectError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum History {
    Reset,
    Push(String),
    Pop,
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavStep {
    pub seq: u64,
    pub path: String,
    history: History,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Session {
    target: PickTarget,
    listing: Option<Listing>,
    /// Paths to return to, most recent last. `""` is the volume list.
    history: Vec<String>,
    error: Option<String>,
    pending: Option<NavStep>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryBrowser {
    session: Option<Session>,
    seq: u64,
}

fn normalize(path: &str) -> String {
    let path = path.trim();
    if path == ROOT_LABEL {
        String::new()
    } else {
        path.to_string()
    }
}

impl DirectoryBrowser {
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn pending(&self) -> Option<&NavStep> {
        self.session.as_ref().and_then(|s| s.pending.as_ref())
    }

    pub fn listing(&self) -> Option<&Listing> {
        self.session.as_ref().and_then(|s| s.listing.as_ref())
    }

    pub fn error(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.error.as_deref())
    }

    /// Opens at `initial`; empty means the volume list.
    pub fn open(&mut self, initial: &str, target: PickTarget) {
        self.session = Some(Session {
            target,
            listing: None,
            history: Vec::new(),
            error: None,
            pending: None,
        });
        self.request(normalize(initial), History::Reset);
    }

    pub fn enter(&mut self, path: &str) {
        let here = self.here();
        self.request(normalize(path), History::Push(here));
    }

    pub fn home(&mut self) {
        let here = self.here();
        self.request(String::new(), History::Push(here));
    }

    /// No-op at the volume list. Otherwise return to the last visited
    /// directory, then the server's parent, then the volume list.
    pub fn back(&mut self) {
        if !self.can_go_back() {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let step = match session.history.last() {
            Some(prev) => (prev.clone(), History::Pop),
            None => {
                let parent = session.listing.as_ref().and_then(|l| l.parent.clone());
                (parent.unwrap_or_default(), History::Keep)
            }
        };
        self.request(step.0, step.1);
    }

    pub fn can_go_back(&self) -> bool {
        match self.listing() {
            Some(listing) => !listing.is_root,
            None => false,
        }
    }

    pub fn apply(&mut self, seq: u64, result: Result<Listing, ApiError>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let step = match session.pending.take() {
            Some(step) if step.seq == seq => step,
            other => {
                session.pending = other;
                tracing::debug!(seq, "dropping stale directory listing");
                return;
            }
        };
        match result {
            Ok(listing) => {
                match step.history {
                    History::Reset => session.history.clear(),
                    History::Push(prev) => session.history.push(prev),
                    History::Pop => {
                        session.history.pop();
                    }
                    History::Keep => {}
                }
                session.listing = Some(listing);
                session.error = None;
            }
            Err(err) => {
                tracing::warn!(path = %step.path, %err, "browse failed");
                session.error = Some(err.user_message("Browse failed"));
            }
        }
    }

    /// Directories only, volumes included; files are never offered.
    pub fn entries(&self) -> Vec<&ListingItem> {
        self.listing()
            .map(|l| l.items.iter().filter(|item| item.is_dir).collect())
            .unwrap_or_default()
    }

    /// The path label above the list.
    pub fn current_label(&self) -> &str {
        match self.listing() {
            Some(listing) if listing.is_root => ROOT_LABEL,
            Some(listing) => &listing.current,
            None => "",
        }
    }

    pub fn select(&self) -> Result<(PickTarget, String), SelectError> {
        let session = self.session.as_ref().ok_or(SelectError)?;
        let label = self.current_label();
        if label.is_empty() || label == ROOT_LABEL {
            return Err(SelectError);
        }
        Ok((session.target, label.to_string()))
    }

    pub fn close(&mut self) {
        self.session = None;
    }

    fn here(&self) -> String {
        match self.listing() {
            Some(listing) if !listing.is_root => listing.current.clone(),
            _ => String::new(),
        }
    }

    fn request(&mut self, path: String, history: History) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        self.seq += 1;
        session.pending = Some(NavStep { seq: self.seq, path, history });
    }
}

/// Fetches the listing for `step`. Hand the pair to [`DirectoryBrowser::apply`].
pub async fn fetch_step<B: Backend>(backend: &B, step: &NavStep) -> (u64, Result<Listing, ApiError>) {
    tracing::debug!(seq = step.seq, path = %step.path, "browse");
    (step.seq, backend.browse(&step.path).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dir, file, listing, root_listing, FakeBackend};

    /// Applies the pending step with `reply`.
    fn resolve(browser: &mut DirectoryBrowser, reply: Result<Listing, ApiError>) -> String {
        let step = browser.pending().cloned().expect("a pending step");
        browser.apply(step.seq, reply);
        step.path
    }

    fn opened_at(l: Listing) -> DirectoryBrowser {
        let mut browser = DirectoryBrowser::default();
        browser.open(&l.current.clone(), PickTarget::PackSource);
        resolve(&mut browser, Ok(l));
        browser
    }

    #[test]
    fn only_directories_are_listed() {
        let browser = opened_at(listing(
            "/a/b",
            Some("/a"),
            vec![dir("c", "/a/b/c"), file("f.txt", "/a/b/f.txt")],
        ));
        let names: Vec<_> = browser.entries().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["c"]);
    }

    #[test]
    fn root_lists_directory_volumes_only() {
        let browser = opened_at(root_listing(vec![dir("C:", "C:\\"), file("Z:", "Z:\\")]));
        let names: Vec<_> = browser.entries().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["C:"]);
        assert_eq!(browser.current_label(), ROOT_LABEL);
    }

    #[test]
    fn open_with_root_label_requests_volume_list() {
        let mut browser = DirectoryBrowser::default();
        browser.open(ROOT_LABEL, PickTarget::DownloadPath);
        assert_eq!(browser.pending().map(|s| s.path.as_str()), Some(""));
    }

    #[test]
    fn back_is_noop_at_root_even_with_parent() {
        let mut root = root_listing(vec![dir("C:", "C:\\")]);
        root.parent = Some("/somewhere".into());
        let mut browser = opened_at(root);
        assert!(!browser.can_go_back());
        browser.back();
        assert_eq!(browser.pending(), None);
    }

    #[test]
    fn back_returns_along_history() {
        let mut browser = DirectoryBrowser::default();
        browser.open("", PickTarget::PackOutput);
        resolve(&mut browser, Ok(root_listing(vec![dir("D:", "D:\\")])));

        browser.enter("D:\\");
        resolve(&mut browser, Ok(listing("D:\\", None, vec![dir("x", "D:\\x")])));
        browser.enter("D:\\x");
        // Server reports no parent for this directory.
        resolve(&mut browser, Ok(listing("D:\\x", None, vec![])));

        browser.back();
        assert_eq!(resolve(&mut browser, Ok(listing("D:\\", None, vec![]))), "D:\\");
        browser.back();
        assert_eq!(resolve(&mut browser, Ok(root_listing(vec![]))), "");
        assert_eq!(browser.current_label(), ROOT_LABEL);
    }

    #[test]
    fn back_without_history_uses_parent_then_root() {
        let mut browser = opened_at(listing("/a/b", Some("/a"), vec![]));
        browser.back();
        assert_eq!(resolve(&mut browser, Ok(listing("/a", None, vec![]))), "/a");
        assert!(browser.can_go_back());
        browser.back();
        assert_eq!(browser.pending().map(|s| s.path.as_str()), Some(""));
    }

    #[test]
    fn failed_navigation_keeps_modal_and_history() {
        let mut browser = opened_at(listing("/a", Some("/"), vec![]));
        browser.enter("/a/locked");
        resolve(&mut browser, Err(ApiError::Status { status: 403, detail: Some("denied".into()) }));

        assert!(browser.is_open());
        assert_eq!(browser.error(), Some("denied"));
        assert_eq!(browser.current_label(), "/a");

        browser.home();
        resolve(&mut browser, Ok(root_listing(vec![])));
        assert_eq!(browser.error(), None);
    }

    #[test]
    fn stale_replies_are_ignored() {
        let mut browser = opened_at(listing("/a", None, vec![]));
        browser.enter("/a/one");
        let stale = browser.pending().cloned().unwrap();
        browser.enter("/a/two");
        browser.apply(stale.seq, Ok(listing("/a/one", Some("/a"), vec![])));
        assert_eq!(browser.current_label(), "/a");

        resolve(&mut browser, Ok(listing("/a/two", Some("/a"), vec![])));
        assert_eq!(browser.current_label(), "/a/two");
    }

    #[test]
    fn select_rejects_root_and_returns_target() {
        let browser = opened_at(root_listing(vec![]));
        assert_eq!(browser.select(), Err(SelectError));

        let browser = opened_at(listing("/comics", None, vec![]));
        assert_eq!(
            browser.select(),
            Ok((PickTarget::PackSource, "/comics".to_string()))
        );
    }

    #[test]
    fn select_before_first_listing_is_rejected() {
        let mut browser = DirectoryBrowser::default();
        browser.open("/x", PickTarget::DownloadPath);
        assert_eq!(browser.select(), Err(SelectError));
    }

    #[test]
    fn close_discards_session() {
        let mut browser = opened_at(listing("/a", None, vec![]));
        browser.close();
        assert!(!browser.is_open());
        assert!(browser.listing().is_none());
        browser.apply(99, Ok(listing("/b", None, vec![])));
        assert!(!browser.is_open());
    }

    #[tokio::test]
    async fn fetched_steps_drive_the_browser() {
        let backend = FakeBackend::default();
        backend.add_listing("", root_listing(vec![dir("D:", "D:\\")]));
        backend.add_listing("D:\\", listing("D:\\", None, vec![dir("x", "D:\\x")]));

        let mut browser = DirectoryBrowser::default();
        browser.open(ROOT_LABEL, PickTarget::PackOutput);
        let step = browser.pending().cloned().expect("a pending step");
        let (seq, reply) = fetch_step(&backend, &step).await;
        browser.apply(seq, reply);
        assert_eq!(browser.current_label(), ROOT_LABEL);

        browser.enter("D:\\");
        let step = browser.pending().cloned().expect("a pending step");
        let (seq, reply) = fetch_step(&backend, &step).await;
        browser.apply(seq, reply);
        assert_eq!(browser.select(), Ok((PickTarget::PackOutput, "D:\\".to_string())));

        browser.enter("D:\\missing");
        let step = browser.pending().cloned().expect("a pending step");
        let (seq, reply) = fetch_step(&backend, &step).await;
        browser.apply(seq, reply);
        assert_eq!(browser.error(), Some("directory not found"));
        assert_eq!(browser.current_label(), "D:\\");

        assert_eq!(
            backend.calls(),
            vec![
                "GET /api/browse?path=".to_string(),
                "GET /api/browse?path=D:\\".to_string(),
                "GET /api/browse?path=D:\\missing".to_string(),
            ]
        );
    }
}
