//! Client-side settings cache.
//!
//! `canonical` is the last object the backend confirmed. The settings page
//! edits a `draft`; inline task forms read `canonical` through their own
//! overrides, so there is one source of truth and no field copying.

use crate::api::{ApiError, Backend};
use crate::types::Settings;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsStore {
    canonical: Settings,
    draft: Option<Settings>,
    loaded: bool,
}

impl SettingsStore {
    pub fn canonical(&self) -> &Settings {
        &self.canonical
    }

    /// What the settings page shows.
    pub fn draft(&self) -> &Settings {
        self.draft.as_ref().unwrap_or(&self.canonical)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_dirty(&self) -> bool {
        self.draft.as_ref().is_some_and(|d| d != &self.canonical)
    }

    /// Reset is offered whenever the page shows anything but the defaults.
    pub fn can_reset(&self) -> bool {
        self.draft() != &Settings::default()
    }

    pub fn edit_draft(&mut self, edit: impl FnOnce(&mut Settings)) {
        let mut draft = self.draft().clone();
        edit(&mut draft);
        self.draft = Some(draft);
    }

    /// Restores defaults on the settings page only; nothing is persisted.
    pub fn reset_draft(&mut self) {
        self.draft = Some(Settings::default());
    }

    /// Wholesale replacement after a successful load or save.
    pub fn replace(&mut self, settings: Settings) {
        self.canonical = settings;
        self.draft = None;
        self.loaded = true;
    }
}

/// Canonical settings with only the Kavita output directory changed.
pub fn with_kavita_output(settings: &Settings, output_dir: &str) -> Settings {
    Settings {
        kavita_output_dir: output_dir.to_string(),
        ..settings.clone()
    }
}

pub async fn fetch<B: Backend>(backend: &B) -> Result<Settings, ApiError> {
    let settings = backend.load_settings().await?;
    tracing::debug!(?settings, "settings loaded");
    Ok(settings)
}

/// Sends the complete object and hands it back for [`SettingsStore::replace`].
pub async fn persist<B: Backend>(backend: &B, settings: Settings) -> Result<Settings, ApiError> {
    backend.save_settings(&settings).await?;
    tracing::info!(download_path = %settings.download_path, "settings saved");
    Ok(settings)
}
