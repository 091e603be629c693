use thiserror::Error;

use crate::types::{DownloadRequest, PackRequest, Settings};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter at least one album id")]
    EmptyAlbumList,
    #[error("Choose a source directory")]
    MissingSourceDir,
    #[error("Choose an output directory")]
    MissingOutputDir,
    #[error("{0} must be a whole number")]
    InvalidNumber(&'static str),
}

/// One id per line; surrounding whitespace and blank lines are dropped.
pub fn parse_album_ids(text: &str) -> Result<Vec<String>, ValidationError> {
    let ids: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if ids.is_empty() {
        return Err(ValidationError::EmptyAlbumList);
    }
    Ok(ids)
}

pub fn parse_count(field: &'static str, text: &str) -> Result<u32, ValidationError> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidNumber(field))
}

/// Inline download form. Option fields are user overrides; `None` reads
/// through to the canonical settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadForm {
    pub album_text: String,
    pub download_path: Option<String>,
    pub thread_count: Option<u32>,
    pub image_format: Option<String>,
    pub client_type: Option<String>,
}

impl DownloadForm {
    pub fn download_path<'a>(&'a self, settings: &'a Settings) -> &'a str {
        self.download_path.as_deref().unwrap_or(&settings.download_path)
    }

    pub fn thread_count(&self, settings: &Settings) -> u32 {
        self.thread_count.unwrap_or(settings.thread_count)
    }

    pub fn image_format<'a>(&'a self, settings: &'a Settings) -> &'a str {
        self.image_format.as_deref().unwrap_or(&settings.image_format)
    }

    pub fn client_type<'a>(&'a self, settings: &'a Settings) -> &'a str {
        self.client_type.as_deref().unwrap_or(&settings.client_type)
    }

    /// Drops overrides so the form follows freshly loaded settings again.
    pub fn follow_settings(&mut self) {
        self.download_path = None;
        self.thread_count = None;
        self.image_format = None;
        self.client_type = None;
    }

    pub fn build_request(&self, settings: &Settings) -> Result<DownloadRequest, ValidationError> {
        Ok(DownloadRequest {
            album_ids: parse_album_ids(&self.album_text)?,
            download_path: self.download_path(settings).to_string(),
            thread_count: self.thread_count(settings),
            image_format: self.image_format(settings).to_string(),
            client_type: self.client_type(settings).to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackForm {
    pub source_dir: String,
    /// Override of `kavita_output_dir`.
    pub output_dir: Option<String>,
    pub overwrite: bool,
    pub compress_level: u32,
}

impl Default for PackForm {
    fn default() -> Self {
        Self {
            source_dir: String::new(),
            output_dir: None,
            overwrite: true,
            compress_level: 1,
        }
    }
}

impl PackForm {
    pub const MAX_COMPRESS_LEVEL: u32 = 9;

    pub fn output_dir<'a>(&'a self, settings: &'a Settings) -> &'a str {
        self.output_dir.as_deref().unwrap_or(&settings.kavita_output_dir)
    }

    pub fn follow_settings(&mut self) {
        self.output_dir = None;
    }

    pub fn build_request(&self, settings: &Settings) -> Result<PackRequest, ValidationError> {
        let source_dir = self.source_dir.trim();
        if source_dir.is_empty() {
            return Err(ValidationError::MissingSourceDir);
        }
        let output_dir = self.output_dir(settings).trim();
        if output_dir.is_empty() {
            return Err(ValidationError::MissingOutputDir);
        }
        Ok(PackRequest {
            source_dir: source_dir.to_string(),
            output_dir: output_dir.to_string(),
            overwrite: self.overwrite,
            compress_level: self.compress_level.min(Self::MAX_COMPRESS_LEVEL),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            download_path: "/comics".into(),
            thread_count: 4,
            image_format: ".webp".into(),
            client_type: "api".into(),
            kavita_output_dir: "/kavita".into(),
        }
    }

    #[test]
    fn album_ids_drop_blank_lines() {
        let ids = parse_album_ids("  123 \n\n JM456\r\n   \n789").unwrap();
        assert_eq!(ids, vec!["123", "JM456", "789"]);
    }

    #[test]
    fn all_blank_input_is_rejected() {
        assert_eq!(parse_album_ids("  \n  \n"), Err(ValidationError::EmptyAlbumList));
        assert_eq!(parse_album_ids(""), Err(ValidationError::EmptyAlbumList));
    }

    #[test]
    fn download_request_reads_through_settings() {
        let form = DownloadForm { album_text: "1\n2".into(), ..Default::default() };
        let req = form.build_request(&settings()).unwrap();
        assert_eq!(req.album_ids, vec!["1", "2"]);
        assert_eq!(req.download_path, "/comics");
        assert_eq!(req.thread_count, 4);
        assert_eq!(req.image_format, ".webp");
    }

    #[test]
    fn overrides_win_until_settings_are_followed_again() {
        let mut form = DownloadForm {
            album_text: "1".into(),
            thread_count: Some(9),
            download_path: Some("/tmp".into()),
            ..Default::default()
        };
        let req = form.build_request(&settings()).unwrap();
        assert_eq!((req.thread_count, req.download_path.as_str()), (9, "/tmp"));

        form.follow_settings();
        assert_eq!(form.thread_count(&settings()), 4);
        assert_eq!(form.album_text, "1");
    }

    #[test]
    fn pack_requires_source_and_output() {
        let empty = Settings::default();
        let form = PackForm::default();
        assert_eq!(form.build_request(&empty), Err(ValidationError::MissingSourceDir));

        let form = PackForm { source_dir: "  /albums ".into(), ..Default::default() };
        assert_eq!(form.build_request(&empty), Err(ValidationError::MissingOutputDir));

        let form = PackForm { output_dir: Some("   ".into()), ..form };
        assert_eq!(form.build_request(&settings()), Err(ValidationError::MissingOutputDir));
    }

    #[test]
    fn pack_output_defaults_to_kavita_dir() {
        let form = PackForm { source_dir: "/albums".into(), compress_level: 42, ..Default::default() };
        let req = form.build_request(&settings()).unwrap();
        assert_eq!(req.source_dir, "/albums");
        assert_eq!(req.output_dir, "/kavita");
        assert!(req.overwrite);
        assert_eq!(req.compress_level, 9);
    }

    #[test]
    fn count_parsing() {
        assert_eq!(parse_count("Threads", " 7 "), Ok(7));
        assert_eq!(
            parse_count("Threads", "seven"),
            Err(ValidationError::InvalidNumber("Threads"))
        );
    }
}
