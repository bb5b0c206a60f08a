//! Turns the paths and base64 payloads coming from the frontend into files
//! on disk that another application can be granted read access to.

use std::io::Write;
use std::path::PathBuf;

use base64::{engine::general_purpose, Engine as _};
use tempfile::Builder;
use url::Url;

use crate::models::{MediaKind, ShareOptions};
use crate::state::StagedFiles;
use crate::{Error, Result};

/// A readable file ready to be handed to a share target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedMedia {
    pub path: PathBuf,
    pub mime_type: String,
    pub kind: MediaKind,
    /// Written by the plugin, deleted again on cleanup.
    pub temporary: bool,
}

/// All media referenced by one share request.
#[derive(Debug, Default, Clone)]
pub struct StagedBundle {
    pub image: Option<StagedMedia>,
    pub video: Option<StagedMedia>,
    pub audio: Option<StagedMedia>,
    pub sticker: Option<StagedMedia>,
    pub files: Vec<StagedMedia>,
}

impl StagedBundle {
    /// The first staged item among `preference`.
    pub fn primary(&self, preference: &[MediaKind]) -> Option<&StagedMedia> {
        preference.iter().find_map(|kind| match kind {
            MediaKind::Image => self.image.as_ref(),
            MediaKind::Video => self.video.as_ref(),
            MediaKind::Audio => self.audio.as_ref(),
            MediaKind::File => self.files.first(),
        })
    }

    /// Everything that goes into a share sheet. The sticker is Instagram-only.
    pub fn sheet_items(&self) -> impl Iterator<Item = &StagedMedia> {
        self.image
            .iter()
            .chain(self.video.iter())
            .chain(self.audio.iter())
            .chain(self.files.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.sheet_items().next().is_none()
    }

    /// Paths of the files the plugin wrote for this request.
    pub fn temporary_paths(&self) -> Vec<PathBuf> {
        self.sheet_items()
            .chain(self.sticker.iter())
            .filter(|media| media.temporary)
            .map(|media| media.path.clone())
            .collect()
    }
}

pub struct Stager<'a> {
    files: &'a StagedFiles,
}

impl<'a> Stager<'a> {
    pub fn new(files: &'a StagedFiles) -> Self {
        Self { files }
    }

    /// Stages every media field of `options`. Nothing is left on disk if one
    /// of them fails.
    pub fn stage_options(&self, options: &ShareOptions) -> Result<StagedBundle> {
        let mut bundle = StagedBundle::default();
        let result = self.fill_bundle(options, &mut bundle);
        if result.is_err() {
            self.files.release(&bundle.temporary_paths());
        }
        result.map(|_| bundle)
    }

    fn fill_bundle(&self, options: &ShareOptions, bundle: &mut StagedBundle) -> Result<()> {
        bundle.image = self.stage(
            options.image_path.as_deref(),
            options.image_data.as_deref(),
            MediaKind::Image,
        )?;
        bundle.video = self.stage(
            options.video_path.as_deref(),
            options.video_data.as_deref(),
            MediaKind::Video,
        )?;
        bundle.audio = self.stage(
            options.audio_path.as_deref(),
            options.audio_data.as_deref(),
            MediaKind::Audio,
        )?;
        if let Some(sticker) = options.sticker_image.as_deref().filter(|s| !s.trim().is_empty()) {
            bundle.sticker = Some(self.stage_sticker(sticker)?);
        }
        for file in options.files.iter().filter(|f| !f.trim().is_empty()) {
            bundle.files.push(resolve_path(file, MediaKind::File)?);
        }
        Ok(())
    }

    /// Inline data wins over a path when both are present.
    pub fn stage(
        &self,
        path: Option<&str>,
        data: Option<&str>,
        kind: MediaKind,
    ) -> Result<Option<StagedMedia>> {
        if let Some(data) = data.filter(|d| !d.trim().is_empty()) {
            return self.stage_data(data, kind).map(Some);
        }
        if let Some(path) = path.filter(|p| !p.trim().is_empty()) {
            return resolve_path(path, kind).map(Some);
        }
        Ok(None)
    }

    /// Stickers arrive as a path, a `data:` URI or bare base64.
    fn stage_sticker(&self, sticker: &str) -> Result<StagedMedia> {
        if sticker.trim_start().starts_with("data:") {
            return self.stage_data(sticker, MediaKind::Image);
        }
        match resolve_path(sticker, MediaKind::Image) {
            Ok(media) => Ok(media),
            Err(not_found) => self
                .stage_data(sticker, MediaKind::Image)
                .map_err(|_| not_found),
        }
    }

    /// Decodes base64 (optionally a `data:` URI) into a new file in the staging dir.
    pub fn stage_data(&self, data: &str, kind: MediaKind) -> Result<StagedMedia> {
        let (declared_mime, payload) = split_data_uri(data);
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = general_purpose::STANDARD
            .decode(&cleaned)
            .or_else(|_| general_purpose::STANDARD_NO_PAD.decode(&cleaned))
            .map_err(|_| Error::InvalidArgs(format!("Invalid Base64 data provided for {:?}", kind)))?;

        let mime_type = declared_mime
            .map(str::to_string)
            .unwrap_or_else(|| kind.default_mime().to_string());
        let extension = extension_for(&mime_type, kind);

        let mut temp_file = Builder::new()
            .prefix(&format!("{}-", uuid::Uuid::new_v4()))
            .suffix(&format!(".{}", extension))
            .tempfile_in(self.files.dir()?)
            .map_err(|e| Error::TempFile(format!("Failed to create temp file: {}", e)))?;
        temp_file
            .write_all(&bytes)
            .map_err(|e| Error::TempFile(format!("Failed to write to temp file: {}", e)))?;
        let (_, path) = temp_file
            .keep()
            .map_err(|e| Error::TempFile(format!("Failed to persist temp file: {}", e)))?;

        self.files.track(path.clone());
        log::debug!("staged {} bytes of {} at {}", bytes.len(), mime_type, path.display());

        Ok(StagedMedia {
            path,
            mime_type,
            kind,
            temporary: true,
        })
    }
}

/// Resolves a plain path or `file://` URL to an existing local file.
pub fn resolve_path(input: &str, kind: MediaKind) -> Result<StagedMedia> {
    let path = local_path(input.trim())?;
    if !path.is_file() {
        return Err(Error::InvalidArgs(format!("File not found: {}", path.display())));
    }
    let mime_type = mime_guess::from_path(&path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| kind.default_mime().to_string());
    Ok(StagedMedia {
        path,
        mime_type,
        kind,
        temporary: false,
    })
}

fn local_path(input: &str) -> Result<PathBuf> {
    if !input.contains("://") {
        return Ok(PathBuf::from(input));
    }
    let url = Url::parse(input)
        .map_err(|e| Error::InvalidArgs(format!("Invalid file URL {}: {}", input, e)))?;
    if url.scheme() != "file" {
        return Err(Error::InvalidArgs(format!(
            "Only local files can be shared, got a {} URL",
            url.scheme()
        )));
    }
    url.to_file_path()
        .map_err(|_| Error::InvalidArgs(format!("Invalid file URL: {}", input)))
}

/// Splits `data:<mime>;base64,<payload>` into its MIME type and payload.
fn split_data_uri(data: &str) -> (Option<&str>, &str) {
    let data = data.trim();
    let Some(rest) = data.strip_prefix("data:") else {
        return (None, data);
    };
    match rest.split_once(',') {
        Some((header, payload)) => {
            let mime = header.split(';').next().filter(|m| m.contains('/'));
            (mime, payload)
        }
        None => (None, rest),
    }
}

fn extension_for(mime_type: &str, kind: MediaKind) -> &'static str {
    if mime_type == kind.default_mime() {
        return kind.default_extension();
    }
    mime_guess::get_mime_extensions_str(mime_type)
        .and_then(|extensions| extensions.first().copied())
        .unwrap_or(kind.default_extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SharePlatform;

    // "hello" in base64.
    const HELLO: &str = "aGVsbG8=";

    #[test]
    fn stages_base64_into_tracked_file() {
        let dir = tempfile::tempdir().unwrap();
        let files = StagedFiles::new(dir.path());
        let media = Stager::new(&files).stage_data(HELLO, MediaKind::Image).unwrap();

        assert!(media.temporary);
        assert_eq!(media.mime_type, "image/jpeg");
        assert_eq!(media.path.extension().unwrap(), "jpg");
        assert_eq!(std::fs::read(&media.path).unwrap(), b"hello");
        assert_eq!(files.tracked(), vec![media.path.clone()]);
    }

    #[test]
    fn data_uri_mime_overrides_kind_default() {
        let dir = tempfile::tempdir().unwrap();
        let files = StagedFiles::new(dir.path());
        let media = Stager::new(&files)
            .stage_data("data:image/png;base64,aGVs\nbG8=", MediaKind::Image)
            .unwrap();

        assert_eq!(media.mime_type, "image/png");
        assert_eq!(media.path.extension().unwrap(), "png");
        assert_eq!(std::fs::read(&media.path).unwrap(), b"hello");
    }

    #[test]
    fn invalid_base64_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let files = StagedFiles::new(dir.path());
        let err = Stager::new(&files).stage_data("%%%not base64%%%", MediaKind::Video);
        assert!(matches!(err, Err(Error::InvalidArgs(_))));
        assert!(files.tracked().is_empty());
    }

    #[test]
    fn data_wins_over_path() {
        let dir = tempfile::tempdir().unwrap();
        let files = StagedFiles::new(dir.path());
        let media = Stager::new(&files)
            .stage(Some("/does/not/exist.jpg"), Some(HELLO), MediaKind::Image)
            .unwrap()
            .unwrap();
        assert!(media.temporary);
    }

    #[test]
    fn resolves_file_urls_and_guesses_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mov");
        std::fs::write(&path, b"video").unwrap();
        let file_url = Url::from_file_path(&path).unwrap();

        let media = resolve_path(file_url.as_str(), MediaKind::Video).unwrap();

        assert_eq!(media.path, path);
        assert_eq!(media.mime_type, "video/quicktime");
        assert!(!media.temporary);
    }

    #[test]
    fn rejects_missing_and_remote_files() {
        assert!(matches!(
            resolve_path("/definitely/missing.png", MediaKind::Image),
            Err(Error::InvalidArgs(_))
        ));
        let err = resolve_path("https://example.com/a.png", MediaKind::Image).unwrap_err();
        assert!(err.to_string().contains("https"));
    }

    #[test]
    fn failed_bundle_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let files = StagedFiles::new(dir.path());
        let mut options = ShareOptions::new(SharePlatform::Native);
        options.image_data = Some(HELLO.into());
        options.video_path = Some("/missing/video.mp4".into());

        assert!(Stager::new(&files).stage_options(&options).is_err());
        assert!(files.tracked().is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn sticker_accepts_bare_base64_and_paths() {
        let dir = tempfile::tempdir().unwrap();
        let files = StagedFiles::new(dir.path());
        let mut options = ShareOptions::new(SharePlatform::InstagramStories);
        options.sticker_image = Some(HELLO.into());

        let bundle = Stager::new(&files).stage_options(&options).unwrap();
        let sticker = bundle.sticker.unwrap();
        assert!(sticker.temporary);
        assert_eq!(std::fs::read(&sticker.path).unwrap(), b"hello");

        let on_disk = dir.path().join("sticker.png");
        std::fs::write(&on_disk, b"png").unwrap();
        options.sticker_image = Some(on_disk.to_string_lossy().into_owned());
        let sticker = Stager::new(&files).stage_options(&options).unwrap().sticker.unwrap();
        assert_eq!(sticker.path, on_disk);
        assert!(!sticker.temporary);
    }

    #[test]
    fn missing_sticker_path_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let files = StagedFiles::new(dir.path());
        let mut options = ShareOptions::new(SharePlatform::InstagramStories);
        options.sticker_image = Some("/missing/sticker.png".into());

        let err = Stager::new(&files).stage_options(&options).unwrap_err();
        assert_eq!(err.to_string(), "Invalid arguments: File not found: /missing/sticker.png");
    }

    #[test]
    fn primary_follows_preference_order() {
        let dir = tempfile::tempdir().unwrap();
        let files = StagedFiles::new(dir.path());
        let mut options = ShareOptions::new(SharePlatform::Tiktok);
        options.image_data = Some(HELLO.into());
        options.video_data = Some(HELLO.into());
        let bundle = Stager::new(&files).stage_options(&options).unwrap();

        let primary = bundle.primary(&[MediaKind::Video, MediaKind::Image]).unwrap();
        assert_eq!(primary.kind, MediaKind::Video);
        assert_eq!(bundle.temporary_paths().len(), 2);
    }
}
