use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::compose;
use crate::models::{MediaKind, ShareOptions, SharePlatform};
use crate::staging::{StagedBundle, StagedMedia};
use crate::targets::{AppTarget, ACTION_ADD_TO_STORY};

/// Asks the native layer whether a target app is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppQuery {
    pub package: Option<String>,
    pub scheme: Option<String>,
}

impl From<&AppTarget> for AppQuery {
    fn from(target: &AppTarget) -> Self {
        Self {
            package: target.android_package.map(str::to_string),
            scheme: target.ios_scheme.map(str::to_string),
        }
    }
}

/// A share aimed at one app. Android reads the intent fields, iOS follows
/// the deep link and attaches the stream where the app supports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppShareRequest {
    pub platform: SharePlatform,
    pub action: String,
    pub package: Option<String>,
    pub mime_type: String,
    pub text: Option<String>,
    pub subject: Option<String>,
    /// File handed over as the intent stream.
    pub stream: Option<PathBuf>,
    pub extras: BTreeMap<String, String>,
    /// Package that gets temporary read access to `stream` and file extras.
    pub grant_read_to: Option<String>,
    pub deep_link: Option<String>,
}

impl AppShareRequest {
    pub fn build(
        target: &AppTarget,
        options: &ShareOptions,
        media: &StagedBundle,
        app_id: Option<&str>,
    ) -> Self {
        let message = compose::message(options);
        let primary = media.primary(target.media.preference());
        let mut extras = BTreeMap::new();

        if target.android_action == ACTION_ADD_TO_STORY {
            if let Some(sticker) = &media.sticker {
                extras.insert(
                    "interactive_asset_uri".to_string(),
                    sticker.path.to_string_lossy().into_owned(),
                );
            }
            let content_url = options.content_url.as_ref().or(options.url.as_ref());
            insert_non_empty(&mut extras, "content_url", content_url);
            insert_non_empty(&mut extras, "top_background_color", options.background_color_top.as_ref());
            insert_non_empty(
                &mut extras,
                "bottom_background_color",
                options.background_color_bottom.as_ref(),
            );
            insert_non_empty(&mut extras, "source_application", app_id.map(str::to_string).as_ref());
        }
        if target.platform == SharePlatform::Snapchat {
            insert_non_empty(&mut extras, "attachment_url", options.attachment_url.as_ref());
        }

        let mime_type = match primary {
            Some(media) => media.kind.wildcard_mime().to_string(),
            None => "text/plain".to_string(),
        };
        let has_files = primary.is_some() || extras.contains_key("interactive_asset_uri");

        Self {
            platform: target.platform,
            action: target.android_action.to_string(),
            package: target.android_package.map(str::to_string),
            mime_type,
            text: Some(message).filter(|m| !m.is_empty()),
            subject: options.title.clone().filter(|t| !t.trim().is_empty()),
            stream: primary.map(|media| media.path.clone()),
            extras,
            grant_read_to: target
                .android_package
                .filter(|_| has_files)
                .map(str::to_string),
            deep_link: compose::app_deep_link(options, app_id),
        }
    }
}

fn insert_non_empty(extras: &mut BTreeMap<String, String>, key: &str, value: Option<&String>) {
    if let Some(value) = value.map(|v| v.trim()).filter(|v| !v.is_empty()) {
        extras.insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetItem {
    pub path: PathBuf,
    pub mime_type: String,
}

impl From<&StagedMedia> for SheetItem {
    fn from(media: &StagedMedia) -> Self {
        Self {
            path: media.path.clone(),
            mime_type: media.mime_type.clone(),
        }
    }
}

/// Content for the generic system share sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetRequest {
    pub title: Option<String>,
    pub text: Option<String>,
    pub url: Option<String>,
    pub files: Vec<SheetItem>,
}

impl SheetRequest {
    pub fn build(options: &ShareOptions, media: &StagedBundle) -> Self {
        let url = options.url.clone().filter(|u| !u.trim().is_empty());
        // The url travels as its own item, so keep it out of the text.
        let text = match options.platform {
            SharePlatform::Native => native_text(options),
            _ => {
                let message = compose::message(options);
                match &url {
                    Some(url) => Some(message.replace(url.as_str(), "").trim().to_string()),
                    None => Some(message),
                }
            }
        };
        Self {
            title: options.title.clone().filter(|t| !t.trim().is_empty()),
            text: text.filter(|t| !t.trim().is_empty()),
            url,
            files: media.sheet_items().map(SheetItem::from).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.url.is_none() && self.files.is_empty()
    }

    /// Text and url joined the way single-text share targets expect.
    #[cfg_attr(not(any(target_os = "windows", target_os = "macos")), allow(dead_code))]
    pub fn combined_text(&self) -> String {
        match (&self.text, &self.url) {
            (Some(t), Some(u)) => format!("{}\n{}", t, u),
            (Some(t), None) => t.clone(),
            (None, Some(u)) => u.clone(),
            (None, None) => String::new(),
        }
    }
}

/// The title heads the text, since most sheet targets only take one string.
fn native_text(options: &ShareOptions) -> Option<String> {
    let title = options.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let text = options.text.as_deref().map(str::trim).filter(|t| !t.is_empty());
    match (title, text) {
        (Some(title), Some(text)) => Some(format!("{}\n\n{}", title, text)),
        (title, text) => title.or(text).map(str::to_string),
    }
}

/// What the native share sheet reported when it closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetOutcome {
    pub completed: bool,
    pub activity_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GallerySaveRequest {
    pub path: PathBuf,
    pub kind: MediaKind,
    pub mime_type: String,
}

impl From<&StagedMedia> for GallerySaveRequest {
    fn from(media: &StagedMedia) -> Self {
        Self {
            path: media.path.clone(),
            kind: media.kind,
            mime_type: media.mime_type.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::{self, ACTION_SEND};
    use pretty_assertions::assert_eq;

    fn staged(kind: MediaKind, path: &str) -> StagedMedia {
        StagedMedia {
            path: PathBuf::from(path),
            mime_type: kind.default_mime().to_string(),
            kind,
            temporary: true,
        }
    }

    #[test]
    fn stories_request_carries_story_extras() {
        let target = targets::lookup(SharePlatform::InstagramStories);
        let mut options = ShareOptions::new(SharePlatform::InstagramStories);
        options.content_url = Some("https://example.com".into());
        options.background_color_top = Some("#000000".into());
        options.background_color_bottom = Some(" ".into());
        let media = StagedBundle {
            image: Some(staged(MediaKind::Image, "/tmp/bg.jpg")),
            sticker: Some(staged(MediaKind::Image, "/tmp/sticker.png")),
            ..Default::default()
        };

        let request = AppShareRequest::build(target, &options, &media, Some("42"));

        assert_eq!(request.action, ACTION_ADD_TO_STORY);
        assert_eq!(request.mime_type, "image/*");
        assert_eq!(request.stream, Some(PathBuf::from("/tmp/bg.jpg")));
        assert_eq!(request.grant_read_to.as_deref(), Some("com.instagram.android"));
        let extras = request
            .extras
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            extras,
            vec![
                ("content_url", "https://example.com"),
                ("interactive_asset_uri", "/tmp/sticker.png"),
                ("source_application", "42"),
                ("top_background_color", "#000000"),
            ]
        );
        assert_eq!(
            request.deep_link.as_deref(),
            Some("instagram-stories://share?source_application=42")
        );
    }

    #[test]
    fn text_only_request_is_plain_text_without_grant() {
        let target = targets::lookup(SharePlatform::Whatsapp);
        let mut options = ShareOptions::new(SharePlatform::Whatsapp);
        options.text = Some("Hi".into());
        options.url = Some("https://a.b".into());

        let request = AppShareRequest::build(target, &options, &StagedBundle::default(), None);

        assert_eq!(request.action, ACTION_SEND);
        assert_eq!(request.package.as_deref(), Some("com.whatsapp"));
        assert_eq!(request.mime_type, "text/plain");
        assert_eq!(request.text.as_deref(), Some("Hi https://a.b"));
        assert!(request.stream.is_none());
        assert!(request.grant_read_to.is_none());
    }

    #[test]
    fn tiktok_streams_the_video_before_the_image() {
        let target = targets::lookup(SharePlatform::Tiktok);
        let options = ShareOptions::new(SharePlatform::Tiktok);
        let media = StagedBundle {
            image: Some(staged(MediaKind::Image, "/tmp/a.jpg")),
            video: Some(staged(MediaKind::Video, "/tmp/b.mp4")),
            ..Default::default()
        };

        let request = AppShareRequest::build(target, &options, &media, None);

        assert_eq!(request.mime_type, "video/*");
        assert_eq!(request.stream, Some(PathBuf::from("/tmp/b.mp4")));
        assert!(request.text.is_none());
    }

    #[test]
    fn sheet_keeps_url_as_separate_item() {
        let mut options = ShareOptions::new(SharePlatform::Twitter);
        options.text = Some("Look".into());
        options.url = Some("https://a.b".into());
        options.hashtags = vec!["rust".into()];
        let media = StagedBundle {
            files: vec![staged(MediaKind::File, "/tmp/doc.pdf")],
            ..Default::default()
        };

        let sheet = SheetRequest::build(&options, &media);

        assert_eq!(sheet.text.as_deref(), Some("Look #rust"));
        assert_eq!(sheet.url.as_deref(), Some("https://a.b"));
        assert_eq!(sheet.files.len(), 1);
        assert_eq!(sheet.combined_text(), "Look #rust\nhttps://a.b");
    }

    #[test]
    fn native_sheet_folds_the_title_into_the_text() {
        let mut options = ShareOptions::new(SharePlatform::Native);
        options.title = Some("Hello".into());
        let sheet = SheetRequest::build(&options, &StagedBundle::default());
        assert_eq!(sheet.text.as_deref(), Some("Hello"));
        assert!(!sheet.is_empty());

        options.text = Some("World".into());
        let sheet = SheetRequest::build(&options, &StagedBundle::default());
        assert_eq!(sheet.text.as_deref(), Some("Hello\n\nWorld"));
        assert_eq!(sheet.title.as_deref(), Some("Hello"));
    }

    #[test]
    fn empty_sheet_is_detected() {
        let options = ShareOptions::new(SharePlatform::Native);
        assert!(SheetRequest::build(&options, &StagedBundle::default()).is_empty());
    }
}
