use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The destination a share request is aimed at.
///
/// Names are parsed with [`FromStr`], so they are case-insensitive and
/// `instagram-post` and `x` are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", try_from = "String")]
pub enum SharePlatform {
    /// The generic system share sheet.
    Native,
    InstagramStories,
    Instagram,
    Facebook,
    Twitter,
    Tiktok,
    Whatsapp,
    Linkedin,
    Snapchat,
    Telegram,
    Reddit,
}

impl SharePlatform {
    pub const ALL: [SharePlatform; 11] = [
        SharePlatform::Native,
        SharePlatform::InstagramStories,
        SharePlatform::Instagram,
        SharePlatform::Facebook,
        SharePlatform::Twitter,
        SharePlatform::Tiktok,
        SharePlatform::Whatsapp,
        SharePlatform::Linkedin,
        SharePlatform::Snapchat,
        SharePlatform::Telegram,
        SharePlatform::Reddit,
    ];

    /// The wire name of the platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            SharePlatform::Native => "native",
            SharePlatform::InstagramStories => "instagram-stories",
            SharePlatform::Instagram => "instagram",
            SharePlatform::Facebook => "facebook",
            SharePlatform::Twitter => "twitter",
            SharePlatform::Tiktok => "tiktok",
            SharePlatform::Whatsapp => "whatsapp",
            SharePlatform::Linkedin => "linkedin",
            SharePlatform::Snapchat => "snapchat",
            SharePlatform::Telegram => "telegram",
            SharePlatform::Reddit => "reddit",
        }
    }
}

impl fmt::Display for SharePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SharePlatform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "instagram-post" => return Ok(SharePlatform::Instagram),
            "x" => return Ok(SharePlatform::Twitter),
            _ => {}
        }
        SharePlatform::ALL
            .into_iter()
            .find(|platform| platform.as_str() == name)
            .ok_or_else(|| Error::UnsupportedPlatform(s.to_string()))
    }
}

impl TryFrom<String> for SharePlatform {
    type Error = Error;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

/// Everything the frontend can pass to `share`. Which fields are honoured
/// depends on the platform; unused fields are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareOptions {
    pub platform: SharePlatform,
    pub title: Option<String>,
    pub text: Option<String>,
    pub url: Option<String>,
    /// Path or `file://` URL of an image.
    pub image_path: Option<String>,
    /// Base64 image content, optionally as a `data:` URI.
    pub image_data: Option<String>,
    pub video_path: Option<String>,
    pub video_data: Option<String>,
    pub audio_path: Option<String>,
    pub audio_data: Option<String>,
    /// Extra file paths, shared through the system sheet.
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(rename = "contentURL", alias = "contentUrl")]
    pub content_url: Option<String>,
    pub sticker_image: Option<String>,
    pub background_color_top: Option<String>,
    pub background_color_bottom: Option<String>,
    pub hashtag: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
    pub via: Option<String>,
    pub phone_number: Option<String>,
    pub subreddit: Option<String>,
    pub attachment_url: Option<String>,
    /// Also save the media to the device gallery before handing it off.
    #[serde(default)]
    pub save_to_device: bool,
}

impl ShareOptions {
    pub fn new(platform: SharePlatform) -> Self {
        Self {
            platform,
            title: None,
            text: None,
            url: None,
            image_path: None,
            image_data: None,
            video_path: None,
            video_data: None,
            audio_path: None,
            audio_data: None,
            files: Vec::new(),
            content_url: None,
            sticker_image: None,
            background_color_top: None,
            background_color_bottom: None,
            hashtag: None,
            hashtags: Vec::new(),
            via: None,
            phone_number: None,
            subreddit: None,
            attachment_url: None,
            save_to_device: false,
        }
    }

    pub fn has_image(&self) -> bool {
        non_empty(&self.image_path) || non_empty(&self.image_data)
    }

    pub fn has_video(&self) -> bool {
        non_empty(&self.video_path) || non_empty(&self.video_data)
    }

    pub fn has_audio(&self) -> bool {
        non_empty(&self.audio_path) || non_empty(&self.audio_data)
    }

    pub fn has_media(&self) -> bool {
        self.has_image() || self.has_video() || self.has_audio() || !self.files.is_empty()
    }

    pub fn has_text(&self) -> bool {
        non_empty(&self.title) || non_empty(&self.text) || non_empty(&self.url)
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// The kind of media being staged, used to pick MIME types and extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    File,
}

impl MediaKind {
    pub fn default_mime(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/jpeg",
            MediaKind::Video => "video/mp4",
            MediaKind::Audio => "audio/mpeg",
            MediaKind::File => "application/octet-stream",
        }
    }

    pub fn default_extension(&self) -> &'static str {
        match self {
            MediaKind::Image => "jpg",
            MediaKind::Video => "mp4",
            MediaKind::Audio => "mp3",
            MediaKind::File => "bin",
        }
    }

    /// The wildcard type used on intents, e.g. `image/*`.
    pub fn wildcard_mime(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/*",
            MediaKind::Video => "video/*",
            MediaKind::Audio => "audio/*",
            MediaKind::File => "*/*",
        }
    }
}

/// How a share request was finally delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShareMethod {
    /// Handed directly to the target app.
    App,
    /// Saved to the gallery, then the target app was opened on it.
    Gallery,
    ShareSheet,
    WebIntent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ShareStatus {
    Shared,
    /// The user dismissed the system share sheet.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResult {
    pub status: ShareStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<SharePlatform>,
    pub method: ShareMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ShareResult {
    pub fn shared(app: Option<SharePlatform>, method: ShareMethod) -> Self {
        Self {
            status: ShareStatus::Shared,
            app,
            method,
            asset_id: None,
            note: None,
        }
    }

    pub fn cancelled(app: Option<SharePlatform>, method: ShareMethod) -> Self {
        Self {
            status: ShareStatus::Cancelled,
            ..Self::shared(app, method)
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanShareOptions {
    pub platform: Option<SharePlatform>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanShareResult {
    pub value: bool,
}
