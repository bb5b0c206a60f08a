//! Static description of every share destination: which app to look for,
//! how to address it, and what to do when it is missing.

use crate::models::{MediaKind, SharePlatform};

pub const ACTION_SEND: &str = "android.intent.action.SEND";
pub const ACTION_ADD_TO_STORY: &str = "com.instagram.share.ADD_TO_STORY";

/// What kind of media a destination accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaRequirement {
    None,
    /// Media is attached when given, in order of preference.
    Optional(&'static [MediaKind]),
    /// At least one of these must be given.
    Required(&'static [MediaKind]),
}

impl MediaRequirement {
    pub fn preference(&self) -> &'static [MediaKind] {
        match self {
            MediaRequirement::None => &[],
            MediaRequirement::Optional(kinds) | MediaRequirement::Required(kinds) => kinds,
        }
    }
}

/// What happens when the destination app cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Fall back to the share sheet or a web intent.
    ShareSheet,
    /// Reject the call.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppTarget {
    pub platform: SharePlatform,
    pub display_name: &'static str,
    pub android_package: Option<&'static str>,
    pub android_action: &'static str,
    /// Scheme probed to detect the app on iOS.
    pub ios_scheme: Option<&'static str>,
    pub media: MediaRequirement,
    /// Media goes through the device gallery before the app is opened.
    pub gallery_handoff: bool,
    pub fallback: Fallback,
}

const IMAGE_OR_VIDEO: &[MediaKind] = &[MediaKind::Image, MediaKind::Video];
const VIDEO_OR_IMAGE: &[MediaKind] = &[MediaKind::Video, MediaKind::Image];
const IMAGE: &[MediaKind] = &[MediaKind::Image];
const ANY_MEDIA: &[MediaKind] = &[
    MediaKind::Image,
    MediaKind::Video,
    MediaKind::Audio,
    MediaKind::File,
];

static TARGETS: [AppTarget; 11] = [
    AppTarget {
        platform: SharePlatform::Native,
        display_name: "Share sheet",
        android_package: None,
        android_action: ACTION_SEND,
        ios_scheme: None,
        media: MediaRequirement::Optional(ANY_MEDIA),
        gallery_handoff: false,
        fallback: Fallback::ShareSheet,
    },
    AppTarget {
        platform: SharePlatform::InstagramStories,
        display_name: "Instagram Stories",
        android_package: Some("com.instagram.android"),
        android_action: ACTION_ADD_TO_STORY,
        ios_scheme: Some("instagram-stories://"),
        media: MediaRequirement::Required(IMAGE_OR_VIDEO),
        gallery_handoff: false,
        fallback: Fallback::Reject,
    },
    AppTarget {
        platform: SharePlatform::Instagram,
        display_name: "Instagram",
        android_package: Some("com.instagram.android"),
        android_action: ACTION_SEND,
        ios_scheme: Some("instagram://"),
        media: MediaRequirement::Required(VIDEO_OR_IMAGE),
        gallery_handoff: true,
        fallback: Fallback::Reject,
    },
    AppTarget {
        platform: SharePlatform::Facebook,
        display_name: "Facebook",
        android_package: Some("com.facebook.katana"),
        android_action: ACTION_SEND,
        ios_scheme: Some("fb://"),
        media: MediaRequirement::Optional(IMAGE),
        gallery_handoff: false,
        fallback: Fallback::ShareSheet,
    },
    AppTarget {
        platform: SharePlatform::Twitter,
        display_name: "Twitter",
        android_package: Some("com.twitter.android"),
        android_action: ACTION_SEND,
        ios_scheme: Some("twitter://"),
        media: MediaRequirement::Optional(IMAGE),
        gallery_handoff: false,
        fallback: Fallback::ShareSheet,
    },
    AppTarget {
        platform: SharePlatform::Tiktok,
        display_name: "TikTok",
        android_package: Some("com.zhiliaoapp.musically"),
        android_action: ACTION_SEND,
        ios_scheme: Some("snssdk1233://"),
        media: MediaRequirement::Required(VIDEO_OR_IMAGE),
        gallery_handoff: false,
        fallback: Fallback::ShareSheet,
    },
    AppTarget {
        platform: SharePlatform::Whatsapp,
        display_name: "WhatsApp",
        android_package: Some("com.whatsapp"),
        android_action: ACTION_SEND,
        ios_scheme: Some("whatsapp://"),
        media: MediaRequirement::Optional(IMAGE),
        gallery_handoff: false,
        fallback: Fallback::ShareSheet,
    },
    AppTarget {
        platform: SharePlatform::Linkedin,
        display_name: "LinkedIn",
        android_package: Some("com.linkedin.android"),
        android_action: ACTION_SEND,
        ios_scheme: Some("linkedin://"),
        media: MediaRequirement::Optional(IMAGE),
        gallery_handoff: false,
        fallback: Fallback::ShareSheet,
    },
    AppTarget {
        platform: SharePlatform::Snapchat,
        display_name: "Snapchat",
        android_package: Some("com.snapchat.android"),
        android_action: ACTION_SEND,
        ios_scheme: Some("snapchat://"),
        media: MediaRequirement::Optional(VIDEO_OR_IMAGE),
        gallery_handoff: false,
        fallback: Fallback::Reject,
    },
    AppTarget {
        platform: SharePlatform::Telegram,
        display_name: "Telegram",
        android_package: Some("org.telegram.messenger"),
        android_action: ACTION_SEND,
        ios_scheme: Some("tg://"),
        media: MediaRequirement::Optional(IMAGE),
        gallery_handoff: false,
        fallback: Fallback::ShareSheet,
    },
    AppTarget {
        platform: SharePlatform::Reddit,
        display_name: "Reddit",
        android_package: Some("com.reddit.frontpage"),
        android_action: ACTION_SEND,
        ios_scheme: Some("reddit://"),
        media: MediaRequirement::None,
        gallery_handoff: false,
        fallback: Fallback::ShareSheet,
    },
];

pub fn lookup(platform: SharePlatform) -> &'static AppTarget {
    // The table is ordered like `SharePlatform::ALL`.
    &TARGETS[platform as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_matches_platform_for_every_entry() {
        for platform in SharePlatform::ALL {
            assert_eq!(lookup(platform).platform, platform);
        }
        assert_eq!(TARGETS.len(), SharePlatform::ALL.len());
    }

    #[test]
    fn only_native_has_no_package() {
        for target in &TARGETS {
            assert_eq!(
                target.android_package.is_none(),
                target.platform == SharePlatform::Native,
                "{}",
                target.platform
            );
        }
    }

    #[test]
    fn stories_use_the_instagram_story_action() {
        let stories = lookup(SharePlatform::InstagramStories);
        assert_eq!(stories.android_action, ACTION_ADD_TO_STORY);
        assert_eq!(stories.android_package, Some("com.instagram.android"));
        assert_eq!(stories.fallback, Fallback::Reject);
    }

    #[test]
    fn tiktok_prefers_video() {
        let tiktok = lookup(SharePlatform::Tiktok);
        assert_eq!(tiktok.media.preference().first(), Some(&MediaKind::Video));
        assert!(matches!(tiktok.media, MediaRequirement::Required(_)));
    }
}
