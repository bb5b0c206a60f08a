//! Message text, web intent URLs and app deep links for each platform.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::models::{ShareOptions, SharePlatform};

/// Everything except RFC 3986 unreserved characters.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// The text body each platform expects, built from the loose option fields.
pub fn message(options: &ShareOptions) -> String {
    let text = field(&options.text);
    let url = field(&options.url);
    let title = field(&options.title);

    match options.platform {
        SharePlatform::Twitter => join(
            [
                text,
                hashtags(&options.hashtags),
                field(&options.via).map(|via| format!("via @{}", via.trim_start_matches('@'))),
                url,
            ],
            " ",
        ),
        SharePlatform::Facebook => join(
            [text, url, field(&options.hashtag).map(|tag| hashtag(&tag))],
            " ",
        ),
        SharePlatform::Tiktok => join([text, hashtags(&options.hashtags)], " "),
        SharePlatform::Telegram => join([text, url], "\n"),
        SharePlatform::Linkedin => join([title, text, url], "\n"),
        SharePlatform::Reddit => join(
            [
                title,
                text,
                url,
                field(&options.subreddit).map(|sr| format!("r/{}", sr.trim_start_matches("r/"))),
            ],
            "\n",
        ),
        SharePlatform::Instagram | SharePlatform::InstagramStories | SharePlatform::Snapchat => {
            join([text], " ")
        }
        SharePlatform::Native | SharePlatform::Whatsapp => join([text, url], " "),
    }
}

/// A browser URL that shares to the platform without its app.
pub fn web_intent_url(options: &ShareOptions) -> Option<Url> {
    let text = field(&options.text);
    let url = field(&options.url);
    let title = field(&options.title);

    match options.platform {
        SharePlatform::Facebook => {
            let tag = field(&options.hashtag).map(|tag| hashtag(&tag));
            let description = join([text, tag.clone()], " ");
            with_query(
                "https://www.facebook.com/sharer/sharer.php",
                [
                    ("u", url),
                    ("title", title),
                    ("description", Some(description).filter(|d| !d.is_empty())),
                    ("hashtag", tag),
                ],
            )
        }
        SharePlatform::Twitter => {
            let tags = options
                .hashtags
                .iter()
                .map(|tag| tag.trim().trim_start_matches('#'))
                .filter(|tag| !tag.is_empty())
                .collect::<Vec<_>>()
                .join(",");
            with_query(
                "https://twitter.com/intent/tweet",
                [
                    ("text", text),
                    ("url", url),
                    ("hashtags", Some(tags).filter(|t| !t.is_empty())),
                    ("via", field(&options.via).map(|v| v.trim_start_matches('@').to_string())),
                ],
            )
        }
        SharePlatform::Whatsapp => {
            let mut base = Url::parse("https://wa.me/").ok()?;
            if let Some(phone) = phone_digits(options) {
                base.set_path(&phone);
            }
            with_query(base.as_str(), [("text", Some(message(options)))])
        }
        SharePlatform::Linkedin => with_query(
            "https://www.linkedin.com/sharing/share-offsite/",
            [("url", url), ("title", title), ("summary", text)],
        ),
        SharePlatform::Telegram => with_query(
            "https://t.me/share/url",
            [
                ("url", Some(url.unwrap_or_default())),
                ("text", Some(text.unwrap_or_default())),
            ],
        ),
        SharePlatform::Reddit => {
            let selftext = if url.is_some() { None } else { text };
            with_query(
                "https://www.reddit.com/submit",
                [
                    ("title", title),
                    ("url", url),
                    ("selftext", selftext),
                    ("sr", field(&options.subreddit)),
                ],
            )
        }
        SharePlatform::Tiktok => Url::parse("https://www.tiktok.com/upload").ok(),
        SharePlatform::Native
        | SharePlatform::Instagram
        | SharePlatform::InstagramStories
        | SharePlatform::Snapchat => None,
    }
}

/// The URL that opens the target app directly, where one exists.
pub fn app_deep_link(options: &ShareOptions, app_id: Option<&str>) -> Option<String> {
    let message = message(options);
    match options.platform {
        SharePlatform::Twitter => Some(format!("twitter://post?message={}", encode(&message))),
        SharePlatform::Whatsapp => Some(match phone_digits(options) {
            Some(phone) => format!("https://wa.me/{}?text={}", phone, encode(&message)),
            None => format!("whatsapp://send?text={}", encode(&message)),
        }),
        SharePlatform::Telegram => Some(format!("tg://msg?text={}", encode(&message))),
        SharePlatform::InstagramStories => Some(match app_id {
            Some(id) => format!("instagram-stories://share?source_application={}", encode(id)),
            None => "instagram-stories://share".to_string(),
        }),
        SharePlatform::Linkedin => Some("linkedin://".to_string()),
        SharePlatform::Reddit => Some("reddit://".to_string()),
        SharePlatform::Snapchat => Some("snapchat://".to_string()),
        SharePlatform::Native
        | SharePlatform::Instagram
        | SharePlatform::Facebook
        | SharePlatform::Tiktok => None,
    }
}

/// Opens the target app on an item already saved to the gallery.
pub fn gallery_deep_link(platform: SharePlatform, asset_id: &str) -> Option<String> {
    match platform {
        SharePlatform::Instagram | SharePlatform::InstagramStories => Some(format!(
            "instagram://library?LocalIdentifier={}",
            encode(asset_id)
        )),
        _ => None,
    }
}

fn with_query<const N: usize>(base: &str, pairs: [(&str, Option<String>); N]) -> Option<Url> {
    let mut url = Url::parse(base).ok()?;
    let pairs = pairs
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect::<Vec<_>>();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Some(url)
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

fn field(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn join<const N: usize>(parts: [Option<String>; N], separator: &str) -> String {
    parts.into_iter().flatten().collect::<Vec<_>>().join(separator)
}

fn hashtag(tag: &str) -> String {
    format!("#{}", tag.trim().trim_start_matches('#'))
}

fn hashtags(tags: &[String]) -> Option<String> {
    let tags = tags
        .iter()
        .filter(|tag| !tag.trim().trim_start_matches('#').is_empty())
        .map(|tag| hashtag(tag))
        .collect::<Vec<_>>();
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(" "))
    }
}

fn phone_digits(options: &ShareOptions) -> Option<String> {
    let digits: String = options
        .phone_number
        .as_deref()?
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    Some(digits).filter(|d| !d.is_empty())
}
