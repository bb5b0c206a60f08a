//! The share sequence: validate, stage, hand to the app, fall back.

use crate::backend::{Capabilities, ShareBackend};
use crate::compose;
use crate::config::Config;
use crate::models::{non_empty, MediaKind, ShareMethod, ShareOptions, SharePlatform, ShareResult};
use crate::request::{AppQuery, AppShareRequest, GallerySaveRequest, SheetRequest};
use crate::staging::{StagedBundle, Stager};
use crate::state::StagedFiles;
use crate::targets::{self, AppTarget, Fallback, MediaRequirement};
use crate::{Error, Result};

pub struct Dispatcher<'a, B: ShareBackend> {
    backend: &'a B,
    staged: &'a StagedFiles,
    config: &'a Config,
}

impl<'a, B: ShareBackend> Dispatcher<'a, B> {
    pub fn new(backend: &'a B, staged: &'a StagedFiles, config: &'a Config) -> Self {
        Self {
            backend,
            staged,
            config,
        }
    }

    pub fn share(&self, options: &ShareOptions) -> Result<ShareResult> {
        let target = targets::lookup(options.platform);
        validate(target, options)?;

        let media = Stager::new(self.staged).stage_options(options)?;
        log::info!("sharing to {}", options.platform);

        let result = self.deliver(target, options, &media);
        match &result {
            Ok(shared) => log::debug!("{} shared via {:?}", options.platform, shared.method),
            Err(e) => {
                log::warn!("sharing to {} failed: {}", options.platform, e);
                self.staged.release(&media.temporary_paths());
            }
        }
        result
    }

    /// Whether a share to `platform` has any chance of succeeding here.
    pub fn can_share(&self, platform: Option<SharePlatform>) -> Result<bool> {
        let caps = self.backend.capabilities();
        let platform = platform.unwrap_or(SharePlatform::Native);
        if platform == SharePlatform::Native {
            return Ok(caps.share_sheet);
        }

        let target = targets::lookup(platform);
        if self.backend.is_installed(&AppQuery::from(target))? {
            return Ok(true);
        }
        Ok(match target.fallback {
            Fallback::Reject => false,
            Fallback::ShareSheet => {
                caps.share_sheet
                    || (caps.web_intents
                        && compose::web_intent_url(&ShareOptions::new(platform)).is_some())
            }
        })
    }

    fn deliver(
        &self,
        target: &AppTarget,
        options: &ShareOptions,
        media: &StagedBundle,
    ) -> Result<ShareResult> {
        let caps = self.backend.capabilities();
        if target.platform == SharePlatform::Native {
            return self.share_sheet(target, options, media, caps);
        }

        if !self.backend.is_installed(&AppQuery::from(target))? {
            log::debug!("{} is not installed", target.display_name);
            if target.fallback == Fallback::Reject {
                return Err(Error::AppNotInstalled(target.display_name.to_string()));
            }
            return self.fallback(target, options, media, caps);
        }

        let mut asset_id = None;
        if let Some(primary) = media.primary(target.media.preference()) {
            if target.gallery_handoff && caps.gallery_handoff {
                let asset = self.backend.save_to_gallery(&GallerySaveRequest::from(primary))?;
                if let Some(link) = compose::gallery_deep_link(target.platform, &asset) {
                    if self.backend.open_url(&link)? {
                        let mut result = ShareResult::shared(Some(target.platform), ShareMethod::Gallery);
                        result.asset_id = Some(asset);
                        return Ok(result);
                    }
                }
                asset_id = Some(asset);
            } else if options.save_to_device && caps.media_store {
                asset_id = Some(self.backend.save_to_gallery(&GallerySaveRequest::from(primary))?);
            }
        }

        let request = AppShareRequest::build(target, options, media, self.config.app_id.as_deref());
        if self.backend.launch(&request)? {
            let mut result = ShareResult::shared(Some(target.platform), ShareMethod::App);
            result.asset_id = asset_id;
            // These apps open on their feed and ignore the shared content.
            if matches!(target.platform, SharePlatform::Linkedin | SharePlatform::Reddit) {
                result.note = Some(format!(
                    "Please create your post manually in {}",
                    target.display_name
                ));
            }
            return Ok(result);
        }

        log::warn!("{} did not accept the share", target.display_name);
        if target.fallback == Fallback::Reject {
            return Err(Error::LaunchFailed(target.display_name.to_string()));
        }
        self.fallback(target, options, media, caps)
    }

    fn fallback(
        &self,
        target: &AppTarget,
        options: &ShareOptions,
        media: &StagedBundle,
        caps: Capabilities,
    ) -> Result<ShareResult> {
        let web = if caps.web_intents {
            compose::web_intent_url(options)
        } else {
            None
        };

        // Web intents cannot carry files.
        if caps.share_sheet && (!media.is_empty() || web.is_none()) {
            return self.share_sheet(target, options, media, caps);
        }
        if let Some(url) = web {
            log::debug!("opening web intent {}", url);
            if self.backend.open_url(url.as_str())? {
                // The browser never sees staged files.
                self.staged.release(&media.temporary_paths());
                return Ok(ShareResult::shared(Some(target.platform), ShareMethod::WebIntent));
            }
            return Err(Error::LaunchFailed(format!("{} in the browser", target.display_name)));
        }
        Err(Error::Unavailable(format!(
            "no way to share to {} on this device",
            target.display_name
        )))
    }

    fn share_sheet(
        &self,
        target: &AppTarget,
        options: &ShareOptions,
        media: &StagedBundle,
        caps: Capabilities,
    ) -> Result<ShareResult> {
        let sheet = SheetRequest::build(options, media);
        if sheet.is_empty() {
            return Err(Error::MissingContent);
        }
        if !caps.share_sheet {
            return Err(Error::Unavailable(
                "no system share sheet on this device".to_string(),
            ));
        }

        let outcome = self.backend.present_sheet(&sheet)?;
        if !outcome.completed {
            // Only a sheet standing in for the target app fails on dismissal.
            if target.platform != SharePlatform::Native {
                return Err(Error::Cancelled);
            }
            self.staged.release(&media.temporary_paths());
            return Ok(ShareResult::cancelled(Some(target.platform), ShareMethod::ShareSheet));
        }
        let mut result = ShareResult::shared(Some(target.platform), ShareMethod::ShareSheet);
        result.note = outcome.activity_type;
        Ok(result)
    }
}

fn validate(target: &AppTarget, options: &ShareOptions) -> Result<()> {
    match target.media {
        // A story can be just a sticker over the background colours.
        MediaRequirement::Required(_)
            if target.platform == SharePlatform::InstagramStories
                && non_empty(&options.sticker_image) =>
        {
            Ok(())
        }
        MediaRequirement::Required(kinds) => {
            if !kinds.iter().any(|kind| has_media(options, *kind)) {
                let wanted = kinds
                    .iter()
                    .map(|kind| format!("{:?}", kind).to_lowercase())
                    .collect::<Vec<_>>()
                    .join(" or ");
                return Err(Error::InvalidArgs(format!(
                    "{} needs media to share ({})",
                    target.display_name, wanted
                )));
            }
            Ok(())
        }
        // Snapchat opens on its camera when there is nothing to attach.
        _ if target.platform == SharePlatform::Snapchat => Ok(()),
        MediaRequirement::None if !options.has_text() => Err(Error::MissingContent),
        MediaRequirement::Optional(_) if !options.has_text() && !options.has_media() => {
            Err(Error::MissingContent)
        }
        _ => Ok(()),
    }
}

fn has_media(options: &ShareOptions, kind: MediaKind) -> bool {
    match kind {
        MediaKind::Image => options.has_image(),
        MediaKind::Video => options.has_video(),
        MediaKind::Audio => options.has_audio(),
        MediaKind::File => !options.files.is_empty(),
    }
}
