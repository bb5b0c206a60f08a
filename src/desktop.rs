use tauri::{plugin::PluginApi, AppHandle, Manager, Runtime, Window};

use crate::backend::{Capabilities, ShareBackend};
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::models::*;
use crate::platform;
use crate::request::{AppQuery, AppShareRequest, GallerySaveRequest, SheetOutcome, SheetRequest};
use crate::state::StagedFiles;
use crate::{Error, Result};

pub fn init<R: Runtime>(
    app: &AppHandle<R>,
    _api: PluginApi<R, Option<Config>>,
) -> Result<SocialShare<R>> {
    Ok(SocialShare(app.clone()))
}

/// Access to the social share APIs.
pub struct SocialShare<R: Runtime>(AppHandle<R>);

impl<R: Runtime> SocialShare<R> {
    pub fn share(&self, window: Window<R>, options: ShareOptions) -> Result<ShareResult> {
        let staged = self.0.state::<StagedFiles>();
        let config = self.0.state::<Config>();
        let backend = DesktopBackend {
            window,
            staged: staged.inner().clone(),
        };
        Dispatcher::new(&backend, staged.inner(), config.inner()).share(&options)
    }

    pub fn can_share(&self, window: Window<R>, options: CanShareOptions) -> Result<CanShareResult> {
        let staged = self.0.state::<StagedFiles>();
        let config = self.0.state::<Config>();
        let backend = DesktopBackend {
            window,
            staged: staged.inner().clone(),
        };
        let value = Dispatcher::new(&backend, staged.inner(), config.inner())
            .can_share(options.platform)?;
        Ok(CanShareResult { value })
    }

    pub fn cleanup(&self) -> Result<()> {
        self.0.state::<StagedFiles>().purge()
    }
}

/// Desktop apps cannot be targeted directly, so every share goes through
/// the OS share sheet or a web intent in the default browser.
struct DesktopBackend<R: Runtime> {
    window: Window<R>,
    staged: StagedFiles,
}

impl<R: Runtime> ShareBackend for DesktopBackend<R> {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            share_sheet: platform::HAS_SHARE_SHEET,
            web_intents: true,
            ..Default::default()
        }
    }

    fn is_installed(&self, _query: &AppQuery) -> Result<bool> {
        Ok(false)
    }

    fn launch(&self, request: &AppShareRequest) -> Result<bool> {
        Err(Error::Unavailable(format!(
            "{} cannot be opened directly on desktop",
            request.platform
        )))
    }

    fn save_to_gallery(&self, _request: &GallerySaveRequest) -> Result<String> {
        Err(Error::Unavailable("no device gallery on desktop".to_string()))
    }

    fn open_url(&self, url: &str) -> Result<bool> {
        open::that(url)
            .map(|_| true)
            .map_err(|e| Error::NativeApi(format!("Failed to open {}: {}", url, e)))
    }

    fn present_sheet(&self, request: &SheetRequest) -> Result<SheetOutcome> {
        let staged = self.staged.clone();
        let paths = request
            .files
            .iter()
            .map(|file| file.path.clone())
            .collect::<Vec<_>>();
        platform::show_share_sheet(&self.window, request, move || staged.release(&paths))?;
        // Desktop sheets do not report whether something was shared.
        Ok(SheetOutcome {
            completed: true,
            activity_type: None,
        })
    }
}
