use serde::{Deserialize, Serialize};
use tauri::{
    plugin::{PluginApi, PluginHandle},
    AppHandle, Manager, Runtime, Window,
};

use crate::backend::{Capabilities, ShareBackend};
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::models::*;
use crate::request::{AppQuery, AppShareRequest, GallerySaveRequest, SheetOutcome, SheetRequest};
use crate::state::StagedFiles;
use crate::Result;

#[cfg(target_os = "android")]
const PLUGIN_IDENTIFIER: &str = "app.tauri.socialshare";

#[cfg(target_os = "ios")]
tauri::ios_plugin_binding!(init_plugin_social_share);

// initializes the Kotlin or Swift plugin classes
pub fn init<R: Runtime>(
    app: &AppHandle<R>,
    api: PluginApi<R, Option<Config>>,
) -> Result<SocialShare<R>> {
    #[cfg(target_os = "android")]
    let handle = api.register_android_plugin(PLUGIN_IDENTIFIER, "SocialSharePlugin")?;
    #[cfg(target_os = "ios")]
    let handle = api.register_ios_plugin(init_plugin_social_share)?;
    Ok(SocialShare {
        app: app.clone(),
        handle,
    })
}

/// Access to the social share APIs.
pub struct SocialShare<R: Runtime> {
    app: AppHandle<R>,
    handle: PluginHandle<R>,
}

impl<R: Runtime> SocialShare<R> {
    pub fn share(&self, _window: Window<R>, options: ShareOptions) -> Result<ShareResult> {
        let staged = self.app.state::<StagedFiles>();
        let config = self.app.state::<Config>();
        let backend = MobileBackend(&self.handle);
        Dispatcher::new(&backend, staged.inner(), config.inner()).share(&options)
    }

    pub fn can_share(&self, _window: Window<R>, options: CanShareOptions) -> Result<CanShareResult> {
        let staged = self.app.state::<StagedFiles>();
        let config = self.app.state::<Config>();
        let backend = MobileBackend(&self.handle);
        let value = Dispatcher::new(&backend, staged.inner(), config.inner())
            .can_share(options.platform)?;
        Ok(CanShareResult { value })
    }

    pub fn cleanup(&self) -> Result<()> {
        self.app.state::<StagedFiles>().purge()?;
        self.handle
            .run_mobile_plugin::<serde_json::Value>("cleanup", ())
            .map(|_| ())
            .map_err(Into::into)
    }
}

#[derive(Debug, Deserialize)]
struct InstalledResponse {
    installed: bool,
}

#[derive(Debug, Deserialize)]
struct LaunchResponse {
    launched: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GallerySaveResponse {
    asset_id: String,
}

#[derive(Debug, Serialize)]
struct OpenUrlRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenUrlResponse {
    opened: bool,
}

/// Forwards each step to the Kotlin/Swift side, which performs the actual
/// intent, pasteboard, media store or activity call.
struct MobileBackend<'a, R: Runtime>(&'a PluginHandle<R>);

impl<R: Runtime> ShareBackend for MobileBackend<'_, R> {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            gallery_handoff: cfg!(target_os = "ios"),
            media_store: true,
            share_sheet: true,
            web_intents: false,
        }
    }

    fn is_installed(&self, query: &AppQuery) -> Result<bool> {
        self.0
            .run_mobile_plugin::<InstalledResponse>("isInstalled", query)
            .map(|response| response.installed)
            .map_err(Into::into)
    }

    fn launch(&self, request: &AppShareRequest) -> Result<bool> {
        self.0
            .run_mobile_plugin::<LaunchResponse>("launch", request)
            .map(|response| response.launched)
            .map_err(Into::into)
    }

    fn save_to_gallery(&self, request: &GallerySaveRequest) -> Result<String> {
        self.0
            .run_mobile_plugin::<GallerySaveResponse>("saveToGallery", request)
            .map(|response| response.asset_id)
            .map_err(Into::into)
    }

    fn open_url(&self, url: &str) -> Result<bool> {
        self.0
            .run_mobile_plugin::<OpenUrlResponse>("openUrl", OpenUrlRequest { url })
            .map(|response| response.opened)
            .map_err(Into::into)
    }

    fn present_sheet(&self, request: &SheetRequest) -> Result<SheetOutcome> {
        self.0
            .run_mobile_plugin::<SheetOutcome>("presentSheet", request)
            .map_err(Into::into)
    }
}
