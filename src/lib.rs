//! # tauri-plugin-social-share
//!
//! A Tauri plugin that shares text, links, images, videos and audio to a
//! specific social app (Instagram, Instagram Stories, Facebook, Twitter/X,
//! TikTok, WhatsApp, LinkedIn, Snapchat, Telegram, Reddit), falling back to
//! the system share sheet when the app is not available.
//!
//! On Android and iOS the request is handed to the app through the native
//! plugin layer. On desktop, where apps cannot be targeted, the plugin opens
//! the platform's web share page or the OS share sheet. Base64 payloads are
//! written to temporary files that are cleaned up once the share sheet closes,
//! on `cleanup`, and when the application exits.
//!
//! ## Usage
//!
//! ```rust,ignore
//! fn main() {
//!     tauri::Builder::default()
//!         .plugin(tauri_plugin_social_share::init())
//!         .run(tauri::generate_context!())
//!         .expect("error while running tauri application");
//! }
//! ```
//!
//! ```js
//! import { invoke } from '@tauri-apps/api/core';
//!
//! await invoke('plugin:social-share|share', {
//!   options: {
//!     platform: 'twitter',
//!     text: 'I found this cool project built with Tauri.',
//!     url: 'https://tauri.app',
//!     hashtags: ['tauri', 'rust'],
//!   },
//! });
//!
//! await invoke('plugin:social-share|share', {
//!   options: { platform: 'instagram-stories', imageData: 'data:image/png;base64,...' },
//! });
//! ```

use tauri::{
    plugin::{Builder, TauriPlugin},
    Manager, Runtime,
};

pub use models::*;

#[cfg(desktop)]
mod desktop;
#[cfg(mobile)]
mod mobile;
#[cfg(desktop)]
mod platform;

mod backend;
mod commands;
mod compose;
mod config;
mod dispatch;
mod error;
mod models;
mod request;
mod staging;
mod state;
mod targets;

pub use config::Config;
pub use error::{Error, Result};

#[cfg(desktop)]
use desktop::SocialShare;
#[cfg(mobile)]
use mobile::SocialShare;

/// Extensions to [`tauri::App`], [`tauri::AppHandle`] and [`tauri::Window`] to access the social share APIs.
pub trait SocialShareExt<R: Runtime> {
    fn social_share(&self) -> &SocialShare<R>;
}

impl<R: Runtime, T: Manager<R>> crate::SocialShareExt<R> for T {
    fn social_share(&self) -> &SocialShare<R> {
        self.state::<SocialShare<R>>().inner()
    }
}

/// Initializes the plugin.
///
/// Reads the optional `plugins.social-share` config, registers the commands
/// and the staged file registry, and deletes staged files when the plugin is
/// dropped.
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<Config>> {
    Builder::<R, Option<Config>>::new("social-share")
        .invoke_handler(tauri::generate_handler![
            commands::share,
            commands::can_share,
            commands::cleanup,
        ])
        .setup(|app, api| {
            let config = api.config().clone().unwrap_or_default();
            // The system temp dir is not writable by apps on Android.
            let cache_dir = app.path().app_cache_dir().unwrap_or_else(|e| {
                log::warn!("no app cache dir ({}), staging in the system temp dir", e);
                std::env::temp_dir()
            });
            let staging_dir = config.staging_dir(&cache_dir);
            log::debug!("staging shared files in {}", staging_dir.display());
            app.manage(state::StagedFiles::new(staging_dir));
            app.manage(config);

            #[cfg(mobile)]
            let share = mobile::init(app, api)?;
            #[cfg(desktop)]
            let share = desktop::init(app, api)?;
            app.manage(share);
            Ok(())
        })
        .on_drop(|app| {
            if let Some(staged) = app.try_state::<state::StagedFiles>() {
                staged.release_all();
            }
        })
        .build()
}
