use tauri::{command, AppHandle, Runtime, Window};

use crate::{models, Result, SocialShareExt};

#[command]
pub async fn share<R: Runtime>(
    app: AppHandle<R>,
    window: Window<R>,
    options: models::ShareOptions,
) -> Result<models::ShareResult> {
    app.social_share().share(window, options)
}

#[command]
pub async fn can_share<R: Runtime>(
    app: AppHandle<R>,
    window: Window<R>,
    options: Option<models::CanShareOptions>,
) -> Result<models::CanShareResult> {
    app.social_share()
        .can_share(window, options.unwrap_or_default())
}

#[command]
pub async fn cleanup<R: Runtime>(app: AppHandle<R>) -> Result<()> {
    app.social_share().cleanup()
}
