use tauri::{Runtime, Window};

use crate::request::SheetRequest;
use crate::Result;

#[cfg(target_os = "windows")]
mod windows;
#[cfg(target_os = "windows")]
use self::windows as native;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
use self::macos as native;

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
mod linux;
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
use self::linux as native;

#[cfg(any(target_os = "windows", target_os = "macos"))]
mod dismissal;

pub use native::HAS_SHARE_SHEET;

/// Shows the OS share sheet for `window`. `on_closed` runs once the sheet
/// has been dismissed.
#[cfg(any(target_os = "windows", target_os = "macos"))]
pub fn show_share_sheet<R, F>(window: &Window<R>, request: &SheetRequest, on_closed: F) -> Result<()>
where
    R: Runtime,
    F: FnOnce() + Send + 'static,
{
    let watch = dismissal::watch(window)?;
    if let Err(e) = native::present(window, request) {
        watch.cancel();
        return Err(e);
    }
    watch.on_closed(on_closed);
    Ok(())
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub fn show_share_sheet<R, F>(window: &Window<R>, request: &SheetRequest, _on_closed: F) -> Result<()>
where
    R: Runtime,
    F: FnOnce() + Send + 'static,
{
    native::present(window, request)
}
