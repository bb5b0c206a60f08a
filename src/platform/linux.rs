use tauri::{Runtime, Window};

use crate::request::SheetRequest;
use crate::{Error, Result};

/// There is no system-wide share sheet on Linux desktops; sharing goes
/// through web intents instead.
pub const HAS_SHARE_SHEET: bool = false;

pub fn present<R: Runtime>(_window: &Window<R>, _request: &SheetRequest) -> Result<()> {
    Err(Error::Unavailable(
        "no system share sheet on this desktop".to_string(),
    ))
}
