use crate::request::{AppQuery, AppShareRequest, GallerySaveRequest, SheetOutcome, SheetRequest};
use crate::Result;

/// What a share backend can do on the current device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Save to the gallery, then open the app on the saved asset.
    pub gallery_handoff: bool,
    /// Save media to the device's shared media store.
    pub media_store: bool,
    pub share_sheet: bool,
    /// Open share URLs in a browser.
    pub web_intents: bool,
}

/// The native side of a share. Implemented by the desktop and mobile
/// plugin halves; every method is a single platform call.
pub trait ShareBackend {
    fn capabilities(&self) -> Capabilities;

    fn is_installed(&self, query: &AppQuery) -> Result<bool>;

    /// Hands the request to the target app. `Ok(false)` when the app
    /// refused or could not be opened.
    fn launch(&self, request: &AppShareRequest) -> Result<bool>;

    /// Returns the identifier of the saved gallery asset.
    fn save_to_gallery(&self, request: &GallerySaveRequest) -> Result<String>;

    fn open_url(&self, url: &str) -> Result<bool>;

    fn present_sheet(&self, request: &SheetRequest) -> Result<SheetOutcome>;
}
