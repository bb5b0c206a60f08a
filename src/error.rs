use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

// Errors that can be sent back to the frontend. `Serialize` flattens them
// to their display string so a command's `Err` rejects the JS promise.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("No content to share")]
    MissingContent,
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
    #[error("{0} is not installed.")]
    AppNotInstalled(String),
    #[error("Failed to open {0}")]
    LaunchFailed(String),
    #[error("Sharing is not available: {0}")]
    Unavailable(String),
    #[error("Share was cancelled")]
    Cancelled,
    #[error("Failed to interact with native sharing API: {0}")]
    NativeApi(String),
    #[error("Temporary file operation failed: {0}")]
    TempFile(String),
    #[error("Tauri API error: {0}")]
    Tauri(#[from] tauri::Error),
    #[cfg(mobile)]
    #[error(transparent)]
    PluginInvoke(#[from] tauri::plugin::mobile::PluginInvokeError),
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn errors_serialize_as_their_message() {
        let json = serde_json::to_string(&Error::AppNotInstalled("Instagram".into())).unwrap();
        assert_eq!(json, "\"Instagram is not installed.\"");
    }

    #[test]
    fn cancelled_message_is_stable() {
        assert_eq!(Error::Cancelled.to_string(), "Share was cancelled");
        assert_eq!(Error::MissingContent.to_string(), "No content to share");
    }
}
