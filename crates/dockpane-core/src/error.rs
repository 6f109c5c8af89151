//! Error types for Dockpane

use thiserror::Error;

/// Result type alias for Dockpane operations
pub type DockpaneResult<T> = Result<T, DockpaneError>;

/// Main error type for Dockpane
#[derive(Error, Debug)]
pub enum DockpaneError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Hotkey error: {0}")]
    Hotkey(String),

    #[error("WebView error: {0}")]
    WebView(String),

    #[error("Window error: {0}")]
    Window(String),

    #[error("Update error: {0}")]
    Update(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DockpaneError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new hotkey error
    pub fn hotkey(msg: impl Into<String>) -> Self {
        Self::Hotkey(msg.into())
    }

    /// Create a new WebView error
    pub fn webview(msg: impl Into<String>) -> Self {
        Self::WebView(msg.into())
    }

    /// Create a new window error
    pub fn window(msg: impl Into<String>) -> Self {
        Self::Window(msg.into())
    }

    /// Create a new update error
    pub fn update(msg: impl Into<String>) -> Self {
        Self::Update(msg.into())
    }
}
