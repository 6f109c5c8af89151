//! Platform-specific helpers
//!
//! Content views never open windows of their own: sign-in popups are
//! dropped (the embedded pages handle auth in-page) and everything else is
//! handed to the system default browser.

use dockpane_core::{DockpaneError, DockpaneResult};
use log::debug;
use std::process::Command;

/// Open a URL in the system's default browser
pub fn open_external(url: &str) -> DockpaneResult<()> {
    debug!("Opening external URL: {}", url);

    #[cfg(target_os = "macos")]
    let spawned = Command::new("open").arg(url).spawn();

    // The empty "" after start is the window title (required for URLs with
    // special chars)
    #[cfg(target_os = "windows")]
    let spawned = Command::new("cmd").args(["/C", "start", "", url]).spawn();

    #[cfg(target_os = "linux")]
    let spawned = Command::new("xdg-open").arg(url).spawn();

    spawned
        .map(|_| ())
        .map_err(|e| DockpaneError::window(format!("Failed to open {}: {}", url, e)))
}

/// New-window requests that should be swallowed outright
///
/// OAuth flows from the hosted pages try to open popup windows; the pages
/// all support in-page sign-in, so the popups are dropped rather than sent
/// to the external browser.
pub fn is_auth_popup(url: &str) -> bool {
    let url_lower = url.to_lowercase();

    if url_lower == "about:blank" || url_lower.starts_with("javascript:") {
        return true;
    }

    [
        "accounts.google.com",
        "appleid.apple.com",
        "login.microsoftonline.com",
        "login.live.com",
        "github.com/login/oauth",
    ]
    .iter()
    .any(|host| url_lower.contains(host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_popups_are_swallowed() {
        assert!(is_auth_popup("https://accounts.google.com/o/oauth2/v2/auth"));
        assert!(is_auth_popup("https://APPLEID.apple.com/auth/authorize"));
        assert!(is_auth_popup("about:blank"));
        assert!(is_auth_popup("javascript:void(0)"));
    }

    #[test]
    fn test_ordinary_links_are_not_auth_popups() {
        assert!(!is_auth_popup("https://example.org/article"));
        assert!(!is_auth_popup("https://github.com/tauri-apps/wry"));
    }
}
