//! IPC between the panel webview and the Rust backend
//!
//! The panel posts JSON messages through `window.ipc.postMessage`; the
//! backend pushes state back by evaluating `window.dockpane.*` callbacks in
//! the panel.

use dockpane_core::settings::UrlMap;
use dockpane_core::Settings;
use serde::Deserialize;

/// Message from the panel's JavaScript to the backend
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PanelMessage {
    /// Panel finished loading; backend replies with the full config push
    PanelReady,

    // Active-view navigation
    SwitchView { key: String },
    Back,
    Forward,
    Refresh,

    // Settings overlay
    GetUrls,
    UpdateUrls { urls: Vec<(String, String)> },
    SetHotkey { combo: String },
    SetWindowSize { size_key: String },
    SetAlwaysShowOnCurrentScreen { value: bool },
    TogglePin { pinned: bool },

    /// Detach the content view while an overlay is open
    HideBrowserView,
    ShowBrowserView,

    Quit,

    /// Forwarded console output from the panel
    Log { level: String, message: String },
}

/// Bridge injected into the panel before its scripts run
pub const JS_BRIDGE: &str = r#"
(function() {
    window.dockpane = {
        switchView: (key) => window.ipc.postMessage(JSON.stringify({ cmd: 'switch_view', key })),
        back: () => window.ipc.postMessage(JSON.stringify({ cmd: 'back' })),
        forward: () => window.ipc.postMessage(JSON.stringify({ cmd: 'forward' })),
        refresh: () => window.ipc.postMessage(JSON.stringify({ cmd: 'refresh' })),

        getUrls: () => window.ipc.postMessage(JSON.stringify({ cmd: 'get_urls' })),
        updateUrls: (urls) => window.ipc.postMessage(JSON.stringify({ cmd: 'update_urls', urls })),
        setHotkey: (combo) => window.ipc.postMessage(JSON.stringify({ cmd: 'set_hotkey', combo })),
        setWindowSize: (sizeKey) => window.ipc.postMessage(JSON.stringify({ cmd: 'set_window_size', size_key: sizeKey })),
        setAlwaysShowOnCurrentScreen: (value) => window.ipc.postMessage(JSON.stringify({ cmd: 'set_always_show_on_current_screen', value })),
        togglePin: (pinned) => window.ipc.postMessage(JSON.stringify({ cmd: 'toggle_pin', pinned })),

        hideBrowserView: () => window.ipc.postMessage(JSON.stringify({ cmd: 'hide_browser_view' })),
        showBrowserView: () => window.ipc.postMessage(JSON.stringify({ cmd: 'show_browser_view' })),

        quit: () => window.ipc.postMessage(JSON.stringify({ cmd: 'quit' })),
        log: (level, message) => window.ipc.postMessage(JSON.stringify({ cmd: 'log', level, message })),

        panelReady: () => window.ipc.postMessage(JSON.stringify({ cmd: 'panel_ready' })),

        // Populated by the backend's config push
        onConfig: null,
        onUrls: null,
        onActiveView: null,
        onHotkeyError: null
    };
})();
"#;

/// Build the script that pushes the current config into the panel
pub fn config_script(settings: &Settings, active_key: Option<&str>, pinned: bool) -> String {
    let payload = serde_json::json!({
        "keyCombination": settings.default_key_combination,
        "windowSizeKey": settings.window_size_key.as_str(),
        "alwaysShowOnCurrentScreen": settings.always_show_on_current_screen,
        "urls": url_pairs(&settings.urls),
        "activeKey": active_key,
        "pinned": pinned,
        "version": env!("CARGO_PKG_VERSION"),
    });
    format!(
        "if (window.dockpane && window.dockpane.onConfig) window.dockpane.onConfig({});",
        payload
    )
}

/// Build the script that answers a `get_urls` request
pub fn urls_script(urls: &UrlMap) -> String {
    format!(
        "if (window.dockpane && window.dockpane.onUrls) window.dockpane.onUrls({});",
        serde_json::json!(url_pairs(urls))
    )
}

/// Build the script that tells the panel which view is highlighted
pub fn active_view_script(active_key: Option<&str>) -> String {
    format!(
        "if (window.dockpane && window.dockpane.onActiveView) window.dockpane.onActiveView({});",
        serde_json::json!(active_key)
    )
}

/// Build the script that reports a rejected hotkey combination
pub fn hotkey_error_script(message: &str) -> String {
    format!(
        "if (window.dockpane && window.dockpane.onHotkeyError) window.dockpane.onHotkeyError({});",
        serde_json::json!(message)
    )
}

fn url_pairs(urls: &UrlMap) -> Vec<serde_json::Value> {
    urls.iter()
        .map(|(key, url)| serde_json::json!({ "key": key, "url": url }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_switch_view() {
        let msg: PanelMessage =
            serde_json::from_str(r#"{"cmd":"switch_view","key":"url2"}"#).unwrap();
        assert!(matches!(msg, PanelMessage::SwitchView { key } if key == "url2"));
    }

    #[test]
    fn test_parse_update_urls_preserves_order() {
        let msg: PanelMessage = serde_json::from_str(
            r#"{"cmd":"update_urls","urls":[["b","https://b.example"],["a","https://a.example"]]}"#,
        )
        .unwrap();
        match msg {
            PanelMessage::UpdateUrls { urls } => {
                assert_eq!(urls[0].0, "b");
                assert_eq!(urls[1].0, "a");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_cmd_fails() {
        assert!(serde_json::from_str::<PanelMessage>(r#"{"cmd":"explode"}"#).is_err());
    }

    #[test]
    fn test_config_script_carries_settings() {
        let settings = Settings::default();
        let script = config_script(&settings, Some("url1"), false);
        assert!(script.contains("\"keyCombination\":\"Cmd+E\""));
        assert!(script.contains("\"windowSizeKey\":\"medium\""));
        assert!(script.contains("chatgpt.com"));
    }
}
