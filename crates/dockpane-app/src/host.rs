//! tao/wry implementation of the shell's platform traits
//!
//! The host owns the panel window, the panel webview and one child webview
//! per configured URL. Views are attached and detached by toggling
//! visibility so page state survives switches.

use std::collections::HashMap;

use dockpane_core::geometry::{Monitor, Point, Rect, Size};
use dockpane_core::{DockpaneError, DockpaneResult, Settings};
use dockpane_shell::{DisplayGeometry, SettingsStore, WindowHost};
use log::{debug, error, warn};
use tao::dpi::{LogicalPosition, LogicalSize};
use tao::event_loop::EventLoopProxy;
use tao::window::Window;
use wry::{WebView, WebViewBuilder};

use crate::ipc::PanelMessage;
use crate::{platform, UserEvent};

/// Fallback monitor when the platform reports none
const FALLBACK_MONITOR: Rect = Rect {
    x: 0,
    y: 0,
    width: 1920,
    height: 1080,
};

pub struct PanelHost {
    window: Window,
    panel: WebView,
    views: HashMap<String, WebView>,
    init_script: String,
    proxy: EventLoopProxy<UserEvent>,
}

impl PanelHost {
    pub fn new(
        window: Window,
        panel: WebView,
        init_script: String,
        proxy: EventLoopProxy<UserEvent>,
    ) -> Self {
        Self {
            window,
            panel,
            views: HashMap::new(),
            init_script,
            proxy,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Run a script in the panel webview
    pub fn eval_panel(&self, script: &str) {
        if let Err(e) = self.panel.evaluate_script(script) {
            error!("Panel script failed: {}", e);
        }
    }

    /// Run a script in the view registered under `key`
    pub fn eval_view(&self, key: &str, script: &str) {
        match self.views.get(key) {
            Some(view) => {
                if let Err(e) = view.evaluate_script(script) {
                    error!("Script in view '{}' failed: {}", key, e);
                }
            }
            None => warn!("No view '{}' to run script in", key),
        }
    }

    /// Reload the view registered under `key`
    pub fn reload_view(&self, key: &str, bypass_cache: bool) {
        let script = if bypass_cache {
            "location.reload(true);"
        } else {
            "location.reload();"
        };
        self.eval_view(key, script);
    }

    fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }

    fn wry_bounds(bounds: Rect) -> wry::Rect {
        wry::Rect {
            position: LogicalPosition::new(bounds.x, bounds.y).into(),
            size: LogicalSize::new(bounds.width, bounds.height).into(),
        }
    }

    /// Keep the panel webview covering the whole window
    pub fn fit_panel(&self, size: Size) {
        let bounds = Rect::new(0, 0, size.width, size.height);
        if let Err(e) = self.panel.set_bounds(Self::wry_bounds(bounds)) {
            error!("Failed to resize panel webview: {}", e);
        }
    }

    fn monitor_rect(handle: &tao::monitor::MonitorHandle) -> Rect {
        let scale = handle.scale_factor();
        let position: LogicalPosition<i32> = handle.position().to_logical(scale);
        let size: LogicalSize<u32> = handle.size().to_logical(scale);
        Rect::new(position.x, position.y, size.width, size.height)
    }
}

impl WindowHost for PanelHost {
    fn create_view(&mut self, key: &str, url: &str) -> DockpaneResult<()> {
        debug!("Creating view '{}' for {}", key, url);
        let log_proxy = self.proxy.clone();
        let log_key = key.to_string();
        let webview = WebViewBuilder::new()
            .with_url(url)
            .with_devtools(cfg!(debug_assertions))
            .with_initialization_script(&self.init_script)
            .with_visible(false)
            // Content views may only post log messages; everything else is
            // dropped.
            .with_ipc_handler(move |message| {
                match serde_json::from_str::<PanelMessage>(message.body()) {
                    Ok(PanelMessage::Log { level, message }) => {
                        let _ = log_proxy.send_event(UserEvent::Panel(PanelMessage::Log {
                            level,
                            message: format!("[{}] {}", log_key, message),
                        }));
                    }
                    _ => debug!("Dropping message from view '{}'", log_key),
                }
            })
            .with_new_window_req_handler(|url| {
                if platform::is_auth_popup(&url) {
                    debug!("Dropping popup request: {}", url);
                } else if let Err(e) = platform::open_external(&url) {
                    error!("{}", e);
                }
                false
            })
            .build_as_child(&self.window)
            .map_err(|e| {
                DockpaneError::webview(format!("Failed to create view '{}': {}", key, e))
            })?;
        self.views.insert(key.to_string(), webview);
        Ok(())
    }

    fn destroy_view(&mut self, key: &str) {
        if self.views.remove(key).is_none() {
            warn!("Destroying unknown view '{}'", key);
        }
    }

    fn attach_view(&mut self, key: &str) {
        if let Some(view) = self.views.get(key) {
            if let Err(e) = view.set_visible(true) {
                error!("Failed to attach view '{}': {}", key, e);
            }
        }
    }

    fn detach_view(&mut self, key: &str) {
        if let Some(view) = self.views.get(key) {
            if let Err(e) = view.set_visible(false) {
                error!("Failed to detach view '{}': {}", key, e);
            }
        }
    }

    fn set_view_bounds(&mut self, key: &str, bounds: Rect) {
        if let Some(view) = self.views.get(key) {
            if let Err(e) = view.set_bounds(Self::wry_bounds(bounds)) {
                error!("Failed to resize view '{}': {}", key, e);
            }
        }
    }

    fn focus_view(&mut self, key: &str) {
        if let Some(view) = self.views.get(key) {
            if let Err(e) = view.focus() {
                debug!("Focus of view '{}' refused: {}", key, e);
            }
        }
    }

    fn set_window_position(&mut self, origin: Point) {
        self.window
            .set_outer_position(LogicalPosition::new(origin.x, origin.y));
    }

    fn set_window_size(&mut self, size: Size) {
        self.window
            .set_inner_size(LogicalSize::new(size.width, size.height));
        self.fit_panel(size);
    }

    fn window_position(&self) -> Point {
        match self.window.outer_position() {
            Ok(position) => {
                let logical: LogicalPosition<i32> = position.to_logical(self.scale_factor());
                Point::new(logical.x, logical.y)
            }
            Err(e) => {
                warn!("Window position unavailable: {}", e);
                Point::new(0, 0)
            }
        }
    }

    fn window_size(&self) -> Size {
        let logical: LogicalSize<u32> = self.window.inner_size().to_logical(self.scale_factor());
        Size::new(logical.width, logical.height)
    }

    fn show_window(&mut self) {
        #[cfg(not(target_os = "macos"))]
        self.window.set_minimized(false);
        self.window.set_visible(true);
        self.window.set_focus();
    }

    fn hide_window(&mut self) {
        // Minimizing first restores focus to the previous application on
        // platforms without a shared app-hide concept.
        #[cfg(not(target_os = "macos"))]
        self.window.set_minimized(true);
        self.window.set_visible(false);
    }

    fn set_always_on_top_floating(&mut self, pinned: bool) {
        self.window.set_always_on_top(pinned);
    }
}

impl DisplayGeometry for PanelHost {
    fn monitor_near_cursor(&self) -> Monitor {
        let handle = self
            .window
            .cursor_position()
            .ok()
            .and_then(|cursor| self.window.monitor_from_point(cursor.x, cursor.y))
            .or_else(|| self.window.current_monitor())
            .or_else(|| self.window.primary_monitor());

        match handle {
            // tao reports no work area, so docks and taskbars are ignored
            Some(handle) => Monitor::from_bounds(Self::monitor_rect(&handle)),
            None => {
                warn!("No monitor reported, using fallback bounds");
                Monitor::from_bounds(FALLBACK_MONITOR)
            }
        }
    }
}

/// Settings write-back to the JSON file on disk
pub struct JsonSettingsStore {
    path: std::path::PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: std::path::PathBuf) -> Self {
        Self { path }
    }
}

impl SettingsStore for JsonSettingsStore {
    fn persist(&mut self, settings: &Settings) {
        if let Err(e) = settings.save(&self.path) {
            error!("Failed to persist settings: {}", e);
        }
    }
}
