//! Window and view lifecycle logic for the dockpane shell
//!
//! This crate holds the policy layer: which content view is attached, where
//! the window goes when it is summoned, when the saved position is written
//! back to disk. It talks to the platform through the [`WindowHost`],
//! [`DisplayGeometry`] and [`SettingsStore`] traits so the whole state
//! machine runs in plain unit tests with fake collaborators.
//!
//! The app crate implements the traits over tao and wry and forwards OS
//! events (focus, move, hotkey) into the manager.

pub mod debounce;
pub mod hotkey;
pub mod shortcuts;

use std::time::{Duration, Instant};

use dockpane_core::geometry::{Monitor, Point, Rect, Size, SizePreset};
use dockpane_core::settings::UrlMap;
use dockpane_core::{DockpaneResult, Settings};

use debounce::Debounce;

/// Height of the control bar rendered by the panel webview, in logical
/// pixels. Content views sit directly below it.
pub const PANEL_BAR_HEIGHT: u32 = 50;

/// How long the window must sit still before its position is persisted
pub const PERSIST_DEBOUNCE: Duration = Duration::from_millis(100);

/// Bounds of a content view inside a window of the given size
pub fn content_bounds(window: Size) -> Rect {
    Rect::new(
        0,
        PANEL_BAR_HEIGHT as i32,
        window.width,
        window.height.saturating_sub(PANEL_BAR_HEIGHT),
    )
}

/// Whether at least half of `window` lies on `monitor`
pub fn position_mostly_on(window: Rect, monitor: Rect) -> bool {
    2 * window.intersection_area(&monitor) >= window.area()
}

/// Where the window goes when it is summoned
///
/// The saved position is used verbatim when it still keeps at least half of
/// the window on the monitor under the cursor; otherwise the window is
/// centered on that monitor's work area. The `always_show_on_current_screen`
/// setting skips the saved position entirely.
pub fn resolve_show_origin(settings: &Settings, window: Size, monitor: &Monitor) -> Point {
    if !settings.always_show_on_current_screen {
        if let Some(saved) = settings.window_position {
            if position_mostly_on(Rect::from_parts(saved, window), monitor.bounds) {
                return saved;
            }
        }
    }
    monitor.work_area.centered_origin(window)
}

/// Platform surface the lifecycle manager drives
///
/// One implementation exists per windowing backend; views are addressed by
/// their settings key. Attach/detach toggles membership in the window
/// without destroying the page, so state survives switches.
pub trait WindowHost {
    fn create_view(&mut self, key: &str, url: &str) -> DockpaneResult<()>;
    fn destroy_view(&mut self, key: &str);
    fn attach_view(&mut self, key: &str);
    fn detach_view(&mut self, key: &str);
    fn set_view_bounds(&mut self, key: &str, bounds: Rect);
    fn focus_view(&mut self, key: &str);

    fn set_window_position(&mut self, origin: Point);
    fn set_window_size(&mut self, size: Size);
    fn window_position(&self) -> Point;
    fn window_size(&self) -> Size;
    fn show_window(&mut self);
    fn hide_window(&mut self);
    fn set_always_on_top_floating(&mut self, pinned: bool);
}

/// Monitor lookup at summon time
pub trait DisplayGeometry {
    /// The monitor whose bounds contain the cursor, or the nearest one
    fn monitor_near_cursor(&self) -> Monitor;
}

/// Write-back of settings to durable storage
pub trait SettingsStore {
    fn persist(&mut self, settings: &Settings);
}

/// Owner of the window/view state machine
///
/// Tracks which view is active, whether the window is visible and pinned,
/// and schedules the debounced position write-back. All mutations of the
/// in-memory [`Settings`] happen here.
pub struct ViewLifecycleManager<H, S> {
    host: H,
    store: S,
    settings: Settings,
    view_keys: Vec<String>,
    active_key: Option<String>,
    /// False while the active view is concealed behind the panel overlay
    active_attached: bool,
    visible: bool,
    pinned: bool,
    persist: Debounce,
}

impl<H, S> ViewLifecycleManager<H, S>
where
    H: WindowHost + DisplayGeometry,
    S: SettingsStore,
{
    /// Build one view per configured URL and attach the first
    pub fn new(mut host: H, store: S, settings: Settings) -> DockpaneResult<Self> {
        host.set_window_size(settings.window_size);
        let bounds = content_bounds(settings.window_size);

        let mut view_keys = Vec::with_capacity(settings.urls.len());
        for (key, url) in settings.urls.iter() {
            host.create_view(key, url)?;
            host.set_view_bounds(key, bounds);
            view_keys.push(key.to_string());
        }

        let active_key = view_keys.first().cloned();
        if let Some(key) = &active_key {
            host.attach_view(key);
        }

        Ok(Self {
            host,
            store,
            settings,
            view_keys,
            active_attached: active_key.is_some(),
            active_key,
            visible: false,
            pinned: false,
            persist: Debounce::new(PERSIST_DEBOUNCE),
        })
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn active_key(&self) -> Option<&str> {
        self.active_key.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn urls(&self) -> &UrlMap {
        &self.settings.urls
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.visible {
            self.hide();
        } else {
            self.show(now);
        }
    }

    /// Summon the window onto the monitor under the cursor
    pub fn show(&mut self, now: Instant) {
        let monitor = self.host.monitor_near_cursor();

        // The sidebar preset depends on the monitor, so it is re-resolved on
        // every summon; fixed presets keep their stored size.
        if self.settings.window_size_key == SizePreset::Sidebar {
            let size = SizePreset::Sidebar.resolve(&monitor);
            if size != self.settings.window_size {
                self.settings.window_size = size;
                self.host.set_window_size(size);
                let bounds = content_bounds(size);
                for key in &self.view_keys {
                    self.host.set_view_bounds(key, bounds);
                }
            }
        }

        let origin = resolve_show_origin(&self.settings, self.settings.window_size, &monitor);
        self.host.set_window_position(origin);
        self.settings.window_position = Some(origin);
        self.host.show_window();
        self.visible = true;

        if let Some(key) = &self.active_key {
            if self.active_attached {
                self.host.focus_view(key);
            }
        }
        self.persist.bump(now);
    }

    /// Dismiss the window, flushing the pending position write first
    pub fn hide(&mut self) {
        self.persist.cancel();
        self.settings.window_position = Some(self.host.window_position());
        self.store.persist(&self.settings);
        self.host.hide_window();
        self.visible = false;
    }

    /// Hide on focus loss unless pinned
    pub fn on_blur(&mut self) {
        if self.visible && !self.pinned {
            self.hide();
        }
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
        self.host.set_always_on_top_floating(pinned);
    }

    /// Make `key` the active view; unknown keys are ignored
    pub fn switch_view(&mut self, key: &str) {
        if !self.view_keys.iter().any(|k| k == key) {
            log::warn!("Ignoring switch to unknown view '{}'", key);
            return;
        }
        if self.active_key.as_deref() == Some(key) && self.active_attached {
            self.host.focus_view(key);
            return;
        }

        if self.active_attached {
            if let Some(current) = &self.active_key {
                self.host.detach_view(current);
            }
        }

        self.active_key = Some(key.to_string());
        self.host.attach_view(key);
        self.host
            .set_view_bounds(key, content_bounds(self.host.window_size()));
        self.host.focus_view(key);
        self.active_attached = true;
    }

    /// Switch to the view at `index` in configuration order
    pub fn switch_view_at(&mut self, index: usize) {
        if let Some(key) = self.view_keys.get(index).cloned() {
            self.switch_view(&key);
        }
    }

    /// Apply a size preset, resolved against the monitor under the cursor
    ///
    /// Entering the sidebar preset flushes the window to the right edge of
    /// that monitor's work area; re-applying it keeps the current position.
    pub fn apply_size(&mut self, preset: SizePreset, now: Instant) {
        let monitor = self.host.monitor_near_cursor();
        let size = preset.resolve(&monitor);
        let was_sidebar = self.settings.window_size_key == SizePreset::Sidebar;

        self.host.set_window_size(size);
        self.settings.window_size = size;
        self.settings.window_size_key = preset;

        let bounds = content_bounds(size);
        for key in &self.view_keys {
            self.host.set_view_bounds(key, bounds);
        }

        if preset == SizePreset::Sidebar && !was_sidebar {
            let work = monitor.work_area;
            let origin = Point::new(
                work.x + work.width as i32 - size.width as i32,
                work.y,
            );
            self.host.set_window_position(origin);
            self.settings.window_position = Some(origin);
        }

        self.store.persist(&self.settings);

        if !self.visible {
            self.show(now);
        }
    }

    /// Replace the URL set, rebuilding every view
    ///
    /// The active slot is preserved when its key survives the edit;
    /// otherwise the first configured view becomes active.
    pub fn rebuild_views(&mut self, urls: UrlMap) -> DockpaneResult<()> {
        let previous = self.active_key.take();
        if self.active_attached {
            if let Some(key) = &previous {
                self.host.detach_view(key);
            }
            self.active_attached = false;
        }
        for key in self.view_keys.drain(..) {
            self.host.destroy_view(&key);
        }

        self.settings.urls = urls;
        self.store.persist(&self.settings);

        let bounds = content_bounds(self.host.window_size());
        for (key, url) in self.settings.urls.iter() {
            self.host.create_view(key, url)?;
            self.host.set_view_bounds(key, bounds);
            self.view_keys.push(key.to_string());
        }

        let target = previous
            .filter(|key| self.view_keys.iter().any(|k| k == key))
            .or_else(|| self.view_keys.first().cloned());
        if let Some(key) = target {
            self.switch_view(&key);
        }
        Ok(())
    }

    /// Detach the active view so the panel's settings overlay is readable
    pub fn conceal_active_view(&mut self) {
        if self.active_attached {
            if let Some(key) = &self.active_key {
                self.host.detach_view(key);
            }
            self.active_attached = false;
        }
    }

    /// Re-attach the view hidden by [`conceal_active_view`]
    ///
    /// [`conceal_active_view`]: Self::conceal_active_view
    pub fn reveal_active_view(&mut self) {
        if self.active_attached {
            return;
        }
        if let Some(key) = self.active_key.clone() {
            self.host.attach_view(&key);
            self.host
                .set_view_bounds(&key, content_bounds(self.host.window_size()));
            self.host.focus_view(&key);
            self.active_attached = true;
        }
    }

    /// Update the stored hotkey string after a successful rebind
    pub fn set_hotkey_combination(&mut self, combination: String) {
        self.settings.default_key_combination = combination;
        self.store.persist(&self.settings);
    }

    pub fn set_always_show_on_current_screen(&mut self, always: bool) {
        self.settings.always_show_on_current_screen = always;
        self.store.persist(&self.settings);
    }

    /// Restart the position-persist debounce; returns the new deadline
    pub fn on_moved(&mut self, now: Instant) -> Instant {
        self.persist.bump(now)
    }

    pub fn next_persist_deadline(&self) -> Option<Instant> {
        self.persist.deadline()
    }

    /// Write the settled window position back; true when a write happened
    pub fn poll_persist(&mut self, now: Instant) -> bool {
        if !self.persist.fire_due(now) {
            return false;
        }
        self.settings.window_position = Some(self.host.window_position());
        self.store.persist(&self.settings);
        true
    }
}
