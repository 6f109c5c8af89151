//! Dockpane - Main Application Entry Point
//!
//! A frameless panel window summoned by a global shortcut. The window hosts
//! one full-size webview for the control bar plus one child webview per
//! configured page; switching pages toggles child visibility so page state
//! is never lost.

mod host;
mod hotkeys;
mod ipc;
mod platform;
mod tray;
mod update;

use std::time::Instant;

use dockpane_core::geometry::SizePreset;
use dockpane_core::settings::{settings_path, UrlMap};
use dockpane_core::Settings;
use dockpane_shell::hotkey::Combo;
use dockpane_shell::shortcuts::{ShortcutAction, ShortcutRouter};
use dockpane_shell::ViewLifecycleManager;
use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use tao::dpi::LogicalSize;
use tao::event::{Event, StartCause, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tao::window::{Icon, WindowBuilder};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use tray_icon::menu::MenuId;
use wry::WebViewBuilder;

use host::{JsonSettingsStore, PanelHost};
use hotkeys::GlobalHotkeyBackend;
use ipc::{PanelMessage, JS_BRIDGE};
use update::UpdateInfo;

/// The HTML content for the control bar and settings overlay
const PANEL_HTML: &str = include_str!("ui/panel.html");
/// Script injected into every content view before its page runs
const CONTENT_INIT: &str = include_str!("ui/content_init.js");

/// User events delivered to the event loop from handlers and threads
#[derive(Debug, Clone)]
pub enum UserEvent {
    Panel(PanelMessage),
    Hotkey(u32),
    TrayMenu(MenuId),
    UpdateAvailable(UpdateInfo),
}

/// Procedural app icon: a purple gradient tile with a bright stripe
pub fn icon_rgba(size: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let ratio = x as f32 / (size as f32 - 1.0);
            let mut r = 96.0 + 54.0 * ratio;
            let mut g = 60.0 + 30.0 * ratio;
            let mut b = 220.0 + 20.0 * ratio;
            let in_stripe = y > size / 3 && y < size * 2 / 3;
            if in_stripe {
                r = (r * 1.25).min(255.0);
                g = (g * 1.25).min(255.0);
                b = (b * 1.1).min(255.0);
            } else {
                r *= 0.7;
                g *= 0.7;
                b *= 0.78;
            }
            data.push(r as u8);
            data.push(g as u8);
            data.push(b as u8);
            data.push(255);
        }
    }
    data
}

fn create_window_icon() -> Option<Icon> {
    const SIZE: u32 = 32;
    Icon::from_rgba(icon_rgba(SIZE), SIZE, SIZE).ok()
}

/// Text-editing shortcuts on macOS only work with a native Edit menu
#[cfg(target_os = "macos")]
fn init_edit_menu() {
    use muda::{Menu, PredefinedMenuItem, Submenu};

    let menu = Menu::new();
    let edit = Submenu::new("Edit", true);
    let appended = edit
        .append_items(&[
            &PredefinedMenuItem::undo(None),
            &PredefinedMenuItem::redo(None),
            &PredefinedMenuItem::separator(),
            &PredefinedMenuItem::cut(None),
            &PredefinedMenuItem::copy(None),
            &PredefinedMenuItem::paste(None),
            &PredefinedMenuItem::select_all(None),
        ])
        .and_then(|_| menu.append(&edit));
    if let Err(e) = appended {
        warn!("Edit menu setup failed: {}", e);
    }
    menu.init_for_nsapp();
}

fn main() {
    // Initialize logging with log compatibility
    tracing_log::LogTracer::init().expect("Failed to set log tracer");
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    std::panic::set_hook(Box::new(|info| {
        let message = info.to_string();
        error!("Fatal: {}", message);
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title("Dockpane crashed")
            .set_description(message.as_str())
            .show();
    }));

    info!("Starting Dockpane {}...", env!("CARGO_PKG_VERSION"));

    let settings_file = settings_path();
    let settings = Settings::load(&settings_file);
    info!(
        "Loaded settings: {} pages, size '{}'",
        settings.urls.len(),
        settings.window_size_key.as_str()
    );

    #[cfg_attr(not(target_os = "macos"), allow(unused_mut))]
    let mut event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();

    // No dock presence; the panel lives behind its shortcut and the tray
    #[cfg(target_os = "macos")]
    {
        use tao::platform::macos::{ActivationPolicy, EventLoopExtMacOS};
        event_loop.set_activation_policy(ActivationPolicy::Accessory);
    }

    #[cfg(target_os = "macos")]
    init_edit_menu();

    let mut window_builder = WindowBuilder::new()
        .with_title("Dockpane")
        .with_inner_size(LogicalSize::new(
            settings.window_size.width,
            settings.window_size.height,
        ))
        .with_decorations(false)
        .with_resizable(false)
        .with_visible(false);
    if let Some(icon) = create_window_icon() {
        window_builder = window_builder.with_window_icon(Some(icon));
    }
    #[cfg(target_os = "windows")]
    let window_builder = {
        use tao::platform::windows::WindowBuilderExtWindows;
        window_builder.with_skip_taskbar(true)
    };
    let window = window_builder
        .build(&event_loop)
        .expect("Failed to create window");
    let main_window_id = window.id();

    // Panel webview covers the whole window; the bar is its top 50px and
    // the settings overlay uses the rest when content views are concealed.
    let panel_proxy = proxy.clone();
    let panel = WebViewBuilder::new()
        .with_html(PANEL_HTML)
        .with_devtools(cfg!(debug_assertions))
        .with_initialization_script(JS_BRIDGE)
        .with_ipc_handler(move |message| {
            let body = message.body();
            match serde_json::from_str::<PanelMessage>(body) {
                Ok(msg) => {
                    let _ = panel_proxy.send_event(UserEvent::Panel(msg));
                }
                Err(e) => warn!("Unparseable panel message {}: {}", body, e),
            }
        })
        .build_as_child(&window)
        .expect("Failed to create panel webview");

    let host = PanelHost::new(window, panel, CONTENT_INIT.to_string(), proxy.clone());
    let store = JsonSettingsStore::new(settings_file);
    let mut manager = match ViewLifecycleManager::new(host, store, settings) {
        Ok(manager) => manager,
        Err(e) => {
            error!("Failed to build content views: {}", e);
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title("Dockpane")
                .set_description(format!("Could not start: {}", e))
                .show();
            return;
        }
    };
    manager.host().fit_panel(manager.settings().window_size);

    let backend = match GlobalHotkeyBackend::new() {
        Ok(backend) => backend,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };
    let mut router = ShortcutRouter::new(backend, manager.urls().len());

    let hotkey_proxy = proxy.clone();
    GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
        if event.state == HotKeyState::Pressed {
            let _ = hotkey_proxy.send_event(UserEvent::Hotkey(event.id));
        }
    }));

    let stored_combo = manager.settings().default_key_combination.clone();
    let combo = Combo::parse(&stored_combo).unwrap_or_else(|e| {
        warn!("Stored combination '{}' rejected: {}", stored_combo, e);
        Combo::primary_char('E')
    });
    if let Err(e) = router.bind_global(combo) {
        error!("Global shortcut unavailable: {}", e);
    }

    let tray = match tray::Tray::build(proxy.clone()) {
        Ok(tray) => Some(tray),
        Err(e) => {
            warn!("{}", e);
            None
        }
    };

    update::spawn(proxy);

    // First launch lands with the panel open
    manager.show(Instant::now());

    event_loop.run(move |event, _window_target, control_flow| {
        match event {
            Event::NewEvents(StartCause::ResumeTimeReached { .. }) => {
                if manager.poll_persist(Instant::now()) {
                    debug!("Window position persisted");
                }
            }

            Event::WindowEvent {
                window_id, event, ..
            } if window_id == main_window_id => match event {
                WindowEvent::CloseRequested => manager.hide(),
                WindowEvent::Focused(true) => router.on_focus_gained(),
                WindowEvent::Focused(false) => {
                    router.on_focus_lost();
                    manager.on_blur();
                }
                WindowEvent::Moved(_) => {
                    if manager.is_visible() {
                        manager.on_moved(Instant::now());
                    }
                }
                WindowEvent::Resized(_) => {
                    let size = manager.host().window_size();
                    manager.host().fit_panel(size);
                }
                _ => {}
            },

            Event::UserEvent(UserEvent::Hotkey(id)) => match router.lookup(id) {
                Some(ShortcutAction::ToggleWindow) => manager.toggle(Instant::now()),
                Some(ShortcutAction::Reload) => {
                    if let Some(key) = manager.active_key().map(str::to_string) {
                        manager.host().reload_view(&key, false);
                    }
                }
                Some(ShortcutAction::HardReload) => {
                    if let Some(key) = manager.active_key().map(str::to_string) {
                        manager.host().reload_view(&key, true);
                    }
                }
                Some(ShortcutAction::SwitchView(index)) => {
                    manager.switch_view_at(index);
                    manager
                        .host()
                        .eval_panel(&ipc::active_view_script(manager.active_key()));
                }
                Some(ShortcutAction::SwallowClose) => debug!("Swallowed close shortcut"),
                None => debug!("Stale hotkey id {}", id),
            },

            Event::UserEvent(UserEvent::Panel(msg)) => {
                handle_panel_message(&mut manager, &mut router, msg, control_flow);
            }

            Event::UserEvent(UserEvent::TrayMenu(id)) => {
                if let Some(tray) = &tray {
                    if tray.is_toggle(&id) {
                        manager.toggle(Instant::now());
                    } else if tray.is_quit(&id) {
                        quit(&mut manager, control_flow);
                    }
                }
            }

            Event::UserEvent(UserEvent::UpdateAvailable(info)) => {
                let wanted = rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Info)
                    .set_title("Update available")
                    .set_description(format!(
                        "Dockpane {} is available. Download it now?",
                        info.name
                    ))
                    .set_buttons(rfd::MessageButtons::YesNo)
                    .show();
                if wanted == rfd::MessageDialogResult::Yes {
                    if let Err(e) = platform::open_external(&info.url) {
                        error!("{}", e);
                    }
                }
            }

            _ => {}
        }

        if *control_flow == ControlFlow::Exit {
            return;
        }
        *control_flow = match manager.next_persist_deadline() {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        };
    });
}

type Manager = ViewLifecycleManager<PanelHost, JsonSettingsStore>;
type Router = ShortcutRouter<GlobalHotkeyBackend>;

fn handle_panel_message(
    manager: &mut Manager,
    router: &mut Router,
    msg: PanelMessage,
    control_flow: &mut ControlFlow,
) {
    match msg {
        PanelMessage::PanelReady => push_config(manager),

        PanelMessage::SwitchView { key } => {
            manager.switch_view(&key);
            manager
                .host()
                .eval_panel(&ipc::active_view_script(manager.active_key()));
        }
        PanelMessage::Back => eval_active(manager, "history.back();"),
        PanelMessage::Forward => eval_active(manager, "history.forward();"),
        PanelMessage::Refresh => {
            if let Some(key) = manager.active_key().map(str::to_string) {
                manager.host().reload_view(&key, false);
            }
        }

        PanelMessage::GetUrls => {
            manager.host().eval_panel(&ipc::urls_script(manager.urls()));
        }
        PanelMessage::UpdateUrls { urls } => {
            let map: UrlMap = urls.into_iter().collect();
            if map.is_empty() {
                warn!("Rejecting empty page list");
                return;
            }
            if let Err(e) = manager.rebuild_views(map) {
                error!("Rebuilding views failed: {}", e);
            }
            router.set_view_count(manager.urls().len());
            push_config(manager);
        }

        PanelMessage::SetHotkey { combo } => match Combo::parse(&combo) {
            Ok(parsed) => match router.bind_global(parsed) {
                Ok(()) => {
                    manager.set_hotkey_combination(parsed.to_string());
                    push_config(manager);
                }
                Err(e) => {
                    manager
                        .host()
                        .eval_panel(&ipc::hotkey_error_script(&e.to_string()));
                }
            },
            Err(e) => {
                manager
                    .host()
                    .eval_panel(&ipc::hotkey_error_script(&e.to_string()));
            }
        },

        PanelMessage::SetWindowSize { size_key } => match SizePreset::from_key(&size_key) {
            Some(preset) => manager.apply_size(preset, Instant::now()),
            None => warn!("Unknown size preset '{}'", size_key),
        },
        PanelMessage::SetAlwaysShowOnCurrentScreen { value } => {
            manager.set_always_show_on_current_screen(value);
        }
        PanelMessage::TogglePin { pinned } => manager.set_pinned(pinned),

        PanelMessage::HideBrowserView => manager.conceal_active_view(),
        PanelMessage::ShowBrowserView => manager.reveal_active_view(),

        PanelMessage::Quit => quit(manager, control_flow),

        PanelMessage::Log { level, message } => match level.as_str() {
            "error" => error!("panel: {}", message),
            "warn" => warn!("panel: {}", message),
            _ => info!("panel: {}", message),
        },
    }
}

fn push_config(manager: &Manager) {
    manager.host().eval_panel(&ipc::config_script(
        manager.settings(),
        manager.active_key(),
        manager.is_pinned(),
    ));
}

fn eval_active(manager: &Manager, script: &str) {
    if let Some(key) = manager.active_key() {
        manager.host().eval_view(key, script);
    }
}

fn quit(manager: &mut Manager, control_flow: &mut ControlFlow) {
    info!("Quitting");
    if manager.is_visible() {
        manager.hide();
    }
    *control_flow = ControlFlow::Exit;
}
