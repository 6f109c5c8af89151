//! System tray icon with a minimal toggle/quit menu
//!
//! The tray is the only surface left when the panel is hidden, so it must
//! outlive the menu it owns; dropping the `TrayIcon` removes it.

use dockpane_core::{DockpaneError, DockpaneResult};
use tao::event_loop::EventLoopProxy;
use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{
    Icon, MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent,
};

use crate::{icon_rgba, UserEvent};

pub struct Tray {
    _tray: TrayIcon,
    toggle_id: MenuId,
    quit_id: MenuId,
}

impl Tray {
    pub fn build(proxy: EventLoopProxy<UserEvent>) -> DockpaneResult<Self> {
        let toggle = MenuItem::new("Toggle Dockpane", true, None);
        let quit = MenuItem::new("Quit Dockpane", true, None);

        let menu = Menu::new();
        menu.append_items(&[&toggle, &PredefinedMenuItem::separator(), &quit])
            .map_err(|e| DockpaneError::window(format!("Tray menu setup failed: {}", e)))?;

        const SIZE: u32 = 32;
        let icon = Icon::from_rgba(icon_rgba(SIZE), SIZE, SIZE)
            .map_err(|e| DockpaneError::window(format!("Tray icon invalid: {}", e)))?;

        let tray = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_tooltip("Dockpane")
            .with_icon(icon)
            .build()
            .map_err(|e| DockpaneError::window(format!("Tray setup failed: {}", e)))?;

        let menu_proxy = proxy.clone();
        MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
            let _ = menu_proxy.send_event(UserEvent::TrayMenu(event.id().clone()));
        }));

        // A plain left click on the icon toggles, same as the menu entry
        let toggle_id = toggle.id().clone();
        let click_id = toggle_id.clone();
        TrayIconEvent::set_event_handler(Some(move |event: TrayIconEvent| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                let _ = proxy.send_event(UserEvent::TrayMenu(click_id.clone()));
            }
        }));

        Ok(Self {
            _tray: tray,
            toggle_id,
            quit_id: quit.id().clone(),
        })
    }

    pub fn is_toggle(&self, id: &MenuId) -> bool {
        *id == self.toggle_id
    }

    pub fn is_quit(&self, id: &MenuId) -> bool {
        *id == self.quit_id
    }
}
