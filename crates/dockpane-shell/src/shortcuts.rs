//! Global and focus-scoped shortcut routing
//!
//! Two scopes: the global scope holds exactly one binding (toggle
//! visibility) for the lifetime of the process; the focus scope holds
//! reload and view-switch bindings only while the shell window has input
//! focus. Focus bindings must never outlive focus, otherwise the process
//! would keep capturing keys from other applications.

use crate::hotkey::Combo;
use dockpane_core::DockpaneResult;

/// What a registered shortcut does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Toggle shell window visibility (the only global-scope action)
    ToggleWindow,
    /// Reload the active content view
    Reload,
    /// Reload the active content view bypassing caches
    HardReload,
    /// Swallow the platform close-window chord while focused
    SwallowClose,
    /// Switch to the view at this ordinal position (0-based)
    SwitchView(usize),
}

/// Registration backend for shortcut combinations
///
/// The app implements this over the OS global-hotkey facility; tests use a
/// recording fake. `register` returns the stable id the firing events carry.
pub trait HotkeyBackend {
    fn register(&mut self, combo: &Combo) -> DockpaneResult<u32>;
    fn unregister(&mut self, combo: &Combo);
}

pub struct ShortcutRouter<B: HotkeyBackend> {
    backend: B,
    global: Option<(Combo, u32)>,
    focus_bindings: Vec<(Combo, u32, ShortcutAction)>,
    view_count: usize,
    focused: bool,
}

impl<B: HotkeyBackend> ShortcutRouter<B> {
    pub fn new(backend: B, view_count: usize) -> Self {
        Self {
            backend,
            global: None,
            focus_bindings: Vec::new(),
            view_count,
            focused: false,
        }
    }

    /// Bind the global toggle combination, replacing any previous one
    ///
    /// Ordering matters: the old combination is unregistered before the new
    /// one is registered, so the two are never live at the same time. If
    /// the new registration fails the old combination is restored, leaving
    /// exactly one binding either way.
    pub fn bind_global(&mut self, combo: Combo) -> DockpaneResult<()> {
        let previous = self.global.take();
        if let Some((old, _)) = &previous {
            self.backend.unregister(old);
        }

        match self.backend.register(&combo) {
            Ok(id) => {
                self.global = Some((combo, id));
                Ok(())
            }
            Err(err) => {
                log::warn!("Failed to register '{}': {}", combo, err);
                if let Some((old, _)) = previous {
                    if let Ok(id) = self.backend.register(&old) {
                        self.global = Some((old, id));
                    }
                }
                Err(err)
            }
        }
    }

    pub fn global_combo(&self) -> Option<&Combo> {
        self.global.as_ref().map(|(combo, _)| combo)
    }

    /// Register the focus scope; idempotent while focus is held
    pub fn on_focus_gained(&mut self) {
        if self.focused {
            return;
        }
        self.focused = true;

        let mut wanted: Vec<(Combo, ShortcutAction)> = vec![
            (Combo::primary_char('R'), ShortcutAction::Reload),
            (
                Combo::primary_char('R').with_shift(),
                ShortcutAction::HardReload,
            ),
            (Combo::function(5), ShortcutAction::HardReload),
            (Combo::primary_char('W'), ShortcutAction::SwallowClose),
        ];
        // Ordinal switch bindings, one per configured view, capped at 1..9
        for index in 0..self.view_count.min(9) {
            let digit = char::from(b'1' + index as u8);
            wanted.push((Combo::primary_char(digit), ShortcutAction::SwitchView(index)));
        }

        for (combo, action) in wanted {
            match self.backend.register(&combo) {
                Ok(id) => self.focus_bindings.push((combo, id, action)),
                Err(err) => log::warn!("Failed to register focus binding '{}': {}", combo, err),
            }
        }
    }

    /// Drop every focus-scope binding; idempotent while unfocused
    pub fn on_focus_lost(&mut self) {
        self.focused = false;
        for (combo, _, _) in self.focus_bindings.drain(..) {
            self.backend.unregister(&combo);
        }
    }

    /// Update the number of view-switch bindings after a reconfiguration
    pub fn set_view_count(&mut self, view_count: usize) {
        if self.view_count == view_count {
            return;
        }
        self.view_count = view_count;
        if self.focused {
            self.on_focus_lost();
            self.on_focus_gained();
        }
    }

    pub fn has_focus_bindings(&self) -> bool {
        !self.focus_bindings.is_empty()
    }

    /// Resolve a fired binding id to its action
    pub fn lookup(&self, id: u32) -> Option<ShortcutAction> {
        if let Some((_, global_id)) = &self.global {
            if *global_id == id {
                return Some(ShortcutAction::ToggleWindow);
            }
        }
        self.focus_bindings
            .iter()
            .find(|(_, binding_id, _)| *binding_id == id)
            .map(|(_, _, action)| *action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockpane_core::DockpaneError;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    /// Backend fake that tracks live registrations and the high-water mark
    /// of simultaneously-registered global candidates
    #[derive(Default)]
    struct FakeState {
        live: HashSet<Combo>,
        next_id: u32,
        ids: Vec<(Combo, u32)>,
        fail_on: Option<Combo>,
    }

    #[derive(Clone, Default)]
    struct FakeBackend(Rc<RefCell<FakeState>>);

    impl FakeBackend {
        fn live_count(&self) -> usize {
            self.0.borrow().live.len()
        }

        fn is_live(&self, combo: &Combo) -> bool {
            self.0.borrow().live.contains(combo)
        }

        fn fail_on(&self, combo: Combo) {
            self.0.borrow_mut().fail_on = Some(combo);
        }
    }

    impl HotkeyBackend for FakeBackend {
        fn register(&mut self, combo: &Combo) -> DockpaneResult<u32> {
            let mut state = self.0.borrow_mut();
            if state.fail_on.as_ref() == Some(combo) {
                return Err(DockpaneError::hotkey("registration refused"));
            }
            assert!(
                state.live.insert(*combo),
                "combo '{}' registered twice",
                combo
            );
            state.next_id += 1;
            let id = state.next_id;
            state.ids.push((*combo, id));
            Ok(id)
        }

        fn unregister(&mut self, combo: &Combo) {
            let mut state = self.0.borrow_mut();
            assert!(
                state.live.remove(combo),
                "combo '{}' unregistered while not live",
                combo
            );
        }
    }

    fn router(view_count: usize) -> (ShortcutRouter<FakeBackend>, FakeBackend) {
        let backend = FakeBackend::default();
        (ShortcutRouter::new(backend.clone(), view_count), backend)
    }

    #[test]
    fn test_rapid_rebinds_leave_exactly_one_global() {
        let (mut router, backend) = router(5);

        for input in ["Cmd+E", "Cmd+K", "Ctrl+Shift+1", "Cmd+E", "Alt+Space2"] {
            if let Ok(combo) = Combo::parse(input) {
                let _ = router.bind_global(combo);
            }
        }

        // The fake asserts no combo was ever double-registered; here we
        // check the settled state: exactly the most recent binding.
        assert_eq!(backend.live_count(), 1);
        assert!(backend.is_live(&Combo::parse("Cmd+E").unwrap()));
        assert_eq!(
            router.global_combo(),
            Some(&Combo::parse("Cmd+E").unwrap())
        );
    }

    #[test]
    fn test_failed_rebind_restores_previous() {
        let (mut router, backend) = router(5);
        router.bind_global(Combo::parse("Cmd+E").unwrap()).unwrap();

        let rejected = Combo::parse("Cmd+J").unwrap();
        backend.fail_on(rejected);
        assert!(router.bind_global(rejected).is_err());

        assert_eq!(backend.live_count(), 1);
        assert!(backend.is_live(&Combo::parse("Cmd+E").unwrap()));
    }

    #[test]
    fn test_focus_scope_registers_and_clears() {
        let (mut router, backend) = router(3);
        router.bind_global(Combo::parse("Cmd+E").unwrap()).unwrap();

        router.on_focus_gained();
        // reload, hard reload, F5, close swallow, plus one per view
        assert_eq!(backend.live_count(), 1 + 4 + 3);
        assert!(backend.is_live(&Combo::primary_char('2')));

        router.on_focus_lost();
        assert_eq!(backend.live_count(), 1);
        assert!(!router.has_focus_bindings());
    }

    #[test]
    fn test_focus_transitions_are_idempotent() {
        let (mut router, backend) = router(2);
        router.on_focus_gained();
        router.on_focus_gained();
        assert_eq!(backend.live_count(), 4 + 2);

        router.on_focus_lost();
        router.on_focus_lost();
        assert_eq!(backend.live_count(), 0);
    }

    #[test]
    fn test_lookup_resolves_ids() {
        let (mut router, backend) = router(2);
        router.bind_global(Combo::parse("Cmd+E").unwrap()).unwrap();
        router.on_focus_gained();

        let ids = backend.0.borrow().ids.clone();
        let find = |combo: Combo| ids.iter().find(|(c, _)| *c == combo).unwrap().1;

        assert_eq!(
            router.lookup(find(Combo::parse("Cmd+E").unwrap())),
            Some(ShortcutAction::ToggleWindow)
        );
        assert_eq!(
            router.lookup(find(Combo::primary_char('1'))),
            Some(ShortcutAction::SwitchView(0))
        );
        assert_eq!(
            router.lookup(find(Combo::function(5))),
            Some(ShortcutAction::HardReload)
        );
        assert_eq!(router.lookup(9999), None);
    }

    #[test]
    fn test_lookup_misses_after_blur() {
        let (mut router, backend) = router(1);
        router.on_focus_gained();
        let ids = backend.0.borrow().ids.clone();
        router.on_focus_lost();

        for (_, id) in ids {
            assert_eq!(router.lookup(id), None);
        }
    }

    #[test]
    fn test_view_count_change_rebinds_while_focused() {
        let (mut router, backend) = router(5);
        router.on_focus_gained();
        assert!(backend.is_live(&Combo::primary_char('5')));

        router.set_view_count(2);
        assert!(!backend.is_live(&Combo::primary_char('5')));
        assert!(backend.is_live(&Combo::primary_char('2')));
    }

    #[test]
    fn test_ordinals_cap_at_nine() {
        let (mut router, backend) = router(12);
        router.on_focus_gained();
        assert!(backend.is_live(&Combo::primary_char('9')));
        // 4 fixed + 9 ordinals
        assert_eq!(backend.live_count(), 13);
        router.on_focus_lost();
    }
}
