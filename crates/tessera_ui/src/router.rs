//! # Input Router
//!
//! Resolves, once per frame, which panel is under the cursor and which panel
//! holds focus, then turns the frame's raw input into [`UiEvent`]s.
//!
//! ## Focus state machine
//!
//! ```text
//!   Idle ──(left press)──► Resolving ──(hit)────► Focused
//!                              │
//!                              └──(no hit)──► Idle
//! ```
//!
//! - `LoseFocus` for the outgoing panel is always emitted before `GainFocus`
//!   for the incoming one.
//! - Once focused, every button, key and character event goes to the
//!   focused panel only. Nothing bubbles to ancestors.
//! - Events are queued in an outbox; nothing is called back mid-dispatch.
//!   Moving focus away from an open context menu posts its removal to the
//!   deferred queue.

use tessera_core::{DeferredQueue, PanelId, StringId};

use crate::input::{InputState, Key, Modifiers, MouseButton};
use crate::layout::Vec2;
use crate::scene::Scene;
use crate::ui::Ui;

/// What happened to a panel.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEventKind {
    /// The panel became the focused element.
    GainFocus,
    /// The panel stopped being the focused element.
    LoseFocus,
    /// A mouse button went down this frame.
    MouseJustPressed(MouseButton),
    /// A mouse button is held.
    MousePressed(MouseButton),
    /// A mouse button was released.
    MouseReleased(MouseButton),
    /// Left press and release on the panel within the click window.
    Click,
    /// The cursor moved.
    MouseMove(Vec2),
    /// A key went down this frame.
    KeyJustPressed(Key),
    /// A key is held.
    KeyPressed(Key),
    /// A key was released.
    KeyReleased(Key),
    /// A character was typed.
    CharacterEntered(char),
    /// A context menu row was clicked.
    MenuItemSelected {
        /// Row index.
        index: usize,
        /// Row caption.
        caption: String,
    },
}

/// An event addressed to one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct UiEvent {
    /// Panel the event is for.
    pub target: PanelId,
    /// Registry id of the panel, if registered.
    pub element: Option<StringId>,
    /// Modifier keys held when the event was routed.
    pub modifiers: Modifiers,
    /// What happened.
    pub kind: UiEventKind,
}

/// Current and previously focused panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusState {
    /// Panel receiving input.
    pub current: Option<PanelId>,
    /// Panel that held focus before `current`.
    pub previous: Option<PanelId>,
}

#[derive(Debug, Clone, Copy)]
struct ClickStart {
    panel: PanelId,
    at_ms: u64,
}

/// Everything the router reads for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RouteFrame<'a> {
    /// Frame time.
    pub now_ms: u64,
    /// Raw input for the frame.
    pub input: &'a InputState,
    /// Scene the panels live in.
    pub scene: &'a Scene,
    /// Top-level registered panels, front to back.
    pub top_level: &'a [PanelId],
    /// The modal panel, if one is registered.
    pub modal: Option<PanelId>,
    /// The open context menu, if any.
    pub menu: Option<PanelId>,
}

/// Finds the panel under `cursor`.
///
/// With a modal panel the search is confined to its subtree, whatever the
/// geometry or order of anything else. Otherwise `top_level` is scanned in
/// the given order (front to back) and the first root yielding a hit wins.
/// Within a root the deepest, front-most hittable panel is returned.
#[must_use]
pub fn resolve_hit_target(
    cursor: Vec2,
    top_level: &[PanelId],
    modal: Option<PanelId>,
    scene: &Scene,
) -> Option<PanelId> {
    if let Some(modal) = modal {
        return search(scene, modal, scene.parent_origin(modal), cursor);
    }

    top_level
        .iter()
        .find_map(|&root| search(scene, root, Vec2::ZERO, cursor))
}

fn search(scene: &Scene, id: PanelId, parent_origin: Vec2, cursor: Vec2) -> Option<PanelId> {
    let child_origin = {
        let panel = scene.get(id)?;
        if !panel.is_hittable() {
            return None;
        }
        let hit_box = panel.bounds().translate(parent_origin).inflate(panel.hit_padding);
        if !hit_box.contains(cursor) {
            return None;
        }
        parent_origin + panel.position - panel.translation
    };

    // Later children are drawn on top, so they are tested first.
    scene
        .children_of(id)
        .into_iter()
        .rev()
        .find_map(|child| search(scene, child, child_origin, cursor))
        .or(Some(id))
}

/// Per-frame focus, hover and click tracking.
#[derive(Debug, Clone)]
pub struct InputRouter {
    focus: FocusState,
    mouse_over: Option<PanelId>,
    tooltip_source: Option<PanelId>,
    click: Option<ClickStart>,
    click_window_ms: u64,
    modifiers: Modifiers,
}

impl InputRouter {
    /// Creates a router; a click must complete within `click_window_ms`.
    #[must_use]
    pub const fn new(click_window_ms: u64) -> Self {
        Self {
            focus: FocusState {
                current: None,
                previous: None,
            },
            mouse_over: None,
            tooltip_source: None,
            click: None,
            click_window_ms,
            modifiers: Modifiers {
                shift: false,
                ctrl: false,
                alt: false,
            },
        }
    }

    /// Focus bookkeeping.
    #[must_use]
    pub const fn focus(&self) -> FocusState {
        self.focus
    }

    /// Focused panel.
    #[must_use]
    pub const fn focused(&self) -> Option<PanelId> {
        self.focus.current
    }

    /// Panel under the cursor as of the last frame.
    #[must_use]
    pub const fn mouse_over(&self) -> Option<PanelId> {
        self.mouse_over
    }

    /// Panel whose tooltip is showing.
    #[must_use]
    pub const fn tooltip_source(&self) -> Option<PanelId> {
        self.tooltip_source
    }

    /// Drops focus without choosing a new target.
    ///
    /// The panel that had focus gets `LoseFocus` if it is still alive.
    /// Returns that panel.
    pub fn clear_focus(&mut self, scene: &Scene, outbox: &mut Vec<UiEvent>) -> Option<PanelId> {
        let previous = self.focus.current.take();
        if let Some(panel) = previous {
            self.focus.previous = previous;
            if scene.contains(panel) {
                self.push(scene, outbox, panel, UiEventKind::LoseFocus);
            }
        }
        self.click = None;
        previous
    }

    /// Forgets panels that died since the last frame.
    fn forget_dead(&mut self, scene: &Scene) {
        let alive = |id: &PanelId| scene.contains(*id);

        self.focus.current = self.focus.current.filter(alive);
        self.focus.previous = self.focus.previous.filter(alive);
        self.mouse_over = self.mouse_over.filter(alive);
        self.tooltip_source = self.tooltip_source.filter(alive);
        self.click = self.click.filter(|click| scene.contains(click.panel));
    }

    /// Routes one frame of input, appending events to `outbox`.
    pub fn route(
        &mut self,
        frame: &RouteFrame<'_>,
        outbox: &mut Vec<UiEvent>,
        deferred: &mut DeferredQueue<Ui>,
    ) {
        let scene = frame.scene;
        let input = frame.input;
        self.modifiers = input.modifiers;
        self.forget_dead(scene);

        let cursor = input.mouse_position();
        let hit = resolve_hit_target(cursor, frame.top_level, frame.modal, scene);
        self.mouse_over = hit;
        tracing::trace!(?hit, "hit test");

        if input.mouse_moved() {
            self.emit_mouse(scene, outbox, UiEventKind::MouseMove(cursor));
            self.track_tooltip_source(scene, hit);
        }

        for button in MouseButton::ALL {
            if !input.mouse_just_pressed(button) {
                continue;
            }
            if button == MouseButton::Left {
                self.change_focus(hit, scene, outbox);
                if frame.menu.is_some() && self.focus.current != frame.menu {
                    deferred.post(
                        |ui: &mut Ui, ()| {
                            ui.close_menu();
                        },
                        (),
                        frame.now_ms,
                        0,
                    );
                }
            }
            if self.emit_mouse(scene, outbox, UiEventKind::MouseJustPressed(button))
                && button == MouseButton::Left
            {
                self.click = self.focus.current.map(|panel| ClickStart {
                    panel,
                    at_ms: frame.now_ms,
                });
            }
        }

        for button in MouseButton::ALL {
            if input.mouse_down(button) {
                self.emit_mouse(scene, outbox, UiEventKind::MousePressed(button));
            }
        }

        for button in MouseButton::ALL {
            if !input.mouse_released(button) {
                continue;
            }
            if button == MouseButton::Left {
                self.finish_click(frame, outbox, deferred);
            }
            self.emit_mouse(scene, outbox, UiEventKind::MouseReleased(button));
        }

        for &key in input.keys_just_pressed() {
            self.emit_keyboard(scene, outbox, UiEventKind::KeyJustPressed(key));
        }
        for &key in input.keys_held() {
            self.emit_keyboard(scene, outbox, UiEventKind::KeyPressed(key));
        }
        for &key in input.keys_released() {
            self.emit_keyboard(scene, outbox, UiEventKind::KeyReleased(key));
        }
        for character in input.text_input().chars() {
            self.emit_keyboard(scene, outbox, UiEventKind::CharacterEntered(character));
        }
    }

    fn change_focus(&mut self, target: Option<PanelId>, scene: &Scene, outbox: &mut Vec<UiEvent>) {
        let outgoing = self.focus.current;
        if outgoing == target {
            return;
        }

        if let Some(previous) = outgoing {
            self.push(scene, outbox, previous, UiEventKind::LoseFocus);
            self.focus.previous = Some(previous);
        }
        self.focus.current = target;
        if let Some(current) = target {
            self.push(scene, outbox, current, UiEventKind::GainFocus);
        }
        tracing::trace!(?outgoing, incoming = ?target, "focus changed");
    }

    fn track_tooltip_source(&mut self, scene: &Scene, hit: Option<PanelId>) {
        match hit {
            None => self.tooltip_source = None,
            Some(id) => {
                if scene.get(id).is_some_and(|panel| panel.responds_to_tooltips()) {
                    self.tooltip_source = Some(id);
                }
            }
        }
    }

    fn finish_click(
        &mut self,
        frame: &RouteFrame<'_>,
        outbox: &mut Vec<UiEvent>,
        deferred: &mut DeferredQueue<Ui>,
    ) {
        let Some(start) = self.click.take() else {
            return;
        };
        let Some(focused) = self.focus.current else {
            return;
        };
        let in_window = frame.now_ms.saturating_sub(start.at_ms) < self.click_window_ms;
        if start.panel != focused || !in_window {
            return;
        }
        if !self.emit_mouse(frame.scene, outbox, UiEventKind::Click) {
            return;
        }

        if frame.menu == Some(focused) {
            let cursor = frame.input.mouse_position();
            let selected = frame.scene.absolute_position(focused).and_then(|origin| {
                let panel = frame.scene.get(focused)?;
                let menu = panel.kind().as_menu()?;
                let index = menu.item_at(cursor - origin)?;
                Some((index, menu.items[index].clone()))
            });

            if let Some((index, caption)) = selected {
                self.push(
                    frame.scene,
                    outbox,
                    focused,
                    UiEventKind::MenuItemSelected { index, caption },
                );
                deferred.post(
                    |ui: &mut Ui, ()| {
                        ui.close_menu();
                    },
                    (),
                    frame.now_ms,
                    0,
                );
            }
        }
    }

    /// Sends a mouse event to the focused panel if it takes mouse input.
    fn emit_mouse(&self, scene: &Scene, outbox: &mut Vec<UiEvent>, kind: UiEventKind) -> bool {
        self.emit_gated(scene, outbox, kind, |panel| panel.accepts_mouse())
    }

    /// Sends a keyboard event to the focused panel if it takes keyboard input.
    fn emit_keyboard(&self, scene: &Scene, outbox: &mut Vec<UiEvent>, kind: UiEventKind) -> bool {
        self.emit_gated(scene, outbox, kind, |panel| panel.accepts_keyboard())
    }

    fn emit_gated(
        &self,
        scene: &Scene,
        outbox: &mut Vec<UiEvent>,
        kind: UiEventKind,
        gate: impl Fn(&crate::panel::Panel) -> bool,
    ) -> bool {
        let Some(target) = self.focus.current else {
            return false;
        };
        let allowed = scene.get(target).is_some_and(|panel| gate(&panel));
        if allowed {
            self.push(scene, outbox, target, kind);
        }
        allowed
    }

    fn push(&self, scene: &Scene, outbox: &mut Vec<UiEvent>, target: PanelId, kind: UiEventKind) {
        let element = scene.get(target).and_then(|panel| panel.element_id());
        outbox.push(UiEvent {
            target,
            element,
            modifiers: self.modifiers,
            kind,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{Panel, PanelKind};
    use tessera_core::Handle;

    fn spawn(scene: &mut Scene, x: f32, y: f32, w: f32, h: f32) -> (PanelId, Handle<Panel>) {
        let handle = scene.create(PanelKind::Frame);
        let id = {
            let mut panel = handle.get_mut().unwrap();
            panel.position = Vec2::new(x, y);
            panel.size = Vec2::new(w, h);
            panel.id()
        };
        (id, handle)
    }

    #[test]
    fn test_front_most_root_wins() {
        let mut scene = Scene::new();
        let (back, _b) = spawn(&mut scene, 0.0, 0.0, 100.0, 100.0);
        let (front, _f) = spawn(&mut scene, 50.0, 50.0, 100.0, 100.0);

        let cursor = Vec2::new(75.0, 75.0);
        assert_eq!(resolve_hit_target(cursor, &[front, back], None, &scene), Some(front));
        assert_eq!(resolve_hit_target(cursor, &[back, front], None, &scene), Some(back));
    }

    #[test]
    fn test_deepest_child_wins() {
        let mut scene = Scene::new();
        let (root, _r) = spawn(&mut scene, 10.0, 10.0, 200.0, 200.0);
        let (child, _c) = spawn(&mut scene, 10.0, 10.0, 50.0, 50.0);
        let (grandchild, _g) = spawn(&mut scene, 5.0, 5.0, 10.0, 10.0);
        scene.attach(root, child).unwrap();
        scene.attach(child, grandchild).unwrap();

        // grandchild spans 25..35 in screen space
        assert_eq!(resolve_hit_target(Vec2::new(30.0, 30.0), &[root], None, &scene), Some(grandchild));
        assert_eq!(resolve_hit_target(Vec2::new(50.0, 50.0), &[root], None, &scene), Some(child));
        assert_eq!(resolve_hit_target(Vec2::new(150.0, 150.0), &[root], None, &scene), Some(root));
        assert_eq!(resolve_hit_target(Vec2::new(300.0, 300.0), &[root], None, &scene), None);
    }

    #[test]
    fn test_children_outside_parent_are_not_reached() {
        let mut scene = Scene::new();
        let (root, _r) = spawn(&mut scene, 0.0, 0.0, 50.0, 50.0);
        let (child, _c) = spawn(&mut scene, 60.0, 0.0, 50.0, 50.0);
        scene.attach(root, child).unwrap();

        assert_eq!(resolve_hit_target(Vec2::new(80.0, 10.0), &[root], None, &scene), None);
    }

    #[test]
    fn test_hit_padding_expands_box() {
        let mut scene = Scene::new();
        let (root, handle) = spawn(&mut scene, 10.0, 10.0, 10.0, 10.0);
        let cursor = Vec2::new(8.0, 15.0);

        assert_eq!(resolve_hit_target(cursor, &[root], None, &scene), None);
        handle.get_mut().unwrap().hit_padding = Vec2::new(4.0, 4.0);
        assert_eq!(resolve_hit_target(cursor, &[root], None, &scene), Some(root));
    }

    #[test]
    fn test_scroll_translation_shifts_children() {
        let mut scene = Scene::new();
        let (root, root_h) = spawn(&mut scene, 0.0, 0.0, 100.0, 100.0);
        let (child, _c) = spawn(&mut scene, 0.0, 40.0, 20.0, 20.0);
        scene.attach(root, child).unwrap();
        root_h.get_mut().unwrap().translation = Vec2::new(0.0, 30.0);

        assert_eq!(resolve_hit_target(Vec2::new(10.0, 15.0), &[root], None, &scene), Some(child));
        assert_eq!(resolve_hit_target(Vec2::new(10.0, 45.0), &[root], None, &scene), Some(root));
    }

    #[test]
    fn test_hidden_disabled_and_mouseless_are_skipped() {
        let mut scene = Scene::new();
        let (back, _b) = spawn(&mut scene, 0.0, 0.0, 100.0, 100.0);
        let (front, front_h) = spawn(&mut scene, 0.0, 0.0, 100.0, 100.0);
        let cursor = Vec2::new(50.0, 50.0);

        front_h.get_mut().unwrap().set_visible(false);
        assert_eq!(resolve_hit_target(cursor, &[front, back], None, &scene), Some(back));

        front_h.get_mut().unwrap().set_visible(true);
        front_h.get_mut().unwrap().set_enabled(false);
        assert_eq!(resolve_hit_target(cursor, &[front, back], None, &scene), Some(back));

        front_h.get_mut().unwrap().set_enabled(true);
        front_h.get_mut().unwrap().set_mouse_input(false);
        assert_eq!(resolve_hit_target(cursor, &[front, back], None, &scene), Some(back));
    }

    #[test]
    fn test_modal_confines_search() {
        let mut scene = Scene::new();
        let (front, _f) = spawn(&mut scene, 0.0, 0.0, 100.0, 100.0);
        let (modal, _m) = spawn(&mut scene, 200.0, 200.0, 50.0, 50.0);

        let outside = Vec2::new(50.0, 50.0);
        let inside = Vec2::new(210.0, 210.0);
        assert_eq!(resolve_hit_target(outside, &[front, modal], Some(modal), &scene), None);
        assert_eq!(resolve_hit_target(inside, &[front, modal], Some(modal), &scene), Some(modal));
    }

    fn route(
        router: &mut InputRouter,
        scene: &Scene,
        top_level: &[PanelId],
        input: &InputState,
        now_ms: u64,
    ) -> Vec<UiEvent> {
        let mut outbox = Vec::new();
        let mut deferred = DeferredQueue::new();
        let frame = RouteFrame {
            now_ms,
            input,
            scene,
            top_level,
            modal: None,
            menu: None,
        };
        router.route(&frame, &mut outbox, &mut deferred);
        outbox
    }

    fn kinds(events: &[UiEvent]) -> Vec<(PanelId, UiEventKind)> {
        events.iter().map(|e| (e.target, e.kind.clone())).collect()
    }

    #[test]
    fn test_lose_focus_precedes_gain_focus() {
        let mut scene = Scene::new();
        let (a, _a) = spawn(&mut scene, 0.0, 0.0, 10.0, 10.0);
        let (b, _b) = spawn(&mut scene, 20.0, 0.0, 10.0, 10.0);
        let mut router = InputRouter::new(500);
        let mut input = InputState::new();

        input.set_mouse_pos(5.0, 5.0);
        input.mouse_button_down(MouseButton::Left);
        route(&mut router, &scene, &[b, a], &input, 0);
        assert_eq!(router.focused(), Some(a));

        input.begin_frame();
        input.mouse_button_up(MouseButton::Left);
        input.begin_frame();
        input.set_mouse_pos(25.0, 5.0);
        input.mouse_button_down(MouseButton::Left);
        let events = route(&mut router, &scene, &[b, a], &input, 100);

        let focus: Vec<_> = kinds(&events)
            .into_iter()
            .filter(|(_, k)| matches!(k, UiEventKind::LoseFocus | UiEventKind::GainFocus))
            .collect();
        assert_eq!(focus, vec![(a, UiEventKind::LoseFocus), (b, UiEventKind::GainFocus)]);
        assert_eq!(router.focus().previous, Some(a));
    }

    #[test]
    fn test_press_on_nothing_clears_focus() {
        let mut scene = Scene::new();
        let (a, _a) = spawn(&mut scene, 0.0, 0.0, 10.0, 10.0);
        let mut router = InputRouter::new(500);
        let mut input = InputState::new();

        input.set_mouse_pos(5.0, 5.0);
        input.mouse_button_down(MouseButton::Left);
        route(&mut router, &scene, &[a], &input, 0);

        input.mouse_button_up(MouseButton::Left);
        input.begin_frame();
        input.set_mouse_pos(500.0, 500.0);
        input.mouse_button_down(MouseButton::Left);
        let events = route(&mut router, &scene, &[a], &input, 50);

        assert_eq!(router.focused(), None);
        let focus: Vec<_> = kinds(&events)
            .into_iter()
            .filter(|(_, k)| matches!(k, UiEventKind::LoseFocus | UiEventKind::GainFocus))
            .collect();
        assert_eq!(focus, vec![(a, UiEventKind::LoseFocus)]);
    }

    #[test]
    fn test_click_requires_release_within_window() {
        let mut scene = Scene::new();
        let (a, _a) = spawn(&mut scene, 0.0, 0.0, 10.0, 10.0);
        let mut router = InputRouter::new(500);
        let mut input = InputState::new();
        input.set_mouse_pos(5.0, 5.0);

        input.mouse_button_down(MouseButton::Left);
        route(&mut router, &scene, &[a], &input, 1_000);
        input.begin_frame();
        input.mouse_button_up(MouseButton::Left);
        let quick = route(&mut router, &scene, &[a], &input, 1_200);
        assert!(quick.iter().any(|e| e.kind == UiEventKind::Click));

        input.begin_frame();
        input.mouse_button_down(MouseButton::Left);
        route(&mut router, &scene, &[a], &input, 2_000);
        input.begin_frame();
        input.mouse_button_up(MouseButton::Left);
        let slow = route(&mut router, &scene, &[a], &input, 2_600);
        assert!(!slow.iter().any(|e| e.kind == UiEventKind::Click));
        assert!(slow.iter().any(|e| e.kind == UiEventKind::MouseReleased(MouseButton::Left)));
    }

    #[test]
    fn test_keyboard_goes_to_focused_only() {
        let mut scene = Scene::new();
        let (parent, _p) = spawn(&mut scene, 0.0, 0.0, 100.0, 100.0);
        let (child, _c) = spawn(&mut scene, 10.0, 10.0, 10.0, 10.0);
        scene.attach(parent, child).unwrap();
        let mut router = InputRouter::new(500);
        let mut input = InputState::new();

        input.set_mouse_pos(15.0, 15.0);
        input.mouse_button_down(MouseButton::Left);
        route(&mut router, &scene, &[parent], &input, 0);

        input.begin_frame();
        input.key_down(Key::Enter);
        input.text("hi");
        let events = route(&mut router, &scene, &[parent], &input, 10);

        assert!(events.iter().all(|e| e.target == child));
        assert!(events.iter().any(|e| e.kind == UiEventKind::KeyJustPressed(Key::Enter)));
        assert!(events.iter().any(|e| e.kind == UiEventKind::CharacterEntered('i')));
    }

    #[test]
    fn test_keyboard_gate() {
        let mut scene = Scene::new();
        let (a, handle) = spawn(&mut scene, 0.0, 0.0, 10.0, 10.0);
        let mut router = InputRouter::new(500);
        let mut input = InputState::new();
        input.set_mouse_pos(5.0, 5.0);
        input.mouse_button_down(MouseButton::Left);
        route(&mut router, &scene, &[a], &input, 0);

        handle.get_mut().unwrap().set_keyboard_input(false);
        input.begin_frame();
        input.key_down(Key::Tab);
        let events = route(&mut router, &scene, &[a], &input, 10);

        assert!(!events.iter().any(|e| matches!(e.kind, UiEventKind::KeyJustPressed(_))));
        assert!(events.iter().any(|e| e.kind == UiEventKind::MousePressed(MouseButton::Left)));
    }

    #[test]
    fn test_key_events_carry_modifiers() {
        let mut scene = Scene::new();
        let (a, _a) = spawn(&mut scene, 0.0, 0.0, 10.0, 10.0);
        let mut router = InputRouter::new(500);
        let mut input = InputState::new();
        input.set_mouse_pos(5.0, 5.0);
        input.mouse_button_down(MouseButton::Left);
        let events = route(&mut router, &scene, &[a], &input, 0);
        assert!(events.iter().all(|e| !e.modifiers.shift));

        input.begin_frame();
        input.modifiers.shift = true;
        input.key_down(Key::Tab);
        let events = route(&mut router, &scene, &[a], &input, 10);

        let tab = events
            .iter()
            .find(|e| e.kind == UiEventKind::KeyJustPressed(Key::Tab))
            .unwrap();
        assert!(tab.modifiers.shift);
        assert!(!tab.modifiers.ctrl);
    }

    #[test]
    fn test_clear_focus_emits_lose_focus() {
        let mut scene = Scene::new();
        let (a, _a) = spawn(&mut scene, 0.0, 0.0, 10.0, 10.0);
        let mut router = InputRouter::new(500);
        let mut input = InputState::new();
        input.set_mouse_pos(5.0, 5.0);
        input.mouse_button_down(MouseButton::Left);
        route(&mut router, &scene, &[a], &input, 0);

        let mut outbox = Vec::new();
        assert_eq!(router.clear_focus(&scene, &mut outbox), Some(a));
        assert_eq!(kinds(&outbox), vec![(a, UiEventKind::LoseFocus)]);
        assert_eq!(router.focused(), None);

        outbox.clear();
        assert_eq!(router.clear_focus(&scene, &mut outbox), None);
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_tooltip_source_rules() {
        let mut scene = Scene::new();
        let (tipped, tipped_h) = spawn(&mut scene, 0.0, 0.0, 10.0, 10.0);
        let (plain, _p) = spawn(&mut scene, 20.0, 0.0, 10.0, 10.0);
        tipped_h.get_mut().unwrap().set_tooltip("Help");
        let top = [plain, tipped];
        let mut router = InputRouter::new(500);
        let mut input = InputState::new();

        input.set_mouse_pos(5.0, 5.0);
        route(&mut router, &scene, &top, &input, 0);
        assert_eq!(router.tooltip_source(), Some(tipped));

        input.begin_frame();
        input.set_mouse_pos(25.0, 5.0);
        route(&mut router, &scene, &top, &input, 10);
        assert_eq!(router.tooltip_source(), Some(tipped), "non-responding hit keeps the source");
        assert_eq!(router.mouse_over(), Some(plain));

        input.begin_frame();
        input.set_mouse_pos(500.0, 5.0);
        route(&mut router, &scene, &top, &input, 20);
        assert_eq!(router.tooltip_source(), None);
    }

    #[test]
    fn test_dead_focus_is_forgotten() {
        let mut scene = Scene::new();
        let (a, handle) = spawn(&mut scene, 0.0, 0.0, 10.0, 10.0);
        let mut router = InputRouter::new(500);
        let mut input = InputState::new();
        input.set_mouse_pos(5.0, 5.0);
        input.mouse_button_down(MouseButton::Left);
        route(&mut router, &scene, &[a], &input, 0);

        drop(handle);
        input.begin_frame();
        let events = route(&mut router, &scene, &[a], &input, 10);

        assert_eq!(router.focused(), None);
        assert!(events.is_empty());
    }
}
