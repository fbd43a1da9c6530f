//! # UI Context
//!
//! [`Ui`] owns one scene and everything that acts on it: the registry, the
//! input router, the deferred queue, the tooltip and the event outbox.
//! Several `Ui`s can live side by side; nothing is process-global.
//!
//! ## Frame
//!
//! ```text
//! prune ─► route input ─► tooltip ─► drain deferred ─► prune + reclaim
//! ```
//!
//! Reactive mutations (closing a menu, removing an element from inside its
//! own event handling) go through [`Ui::post_deferred`] and are applied in
//! the drain step, never while the registry is being walked.

use std::fmt;
use std::rc::Rc;

use tessera_core::{DeferredQueue, Handle, PanelId, StringId};

use crate::config::UiConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::input::InputState;
use crate::layout::Vec2;
use crate::panel::{MenuState, Panel, PanelKind};
use crate::registry::{DrawOrder, ElementRegistry, RegisteredElement};
use crate::render::{paint, DrawList, PaintFrame};
use crate::router::{InputRouter, RouteFrame, UiEvent};
use crate::scene::Scene;
use crate::skin::Skin;
use crate::text_flow::TextMeasure;
use crate::tooltip::{Tooltip, TooltipState};

/// Registry id of the open context menu.
pub const MENU_ELEMENT: &str = "__current_menu__";

/// A scene with its registry, input routing and deferred calls.
pub struct Ui {
    config: UiConfig,
    scene: Scene,
    registry: ElementRegistry,
    router: InputRouter,
    deferred: DeferredQueue<Ui>,
    events: Vec<UiEvent>,
    tooltip: TooltipState,
    measure: Box<dyn TextMeasure>,
    now_ms: u64,
    in_frame: bool,
}

impl Ui {
    /// Creates an empty UI.
    #[must_use]
    pub fn new(config: UiConfig) -> Self {
        Self {
            scene: Scene::new(),
            registry: ElementRegistry::new(),
            router: InputRouter::new(config.click_window_ms),
            deferred: DeferredQueue::new(),
            events: Vec::with_capacity(32),
            tooltip: TooltipState::new(config.tooltip()),
            measure: Box::new(config.measure()),
            now_ms: 0,
            in_frame: false,
            config,
        }
    }

    /// Replaces the text measurement used for tooltips and menus.
    pub fn set_text_measure(&mut self, measure: impl TextMeasure + 'static) {
        self.measure = Box::new(measure);
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &UiConfig {
        &self.config
    }

    /// The scene panels live in.
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene, for linking panels.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Element bindings.
    #[must_use]
    pub const fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Creates a panel in this UI's scene.
    #[must_use]
    pub fn create_panel(&mut self, kind: PanelKind) -> Handle<Panel> {
        let handle = self.scene.create(kind);
        if let Some(mut panel) = handle.get_mut() {
            panel.set_font_size(self.config.default_font_size);
        }
        handle
    }

    /// Registers a panel under `id`.
    ///
    /// # Errors
    ///
    /// As [`ElementRegistry::insert`].
    pub fn insert(
        &mut self,
        id: impl Into<StringId>,
        handle: Handle<Panel>,
    ) -> RegistryResult<DrawOrder> {
        self.registry.insert(id.into(), handle, &self.scene)
    }

    /// Removes and disposes an element right away.
    ///
    /// Must not be called while routing; use [`Ui::request_removal`] from
    /// reactive code.
    pub fn remove(&mut self, id: impl Into<StringId>) -> bool {
        self.registry.remove(id.into(), &self.scene)
    }

    /// Removes an element at the next deferred drain.
    pub fn request_removal(&mut self, id: impl Into<StringId>) {
        let id = id.into();
        self.post_deferred(0, move |ui| {
            ui.remove(id);
        });
    }

    /// Handle to a registered element, or an empty handle.
    #[must_use]
    pub fn lookup(&self, id: impl Into<StringId>) -> Handle<Panel> {
        self.registry.lookup(id.into())
    }

    /// Schedules `callback` once `delay_ms` has passed.
    ///
    /// Inside a frame the delay counts from that frame's time. Outside one
    /// the current time is unknown, so the delay counts from the next frame.
    pub fn post_deferred(&mut self, delay_ms: u64, callback: impl FnOnce(&mut Ui) + 'static) {
        let callback = move |ui: &mut Ui, ()| callback(ui);
        if self.in_frame {
            self.deferred.post(callback, (), self.now_ms, delay_ms);
        } else {
            self.deferred.post_on_next_poll(callback, (), delay_ms);
        }
    }

    /// Number of deferred calls waiting.
    #[must_use]
    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Opens a context menu at `position`, replacing any open one.
    ///
    /// # Errors
    ///
    /// As [`ElementRegistry::insert`].
    pub fn open_menu(&mut self, position: Vec2, items: Vec<String>) -> RegistryResult<PanelId> {
        self.close_menu();

        let handle = self.create_panel(PanelKind::Menu(MenuState::new(items)));
        let alias = handle.clone();
        self.insert(MENU_ELEMENT, handle)?;

        let mut panel = alias
            .get_mut()
            .ok_or_else(|| RegistryError::EmptyHandle(StringId::from_name(MENU_ELEMENT)))?;
        let font_size = panel.font_size();
        let size = panel
            .kind()
            .as_menu()
            .map_or(Vec2::ZERO, |menu| menu.content_size(&*self.measure, font_size));
        panel.position = position;
        panel.size = size;
        tracing::debug!(panel = %panel.id(), "menu opened");
        Ok(panel.id())
    }

    /// Closes the open context menu. Returns false if none was open.
    pub fn close_menu(&mut self) -> bool {
        let closed = self.remove(MENU_ELEMENT);
        if closed {
            tracing::debug!("menu closed");
        }
        closed
    }

    /// Panel of the open context menu.
    #[must_use]
    pub fn menu(&self) -> Option<PanelId> {
        self.registry
            .lookup(StringId::from_name(MENU_ELEMENT))
            .get()
            .map(|panel| panel.id())
    }

    /// Replaces the skin and re-applies it to every element.
    pub fn set_skin(&mut self, skin: Skin) {
        self.registry.set_skin(Rc::new(skin), &self.scene);
    }

    /// Runs one frame of input at `now_ms`.
    pub fn frame(&mut self, now_ms: u64, input: &InputState) {
        self.now_ms = self.now_ms.max(now_ms);
        self.in_frame = true;
        self.registry.prune(&self.scene);

        let hit_order = self.top_level(self.registry.hit_order());
        let modal = self.registry.modal().map(|element| element.panel);
        let menu = self.menu();

        let route = RouteFrame {
            now_ms: self.now_ms,
            input,
            scene: &self.scene,
            top_level: &hit_order,
            modal,
            menu,
        };
        self.router.route(&route, &mut self.events, &mut self.deferred);

        self.update_tooltip(input.mouse_position());

        let pass = self.deferred.begin_pass(self.now_ms);
        let mut fired = 0_usize;
        while let Some(call) = self.deferred.pop_due(pass) {
            call.fire(self);
            fired += 1;
        }
        if fired > 0 {
            tracing::debug!(fired, "deferred calls fired");
        }

        self.registry.prune(&self.scene);
        self.scene.reclaim();
        self.in_frame = false;
    }

    fn top_level(&self, elements: Vec<RegisteredElement>) -> Vec<PanelId> {
        elements
            .into_iter()
            .map(|element| element.panel)
            .filter(|&panel| self.scene.parent_of(panel).is_none())
            .collect()
    }

    fn update_tooltip(&mut self, cursor: Vec2) {
        let source = self
            .router
            .tooltip_source()
            .and_then(|id| self.scene.get(id))
            .filter(|panel| panel.responds_to_tooltips());

        match source {
            Some(panel) => self.tooltip.show(
                panel.id(),
                panel.tooltip(),
                panel.font_size(),
                cursor,
                self.config.screen(),
                &*self.measure,
            ),
            None => self.tooltip.hide(),
        }
    }

    /// Builds the draw list for the current state.
    #[must_use]
    pub fn draw(&self) -> DrawList {
        let roots = self.top_level(self.registry.paint_order());
        let tooltip_config = self.tooltip.config();

        paint(&PaintFrame {
            scene: &self.scene,
            roots: &roots,
            modal: self.registry.modal().map(|element| element.panel),
            screen: self.config.screen(),
            backdrop_alpha: self.config.modal_backdrop_alpha,
            tooltip: self.tooltip.current(),
            tooltip_config,
        })
    }

    /// Takes the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.events)
    }

    /// Focused panel.
    #[must_use]
    pub const fn focused(&self) -> Option<PanelId> {
        self.router.focused()
    }

    /// Panel under the cursor as of the last frame.
    #[must_use]
    pub const fn mouse_over(&self) -> Option<PanelId> {
        self.router.mouse_over()
    }

    /// Panel whose tooltip is showing.
    #[must_use]
    pub const fn tooltip_source(&self) -> Option<PanelId> {
        self.router.tooltip_source()
    }

    /// Tooltip showing, if any.
    #[must_use]
    pub const fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.current()
    }

    /// Drops focus, notifying the panel that had it.
    pub fn clear_focus(&mut self) {
        self.router.clear_focus(&self.scene, &mut self.events);
    }

    /// Disposes every element.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.tooltip.hide();
        self.scene.reclaim();
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new(UiConfig::default())
    }
}

impl fmt::Debug for Ui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ui")
            .field("scene", &self.scene)
            .field("elements", &self.registry.len())
            .field("focused", &self.router.focused())
            .field("deferred", &self.deferred)
            .field("now_ms", &self.now_ms)
            .finish_non_exhaustive()
    }
}
