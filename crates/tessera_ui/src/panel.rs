//! Panels: the nodes of the scene graph.
//!
//! A [`Panel`] carries geometry, input gating flags and a tagged
//! [`PanelKind`]. Parent/child links live in the scene arena, not in the
//! panel; the panel only keeps the handles of the nested children it owns.

use std::rc::Rc;

use tessera_core::{Handle, PanelId, StringId};

use crate::layout::{Rect, Vec2};
use crate::scene::SceneId;
use crate::skin::Skin;
use crate::text_flow::TextMeasure;

/// Panel state flags (bitfield).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelFlags(u32);

impl PanelFlags {
    /// Panel is drawn and hit-tested.
    pub const VISIBLE: u32 = 1 << 0;
    /// Panel accepts input at all.
    pub const ENABLED: u32 = 1 << 1;
    /// Panel receives mouse events and can be hit.
    pub const MOUSE_INPUT: u32 = 1 << 2;
    /// Panel receives keyboard and character events.
    pub const KEYBOARD_INPUT: u32 = 1 << 3;
    /// Panel captures all hit testing while registered (modal).
    pub const BLOCKS_INPUT: u32 = 1 << 4;
    /// Hovering the panel shows its tooltip.
    pub const TOOLTIPS: u32 = 1 << 5;

    /// Default flags for a new panel.
    pub const DEFAULT: Self =
        Self(Self::VISIBLE | Self::ENABLED | Self::MOUSE_INPUT | Self::KEYBOARD_INPUT);

    /// Returns true if the flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Sets or clears a flag.
    #[inline]
    pub fn assign(&mut self, flag: u32, on: bool) {
        if on {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }
}

impl Default for PanelFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// State of a context menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuState {
    /// Item captions, top to bottom.
    pub items: Vec<String>,
    /// Height of one item row.
    pub item_height: f32,
    /// Space between the frame and the rows.
    pub padding: Vec2,
}

impl MenuState {
    /// Creates a menu with the given captions.
    #[must_use]
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            item_height: 16.0,
            padding: Vec2::new(4.0, 4.0),
        }
    }

    /// Index of the row under a point in menu-local coordinates.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn item_at(&self, local: Vec2) -> Option<usize> {
        if self.item_height <= 0.0 {
            return None;
        }
        let row = (local.y - self.padding.y) / self.item_height;
        if row < 0.0 {
            return None;
        }
        let index = row.floor() as usize;
        (index < self.items.len()).then_some(index)
    }

    /// Size needed to show every row.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn content_size<M: TextMeasure + ?Sized>(&self, measure: &M, font_size: f32) -> Vec2 {
        let widest = self
            .items
            .iter()
            .map(|item| measure.measure(item, font_size).x)
            .fold(0.0_f32, f32::max);

        Vec2::new(
            widest + self.padding.x * 2.0,
            self.items.len() as f32 * self.item_height + self.padding.y * 2.0,
        )
    }
}

/// What a panel is. Checked accessors replace type casts.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelKind {
    /// Invisible container.
    Group,
    /// Framed container.
    Frame,
    /// Clickable button.
    Button {
        /// Button text.
        caption: String,
    },
    /// Static text.
    Text {
        /// The text to show.
        text: String,
        /// Explicit size; `None` follows the skin default.
        font_size: Option<f32>,
    },
    /// Context menu.
    Menu(MenuState),
}

impl PanelKind {
    /// Skin section this kind reads its settings from.
    #[must_use]
    pub const fn skin_section(&self) -> &'static str {
        match self {
            Self::Group => "Group",
            Self::Frame => "Frame",
            Self::Button { .. } => "Button",
            Self::Text { .. } => "Text",
            Self::Menu(_) => "Menu",
        }
    }

    /// Menu state, if this is a menu.
    #[must_use]
    pub const fn as_menu(&self) -> Option<&MenuState> {
        match self {
            Self::Menu(menu) => Some(menu),
            _ => None,
        }
    }

    /// Mutable menu state, if this is a menu.
    pub fn as_menu_mut(&mut self) -> Option<&mut MenuState> {
        match self {
            Self::Menu(menu) => Some(menu),
            _ => None,
        }
    }

    /// Text content, if this is a text panel.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Caption, if this is a button.
    #[must_use]
    pub fn as_button(&self) -> Option<&str> {
        match self {
            Self::Button { caption } => Some(caption),
            _ => None,
        }
    }
}

/// A node of the retained scene graph.
#[derive(Debug)]
pub struct Panel {
    id: PanelId,
    scene: SceneId,
    kind: PanelKind,
    /// Offset from the parent's origin (screen origin for top-level panels).
    pub position: Vec2,
    /// Extent.
    pub size: Vec2,
    /// Extra hit-test area, split evenly around the panel.
    pub hit_padding: Vec2,
    /// Scroll offset applied to children.
    pub translation: Vec2,
    /// Opacity, 0 to 1.
    pub alpha: f32,
    flags: PanelFlags,
    tooltip: String,
    element_id: Option<StringId>,
    font_size: f32,
    skin: Option<Rc<Skin>>,
    owned: Vec<Handle<Panel>>,
}

impl Panel {
    pub(crate) fn new(id: PanelId, scene: SceneId, kind: PanelKind) -> Self {
        Self {
            id,
            scene,
            kind,
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            hit_padding: Vec2::ZERO,
            translation: Vec2::ZERO,
            alpha: 1.0,
            flags: PanelFlags::DEFAULT,
            tooltip: String::new(),
            element_id: None,
            font_size: 12.0,
            skin: None,
            owned: Vec::new(),
        }
    }

    /// Arena id of this panel.
    #[must_use]
    pub const fn id(&self) -> PanelId {
        self.id
    }

    /// Scene that created this panel.
    #[must_use]
    pub const fn scene(&self) -> SceneId {
        self.scene
    }

    /// What this panel is.
    #[must_use]
    pub const fn kind(&self) -> &PanelKind {
        &self.kind
    }

    /// Mutable kind-specific state.
    pub fn kind_mut(&mut self) -> &mut PanelKind {
        &mut self.kind
    }

    /// Registry id, once inserted.
    #[must_use]
    pub const fn element_id(&self) -> Option<StringId> {
        self.element_id
    }

    pub(crate) fn set_element_id(&mut self, id: StringId) {
        self.element_id = Some(id);
    }

    /// Local bounds (position and size, padding excluded).
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }

    /// Raw flags.
    #[must_use]
    pub const fn flags(&self) -> PanelFlags {
        self.flags
    }

    /// Returns true if the panel is drawn and hit-tested.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.flags.has(PanelFlags::VISIBLE)
    }

    /// Shows or hides the panel.
    pub fn set_visible(&mut self, on: bool) {
        self.flags.assign(PanelFlags::VISIBLE, on);
    }

    /// Returns true if the panel accepts input.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.flags.has(PanelFlags::ENABLED)
    }

    /// Enables or disables input.
    pub fn set_enabled(&mut self, on: bool) {
        self.flags.assign(PanelFlags::ENABLED, on);
    }

    /// Returns true if mouse events reach the panel.
    #[must_use]
    pub const fn accepts_mouse(&self) -> bool {
        self.flags.has(PanelFlags::ENABLED) && self.flags.has(PanelFlags::MOUSE_INPUT)
    }

    /// Enables or disables mouse input.
    pub fn set_mouse_input(&mut self, on: bool) {
        self.flags.assign(PanelFlags::MOUSE_INPUT, on);
    }

    /// Returns true if keyboard and character events reach the panel.
    #[must_use]
    pub const fn accepts_keyboard(&self) -> bool {
        self.flags.has(PanelFlags::ENABLED) && self.flags.has(PanelFlags::KEYBOARD_INPUT)
    }

    /// Enables or disables keyboard input.
    pub fn set_keyboard_input(&mut self, on: bool) {
        self.flags.assign(PanelFlags::KEYBOARD_INPUT, on);
    }

    /// Returns true if the panel is a candidate for the hit test.
    #[must_use]
    pub const fn is_hittable(&self) -> bool {
        self.is_visible() && self.accepts_mouse()
    }

    /// Returns true if the panel captures input while registered.
    #[must_use]
    pub const fn blocks_input(&self) -> bool {
        self.flags.has(PanelFlags::BLOCKS_INPUT)
    }

    /// Makes the panel modal (or not).
    pub fn set_blocks_input(&mut self, on: bool) {
        self.flags.assign(PanelFlags::BLOCKS_INPUT, on);
    }

    /// Returns true if hovering the panel shows its tooltip.
    #[must_use]
    pub const fn responds_to_tooltips(&self) -> bool {
        self.flags.has(PanelFlags::TOOLTIPS)
    }

    /// Tooltip text.
    #[must_use]
    pub fn tooltip(&self) -> &str {
        &self.tooltip
    }

    /// Sets the tooltip text; a non-empty text also enables tooltips.
    pub fn set_tooltip(&mut self, text: impl Into<String>) {
        self.tooltip = text.into();
        self.flags.assign(PanelFlags::TOOLTIPS, !self.tooltip.is_empty());
    }

    /// Font size, from the skin unless the kind overrides it.
    #[must_use]
    pub fn font_size(&self) -> f32 {
        match self.kind {
            PanelKind::Text {
                font_size: Some(size),
                ..
            } => size,
            _ => self.font_size,
        }
    }

    /// Sets the font size used when the kind does not override it.
    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    /// Skin last applied to the panel.
    #[must_use]
    pub fn skin(&self) -> Option<&Rc<Skin>> {
        self.skin.as_ref()
    }

    /// Reads this panel's settings from `skin`.
    ///
    /// - `[General] DefaultFontSize` becomes the font size
    /// - `[<Kind>] HitPadding` becomes the extra hit-test padding
    /// - menus also read `[Menu] ItemHeight` and `[Menu] Padding`
    pub fn apply_skin(&mut self, skin: &Rc<Skin>) {
        let section = self.kind.skin_section();

        self.font_size = skin.get_float("General", "DefaultFontSize", self.font_size);
        self.hit_padding = skin.get_vec2(section, "HitPadding", self.hit_padding);

        if let PanelKind::Menu(menu) = &mut self.kind {
            menu.item_height = skin.get_float(section, "ItemHeight", menu.item_height);
            menu.padding = skin.get_vec2(section, "Padding", menu.padding);
        }

        self.skin = Some(Rc::clone(skin));
    }

    /// Nested children owned by this panel.
    #[must_use]
    pub fn owned(&self) -> &[Handle<Panel>] {
        &self.owned
    }

    pub(crate) fn push_owned(&mut self, child: Handle<Panel>) {
        self.owned.push(child);
    }

    pub(crate) fn take_owned(&mut self, child: PanelId) -> Option<Handle<Panel>> {
        let index = self
            .owned
            .iter()
            .position(|handle| handle.get().is_some_and(|panel| panel.id == child))?;
        Some(self.owned.swap_remove(index))
    }
}
