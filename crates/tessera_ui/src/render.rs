//! Draw list generation.
//!
//! The draw pass walks the registered elements back to front and records
//! what a renderer needs to paint them. Nothing here talks to a GPU: the
//! renderer consumes [`DrawList::commands`] for structure and uploads
//! [`DrawList::as_bytes`] as a flat quad buffer.
//!
//! Paint order:
//! 1. Registered elements by ascending draw order, each followed by its
//!    visible children in link order.
//! 2. The modal backdrop, immediately before the modal element.
//! 3. The tooltip, always last.

// `bytemuck` derives expand to `unsafe impl`.
#![allow(unsafe_code)]

use tessera_core::{PanelId, StringId};

use crate::layout::{Rect, Vec2};
use crate::panel::PanelKind;
use crate::scene::Scene;
use crate::skin::Color;
use crate::tooltip::{Tooltip, TooltipConfig};

/// One paint step.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Screen-covering dim layer behind a modal element.
    Backdrop {
        /// Covered area.
        bounds: Rect,
        /// Opacity of the layer.
        alpha: f32,
    },
    /// A panel.
    Panel {
        /// The panel.
        id: PanelId,
        /// Registry id, if registered.
        element: Option<StringId>,
        /// Screen-space bounds.
        bounds: Rect,
        /// Opacity, multiplied down from the ancestors.
        alpha: f32,
    },
    /// The tooltip box and its wrapped lines.
    Tooltip {
        /// Screen-space bounds.
        bounds: Rect,
        /// Lines to print, top to bottom.
        lines: Vec<String>,
    },
}

/// Colored rectangle for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Quad {
    /// x, y, width, height.
    pub rect: [f32; 4],
    /// RGBA.
    pub color: [f32; 4],
}

impl Quad {
    /// Creates a quad covering `bounds`.
    #[must_use]
    pub const fn new(bounds: Rect, color: Color) -> Self {
        Self {
            rect: [bounds.x, bounds.y, bounds.width, bounds.height],
            color: color.to_array(),
        }
    }
}

/// Everything painted in one frame.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    quads: Vec<Quad>,
}

impl DrawList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(64),
            quads: Vec::with_capacity(64),
        }
    }

    /// Paint steps, back to front.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// One quad per paint step, in the same order as the commands.
    #[must_use]
    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    /// Quad buffer as raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.quads)
    }

    /// Number of paint steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if nothing is painted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn push(&mut self, command: DrawCommand, quad: Quad) {
        self.commands.push(command);
        self.quads.push(quad);
    }
}

/// Inputs of the draw pass.
#[derive(Debug, Clone, Copy)]
pub struct PaintFrame<'a> {
    /// Scene holding the panels.
    pub scene: &'a Scene,
    /// Registered top-level panels, back to front.
    pub roots: &'a [PanelId],
    /// The modal panel, if any.
    pub modal: Option<PanelId>,
    /// Screen size, for the backdrop.
    pub screen: Vec2,
    /// Backdrop opacity.
    pub backdrop_alpha: f32,
    /// Tooltip showing this frame.
    pub tooltip: Option<&'a Tooltip>,
    /// Tooltip colors.
    pub tooltip_config: &'a TooltipConfig,
}

/// Builds the draw list for one frame.
#[must_use]
pub fn paint(frame: &PaintFrame<'_>) -> DrawList {
    let mut list = DrawList::new();

    for &root in frame.roots {
        if frame.modal == Some(root) {
            let bounds = Rect::from_pos_size(Vec2::ZERO, frame.screen);
            list.push(
                DrawCommand::Backdrop {
                    bounds,
                    alpha: frame.backdrop_alpha,
                },
                Quad::new(bounds, Color::BLACK.with_alpha(frame.backdrop_alpha)),
            );
        }
        paint_panel(&mut list, frame.scene, root, frame.scene.parent_origin(root), 1.0);
    }

    if let Some(tooltip) = frame.tooltip {
        list.push(
            DrawCommand::Tooltip {
                bounds: tooltip.bounds,
                lines: tooltip.lines.clone(),
            },
            Quad::new(tooltip.bounds, frame.tooltip_config.background),
        );
    }
    list
}

fn paint_panel(list: &mut DrawList, scene: &Scene, id: PanelId, parent_origin: Vec2, parent_alpha: f32) {
    let (alpha, child_origin) = {
        let Some(panel) = scene.get(id) else {
            return;
        };
        if !panel.is_visible() {
            return;
        }

        let alpha = parent_alpha * panel.alpha;
        let bounds = panel.bounds().translate(parent_origin);
        let fallback = match panel.kind() {
            PanelKind::Group => Color::TRANSPARENT,
            _ => Color::WHITE,
        };
        let color = panel.skin().map_or(fallback, |skin| {
            skin.get_color(panel.kind().skin_section(), "BackgroundColor", fallback)
        });

        list.push(
            DrawCommand::Panel {
                id,
                element: panel.element_id(),
                bounds,
                alpha,
            },
            Quad::new(bounds, color.with_alpha(color.a * alpha)),
        );
        (alpha, parent_origin + panel.position - panel.translation)
    };

    for child in scene.children_of(id) {
        paint_panel(list, scene, child, child_origin, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::skin::Skin;
    use tessera_core::Handle;

    use crate::panel::Panel;

    fn spawn(scene: &mut Scene, kind: PanelKind, bounds: Rect) -> (PanelId, Handle<Panel>) {
        let handle = scene.create(kind);
        let id = {
            let mut panel = handle.get_mut().unwrap();
            panel.position = bounds.position();
            panel.size = bounds.size();
            panel.id()
        };
        (id, handle)
    }

    fn frame<'a>(scene: &'a Scene, roots: &'a [PanelId], config: &'a TooltipConfig) -> PaintFrame<'a> {
        PaintFrame {
            scene,
            roots,
            modal: None,
            screen: Vec2::new(800.0, 600.0),
            backdrop_alpha: 0.3,
            tooltip: None,
            tooltip_config: config,
        }
    }

    #[test]
    fn test_children_follow_parent_with_nested_alpha() {
        let mut scene = Scene::new();
        let (root, root_h) = spawn(&mut scene, PanelKind::Frame, Rect::new(10.0, 10.0, 100.0, 100.0));
        let (child, child_h) = spawn(&mut scene, PanelKind::Frame, Rect::new(5.0, 5.0, 20.0, 20.0));
        scene.attach(root, child).unwrap();
        root_h.get_mut().unwrap().alpha = 0.5;
        child_h.get_mut().unwrap().alpha = 0.5;

        let config = TooltipConfig::default();
        let list = paint(&frame(&scene, &[root], &config));

        assert_eq!(list.len(), 2);
        match &list.commands()[1] {
            DrawCommand::Panel { id, bounds, alpha, .. } => {
                assert_eq!(*id, child);
                assert_eq!(*bounds, Rect::new(15.0, 15.0, 20.0, 20.0));
                assert!((alpha - 0.25).abs() < f32::EPSILON);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_hidden_subtree_is_skipped() {
        let mut scene = Scene::new();
        let (root, root_h) = spawn(&mut scene, PanelKind::Frame, Rect::new(0.0, 0.0, 10.0, 10.0));
        let (child, _child_h) = spawn(&mut scene, PanelKind::Frame, Rect::new(0.0, 0.0, 5.0, 5.0));
        scene.attach(root, child).unwrap();
        root_h.get_mut().unwrap().set_visible(false);

        let config = TooltipConfig::default();
        assert!(paint(&frame(&scene, &[root], &config)).is_empty());
    }

    #[test]
    fn test_backdrop_precedes_modal_and_tooltip_is_last() {
        let mut scene = Scene::new();
        let (back, _b) = spawn(&mut scene, PanelKind::Frame, Rect::new(0.0, 0.0, 10.0, 10.0));
        let (modal, _m) = spawn(&mut scene, PanelKind::Frame, Rect::new(20.0, 20.0, 10.0, 10.0));
        let config = TooltipConfig::default();
        let tooltip = Tooltip {
            source: back,
            lines: vec!["Help".to_owned()],
            bounds: Rect::new(1.0, 2.0, 3.0, 4.0),
            font_size: 12.0,
        };

        let roots = [back, modal];
        let mut input = frame(&scene, &roots, &config);
        input.modal = Some(modal);
        input.tooltip = Some(&tooltip);
        let list = paint(&input);

        let kinds: Vec<&str> = list
            .commands()
            .iter()
            .map(|command| match command {
                DrawCommand::Backdrop { .. } => "backdrop",
                DrawCommand::Panel { .. } => "panel",
                DrawCommand::Tooltip { .. } => "tooltip",
            })
            .collect();
        assert_eq!(kinds, ["panel", "backdrop", "panel", "tooltip"]);
        assert_eq!(list.quads()[1].color, [0.0, 0.0, 0.0, 0.3]);
    }

    #[test]
    fn test_skin_color_and_byte_view() {
        let mut scene = Scene::new();
        let (root, root_h) = spawn(&mut scene, PanelKind::Frame, Rect::new(0.0, 0.0, 10.0, 10.0));
        let mut skin = Skin::new();
        skin.set_value("Frame", "BackgroundColor", "0.2,0.4,0.6,1.0");
        root_h.get_mut().unwrap().apply_skin(&Rc::new(skin));

        let config = TooltipConfig::default();
        let list = paint(&frame(&scene, &[root], &config));

        assert_eq!(list.quads()[0].color, [0.2, 0.4, 0.6, 1.0]);
        assert_eq!(list.as_bytes().len(), std::mem::size_of::<Quad>());
        assert_eq!(std::mem::size_of::<Quad>(), 32);
    }
}
