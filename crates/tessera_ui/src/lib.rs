//! # Tessera UI
//!
//! The engine beneath a retained-mode widget toolkit:
//! - who owns each panel ([`Scene`], [`ElementRegistry`])
//! - which panel receives input each frame ([`InputRouter`])
//! - how text wraps inside a box ([`text_flow::wrap_text`])
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          FRAME                               │
//! ├──────────────────────────────────────────────────────────────┤
//! │  InputState → Hit Test → Focus → Events → Deferred Drain     │
//! │                   ↑                            ↓             │
//! │           Registry order              Registry mutations     │
//! │                                                              │
//! │  Registry (ascending) → Panels → Backdrop → Tooltip → Draw   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tessera_ui::{InputState, MouseButton, PanelKind, Ui, UiEventKind, Vec2};
//!
//! let mut ui = Ui::default();
//! let button = ui.create_panel(PanelKind::Button { caption: "OK".into() });
//! button.get_mut().unwrap().size = Vec2::new(80.0, 24.0);
//! ui.insert("ok", button).unwrap();
//!
//! let mut input = InputState::new();
//! input.set_mouse_pos(10.0, 10.0);
//! input.mouse_button_down(MouseButton::Left);
//! ui.frame(0, &input);
//!
//! let events = ui.drain_events();
//! assert_eq!(events[0].kind, UiEventKind::GainFocus);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod input;
pub mod layout;
pub mod panel;
pub mod registry;
pub mod render;
pub mod router;
pub mod scene;
pub mod skin;
pub mod text_flow;
pub mod tooltip;
pub mod ui;

pub use config::UiConfig;
pub use error::{ConfigError, RegistryError, SceneError};
pub use input::{InputState, Key, Modifiers, MouseButton};
pub use layout::{Rect, Vec2};
pub use panel::{MenuState, Panel, PanelFlags, PanelKind};
pub use registry::{DrawOrder, ElementRegistry, RegisteredElement};
pub use render::{DrawCommand, DrawList, Quad};
pub use router::{resolve_hit_target, FocusState, InputRouter, UiEvent, UiEventKind};
pub use scene::{Scene, SceneId};
pub use skin::{Color, Skin};
pub use text_flow::{block_size, wrap_text, MonospaceMeasure, TextMeasure};
pub use tooltip::{Tooltip, TooltipConfig, TooltipState};
pub use ui::Ui;
