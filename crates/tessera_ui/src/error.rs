//! # UI Error Types
//!
//! All errors that can occur while building or configuring a scene.

use std::io;

use tessera_core::{PanelId, StringId};
use thiserror::Error;

use crate::scene::SceneId;

/// Errors returned by the element registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The id is already bound to a live element.
    #[error("element {0} is already registered")]
    DuplicateElement(StringId),

    /// The element was created by a different scene than the registry's.
    #[error("element {element} belongs to scene {found}, not {expected}")]
    ForeignElement {
        /// The id the element was offered under.
        element: StringId,
        /// Scene owning the registry.
        expected: SceneId,
        /// Scene that created the element.
        found: SceneId,
    },

    /// The offered handle observes nothing.
    #[error("element {0} has no live panel")]
    EmptyHandle(StringId),

    /// The panel is already bound under another id.
    #[error("element {element} is already registered as {existing}")]
    AlreadyRegistered {
        /// The id the panel was offered under.
        element: StringId,
        /// The id the panel is bound to.
        existing: StringId,
    },
}

/// Errors returned by scene graph links.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// The id does not resolve to a live panel in this scene.
    #[error("panel {0} is not alive in this scene")]
    UnknownPanel(PanelId),

    /// The panel was created by another scene.
    #[error("panel belongs to scene {found}, not {expected}")]
    ForeignPanel {
        /// Scene asked to link the panel.
        expected: SceneId,
        /// Scene that created the panel.
        found: SceneId,
    },

    /// Linking would make a panel its own ancestor.
    #[error("attaching {child} under {parent} would create a cycle")]
    Cycle {
        /// Requested parent.
        parent: PanelId,
        /// Requested child.
        child: PanelId,
    },
}

/// Errors while loading configuration or skin files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),

    /// The file is not valid TOML for the expected shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The value could not be written back as TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type for scene graph operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
