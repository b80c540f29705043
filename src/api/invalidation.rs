use serde::{Deserialize, Serialize};

use crate::render::Layer;

/// How much of a graph a pending frame must touch. Levels are ordered; a
/// stronger level covers every weaker one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum InvalidationLevel {
    #[default]
    None,
    /// Selection boxes only; scales and bands are untouched.
    Light,
    /// Scales, bands and every shape position.
    Layout,
    /// Every shape re-emitted from scratch.
    Full,
}

/// What caused a frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvalidationTopic {
    Viewport,
    Legend,
    Selection,
    /// Host surface cleared.
    Surface,
}

impl InvalidationTopic {
    const fn flag(self) -> u8 {
        1 << self as u8
    }
}

/// Merged frame request: the strongest level asked for plus every cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvalidationMask {
    level: InvalidationLevel,
    causes: u8,
}

impl InvalidationMask {
    pub const NONE: Self = Self {
        level: InvalidationLevel::None,
        causes: 0,
    };

    #[must_use]
    pub const fn new(level: InvalidationLevel, topic: InvalidationTopic) -> Self {
        Self {
            level,
            causes: topic.flag(),
        }
    }

    #[must_use]
    pub const fn level(self) -> InvalidationLevel {
        self.level
    }

    #[must_use]
    pub const fn has_topic(self, topic: InvalidationTopic) -> bool {
        self.causes & topic.flag() != 0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self.level, InvalidationLevel::None)
    }

    /// Layers whose shapes must move when this frame runs.
    #[must_use]
    pub fn affected_layers(self) -> &'static [Layer] {
        match self.level {
            InvalidationLevel::None => &[],
            InvalidationLevel::Light => &[Layer::Selection],
            InvalidationLevel::Layout | InvalidationLevel::Full => &Layer::ALL,
        }
    }

    pub fn merge(&mut self, other: Self) {
        self.level = self.level.max(other.level);
        self.causes |= other.causes;
    }
}
