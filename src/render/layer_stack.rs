use serde::{Deserialize, Serialize};

/// Z-ordered layers of a graph's plot area, bottom first.
///
/// The transform pipeline re-applies geometry in this same order so that
/// selection boxes never flash above data shapes during a relayout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Layer {
    Selection,
    Data,
    Region,
    Label,
}

impl Layer {
    /// Every layer, bottom first.
    pub const ALL: [Self; 4] = [Self::Selection, Self::Data, Self::Region, Self::Label];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Selection => "selection",
            Self::Data => "data",
            Self::Region => "region",
            Self::Label => "label",
        }
    }
}

/// Ordered layer list consumed by surfaces that serialise a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerStack {
    pub layers: Vec<Layer>,
}

impl LayerStack {
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            layers: Layer::ALL.to_vec(),
        }
    }
}
