use serde::{Deserialize, Serialize};

use crate::core::{ContentKind, Symbol, YAxisId};

/// What the legend and label collaborators need to know about a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub key: String,
    pub kind: ContentKind,
    pub label: Option<String>,
    pub color: String,
    pub shape: Symbol,
    pub y_axis: YAxisId,
}

/// Legend list owned by the host. The graph only pushes state changes to it;
/// [`crate::api::LegendState`] stays the source of truth.
pub trait Legend {
    fn register(&mut self, series: &SeriesSummary);

    fn remove(&mut self, key: &str);

    fn set_shown(&mut self, key: &str, shown: bool);
}

/// Small shapes drawn next to an axis label, one per series on that axis.
pub trait LabelShapes {
    fn add(&mut self, series: &SeriesSummary, container: YAxisId);

    fn remove(&mut self, key: &str, container: YAxisId);
}
