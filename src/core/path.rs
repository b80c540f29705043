use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Vertex in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathVertex {
    pub x: f64,
    pub y: f64,
}

impl PathVertex {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// SVG path data visiting `vertices` with straight segments.
#[must_use]
pub fn line_path_data(vertices: &[PathVertex]) -> String {
    let mut data = String::with_capacity(vertices.len() * 16);
    for (index, vertex) in vertices.iter().enumerate() {
        let command = if index == 0 { 'M' } else { 'L' };
        // Writing into a String cannot fail.
        let _ = write!(data, "{command}{},{}", vertex.x, vertex.y);
    }
    data
}

/// Same as [`line_path_data`] but closes the shape.
#[must_use]
pub fn closed_path_data(vertices: &[PathVertex]) -> String {
    let mut data = line_path_data(vertices);
    if !data.is_empty() {
        data.push('Z');
    }
    data
}

/// Marker symbol drawn at line and scatter datapoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Symbol {
    #[default]
    Circle,
    Square,
    Diamond,
    Triangle,
}

impl Symbol {
    /// SVG path data for this symbol centred at `cx, cy`; `size` is the
    /// diameter or side length.
    #[must_use]
    pub fn path_data(self, cx: f64, cy: f64, size: f64) -> String {
        let half = size * 0.5;
        match self {
            Self::Circle => format!(
                "M{},{}a{half},{half} 0 1,0 {size},0a{half},{half} 0 1,0 -{size},0Z",
                cx - half,
                cy
            ),
            Self::Square => closed_path_data(&[
                PathVertex::new(cx - half, cy - half),
                PathVertex::new(cx + half, cy - half),
                PathVertex::new(cx + half, cy + half),
                PathVertex::new(cx - half, cy + half),
            ]),
            Self::Diamond => closed_path_data(&[
                PathVertex::new(cx, cy - half),
                PathVertex::new(cx + half, cy),
                PathVertex::new(cx, cy + half),
                PathVertex::new(cx - half, cy),
            ]),
            Self::Triangle => closed_path_data(&[
                PathVertex::new(cx, cy - half),
                PathVertex::new(cx + half, cy + half),
                PathVertex::new(cx - half, cy + half),
            ]),
        }
    }
}
