//! Retained SVG surface: keeps every shape and serialises the scene on demand.

use std::fmt::Write as _;

use crate::core::Canvas;
use crate::error::ChartResult;
use crate::render::shape_store::{ShapeStore, StoredShape};
use crate::render::{
    DrawingSurface, LayerStack, PathPrimitive, RectPrimitive, ShapeGeometry, ShapeHandle,
    ShapeSelector, ShapeStyle, TextAnchor, TextPrimitive, TransitionConfig,
};

/// Surface producing standalone SVG markup.
///
/// Transitions are applied immediately: a static document has no timeline, so
/// the final attribute values are what gets serialised.
#[derive(Debug)]
pub struct SvgSurface {
    id: String,
    store: ShapeStore,
}

impl SvgSurface {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            store: ShapeStore::default(),
        }
    }

    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.store.len()
    }

    /// Serialises the retained scene. Shapes are emitted layer by layer, in
    /// draw order within a layer, inside a group translated by the padding.
    #[must_use]
    pub fn to_svg_string(&self, canvas: Canvas) -> String {
        let width = canvas.viewport.width;
        let height = canvas.viewport.height;
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" id="{}" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#,
            escape_xml(&self.id)
        );
        out.push('\n');
        let _ = writeln!(
            out,
            r#"<g class="canvas" transform="translate({},{})">"#,
            canvas.padding.left, canvas.padding.top
        );

        for layer in LayerStack::canonical().layers {
            let _ = writeln!(out, r#"<g class="{}">"#, layer.name());
            for (_, shape) in self.store.iter().filter(|(_, s)| s.style.layer == layer) {
                write_shape(&mut out, shape);
            }
            out.push_str("</g>\n");
        }

        out.push_str("</g>\n</svg>\n");
        out
    }
}

impl DrawingSurface for SvgSurface {
    fn draw_rect(&mut self, rect: RectPrimitive, style: &ShapeStyle) -> ChartResult<ShapeHandle> {
        self.store.insert(ShapeGeometry::Rect(rect), style)
    }

    fn draw_path(&mut self, path: PathPrimitive, style: &ShapeStyle) -> ChartResult<ShapeHandle> {
        self.store.insert(ShapeGeometry::Path(path), style)
    }

    fn draw_text(&mut self, text: TextPrimitive, style: &ShapeStyle) -> ChartResult<ShapeHandle> {
        self.store.insert(ShapeGeometry::Text(text), style)
    }

    fn remove_shapes(&mut self, selector: &ShapeSelector) -> usize {
        self.store.remove_matching(selector)
    }

    fn transition(
        &mut self,
        shape: ShapeHandle,
        target: ShapeGeometry,
        _config: TransitionConfig,
    ) -> ChartResult<()> {
        self.store.update(shape, target).map(|_| ())
    }
}

fn write_shape(out: &mut String, shape: &StoredShape) {
    match &shape.geometry {
        ShapeGeometry::Rect(rect) => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                rect.x, rect.y, rect.width, rect.height
            );
            write_style(out, &shape.style);
            out.push_str("/>\n");
        }
        ShapeGeometry::Path(path) => {
            let _ = write!(out, r#"<path d="{}""#, escape_xml(&path.d));
            write_style(out, &shape.style);
            out.push_str("/>\n");
        }
        ShapeGeometry::Text(text) => {
            let anchor = match text.anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-size="{}" text-anchor="{anchor}""#,
                text.x, text.y, text.font_size_px
            );
            write_style(out, &shape.style);
            out.push('>');
            out.push_str(&escape_xml(&text.text));
            out.push_str("</text>\n");
        }
    }
}

fn write_style(out: &mut String, style: &ShapeStyle) {
    let _ = write!(
        out,
        r#" class="{}" data-key="{}""#,
        escape_xml(&style.class),
        escape_xml(&style.owner)
    );
    match &style.fill {
        Some(fill) => {
            let _ = write!(out, r#" fill="{}""#, escape_xml(fill));
        }
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = &style.stroke {
        let _ = write!(out, r#" stroke="{}""#, escape_xml(stroke));
    }
    if let Some(width) = style.stroke_width {
        let _ = write!(out, r#" stroke-width="{width}""#);
    }
    for (name, value) in &style.attributes {
        let _ = write!(out, r#" {}="{}""#, escape_xml(name), escape_xml(value));
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
