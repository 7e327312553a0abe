//! Rendered SVG plus an index of element bounding boxes keyed by `id`.
//!
//! Bounds are absolute (ancestor transforms applied) and expressed in the root's user space,
//! i.e. the coordinate system of the root `viewBox`.

use std::str::FromStr;

use rustc_hash::FxHashMap;
use verbviz_core::geom::{Point, Rect, Size, Transform, bounds_of, point, rect};

#[derive(Debug, thiserror::Error)]
pub enum SvgError {
    #[error("failed to parse SVG: {0}")]
    Parse(#[from] roxmltree::Error),
    #[error("root element is <{0}>, expected <svg>")]
    NotSvg(String),
}

#[derive(Debug, Clone)]
pub struct RenderedDiagram {
    svg: String,
    size: Size,
    view_box: Rect,
    bounds: FxHashMap<String, Rect>,
}

impl RenderedDiagram {
    pub fn parse(svg: impl Into<String>) -> Result<Self, SvgError> {
        let svg = svg.into();
        let (size, view_box, bounds) = {
            let opts = roxmltree::ParsingOptions {
                allow_dtd: true,
                ..roxmltree::ParsingOptions::default()
            };
            let doc = roxmltree::Document::parse_with_options(&svg, opts)?;
            let root = doc.root_element();
            if root.tag_name().name() != "svg" {
                return Err(SvgError::NotSvg(root.tag_name().name().to_string()));
            }

            let mut bounds = FxHashMap::default();
            let content = collect_bounds(root, Transform::identity(), &mut bounds);

            let width = root.attribute("width").and_then(parse_length);
            let height = root.attribute("height").and_then(parse_length);
            let view_box = root
                .attribute("viewBox")
                .and_then(|s| svgtypes::ViewBox::from_str(s).ok())
                .map(|vb| rect(vb.x, vb.y, vb.w, vb.h));

            let view_box = match (view_box, width, height) {
                (Some(vb), _, _) => vb,
                (None, Some(w), Some(h)) => rect(0.0, 0.0, w, h),
                (None, _, _) => content.unwrap_or_else(Rect::zero),
            };
            let size = Size::new(
                width.unwrap_or(view_box.size.width),
                height.unwrap_or(view_box.size.height),
            );
            (size, view_box, bounds)
        };

        Ok(Self {
            svg,
            size,
            view_box,
            bounds,
        })
    }

    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn into_svg(self) -> String {
        self.svg
    }

    /// Intrinsic size from the root `width`/`height` attributes.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn view_box(&self) -> Rect {
        self.view_box
    }

    /// Looks up an element's bounds by id.
    ///
    /// Graphviz writes table cells that carry a hyperlink as an anchor group whose id is the
    /// cell id prefixed with `a_`; that spelling is tried second.
    pub fn node_bounds(&self, id: &str) -> Option<Rect> {
        self.bounds
            .get(id)
            .or_else(|| self.bounds.get(&format!("a_{id}")))
            .copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.bounds.keys().map(String::as_str)
    }
}

fn collect_bounds(
    node: roxmltree::Node<'_, '_>,
    parent: Transform,
    out: &mut FxHashMap<String, Rect>,
) -> Option<Rect> {
    let name = node.tag_name().name();
    if matches!(
        name,
        "defs" | "clipPath" | "mask" | "marker" | "pattern" | "symbol" | "title" | "desc"
    ) {
        return None;
    }

    let ts = match node.attribute("transform") {
        Some(value) => parse_transform(value).then(&parent),
        None => parent,
    };

    let mut bbox = own_bounds(node, &ts);
    for child in node.children().filter(|n| n.is_element()) {
        if let Some(child_box) = collect_bounds(child, ts, out) {
            bbox = Some(match bbox {
                Some(b) => b.union(&child_box),
                None => child_box,
            });
        }
    }

    if let (Some(id), Some(b)) = (node.attribute("id"), bbox) {
        out.entry(id.to_string()).or_insert(b);
    }
    bbox
}

fn own_bounds(node: roxmltree::Node<'_, '_>, ts: &Transform) -> Option<Rect> {
    let num = |attr: &str| node.attribute(attr).and_then(parse_length);
    let points: Vec<Point> = match node.tag_name().name() {
        "rect" | "image" | "foreignObject" => {
            let (x, y) = (num("x").unwrap_or(0.0), num("y").unwrap_or(0.0));
            let (w, h) = (num("width")?, num("height")?);
            vec![point(x, y), point(x + w, y + h), point(x + w, y), point(x, y + h)]
        }
        "circle" => {
            let (cx, cy, r) = (num("cx").unwrap_or(0.0), num("cy").unwrap_or(0.0), num("r")?);
            corners(cx, cy, r, r)
        }
        "ellipse" => {
            let (cx, cy) = (num("cx").unwrap_or(0.0), num("cy").unwrap_or(0.0));
            corners(cx, cy, num("rx")?, num("ry")?)
        }
        "line" => vec![
            point(num("x1").unwrap_or(0.0), num("y1").unwrap_or(0.0)),
            point(num("x2").unwrap_or(0.0), num("y2").unwrap_or(0.0)),
        ],
        "polygon" | "polyline" => svgtypes::PointsParser::from(node.attribute("points")?)
            .map(|(x, y)| point(x, y))
            .collect(),
        "path" => path_points(node.attribute("d")?),
        "text" => vec![point(num("x").unwrap_or(0.0), num("y").unwrap_or(0.0))],
        _ => return None,
    };

    bounds_of(points.into_iter().map(|p| ts.transform_point(p)))
}

fn corners(cx: f64, cy: f64, rx: f64, ry: f64) -> Vec<Point> {
    vec![
        point(cx - rx, cy - ry),
        point(cx + rx, cy - ry),
        point(cx + rx, cy + ry),
        point(cx - rx, cy + ry),
    ]
}

/// End and control points of every segment; curves are bounded by their control polygon.
fn path_points(d: &str) -> Vec<Point> {
    use svgtypes::SimplePathSegment as Seg;

    let mut points = Vec::new();
    for segment in svgtypes::SimplifyingPathParser::from(d) {
        let Ok(segment) = segment else {
            break;
        };
        match segment {
            Seg::MoveTo { x, y } | Seg::LineTo { x, y } => points.push(point(x, y)),
            Seg::Quadratic { x1, y1, x, y } => {
                points.push(point(x1, y1));
                points.push(point(x, y));
            }
            Seg::CurveTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                points.push(point(x1, y1));
                points.push(point(x2, y2));
                points.push(point(x, y));
            }
            Seg::ClosePath => {}
        }
    }
    points
}

pub(crate) fn parse_transform(value: &str) -> Transform {
    use svgtypes::TransformListToken as Tok;

    let mut ts = Transform::identity();
    for token in svgtypes::TransformListParser::from(value) {
        let Ok(token) = token else {
            break;
        };
        let local = match token {
            Tok::Matrix { a, b, c, d, e, f } => Transform::new(a, b, c, d, e, f),
            Tok::Translate { tx, ty } => Transform::translation(tx, ty),
            Tok::Scale { sx, sy } => Transform::scale(sx, sy),
            Tok::Rotate { angle } => {
                let (sin, cos) = angle.to_radians().sin_cos();
                Transform::new(cos, sin, -sin, cos, 0.0, 0.0)
            }
            Tok::SkewX { angle } => Transform::new(1.0, 0.0, angle.to_radians().tan(), 1.0, 0.0, 0.0),
            Tok::SkewY { angle } => Transform::new(1.0, angle.to_radians().tan(), 0.0, 1.0, 0.0, 0.0),
        };
        ts = local.then(&ts);
    }
    ts
}

fn parse_length(value: &str) -> Option<f64> {
    svgtypes::Length::from_str(value)
        .ok()
        .map(|l| l.number)
        .filter(|n| n.is_finite())
}
