//! Pan/zoom state over a mounted [`RenderedDiagram`].
//!
//! The viewport is expressed in the diagram's user space: `origin` is the top-left corner of the
//! visible area and `scale` magnifies the initially captured bounds. Focusing a node centers the
//! visible area on its bounding box. A host applies the state by
//! rewriting the root `viewBox` ([`Viewport::apply_to_svg`]) or by using [`Viewport::transform`].

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;
use verbviz_core::VerbvizConfig;
use verbviz_core::geom::{Point, Rect, Size, Transform, Vector};

use crate::svg::RenderedDiagram;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportOptions {
    pub zoom_step: f64,
    pub focus_scale: f64,
    pub min_scale: Option<f64>,
    pub max_scale: Option<f64>,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            zoom_step: 0.1,
            focus_scale: 2.0,
            min_scale: None,
            max_scale: None,
        }
    }
}

impl ViewportOptions {
    /// Reads the `viewport.*` keys; absent or non-numeric values keep their defaults.
    pub fn from_config(config: &VerbvizConfig) -> Self {
        let defaults = Self::default();
        Self {
            zoom_step: config
                .get_f64("viewport.zoomStep")
                .unwrap_or(defaults.zoom_step),
            focus_scale: config
                .get_f64("viewport.focusScale")
                .unwrap_or(defaults.focus_scale),
            min_scale: config.get_f64("viewport.minScale"),
            max_scale: config.get_f64("viewport.maxScale"),
        }
    }

    fn clamp(&self, scale: f64) -> f64 {
        let mut scale = scale;
        if let Some(min) = self.min_scale {
            scale = scale.max(min);
        }
        if let Some(max) = self.max_scale {
            scale = scale.min(max);
        }
        scale
    }
}

#[derive(Debug, Clone)]
pub struct Viewport {
    diagram: RenderedDiagram,
    options: ViewportOptions,
    initial: Rect,
    scale: f64,
    origin: Point,
}

impl Viewport {
    /// Captures the diagram's root view box as the reset target.
    pub fn mount(diagram: RenderedDiagram, options: ViewportOptions) -> Self {
        let initial = diagram.view_box();
        Self {
            diagram,
            options,
            initial,
            scale: 1.0,
            origin: initial.origin,
        }
    }

    pub fn diagram(&self) -> &RenderedDiagram {
        &self.diagram
    }

    pub fn options(&self) -> &ViewportOptions {
        &self.options
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn initial_bounds(&self) -> Rect {
        self.initial
    }

    /// Zooms to the focus scale and centers the view on the element with `id`.
    ///
    /// Returns `false` (and changes nothing) when no such element was rendered, e.g. because its
    /// module was excluded.
    pub fn zoom_to(&mut self, id: &str) -> bool {
        let Some(bounds) = self.diagram.node_bounds(id) else {
            tracing::debug!(id, "zoom target not found in rendered diagram");
            return false;
        };
        self.scale = self.options.clamp(self.options.focus_scale);
        self.origin = bounds.center() - self.visible_size().to_vector() / 2.0;
        true
    }

    pub fn zoom_in(&mut self) {
        self.scale = self.options.clamp(self.scale + self.options.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.scale = self.options.clamp(self.scale - self.options.zoom_step);
    }

    pub fn pan_by(&mut self, delta: Vector) {
        self.origin += delta;
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.origin = self.initial.origin;
    }

    /// Visible region in diagram coordinates.
    ///
    /// A non-positive scale has no meaningful extent; the initial size is used instead.
    pub fn view_box(&self) -> Rect {
        Rect::new(self.origin, self.visible_size())
    }

    fn visible_size(&self) -> Size {
        if self.scale > 0.0 {
            self.initial.size / self.scale
        } else {
            self.initial.size
        }
    }

    /// Maps diagram coordinates to view coordinates (the initial bounds' units).
    pub fn transform(&self) -> Transform {
        Transform::translation(-self.origin.x, -self.origin.y).then_scale(self.scale, self.scale)
    }

    /// The mounted SVG with its root `viewBox` set to [`Viewport::view_box`].
    pub fn to_svg(&self) -> String {
        self.apply_to_svg(self.diagram.svg()).into_owned()
    }

    /// Rewrites (or inserts) the `viewBox` of the first `<svg>` element in `svg`.
    pub fn apply_to_svg<'a>(&self, svg: &'a str) -> Cow<'a, str> {
        let Some(root) = svg_open_tag_re().find(svg) else {
            return Cow::Borrowed(svg);
        };
        let vb = self.view_box();
        let value = format!(
            "{} {} {} {}",
            vb.origin.x, vb.origin.y, vb.size.width, vb.size.height
        );

        let tag = root.as_str();
        let new_tag = match view_box_attr_re().find(tag) {
            Some(attr) => format!(
                "{}viewBox=\"{value}\"{}",
                &tag[..attr.start()],
                &tag[attr.end()..]
            ),
            None => format!("<svg viewBox=\"{value}\"{}", &tag["<svg".len()..]),
        };

        let mut out = String::with_capacity(svg.len() + 32);
        out.push_str(&svg[..root.start()]);
        out.push_str(&new_tag);
        out.push_str(&svg[root.end()..]);
        Cow::Owned(out)
    }
}

fn svg_open_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<svg\b[^>]*>").expect("valid regex"))
}

fn view_box_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\bviewBox\s*=\s*("[^"]*"|'[^']*')"#).expect("valid regex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use verbviz_core::geom::{point, rect, vector};

    const SVG: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!-- Generated by graphviz -->
<svg width="400pt" height="300pt" viewBox="0.00 0.00 400.00 300.00" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">
<g id="graph0" class="graph" transform="translate(4 296)">
<g id="a_echo.echo"><a xlink:href=" ">
<polygon points="20,-200 120,-200 120,-180 20,-180 20,-200"/>
</a></g>
<g id="time.now"><rect x="200" y="-100" width="60" height="20"/></g>
</g>
</svg>"#;

    fn mounted() -> Viewport {
        Viewport::mount(
            RenderedDiagram::parse(SVG).unwrap(),
            ViewportOptions::default(),
        )
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn mounts_at_the_captured_bounds() {
        let vp = mounted();
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.origin(), point(0.0, 0.0));
        assert_eq!(vp.initial_bounds(), rect(0.0, 0.0, 400.0, 300.0));
        assert_eq!(vp.view_box(), vp.initial_bounds());
    }

    #[test]
    fn zoom_to_centers_the_node_box() {
        let mut vp = mounted();
        assert!(vp.zoom_to("time.now"));
        assert_eq!(vp.scale(), 2.0);
        assert_eq!(vp.origin(), point(134.0, 131.0));
        assert_eq!(vp.view_box(), rect(134.0, 131.0, 200.0, 150.0));
        let node = vp.diagram().node_bounds("time.now").unwrap();
        assert_eq!(node.center(), point(234.0, 206.0));
        assert_eq!(vp.view_box().center(), node.center());

        // Hyperlinked cells are wrapped in an `a_`-prefixed group.
        assert!(vp.zoom_to("echo.echo"));
        assert_eq!(vp.origin(), point(-26.0, 31.0));
        let node = vp.diagram().node_bounds("echo.echo").unwrap();
        assert_eq!(vp.view_box().center(), node.center());
    }

    #[test]
    fn zoom_to_centers_at_a_clamped_scale() {
        let options = ViewportOptions {
            max_scale: Some(1.25),
            ..ViewportOptions::default()
        };
        let mut vp = Viewport::mount(RenderedDiagram::parse(SVG).unwrap(), options);
        assert!(vp.zoom_to("time.now"));
        assert_eq!(vp.scale(), 1.25);
        assert_eq!(vp.view_box().size, vp.initial_bounds().size / 1.25);
        let center = vp.view_box().center();
        assert!(approx(center.x, 234.0) && approx(center.y, 206.0), "{center:?}");
    }

    #[test]
    fn zoom_to_unknown_id_is_a_no_op() {
        let mut vp = mounted();
        vp.zoom_in();
        vp.pan_by(vector(5.0, 5.0));
        let (scale, origin) = (vp.scale(), vp.origin());

        assert!(!vp.zoom_to("ghost.verb"));
        assert_eq!(vp.scale(), scale);
        assert_eq!(vp.origin(), origin);
    }

    #[test]
    fn zoom_steps_are_unbounded_by_default() {
        let mut vp = mounted();
        vp.zoom_in();
        vp.zoom_in();
        assert!(approx(vp.scale(), 1.2));
        for _ in 0..15 {
            vp.zoom_out();
        }
        assert!(vp.scale() < 0.0);
        assert_eq!(vp.view_box().size, vp.initial_bounds().size);
    }

    #[test]
    fn configured_bounds_clamp_every_zoom() {
        let mut config = VerbvizConfig::default();
        config.set_value("viewport.minScale", json!(0.5));
        config.set_value("viewport.maxScale", json!(1.5));
        let options = ViewportOptions::from_config(&config);
        assert_eq!(options.min_scale, Some(0.5));

        let mut vp = Viewport::mount(RenderedDiagram::parse(SVG).unwrap(), options);
        for _ in 0..20 {
            vp.zoom_in();
        }
        assert_eq!(vp.scale(), 1.5);
        assert!(vp.zoom_to("time.now"));
        assert_eq!(vp.scale(), 1.5);
        for _ in 0..20 {
            vp.zoom_out();
        }
        assert_eq!(vp.scale(), 0.5);
    }

    #[test]
    fn reset_restores_scale_and_origin_after_any_sequence() {
        let mut vp = mounted();
        vp.zoom_to("time.now");
        vp.zoom_out();
        vp.pan_by(vector(-30.0, 12.5));
        vp.zoom_in();
        vp.zoom_in();
        vp.reset();
        assert_eq!(vp.scale(), 1.0);
        assert_eq!(vp.origin(), vp.initial_bounds().origin);
        assert_eq!(vp.view_box(), vp.initial_bounds());
    }

    #[test]
    fn transform_maps_the_origin_to_zero() {
        let mut vp = mounted();
        vp.zoom_to("time.now");
        let t = vp.transform();
        assert_eq!(t.transform_point(point(134.0, 131.0)), point(0.0, 0.0));
        assert_eq!(t.transform_point(point(144.0, 141.0)), point(20.0, 20.0));
        // The focused node's center lands in the middle of the initial bounds.
        assert_eq!(t.transform_point(point(234.0, 206.0)), point(200.0, 150.0));
    }

    #[test]
    fn apply_rewrites_only_the_root_view_box() {
        let mut vp = mounted();
        vp.zoom_to("time.now");
        let svg = vp.to_svg();
        assert!(svg.contains(r#"viewBox="134 131 200 150""#), "{svg}");
        assert!(!svg.contains("0.00 0.00 400.00 300.00"));
        assert!(svg.contains(r#"width="400pt""#));
        assert!(svg.starts_with("<?xml"));

        let bare = r#"<svg xmlns="http://www.w3.org/2000/svg"><g/></svg>"#;
        assert_eq!(
            vp.apply_to_svg(bare),
            r#"<svg viewBox="134 131 200 150" xmlns="http://www.w3.org/2000/svg"><g/></svg>"#
        );
        assert!(matches!(vp.apply_to_svg("plain text"), Cow::Borrowed(_)));
    }
}
