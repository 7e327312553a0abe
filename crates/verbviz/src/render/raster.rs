#![forbid(unsafe_code)]

use std::str::FromStr;

use crate::render::{HeadlessError, HeadlessRenderer, LayoutEngine, Viewport};
use verbviz_core::Schema;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Headless(#[from] HeadlessError),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("invalid background color: {0}")]
    Background(String),
    #[error("failed to convert SVG to PDF")]
    PdfConvert,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    /// Any SVG color (`white`, `#fff8`, `rgb(0, 0, 0)`); transparent when unset.
    pub background: Option<String>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
        }
    }
}

impl<E: LayoutEngine> HeadlessRenderer<E> {
    pub fn render_png_sync(&self, schema: &Schema, raster: &RasterOptions) -> Result<Vec<u8>> {
        let diagram = self.render_sync(schema)?;
        svg_to_png(diagram.svg(), raster)
    }

    pub fn render_pdf_sync(&self, schema: &Schema) -> Result<Vec<u8>> {
        let diagram = self.render_sync(schema)?;
        svg_to_pdf(diagram.svg())
    }
}

/// Rasterizes what the viewport currently shows.
pub fn viewport_to_png(viewport: &Viewport, options: &RasterOptions) -> Result<Vec<u8>> {
    svg_to_png(&viewport.to_svg(), options)
}

pub fn viewport_to_pdf(viewport: &Viewport) -> Result<Vec<u8>> {
    svg_to_pdf(&viewport.to_svg())
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options.scale, options.background.as_deref())?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let tree = svg2pdf::usvg::Tree::from_str(svg, &svg2pdf_options())
        .map_err(|_| RasterError::SvgParse)?;

    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|_| RasterError::PdfConvert)
}

fn usvg_options() -> usvg::Options<'static> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    // Graphviz emits Helvetica; fall back to a metric-compatible family.
    opt.font_family = "Arial".to_string();
    opt
}

fn svg2pdf_options() -> svg2pdf::usvg::Options<'static> {
    let mut opt = svg2pdf::usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();
    opt
}

fn svg_to_pixmap(svg: &str, scale: f32, background: Option<&str>) -> Result<tiny_skia::Pixmap> {
    let tree = usvg::Tree::from_str(svg, &usvg_options()).map_err(|_| RasterError::SvgParse)?;

    // `usvg` has already mapped the root viewBox onto the intrinsic size.
    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;

    if let Some(bg) = background {
        pixmap.fill(parse_color(bg)?);
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

fn parse_color(text: &str) -> Result<tiny_skia::Color> {
    let c = svgtypes::Color::from_str(text.trim())
        .map_err(|_| RasterError::Background(text.to_string()))?;
    Ok(tiny_skia::Color::from_rgba8(c.red, c.green, c.blue, c.alpha))
}
