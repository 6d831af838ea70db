//! File export: SVG text plus raster/vector conversion via pure-Rust
//! backends (resvg/tiny-skia for pixels, svg2pdf for PDF, image for the
//! remaining raster codecs).

use crate::{
    Canvas, CohortStep, FlowRenderOptions, SurfaceTarget, SvgRenderOptions, render_canvas_svg,
    render_flow_diagram,
};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Flow(#[from] crate::FlowError),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("JPG rendering requires an opaque canvas background")]
    JpegOpaqueBackgroundRequired,
    #[error("failed to encode JPG")]
    JpegEncode,
    #[error("failed to encode TIFF")]
    TiffEncode,
    #[error("failed to encode WebP")]
    WebpEncode,
    #[error("failed to convert SVG to PDF")]
    PdfConvert,
    #[error("no pure-Rust encoder for '{format}' output")]
    UnsupportedFormat { format: &'static str },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RasterError>;

/// Output format tokens. The full matplotlib-era token set parses; `ps`,
/// `eps` and `pgf` have no pure-Rust encoder and fail at encode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Svg,
    Pdf,
    Ps,
    Eps,
    Jpeg,
    Tiff,
    Webp,
    Pgf,
    Raw,
}

impl FromStr for ExportFormat {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            "ps" => Ok(Self::Ps),
            "eps" => Ok(Self::Eps),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "tif" | "tiff" => Ok(Self::Tiff),
            "webp" => Ok(Self::Webp),
            "pgf" => Ok(Self::Pgf),
            "raw" | "rgba" => Ok(Self::Raw),
            _ => Err(()),
        }
    }
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
            Self::Ps => "ps",
            Self::Eps => "eps",
            Self::Jpeg => "jpg",
            Self::Tiff => "tif",
            Self::Webp => "webp",
            Self::Pgf => "pgf",
            Self::Raw => "raw",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RasterOptions {
    /// Pixmap scale override; defaults to the canvas `dpi / 96`.
    pub scale: Option<f32>,
    pub jpeg_quality: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: None,
            jpeg_quality: 90,
        }
    }
}

fn canvas_scale(canvas: &Canvas, options: &RasterOptions) -> f32 {
    options.scale.unwrap_or(canvas.dpi() as f32 / 96.0)
}

pub fn canvas_to_svg(canvas: &Canvas) -> String {
    render_canvas_svg(canvas, &SvgRenderOptions::default())
}

fn svg_to_pixmap(svg: &str, scale: f32) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    // Keep output stable-ish across environments while still using system fonts.
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;
    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

pub fn canvas_to_png(canvas: &Canvas, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(&canvas_to_svg(canvas), canvas_scale(canvas, options))?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

pub fn canvas_to_jpeg(canvas: &Canvas, options: &RasterOptions) -> Result<Vec<u8>> {
    if canvas.background_alpha() < 1.0 {
        return Err(RasterError::JpegOpaqueBackgroundRequired);
    }
    let pixmap = svg_to_pixmap(&canvas_to_svg(canvas), canvas_scale(canvas, options))?;
    let (w, h) = (pixmap.width(), pixmap.height());

    // tiny-skia renders into an RGBA8 buffer. The canvas background is opaque
    // here, so the alpha channel is always 255 and can be dropped.
    let rgba = pixmap.data();
    let mut rgb = vec![0u8; (w as usize) * (h as usize) * 3];
    for (src, dst) in rgba.chunks_exact(4).zip(rgb.chunks_exact_mut(3)) {
        dst[0] = src[0];
        dst[1] = src[1];
        dst[2] = src[2];
    }

    let mut out = Vec::new();
    let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, options.jpeg_quality);
    enc.encode(&rgb, w, h, image::ExtendedColorType::Rgb8)
        .map_err(|_| RasterError::JpegEncode)?;
    Ok(out)
}

pub fn canvas_to_tiff(canvas: &Canvas, options: &RasterOptions) -> Result<Vec<u8>> {
    use image::ImageEncoder as _;
    let pixmap = svg_to_pixmap(&canvas_to_svg(canvas), canvas_scale(canvas, options))?;
    let mut cursor = Cursor::new(Vec::new());
    image::codecs::tiff::TiffEncoder::new(&mut cursor)
        .write_image(
            pixmap.data(),
            pixmap.width(),
            pixmap.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|_| RasterError::TiffEncode)?;
    Ok(cursor.into_inner())
}

pub fn canvas_to_webp(canvas: &Canvas, options: &RasterOptions) -> Result<Vec<u8>> {
    use image::ImageEncoder as _;
    let pixmap = svg_to_pixmap(&canvas_to_svg(canvas), canvas_scale(canvas, options))?;
    let mut out = Vec::new();
    image::codecs::webp::WebPEncoder::new_lossless(&mut out)
        .write_image(
            pixmap.data(),
            pixmap.width(),
            pixmap.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|_| RasterError::WebpEncode)?;
    Ok(out)
}

/// Raw RGBA8 pixel buffer at the canvas raster scale.
pub fn canvas_to_raw(canvas: &Canvas, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(&canvas_to_svg(canvas), canvas_scale(canvas, options))?;
    Ok(pixmap.data().to_vec())
}

pub fn canvas_to_pdf(canvas: &Canvas) -> Result<Vec<u8>> {
    let mut opt = svg2pdf::usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "Arial".to_string();

    let tree = svg2pdf::usvg::Tree::from_str(&canvas_to_svg(canvas), &opt)
        .map_err(|_| RasterError::SvgParse)?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|_| RasterError::PdfConvert)
}

fn encode(canvas: &Canvas, format: ExportFormat, options: &RasterOptions) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Svg => Ok(canvas_to_svg(canvas).into_bytes()),
        ExportFormat::Png => canvas_to_png(canvas, options),
        ExportFormat::Jpeg => canvas_to_jpeg(canvas, options),
        ExportFormat::Tiff => canvas_to_tiff(canvas, options),
        ExportFormat::Webp => canvas_to_webp(canvas, options),
        ExportFormat::Raw => canvas_to_raw(canvas, options),
        ExportFormat::Pdf => canvas_to_pdf(canvas),
        ExportFormat::Ps => Err(RasterError::UnsupportedFormat { format: "ps" }),
        ExportFormat::Eps => Err(RasterError::UnsupportedFormat { format: "eps" }),
        ExportFormat::Pgf => Err(RasterError::UnsupportedFormat { format: "pgf" }),
    }
}

/// Writes `<basename>.<format>` under `dir` for every requested format, each
/// an independent artifact. Returns the written paths in request order.
pub fn save_figure(
    canvas: &Canvas,
    dir: Option<&Path>,
    basename: &str,
    formats: &[ExportFormat],
    options: &RasterOptions,
) -> Result<Vec<PathBuf>> {
    let dir = dir.unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(formats.len());
    for format in formats {
        let bytes = encode(canvas, *format, options)?;
        let path = dir.join(format!("{basename}.{}", format.extension()));
        std::fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), "saved figure");
        written.push(path);
    }
    Ok(written)
}

/// One-shot render + PNG encode for owned-canvas callers.
pub fn render_flow_png(
    steps: &[CohortStep],
    flow_options: &FlowRenderOptions,
    raster_options: &RasterOptions,
) -> Result<Vec<u8>> {
    let rendered = render_flow_diagram(steps, SurfaceTarget::Owned, flow_options)?;
    canvas_to_png(&rendered.canvas, raster_options)
}

/// One-shot render + PDF conversion for owned-canvas callers.
pub fn render_flow_pdf(steps: &[CohortStep], flow_options: &FlowRenderOptions) -> Result<Vec<u8>> {
    let rendered = render_flow_diagram(steps, SurfaceTarget::Owned, flow_options)?;
    canvas_to_pdf(&rendered.canvas)
}
