//! Rasterisation of figures.
//!
//! Panels are laid out on the figure grid. Each panel draws its
//! collections, overlays and a vertical colorbar strip. Text (titles,
//! labels, ticks) stays on the figure model and is not rendered.

use image::{imageops, DynamicImage, ImageBuffer, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut,
    draw_polygon_mut, Blend, Canvas,
};
use imageproc::point::Point;
use imageproc::rect::Rect as PixelRect;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use crate::error::{Result, RiskmapError};
use crate::logging::log_figure_stats;

use super::axes::{Axes, Limits};
use super::collection::{Collection, CollectionKind};
use super::Figure;

const BACKGROUND: [u8; 4] = [255, 255, 255, 255];
const FRAME: [u8; 4] = [64, 64, 64, 255];
const SHAPE_LINE: [u8; 4] = [90, 90, 90, 255];
const ANNOTATION: [u8; 4] = [0, 0, 0, 255];

/// Pixel rectangle
#[derive(Debug, Clone, Copy)]
struct Rect {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Rect {
    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Maps projected coordinates into a pixel rectangle
struct Viewport {
    rect: Rect,
    limits: Limits,
}

impl Viewport {
    /// Largest rectangle inside `area` with the aspect ratio of `limits`
    fn fit(area: Rect, limits: Limits) -> Self {
        let limits = limits.padded();
        let aspect = limits.width() / limits.height();
        let (width, height) = if area.width / area.height > aspect {
            (area.height * aspect, area.height)
        } else {
            (area.width, area.width / aspect)
        };
        let rect = Rect {
            left: area.left + 0.5 * (area.width - width),
            top: area.top + 0.5 * (area.height - height),
            width,
            height,
        };
        Self { rect, limits }
    }

    fn to_pixel(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (
            self.rect.left + (x - self.limits.xmin) / self.limits.width() * self.rect.width,
            self.rect.top + (self.limits.ymax - y) / self.limits.height() * self.rect.height,
        )
    }

    /// The same mapping into a rectangle anchored at the origin
    fn local(&self) -> Self {
        Self {
            rect: Rect {
                left: 0.0,
                top: 0.0,
                ..self.rect
            },
            limits: self.limits,
        }
    }
}

fn pixel_rect(rect: &Rect) -> PixelRect {
    PixelRect::at(rect.left.round() as i32, rect.top.round() as i32).of_size(
        rect.width.round().max(1.0) as u32,
        rect.height.round().max(1.0) as u32,
    )
}

/// Fill a polygon given in pixel coordinates; polygons that collapse to
/// fewer than three pixels are drawn as a line or a dot
fn fill_polygon<C>(canvas: &mut C, points: &[(f64, f64)], color: [u8; 4])
where
    C: Canvas<Pixel = Rgba<u8>>,
{
    if color[3] == 0 {
        return;
    }

    let mut polygon: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for &(x, y) in points {
        let point = Point::new(x.round() as i32, y.round() as i32);
        if polygon.last() != Some(&point) {
            polygon.push(point);
        }
    }
    while polygon.len() > 1 && polygon.first() == polygon.last() {
        polygon.pop();
    }

    match polygon.as_slice() {
        [] => {}
        [first, last] => draw_line_segment_mut(
            canvas,
            (first.x as f32, first.y as f32),
            (last.x as f32, last.y as f32),
            Rgba(color),
        ),
        [only] => {
            let (width, height) = canvas.dimensions();
            if (0..width as i32).contains(&only.x) && (0..height as i32).contains(&only.y) {
                canvas.draw_pixel(only.x as u32, only.y as u32, Rgba(color));
            }
        }
        _ => draw_polygon_mut(canvas, &polygon, Rgba(color)),
    }
}

fn fill_circle<C>(canvas: &mut C, (cx, cy): (f64, f64), radius: f64, color: [u8; 4])
where
    C: Canvas<Pixel = Rgba<u8>>,
{
    if color[3] == 0 {
        return;
    }
    draw_filled_circle_mut(
        canvas,
        (cx.round() as i32, cy.round() as i32),
        radius.round().max(1.0) as i32,
        Rgba(color),
    );
}

fn draw_frame(img: &mut RgbaImage, rect: &Rect) {
    draw_hollow_rect_mut(img, pixel_rect(rect), Rgba(FRAME));
}

fn draw_collection(
    canvas: &mut Blend<RgbaImage>,
    collection: &Collection,
    viewport: &Viewport,
    dpi: u32,
) {
    match collection.kind() {
        CollectionKind::Scatter {
            offsets,
            marker_size,
        } => {
            // marker size is an area in points²; 72 points per inch
            let radius = 0.5 * marker_size.sqrt() * dpi as f64 / 72.0;
            for (i, &offset) in offsets.iter().enumerate() {
                let center = viewport.to_pixel(offset);
                fill_circle(canvas, center, radius, collection.color_of(i));
            }
        }
        CollectionKind::HexBin { polygons } | CollectionKind::Mesh { polygons } => {
            for (i, polygon) in polygons.iter().enumerate() {
                let pixels: Vec<(f64, f64)> =
                    polygon.iter().map(|&p| viewport.to_pixel(p)).collect();
                fill_polygon(canvas, &pixels, collection.color_of(i));
            }
        }
    }
}

fn draw_colorbar(img: &mut RgbaImage, collection: &Collection, strip: Rect) {
    let Some(colorbar) = collection.colorbar() else {
        return;
    };
    let cmap = collection.cmap();

    let bar = pixel_rect(&strip);
    let rows = bar.height() as i32;
    for row in 0..rows {
        let t = 1.0 - row as f32 / (rows - 1).max(1) as f32;
        let line = PixelRect::at(bar.left(), bar.top() + row).of_size(bar.width(), 1);
        draw_filled_rect_mut(img, line, Rgba(cmap.map_normalized(t)));
    }
    draw_frame(img, &strip);

    // Triangular caps as long as the strip is wide
    let cap = strip.width;
    let mid = strip.left + 0.5 * strip.width;
    if colorbar.extend().extends_max() {
        let triangle = [(strip.left, strip.top), (strip.right(), strip.top), (mid, strip.top - cap)];
        fill_polygon(img, &triangle, cmap.map_normalized(1.0));
    }
    if colorbar.extend().extends_min() {
        let triangle = [
            (strip.left, strip.bottom()),
            (strip.right(), strip.bottom()),
            (mid, strip.bottom() + cap),
        ];
        fill_polygon(img, &triangle, cmap.map_normalized(0.0));
    }
}

/// Area of a figure cell kept for the map; the rest holds title and colorbar
fn map_area(cell: Rect) -> Rect {
    Rect {
        left: cell.left + 0.06 * cell.width,
        top: cell.top + 0.10 * cell.height,
        width: 0.76 * cell.width,
        height: 0.84 * cell.height,
    }
}

fn draw_axes(img: &mut RgbaImage, axes: &Axes, cell: Rect, dpi: u32) {
    let map_area = map_area(cell);
    let Some(limits) = axes.limits() else {
        draw_frame(img, &map_area);
        return;
    };
    let viewport = Viewport::fit(map_area, limits);

    // Everything inside the map is drawn on its own canvas, which clips it
    let local = viewport.local();
    let (width, height) = (
        local.rect.width.round().max(1.0) as u32,
        local.rect.height.round().max(1.0) as u32,
    );
    let mut panel = Blend(RgbaImage::from_pixel(width, height, Rgba(BACKGROUND)));

    for collection in axes.collections() {
        draw_collection(&mut panel, collection, &local, dpi);
    }

    for line in axes.shape_lines() {
        for pair in line.windows(2) {
            let (x0, y0) = local.to_pixel(pair[0]);
            let (x1, y1) = local.to_pixel(pair[1]);
            draw_line_segment_mut(
                &mut panel,
                (x0 as f32, y0 as f32),
                (x1 as f32, y1 as f32),
                Rgba(SHAPE_LINE),
            );
        }
    }

    for annotation in axes.annotations() {
        let center = local.to_pixel((annotation.x, annotation.y));
        fill_circle(&mut panel, center, 1.5, ANNOTATION);
    }

    imageops::replace(
        img,
        &panel.0,
        viewport.rect.left.round() as i64,
        viewport.rect.top.round() as i64,
    );
    draw_frame(img, &viewport.rect);

    if let Some(collection) = axes.collections().iter().find(|c| c.colorbar().is_some()) {
        let cap = 0.045 * cell.width;
        let strip = Rect {
            left: viewport.rect.right() + 0.03 * cell.width,
            top: viewport.rect.top + cap,
            width: cap,
            height: (viewport.rect.height - 2.0 * cap).max(1.0),
        };
        draw_colorbar(img, collection, strip);
    }
}

/// Rasterise all panels of a figure
pub fn render_figure(figure: &Figure) -> Result<RgbaImage> {
    let start = Instant::now();
    let (width, height) = figure.pixel_size();
    let (nrows, ncols) = figure.grid();

    let mut img: RgbaImage = ImageBuffer::from_pixel(width, height, Rgba(BACKGROUND));
    let cell_width = width as f64 / ncols as f64;
    let cell_height = height as f64 / nrows as f64;

    let mut points = 0;
    for (i, axes) in figure.axes().iter().enumerate() {
        let cell = Rect {
            left: (i % ncols) as f64 * cell_width,
            top: (i / ncols) as f64 * cell_height,
            width: cell_width,
            height: cell_height,
        };
        draw_axes(&mut img, axes, cell, figure.dpi());
        points += axes
            .collections()
            .iter()
            .map(|c| c.kind().len())
            .sum::<usize>();
    }

    debug!(
        duration_ms = start.elapsed().as_millis() as u64,
        "Figure rasterised"
    );
    log_figure_stats("render", figure.axes().len(), points, width, height);
    Ok(img)
}

/// Encode a figure to PNG or JPEG depending on the file extension
pub fn save_figure(figure: &Figure, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let format = match extension.as_str() {
        "png" => ImageFormat::Png,
        "jpg" | "jpeg" => ImageFormat::Jpeg,
        other => {
            return Err(RiskmapError::ImageGeneration {
                message: format!("Unsupported output format '{}'; use png or jpeg", other),
            })
        }
    };

    let img = figure.render()?;
    let result = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(img)
            .to_rgb8()
            .save_with_format(path, format),
        _ => img.save_with_format(path, format),
    };
    result.map_err(|e| RiskmapError::ImageGeneration {
        message: format!("Failed to encode {}: {}", path.display(), e),
    })?;

    debug!(path = %path.display(), "Figure saved");
    Ok(())
}
