//! Stylization registry.
//!
//! A closed set of raster filters that turn a grayscale photo into line art
//! the extractor can trace. The visual algorithms are intentionally loose —
//! the pipeline only requires a same-size grayscale raster back. Unknown
//! style names fall back to [`Style::Sketch`].

use image::{GrayImage, Luma};
use imageproc::contrast::{adaptive_threshold, equalize_histogram, otsu_level, threshold, ThresholdType};
use imageproc::drawing::draw_line_segment_mut;
use imageproc::edges::canny;
use imageproc::filter::{gaussian_blur_f32, laplacian_filter, median_filter};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Available stylization filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Inverted-blur dodge, the classic pencil-sketch look.
    Sketch,
    /// Canny edge outline.
    Contour,
    /// Otsu-thresholded solid silhouette.
    Silhouette,
    /// Soft edges from a median blur and Laplacian.
    Blurred,
    /// Sketch with grain and equalization.
    Pencil,
    /// Directional pen hatching at 45 and 135 degrees.
    Hatching,
    /// Outline style for polargraph-type machines.
    Makelangelo,
    /// Probabilistic stroke sampling along three directions.
    Portrait,
}

impl Style {
    pub const ALL: [Style; 8] = [
        Style::Sketch,
        Style::Contour,
        Style::Silhouette,
        Style::Blurred,
        Style::Pencil,
        Style::Hatching,
        Style::Makelangelo,
        Style::Portrait,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Style::Sketch => "sketch",
            Style::Contour => "contour",
            Style::Silhouette => "silhouette",
            Style::Blurred => "blurred",
            Style::Pencil => "pencil",
            Style::Hatching => "hatching",
            Style::Makelangelo => "makelangelo",
            Style::Portrait => "portrait",
        }
    }

    /// Look up a style by name. Unknown names fall back to `Sketch`.
    pub fn from_name(name: &str) -> Style {
        match name.trim().to_ascii_lowercase().as_str() {
            "sketch" => Style::Sketch,
            "contour" => Style::Contour,
            "silhouette" => Style::Silhouette,
            "blurred" => Style::Blurred,
            "pencil" => Style::Pencil,
            "hatching" | "pen_hatching" => Style::Hatching,
            "makelangelo" | "makelangelo5" => Style::Makelangelo,
            "portrait" => Style::Portrait,
            other => {
                tracing::debug!(style = other, "unknown style, falling back to sketch");
                Style::Sketch
            }
        }
    }

    /// Apply the filter. Always returns a raster of the same dimensions.
    pub fn apply(self, gray: &GrayImage) -> GrayImage {
        match self {
            Style::Sketch => sketch(gray),
            Style::Contour => canny(gray, 50.0, 150.0),
            Style::Silhouette => {
                let level = otsu_level(gray);
                threshold(gray, level, ThresholdType::BinaryInverted)
            }
            Style::Blurred => blurred(gray),
            Style::Pencil => pencil(gray),
            Style::Hatching => hatching(gray),
            Style::Makelangelo => makelangelo(gray),
            Style::Portrait => portrait(gray),
        }
    }
}

/// Color-dodge the image by its blurred inverse.
fn sketch(gray: &GrayImage) -> GrayImage {
    let inverted = invert(gray);
    let blurred = gaussian_blur_f32(&inverted, 5.0);
    let mut out = GrayImage::new(gray.width(), gray.height());
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let g = gray.get_pixel(x, y).0[0] as u32;
        let b = blurred.get_pixel(x, y).0[0] as u32;
        let dodged = (g * 256) / (255 - b + 1);
        *pixel = Luma([dodged.min(255) as u8]);
    }
    out
}

fn blurred(gray: &GrayImage) -> GrayImage {
    let smoothed = median_filter(gray, 3, 3);
    let edges = laplacian_filter(&smoothed);
    let mut soft = GrayImage::new(gray.width(), gray.height());
    for (x, y, pixel) in soft.enumerate_pixels_mut() {
        let v = edges.get_pixel(x, y).0[0].unsigned_abs().min(255) as u8;
        *pixel = Luma([v]);
    }
    threshold(&soft, 80, ThresholdType::BinaryInverted)
}

fn pencil(gray: &GrayImage) -> GrayImage {
    let mut base = sketch(gray);
    let mut rng = rand::thread_rng();
    for pixel in base.pixels_mut() {
        let grain: u8 = rng.gen_range(0..15);
        pixel.0[0] = pixel.0[0].saturating_add(grain);
    }
    equalize_histogram(&base)
}

fn makelangelo(gray: &GrayImage) -> GrayImage {
    let binary = threshold(&invert(gray), 128, ThresholdType::Binary);
    let mut edges = canny(&binary, 50.0, 150.0);
    let mut rng = rand::thread_rng();
    for pixel in edges.pixels_mut() {
        let grain: u8 = rng.gen_range(0..5);
        pixel.0[0] = pixel.0[0].saturating_add(grain);
    }
    edges
}

/// Convolve with two oriented line kernels and keep the stronger response,
/// then binarize adaptively into pen strokes.
fn hatching(gray: &GrayImage) -> GrayImage {
    let width = gray.width();
    let height = gray.height();
    let mut combined = vec![f32::MIN; (width * height) as usize];

    for angle_deg in [45.0f32, 135.0] {
        let kernel = hatching_kernel(angle_deg, 7);
        let responses = convolve_f32(gray, &kernel);
        for (acc, v) in combined.iter_mut().zip(responses) {
            *acc = acc.max(v);
        }
    }

    // Normalize to 0..255 and invert so strokes read as dark-on-light.
    let (min, max) = combined
        .iter()
        .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = if max > min { max - min } else { 1.0 };
    let mut normalized = GrayImage::new(width, height);
    for (i, pixel) in normalized.pixels_mut().enumerate() {
        let scaled = ((combined[i] - min) / range * 255.0) as u8;
        *pixel = Luma([255 - scaled]);
    }

    adaptive_threshold(&normalized, 5)
}

/// Weighted line kernel along `angle_deg`, zero-mean so flat regions
/// respond with zero.
fn hatching_kernel(angle_deg: f32, length: i32) -> Vec<Vec<f32>> {
    let size = (length * 2 + 1).max(7) as usize;
    let center = (size / 2) as i32;
    let mut kernel = vec![vec![0.0f32; size]; size];
    let radians = angle_deg.to_radians();

    for i in -length..=length {
        let x = center + (i as f32 * radians.cos()) as i32;
        let y = center + (i as f32 * radians.sin()) as i32;
        if x >= 0 && (x as usize) < size && y >= 0 && (y as usize) < size {
            kernel[y as usize][x as usize] = 1.0 - i.abs() as f32 / (length + 1) as f32;
        }
    }

    let sum: f32 = kernel.iter().flatten().sum();
    if sum > 0.0 {
        for v in kernel.iter_mut().flatten() {
            *v /= sum;
        }
    }
    let mean: f32 = kernel.iter().flatten().sum::<f32>() / (size * size) as f32;
    for v in kernel.iter_mut().flatten() {
        *v -= mean;
    }
    kernel
}

/// Plain clamped-border convolution with an arbitrary square kernel.
fn convolve_f32(gray: &GrayImage, kernel: &[Vec<f32>]) -> Vec<f32> {
    let width = gray.width() as i32;
    let height = gray.height() as i32;
    let k = kernel.len() as i32;
    let half = k / 2;
    let mut out = vec![0.0f32; (width * height) as usize];

    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for ky in 0..k {
                for kx in 0..k {
                    let sx = (x + kx - half).clamp(0, width - 1);
                    let sy = (y + ky - half).clamp(0, height - 1);
                    let sample = gray.get_pixel(sx as u32, sy as u32).0[0] as f32;
                    acc += sample * kernel[ky as usize][kx as usize];
                }
            }
            out[(y * width + x) as usize] = acc;
        }
    }
    out
}

/// Sample strokes along horizontal, vertical, and diagonal scan lines,
/// drawing a stroke segment wherever the (inverted) intensity is dark
/// enough and a biased coin agrees.
fn portrait(gray: &GrayImage) -> GrayImage {
    let equalized = equalize_histogram(gray);
    let inverted = invert(&equalized);
    let width = inverted.width() as i32;
    let height = inverted.height() as i32;
    let step = 3;

    let mut rng = rand::thread_rng();
    let mut strokes: Vec<Vec<(i32, i32)>> = Vec::new();

    let mut sample = |points: &mut Vec<(i32, i32)>, x: i32, y: i32| {
        let intensity = inverted.get_pixel(x as u32, y as u32).0[0];
        if intensity > 100 && rng.gen::<f32>() < intensity as f32 / 255.0 {
            points.push((x, y));
        }
    };

    for y in (0..height).step_by(step) {
        let mut line = Vec::new();
        for x in 0..width {
            sample(&mut line, x, y);
        }
        if line.len() > 2 {
            strokes.push(line);
        }
    }
    for x in (0..width).step_by(step) {
        let mut line = Vec::new();
        for y in 0..height {
            sample(&mut line, x, y);
        }
        if line.len() > 2 {
            strokes.push(line);
        }
    }
    let mut d = -height / 2;
    while d < width / 2 {
        let mut line = Vec::new();
        for x in d.max(0)..(d + height).min(width) {
            let y = x - d;
            if y >= 0 && y < height {
                sample(&mut line, x, y);
            }
        }
        if line.len() > 2 {
            strokes.push(line);
        }
        d += (step * 2) as i32;
    }

    let mut canvas = GrayImage::new(gray.width(), gray.height());
    for line in &strokes {
        for pair in line.windows(2) {
            draw_line_segment_mut(
                &mut canvas,
                (pair[0].0 as f32, pair[0].1 as f32),
                (pair[1].0 as f32, pair[1].1 as f32),
                Luma([255u8]),
            );
        }
    }
    canvas
}

/// Histogram equalization, exposed for callers that want to boost contrast
/// between stylization and extraction.
pub fn equalize(gray: &GrayImage) -> GrayImage {
    equalize_histogram(gray)
}

fn invert(gray: &GrayImage) -> GrayImage {
    let mut out = gray.clone();
    image::imageops::invert(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip_and_fallback() {
        for style in Style::ALL {
            assert_eq!(Style::from_name(style.name()), style);
        }
        assert_eq!(Style::from_name("pen_hatching"), Style::Hatching);
        assert_eq!(Style::from_name("makelangelo5"), Style::Makelangelo);
        assert_eq!(Style::from_name("no-such-style"), Style::Sketch);
    }

    #[test]
    fn test_every_style_preserves_dimensions() {
        let mut img = GrayImage::new(32, 24);
        for (x, y, p) in img.enumerate_pixels_mut() {
            p.0[0] = ((x * 7 + y * 13) % 256) as u8;
        }
        for style in Style::ALL {
            let out = style.apply(&img);
            assert_eq!(out.dimensions(), img.dimensions(), "style {:?}", style);
        }
    }

    #[test]
    fn test_silhouette_is_binary() {
        let mut img = GrayImage::new(16, 16);
        for (x, _, p) in img.enumerate_pixels_mut() {
            p.0[0] = if x < 8 { 20 } else { 230 };
        }
        let out = Style::Silhouette.apply(&img);
        assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }
}
