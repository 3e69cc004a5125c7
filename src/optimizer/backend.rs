//! Codec backend. The batch only talks to [`ImageBackend`]; [`ImageCrateBackend`] is the
//! production implementation: `image` decodes, resizes and writes JPEG/PNG, `webp`
//! (libwebp) writes lossy WebP at the configured quality.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::DynamicImage;
use crate::optimizer::{OptimizeError, OptimizeResult, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions { pub width: u32, pub height: u32 }

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}x{}", self.width, self.height) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeParams {
    pub format: OutputFormat,
    pub quality: u8,
    pub max_width: u32,
    pub max_height: u32,
}

#[derive(Debug, Clone)]
pub struct Transcoded {
    pub bytes: Vec<u8>,
    pub source: Dimensions,
    pub output: Dimensions,
}

pub trait ImageBackend: Send + Sync {
    /// Decodes `bytes`, shrinks the picture into the bounding box and re-encodes it.
    fn transcode(&self, bytes: &[u8], params: &TranscodeParams) -> OptimizeResult<Transcoded>;
}

/// Largest size that fits inside `max_width` x `max_height` keeping the aspect ratio.
/// Pictures already inside the box keep their size.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || (width <= max_width && height <= max_height) {
        return (width, height);
    }
    let scale = (f64::from(max_width) / f64::from(width)).min(f64::from(max_height) / f64::from(height));
    let w = (f64::from(width) * scale).round().max(1.0) as u32;
    let h = (f64::from(height) * scale).round().max(1.0) as u32;
    (w.min(max_width), h.min(max_height))
}

/// Lossy WebP at `quality` (1-100). Pictures with transparency keep their alpha channel.
fn encode_webp(img: &DynamicImage, quality: u8) -> OptimizeResult<Vec<u8>> {
    let (width, height) = (img.width(), img.height());
    let encoded = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), width, height).encode_simple(false, f32::from(quality))
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), width, height).encode_simple(false, f32::from(quality))
    };
    encoded.map(|memory| memory.to_vec()).map_err(|e| OptimizeError::encode(format!("WebP: {:?}", e)))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateBackend;

impl ImageBackend for ImageCrateBackend {
    fn transcode(&self, bytes: &[u8], params: &TranscodeParams) -> OptimizeResult<Transcoded> {
        let img = image::load_from_memory(bytes).map_err(|e| OptimizeError::decode(e.to_string()))?;
        let source = Dimensions { width: img.width(), height: img.height() };
        let (width, height) = fit_within(source.width, source.height, params.max_width, params.max_height);
        let img = if (width, height) == (source.width, source.height) { img } else { img.resize_exact(width, height, FilterType::Lanczos3) };

        let encode_error = |e: image::ImageError| OptimizeError::encode(e.to_string());
        let out = match params.format {
            OutputFormat::WebP => encode_webp(&img, params.quality)?,
            OutputFormat::Jpeg => {
                let mut out = Vec::new();
                DynamicImage::ImageRgb8(img.to_rgb8())
                    .write_with_encoder(JpegEncoder::new_with_quality(&mut out, params.quality))
                    .map_err(encode_error)?;
                out
            }
            OutputFormat::Png => {
                let mut out = Vec::new();
                img.write_with_encoder(PngEncoder::new_with_quality(&mut out, CompressionType::Best, PngFilter::Adaptive))
                    .map_err(encode_error)?;
                out
            }
        };
        Ok(Transcoded { bytes: out, source, output: Dimensions { width, height } })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 255) as u8, (y % 255) as u8, 90]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn params(format: OutputFormat) -> TranscodeParams {
        TranscodeParams { format, quality: 80, max_width: 40, max_height: 30 }
    }

    #[test]
    fn test_fit_within_keeps_aspect_ratio() {
        assert_eq!(fit_within(1600, 1200, 800, 600), (800, 600));
        assert_eq!(fit_within(1000, 1000, 800, 600), (600, 600));
        assert_eq!(fit_within(2000, 500, 800, 600), (800, 200));
    }

    #[test]
    fn test_fit_within_never_upscales() {
        assert_eq!(fit_within(320, 240, 800, 600), (320, 240));
        assert_eq!(fit_within(800, 600, 800, 600), (800, 600));
    }

    #[test]
    fn test_transcode_to_webp_resizes() {
        let out = ImageCrateBackend.transcode(&png_bytes(80, 60), &params(OutputFormat::WebP)).unwrap();
        assert_eq!(out.source, Dimensions { width: 80, height: 60 });
        assert_eq!(out.output, Dimensions { width: 40, height: 30 });
        assert_eq!(image::guess_format(&out.bytes).unwrap(), ImageFormat::WebP);
    }

    #[test]
    fn test_transcode_to_jpeg() {
        let out = ImageCrateBackend.transcode(&png_bytes(20, 10), &params(OutputFormat::Jpeg)).unwrap();
        assert_eq!(out.output, Dimensions { width: 20, height: 10 });
        assert_eq!(image::guess_format(&out.bytes).unwrap(), ImageFormat::Jpeg);
    }

    /// Smooth gradient with pixel noise, which compresses roughly like a photo.
    fn photo_jpeg(width: u32, height: u32) -> Vec<u8> {
        let mut seed: u32 = 0x2545_f491;
        let img = RgbImage::from_fn(width, height, |x, y| {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let noise = (seed >> 16) % 17;
            Rgb([
                ((x * 200 / width) + noise) as u8,
                ((y * 180 / height) + noise) as u8,
                (((x + y) * 120 / (width + height)) + noise) as u8,
            ])
        });
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, 95).encode_image(&img).unwrap();
        out
    }

    #[test]
    fn test_webp_quality_controls_size() {
        let source = photo_jpeg(320, 240);
        let box_params = |quality| TranscodeParams { format: OutputFormat::WebP, quality, max_width: 800, max_height: 600 };
        let low = ImageCrateBackend.transcode(&source, &box_params(10)).unwrap();
        let high = ImageCrateBackend.transcode(&source, &box_params(95)).unwrap();
        assert_eq!(image::guess_format(&low.bytes).unwrap(), ImageFormat::WebP);
        assert!(low.bytes.len() < high.bytes.len(), "q10={} q95={}", low.bytes.len(), high.bytes.len());
    }

    #[test]
    fn test_photo_jpeg_shrinks_as_webp() {
        let source = photo_jpeg(320, 240);
        let params = TranscodeParams { format: OutputFormat::WebP, quality: 80, max_width: 800, max_height: 600 };
        let out = ImageCrateBackend.transcode(&source, &params).unwrap();
        assert_eq!(out.output, Dimensions { width: 320, height: 240 });
        assert!(out.bytes.len() < source.len(), "source={} webp={}", source.len(), out.bytes.len());
    }

    #[test]
    fn test_transparent_png_keeps_alpha_in_webp() {
        let img = image::RgbaImage::from_fn(16, 16, |x, _| image::Rgba([200, 40, 40, if x < 8 { 0 } else { 255 }]));
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, ImageFormat::Png).unwrap();
        let out = ImageCrateBackend.transcode(png.get_ref(), &params(OutputFormat::WebP)).unwrap();
        assert!(image::load_from_memory(&out.bytes).unwrap().color().has_alpha());
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = ImageCrateBackend.transcode(b"definitely not an image", &params(OutputFormat::WebP)).unwrap_err();
        assert!(matches!(err, OptimizeError::Decode(_)));
    }
}
