//! Image transcoding pipeline.
//!
//! Decodes fetched bytes, resizes to the exact target resolution, and
//! re-encodes. Static images get the high-quality Lanczos3 filter; animated
//! GIFs resize every frame with Nearest, trading smoothing for throughput
//! across up to [`MAX_ANIMATED_FRAMES`] resize operations per request.
//! Aspect ratio is never preserved: output dimensions always equal the
//! requested resolution.

use std::io::Cursor;

use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::imageops::FilterType;
use image::{AnimationDecoder, Delay, DynamicImage, Frame, ImageFormat, RgbImage};
use tracing::debug;

use crate::domain::entities::{ImageAsset, ImageKind, ResizeOutcome, TargetResolution};
use crate::domain::errors::TranscodeError;

/// Hard cap on retained animation frames. Frames beyond it are dropped;
/// a memory bound, not an error condition.
pub const MAX_ANIMATED_FRAMES: usize = 50;

/// Frame duration applied when the source encodes none.
const DEFAULT_FRAME_DELAY_MS: u32 = 100;

/// GIF encoder speed (1 = best quality, 30 = fastest).
const GIF_ENCODE_SPEED: i32 = 10;

/// Probes raw bytes for container format and animation.
///
/// The declared format falls back to JPEG when the decoder reports nothing
/// usable. An asset is animated only when it is a GIF with more than one
/// frame; the reported frame count is already capped at
/// [`MAX_ANIMATED_FRAMES`].
///
/// # Errors
/// Returns [`TranscodeError::Decode`] if a GIF's frame stream is corrupt.
pub fn probe(bytes: &[u8]) -> Result<ImageAsset, TranscodeError> {
    let kind = declared_kind(bytes);
    if kind == ImageKind::Gif {
        let frames = decode_gif_frames(bytes)?;
        if frames.len() > 1 {
            return Ok(ImageAsset::animated(frames.len()));
        }
    }
    Ok(ImageAsset::still(kind))
}

/// Transcodes `bytes` to an asset of exactly `resolution`.
///
/// The input bytes are never mutated; all work happens on decoded copies.
///
/// # Errors
/// Returns [`TranscodeError::Decode`] when the bytes do not parse as a
/// supported image and [`TranscodeError::Encode`] when re-encoding fails.
pub fn transcode(
    bytes: &[u8],
    resolution: TargetResolution,
) -> Result<ResizeOutcome, TranscodeError> {
    let kind = declared_kind(bytes);

    if kind == ImageKind::Gif {
        let frames = decode_gif_frames(bytes)?;
        if frames.len() > 1 {
            debug!(frames = frames.len(), "Transcoding animated asset");
            return transcode_animated(frames, resolution);
        }
    }

    transcode_still(bytes, kind, resolution)
}

/// Container format from the magic bytes, JPEG when undetectable.
fn declared_kind(bytes: &[u8]) -> ImageKind {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => ImageKind::Png,
        Ok(ImageFormat::Gif) => ImageKind::Gif,
        Ok(ImageFormat::WebP) => ImageKind::WebP,
        _ => ImageKind::Jpeg,
    }
}

/// Decodes GIF frames in order, dropping everything past the cap.
fn decode_gif_frames(bytes: &[u8]) -> Result<Vec<Frame>, TranscodeError> {
    let decoder = GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| TranscodeError::decode(e.to_string()))?;

    decoder
        .into_frames()
        .take(MAX_ANIMATED_FRAMES)
        .collect::<image::ImageResult<Vec<_>>>()
        .map_err(|e| TranscodeError::decode(e.to_string()))
}

fn transcode_animated(
    frames: Vec<Frame>,
    resolution: TargetResolution,
) -> Result<ResizeOutcome, TranscodeError> {
    let (width, height) = resolution.dimensions();

    let resized: Vec<Frame> = frames
        .into_iter()
        .map(|frame| {
            let delay = effective_delay(frame.delay());
            let buffer = image::imageops::resize(frame.buffer(), width, height, FilterType::Nearest);
            Frame::from_parts(buffer, 0, 0, delay)
        })
        .collect();

    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut out, GIF_ENCODE_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| TranscodeError::encode(e.to_string()))?;
        encoder
            .encode_frames(resized)
            .map_err(|e| TranscodeError::encode(e.to_string()))?;
    }

    Ok(ResizeOutcome::new(out, ImageKind::Gif))
}

fn transcode_still(
    bytes: &[u8],
    kind: ImageKind,
    resolution: TargetResolution,
) -> Result<ResizeOutcome, TranscodeError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| TranscodeError::decode(e.to_string()))?;

    let (width, height) = resolution.dimensions();

    // Alpha-carrying stills (transparent PNGs, palette GIFs) are matted
    // onto opaque white and delivered as JPEG.
    let (image, out_kind) = if decoded.color().has_alpha() {
        (
            DynamicImage::ImageRgb8(flatten_onto_white(&decoded)),
            ImageKind::Jpeg,
        )
    } else {
        (decoded, kind)
    };

    let resized = image.resize_exact(width, height, FilterType::Lanczos3);

    let mut cursor = Cursor::new(Vec::new());
    resized
        .write_to(&mut cursor, encode_format(out_kind))
        .map_err(|e| TranscodeError::encode(e.to_string()))?;

    Ok(ResizeOutcome::new(cursor.into_inner(), out_kind))
}

const fn encode_format(kind: ImageKind) -> ImageFormat {
    match kind {
        ImageKind::Jpeg => ImageFormat::Jpeg,
        ImageKind::Png => ImageFormat::Png,
        ImageKind::Gif => ImageFormat::Gif,
        ImageKind::WebP => ImageFormat::WebP,
    }
}

/// Composites the image over opaque white using its alpha channel.
fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut flat = RgbImage::new(rgba.width(), rgba.height());

    for (dst, src) in flat.pixels_mut().zip(rgba.pixels()) {
        let alpha = u16::from(src[3]);
        for channel in 0..3 {
            let blended = (u16::from(src[channel]) * alpha + 255 * (255 - alpha)) / 255;
            dst[channel] = u8::try_from(blended).unwrap_or(u8::MAX);
        }
    }

    flat
}

/// Substitutes the default duration when the source encodes none.
fn effective_delay(delay: Delay) -> Delay {
    let (numer, _) = delay.numer_denom_ms();
    if numer == 0 {
        Delay::from_numer_denom_ms(DEFAULT_FRAME_DELAY_MS, 1)
    } else {
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};
    use test_case::test_case;

    fn encode_still(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        image.write_to(&mut cursor, format).expect("encode fixture");
        cursor.into_inner()
    }

    fn opaque_jpeg(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([90, 120, 60])));
        encode_still(&image, ImageFormat::Jpeg)
    }

    fn animated_gif(frame_count: usize, delay_ms: u32) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut out, 30);
            encoder.set_repeat(Repeat::Infinite).expect("repeat");
            let frames = (0..frame_count).map(|i| {
                #[allow(clippy::cast_possible_truncation)]
                let shade = (i % 256) as u8;
                let buffer = RgbaImage::from_pixel(4, 4, Rgba([shade, 0, 0, 255]));
                Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1))
            });
            encoder.encode_frames(frames).expect("encode fixture");
        }
        out
    }

    fn output_frames(outcome: &ResizeOutcome) -> Vec<Frame> {
        let decoder = GifDecoder::new(Cursor::new(&outcome.bytes[..])).expect("decode output");
        decoder
            .into_frames()
            .collect::<image::ImageResult<Vec<_>>>()
            .expect("collect frames")
    }

    #[test_case(TargetResolution::Small; "small target")]
    #[test_case(TargetResolution::Medium; "medium target")]
    #[test_case(TargetResolution::Large; "large target")]
    fn test_still_output_dimensions_exact(resolution: TargetResolution) {
        let outcome = transcode(&opaque_jpeg(600, 400), resolution).expect("transcode");
        let output = image::load_from_memory(&outcome.bytes).expect("decode output");

        assert_eq!(output.width(), resolution.width());
        assert_eq!(output.height(), resolution.height());
    }

    #[test]
    fn test_opaque_jpeg_stays_jpeg() {
        let outcome = transcode(&opaque_jpeg(600, 400), TargetResolution::Medium).expect("transcode");

        assert_eq!(outcome.format, ImageKind::Jpeg);
        assert_eq!(outcome.filename, "resized.jpg");
        assert_eq!(image::guess_format(&outcome.bytes).expect("guess"), ImageFormat::Jpeg);
    }

    #[test]
    fn test_aspect_ratio_not_preserved() {
        // A tall input still lands on the exact wide target.
        let outcome = transcode(&opaque_jpeg(100, 900), TargetResolution::Small).expect("transcode");
        let output = image::load_from_memory(&outcome.bytes).expect("decode output");
        assert_eq!((output.width(), output.height()), (240, 135));
    }

    #[test]
    fn test_opaque_rgb_png_stays_png() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([10, 200, 30])));
        let bytes = encode_still(&image, ImageFormat::Png);

        let outcome = transcode(&bytes, TargetResolution::Large).expect("transcode");
        assert_eq!(outcome.format, ImageKind::Png);
        assert_eq!(outcome.filename, "resized.png");
    }

    #[test]
    fn test_transparent_png_flattened_to_white_jpeg() {
        // Fully transparent image: every output pixel must matte to white.
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 0])));
        let bytes = encode_still(&image, ImageFormat::Png);

        let outcome = transcode(&bytes, TargetResolution::Small).expect("transcode");
        assert_eq!(outcome.format, ImageKind::Jpeg);
        assert_eq!(outcome.filename, "resized.jpg");

        let output = image::load_from_memory(&outcome.bytes).expect("decode output").to_rgb8();
        for pixel in output.pixels() {
            // JPEG is lossy; allow a small tolerance around pure white.
            assert!(pixel[0] > 240 && pixel[1] > 240 && pixel[2] > 240, "pixel {pixel:?} is not white");
        }
    }

    #[test]
    fn test_flatten_blends_partial_alpha() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 127])));
        let flat = flatten_onto_white(&image);
        // Half-transparent black over white lands mid-gray.
        let pixel = flat.get_pixel(0, 0);
        assert!(pixel[0] > 120 && pixel[0] < 136, "got {pixel:?}");
    }

    #[test]
    fn test_animated_frame_count_preserved_under_cap() {
        let outcome = transcode(&animated_gif(8, 100), TargetResolution::Small).expect("transcode");

        assert_eq!(outcome.format, ImageKind::Gif);
        assert_eq!(outcome.filename, "resized.gif");

        let frames = output_frames(&outcome);
        assert_eq!(frames.len(), 8);
        for frame in &frames {
            assert_eq!(frame.buffer().width(), 240);
            assert_eq!(frame.buffer().height(), 135);
        }
    }

    #[test]
    fn test_animated_frames_capped_at_fifty() {
        let outcome = transcode(&animated_gif(60, 50), TargetResolution::Small).expect("transcode");
        assert_eq!(output_frames(&outcome).len(), MAX_ANIMATED_FRAMES);
    }

    #[test]
    fn test_frame_delay_preserved() {
        let outcome = transcode(&animated_gif(3, 200), TargetResolution::Small).expect("transcode");
        for frame in output_frames(&outcome) {
            let (numer, denom) = frame.delay().numer_denom_ms();
            assert_eq!(numer / denom, 200);
        }
    }

    #[test]
    fn test_missing_delay_defaults_to_100ms() {
        let outcome = transcode(&animated_gif(3, 0), TargetResolution::Small).expect("transcode");
        for frame in output_frames(&outcome) {
            let (numer, denom) = frame.delay().numer_denom_ms();
            assert_eq!(numer / denom, DEFAULT_FRAME_DELAY_MS);
        }
    }

    #[test]
    fn test_probe_animated() {
        let asset = probe(&animated_gif(5, 100)).expect("probe");
        assert!(asset.is_animated);
        assert_eq!(asset.frame_count, 5);
        assert_eq!(asset.kind, ImageKind::Gif);
    }

    #[test]
    fn test_probe_still_and_fallback() {
        let asset = probe(&opaque_jpeg(8, 8)).expect("probe");
        assert!(!asset.is_animated);
        assert_eq!(asset.kind, ImageKind::Jpeg);

        // Unrecognizable bytes fall back to the JPEG kind at probe time.
        let asset = probe(b"not an image at all").expect("probe");
        assert_eq!(asset.kind, ImageKind::Jpeg);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = transcode(b"definitely not an image", TargetResolution::Small)
            .expect_err("should fail");
        assert!(matches!(err, TranscodeError::Decode { .. }));
    }
}
