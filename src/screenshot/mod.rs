//! Screenshot capture using xcap
//!
//! Captures the primary monitor and crops it to the target window's bounds
//! when they are known.

use async_trait::async_trait;
use image::{ImageEncoder, RgbaImage};

use crate::core::WindowBounds;

#[async_trait]
pub trait ScreenCapture: Send + Sync {
    /// PNG of `region`, or of the whole primary monitor when `None`
    async fn capture(&self, region: Option<WindowBounds>) -> anyhow::Result<Vec<u8>>;
}

/// Primary monitor capture through xcap
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapCapture;

#[async_trait]
impl ScreenCapture for XcapCapture {
    async fn capture(&self, region: Option<WindowBounds>) -> anyhow::Result<Vec<u8>> {
        // xcap is not async, so we run it in a blocking task
        let result = tokio::task::spawn_blocking(move || capture_blocking(region)).await??;
        Ok(result)
    }
}

fn capture_blocking(region: Option<WindowBounds>) -> anyhow::Result<Vec<u8>> {
    let monitors = xcap::Monitor::all()?;
    let monitor = monitors
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No monitors found"))?;

    let full_image = monitor.capture_image()?;

    let image = match region {
        Some(bounds) => {
            let monitor_area = WindowBounds::new(
                monitor.x()?,
                monitor.y()?,
                full_image.width(),
                full_image.height(),
            );
            let (x, y, width, height) = crop_rect(bounds, monitor_area)?;
            image::imageops::crop_imm(&full_image, x, y, width, height).to_image()
        }
        None => full_image,
    };

    tracing::debug!("Captured {}x{} screenshot", image.width(), image.height());
    encode_png(&image)
}

/// The part of `bounds` visible on the monitor, as monitor-local
/// `(x, y, width, height)`
fn crop_rect(bounds: WindowBounds, monitor: WindowBounds) -> anyhow::Result<(u32, u32, u32, u32)> {
    let left = i64::from(bounds.x).max(i64::from(monitor.x));
    let top = i64::from(bounds.y).max(i64::from(monitor.y));
    let right = (i64::from(bounds.x) + i64::from(bounds.width))
        .min(i64::from(monitor.x) + i64::from(monitor.width));
    let bottom = (i64::from(bounds.y) + i64::from(bounds.height))
        .min(i64::from(monitor.y) + i64::from(monitor.height));

    if right <= left || bottom <= top {
        anyhow::bail!(
            "Window at ({}, {}) {}x{} is outside the captured monitor",
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height
        );
    }

    Ok((
        (left - i64::from(monitor.x)) as u32,
        (top - i64::from(monitor.y)) as u32,
        (right - left) as u32,
        (bottom - top) as u32,
    ))
}

fn encode_png(image: &RgbaImage) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buffer);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONITOR: WindowBounds = WindowBounds {
        x: 1920,
        y: 0,
        width: 1920,
        height: 1080,
    };

    #[test]
    fn test_crop_is_monitor_local() {
        let bounds = WindowBounds::new(2020, 100, 800, 600);
        assert_eq!(crop_rect(bounds, MONITOR).unwrap(), (100, 100, 800, 600));
    }

    #[test]
    fn test_crop_shrinks_past_top_left_edge() {
        let bounds = WindowBounds::new(1870, -10, 800, 600);
        assert_eq!(crop_rect(bounds, MONITOR).unwrap(), (0, 0, 750, 590));
    }

    #[test]
    fn test_crop_shrinks_past_bottom_right_edge() {
        let bounds = WindowBounds::new(3440, 880, 800, 600);
        assert_eq!(crop_rect(bounds, MONITOR).unwrap(), (1520, 880, 400, 200));
    }

    #[test]
    fn test_crop_outside_monitor_is_error() {
        let left_of = WindowBounds::new(0, 0, 800, 600);
        let below = WindowBounds::new(2000, 1080, 800, 600);
        assert!(crop_rect(left_of, MONITOR).is_err());
        assert!(crop_rect(below, MONITOR).is_err());
    }

    #[test]
    fn test_encode_png_signature() {
        let image = RgbaImage::new(4, 3);
        let png = encode_png(&image).unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }
}
