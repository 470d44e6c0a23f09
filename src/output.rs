//! # Output Module
//!
//! Writes rendered RGBA images:
//! - PNG: 8-bit, sRGB-encoded, clamped to [0, 1], alpha kept as coverage
//! - EXR: linear 32-bit float RGBA with no tone mapping
//! - TEV: live preview over TCP in The EXR Viewer
//!
//! The evaluator's colors are unbounded; clamping happens only here, in the
//! PNG path.

use std::net::TcpStream;
use std::path::Path;

use anyhow::{bail, Context, Result};
use exr::prelude::write_rgba_file;
use image::{ImageBuffer, Rgba};
use log::{debug, info, warn};
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};

use crate::camera::RenderImage;

/// Default TEV port when the address has none.
const TEV_PORT: u16 = 14158;

/// Linear to sRGB transfer function on a value already clamped to [0, 1].
fn linear_to_srgb(linear: f32) -> f32 {
    if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Quantize a linear RGBA image to 8-bit sRGB. Alpha is not gamma encoded.
pub fn to_srgb8(image: &RenderImage) -> ImageBuffer<Rgba<u8>, Vec<u8>> {
    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y);
        let quantize = |v: f32| (v * 255.0).round() as u8;
        let encode = |v: f32| quantize(linear_to_srgb(v.clamp(0.0, 1.0)));
        Rgba([
            encode(pixel[0]),
            encode(pixel[1]),
            encode(pixel[2]),
            quantize(pixel[3].clamp(0.0, 1.0)),
        ])
    })
}

/// Save as 8-bit sRGB PNG with alpha.
pub fn save_image_as_png(image: &RenderImage, output_path: &Path) -> Result<()> {
    to_srgb8(image)
        .save(output_path)
        .with_context(|| format!("failed to save PNG {}", output_path.display()))?;
    info!("Image saved as {}", output_path.display());
    Ok(())
}

/// Save as linear HDR EXR with alpha.
pub fn save_image_as_exr(image: &RenderImage, output_path: &Path) -> Result<()> {
    write_rgba_file(output_path, image.width() as usize, image.height() as usize, |x, y| {
        let p = image.get_pixel(x as u32, y as u32);
        (p[0], p[1], p[2], p[3])
    })
    .with_context(|| format!("failed to save EXR {}", output_path.display()))?;
    info!("HDR image saved as EXR: {}", output_path.display());
    Ok(())
}

/// Image file formats the renderer can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// 8-bit sRGB PNG
    Png,
    /// Linear float EXR
    Exr,
}

impl OutputFormat {
    /// Pick the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "png" => Ok(OutputFormat::Png),
            "exr" => Ok(OutputFormat::Exr),
            other => bail!(
                "unsupported output extension '{}', only .png and .exr are supported",
                other
            ),
        }
    }
}

/// Save in the format given by the file extension.
pub fn save_image(image: &RenderImage, output_path: &Path) -> Result<()> {
    match OutputFormat::from_path(output_path)? {
        OutputFormat::Png => save_image_as_png(image, output_path),
        OutputFormat::Exr => save_image_as_exr(image, output_path),
    }
}

/// Append the default TEV port when `address` has none.
fn tev_address(address: &str) -> String {
    if address.contains(':') {
        address.to_string()
    } else {
        format!("{}:{}", address, TEV_PORT)
    }
}

/// Send the image to a running TEV instance.
///
/// Preview is best-effort: connection or protocol failures are logged as
/// warnings and do not fail the render.
pub fn send_image_to_tev(image: &RenderImage, address: &str, image_name: &str) {
    let address = tev_address(address);
    debug!("Attempting to connect to TEV at {}", address);

    let stream = match TcpStream::connect(&address) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Failed to connect to TEV on {}: {}", address, e);
            return;
        }
    };
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Failed to set TCP_NODELAY: {}", e);
    }
    let mut client = TevClient::wrap(stream);

    let (width, height) = image.dimensions();
    let channel_names = &["R", "G", "B", "A"];
    let create = PacketCreateImage {
        image_name,
        grab_focus: true,
        width,
        height,
        channel_names,
    };
    if let Err(e) = client.send(create) {
        warn!("Failed to create image in TEV: {}", e);
        return;
    }

    // Interleaved RGBA, addressed per channel by offset and stride
    let start_time = std::time::Instant::now();
    let update = PacketUpdateImage {
        image_name,
        grab_focus: false,
        channel_names,
        channel_offsets: &[0, 1, 2, 3],
        channel_strides: &[4, 4, 4, 4],
        x: 0,
        y: 0,
        width,
        height,
        data: image.as_raw(),
    };
    match client.send(update) {
        Ok(_) => info!("Image sent to TEV at {} in {:.2?}", address, start_time.elapsed()),
        Err(e) => warn!("Failed to send image data to TEV: {}", e),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn gradient() -> RenderImage {
        ImageBuffer::from_fn(4, 2, |x, y| Rgba([x as f32 * 0.5, 2.0, -1.0, y as f32]))
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("phongtrace-{}-{}", std::process::id(), name))
    }

    #[test]
    fn srgb_endpoints_and_clamping() {
        let ldr = to_srgb8(&gradient());
        assert_eq!(ldr.get_pixel(0, 0).0, [0, 255, 0, 0]);
        assert_eq!(ldr.get_pixel(2, 1).0, [255, 255, 0, 255]);
        // Linear 0.5 encodes to roughly 188 in sRGB.
        assert_eq!(ldr.get_pixel(1, 0)[0], 188);
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a/b.PNG")).ok(), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_path(Path::new("hdr.exr")).ok(), Some(OutputFormat::Exr));
        assert!(OutputFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn tev_address_gets_default_port() {
        assert_eq!(tev_address("localhost"), "localhost:14158");
        assert_eq!(tev_address("10.0.0.2:9000"), "10.0.0.2:9000");
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = save_image(&gradient(), Path::new("render.tiff")).err().expect("must fail");
        assert!(err.to_string().contains("tiff"));
    }

    #[test]
    fn png_round_trip_keeps_alpha() {
        let path = temp_path("out.png");
        save_image(&gradient(), &path).expect("png written");
        let read = image::open(&path).expect("png readable").into_rgba8();
        let _ = std::fs::remove_file(&path);
        assert_eq!(read.dimensions(), (4, 2));
        assert_eq!(read.get_pixel(3, 1)[3], 255);
        assert_eq!(read.get_pixel(3, 0)[3], 0);
    }

    #[test]
    fn exr_is_written() {
        let path = temp_path("out.exr");
        save_image(&gradient(), &path).expect("exr written");
        let written = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let _ = std::fs::remove_file(&path);
        assert!(written > 0);
    }
}
