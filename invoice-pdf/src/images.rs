use serde::{Deserialize, Serialize};

use crate::graphics::Rect;

/// Handle to an image registered with a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// How an image is scaled into its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    /// Scale to fit within the slot, preserving aspect ratio, centered.
    Fit,
    /// Scale to cover the slot, clipping the overflow.
    Fill,
    /// Stretch to the slot exactly.
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceRGB,
    DeviceGray,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceGray => "DeviceGray",
        }
    }
}

/// Decoded image ready for embedding.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub color_space: ColorSpace,
    /// Raw 8-bit samples for PNG, the untouched file for JPEG.
    pub data: Vec<u8>,
    /// Separate alpha channel, if the source had one.
    pub alpha: Option<Vec<u8>>,
}

/// Where an image ends up on the page, in layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub rect: Rect,
    /// Slot to clip to when the image overflows it (`Fill`).
    pub clip: Option<Rect>,
}

pub fn detect_format(data: &[u8]) -> Result<ImageFormat, String> {
    match data {
        [0xFF, 0xD8, ..] => Ok(ImageFormat::Jpeg),
        [0x89, b'P', b'N', b'G', ..] => Ok(ImageFormat::Png),
        _ if data.len() < 4 => Err("image data too short to detect format".to_string()),
        _ => Err("unsupported image format (expected JPEG or PNG)".to_string()),
    }
}

/// Decode a PNG or JPEG file.
pub fn decode_image(data: &[u8]) -> Result<ImageData, String> {
    match detect_format(data)? {
        ImageFormat::Jpeg => parse_jpeg(data),
        ImageFormat::Png => parse_png(data),
    }
}

/// JPEG data is embedded as-is (DCTDecode); only the frame header is read.
fn parse_jpeg(data: &[u8]) -> Result<ImageData, String> {
    let (width, height, components) = jpeg_frame(data)?;
    let color_space = match components {
        1 => ColorSpace::DeviceGray,
        3 => ColorSpace::DeviceRGB,
        n => return Err(format!("unsupported JPEG component count: {}", n)),
    };
    Ok(ImageData {
        width,
        height,
        format: ImageFormat::Jpeg,
        color_space,
        data: data.to_vec(),
        alpha: None,
    })
}

/// Scan for an SOF0..SOF3 marker and read width, height and components.
fn jpeg_frame(data: &[u8]) -> Result<(u32, u32, u8), String> {
    let mut i = 2;
    while i + 3 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        match marker {
            0xC0..=0xC3 => {
                if i + 9 >= data.len() {
                    return Err("JPEG frame header truncated".to_string());
                }
                let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
                let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
                return Ok((width, height, data[i + 9]));
            }
            0xFF | 0x00 => i += 1,
            0xD0..=0xD9 => i += 2,
            _ => {
                let len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
                i += 2 + len;
            }
        }
    }
    Err("no frame header found in JPEG data".to_string())
}

fn parse_png(data: &[u8]) -> Result<ImageData, String> {
    let mut decoder = png::Decoder::new(data);
    // Palette and 16-bit images come out as plain 8-bit samples.
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| format!("PNG decode error: {}", e))?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| format!("PNG frame error: {}", e))?;
    buf.truncate(info.buffer_size());

    let (color_space, data, alpha) = match info.color_type {
        png::ColorType::Rgb => (ColorSpace::DeviceRGB, buf, None),
        png::ColorType::Grayscale => (ColorSpace::DeviceGray, buf, None),
        png::ColorType::Rgba => {
            let (rgb, alpha) = split_alpha(&buf, 4);
            (ColorSpace::DeviceRGB, rgb, Some(alpha))
        }
        png::ColorType::GrayscaleAlpha => {
            let (gray, alpha) = split_alpha(&buf, 2);
            (ColorSpace::DeviceGray, gray, Some(alpha))
        }
        other => return Err(format!("unsupported PNG color type: {:?}", other)),
    };

    Ok(ImageData {
        width: info.width,
        height: info.height,
        format: ImageFormat::Png,
        color_space,
        data,
        alpha,
    })
}

/// Split interleaved samples into color and alpha planes; the last
/// sample of each pixel is alpha.
fn split_alpha(buf: &[u8], stride: usize) -> (Vec<u8>, Vec<u8>) {
    let pixels = buf.len() / stride;
    let mut color = Vec::with_capacity(pixels * (stride - 1));
    let mut alpha = Vec::with_capacity(pixels);
    for px in buf.chunks_exact(stride) {
        color.extend_from_slice(&px[..stride - 1]);
        alpha.push(px[stride - 1]);
    }
    (color, alpha)
}

/// Compute where an `img_w`×`img_h` image lands inside `slot`.
pub fn calculate_placement(img_w: u32, img_h: u32, slot: &Rect, fit: ImageFit) -> ImagePlacement {
    let iw = img_w.max(1) as f64;
    let ih = img_h.max(1) as f64;
    let scaled = |scale: f64| {
        let w = iw * scale;
        let h = ih * scale;
        Rect::new(
            slot.x + (slot.width - w) / 2.0,
            slot.y + (slot.height - h) / 2.0,
            w,
            h,
        )
    };
    match fit {
        ImageFit::Fit => ImagePlacement {
            rect: scaled((slot.width / iw).min(slot.height / ih)),
            clip: None,
        },
        ImageFit::Fill => ImagePlacement {
            rect: scaled((slot.width / iw).max(slot.height / ih)),
            clip: Some(*slot),
        },
        ImageFit::Stretch => ImagePlacement {
            rect: *slot,
            clip: None,
        },
    }
}
