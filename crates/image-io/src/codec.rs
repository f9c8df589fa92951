//! Decoding files into frames and encoding frames back to files.
//!
//! Frames keep the sample type the file was stored with. On the way out the
//! frame is written with the same type unless the container cannot hold it:
//! JPEG only stores 8-bit gray or RGB, PNG has no float samples, and the TIFF
//! encoder has no gray+alpha layout.

use std::path::{Path, PathBuf};

use deflicker_common::error::{DeflickerError, DeflickerResult};
use deflicker_frame_model::format::OutputFormat;
use deflicker_frame_model::frame::{Frame, Samples};
use image::{
    DynamicImage, GrayAlphaImage, GrayImage, ImageBuffer, ImageFormat, Luma, LumaA, Rgb,
    Rgb32FImage, RgbImage, Rgba, Rgba32FImage, RgbaImage,
};

/// Read an image file into a frame.
pub fn decode_frame(path: &Path) -> DeflickerResult<Frame> {
    let image = image::open(path).map_err(|e| DeflickerError::decode(path, e))?;
    frame_from_dynamic(image).map_err(|e| DeflickerError::decode(path, e))
}

/// Write `frame` to `path` in the given container.
pub fn encode_frame(frame: Frame, path: &Path, format: OutputFormat) -> DeflickerResult<()> {
    let image = frame_to_dynamic(frame).map_err(|e| DeflickerError::encode(path, e))?;

    let source_color = image.color();
    let image = prepare_for_container(image, format);
    if image.color() != source_color {
        tracing::debug!(
            path = %path.display(),
            from = ?source_color,
            to = ?image.color(),
            "Converted sample layout for {format} output"
        );
    }

    image
        .save_with_format(path, image_format(format))
        .map_err(|e| DeflickerError::encode(path, e))
}

/// Output file for `input`: its stem with the format's extension, in `outdir`.
pub fn output_path_for(input: &Path, outdir: &Path, format: OutputFormat) -> PathBuf {
    let mut name = input
        .file_stem()
        .unwrap_or(input.as_os_str())
        .to_os_string();
    name.push(".");
    name.push(format.extension());
    outdir.join(name)
}

/// Convert a decoded image into a frame without changing its sample type.
///
/// Layouts outside the supported set are widened to RGBA float.
pub fn frame_from_dynamic(image: DynamicImage) -> DeflickerResult<Frame> {
    let (width, height) = (image.width(), image.height());
    match image {
        DynamicImage::ImageLuma8(buf) => Frame::new(width, height, 1, Samples::U8(buf.into_raw())),
        DynamicImage::ImageLumaA8(buf) => {
            Frame::new(width, height, 2, Samples::U8(buf.into_raw()))
        }
        DynamicImage::ImageRgb8(buf) => Frame::new(width, height, 3, Samples::U8(buf.into_raw())),
        DynamicImage::ImageRgba8(buf) => Frame::new(width, height, 4, Samples::U8(buf.into_raw())),
        DynamicImage::ImageLuma16(buf) => {
            Frame::new(width, height, 1, Samples::U16(buf.into_raw()))
        }
        DynamicImage::ImageLumaA16(buf) => {
            Frame::new(width, height, 2, Samples::U16(buf.into_raw()))
        }
        DynamicImage::ImageRgb16(buf) => {
            Frame::new(width, height, 3, Samples::U16(buf.into_raw()))
        }
        DynamicImage::ImageRgba16(buf) => {
            Frame::new(width, height, 4, Samples::U16(buf.into_raw()))
        }
        DynamicImage::ImageRgb32F(buf) => {
            Frame::new(width, height, 3, Samples::F32(buf.into_raw()))
        }
        DynamicImage::ImageRgba32F(buf) => {
            Frame::new(width, height, 4, Samples::F32(buf.into_raw()))
        }
        other => Frame::new(
            width,
            height,
            4,
            Samples::F32(other.to_rgba32f().into_raw()),
        ),
    }
}

/// Convert a frame into a decoded image with the same sample type.
///
/// Float gray frames become float RGB(A), the only float layouts the
/// `image` crate offers.
pub fn frame_to_dynamic(frame: Frame) -> DeflickerResult<DynamicImage> {
    let (width, height, channels) = (frame.width(), frame.height(), frame.channels());

    let image = match (frame.into_samples(), channels) {
        (Samples::U8(data), 1) => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
        (Samples::U8(data), 2) => {
            GrayAlphaImage::from_raw(width, height, data).map(DynamicImage::ImageLumaA8)
        }
        (Samples::U8(data), 3) => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
        (Samples::U8(data), 4) => {
            RgbaImage::from_raw(width, height, data).map(DynamicImage::ImageRgba8)
        }
        (Samples::U16(data), 1) => ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(width, height, data)
            .map(DynamicImage::ImageLuma16),
        (Samples::U16(data), 2) => {
            ImageBuffer::<LumaA<u16>, Vec<u16>>::from_raw(width, height, data)
                .map(DynamicImage::ImageLumaA16)
        }
        (Samples::U16(data), 3) => ImageBuffer::<Rgb<u16>, Vec<u16>>::from_raw(width, height, data)
            .map(DynamicImage::ImageRgb16),
        (Samples::U16(data), 4) => {
            ImageBuffer::<Rgba<u16>, Vec<u16>>::from_raw(width, height, data)
                .map(DynamicImage::ImageRgba16)
        }
        (Samples::F32(data), 1) => {
            let rgb = data.iter().flat_map(|&v| [v, v, v]).collect();
            Rgb32FImage::from_raw(width, height, rgb).map(DynamicImage::ImageRgb32F)
        }
        (Samples::F32(data), 2) => {
            let rgba = data
                .chunks_exact(2)
                .flat_map(|la| [la[0], la[0], la[0], la[1]])
                .collect();
            Rgba32FImage::from_raw(width, height, rgba).map(DynamicImage::ImageRgba32F)
        }
        (Samples::F32(data), 3) => {
            Rgb32FImage::from_raw(width, height, data).map(DynamicImage::ImageRgb32F)
        }
        (Samples::F32(data), 4) => {
            Rgba32FImage::from_raw(width, height, data).map(DynamicImage::ImageRgba32F)
        }
        _ => None,
    };

    image.ok_or_else(|| {
        DeflickerError::Other(anyhow::anyhow!(
            "Frame of {width}x{height}x{channels} does not map to an image layout"
        ))
    })
}

/// Narrow `image` to a layout the container can store.
fn prepare_for_container(image: DynamicImage, format: OutputFormat) -> DynamicImage {
    if format.is_jpeg() {
        let has_color = image.color().has_color();
        return match image {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
            other if has_color => DynamicImage::ImageRgb8(other.to_rgb8()),
            other => DynamicImage::ImageLuma8(other.to_luma8()),
        };
    }

    if format.is_tiff() {
        return match image {
            DynamicImage::ImageLumaA8(_) => DynamicImage::ImageRgba8(image.to_rgba8()),
            DynamicImage::ImageLumaA16(_) => DynamicImage::ImageRgba16(image.to_rgba16()),
            other => other,
        };
    }

    match image {
        DynamicImage::ImageRgb32F(_) => DynamicImage::ImageRgb16(image.to_rgb16()),
        DynamicImage::ImageRgba32F(_) => DynamicImage::ImageRgba16(image.to_rgba16()),
        other => other,
    }
}

fn image_format(format: OutputFormat) -> ImageFormat {
    match format {
        OutputFormat::Png => ImageFormat::Png,
        OutputFormat::Tiff | OutputFormat::Tif => ImageFormat::Tiff,
        OutputFormat::Jpg | OutputFormat::Jpeg => ImageFormat::Jpeg,
    }
}
