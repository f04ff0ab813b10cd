//! # 像素格式归一化
//!
//! 调色板图像在解码时已展开；带透明通道的图像在此压平为 8 位 RGB，
//! 识别引擎对透明通道的输入容易出错或精度下降。
//!
//! ## 依赖关系
//! - 被 `ocr/tesseract.rs`, `commands/convert.rs` 使用
//! - 使用 `image` crate

use image::{DynamicImage, ImageError, ImageReader};
use std::path::Path;

/// 解码后的图片及其是否经过归一化
pub struct LoadedImage {
    pub image: DynamicImage,
    /// 像素格式被改写过
    pub normalized: bool,
}

/// 是否需要压平为 RGB
pub fn needs_normalization(image: &DynamicImage) -> bool {
    image.color().has_alpha()
}

/// 压平透明通道，其他格式原样返回
pub fn normalize(image: DynamicImage) -> (DynamicImage, bool) {
    if needs_normalization(&image) {
        (DynamicImage::ImageRgb8(image.to_rgb8()), true)
    } else {
        (image, false)
    }
}

/// 按内容识别格式并解码，再归一化
pub fn load_normalized(path: &Path) -> Result<LoadedImage, ImageError> {
    let decoded = ImageReader::open(path)
        .map_err(ImageError::IoError)?
        .with_guessed_format()
        .map_err(ImageError::IoError)?
        .decode()?;

    let color = decoded.color();
    let (image, normalized) = normalize(decoded);
    if normalized {
        tracing::debug!(path = %path.display(), ?color, "flattened to RGB");
    }

    Ok(LoadedImage { image, normalized })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, GrayImage, LumaA, Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn test_normalize_rgba_to_rgb() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 128])));
        let (out, changed) = normalize(img);
        assert!(changed);
        assert_eq!(out.color(), image::ColorType::Rgb8);
        assert_eq!(out.width(), 4);
    }

    #[test]
    fn test_normalize_gray_alpha() {
        let img = DynamicImage::ImageLumaA8(GrayAlphaImage::from_pixel(2, 3, LumaA([90, 255])));
        let (out, changed) = normalize(img);
        assert!(changed);
        assert_eq!(out.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_normalize_keeps_plain_gray() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(2, 2));
        let (out, changed) = normalize(img);
        assert!(!changed);
        assert_eq!(out.color(), image::ColorType::L8);
    }

    #[test]
    fn test_load_normalized_rejects_garbage() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(load_normalized(&path).is_err());
    }

    #[test]
    fn test_load_normalized_from_disk() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("alpha.png");
        RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 0])).save(&path).unwrap();

        let loaded = load_normalized(&path).unwrap();
        assert!(loaded.normalized);
        assert_eq!(loaded.image.color(), image::ColorType::Rgb8);
    }
}
