//! # Tesseract 识别后端
//!
//! 通过命令行调用 Tesseract。
//!
//! ## 功能
//! - 先用 `image` 解码，损坏的文件在调用引擎前就失败
//! - 带透明通道的图片压平后写入临时 PNG 再识别
//! - 输出按 UTF-8 解码，非法字节替换为 U+FFFD
//!
//! ## 依赖关系
//! - 实现 `ocr/recognizer.rs` 的 `Recognizer`
//! - 使用 `imaging/normalize.rs`
//! - 使用 `tempfile` 保存归一化后的临时图片

use super::recognizer::{RecognitionError, Recognizer};
use crate::imaging;

use image::ImageFormat;
use std::io;
use std::path::Path;
use std::process::Command;
use tempfile::NamedTempFile;

/// 默认 Tesseract 可执行文件
pub const DEFAULT_TESSERACT_CMD: &str = "tesseract";

/// Tesseract 识别后端
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    /// 可执行文件名或路径
    command: String,
    /// OCR 引擎模式
    oem: u8,
    /// 页面分割模式
    psm: u8,
}

impl TesseractRecognizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            oem: 3,
            psm: 6,
        }
    }

    /// 组装命令行参数
    fn args(&self, image_path: &Path, language: &str) -> Vec<String> {
        vec![
            image_path.display().to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            language.to_string(),
            "--oem".to_string(),
            self.oem.to_string(),
            "--psm".to_string(),
            self.psm.to_string(),
        ]
    }

    fn run_tesseract(&self, image_path: &Path, language: &str) -> Result<String, RecognitionError> {
        let args = self.args(image_path, language);
        tracing::debug!(command = %self.command, ?args, "running recognition engine");

        let output = Command::new(&self.command).args(&args).output();

        match output {
            Ok(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
            }
            Ok(output) => Err(RecognitionError::EngineFailed {
                command: self.command.clone(),
                stderr: condense_stderr(&String::from_utf8_lossy(&output.stderr)),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(RecognitionError::EngineNotFound {
                command: self.command.clone(),
            }),
            Err(e) => Err(RecognitionError::Io(e)),
        }
    }
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_TESSERACT_CMD)
    }
}

impl Recognizer for TesseractRecognizer {
    fn recognize(&self, image_path: &Path, language: &str) -> Result<String, RecognitionError> {
        let loaded = imaging::load_normalized(image_path)?;

        if !loaded.normalized {
            return self.run_tesseract(image_path, language);
        }

        // 临时文件在识别结束前必须保持存在
        let temp = tempfile::Builder::new()
            .prefix("doclens-")
            .suffix(".png")
            .tempfile()?;
        write_png(&loaded.image, &temp)?;
        self.run_tesseract(temp.path(), language)
    }
}

fn write_png(image: &image::DynamicImage, temp: &NamedTempFile) -> Result<(), RecognitionError> {
    let mut file = temp.as_file();
    image
        .write_to(&mut file, ImageFormat::Png)
        .map_err(|e| RecognitionError::Io(io::Error::new(io::ErrorKind::Other, e)))
}

/// 将多行 stderr 压成一行，便于放进进度行
fn condense_stderr(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        "exited with non-zero status".to_string()
    } else {
        lines.join("; ")
    }
}
