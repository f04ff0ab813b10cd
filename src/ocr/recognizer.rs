//! # 识别能力抽象
//!
//! 单张图片到文本的外部识别能力，以及它的失败类型。
//!
//! ## 依赖关系
//! - 被 `ocr/tesseract.rs` 实现
//! - 被 `ocr/processor.rs` 调用

use std::path::Path;
use thiserror::Error;

/// 单张图片识别失败
#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("'{command}' not found in PATH (install tesseract-ocr)")]
    EngineNotFound { command: String },

    #[error("{command} failed: {stderr}")]
    EngineFailed { command: String, stderr: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// 图片文本识别能力
///
/// 调用耗时且相互独立，实现必须可以在多个工作线程间共享。
/// 图片中没有文字时返回空字符串，而不是错误。
pub trait Recognizer: Sync {
    fn recognize(&self, image: &Path, language: &str) -> Result<String, RecognitionError>;
}
