//! # OCR 模块
//!
//! 包装外部识别能力，并定义单个工作项的处理流程。
//!
//! ## 功能
//! - `Recognizer` trait：单张图片 → 文本
//! - Tesseract 命令行后端
//! - 单项处理：完成检查、识别、写出
//!
//! ## 依赖关系
//! - 被 `commands/ocr.rs` 使用
//! - 使用 `imaging/`, `batch/tracker.rs`

pub mod processor;
pub mod recognizer;
pub mod tesseract;

pub use processor::OcrProcessor;
pub use recognizer::Recognizer;
pub use tesseract::{TesseractRecognizer, DEFAULT_TESSERACT_CMD};
