//! # 图像处理模块
//!
//! OCR 与格式转换共用的解码和像素格式归一化。
//!
//! ## 依赖关系
//! - 被 `ocr/`, `commands/convert.rs` 使用
//! - 子模块: normalize

pub mod normalize;

pub use normalize::load_normalized;
