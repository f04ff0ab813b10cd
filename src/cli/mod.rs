//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `ocr`: 并行批量 OCR（可断点续跑）
//! - `convert`: JPEG / PNG 互转
//! - `langs`: 列出已安装的识别语言包
//! - `pdf`: PDF 逐页渲染为 PNG
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: ocr, convert, langs, pdf

pub mod convert;
pub mod langs;
pub mod ocr;
pub mod pdf;

use clap::{Parser, Subcommand};

/// doclens - 文档处理工具箱
#[derive(Parser)]
#[command(name = "doclens")]
#[command(version)]
#[command(about = "A document-processing toolkit: parallel OCR, PDF rendering and image conversion", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show debug diagnostics on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Recognize text in a folder of images, one .txt per image (resumable)
    Ocr(ocr::OcrArgs),

    /// Convert a folder of images between JPEG and PNG
    Convert(convert::ConvertArgs),

    /// List installed Tesseract language packs
    Langs(langs::LangsArgs),

    /// Render every page of a PDF to page_NNN.png for OCR
    Pdf(pdf::PdfArgs),
}
