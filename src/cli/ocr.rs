//! # ocr 子命令 CLI 定义
//!
//! 对文件夹中的图片批量 OCR，每张图片输出一个同名 .txt
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/ocr.rs`

use crate::models::DEFAULT_LANGUAGE;
use crate::ocr::DEFAULT_TESSERACT_CMD;

use clap::Args;
use std::path::PathBuf;

/// ocr 子命令参数
#[derive(Args, Debug)]
pub struct OcrArgs {
    /// Input folder with images
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output folder for TXT files (created if missing)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Number of parallel workers (0 = all CPU cores)
    #[arg(short, long, env = "DOCLENS_WORKERS", default_value_t = 0)]
    pub workers: usize,

    /// Recognition language, '+' joins several (e.g. 'vie+eng')
    #[arg(short, long, env = "DOCLENS_LANG", default_value = DEFAULT_LANGUAGE)]
    pub lang: String,

    /// Process images one at a time on the calling thread
    #[arg(long, env = "DOCLENS_SINGLE_THREAD", default_value_t = false)]
    pub single_thread: bool,

    /// Tesseract executable
    #[arg(long, env = "TESSERACT_CMD", default_value = DEFAULT_TESSERACT_CMD)]
    pub tesseract_cmd: String,

    /// Write a per-image CSV report to this path
    #[arg(long)]
    pub report: Option<PathBuf>,
}
