//! # pdf 子命令 CLI 定义
//!
//! 将 PDF 逐页渲染为 PNG，供 `ocr` 子命令使用
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/pdf.rs`

use clap::Args;
use std::path::PathBuf;

/// 默认渲染分辨率
pub const DEFAULT_DPI: u32 = 200;

/// 默认 pdftoppm 可执行文件
pub const DEFAULT_PDFTOPPM_CMD: &str = "pdftoppm";

/// pdf 子命令参数
#[derive(Args, Debug)]
pub struct PdfArgs {
    /// Input PDF file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output folder for page images (page_001.png, page_002.png, ...)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Rendering resolution in DPI
    #[arg(long, default_value_t = DEFAULT_DPI, value_parser = clap::value_parser!(u32).range(36..=1200))]
    pub dpi: u32,

    /// pdftoppm executable (from poppler-utils)
    #[arg(long, env = "PDFTOPPM_CMD", default_value = DEFAULT_PDFTOPPM_CMD)]
    pub pdftoppm_cmd: String,
}
