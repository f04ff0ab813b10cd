//! # langs 子命令 CLI 定义
//!
//! 探测本机已安装的 Tesseract 语言包
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/langs.rs`

use crate::ocr::DEFAULT_TESSERACT_CMD;

use clap::Args;

/// langs 子命令参数
#[derive(Args, Debug)]
pub struct LangsArgs {
    /// Tesseract executable
    #[arg(long, env = "TESSERACT_CMD", default_value = DEFAULT_TESSERACT_CMD)]
    pub tesseract_cmd: String,

    /// Also print the directories that were scanned
    #[arg(long, default_value_t = false)]
    pub show_dirs: bool,
}
