//! # doclens - 文档处理工具箱
//!
//! 把零散的文档处理脚本（批量 OCR、PDF 渲染、图片格式转换、语言包探测）
//! 用 Rust 重构，统一成单一可执行文件。
//!
//! ## 子命令
//! - `ocr`     - 并行批量 OCR，可断点续跑
//! - `convert` - JPEG / PNG 互转
//! - `langs`   - 列出已安装的 Tesseract 语言包
//! - `pdf`     - PDF 逐页渲染为 PNG（需要 poppler 的 pdftoppm）
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/    (文件发现、完成检查、执行策略)
//!   │     ├── ocr/      (识别能力与单项处理)
//!   │     ├── imaging/  (解码与像素格式归一化)
//!   │     ├── langs/    (语言包探测)
//!   │     └── models/   (数据模型)
//!   ├── utils/      (输出、进度条、报告、日志)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod imaging;
mod langs;
mod models;
mod ocr;
mod utils;

use clap::Parser;
use cli::Cli;
use std::io::IsTerminal;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    // 输出被重定向时不带颜色控制符
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
