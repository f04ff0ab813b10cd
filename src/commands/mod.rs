//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `ocr/`, `imaging/`, `langs/`, `utils/`
//! - 子模块: ocr, convert, langs, pdf

pub mod convert;
pub mod langs;
pub mod ocr;
pub mod pdf;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Ocr(args) => ocr::execute(args),
        Commands::Convert(args) => convert::execute(args),
        Commands::Langs(args) => langs::execute(args),
        Commands::Pdf(args) => pdf::execute(args),
    }
}
