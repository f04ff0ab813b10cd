//! # langs 命令实现
//!
//! 列出可用于 `ocr --lang` 的语言。
//!
//! ## 依赖关系
//! - 使用 `cli/langs.rs` 定义的参数
//! - 使用 `langs/` 探测语言包
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::langs::LangsArgs;
use crate::error::Result;
use crate::langs::{self, LangSource};
use crate::utils::{output, progress};

use tabled::{Table, Tabled};

/// 语言表格行
#[derive(Debug, Clone, Tabled)]
struct LangRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Language")]
    code: String,
    #[tabled(rename = "Found via")]
    source: String,
}

/// 执行 langs 命令
pub fn execute(args: LangsArgs) -> Result<()> {
    output::print_header("Tesseract Language Packs");

    let spinner = progress::create_spinner("Probing installed language packs...");
    let packs = langs::discover(&args.tesseract_cmd);
    spinner.finish_and_clear();

    let rows: Vec<LangRow> = packs
        .ordered
        .iter()
        .enumerate()
        .map(|(i, code)| LangRow {
            index: i + 1,
            code: code.clone(),
            source: packs
                .packs
                .get(code)
                .map(|s| s.to_string())
                .unwrap_or_default(),
        })
        .collect();

    println!("{}", Table::new(rows));

    let detected = packs
        .packs
        .values()
        .filter(|s| matches!(s, LangSource::Engine | LangSource::Tessdata))
        .count();
    if detected == 0 {
        output::print_warning(&format!(
            "No language packs detected; is '{}' installed?",
            args.tesseract_cmd
        ));
    } else {
        output::print_info(&format!("{} languages detected", detected));
    }

    if args.show_dirs {
        if packs.scanned_dirs.is_empty() {
            output::print_info("No tessdata directories found");
        }
        for dir in &packs.scanned_dirs {
            output::print_info(&format!("Scanned: {}", dir.display()));
        }
    }

    Ok(())
}
