//! # pdf 命令实现
//!
//! 将 PDF 的每一页渲染为 `page_NNN.png`，输出目录可直接作为 `ocr` 的输入。
//!
//! ## 功能
//! - 调用 poppler 的 `pdftoppm` 渲染，分辨率可调
//! - 先渲染到输出目录下的临时目录，全部成功后再改名移出
//! - 页码三位补零：`page_001.png`, `page_002.png`, ...
//!
//! ## 依赖关系
//! - 使用 `cli/pdf.rs` 定义的参数
//! - 使用 `utils/output.rs`, `utils/progress.rs`
//! - 使用 `regex` 匹配 pdftoppm 的输出文件名，`tempfile` 存放中间结果

use crate::cli::pdf::PdfArgs;
use crate::error::{DoclensError, Result};
use crate::utils::{output, progress};

use regex::Regex;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use tempfile::TempDir;

/// pdftoppm 输出文件名前缀
const RENDER_PREFIX: &str = "page";

/// 执行 pdf 命令
pub fn execute(args: PdfArgs) -> Result<()> {
    output::print_header("PDF to PNG");

    if !args.input.is_file() {
        return Err(DoclensError::InvalidArgument(format!(
            "PDF file not found: {}",
            args.input.display()
        )));
    }

    fs::create_dir_all(&args.output).map_err(|e| DoclensError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    output::print_info(&format!("Input: {}", args.input.display()));
    output::print_info(&format!("Rendering at {} DPI", args.dpi));

    let staging = TempDir::new_in(&args.output).map_err(|e| DoclensError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let spinner = progress::create_spinner("Rendering pages...");
    let rendered = render(&args.pdftoppm_cmd, &args.input, staging.path(), args.dpi);
    spinner.finish_and_clear();
    rendered?;

    let pages = extract_pages(staging.path(), &args.output)?;
    if pages.is_empty() {
        return Err(DoclensError::NothingProcessed { total: 0 });
    }

    for (page, path) in &pages {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        output::print_conversion(&format!("page {}", page), &name);
    }

    output::print_done(&format!(
        "Extracted {} page(s) into '{}'",
        pages.len(),
        args.output.display()
    ));

    Ok(())
}

/// 输出文件名：`page_001.png`
pub fn page_file_name(page: u32) -> String {
    format!("page_{:03}.png", page)
}

/// 组装 pdftoppm 参数：`-png -r <dpi> <pdf> <prefix>`
fn pdftoppm_args(pdf: &Path, prefix: &Path, dpi: u32) -> Vec<OsString> {
    vec![
        "-png".into(),
        "-r".into(),
        dpi.to_string().into(),
        pdf.into(),
        prefix.into(),
    ]
}

/// 渲染所有页面到 `dir`
fn render(command: &str, pdf: &Path, dir: &Path, dpi: u32) -> Result<()> {
    let args = pdftoppm_args(pdf, &dir.join(RENDER_PREFIX), dpi);
    tracing::debug!(command, ?args, "rendering pdf pages");

    match Command::new(command).args(&args).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => Err(DoclensError::CommandFailed {
            command: command.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(DoclensError::CommandNotFound {
            command: command.to_string(),
        }),
        Err(e) => Err(DoclensError::CommandFailed {
            command: command.to_string(),
            stderr: e.to_string(),
        }),
    }
}

/// pdftoppm 按总页数补零：`page-1.png`, `page-01.png`, `page-001.png`
fn rendered_page_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^page-(\d+)\.png$").expect("static rendered page pattern is valid")
    })
}

/// 按页码顺序把渲染结果移到输出目录并改名
fn extract_pages(staging: &Path, output_dir: &Path) -> Result<Vec<(u32, PathBuf)>> {
    let entries = fs::read_dir(staging).map_err(|e| DoclensError::FileReadError {
        path: staging.display().to_string(),
        source: e,
    })?;

    let mut rendered: Vec<(u32, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            let caps = rendered_page_pattern().captures(name.to_str()?)?;
            let page = caps[1].parse::<u32>().ok()?;
            Some((page, entry.path()))
        })
        .collect();
    rendered.sort_by_key(|(page, _)| *page);

    rendered
        .into_iter()
        .map(|(page, source)| {
            let target = output_dir.join(page_file_name(page));
            fs::rename(&source, &target).map_err(|e| DoclensError::FileWriteError {
                path: target.display().to_string(),
                source: e,
            })?;
            Ok((page, target))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::pdf::DEFAULT_DPI;

    #[test]
    fn test_page_file_name() {
        assert_eq!(page_file_name(1), "page_001.png");
        assert_eq!(page_file_name(42), "page_042.png");
        assert_eq!(page_file_name(1234), "page_1234.png");
    }

    #[test]
    fn test_pdftoppm_args() {
        let args = pdftoppm_args(Path::new("book.pdf"), Path::new("tmp/page"), 200);
        let expected: Vec<OsString> = ["-png", "-r", "200", "book.pdf", "tmp/page"]
            .iter()
            .map(OsString::from)
            .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn test_missing_renderer_is_reported() {
        let tmp = TempDir::new().unwrap();
        let err = render("doclens-no-such-pdftoppm", Path::new("book.pdf"), tmp.path(), 200)
            .unwrap_err();
        assert!(matches!(err, DoclensError::CommandNotFound { ref command } if command == "doclens-no-such-pdftoppm"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_renderer_is_reported() {
        let tmp = TempDir::new().unwrap();
        let err = render("false", Path::new("book.pdf"), tmp.path(), 200).unwrap_err();
        assert!(matches!(err, DoclensError::CommandFailed { .. }));
    }

    #[test]
    fn test_extract_pages_renames_in_page_order() {
        let staging = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        for name in ["page-10.png", "page-02.png", "page-1.png", "notes.txt"] {
            fs::write(staging.path().join(name), b"png").unwrap();
        }

        let pages = extract_pages(staging.path(), out.path()).unwrap();

        let numbers: Vec<u32> = pages.iter().map(|(p, _)| *p).collect();
        assert_eq!(numbers, vec![1, 2, 10]);
        for name in ["page_001.png", "page_002.png", "page_010.png"] {
            assert!(out.path().join(name).exists(), "{} missing", name);
        }
        let left: Vec<_> = fs::read_dir(staging.path()).unwrap().collect();
        assert_eq!(left.len(), 1);
    }

    #[test]
    fn test_missing_pdf_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let args = PdfArgs {
            input: tmp.path().join("missing.pdf"),
            output: tmp.path().join("pages"),
            dpi: DEFAULT_DPI,
            pdftoppm_cmd: "pdftoppm".to_string(),
        };
        assert!(matches!(execute(args), Err(DoclensError::InvalidArgument(_))));
        assert!(!tmp.path().join("pages").exists());
    }
}
