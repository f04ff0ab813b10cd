//! # 单项处理
//!
//! 对一个工作项执行：完成检查 → 识别 → 写出 → 生成结果。
//! 所有错误都归入该项的 `Outcome::Failed`，不会向上抛出。
//!
//! ## 依赖关系
//! - 被 `commands/ocr.rs` 作为 `BatchRunner` 的处理函数使用
//! - 使用 `batch/tracker.rs`, `ocr/recognizer.rs`

use super::recognizer::Recognizer;
use crate::batch::tracker;
use crate::models::{Outcome, WorkItem};

use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// OCR 单项处理器
pub struct OcrProcessor<'a, R: Recognizer> {
    recognizer: &'a R,
    language: &'a str,
}

impl<'a, R: Recognizer> OcrProcessor<'a, R> {
    pub fn new(recognizer: &'a R, language: &'a str) -> Self {
        Self {
            recognizer,
            language,
        }
    }

    /// 处理一个工作项
    pub fn process(&self, item: &WorkItem) -> Outcome {
        if tracker::is_complete(item) {
            return Outcome::Skipped;
        }

        let text = match self.recognizer.recognize(item.source_path(), self.language) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(file = %item.file_name(), error = %e, "recognition failed");
                return Outcome::Failed {
                    error: e.to_string(),
                };
            }
        };
        let text = text.trim();

        match write_atomically(item.output_path(), text) {
            Ok(()) => Outcome::from_text(text),
            Err(e) => {
                tracing::debug!(output = %item.output_path().display(), error = %e, "write failed");
                Outcome::Failed {
                    error: format!("cannot write {}: {}", item.output_path().display(), e),
                }
            }
        }
    }
}

/// 先写临时文件再改名，中断时不会留下半截的输出
fn write_atomically(path: &Path, text: &str) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(text.as_bytes())?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
