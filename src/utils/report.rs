//! # 运行报告
//!
//! 将每项结果转为有序的进度行，并在结束时打印汇总。
//!
//! ## 功能
//! - 进度行：`[<已完成>/<总数>] <文件名> - <结果>`
//! - 汇总：耗时、平均耗时、吞吐量（仅并行策略）、各类计数
//! - 可选 CSV 报告，按发现顺序每项一行
//!
//! ## 依赖关系
//! - 被 `commands/ocr.rs` 使用
//! - 使用 `utils/output.rs`, `utils/progress.rs`
//! - 使用 `csv` 和 `serde` 写报告

use crate::batch::{BatchResult, Progress};
use crate::error::{DoclensError, Result};
use crate::models::{Outcome, OutcomeKind, RunSummary, WorkItem};
use crate::utils::{output, progress};

use colored::Colorize;
use indicatif::ProgressBar;
use serde::Serialize;
use std::path::Path;

/// 格式化一条进度行
pub fn format_progress_line(completed: usize, total: usize, name: &str, outcome: &Outcome) -> String {
    format!("[{}/{}] {} - {}", completed, total, name, outcome.describe())
}

/// 汇总中的计时行
pub fn timing_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Total processing time: {:.2} seconds",
            summary.elapsed.as_secs_f64()
        ),
        format!("Average: {:.2} seconds per image", summary.average_secs()),
    ];
    if let Some(rate) = summary.throughput() {
        lines.push(format!("Throughput: {:.2} images/second", rate));
    }
    lines
}

/// 进度与汇总输出
pub struct Reporter {
    pb: ProgressBar,
    echo: bool,
    /// (文件名, 错误信息)
    failures: Vec<(String, String)>,
}

impl Reporter {
    /// 输出到终端
    pub fn new(total: usize) -> Self {
        Self {
            pb: progress::create_progress_bar(total as u64, "Recognizing"),
            echo: true,
            failures: Vec::new(),
        }
    }

    /// 不输出，只收集失败信息
    #[cfg(test)]
    pub fn silent() -> Self {
        Self {
            pb: ProgressBar::hidden(),
            echo: false,
            failures: Vec::new(),
        }
    }

    /// 处理一条进度事件
    pub fn on_progress(&mut self, p: Progress<'_>) {
        let name = p.item.file_name();

        if self.echo {
            let line = format_progress_line(p.completed, p.total, &name, p.outcome);
            let line = match p.outcome {
                Outcome::Success { .. } => line.normal(),
                Outcome::Skipped => line.dimmed(),
                Outcome::Failed { .. } => line.red(),
            };
            self.pb.suspend(|| println!("{}", line));
        }

        if let Outcome::Failed { error } = p.outcome {
            self.failures.push((name, error.clone()));
        }
        self.pb.inc(1);
    }

    #[cfg(test)]
    pub fn failures(&self) -> &[(String, String)] {
        &self.failures
    }

    /// 结束进度条并打印汇总
    pub fn finish(&self, summary: &RunSummary) {
        self.pb.finish_and_clear();
        if !self.echo {
            return;
        }

        output::print_separator();
        for line in timing_lines(summary) {
            println!("{}", line);
        }
        output::print_info(&format!(
            "{} recognized, {} already processed, {} failed ({}/{} succeeded)",
            summary.recognized,
            summary.skipped,
            summary.failed,
            summary.success_count(),
            summary.total
        ));

        if !self.failures.is_empty() {
            output::print_warning(&format!("{} file(s) failed:", self.failures.len()));
            for (name, error) in &self.failures {
                output::print_list_item(name, error);
            }
        }
    }
}

/// CSV 报告行
#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    file: String,
    status: OutcomeKind,
    chars: Option<usize>,
    words: Option<usize>,
    error: Option<&'a str>,
}

/// 按发现顺序写出 CSV 报告
pub fn write_csv_report(path: &Path, items: &[WorkItem], batch: &BatchResult) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for (index, outcome) in batch.in_discovery_order() {
        let (chars, words, error) = match outcome {
            Outcome::Success {
                char_count,
                word_count,
            } => (Some(*char_count), Some(*word_count), None),
            Outcome::Skipped => (None, None, None),
            Outcome::Failed { error } => (None, None, Some(error.as_str())),
        };
        wtr.serialize(ReportRow {
            file: items[index].file_name(),
            status: outcome.kind(),
            chars,
            words,
            error,
        })?;
    }

    wtr.flush().map_err(|e| DoclensError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
