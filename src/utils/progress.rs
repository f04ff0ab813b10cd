//! # 进度条工具
//!
//! 批处理进度条与不确定时长任务的 spinner。
//! 两者都画在 stderr 上，进度行要通过 `ProgressBar::suspend` 输出。
//!
//! ## 依赖关系
//! - 被 `utils/report.rs`, `commands/` 模块使用
//! - 使用 `indicatif` crate

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg} ({per_sec}, eta {eta})";
const SPINNER_TEMPLATE: &str = "{spinner:.green} {elapsed_precise} {msg}";
const SPINNER_TICKS: &[&str] = &["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// 批处理进度条，`message` 为动作名（如 "Recognizing"）
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len).with_message(message.to_string());
    if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// 外部命令运行期间的 spinner（语言包探测、PDF 渲染）
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner().with_message(message.to_string());
    if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
        pb.set_style(style.tick_strings(SPINNER_TICKS));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_carries_length_and_action() {
        let pb = create_progress_bar(12, "Recognizing");
        assert_eq!(pb.length(), Some(12));
        assert_eq!(pb.message(), "Recognizing");
        assert_eq!(pb.position(), 0);
    }
}
