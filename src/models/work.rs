//! # OCR 批处理数据模型
//!
//! 工作项、单项结果、运行配置与汇总。
//!
//! ## 依赖关系
//! - 被 `batch/`, `ocr/`, `commands/ocr.rs` 使用
//! - 被 `utils/report.rs` 使用

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认识别语言
pub const DEFAULT_LANGUAGE: &str = "eng";

/// 工作项：一张输入图片对应一个输出文本文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    source_path: PathBuf,
    output_path: PathBuf,
}

impl WorkItem {
    /// 由源图片和输出目录构造，输出为同名 `.txt`
    pub fn new(source_path: PathBuf, output_dir: &Path) -> Self {
        let mut name = source_path
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_default();
        name.push(".txt");
        let output_path = output_dir.join(name);
        Self {
            source_path,
            output_path,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// 源文件名（用于进度行）
    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// 单个工作项的最终结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 识别并写出成功
    Success { char_count: usize, word_count: usize },
    /// 输出已存在，本次未写入
    Skipped,
    /// 解码或识别失败
    Failed { error: String },
}

impl Outcome {
    /// 由识别文本构造成功结果
    pub fn from_text(text: &str) -> Self {
        Outcome::Success {
            char_count: text.chars().count(),
            word_count: text.split_whitespace().count(),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Success { .. } => OutcomeKind::Success,
            Outcome::Skipped => OutcomeKind::Skipped,
            Outcome::Failed { .. } => OutcomeKind::Failed,
        }
    }

    /// 进度行中的结果描述
    pub fn describe(&self) -> String {
        match self {
            Outcome::Success { char_count, .. } => format!("{} chars", char_count),
            Outcome::Skipped => "already processed".to_string(),
            Outcome::Failed { error } => format!("error: {}", error),
        }
    }
}

/// 结果类别（不含附带数据）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Success,
    Skipped,
    Failed,
}

/// 执行策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// 有界工作线程池
    Concurrent,
    /// 单线程，按发现顺序执行
    SingleThread,
}

impl ExecutionMode {
    /// 根据运行环境选择策略，每次运行只决定一次
    pub fn detect(force_single_thread: bool) -> Self {
        if force_single_thread {
            ExecutionMode::SingleThread
        } else {
            ExecutionMode::Concurrent
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Concurrent => write!(f, "concurrent"),
            ExecutionMode::SingleThread => write!(f, "single-thread"),
        }
    }
}

/// 一次 OCR 运行的配置，构造后只读
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// 识别语言，可为 `+` 连接的组合，如 `vie+eng`
    pub language: String,
    /// 工作线程数，`None` 表示使用全部可用核心
    pub workers: Option<usize>,
    pub mode: ExecutionMode,
}

impl RunConfig {
    /// 实际使用的工作线程数
    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(n) if n > 0 => n,
            _ => num_cpus::get().max(1),
        }
    }
}

/// 运行汇总
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub recognized: usize,
    pub skipped: usize,
    pub failed: usize,
    pub elapsed: Duration,
    pub mode: ExecutionMode,
}

impl RunSummary {
    /// 非失败项数量（成功 + 跳过）
    pub fn success_count(&self) -> usize {
        self.recognized + self.skipped
    }

    /// 平均每张耗时（秒）
    pub fn average_secs(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.elapsed.as_secs_f64() / self.total as f64
        }
    }

    /// 吞吐量（张/秒），仅并行策略报告
    pub fn throughput(&self) -> Option<f64> {
        let secs = self.elapsed.as_secs_f64();
        match self.mode {
            ExecutionMode::Concurrent if secs > 0.0 => Some(self.total as f64 / secs),
            _ => None,
        }
    }
}
