//! # 数据模型模块
//!
//! 定义 OCR 批处理的工作项、结果和运行配置。
//!
//! ## 依赖关系
//! - 被 `batch/`, `ocr/` 和 `commands/` 使用
//! - 子模块: work

pub mod work;

pub use work::{
    ExecutionMode, Outcome, OutcomeKind, RunConfig, RunSummary, WorkItem, DEFAULT_LANGUAGE,
};
