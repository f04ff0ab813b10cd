//! # 工具函数模块
//!
//! 提供美化输出、进度条、运行报告和日志初始化。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 子模块: output, progress, report, logging

pub mod logging;
pub mod output;
pub mod progress;
pub mod report;
