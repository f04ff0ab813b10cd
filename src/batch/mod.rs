//! # 批量处理模块
//!
//! OCR 批处理的核心：发现文件、判断完成状态、按策略执行。
//!
//! ## 功能
//! - 收集并排序待处理图片
//! - 基于输出文件存在性的断点续跑
//! - 并行 / 单线程两种执行策略
//! - 按完成顺序汇报进度
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `rayon` 进行并行处理

pub mod collector;
pub mod runner;
pub mod tracker;

pub use collector::{output_collisions, FileCollector};
pub use runner::{BatchResult, BatchRunner, Progress};
