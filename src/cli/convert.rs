//! # convert 子命令 CLI 定义
//!
//! 批量转换图片格式 (JPEG -> PNG, PNG -> JPEG)
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 支持的目标格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum TargetFormat {
    /// PNG (from .jpg/.jpeg/.jpe/.jfif)
    Png,
    /// JPEG (from .png)
    Jpeg,
}

impl TargetFormat {
    /// 作为输入的扩展名
    pub fn source_extensions(&self) -> &'static [&'static str] {
        match self {
            TargetFormat::Png => &["jpg", "jpeg", "jpe", "jfif"],
            TargetFormat::Jpeg => &["png"],
        }
    }

    /// 输出扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Png => "png",
            TargetFormat::Jpeg => "jpg",
        }
    }
}

impl std::fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetFormat::Png => write!(f, "PNG"),
            TargetFormat::Jpeg => write!(f, "JPEG"),
        }
    }
}

/// convert 子命令参数
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input folder containing images
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output folder for converted images
    #[arg(short, long)]
    pub output: PathBuf,

    /// Target format
    #[arg(short, long, value_enum, default_value_t = TargetFormat::Png)]
    pub to: TargetFormat,

    /// JPEG quality (1-100)
    #[arg(short, long, default_value_t = 85, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}
