//! # convert 命令实现
//!
//! 批量转换图片格式。
//!
//! ## 功能
//! - JPEG (.jpg/.jpeg/.jpe/.jfif) -> PNG
//! - PNG -> JPEG（可设置质量）
//! - 透明通道压平为 RGB
//! - 支持并行处理，已存在的输出默认跳过
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `batch/collector.rs`, `imaging/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::batch::FileCollector;
use crate::cli::convert::{ConvertArgs, TargetFormat};
use crate::error::{DoclensError, Result};
use crate::imaging;
use crate::utils::{output, progress};

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    output::print_header(&format!("Converting to {} format", args.to));

    // 验证输入目录
    if !args.input.is_dir() {
        return Err(DoclensError::DirectoryNotFound {
            path: args.input.display().to_string(),
        });
    }

    // 创建输出目录
    fs::create_dir_all(&args.output).map_err(|e| DoclensError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let files = FileCollector::new(args.input.clone())
        .with_extensions(args.to.source_extensions())
        .collect();

    if files.is_empty() {
        output::print_warning(&format!(
            "No {} source files found under {}",
            args.to.source_extensions().join("/"),
            args.input.display()
        ));
        return Err(DoclensError::NothingProcessed { total: 0 });
    }

    output::print_info(&format!("Found {} files to convert", files.len()));

    // 设置并行度
    let num_threads = if args.jobs == 0 {
        num_cpus::get()
    } else {
        args.jobs
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .ok();

    let pb = progress::create_progress_bar(files.len() as u64, "Converting");
    let success_count = AtomicUsize::new(0);
    let skip_count = AtomicUsize::new(0);
    let fail_count = AtomicUsize::new(0);

    files.par_iter().for_each(|input_path| {
        match convert_one(input_path, &args.output, args.to, args.quality, args.overwrite) {
            Ok(ConvertStatus::Converted {
                output_path,
                input_size,
                output_size,
            }) => {
                success_count.fetch_add(1, Ordering::SeqCst);
                pb.suspend(|| {
                    output::print_conversion(
                        &file_name(input_path),
                        &format!(
                            "{} ({} -> {} bytes)",
                            file_name(&output_path),
                            input_size,
                            output_size
                        ),
                    );
                });
            }
            Ok(ConvertStatus::Skipped) => {
                skip_count.fetch_add(1, Ordering::SeqCst);
            }
            Err(e) => {
                fail_count.fetch_add(1, Ordering::SeqCst);
                pb.suspend(|| {
                    output::print_error(&format!("{}: {}", input_path.display(), e));
                });
            }
        }
        pb.inc(1);
    });

    pb.finish_and_clear();

    let converted = success_count.load(Ordering::SeqCst);
    let skipped = skip_count.load(Ordering::SeqCst);
    output::print_done(&format!(
        "Converted {} file(s) to {} in '{}' ({} skipped, {} failed)",
        converted,
        args.to,
        args.output.display(),
        skipped,
        fail_count.load(Ordering::SeqCst)
    ));

    if converted + skipped == 0 {
        return Err(DoclensError::NothingProcessed { total: files.len() });
    }

    Ok(())
}

#[derive(Debug)]
enum ConvertStatus {
    Converted {
        output_path: PathBuf,
        input_size: u64,
        output_size: u64,
    },
    Skipped,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 转换单个文件
fn convert_one(
    input_path: &Path,
    output_dir: &Path,
    target: TargetFormat,
    quality: u8,
    overwrite: bool,
) -> Result<ConvertStatus> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let output_path = output_dir.join(format!("{}.{}", stem, target.extension()));

    // 检查是否需要跳过
    if output_path.exists() && !overwrite {
        return Ok(ConvertStatus::Skipped);
    }

    let loaded = imaging::load_normalized(input_path)
        .map_err(|e| DoclensError::ImageError(format!("{}: {}", input_path.display(), e)))?;

    match target {
        TargetFormat::Png => loaded
            .image
            .save_with_format(&output_path, ImageFormat::Png)
            .map_err(|e| DoclensError::ImageError(e.to_string()))?,
        TargetFormat::Jpeg => write_jpeg(&loaded.image, &output_path, quality)?,
    }

    let input_size = file_size(input_path)?;
    let output_size = file_size(&output_path)?;

    Ok(ConvertStatus::Converted {
        output_path,
        input_size,
        output_size,
    })
}

/// JPEG 只接受 8 位灰度或 RGB
fn write_jpeg(image: &DynamicImage, path: &Path, quality: u8) -> Result<()> {
    let file = File::create(path).map_err(|e| DoclensError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);

    let result = match image.color() {
        ColorType::L8 | ColorType::Rgb8 => image.write_with_encoder(encoder),
        _ => DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder),
    };
    result.map_err(|e| DoclensError::ImageError(format!("{}: {}", path.display(), e)))
}

fn file_size(path: &Path) -> Result<u64> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| DoclensError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })
}
