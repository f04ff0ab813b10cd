//! # ocr 命令实现
//!
//! 并行批量 OCR：发现图片 → 按策略逐项识别 → 汇报进度与汇总。
//!
//! ## 功能
//! - 输出目录中已有同名 .txt 的图片直接跳过，可断点续跑
//! - 单张图片失败不影响其他图片
//! - 一张都没有成功时命令以失败退出
//!
//! ## 依赖关系
//! - 使用 `cli/ocr.rs` 定义的参数
//! - 使用 `batch/`, `ocr/`, `models/`
//! - 使用 `utils/output.rs`, `utils/report.rs`

use crate::batch::{output_collisions, BatchResult, BatchRunner, FileCollector};
use crate::cli::ocr::OcrArgs;
use crate::error::{DoclensError, Result};
use crate::models::{ExecutionMode, RunConfig, RunSummary, WorkItem};
use crate::ocr::{OcrProcessor, Recognizer, TesseractRecognizer};
use crate::utils::output;
use crate::utils::report::{self, Reporter};

use std::fs;
use std::time::Instant;

/// 执行 ocr 命令
pub fn execute(args: OcrArgs) -> Result<()> {
    output::print_header("Batch OCR");

    let config = RunConfig {
        input_dir: args.input,
        output_dir: args.output,
        language: args.lang,
        workers: (args.workers > 0).then_some(args.workers),
        mode: ExecutionMode::detect(args.single_thread),
    };

    prepare_dirs(&config)?;

    output::print_info(&format!("Input: {}", config.input_dir.display()));
    output::print_info(&format!("Output: {}", config.output_dir.display()));
    output::print_info(&format!("Language: {}", config.language));

    let items = FileCollector::new(config.input_dir.clone()).discover(&config.output_dir);
    if items.is_empty() {
        output::print_warning("No image files found");
        return Err(DoclensError::NothingProcessed { total: 0 });
    }
    for (first, second) in output_collisions(&items) {
        output::print_warning(&format!(
            "{} and {} share one output file; only the first one written is kept",
            first, second
        ));
    }

    let runner = BatchRunner::new(config.mode, config.worker_count());
    output::print_info(&format!("Found {} images for OCR", items.len()));
    match runner.mode() {
        ExecutionMode::Concurrent => {
            output::print_info(&format!("Using {} parallel workers", runner.jobs()))
        }
        ExecutionMode::SingleThread => output::print_info("Processing on a single thread"),
    }
    output::print_separator();

    let recognizer = TesseractRecognizer::new(args.tesseract_cmd);
    let mut reporter = Reporter::new(items.len());
    let (batch, summary) = run_batch(&items, &config.language, &runner, &recognizer, &mut reporter);
    reporter.finish(&summary);

    if let Some(path) = &args.report {
        report::write_csv_report(path, &items, &batch)?;
        output::print_info(&format!("Report written to '{}'", path.display()));
    }

    finish_status(&summary)?;

    output::print_done(&format!(
        "Successfully processed {} of {} files into '{}'",
        summary.success_count(),
        summary.total,
        config.output_dir.display()
    ));

    Ok(())
}

/// 校验输入目录并创建输出目录，失败即中止整个运行
pub fn prepare_dirs(config: &RunConfig) -> Result<()> {
    if !config.input_dir.exists() {
        return Err(DoclensError::DirectoryNotFound {
            path: config.input_dir.display().to_string(),
        });
    }
    if !config.input_dir.is_dir() {
        return Err(DoclensError::NotADirectory {
            path: config.input_dir.display().to_string(),
        });
    }

    fs::create_dir_all(&config.output_dir).map_err(|e| DoclensError::FileWriteError {
        path: config.output_dir.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 运行结果：至少一项成功或跳过即为成功
pub fn finish_status(summary: &RunSummary) -> Result<()> {
    if summary.success_count() == 0 {
        return Err(DoclensError::NothingProcessed {
            total: summary.total,
        });
    }
    Ok(())
}

/// 对所有工作项执行识别，返回逐项结果和汇总
pub fn run_batch<R: Recognizer>(
    items: &[WorkItem],
    language: &str,
    runner: &BatchRunner,
    recognizer: &R,
    reporter: &mut Reporter,
) -> (BatchResult, RunSummary) {
    let processor = OcrProcessor::new(recognizer, language);
    let start = Instant::now();

    let batch = runner.run(
        items,
        |item| processor.process(item),
        |p| reporter.on_progress(p),
    );

    let summary = RunSummary {
        total: batch.total(),
        recognized: batch.recognized,
        skipped: batch.skipped,
        failed: batch.failed,
        elapsed: start.elapsed(),
        mode: runner.mode(),
    };

    (batch, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging;
    use crate::models::{Outcome, OutcomeKind};
    use crate::ocr::recognizer::RecognitionError;
    use image::{Rgb, RgbImage};
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    /// 图中有深色像素就"识别"出固定文本，否则为空
    struct InkRecognizer {
        calls: AtomicUsize,
    }

    impl InkRecognizer {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Recognizer for InkRecognizer {
        fn recognize(&self, image: &Path, _language: &str) -> std::result::Result<String, RecognitionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let loaded = imaging::load_normalized(image)?;
            let has_ink = loaded.image.to_luma8().pixels().any(|p| p.0[0] < 128);
            Ok(if has_ink { "HELLO WORLD".to_string() } else { String::new() })
        }
    }

    /// 引擎不存在：每一项都失败
    struct MissingEngine;

    impl Recognizer for MissingEngine {
        fn recognize(&self, _image: &Path, _language: &str) -> std::result::Result<String, RecognitionError> {
            Err(RecognitionError::EngineNotFound {
                command: "tesseract".to_string(),
            })
        }
    }

    fn summary_of(recognized: usize, skipped: usize, failed: usize) -> RunSummary {
        RunSummary {
            total: recognized + skipped + failed,
            recognized,
            skipped,
            failed,
            elapsed: Duration::from_millis(10),
            mode: ExecutionMode::Concurrent,
        }
    }

    fn write_text_image(path: &Path) {
        let mut img = RgbImage::from_pixel(32, 16, Rgb([255, 255, 255]));
        for x in 4..28 {
            for y in 6..10 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        img.save(path).unwrap();
    }

    fn write_blank_image(path: &Path) {
        RgbImage::from_pixel(32, 16, Rgb([255, 255, 255]))
            .save(path)
            .unwrap();
    }

    /// a.png 有文字，b.jpg 空白，c.png 损坏
    fn scenario() -> (TempDir, RunConfig) {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("in");
        fs::create_dir(&input).unwrap();
        write_text_image(&input.join("a.png"));
        write_blank_image(&input.join("b.jpg"));
        fs::write(input.join("c.png"), b"\x89PNG\r\n\x1a\ngarbage bytes").unwrap();
        fs::write(input.join("notes.txt"), b"not an image").unwrap();

        let config = RunConfig {
            input_dir: input,
            output_dir: tmp.path().join("out"),
            language: "eng".to_string(),
            workers: Some(2),
            mode: ExecutionMode::Concurrent,
        };
        (tmp, config)
    }

    fn run<R: Recognizer>(config: &RunConfig, recognizer: &R) -> (Vec<WorkItem>, BatchResult, RunSummary) {
        prepare_dirs(config).unwrap();
        let items = FileCollector::new(config.input_dir.clone()).discover(&config.output_dir);
        let runner = BatchRunner::new(config.mode, config.worker_count());
        let mut reporter = Reporter::silent();
        let (batch, summary) = run_batch(&items, &config.language, &runner, recognizer, &mut reporter);
        (items, batch, summary)
    }

    fn outcomes_by_name(items: &[WorkItem], batch: &BatchResult) -> HashMap<String, Outcome> {
        batch
            .outcomes
            .iter()
            .map(|(i, o)| (items[*i].file_name(), o.clone()))
            .collect()
    }

    #[test]
    fn test_mixed_folder_run() {
        let (_tmp, config) = scenario();
        let recognizer = InkRecognizer::new();

        let (items, batch, summary) = run(&config, &recognizer);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.success_count(), 2);
        assert_eq!(summary.failed, 1);

        let outcomes = outcomes_by_name(&items, &batch);
        assert!(matches!(outcomes["a.png"], Outcome::Success { char_count, .. } if char_count > 0));
        assert_eq!(outcomes["b.jpg"], Outcome::from_text(""));
        match &outcomes["c.png"] {
            Outcome::Failed { error } => assert!(error.starts_with("cannot decode image")),
            other => panic!("expected failure, got {:?}", other),
        }

        let out = &config.output_dir;
        assert_eq!(fs::read_to_string(out.join("a.txt")).unwrap(), "HELLO WORLD");
        assert_eq!(fs::read_to_string(out.join("b.txt")).unwrap(), "");
        assert!(!out.join("c.txt").exists());
    }

    #[test]
    fn test_resume_after_adding_an_image() {
        let (_tmp, config) = scenario();
        run(&config, &InkRecognizer::new());

        write_text_image(&config.input_dir.join("d.png"));
        let recognizer = InkRecognizer::new();
        let (items, batch, summary) = run(&config, &recognizer);

        let outcomes = outcomes_by_name(&items, &batch);
        assert_eq!(outcomes["a.png"], Outcome::Skipped);
        assert_eq!(outcomes["b.jpg"], Outcome::Skipped);
        assert_eq!(outcomes["c.png"].kind(), OutcomeKind::Failed);
        assert_eq!(outcomes["d.png"].kind(), OutcomeKind::Success);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.success_count(), 3);
        // 只有 c 和 d 真正调用了识别
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 2);
        assert!(config.output_dir.join("d.txt").exists());
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let (_tmp, config) = scenario();
        fs::remove_file(config.input_dir.join("c.png")).unwrap();
        let (_, _, first) = run(&config, &InkRecognizer::new());
        assert_eq!(first.recognized, 2);

        let recognizer = InkRecognizer::new();
        let (_, batch, second) = run(&config, &recognizer);

        assert_eq!(second.total, first.total);
        assert_eq!(second.success_count(), first.success_count());
        assert_eq!(second.skipped, 2);
        assert!(batch.outcomes.iter().all(|(_, o)| *o == Outcome::Skipped));
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_strategies_produce_same_outcomes() {
        let (tmp, config) = scenario();
        let single = RunConfig {
            output_dir: tmp.path().join("out-single"),
            mode: ExecutionMode::SingleThread,
            ..config.clone()
        };

        let (items_a, batch_a, summary_a) = run(&config, &InkRecognizer::new());
        let (items_b, batch_b, summary_b) = run(&single, &InkRecognizer::new());

        assert_eq!(summary_a.mode, ExecutionMode::Concurrent);
        assert_eq!(summary_b.mode, ExecutionMode::SingleThread);
        assert_eq!(outcomes_by_name(&items_a, &batch_a), outcomes_by_name(&items_b, &batch_b));
    }

    #[test]
    fn test_missing_input_is_a_setup_error() {
        let tmp = TempDir::new().unwrap();
        let config = RunConfig {
            input_dir: tmp.path().join("nope"),
            output_dir: tmp.path().join("out"),
            language: "eng".to_string(),
            workers: None,
            mode: ExecutionMode::Concurrent,
        };
        assert!(matches!(
            prepare_dirs(&config),
            Err(DoclensError::DirectoryNotFound { .. })
        ));
        assert!(!config.output_dir.exists());

        let file = tmp.path().join("file.png");
        fs::write(&file, b"x").unwrap();
        let config = RunConfig {
            input_dir: file,
            ..config
        };
        assert!(matches!(
            prepare_dirs(&config),
            Err(DoclensError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_finish_status_needs_one_success() {
        assert!(matches!(
            finish_status(&summary_of(0, 0, 4)),
            Err(DoclensError::NothingProcessed { total: 4 })
        ));
        assert!(finish_status(&summary_of(1, 0, 3)).is_ok());
        assert!(finish_status(&summary_of(0, 5, 0)).is_ok());
        assert!(matches!(
            finish_status(&summary_of(0, 0, 0)),
            Err(DoclensError::NothingProcessed { total: 0 })
        ));
    }

    #[test]
    fn test_missing_engine_fails_every_item() {
        let (_tmp, config) = scenario();
        for mode in [ExecutionMode::Concurrent, ExecutionMode::SingleThread] {
            let config = RunConfig {
                mode,
                ..config.clone()
            };
            let (_, batch, summary) = run(&config, &MissingEngine);

            assert_eq!(summary.total, 3);
            assert_eq!(summary.failed, 3);
            assert!(batch.outcomes.iter().all(|(_, o)| matches!(
                o,
                Outcome::Failed { error } if error.contains("tesseract")
            )));
            assert!(matches!(
                finish_status(&summary),
                Err(DoclensError::NothingProcessed { total: 3 })
            ));
            assert_eq!(fs::read_dir(&config.output_dir).unwrap().count(), 0);
        }
    }
}
