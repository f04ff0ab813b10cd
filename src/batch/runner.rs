//! # 批量执行器
//!
//! 按执行策略驱动所有工作项，并按完成顺序汇报结果。
//!
//! ## 功能
//! - 并行策略：基于 rayon 的有界线程池，工作线程把结果发到通道，
//!   由调用线程统一编号、汇报和计数
//! - 单线程策略：按发现顺序逐个执行，不需要任何同步
//! - 单项 panic 被隔离为该项的失败结果，且不打印默认的 panic 信息
//!
//! ## 依赖关系
//! - 被 `commands/ocr.rs` 调用
//! - 使用 `models/work.rs` 的 `WorkItem`, `Outcome`, `ExecutionMode`
//! - 使用 `rayon` 进行并行处理

use crate::models::{ExecutionMode, Outcome, WorkItem};

use rayon::prelude::*;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{mpsc, Once};
use std::thread;

thread_local! {
    /// 当前线程是否正在执行被隔离的单项处理
    static ISOLATING: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// 安装 panic hook：隔离中的 panic 不输出，其余交给原 hook
fn install_quiet_hook() {
    QUIET_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !ISOLATING.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

/// 单条进度事件
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// 已完成数量（即本条的序号，从 1 开始）
    pub completed: usize,
    /// 总数
    pub total: usize,
    pub item: &'a WorkItem,
    pub outcome: &'a Outcome,
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 识别成功数量
    pub recognized: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 按完成顺序记录的 (工作项下标, 结果)
    pub outcomes: Vec<(usize, Outcome)>,
}

impl BatchResult {
    /// 记录一项结果
    pub fn record(&mut self, index: usize, outcome: Outcome) {
        match outcome {
            Outcome::Success { .. } => self.recognized += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push((index, outcome));
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.recognized + self.skipped + self.failed
    }

    /// 按发现顺序排列的结果
    pub fn in_discovery_order(&self) -> Vec<(usize, &Outcome)> {
        let mut ordered: Vec<(usize, &Outcome)> =
            self.outcomes.iter().map(|(i, o)| (*i, o)).collect();
        ordered.sort_by_key(|(i, _)| *i);
        ordered
    }
}

/// 批量执行器
pub struct BatchRunner {
    mode: ExecutionMode,
    /// 并行作业数
    jobs: usize,
    pool: Option<rayon::ThreadPool>,
}

impl BatchRunner {
    /// 创建批量执行器
    ///
    /// 并行策略在此处建好线程池；建池失败时在处理任何一项之前
    /// 退回单线程策略。
    pub fn new(mode: ExecutionMode, jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };

        let (mode, pool) = match mode {
            ExecutionMode::Concurrent => {
                match rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .thread_name(|i| format!("doclens-worker-{}", i))
                    .build()
                {
                    Ok(pool) => (ExecutionMode::Concurrent, Some(pool)),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "worker pool unavailable, falling back to single-thread"
                        );
                        (ExecutionMode::SingleThread, None)
                    }
                }
            }
            ExecutionMode::SingleThread => (ExecutionMode::SingleThread, None),
        };

        Self { mode, jobs, pool }
    }

    /// 实际采用的执行策略
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// 工作线程数（单线程策略为 1）
    pub fn jobs(&self) -> usize {
        match self.mode {
            ExecutionMode::Concurrent => self.jobs,
            ExecutionMode::SingleThread => 1,
        }
    }

    /// 处理所有工作项
    ///
    /// `on_progress` 总在调用线程上按完成顺序执行，每项恰好一次。
    pub fn run<F, S>(&self, items: &[WorkItem], processor: F, on_progress: S) -> BatchResult
    where
        F: Fn(&WorkItem) -> Outcome + Sync,
        S: FnMut(Progress<'_>),
    {
        install_quiet_hook();
        match &self.pool {
            Some(pool) => Self::run_concurrent(pool, items, &processor, on_progress),
            None => Self::run_sequential(items, &processor, on_progress),
        }
    }

    fn run_concurrent<F, S>(
        pool: &rayon::ThreadPool,
        items: &[WorkItem],
        processor: &F,
        mut on_progress: S,
    ) -> BatchResult
    where
        F: Fn(&WorkItem) -> Outcome + Sync,
        S: FnMut(Progress<'_>),
    {
        let total = items.len();
        let mut result = BatchResult::default();
        let (tx, rx) = mpsc::channel::<(usize, Outcome)>();

        thread::scope(|scope| {
            scope.spawn(move || {
                pool.install(|| {
                    items
                        .par_iter()
                        .enumerate()
                        .with_max_len(1)
                        .for_each_with(tx, |tx, (index, item)| {
                            let outcome = process_isolated(processor, item);
                            // 接收端在所有发送端释放前不会关闭
                            let _ = tx.send((index, outcome));
                        });
                });
            });

            for (index, outcome) in rx {
                result.record(index, outcome);
                if let Some((_, outcome)) = result.outcomes.last() {
                    on_progress(Progress {
                        completed: result.outcomes.len(),
                        total,
                        item: &items[index],
                        outcome,
                    });
                }
            }
        });

        result
    }

    fn run_sequential<F, S>(items: &[WorkItem], processor: &F, mut on_progress: S) -> BatchResult
    where
        F: Fn(&WorkItem) -> Outcome,
        S: FnMut(Progress<'_>),
    {
        let total = items.len();
        let mut result = BatchResult::default();

        for (index, item) in items.iter().enumerate() {
            let outcome = process_isolated(processor, item);
            result.record(index, outcome);
            if let Some((_, outcome)) = result.outcomes.last() {
                on_progress(Progress {
                    completed: result.outcomes.len(),
                    total,
                    item,
                    outcome,
                });
            }
        }

        result
    }
}

/// 执行单项处理，panic 转为该项的失败结果
fn process_isolated<F>(processor: &F, item: &WorkItem) -> Outcome
where
    F: Fn(&WorkItem) -> Outcome,
{
    ISOLATING.with(|flag| flag.set(true));
    let result = panic::catch_unwind(AssertUnwindSafe(|| processor(item)));
    ISOLATING.with(|flag| flag.set(false));

    result.unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        tracing::debug!(file = %item.file_name(), %reason, "worker panicked");
        Outcome::Failed {
            error: format!("panicked: {}", reason),
        }
    })
}
