//! # 语言包探测
//!
//! 探测本机可用的 Tesseract 语言包，供用户选择 `--lang`。
//! 批处理核心从不调用这里，只接收一个语言字符串。
//!
//! ## 功能
//! - 解析 `tesseract --list-langs` 输出
//! - 扫描 tessdata 目录下的 `*.traineddata`
//! - 为常见语言补充与英语的组合（如 `vie+eng`）
//!
//! ## 依赖关系
//! - 被 `commands/langs.rs` 调用
//! - 使用 `glob` 匹配带版本号的安装目录
//! - 使用 `regex` 解析语言包文件名

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

/// 不属于自然语言的数据包
const EXCLUDED: &[&str] = &["osd", "equ"];

/// 与英语组合提供的语言
const PAIRED_WITH_ENGLISH: &[&str] = &["vie", "fra", "spa", "deu"];

/// 常见安装位置
const COMMON_TESSDATA_DIRS: &[&str] = &[
    "/usr/share/tesseract-ocr/tessdata",
    "/usr/share/tesseract-ocr/4.00/tessdata",
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tessdata",
    "/usr/local/share/tessdata",
    "/opt/homebrew/share/tessdata",
    "/usr/local/Cellar/tesseract/*/share/tessdata",
    r"C:\Program Files\Tesseract-OCR\tessdata",
    r"C:\Program Files (x86)\Tesseract-OCR\tessdata",
];

/// 语言包来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LangSource {
    /// `tesseract --list-langs`
    Engine,
    /// tessdata 目录
    Tessdata,
    /// 组合语言
    Composite,
    /// 什么都没找到时的默认值
    Fallback,
}

impl std::fmt::Display for LangSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LangSource::Engine => write!(f, "engine"),
            LangSource::Tessdata => write!(f, "tessdata"),
            LangSource::Composite => write!(f, "composite"),
            LangSource::Fallback => write!(f, "default"),
        }
    }
}

/// 一次探测的快照
#[derive(Debug, Clone, Default)]
pub struct LanguagePacks {
    /// 语言代码 -> 来源
    pub packs: BTreeMap<String, LangSource>,
    /// 按显示顺序排列的可选语言（单语言在前，组合在后）
    pub ordered: Vec<String>,
    /// 实际扫描过的 tessdata 目录
    pub scanned_dirs: Vec<PathBuf>,
}

/// 探测已安装的语言包
pub fn discover(tesseract_cmd: &str) -> LanguagePacks {
    let mut found: BTreeMap<String, LangSource> = BTreeMap::new();

    for code in list_langs_from_engine(tesseract_cmd) {
        found.entry(code).or_insert(LangSource::Engine);
    }

    let dirs = tessdata_dirs();
    for dir in &dirs {
        for code in scan_tessdata_dir(dir) {
            found.entry(code).or_insert(LangSource::Tessdata);
        }
    }

    let mut packs = build(found);
    packs.scanned_dirs = dirs;
    packs
}

/// 从单语言集合构造完整列表
fn build(mut found: BTreeMap<String, LangSource>) -> LanguagePacks {
    for code in EXCLUDED {
        found.remove(*code);
    }

    let mut ordered: Vec<String> = found.keys().cloned().collect();

    if found.contains_key("eng") {
        for lang in PAIRED_WITH_ENGLISH {
            if found.contains_key(*lang) {
                for combo in [format!("{}+eng", lang), format!("eng+{}", lang)] {
                    ordered.push(combo.clone());
                    found.insert(combo, LangSource::Composite);
                }
            }
        }
    }

    if ordered.is_empty() {
        ordered.push("eng".to_string());
        found.insert("eng".to_string(), LangSource::Fallback);
    }

    LanguagePacks {
        packs: found,
        ordered,
        scanned_dirs: Vec::new(),
    }
}

/// 调用 `tesseract --list-langs`，失败时返回空
fn list_langs_from_engine(tesseract_cmd: &str) -> Vec<String> {
    match Command::new(tesseract_cmd).arg("--list-langs").output() {
        Ok(output) if output.status.success() => {
            // 新版本写到 stdout，部分旧版本写到 stderr
            let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
            if text.trim().is_empty() {
                text = String::from_utf8_lossy(&output.stderr).into_owned();
            }
            parse_list_langs(&text)
        }
        Ok(output) => {
            tracing::debug!(status = %output.status, "--list-langs failed");
            Vec::new()
        }
        Err(e) => {
            tracing::debug!(command = tesseract_cmd, error = %e, "engine not runnable");
            Vec::new()
        }
    }
}

/// 解析 `--list-langs` 输出，跳过首行标题
pub fn parse_list_langs(text: &str) -> Vec<String> {
    text.lines()
        .skip_while(|l| !l.to_ascii_lowercase().contains("list of available languages"))
        .skip(1)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn traineddata_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z0-9_]+(?:-[A-Za-z0-9_]+)?)\.traineddata$")
            .expect("static traineddata pattern is valid")
    })
}

/// 列出目录中的语言包代码
pub fn scan_tessdata_dir(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let pattern = traineddata_pattern();
    entries
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let name = e.file_name();
            let name = name.to_str()?;
            pattern.captures(name).map(|c| c[1].to_string())
        })
        .collect()
}

/// 候选 tessdata 目录：环境变量、PATH 中的 tesseract 目录、常见安装位置
fn tessdata_dirs() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    if let Some(prefix) = env::var_os("TESSDATA_PREFIX") {
        let prefix = PathBuf::from(prefix);
        candidates.push(prefix.join("tessdata"));
        candidates.push(prefix);
    }

    if let Some(path) = env::var_os("PATH") {
        for dir in env::split_paths(&path) {
            if dir.to_string_lossy().to_lowercase().contains("tesseract") {
                candidates.push(dir.join("tessdata"));
            }
        }
    }

    for pattern in COMMON_TESSDATA_DIRS {
        if pattern.contains('*') {
            if let Ok(paths) = glob::glob(pattern) {
                candidates.extend(paths.filter_map(|p| p.ok()));
            }
        } else {
            candidates.push(PathBuf::from(pattern));
        }
    }

    let mut seen = BTreeSet::new();
    candidates
        .into_iter()
        .filter(|d| d.is_dir())
        .filter(|d| seen.insert(d.clone()))
        .collect()
}
