//! # 文件收集器
//!
//! 列出目录下的图片文件，生成确定顺序的待处理列表。
//!
//! ## 功能
//! - 只看直接子文件（不递归）
//! - 扩展名匹配不区分大小写
//! - 按文件名排序，保证两种执行策略的编号一致
//! - 指向图片的符号链接视同普通文件
//! - 找出输出文件名相同的图片（如 `a.png` 与 `a.jpg`）
//!
//! ## 依赖关系
//! - 被 `commands/ocr.rs`, `commands/convert.rs` 调用
//! - 使用 `walkdir` 遍历目录

use crate::models::WorkItem;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// OCR 可识别的图片扩展名
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "gif"];

/// 文件收集器
pub struct FileCollector {
    /// 输入目录
    input: PathBuf,
    /// 小写扩展名列表（不含点）
    extensions: Vec<String>,
}

impl FileCollector {
    /// 创建新的文件收集器，默认匹配 OCR 图片扩展名
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            extensions: IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// 设置匹配的扩展名
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// 收集所有匹配的文件，按文件名排序
    pub fn collect(&self) -> Vec<PathBuf> {
        if !self.input.is_dir() {
            return vec![];
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable directory entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.matches_extension(e.path()))
            .map(|e| e.into_path())
            .collect();

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        files
    }

    /// 收集并映射为工作项
    pub fn discover(&self, output_dir: &Path) -> Vec<WorkItem> {
        self.collect()
            .into_iter()
            .map(|path| WorkItem::new(path, output_dir))
            .collect()
    }

    /// 检查扩展名是否在匹配集合中
    fn matches_extension(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            }
            None => false,
        }
    }
}

/// 与前面某项写入同一输出文件的工作项：(先出现的文件名, 后出现的文件名)
///
/// 后出现的一项会因输出已存在而被当作已完成。
pub fn output_collisions(items: &[WorkItem]) -> Vec<(String, String)> {
    let mut owners: HashMap<&Path, &WorkItem> = HashMap::new();
    let mut collisions = Vec::new();

    for item in items {
        match owners.get(item.output_path()) {
            Some(first) => collisions.push((first.file_name(), item.file_name())),
            None => {
                owners.insert(item.output_path(), item);
            }
        }
    }

    collisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_collect_filters_and_sorts() {
        let tmp = TempDir::new().unwrap();
        for name in ["b.png", "IMG.JPG", "a.tiff", "doc.txt", "c.webp", "noext", "d.Gif"] {
            touch(tmp.path(), name);
        }

        let files = FileCollector::new(tmp.path().to_path_buf()).collect();
        assert_eq!(names(&files), vec!["IMG.JPG", "a.tiff", "b.png", "d.Gif"]);
    }

    #[test]
    fn test_collect_is_not_recursive() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "top.png");
        fs::create_dir(tmp.path().join("nested.png")).unwrap();
        touch(&tmp.path().join("nested.png"), "inner.png");

        let files = FileCollector::new(tmp.path().to_path_buf()).collect();
        assert_eq!(names(&files), vec!["top.png"]);
    }

    #[test]
    fn test_collect_empty_directory() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "readme.md");
        assert!(FileCollector::new(tmp.path().to_path_buf()).collect().is_empty());
    }

    #[test]
    fn test_custom_extensions() {
        let tmp = TempDir::new().unwrap();
        for name in ["a.jpg", "b.JFIF", "c.png", "d.jpe"] {
            touch(tmp.path(), name);
        }

        let files = FileCollector::new(tmp.path().to_path_buf())
            .with_extensions(&["jpg", ".jpeg", "jpe", "jfif"])
            .collect();
        assert_eq!(names(&files), vec!["a.jpg", "b.JFIF", "d.jpe"]);
    }

    #[test]
    fn test_discover_builds_work_items() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "page_002.png");
        touch(tmp.path(), "page_001.png");
        let out = tmp.path().join("out");

        let items = FileCollector::new(tmp.path().to_path_buf()).discover(&out);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].file_name(), "page_001.png");
        assert_eq!(items[0].output_path(), out.join("page_001.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_image_is_collected() {
        let tmp = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        touch(tmp.path(), "a.png");
        touch(elsewhere.path(), "real.png");
        std::os::unix::fs::symlink(elsewhere.path().join("real.png"), tmp.path().join("b.png"))
            .unwrap();

        let files = FileCollector::new(tmp.path().to_path_buf()).collect();
        assert_eq!(names(&files), vec!["a.png", "b.png"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_is_not_descended() {
        let tmp = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        touch(elsewhere.path(), "inner.png");
        std::os::unix::fs::symlink(elsewhere.path(), tmp.path().join("linked.png")).unwrap();
        touch(tmp.path(), "top.png");

        let files = FileCollector::new(tmp.path().to_path_buf()).collect();
        assert_eq!(names(&files), vec!["top.png"]);
    }

    #[test]
    fn test_output_collisions_between_stems() {
        let tmp = TempDir::new().unwrap();
        for name in ["a.jpg", "a.png", "b.png", "c.bmp", "c.gif"] {
            touch(tmp.path(), name);
        }

        let items = FileCollector::new(tmp.path().to_path_buf()).discover(&tmp.path().join("out"));
        let collisions = output_collisions(&items);
        assert_eq!(
            collisions,
            vec![
                ("a.jpg".to_string(), "a.png".to_string()),
                ("c.bmp".to_string(), "c.gif".to_string()),
            ]
        );
    }
}
