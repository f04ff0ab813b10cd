//! # 完成状态检查
//!
//! 以输出文件是否存在判断工作项是否已完成，使批处理可断点续跑。
//!
//! 只检查存在性，不校验内容：被截断的旧输出同样视为已完成，
//! 不会被重试。需要重做时删除对应的 `.txt` 即可。
//!
//! ## 依赖关系
//! - 被 `ocr/processor.rs` 调用

use crate::models::WorkItem;

/// 工作项的输出是否已存在
pub fn is_complete(item: &WorkItem) -> bool {
    item.output_path().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_complete_by_presence() {
        let tmp = TempDir::new().unwrap();
        let item = WorkItem::new(tmp.path().join("scan.png"), tmp.path());
        assert!(!is_complete(&item));

        // 空文件同样算作已完成
        fs::write(item.output_path(), b"").unwrap();
        assert!(is_complete(&item));
    }
}
