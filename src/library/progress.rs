use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::epub::error::Result;
use crate::reading::session::ProgressEvent;

/// 按书籍id保存阅读进度的JSON文件
///
/// 文件内容是`{"<bookId>": <fraction>}`形式的对象，未记录的书进度为0。
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
    entries: BTreeMap<String, f64>,
}

impl ProgressStore {
    /// 打开进度文件，文件不存在或损坏时从空记录开始
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = if path.exists() {
            match Self::read(&path) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        "进度文件无法读取，从空记录开始: {}", e
                    );
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Self { path, entries }
    }

    fn read(path: &Path) -> Result<BTreeMap<String, f64>> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// 读取进度，默认0
    pub fn progress(&self, book_id: &str) -> f64 {
        self.entries.get(book_id).copied().unwrap_or(0.0)
    }

    /// 写入进度，值被限制在[0,1]
    ///
    /// # 参数
    /// * `book_id` - 书籍标识
    /// * `fraction` - 全书进度
    ///
    /// # 返回值
    /// * `Result<()>` - 写入进度文件失败时返回错误
    pub fn set_progress(&mut self, book_id: &str, fraction: f64) -> Result<()> {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.entries.insert(book_id.to_string(), fraction);
        debug!(book_id, fraction, "保存阅读进度");
        self.persist()
    }

    /// 接收阅读会话发出的进度消息
    pub fn apply(&mut self, event: &ProgressEvent) -> Result<()> {
        self.set_progress(&event.book_id, event.fraction)
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_progress_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::open(dir.path().join("progress.json"));
        assert_eq!(store.progress("/unknown.epub"), 0.0);
    }

    #[test]
    fn test_set_progress_clamps_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");

        let mut store = ProgressStore::open(&path);
        store.set_progress("/a.epub", 1.7).unwrap();
        store.set_progress("/b.epub", -0.2).unwrap();
        store.set_progress("/c.epub", 0.42).unwrap();

        let reopened = ProgressStore::open(&path);
        assert_eq!(reopened.progress("/a.epub"), 1.0);
        assert_eq!(reopened.progress("/b.epub"), 0.0);
        assert_eq!(reopened.progress("/c.epub"), 0.42);
    }

    #[test]
    fn test_apply_event() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProgressStore::open(dir.path().join("progress.json"));

        let event = ProgressEvent {
            book_id: "/book.epub".to_string(),
            fraction: 0.625,
        };
        store.apply(&event).unwrap();
        assert_eq!(store.progress("/book.epub"), 0.625);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let store = ProgressStore::open(&path);
        assert_eq!(store.progress("/a.epub"), 0.0);
    }
}
