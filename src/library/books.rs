use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::epub::error::Result;
use crate::epub::ingest::BookMetadata;

/// 书库文件: 一个`BookMetadata`的JSON数组
#[derive(Debug, Clone)]
pub struct LibraryStore {
    path: PathBuf,
}

impl LibraryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取书库，文件不存在或内容损坏时返回空列表
    pub fn load(&self) -> Vec<BookMetadata> {
        if !self.path.exists() {
            return Vec::new();
        }

        match self.read() {
            Ok(books) => books,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    "书库文件无法读取，按空书库处理: {}", e
                );
                Vec::new()
            }
        }
    }

    fn read(&self) -> Result<Vec<BookMetadata>> {
        let json = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// 覆盖写入书库
    pub fn save(&self, books: &[BookMetadata]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(books)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// 加入一本书，已有相同id的记录时替换它
    pub fn upsert(&self, book: BookMetadata) -> Result<Vec<BookMetadata>> {
        let mut books = self.load();
        match books.iter_mut().find(|existing| existing.id == book.id) {
            Some(existing) => *existing = book,
            None => books.push(book),
        }
        self.save(&books)?;
        Ok(books)
    }
}
