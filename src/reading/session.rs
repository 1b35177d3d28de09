//! 阅读会话
//!
//! 会话持有一本书的章节和当前光标。光标每次变化都会返回一个
//! [`ProgressEvent`]，由调用方交给进度存储或书库视图，
//! 会话本身不写任何全局状态。

use std::path::Path;
use tracing::debug;

use crate::config::ReaderConfig;
use crate::epub::content::Chapter;
use crate::epub::error::{EpubError, Result};
use crate::epub::ingest;
use crate::reading::pagination::{Pagination, ReadingCursor};

/// 阅读进度变化消息
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub book_id: String,
    /// [0,1]之间的全书进度
    pub fraction: f64,
}

/// 一次阅读会话
#[derive(Debug, Clone)]
pub struct ReaderSession {
    book_id: String,
    chapters: Vec<Chapter>,
    chars_per_page: usize,
    cursor: ReadingCursor,
}

impl ReaderSession {
    /// 由章节列表和已保存的进度打开会话
    ///
    /// 章节列表为空时返回`EmptyBook`。
    pub fn open(
        book_id: impl Into<String>,
        chapters: Vec<Chapter>,
        stored_fraction: f64,
        chars_per_page: usize,
    ) -> Result<Self> {
        if chapters.is_empty() {
            return Err(EpubError::EmptyBook);
        }

        let chars_per_page = chars_per_page.max(1);
        let cursor =
            Pagination::new(&chapters, chars_per_page).cursor_for_progress(stored_fraction);

        let book_id = book_id.into();
        debug!(
            book_id = book_id.as_str(),
            stored_fraction,
            chapter = cursor.chapter_index,
            "打开阅读会话"
        );

        Ok(Self {
            book_id,
            chapters,
            chars_per_page,
            cursor,
        })
    }

    /// 从EPUB文件加载章节并打开会话
    pub fn load(archive_path: &Path, stored_fraction: f64, config: &ReaderConfig) -> Result<Self> {
        let chapters = ingest::load_chapters(archive_path, config)?;
        Self::open(
            ingest::book_id(archive_path),
            chapters,
            stored_fraction,
            config.effective_chars_per_page(),
        )
    }

    pub fn pagination(&self) -> Pagination<'_> {
        Pagination::new(&self.chapters, self.chars_per_page)
    }

    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn cursor(&self) -> ReadingCursor {
        self.cursor
    }

    pub fn chars_per_page(&self) -> usize {
        self.chars_per_page
    }

    pub fn current_chapter(&self) -> &Chapter {
        &self.chapters[self.cursor.chapter_index]
    }

    pub fn pages_in_current_chapter(&self) -> usize {
        self.pagination().pages_in_chapter(self.cursor.chapter_index)
    }

    /// 当前页的文本
    pub fn page_text(&self) -> String {
        self.pagination().page_text(self.cursor)
    }

    /// 当前光标对应的全书进度
    pub fn progress(&self) -> f64 {
        self.pagination().progress(self.cursor)
    }

    pub fn is_at_start(&self) -> bool {
        self.pagination().backward(self.cursor) == self.cursor
    }

    pub fn is_at_end(&self) -> bool {
        self.pagination().forward(self.cursor) == self.cursor
    }

    /// 下一页，已到书末时返回None
    pub fn next_page(&mut self) -> Option<ProgressEvent> {
        let next = self.pagination().forward(self.cursor);
        self.move_to(next)
    }

    /// 上一页，已在书首时返回None
    pub fn previous_page(&mut self) -> Option<ProgressEvent> {
        let previous = self.pagination().backward(self.cursor);
        self.move_to(previous)
    }

    /// 跳到指定章节的第一页，序号超出范围时跳到最后一章
    pub fn jump_to_chapter(&mut self, chapter_index: usize) -> Option<ProgressEvent> {
        let target = self
            .pagination()
            .clamp(ReadingCursor::new(chapter_index, 0));
        self.move_to(target)
    }

    /// 修改每页字符数，保留当前章节并把页码限制在新的页数内
    pub fn set_chars_per_page(&mut self, chars_per_page: usize) -> Option<ProgressEvent> {
        self.chars_per_page = chars_per_page.max(1);
        let clamped = self.pagination().clamp(self.cursor);
        self.cursor = clamped;
        Some(self.event())
    }

    /// "Part i of C"
    pub fn chapter_label(&self) -> String {
        format!(
            "Part {} of {}",
            self.cursor.chapter_index + 1,
            self.chapters.len()
        )
    }

    /// "Page p of P"
    pub fn page_label(&self) -> String {
        format!(
            "Page {} of {}",
            self.cursor.page_index + 1,
            self.pages_in_current_chapter()
        )
    }

    /// 结束会话，返回最终进度
    pub fn close(self) -> ProgressEvent {
        self.event()
    }

    fn move_to(&mut self, target: ReadingCursor) -> Option<ProgressEvent> {
        if target == self.cursor {
            return None;
        }
        self.cursor = target;
        Some(self.event())
    }

    fn event(&self) -> ProgressEvent {
        ProgressEvent {
            book_id: self.book_id.clone(),
            fraction: self.progress(),
        }
    }
}
