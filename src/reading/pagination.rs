//! 分页模型
//!
//! 章节按固定字符数切页。全书进度用一个[0,1]之间的小数表示，
//! 第i章占据`[i/C, (i+1)/C)`这一段，章内页码进度再嵌套在这一段里。

use crate::epub::content::Chapter;

/// 阅读位置: 章节序号和章内页码，都从0开始
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadingCursor {
    pub chapter_index: usize,
    pub page_index: usize,
}

impl ReadingCursor {
    pub fn new(chapter_index: usize, page_index: usize) -> Self {
        Self {
            chapter_index,
            page_index,
        }
    }
}

/// 章节页数: `字符数 / 每页字符数 + 1`，空章节也有一页
pub fn page_count(chapter: &Chapter, chars_per_page: usize) -> usize {
    chapter.char_len() / chars_per_page.max(1) + 1
}

/// 取第`page_index`页的文本，超出范围时返回空字符串
///
/// # 参数
/// * `chapter` - 章节
/// * `page_index` - 从0开始的页码
/// * `chars_per_page` - 每页字符数
///
/// # 返回值
/// * `String` - 该页的字符切片
pub fn page_text(chapter: &Chapter, page_index: usize, chars_per_page: usize) -> String {
    let chars_per_page = chars_per_page.max(1);
    match page_index.checked_mul(chars_per_page) {
        Some(start) => chapter.text.chars().skip(start).take(chars_per_page).collect(),
        None => String::new(),
    }
}

/// 一组章节在给定每页字符数下的分页视图
#[derive(Debug, Clone, Copy)]
pub struct Pagination<'a> {
    chapters: &'a [Chapter],
    chars_per_page: usize,
}

impl<'a> Pagination<'a> {
    pub fn new(chapters: &'a [Chapter], chars_per_page: usize) -> Self {
        Self {
            chapters,
            chars_per_page: chars_per_page.max(1),
        }
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn chars_per_page(&self) -> usize {
        self.chars_per_page
    }

    /// 指定章节的页数，章节不存在时为0
    pub fn pages_in_chapter(&self, chapter_index: usize) -> usize {
        self.chapters
            .get(chapter_index)
            .map(|chapter| page_count(chapter, self.chars_per_page))
            .unwrap_or(0)
    }

    /// 光标所在页的文本
    pub fn page_text(&self, cursor: ReadingCursor) -> String {
        self.chapters
            .get(cursor.chapter_index)
            .map(|chapter| page_text(chapter, cursor.page_index, self.chars_per_page))
            .unwrap_or_default()
    }

    /// 光标 -> 全书进度
    ///
    /// `i/C + (p/P)/C`，章节只有一页时页码项为0，结果截断到[0,1]。
    pub fn progress(&self, cursor: ReadingCursor) -> f64 {
        let chapter_count = self.chapter_count();
        if chapter_count == 0 {
            return 0.0;
        }

        let chapters = chapter_count as f64;
        let pages = self.pages_in_chapter(cursor.chapter_index);
        let chapter_part = cursor.chapter_index as f64 / chapters;
        let page_part = if pages <= 1 {
            0.0
        } else {
            cursor.page_index as f64 / pages as f64
        };

        (chapter_part + page_part / chapters).clamp(0.0, 1.0)
    }

    /// 全书进度 -> 初始光标
    ///
    /// 只恢复到章节粒度，页码总是从0开始: 页数依赖每页字符数，
    /// 而它在两次阅读之间可能改变。
    ///
    /// # 参数
    /// * `fraction` - 保存的进度，NaN按0处理
    ///
    /// # 返回值
    /// * `ReadingCursor` - 所在章节的第一页
    pub fn cursor_for_progress(&self, fraction: f64) -> ReadingCursor {
        let chapter_count = self.chapter_count();
        if chapter_count == 0 {
            return ReadingCursor::default();
        }

        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let chapter_index =
            ((fraction * chapter_count as f64).floor() as usize).min(chapter_count - 1);

        ReadingCursor::new(chapter_index, 0)
    }

    /// 向后翻一页，已在最后一章最后一页时原样返回
    pub fn forward(&self, cursor: ReadingCursor) -> ReadingCursor {
        let pages = self.pages_in_chapter(cursor.chapter_index);
        if cursor.page_index + 1 < pages {
            ReadingCursor::new(cursor.chapter_index, cursor.page_index + 1)
        } else if cursor.chapter_index + 1 < self.chapter_count() {
            ReadingCursor::new(cursor.chapter_index + 1, 0)
        } else {
            cursor
        }
    }

    /// 向前翻一页，已在第一章第一页时原样返回
    ///
    /// 回到上一章时页码置0，与向后翻页对称。
    pub fn backward(&self, cursor: ReadingCursor) -> ReadingCursor {
        if cursor.page_index > 0 {
            ReadingCursor::new(cursor.chapter_index, cursor.page_index - 1)
        } else if cursor.chapter_index > 0 {
            ReadingCursor::new(cursor.chapter_index - 1, 0)
        } else {
            cursor
        }
    }

    /// 将光标限制在合法范围内
    pub fn clamp(&self, cursor: ReadingCursor) -> ReadingCursor {
        let chapter_count = self.chapter_count();
        if chapter_count == 0 {
            return ReadingCursor::default();
        }

        let chapter_index = cursor.chapter_index.min(chapter_count - 1);
        let last_page = self.pages_in_chapter(chapter_index) - 1;
        ReadingCursor::new(chapter_index, cursor.page_index.min(last_page))
    }
}
