//! 章节内容提取
//!
//! 按阅读顺序读取内容文档，转换为纯文本，并过滤掉过短的前后附属内容。

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::epub::error::Result;
use crate::epub::reader::Epub;
use crate::epub::text;

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title选择器无效"));

/// 一个章节的纯文本内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// 章节序号(过滤后从0开始连续编号)
    pub index: usize,
    /// 章节标题
    pub title: String,
    /// 规整后的纯文本
    pub text: String,
}

impl Chapter {
    /// 文本长度，按字符计算
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// 按阅读顺序提取所有章节
///
/// 单个章节读取或解码失败时跳过该章节，不影响其余章节。
/// 返回的列表未经过短内容过滤。
///
/// # 参数
/// * `epub` - 已打开的EPUB
/// * `reading_order` - 内容文档在压缩包内的完整路径
///
/// # 返回值
/// * `Vec<Chapter>` - 成功读取的章节，按阅读顺序编号
pub fn extract_chapters(epub: &mut Epub, reading_order: &[String]) -> Vec<Chapter> {
    let mut chapters = Vec::with_capacity(reading_order.len());

    for (position, entry) in reading_order.iter().enumerate() {
        match load_chapter(epub, entry, position) {
            Ok(chapter) => chapters.push(chapter),
            Err(e) => {
                warn!(entry = entry.as_str(), "跳过无法读取的章节: {}", e);
            }
        }
    }

    chapters
}

fn load_chapter(epub: &mut Epub, entry: &str, position: usize) -> Result<Chapter> {
    let html = epub.read_entry_string(entry)?;
    let document = Html::parse_document(&html);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("Chapter {}", position + 1));

    Ok(Chapter {
        index: position,
        title,
        text: text::document_to_text(&document),
    })
}

/// 过滤过短的章节
///
/// 长度低于`min_chars`的章节被视为目录、版权页等非正文内容而丢弃；
/// 如果所有章节都低于阈值，则原样返回，避免得到一本空书。
/// 返回的章节重新按0..N-1编号。
pub fn filter_short_chapters(chapters: Vec<Chapter>, min_chars: usize) -> Vec<Chapter> {
    let all_short = chapters.iter().all(|c| c.char_len() < min_chars);

    let kept: Vec<Chapter> = if all_short {
        debug!(min_chars, "所有章节都低于长度阈值，保留全部章节");
        chapters
    } else {
        let before = chapters.len();
        let kept: Vec<Chapter> = chapters
            .into_iter()
            .filter(|c| c.char_len() >= min_chars)
            .collect();
        debug!(before, after = kept.len(), min_chars, "已过滤短章节");
        kept
    };

    kept.into_iter()
        .enumerate()
        .map(|(index, chapter)| Chapter { index, ..chapter })
        .collect()
}
