//! 包文档解析器模块
//!
//! 以事件流方式读取包文档。解析状态是一个显式的`Section`枚举，
//! 同一时刻只可能位于metadata、manifest、spine之一，或者都不在。

use crate::epub::opf::{
    manifest::{Manifest, ManifestEntry},
    spine::SpineItem,
    tag::Tag,
};
use crate::epub::path;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::{debug, warn};

/// 当前所处的包文档区段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Outside,
    Metadata,
    Manifest,
    Spine,
}

/// 需要捕获文本内容的元数据字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Creator,
    Language,
}

impl Field {
    fn from_tag(tag: Tag) -> Option<Field> {
        match tag {
            Tag::Title => Some(Field::Title),
            Tag::Creator => Some(Field::Creator),
            Tag::Language => Some(Field::Language),
            _ => None,
        }
    }

    fn tag(self) -> Tag {
        match self {
            Field::Title => Tag::Title,
            Field::Creator => Tag::Creator,
            Field::Language => Tag::Language,
        }
    }
}

/// 包文档读取结果
///
/// 各字段都是尽力而为的结果，缺失的字段由调用方使用默认值补全。
#[derive(Debug, Clone, Default)]
pub struct PackageMetadata {
    /// 第一个非空的title
    pub title: Option<String>,
    /// 第一个非空的creator
    pub author: Option<String>,
    /// 第一个非空的language
    pub language: Option<String>,
    /// `<meta name="cover" content="..."/>`声明的清单ID
    pub cover_id: Option<String>,
    /// 清单表
    pub manifest: Manifest,
    /// 脊柱(阅读顺序)
    pub spine: Vec<SpineItem>,
}

impl PackageMetadata {
    fn field_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Creator => &mut self.author,
            Field::Language => &mut self.language,
        }
    }

    /// 获取封面图片的href(相对于包文档)
    ///
    /// 先按`meta name="cover"`声明的ID在完整清单中查找，
    /// 找不到时再使用带`cover-image`属性的清单项。
    pub fn cover_href(&self) -> Option<&str> {
        self.cover_id
            .as_deref()
            .and_then(|id| self.manifest.href(id))
            .or_else(|| {
                self.manifest
                    .iter()
                    .find(|entry| entry.is_cover_image())
                    .map(|entry| entry.href.as_str())
            })
    }

    /// 获取阅读顺序中各内容文档在压缩包内的完整路径
    ///
    /// 包含所有idref能在清单中找到的脊柱项，`linear="no"`的项也保留，
    /// 过短的附属内容由章节过滤处理。
    ///
    /// # 参数
    /// * `package_dir` - 包文档所在目录，根目录时为空字符串
    ///
    /// # 返回值
    /// * `Vec<String>` - 按脊柱顺序排列的压缩包内路径
    pub fn reading_order(&self, package_dir: &str) -> Vec<String> {
        let non_linear = self.spine.iter().filter(|item| !item.linear).count();
        if non_linear > 0 {
            debug!(non_linear, "脊柱中包含非线性项");
        }

        self.spine
            .iter()
            .filter_map(|item| self.manifest.href(&item.idref))
            .map(|href| path::resolve(package_dir, href))
            .collect()
    }
}

/// 读取包文档
///
/// 这个函数不会失败: XML格式错误时停止扫描，返回已经收集到的内容。
/// 封面ID可能出现在对应清单项之前或之后，因此只在整个文档扫描完成后
/// 才通过`PackageMetadata::cover_href`解析。
///
/// # 参数
/// * `xml_content` - 包文档的原始字节
///
/// # 返回值
/// * `PackageMetadata` - 尽力读取到的元数据、清单和脊柱
pub fn read_metadata(xml_content: &[u8]) -> PackageMetadata {
    let mut reader = Reader::from_reader(xml_content);
    reader.config_mut().trim_text(true);
    reader.config_mut().expand_empty_elements = true;

    let mut result = PackageMetadata::default();
    let mut section = Section::Outside;
    let mut capture: Option<(Field, String)> = None;
    let mut buf = Vec::new();

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => {
                warn!(
                    position = reader.buffer_position(),
                    "包文档XML格式错误，返回已解析的部分: {}", e
                );
                break;
            }
        };

        match event {
            Event::Start(ref e) => {
                let tag = Tag::from_name(e.name().as_ref());
                match (section, tag) {
                    (_, Tag::Metadata) => section = Section::Metadata,
                    (_, Tag::Manifest) => section = Section::Manifest,
                    (_, Tag::Spine) => section = Section::Spine,
                    (Section::Metadata, Tag::Meta) => {
                        if attribute(e, b"name").as_deref() == Some("cover") {
                            if let Some(content) = attribute(e, b"content") {
                                result.cover_id.get_or_insert(content);
                            }
                        }
                    }
                    (Section::Metadata, tag) => {
                        if let Some(field) = Field::from_tag(tag) {
                            if capture.is_none() && result.field_mut(field).is_none() {
                                capture = Some((field, String::new()));
                            }
                        }
                    }
                    (Section::Manifest, Tag::Item) => {
                        if let Some(entry) = manifest_entry(e) {
                            result.manifest.insert(entry);
                        }
                    }
                    (Section::Spine, Tag::ItemRef) => {
                        if let Some(idref) = attribute(e, b"idref").filter(|v| !v.is_empty()) {
                            let linear = attribute(e, b"linear").as_deref() != Some("no");
                            result.spine.push(SpineItem::with_linear(idref, linear));
                        }
                    }
                    _ => {}
                }
            }
            Event::End(ref e) => {
                let tag = Tag::from_name(e.name().as_ref());
                match (section, tag) {
                    (Section::Metadata, Tag::Metadata)
                    | (Section::Manifest, Tag::Manifest)
                    | (Section::Spine, Tag::Spine) => section = Section::Outside,
                    _ => {}
                }

                if capture.as_ref().is_some_and(|(field, _)| field.tag() == tag) {
                    if let Some((field, text)) = capture.take() {
                        let text = text.trim();
                        if !text.is_empty() {
                            *result.field_mut(field) = Some(text.to_string());
                        }
                    }
                }
            }
            Event::Text(ref e) => {
                if let Some((_, text)) = capture.as_mut() {
                    match e.unescape() {
                        Ok(unescaped) => text.push_str(&unescaped),
                        Err(_) => text.push_str(&String::from_utf8_lossy(e)),
                    }
                }
            }
            Event::CData(ref e) => {
                if let Some((_, text)) = capture.as_mut() {
                    text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    debug!(
        title = ?result.title,
        manifest_items = result.manifest.len(),
        spine_items = result.spine.len(),
        "包文档读取完成"
    );

    result
}

/// 按本地名读取属性值，忽略格式错误的属性
fn attribute(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name)
        .map(|attr| match attr.unescape_value() {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
        })
}

/// 解析清单项，id或href缺失时返回None
fn manifest_entry(e: &BytesStart) -> Option<ManifestEntry> {
    let id = attribute(e, b"id").filter(|v| !v.is_empty())?;
    let href = attribute(e, b"href").filter(|v| !v.is_empty())?;

    Some(ManifestEntry {
        id,
        href,
        media_type: attribute(e, b"media-type"),
        properties: attribute(e, b"properties"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package version="2.0" xmlns="http://www.idpf.org/2007/opf" unique-identifier="BookId">
    <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
        <dc:title>Il nome della rosa</dc:title>
        <dc:title>Secondary Title</dc:title>
        <dc:creator opf:role="aut">Umberto Eco</dc:creator>
        <dc:creator>Someone Else</dc:creator>
        <dc:language>it</dc:language>
        <meta name="cover" content="img1"/>
    </metadata>
    <manifest>
        <item id="ch1" href="text/ch1.xhtml" media-type="application/xhtml+xml"/>
        <item id="img1" href="images/cover.jpg" media-type="image/jpeg"/>
        <item id="notes" href="text/notes.xhtml" media-type="application/xhtml+xml"/>
        <item id="ch2" href="text/ch2.xhtml" media-type="application/xhtml+xml"/>
    </manifest>
    <spine toc="ncx">
        <itemref idref="ch1"/>
        <itemref idref="notes" linear="no"/>
        <itemref idref="ghost"/>
        <itemref idref="ch2"/>
    </spine>
</package>"#;

    #[test]
    fn test_first_value_wins() {
        let metadata = read_metadata(SAMPLE_OPF.as_bytes());
        assert_eq!(metadata.title.as_deref(), Some("Il nome della rosa"));
        assert_eq!(metadata.author.as_deref(), Some("Umberto Eco"));
        assert_eq!(metadata.language.as_deref(), Some("it"));
    }

    #[test]
    fn test_cover_resolution() {
        let metadata = read_metadata(SAMPLE_OPF.as_bytes());
        assert_eq!(metadata.cover_id.as_deref(), Some("img1"));
        assert_eq!(metadata.cover_href(), Some("images/cover.jpg"));
        assert_eq!(metadata.manifest.len(), 4);
    }

    #[test]
    fn test_cover_declared_after_manifest() {
        let opf = r#"<package>
<manifest><item id="c" href="cover.png" media-type="image/png"/></manifest>
<metadata><title>Late</title><meta name="cover" content="c"/></metadata>
</package>"#;

        let metadata = read_metadata(opf.as_bytes());
        assert_eq!(metadata.cover_href(), Some("cover.png"));
        assert_eq!(metadata.title.as_deref(), Some("Late"));
    }

    #[test]
    fn test_cover_image_property_fallback() {
        let opf = r#"<package><metadata/>
<manifest>
<item id="x" href="img/front.png" media-type="image/png" properties="cover-image"/>
</manifest></package>"#;

        let metadata = read_metadata(opf.as_bytes());
        assert_eq!(metadata.cover_id, None);
        assert_eq!(metadata.cover_href(), Some("img/front.png"));
    }

    #[test]
    fn test_unknown_cover_id() {
        let opf = r#"<package><metadata><meta name="cover" content="nope"/></metadata>
<manifest><item id="a" href="a.xhtml" media-type="application/xhtml+xml"/></manifest></package>"#;

        let metadata = read_metadata(opf.as_bytes());
        assert_eq!(metadata.cover_href(), None);
    }

    #[test]
    fn test_titles_outside_metadata_ignored() {
        let opf = r#"<package>
<manifest><title>Not a book title</title></manifest>
<metadata><creator>Author</creator></metadata>
</package>"#;

        let metadata = read_metadata(opf.as_bytes());
        assert_eq!(metadata.title, None);
        assert_eq!(metadata.author.as_deref(), Some("Author"));
        assert_eq!(metadata.language, None);
    }

    #[test]
    fn test_empty_title_is_absent() {
        let opf = r#"<package><metadata><dc:title>  </dc:title><dc:title/>
<dc:title>Real &amp; Proper</dc:title></metadata></package>"#;

        let metadata = read_metadata(opf.as_bytes());
        assert_eq!(metadata.title.as_deref(), Some("Real & Proper"));
    }

    #[test]
    fn test_reading_order() {
        let metadata = read_metadata(SAMPLE_OPF.as_bytes());
        assert_eq!(metadata.spine.len(), 4);
        assert_eq!(
            metadata.reading_order("OEBPS"),
            vec![
                "OEBPS/text/ch1.xhtml",
                "OEBPS/text/notes.xhtml",
                "OEBPS/text/ch2.xhtml"
            ]
        );
        assert_eq!(
            metadata.reading_order(""),
            vec!["text/ch1.xhtml", "text/notes.xhtml", "text/ch2.xhtml"]
        );
    }

    #[test]
    fn test_non_linear_items_kept_in_order() {
        let metadata = read_metadata(SAMPLE_OPF.as_bytes());
        assert!(!metadata.spine[1].linear);
        assert_eq!(metadata.spine[1].idref, "notes");
        assert_eq!(metadata.reading_order("").len(), 3);
    }

    #[test]
    fn test_malformed_document_returns_partial() {
        let opf = r#"<package><metadata><dc:title>Partial</dc:title>
<dc:creator>Writer</dc:creator></metadata><manifest><item id="a" href="a.xhtml"/>
</wrong></package>"#;

        let metadata = read_metadata(opf.as_bytes());
        assert_eq!(metadata.title.as_deref(), Some("Partial"));
        assert_eq!(metadata.author.as_deref(), Some("Writer"));
        assert_eq!(metadata.manifest.len(), 1);
    }

    #[test]
    fn test_garbage_input() {
        let metadata = read_metadata(b"\x00\x01 not xml at all");
        assert_eq!(metadata.title, None);
        assert!(metadata.manifest.is_empty());
    }
}
