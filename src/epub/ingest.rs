//! 书籍导入
//!
//! 对外的两个入口:
//! - [`ingest`]: 读取书目信息并缓存封面，得到完整的[`BookMetadata`]或者None
//! - [`load_chapters`]: 读取阅读顺序中的章节纯文本
//!
//! 两者都在函数内部打开并释放压缩包，彼此之间没有共享状态。

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::config::ReaderConfig;
use crate::epub::content::{self, Chapter};
use crate::epub::cover;
use crate::epub::error::Result;
use crate::epub::opf;
use crate::epub::path;
use crate::epub::reader::Epub;

/// 书目信息
///
/// 序列化字段与书库JSON文件一致(`coverUrl`为封面缓存路径)。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    /// 书籍的稳定标识(文件的规范绝对路径)
    pub id: String,
    pub title: String,
    pub author: String,
    pub language: String,
    #[serde(rename = "coverUrl", default)]
    pub cover_path: Option<String>,
}

/// 由文件路径得到稳定的书籍标识
pub fn book_id(archive_path: &Path) -> String {
    archive_path
        .canonicalize()
        .unwrap_or_else(|_| archive_path.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

/// 导入一本书，任何导入级别的错误都返回None
pub fn ingest(
    archive_path: &Path,
    cache_dir: &Path,
    config: &ReaderConfig,
) -> Option<BookMetadata> {
    match try_ingest(archive_path, cache_dir, config) {
        Ok(book) => Some(book),
        Err(e) => {
            warn!(path = %archive_path.display(), "导入失败: {}", e);
            None
        }
    }
}

/// 导入一本书并返回失败原因
///
/// 压缩包无法打开、缺少container.xml、缺少包文档都会使导入失败；
/// 书名、作者、语言、封面缺失时使用默认值。
///
/// # 参数
/// * `archive_path` - EPUB文件路径
/// * `cache_dir` - 缓存目录，封面写入其下的封面子目录
/// * `config` - 阅读配置，提供默认语言和未知作者
///
/// # 返回值
/// * `Result<BookMetadata>` - 书目信息
pub fn try_ingest(
    archive_path: &Path,
    cache_dir: &Path,
    config: &ReaderConfig,
) -> Result<BookMetadata> {
    let mut epub = Epub::open(archive_path)?;
    let (package_path, package_content) = epub.read_package_document()?;
    let package_dir = path::parent_dir(&package_path);

    let metadata = opf::read_metadata(&package_content);

    let cover_path = metadata.cover_href().and_then(|href| {
        cover::extract_cover(
            &mut epub,
            package_dir,
            href,
            archive_path,
            &cache_dir.join(&config.cover_dir),
        )
    });

    let title = metadata.title.unwrap_or_else(|| {
        archive_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let book = BookMetadata {
        id: book_id(archive_path),
        title,
        author: metadata
            .author
            .unwrap_or_else(|| config.unknown_author.clone()),
        language: metadata
            .language
            .unwrap_or_else(|| config.default_language.clone()),
        cover_path: cover_path.map(|p| p.to_string_lossy().into_owned()),
    };

    info!(id = book.id.as_str(), title = book.title.as_str(), "书籍导入完成");
    Ok(book)
}

/// 读取章节纯文本并过滤短章节
///
/// # 参数
/// * `archive_path` - EPUB文件路径
/// * `config` - 阅读配置，提供短章节阈值
///
/// # 返回值
/// * `Result<Vec<Chapter>>` - 过滤并重新编号后的章节
pub fn load_chapters(archive_path: &Path, config: &ReaderConfig) -> Result<Vec<Chapter>> {
    let mut epub = Epub::open(archive_path)?;
    let (package_path, package_content) = epub.read_package_document()?;

    let metadata = opf::read_metadata(&package_content);
    let reading_order = metadata.reading_order(path::parent_dir(&package_path));

    let chapters = content::extract_chapters(&mut epub, &reading_order);
    let chapters = content::filter_short_chapters(chapters, config.min_chapter_chars);

    info!(
        path = %archive_path.display(),
        chapters = chapters.len(),
        "章节加载完成"
    );
    Ok(chapters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::error::EpubError;
    use crate::epub::reader::test_support::*;
    use std::fs;

    const FULL_OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package version="2.0" xmlns="http://www.idpf.org/2007/opf">
    <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
        <dc:title>Il barone rampante</dc:title>
        <dc:creator>Italo Calvino</dc:creator>
        <dc:language>it</dc:language>
        <meta name="cover" content="img1"/>
    </metadata>
    <manifest>
        <item id="img1" href="images/cover.jpg" media-type="image/jpeg"/>
        <item id="toc" href="text/toc.xhtml" media-type="application/xhtml+xml"/>
        <item id="ch1" href="text/ch1.xhtml" media-type="application/xhtml+xml"/>
    </manifest>
    <spine>
        <itemref idref="toc"/>
        <itemref idref="ch1"/>
    </spine>
</package>"#;

    const BARE_OPF: &str = r#"<package><metadata></metadata><manifest/><spine/></package>"#;

    fn build_book(path: &Path, opf: &str) {
        let body = format!("<p>{}</p>", "Cosimo salì sull'elce. ".repeat(120));
        let ch1 = chapter_xhtml("Capitolo 1", &body);
        let toc = chapter_xhtml("Indice", "<p>Capitolo 1</p>");
        write_archive(
            path,
            &[
                ("mimetype", b"application/epub+zip"),
                ("META-INF/container.xml", CONTAINER_XML.as_bytes()),
                ("OEBPS/content.opf", opf.as_bytes()),
                ("OEBPS/images/cover.jpg", &[0xFF, 0xD8, 0xFF]),
                ("OEBPS/text/toc.xhtml", toc.as_bytes()),
                ("OEBPS/text/ch1.xhtml", ch1.as_bytes()),
            ],
        );
    }

    #[test]
    fn test_ingest_full_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("barone.epub");
        build_book(&file, FULL_OPF);
        let cache = dir.path().join("cache");

        let book = ingest(&file, &cache, &ReaderConfig::default()).unwrap();
        assert_eq!(book.title, "Il barone rampante");
        assert_eq!(book.author, "Italo Calvino");
        assert_eq!(book.language, "it");
        assert_eq!(book.id, book_id(&file));

        let cover = book.cover_path.unwrap();
        assert!(cover.ends_with("barone_cover.jpg"));
        assert_eq!(fs::read(cover).unwrap(), vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_ingest_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("senza-titolo.epub");
        build_book(&file, BARE_OPF);

        let config = ReaderConfig::default();
        let book = ingest(&file, dir.path(), &config).unwrap();
        assert_eq!(book.title, "senza-titolo");
        assert_eq!(book.author, config.unknown_author);
        assert_eq!(book.language, "en");
        assert_eq!(book.cover_path, None);
    }

    #[test]
    fn test_id_stable_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("stable.epub");
        build_book(&file, FULL_OPF);
        let config = ReaderConfig::default();

        let first = ingest(&file, dir.path(), &config).unwrap();
        let second = ingest(&file, dir.path(), &config).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ingest_non_archive_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("random.epub");
        fs::write(&file, [0x13u8, 0x37, 0x00, 0x42, 0x99].repeat(64)).unwrap();

        assert!(ingest(&file, dir.path(), &ReaderConfig::default()).is_none());
        assert!(matches!(
            try_ingest(&file, dir.path(), &ReaderConfig::default()),
            Err(EpubError::NotAnArchive(_))
        ));
    }

    #[test]
    fn test_ingest_missing_package_document_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hollow.epub");
        write_archive(
            &file,
            &[
                ("mimetype", b"application/epub+zip"),
                ("META-INF/container.xml", CONTAINER_XML.as_bytes()),
            ],
        );

        assert!(ingest(&file, dir.path(), &ReaderConfig::default()).is_none());
    }

    #[test]
    fn test_load_chapters_filters_front_matter() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("barone.epub");
        build_book(&file, FULL_OPF);

        let chapters = load_chapters(&file, &ReaderConfig::default()).unwrap();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].index, 0);
        assert_eq!(chapters[0].title, "Capitolo 1");
        assert!(chapters[0].text.contains("Cosimo salì sull'elce."));
    }

    #[test]
    fn test_load_chapters_keeps_all_short() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("barone.epub");
        build_book(&file, FULL_OPF);

        let config = ReaderConfig {
            min_chapter_chars: 1_000_000,
            ..ReaderConfig::default()
        };
        let chapters = load_chapters(&file, &config).unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Indice");
    }

    #[test]
    fn test_metadata_json_field_names() {
        let book = BookMetadata {
            id: "/books/a.epub".to_string(),
            title: "A".to_string(),
            author: "B".to_string(),
            language: "en".to_string(),
            cover_path: Some("/cache/covers/a_cover.png".to_string()),
        };

        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json["coverUrl"], "/cache/covers/a_cover.png");
        assert_eq!(json["title"], "A");
    }
}
