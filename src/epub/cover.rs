//! 封面提取
//!
//! 将包文档声明的封面图片复制到缓存目录。缓存文件名只由源文件名决定，
//! 重复导入同一本书会覆盖旧的封面文件。

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::epub::error::Result;
use crate::epub::path;
use crate::epub::reader::Epub;

const DEFAULT_COVER_EXTENSION: &str = "png";

/// 封面缓存文件名: `<书籍文件名>_cover.<扩展名>`
pub fn cover_file_name(archive_path: &Path, cover_href: &str) -> String {
    let stem = archive_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "book".to_string());

    let extension = Path::new(cover_href)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_else(|| DEFAULT_COVER_EXTENSION.to_string());

    format!("{}_cover.{}", stem, extension)
}

/// 提取封面到缓存目录
///
/// `cover_href`相对于包文档所在目录解析。封面条目不存在或写入失败时
/// 返回None，不影响整本书的导入。
///
/// # 参数
/// * `epub` - 已打开的EPUB
/// * `package_dir` - 包文档所在目录
/// * `cover_href` - 清单中封面项的href
/// * `archive_path` - EPUB文件路径，用于生成缓存文件名
/// * `cache_dir` - 封面缓存目录
///
/// # 返回值
/// * `Option<PathBuf>` - 写出的封面文件路径
pub fn extract_cover(
    epub: &mut Epub,
    package_dir: &str,
    cover_href: &str,
    archive_path: &Path,
    cache_dir: &Path,
) -> Option<PathBuf> {
    let entry = path::resolve(package_dir, cover_href);

    match copy_cover(epub, &entry, cover_href, archive_path, cache_dir) {
        Ok(Some(out_path)) => {
            debug!(entry = entry.as_str(), path = %out_path.display(), "封面已缓存");
            Some(out_path)
        }
        Ok(None) => {
            warn!(entry = entry.as_str(), "封面条目不存在");
            None
        }
        Err(e) => {
            warn!(entry = entry.as_str(), "无法写入封面缓存: {}", e);
            None
        }
    }
}

fn copy_cover(
    epub: &mut Epub,
    entry: &str,
    cover_href: &str,
    archive_path: &Path,
    cache_dir: &Path,
) -> Result<Option<PathBuf>> {
    if !epub.has_entry(entry) {
        return Ok(None);
    }

    let data = epub.read_entry(entry)?;

    fs::create_dir_all(cache_dir)?;
    let out_path = cache_dir.join(cover_file_name(archive_path, cover_href));
    fs::write(&out_path, data)?;

    Ok(Some(out_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epub::reader::test_support::*;

    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

    #[test]
    fn test_cover_file_name() {
        assert_eq!(
            cover_file_name(Path::new("/books/Dune.epub"), "images/cover.JPG"),
            "Dune_cover.jpg"
        );
        assert_eq!(
            cover_file_name(Path::new("novel.epub"), "images/cover"),
            "novel_cover.png"
        );
    }

    #[test]
    fn test_extract_cover_relative_to_package_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("rosa.epub");
        write_archive(&file, &[("OEBPS/images/cover.jpg", JPEG_HEADER)]);
        let cache = dir.path().join("cache").join("covers");

        let mut epub = Epub::open(&file).unwrap();
        let out = extract_cover(&mut epub, "OEBPS", "images/cover.jpg", &file, &cache).unwrap();

        assert_eq!(out, cache.join("rosa_cover.jpg"));
        assert_eq!(fs::read(&out).unwrap(), JPEG_HEADER);
    }

    #[test]
    fn test_extract_cover_root_package() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("flat.epub");
        write_archive(&file, &[("cover.png", b"png-bytes")]);

        let mut epub = Epub::open(&file).unwrap();
        let out = extract_cover(&mut epub, "", "cover.png", &file, dir.path()).unwrap();
        assert_eq!(fs::read(out).unwrap(), b"png-bytes");
    }

    #[test]
    fn test_reingest_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("again.epub");
        write_archive(&file, &[("OEBPS/c.png", b"first")]);
        let cache = dir.path().join("covers");

        let mut epub = Epub::open(&file).unwrap();
        let first = extract_cover(&mut epub, "OEBPS", "c.png", &file, &cache).unwrap();
        let second = extract_cover(&mut epub, "OEBPS", "c.png", &file, &cache).unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read_dir(&cache).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_cover_entry() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nocover.epub");
        write_archive(&file, &[("OEBPS/other.png", b"x")]);

        let mut epub = Epub::open(&file).unwrap();
        let out = extract_cover(&mut epub, "OEBPS", "images/cover.jpg", &file, dir.path());
        assert!(out.is_none());
    }
}
