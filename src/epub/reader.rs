use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;
use zip::result::ZipError;

use crate::epub::container::{CONTAINER_PATH, Container};
use crate::epub::error::{EpubError, Result};
use crate::epub::path;

const EXPECTED_MIMETYPE: &str = "application/epub+zip";

/// 表示一个已打开的EPUB压缩包
///
/// 压缩包句柄随`Epub`一起释放，调用方在一次导入或一次章节加载内
/// 创建并丢弃它即可。
pub struct Epub {
    archive: ZipArchive<File>,
}

impl Epub {
    /// 从文件路径打开EPUB
    ///
    /// 文件不是zip结构时返回`NotAnArchive`。
    ///
    /// # 参数
    /// * `path` - EPUB文件的路径
    ///
    /// # 返回值
    /// * `Result<Epub>` - 成功返回Epub实例，失败返回错误
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Epub> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let archive = ZipArchive::new(file)
            .map_err(|e| EpubError::NotAnArchive(format!("{}: {}", path.display(), e)))?;

        let mut epub = Epub { archive };
        epub.check_mimetype();

        Ok(epub)
    }

    /// 检查mimetype条目
    ///
    /// 很多实际流通的文件缺少或写错了mimetype，这里只记录警告，不拒绝打开。
    fn check_mimetype(&mut self) {
        match self.read_entry_string("mimetype") {
            Ok(content) if content.trim() == EXPECTED_MIMETYPE => {
                debug!("mimetype检查通过");
            }
            Ok(content) => {
                warn!(found = content.trim(), "mimetype不是{}", EXPECTED_MIMETYPE);
            }
            Err(e) => {
                warn!("无法读取mimetype: {}", e);
            }
        }
    }

    /// 列出压缩包中的所有条目
    pub fn list_entries(&mut self) -> Result<Vec<String>> {
        let mut entries = Vec::with_capacity(self.archive.len());

        for i in 0..self.archive.len() {
            let file = self.archive.by_index(i)?;
            entries.push(file.name().to_string());
        }

        Ok(entries)
    }

    /// 检查条目是否存在
    pub fn has_entry(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// 读取指定条目的二进制内容
    ///
    /// 条目不存在时返回`EntryNotFound`。
    ///
    /// # 参数
    /// * `name` - 压缩包内的完整条目名
    ///
    /// # 返回值
    /// * `Result<Vec<u8>>` - 条目的二进制内容
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut file = self.archive.by_name(name).map_err(|e| match e {
            ZipError::FileNotFound => EpubError::EntryNotFound(name.to_string()),
            other => EpubError::Zip(other),
        })?;
        let mut buffer = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    /// 读取指定条目并按UTF-8解码
    ///
    /// # 参数
    /// * `name` - 压缩包内的完整条目名
    ///
    /// # 返回值
    /// * `Result<String>` - 解码后的文本，不是合法UTF-8时返回`Decode`
    pub fn read_entry_string(&mut self, name: &str) -> Result<String> {
        let bytes = self.read_entry(name)?;
        String::from_utf8(bytes).map_err(|_| EpubError::Decode(name.to_string()))
    }

    /// 解析container.xml
    pub fn parse_container(&mut self) -> Result<Container> {
        let content = self.read_entry(CONTAINER_PATH).map_err(|e| match e {
            EpubError::EntryNotFound(_) => EpubError::MissingContainerDescriptor,
            other => other,
        })?;
        Container::parse_xml(&content)
    }

    /// 定位包文档(OPF)的路径
    ///
    /// # 返回值
    /// * `Result<String>` - 包文档在压缩包内的完整路径
    pub fn package_path(&mut self) -> Result<String> {
        let container = self.parse_container()?;

        container
            .package_path()
            .map(str::to_string)
            .ok_or(EpubError::MissingRootfileDeclaration)
    }

    /// 读取包文档内容，返回(包文档路径, 内容)
    ///
    /// # 返回值
    /// * `Result<(String, Vec<u8>)>` - 包文档路径及其内容
    ///   (条目缺失时返回`PackageDocumentMissing`)
    pub fn read_package_document(&mut self) -> Result<(String, Vec<u8>)> {
        let package_path = self.package_path()?;
        let content = self.read_entry(&package_path).map_err(|e| match e {
            EpubError::EntryNotFound(p) => EpubError::PackageDocumentMissing(p),
            other => other,
        })?;
        Ok((package_path, content))
    }

    /// 获取包文档所在的目录
    pub fn package_directory(&mut self) -> Result<String> {
        let package_path = self.package_path()?;
        Ok(path::parent_dir(&package_path).to_string())
    }
}
