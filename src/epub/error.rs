use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EpubError>;

/// Epub导入、阅读相关的错误类型
#[derive(Error, Debug)]
pub enum EpubError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("Zip文件错误: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("文件不是有效的压缩包: {0}")]
    NotAnArchive(String),

    #[error("缺少META-INF/container.xml")]
    MissingContainerDescriptor,

    #[error("container.xml中没有声明full-path的rootfile")]
    MissingRootfileDeclaration,

    #[error("包文档不存在: {0}")]
    PackageDocumentMissing(String),

    #[error("压缩包中不存在条目: {0}")]
    EntryNotFound(String),

    #[error("无法以UTF-8解码: {0}")]
    Decode(String),

    #[error("XML解析错误: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("配置文件错误: {0}")]
    ConfigError(String),

    #[error("书籍中没有可阅读的章节")]
    EmptyBook,
}
