pub mod config;
pub mod epub;
pub mod library;
pub mod reading;

// === 核心API重新导出 ===

/// 书籍导入
pub use epub::{BookMetadata, ingest, load_chapters, try_ingest};

/// 错误处理
pub use epub::{EpubError, Result};

// === 数据结构 ===

/// 章节纯文本
pub use epub::Chapter;

/// 分页与阅读会话
pub use reading::{Pagination, ProgressEvent, ReaderSession, ReadingCursor};

/// 配置
pub use config::ReaderConfig;

/// 书库与进度存储
pub use library::{LibraryStore, ProgressStore};

// === 底层组件（高级用法） ===

/// 压缩包与包文档
pub use epub::{Container, Epub, ManifestEntry, PackageMetadata, RootFile, read_metadata};

// === 库信息 ===

/// 库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库的描述
pub const DESCRIPTION: &str = "EPUB导入、纯文本提取与分页阅读进度";
