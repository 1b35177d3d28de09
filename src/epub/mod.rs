pub mod container;
pub mod content;
pub mod cover;
pub mod error;
pub mod ingest;
pub mod opf;
pub mod path;
pub mod reader;
pub mod text;

// 重新导出错误处理
pub use error::{EpubError, Result};

// 重新导出容器相关
pub use container::{Container, RootFile};

// 重新导出EPUB读取器
pub use reader::Epub;

// 重新导出导入相关
pub use content::{Chapter, extract_chapters, filter_short_chapters};
pub use cover::extract_cover;
pub use ingest::{BookMetadata, book_id, ingest, load_chapters, try_ingest};
pub use text::html_to_text;

// 重新导出OPF相关
pub use opf::{Manifest, ManifestEntry, PackageMetadata, SpineItem, read_metadata};
