//! 包文档（OPF）读取模块
//!
//! 流式读取包文档，提取书名、作者、语言、封面引用、清单和阅读顺序。

mod manifest;
mod parser;
mod spine;
mod tag;

pub use manifest::{Manifest, ManifestEntry};
pub use parser::{PackageMetadata, read_metadata};
pub use spine::SpineItem;
pub use tag::Tag;
