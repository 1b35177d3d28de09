//! 分页与阅读会话

pub mod pagination;
pub mod session;

pub use pagination::{Pagination, ReadingCursor, page_count, page_text};
pub use session::{ProgressEvent, ReaderSession};
