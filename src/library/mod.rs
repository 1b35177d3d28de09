//! 书库与阅读进度的JSON存储
//!
//! 这两个存储属于核心库之外的调用方，核心只产出[`BookMetadata`]和进度值。
//!
//! [`BookMetadata`]: crate::epub::BookMetadata

mod books;
mod progress;

pub use books::LibraryStore;
pub use progress::ProgressStore;
