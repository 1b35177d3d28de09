//! 清单模块
//!
//! 提供包文档中资源清单的结构定义。

use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// 清单项: 资源ID到压缩包内相对路径的映射
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// 项目ID
    pub id: String,
    /// 文件路径(相对于包文档)
    pub href: String,
    /// 媒体类型
    pub media_type: Option<String>,
    /// 属性(如nav、cover-image等)
    pub properties: Option<String>,
}

impl ManifestEntry {
    /// 创建新的清单项
    pub fn new(id: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            media_type: None,
            properties: None,
        }
    }

    /// 检查是否包含指定属性
    pub fn has_property(&self, property: &str) -> bool {
        self.properties
            .as_deref()
            .is_some_and(|props| props.split_whitespace().any(|p| p == property))
    }

    /// 检查是否为封面图片(EPUB3 `properties="cover-image"`)
    pub fn is_cover_image(&self) -> bool {
        self.has_property("cover-image")
    }
}

/// 一次包文档读取得到的清单表
///
/// ID在同一个包文档内唯一，重复的ID以第一次出现为准。
/// 另外记录ID的插入顺序，供按文档顺序遍历使用。
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    items: HashMap<String, ManifestEntry>,
    order: Vec<String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加清单项，ID已存在时忽略
    pub fn insert(&mut self, entry: ManifestEntry) {
        if let Entry::Vacant(slot) = self.items.entry(entry.id.clone()) {
            self.order.push(entry.id.clone());
            slot.insert(entry);
        }
    }

    /// 根据ID获取清单项
    pub fn get(&self, id: &str) -> Option<&ManifestEntry> {
        self.items.get(id)
    }

    /// 根据ID获取href
    ///
    /// # 参数
    /// * `id` - 清单项ID
    ///
    /// # 返回值
    /// * `Option<&str>` - 相对于包文档的路径，ID不存在时为None
    pub fn href(&self, id: &str) -> Option<&str> {
        self.get(id).map(|entry| entry.href.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 按包文档中的出现顺序遍历清单项
    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }
}
