//! 包文档中关心的标签
//!
//! 标签名在这里统一归一化：忽略命名空间前缀并且不区分大小写，
//! 因此`title`、`dc:title`、`DC:Title`都得到同一个`Tag::Title`。

/// 归一化后的标签标识
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Metadata,
    Manifest,
    Spine,
    Title,
    Creator,
    Language,
    Meta,
    Item,
    ItemRef,
    Other,
}

impl Tag {
    /// 由原始(可能带前缀的)标签名得到归一化标识
    pub fn from_name(name: &[u8]) -> Tag {
        let local = match name.iter().rposition(|&b| b == b':') {
            Some(pos) => &name[pos + 1..],
            None => name,
        };

        const TABLE: [(&[u8], Tag); 9] = [
            (b"metadata", Tag::Metadata),
            (b"manifest", Tag::Manifest),
            (b"spine", Tag::Spine),
            (b"title", Tag::Title),
            (b"creator", Tag::Creator),
            (b"language", Tag::Language),
            (b"meta", Tag::Meta),
            (b"item", Tag::Item),
            (b"itemref", Tag::ItemRef),
        ];

        TABLE
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(local))
            .map(|(_, tag)| *tag)
            .unwrap_or(Tag::Other)
    }
}
