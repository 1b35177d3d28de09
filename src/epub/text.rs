//! 标记到纯文本的转换
//!
//! 转换步骤:
//! 1. 丢弃script和style元素及其内容
//! 2. `</p>`和标题结束处换成两个换行，`<br>`换成一个换行
//! 3. 去掉其余所有标签
//! 4. 每行内的连续空白合并为一个空格并去掉首尾空白
//! 5. 丢弃空行
//! 6. 用两个换行重新连接各行，每行前加上固定缩进
//!
//! 解析时字符实体会被解码，但解码出的`&`和`<`在输出中重新写成
//! `&amp;`和`&lt;`，否则再次转换时它们会被当作标签或实体。
//! 因此对输出再次转换会得到相同结果。

use scraper::node::Node;
use scraper::{ElementRef, Html};

/// 每个段落前的缩进
pub const PARAGRAPH_INDENT: &str = "    ";

/// 将HTML/XHTML转换为规整的纯文本
///
/// # 参数
/// * `html` - 原始标记，也可以是本函数之前的输出
///
/// # 返回值
/// * `String` - 每段带缩进、段间空一行的纯文本
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document_to_text(&document)
}

/// 将已解析的文档转换为规整的纯文本
pub fn document_to_text(document: &Html) -> String {
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);
    normalize_lines(&raw)
}

/// 递归收集元素的文本，并按标签类型插入换行
fn collect_text(element: ElementRef, result: &mut String) {
    let tag_name = element.value().name();

    if matches!(tag_name, "script" | "style") {
        result.push(' ');
        return;
    }

    if tag_name == "br" {
        result.push('\n');
        return;
    }

    result.push(' ');

    for node in element.children() {
        match node.value() {
            Node::Text(text) => {
                push_escaped(text, result);
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(node) {
                    collect_text(child_element, result);
                }
            }
            _ => {}
        }
    }

    match tag_name {
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            result.push_str("\n\n");
        }
        _ => {
            result.push(' ');
        }
    }
}

/// 追加文本节点，转义会被重新解析为标记的字符
fn push_escaped(text: &str, result: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            _ => result.push(ch),
        }
    }
}

/// 逐行合并空白、去掉空行，再加缩进用空行连接
fn normalize_lines(raw: &str) -> String {
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .map(|line| format!("{}{}", PARAGRAPH_INDENT, line))
        .collect::<Vec<_>>()
        .join("\n\n")
}
