//! 压缩包内路径处理
//!
//! EPUB内部的路径总是以`/`分隔，与宿主操作系统无关，因此这里不使用`std::path`。

/// 获取路径所在的目录，根目录下的文件返回空字符串
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// 将相对href解析为压缩包内的完整路径
///
/// 目录为空时直接使用href；会去掉`#fragment`并规整`.`和`..`片段。
pub fn resolve(base_dir: &str, href: &str) -> String {
    let href = href.split('#').next().unwrap_or_default();
    let joined = if base_dir.is_empty() {
        href.to_string()
    } else {
        format!("{}/{}", base_dir, href)
    };
    normalize(&joined)
}

/// 规整路径中的`.`、`..`和重复分隔符
pub fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
