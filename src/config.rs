//! 阅读配置模块
//!
//! 提供导入与分页参数的配置管理功能，支持从YAML文件加载配置。

use crate::epub::error::{EpubError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "bookery.yaml";

/// 导入与分页配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// 每页字符数
    pub chars_per_page: usize,
    /// 每页字符数的下限
    pub min_chars_per_page: usize,
    /// 低于该长度的章节视为非正文内容
    pub min_chapter_chars: usize,
    /// 包文档未声明语言时使用的语言代码
    pub default_language: String,
    /// 包文档未声明作者时使用的作者名
    pub unknown_author: String,
    /// 封面缓存目录
    pub cover_dir: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            chars_per_page: 1500,
            min_chars_per_page: 500,
            min_chapter_chars: 2000,
            default_language: "en".to_string(),
            unknown_author: "Unknown".to_string(),
            cover_dir: "covers".to_string(),
        }
    }
}

impl ReaderConfig {
    /// 实际使用的每页字符数，不低于下限且至少为1
    pub fn effective_chars_per_page(&self) -> usize {
        self.chars_per_page.max(self.min_chars_per_page).max(1)
    }

    /// 从指定配置文件加载
    ///
    /// # 参数
    /// * `path` - YAML配置文件路径
    ///
    /// # 返回值
    /// * `Result<ReaderConfig>` - 解析后的配置，读取或解析失败时返回错误
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| EpubError::ConfigError(format!("无法读取配置文件: {}", e)))?;

        serde_yml::from_str(&content)
            .map_err(|e| EpubError::ConfigError(format!("配置文件格式错误: {}", e)))
    }

    /// 加载配置文件，文件不存在时使用默认配置
    ///
    /// 文件存在但格式错误时返回错误，不会静默回退。
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// 生成默认配置文件
    ///
    /// # 参数
    /// * `path` - 要写入的配置文件路径
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let yaml_content = serde_yml::to_string(&Self::default())
            .map_err(|e| EpubError::ConfigError(format!("序列化配置失败: {}", e)))?;

        let content_with_header = format!(
            "# bookery 配置文件\n# chars_per_page 低于 min_chars_per_page 时按下限分页\n\n{}",
            yaml_content
        );

        fs::write(path.as_ref(), content_with_header)
            .map_err(|e| EpubError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
