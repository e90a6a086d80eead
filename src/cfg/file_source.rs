//! 文件配置源
//!
//! 从本地文件加载配置，根据扩展名选择解析器

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// 支持的配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Json5,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// 根据扩展名判断格式
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .ok_or_else(|| anyhow!("配置文件缺少扩展名: {}", path.display()))?;

        match ext.as_str() {
            "json" => Ok(Self::Json),
            "json5" => Ok(Self::Json5),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(anyhow!("不支持的文件格式: {}", ext)),
        }
    }

    /// 按格式解析配置内容
    pub fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T> {
        match self {
            Self::Json => Ok(serde_json::from_str(content)?),
            Self::Json5 => Ok(json5::from_str(content)?),
            Self::Yaml => Ok(serde_yaml::from_str(content)?),
            Self::Toml => Ok(toml::from_str(content)?),
        }
    }
}

/// 读取并解析配置文件
///
/// # 示例
/// ```no_run
/// use catlog::cfg::load_file;
/// use catlog::log::LogManagerConfig;
///
/// let config: LogManagerConfig = load_file("config/logging.yaml").unwrap();
/// ```
pub fn load_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
    format
        .parse(&content)
        .with_context(|| format!("解析配置文件失败: {}", path.display()))
}
