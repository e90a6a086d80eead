//! cfg 模块 - 配置加载
//!
//! 日志配置可以来自代码默认值，也可以从本地文件加载（JSON/JSON5/YAML/TOML）

pub mod file_source;
pub mod serde_duration;

pub use file_source::{load_file, ConfigFormat};
pub use serde_duration::{format_duration, parse_duration, HumanDur};
