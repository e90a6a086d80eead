//! catlog - 按类别路由的滚动文件日志
//!
//! ## 模块
//!
//! - **log**: 日志注册表、logger 句柄、滚动文件 sink、周期刷新
//! - **cfg**: 配置文件加载和人性化时长解析
//!
//! ## 设计理念
//!
//! - 🔒 **唯一性**: 同一个 (类别, 名称) 在进程内只有一个 logger
//! - 💤 **延迟解析**: 句柄在初始化之前就可以声明，首次记录时才绑定
//! - ⚡ **零成本过滤**: 被过滤的记录不格式化、不加锁
//! - 🛡️ **不打断调用方**: 写入失败只报告到标准错误

pub mod cfg;
pub mod log;

// 重新导出主要的公共 API
pub use self::log::{
    LogError, LogLevel, LogManager, LogManagerConfig, Logger, LoggerHandle, Registry,
};
