//! 日志模块
//!
//! 进程级日志：命名 logger 按 sink 类别写入按大小滚动的日志文件，
//! 后台线程定期刷新。
//!
//! # 特性
//!
//! - 固定的 sink 类别集合，每个类别一个文件 `<base>/<category>.log`
//! - 按大小切分，保留有限数量的历史文件，每次打开文件写入横幅
//! - 注册表保证同一个 (类别, 名称) 只创建一个 logger
//! - 句柄可以声明为 `static`，首次使用时才解析
//! - 被过滤的记录不做任何格式化
//! - 可选的 `log` crate 桥接
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use catlog::log::LoggerHandle;
//!
//! static LOG: LoggerHandle = LoggerHandle::new("agent_messaging");
//! static LOG_MSG: LoggerHandle = LoggerHandle::with_category("messaging", "agent_messaging");
//!
//! fn main() {
//!     if !catlog::log::initialize("/var/log/agent") {
//!         std::process::exit(1);
//!     }
//!
//!     catlog::info!(LOG, "Static logger");
//!     catlog::debug!(LOG_MSG, "{} is logging...", "Foo");
//!
//!     catlog::log::shutdown();
//! }
//! ```

pub mod appender;
pub mod error;
pub mod facade;
pub mod flusher;
pub mod formatter;
pub mod global;
pub mod handle;
pub mod level;
pub mod log_record;
pub mod logger;
pub mod macros;
pub mod manager;
pub mod registry;

// 重新导出核心类型
pub use appender::{LogAppender, RollingFileAppender, RollingFileAppenderConfig};
pub use error::LogError;
pub use facade::install_log_facade;
pub use flusher::PeriodicFlusher;
pub use formatter::{LogFormatter, PatternFormatter, DEFAULT_PATTERN};
pub use handle::LoggerHandle;
pub use level::LogLevel;
pub use log_record::{current_thread_id, LogRecord};
pub use logger::Logger;
pub use manager::{default_banner, LogManager, LogManagerConfig, ROOT_LOGGER_NAME};
pub use registry::{LoggerKey, Registry};

pub use global::{
    default_logger, flush, get_logger, get_or_create_logger, initialize, initialize_with,
    is_initialized, shutdown,
};
