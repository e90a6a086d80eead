//! 日志宏
//!
//! 第一个参数可以是 `Logger`、`Arc<Logger>` 或 `LoggerHandle`，其余参数与
//! `format!` 相同。级别被过滤时参数不会被求值格式化。
//!
//! # 示例
//!
//! ```no_run
//! use catlog::log::LoggerHandle;
//!
//! static LOG: LoggerHandle = LoggerHandle::with_category("messaging", "agent_messaging");
//!
//! catlog::log::initialize("/var/log/agent");
//! catlog::debug!(LOG, "{} is logging...", "Foo");
//! catlog::error!(LOG, "lost {} messages", 3);
//! catlog::log::shutdown();
//! ```

/// 按指定级别记录日志
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level: $crate::log::LogLevel = $level;
        if logger.should_log(level) {
            logger.log(level, ::std::format_args!($($arg)+));
        }
    }};
}

/// 记录 TRACE 级别日志
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::log::LogLevel::Trace, $($arg)+)
    };
}

/// 记录 DEBUG 级别日志
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::log::LogLevel::Debug, $($arg)+)
    };
}

/// 记录 INFO 级别日志
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::log::LogLevel::Info, $($arg)+)
    };
}

/// 记录 WARN 级别日志
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::log::LogLevel::Warn, $($arg)+)
    };
}

/// 记录 ERROR 级别日志
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::log::LogLevel::Error, $($arg)+)
    };
}

/// 记录 FATAL 级别日志
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::log::LogLevel::Fatal, $($arg)+)
    };
}
