use crate::log::appender::LogAppender;
use crate::log::error::report;
use crate::log::formatter::LogFormatter;
use crate::log::level::LogLevel;
use crate::log::log_record::LogRecord;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// 核心日志器
///
/// 负责级别过滤、格式化并把结果交给绑定的输出器。输出器被同一 sink
/// 类别下的所有 logger 共享，logger 本身不加锁，级别字段是原子量。
///
/// Logger 不可 Clone，共享时使用 `Arc<Logger>`。
pub struct Logger {
    name: String,
    level: AtomicU8,
    flush_level: AtomicU8,
    formatter: Arc<dyn LogFormatter>,
    appender: Arc<dyn LogAppender>,
}

impl Logger {
    /// 创建 logger，`name` 是日志行中显示的名称
    pub fn new(
        name: impl Into<String>,
        level: LogLevel,
        formatter: Arc<dyn LogFormatter>,
        appender: Arc<dyn LogAppender>,
    ) -> Self {
        Self {
            name: name.into(),
            level: AtomicU8::new(level as u8),
            flush_level: AtomicU8::new(LogLevel::Off as u8),
            formatter,
            appender,
        }
    }

    /// 设置达到该级别的记录写入后立即刷新输出器
    pub fn with_flush_level(self, level: LogLevel) -> Self {
        self.set_flush_level(level);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 设置日志级别
    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// 获取当前日志级别
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    pub fn set_flush_level(&self, level: LogLevel) {
        self.flush_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn flush_level(&self) -> LogLevel {
        LogLevel::from_u8(self.flush_level.load(Ordering::Relaxed))
    }

    /// 该级别的记录是否会被输出
    ///
    /// 参数构造代价较高时先调用它判断
    #[inline]
    pub fn should_log(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level >= self.level()
    }

    /// 记录日志
    ///
    /// 被过滤的记录在格式化之前返回。格式化和写入失败不会返回给调用方，
    /// 只输出到标准错误
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.should_log(level) {
            return;
        }

        let message = render_message(args);
        let record = LogRecord::new(level, &self.name, &message);
        let line = self.formatter.format(&record);

        if let Err(e) = self.appender.append(&line) {
            report(format_args!("dropped record from '{}': {:#}", self.name, e));
            return;
        }

        if level >= self.flush_level() {
            self.flush();
        }
    }

    /// 记录 TRACE 级别日志
    pub fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Trace, args)
    }

    /// 记录 DEBUG 级别日志
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, args)
    }

    /// 记录 INFO 级别日志
    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, args)
    }

    /// 记录 WARN 级别日志
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, args)
    }

    /// 记录 ERROR 级别日志
    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, args)
    }

    /// 记录 FATAL 级别日志
    pub fn fatal(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Fatal, args)
    }

    /// 刷新输出器
    pub fn flush(&self) {
        if let Err(e) = self.appender.flush() {
            report(format_args!("failed to flush logger '{}': {:#}", self.name, e));
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("flush_level", &self.flush_level())
            .finish_non_exhaustive()
    }
}

/// 渲染消息，Display 实现返回错误或 panic 时保留已写出的部分并加上标记
fn render_message(args: fmt::Arguments<'_>) -> String {
    let mut message = String::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| fmt::write(&mut message, args)));
    if !matches!(outcome, Ok(Ok(()))) {
        message.push_str(" [formatting error]");
    }
    message
}
