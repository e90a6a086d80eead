use crate::log::error::{report, LogError};
use crate::log::global;
use crate::log::level::LogLevel;
use crate::log::registry::Registry;
use crate::log::Logger;
use once_cell::sync::OnceCell;
use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Logger 句柄
///
/// 构造时只记录类别和名称，不访问注册表，因此可以声明为 `static`，
/// 在日志系统初始化之前就存在。第一次真正记录日志时才向全局注册表解析，
/// 解析结果在句柄的整个生命周期内缓存，不会重新解析。
///
/// 多个线程同时触发解析时只有一个线程执行查找，其余线程等待并得到同一个
/// logger。
///
/// # 示例
///
/// ```no_run
/// use catlog::log::LoggerHandle;
///
/// static LOG: LoggerHandle = LoggerHandle::new("agent_messaging");
/// static LOG_MSG: LoggerHandle = LoggerHandle::with_category("messaging", "agent_messaging");
///
/// fn main() {
///     catlog::log::initialize("/var/log/agent");
///     catlog::info!(LOG, "Static logger");
///     catlog::debug!(LOG_MSG, "{} is logging...", "Foo");
///     catlog::log::shutdown();
/// }
/// ```
pub struct LoggerHandle {
    /// None 表示注册表的默认类别
    category: Option<Cow<'static, str>>,
    name: Cow<'static, str>,
    logger: OnceCell<Arc<Logger>>,
    warned: AtomicBool,
}

impl LoggerHandle {
    /// 默认类别下的句柄
    pub const fn new(name: &'static str) -> Self {
        Self {
            category: None,
            name: Cow::Borrowed(name),
            logger: OnceCell::new(),
            warned: AtomicBool::new(false),
        }
    }

    /// 指定类别下的句柄
    pub const fn with_category(category: &'static str, name: &'static str) -> Self {
        Self {
            category: Some(Cow::Borrowed(category)),
            name: Cow::Borrowed(name),
            logger: OnceCell::new(),
            warned: AtomicBool::new(false),
        }
    }

    /// 运行时确定名称的句柄（默认类别）
    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            category: None,
            name: Cow::Owned(name.into()),
            logger: OnceCell::new(),
            warned: AtomicBool::new(false),
        }
    }

    /// 运行时确定类别和名称的句柄
    pub fn from_parts(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: Some(Cow::Owned(category.into())),
            name: Cow::Owned(name.into()),
            logger: OnceCell::new(),
            warned: AtomicBool::new(false),
        }
    }

    /// 逻辑名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 显式指定的类别，None 表示默认类别
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn is_resolved(&self) -> bool {
        self.logger.get().is_some()
    }

    /// 解析后的对外名称
    pub fn qualified_name(&self) -> Option<&str> {
        self.logger().map(|logger| logger.name())
    }

    /// 向全局注册表解析（只执行一次）
    ///
    /// 日志系统尚未初始化时返回 None 并在标准错误上提示一次，句柄保持未解析，
    /// 初始化之后的调用会再次尝试。
    ///
    /// # Panics
    ///
    /// 类别不存在时 panic，这属于编程错误
    pub fn logger(&self) -> Option<&Arc<Logger>> {
        let resolved = self.logger.get_or_try_init(|| {
            let registry = global::active_registry().ok_or(LogError::NotInitialized)?;
            self.lookup(&registry)
        });
        self.settle(resolved)
    }

    /// 向指定的注册表解析（只执行一次），用于不走全局状态的 `LogManager`
    ///
    /// # Panics
    ///
    /// 类别不存在时 panic
    pub fn bind(&self, registry: &Registry) -> &Arc<Logger> {
        match self.logger.get_or_try_init(|| self.lookup(registry)) {
            Ok(logger) => logger,
            Err(e) => self.unknown_category(e),
        }
    }

    fn lookup(&self, registry: &Registry) -> Result<Arc<Logger>, LogError> {
        let category = self
            .category
            .as_deref()
            .unwrap_or_else(|| registry.default_category());
        registry.get_or_create(category, &self.name)
    }

    fn settle<'a>(&self, resolved: Result<&'a Arc<Logger>, LogError>) -> Option<&'a Arc<Logger>> {
        match resolved {
            Ok(logger) => Some(logger),
            Err(e @ LogError::UnknownCategory(_)) => self.unknown_category(e),
            Err(e) => {
                if !self.warned.swap(true, Ordering::Relaxed) {
                    report(format_args!("logger '{}' dropped a record: {}", self.name, e));
                }
                None
            }
        }
    }

    fn unknown_category(&self, e: LogError) -> ! {
        panic!("logger '{}' cannot be resolved: {}", self.name, e)
    }

    /// 记录日志
    pub fn log(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if let Some(logger) = self.logger() {
            logger.log(level, args);
        }
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        self.logger().is_some_and(|logger| logger.should_log(level))
    }

    /// 修改解析后 logger 的级别，会影响共享同一 logger 的所有句柄
    pub fn set_level(&self, level: LogLevel) {
        if let Some(logger) = self.logger() {
            logger.set_level(level);
        }
    }

    pub fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Trace, args)
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, args)
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, args)
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, args)
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, args)
    }

    pub fn fatal(&self, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Fatal, args)
    }

    pub fn is_trace_enabled(&self) -> bool {
        self.should_log(LogLevel::Trace)
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.should_log(LogLevel::Debug)
    }

    pub fn is_info_enabled(&self) -> bool {
        self.should_log(LogLevel::Info)
    }

    pub fn is_warn_enabled(&self) -> bool {
        self.should_log(LogLevel::Warn)
    }

    pub fn is_error_enabled(&self) -> bool {
        self.should_log(LogLevel::Error)
    }

    pub fn is_fatal_enabled(&self) -> bool {
        self.should_log(LogLevel::Fatal)
    }
}

impl fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("category", &self.category)
            .field("name", &self.name)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
