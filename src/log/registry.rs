use crate::log::appender::LogAppender;
use crate::log::error::{report, LogError};
use crate::log::formatter::LogFormatter;
use crate::log::level::LogLevel;
use crate::log::Logger;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 限定键：(sink 类别, 逻辑名称)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoggerKey {
    pub category: String,
    pub name: String,
}

impl LoggerKey {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
        }
    }
}

/// Logger 注册表
///
/// 限定键到 logger 的唯一映射。sink 集合在构造时确定，之后不再变化；
/// 同一个限定键在注册表生命周期内只会创建一个 logger，即使多个线程同时
/// 首次请求。
pub struct Registry {
    default_category: String,
    sinks: HashMap<String, Arc<dyn LogAppender>>,
    formatter: Arc<dyn LogFormatter>,
    level: LogLevel,
    flush_level: LogLevel,
    loggers: DashMap<LoggerKey, Arc<Logger>>,
    created: AtomicUsize,
}

impl Registry {
    /// 从 sink 集合创建注册表，默认类别必须在集合中
    pub fn new(
        sinks: HashMap<String, Arc<dyn LogAppender>>,
        default_category: impl Into<String>,
        formatter: Arc<dyn LogFormatter>,
        level: LogLevel,
    ) -> Result<Self, LogError> {
        let default_category = default_category.into();
        if !sinks.contains_key(&default_category) {
            return Err(LogError::UnknownCategory(default_category));
        }

        Ok(Self {
            default_category,
            sinks,
            formatter,
            level,
            flush_level: LogLevel::Off,
            loggers: DashMap::new(),
            created: AtomicUsize::new(0),
        })
    }

    /// 新建 logger 的立即刷新级别
    pub fn with_flush_level(mut self, level: LogLevel) -> Self {
        self.flush_level = level;
        self
    }

    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    /// 全局日志级别，新建 logger 的初始级别
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// 所有 sink 类别（排序后）
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self.sinks.keys().cloned().collect();
        categories.sort();
        categories
    }

    /// logger 对外名称
    ///
    /// 默认类别直接使用逻辑名称，其他类别加上 `<category>.` 前缀
    pub fn qualified_name(&self, category: &str, name: &str) -> String {
        if category == self.default_category {
            name.to_string()
        } else {
            format!("{}.{}", category, name)
        }
    }

    /// 获取或创建 logger
    ///
    /// 已存在时直接返回缓存的实例；否则在分片写锁内构造并插入，
    /// 竞争的调用方都拿到同一个实例
    pub fn get_or_create(&self, category: &str, name: &str) -> Result<Arc<Logger>, LogError> {
        let sink = self
            .sinks
            .get(category)
            .ok_or_else(|| LogError::UnknownCategory(category.to_string()))?;

        let key = LoggerKey::new(category, name);
        if let Some(logger) = self.loggers.get(&key) {
            return Ok(Arc::clone(logger.value()));
        }

        let entry = self.loggers.entry(key).or_insert_with(|| {
            self.created.fetch_add(1, Ordering::SeqCst);
            let logger = Logger::new(
                self.qualified_name(category, name),
                self.level,
                Arc::clone(&self.formatter),
                Arc::clone(sink),
            )
            .with_flush_level(self.flush_level);
            Arc::new(logger)
        });
        Ok(Arc::clone(entry.value()))
    }

    /// 默认类别下的 logger
    pub fn get_or_create_default(&self, name: &str) -> Result<Arc<Logger>, LogError> {
        self.get_or_create(&self.default_category, name)
    }

    /// 判断该级别的记录是否会被输出，不创建 logger
    ///
    /// 已创建的 logger 按它自己的级别判断，否则按全局级别
    pub fn is_enabled(&self, category: &str, name: &str, level: LogLevel) -> bool {
        match self.loggers.get(&LoggerKey::new(category, name)) {
            Some(logger) => logger.should_log(level),
            None => level != LogLevel::Off && level >= self.level,
        }
    }

    /// 检查 logger 是否已创建
    pub fn contains(&self, category: &str, name: &str) -> bool {
        self.loggers.contains_key(&LoggerKey::new(category, name))
    }

    /// 已创建 logger 的对外名称列表（排序后）
    pub fn logger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .loggers
            .iter()
            .map(|entry| entry.value().name().to_string())
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.loggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.is_empty()
    }

    /// 累计构造过的 logger 数量
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// 刷新所有 sink
    pub fn flush_all(&self) {
        for (category, sink) in &self.sinks {
            if let Err(e) = sink.flush() {
                report(format_args!("failed to flush sink '{}': {:#}", category, e));
            }
        }
    }

    /// 关闭所有 sink
    pub fn close_all(&self) {
        for (category, sink) in &self.sinks {
            if let Err(e) = sink.close() {
                report(format_args!("failed to close sink '{}': {:#}", category, e));
            }
        }
    }

    /// 丢弃所有缓存的 logger
    pub fn clear(&self) {
        self.loggers.clear();
    }
}
