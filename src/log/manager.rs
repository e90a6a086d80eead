use crate::cfg::serde_duration::{serde_as, HumanDur};
use crate::log::appender::{LogAppender, RollingFileAppender, RollingFileAppenderConfig};
use crate::log::error::LogError;
use crate::log::flusher::PeriodicFlusher;
use crate::log::formatter::{PatternFormatter, DEFAULT_PATTERN};
use crate::log::level::LogLevel;
use crate::log::registry::Registry;
use crate::log::Logger;
use garde::Validate;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// 每个 sink 类别在初始化时预先创建的 logger 名称
pub const ROOT_LOGGER_NAME: &str = "root";

/// 默认横幅
pub fn default_banner() -> String {
    format!("catlog v{}", env!("CARGO_PKG_VERSION"))
}

/// LogManager 配置
///
/// 所有字段都有默认值，代码里通常只需要指定 `base_path`
#[serde_as]
#[derive(Debug, Clone, Deserialize, SmartDefault, Validate)]
#[serde(default)]
pub struct LogManagerConfig {
    /// 日志目录，每个类别写入 `<base_path>/<category>.log`
    #[default("logs".to_string())]
    #[garde(length(min = 1))]
    pub base_path: String,

    /// sink 类别，初始化之后不再变化
    #[default(vec!["default".to_string(), "messaging".to_string()])]
    #[garde(length(min = 1, max = 16), inner(pattern(r"^[A-Za-z0-9_-]+$")))]
    pub categories: Vec<String>,

    /// 未指定类别的句柄使用的类别
    #[default("default".to_string())]
    #[garde(length(min = 1))]
    pub default_category: String,

    /// 单个文件最大字节数
    #[default(1024)]
    #[garde(range(min = 64))]
    pub max_size: usize,

    /// 保留的历史文件数量
    #[default(3)]
    #[garde(range(max = 100))]
    pub max_files: usize,

    /// 周期刷新间隔
    #[serde_as(as = "HumanDur")]
    #[default(Duration::from_secs(5))]
    #[garde(custom(check_flush_interval))]
    pub flush_interval: Duration,

    /// 全局日志级别
    #[default(LogLevel::Trace)]
    #[garde(skip)]
    pub level: LogLevel,

    /// 达到该级别的记录写入后立即刷新
    #[default(LogLevel::Off)]
    #[garde(skip)]
    pub flush_on: LogLevel,

    /// 行格式
    #[default(DEFAULT_PATTERN.to_string())]
    #[garde(length(min = 1))]
    pub pattern: String,

    /// 每次打开文件时写入的横幅，None 表示不写
    #[default(Some(default_banner()))]
    #[garde(skip)]
    pub banner: Option<String>,

    /// 初始化时先把已有的非空日志文件切分到历史中
    #[default(false)]
    #[garde(skip)]
    pub rotate_on_open: bool,
}

fn check_flush_interval(value: &Duration, _ctx: &()) -> garde::Result {
    if *value < Duration::from_secs(1) || *value > Duration::from_secs(5) {
        return Err(garde::Error::new("flush interval must be between 1s and 5s"));
    }
    Ok(())
}

impl LogManagerConfig {
    /// 默认配置，只替换日志目录
    pub fn with_base_path(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    /// 从 JSON/JSON5/YAML/TOML 文件加载
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        crate::cfg::load_file(path)
    }

    /// 类别对应的日志文件路径
    pub fn log_path(&self, category: &str) -> PathBuf {
        Path::new(&self.base_path).join(format!("{}.log", category))
    }

    /// 校验字段范围以及类别之间的关系
    pub fn check(&self) -> Result<(), LogError> {
        self.validate()
            .map_err(|report| LogError::InvalidConfig(report.to_string()))?;

        let mut seen = HashSet::new();
        for category in &self.categories {
            if !seen.insert(category.as_str()) {
                return Err(LogError::InvalidConfig(format!(
                    "duplicate sink category: {}",
                    category
                )));
            }
        }
        if !seen.contains(self.default_category.as_str()) {
            return Err(LogError::InvalidConfig(format!(
                "default category '{}' is not one of the sink categories",
                self.default_category
            )));
        }
        Ok(())
    }
}

/// 日志管理器
///
/// 拥有一组 sink、对应的注册表和周期刷新线程。进程级的 `initialize` /
/// `shutdown` 在全局槽位里持有一个实例；嵌入或测试时也可以直接创建。
/// 实例被丢弃时自动关闭。
pub struct LogManager {
    config: LogManagerConfig,
    registry: Arc<Registry>,
    flusher: Mutex<Option<PeriodicFlusher>>,
}

impl LogManager {
    /// 打开所有 sink 并启动刷新线程
    ///
    /// 任何一个 sink 打不开都返回错误，已经打开的 sink 随之关闭
    pub fn new(config: LogManagerConfig) -> Result<Self, LogError> {
        config.check()?;

        let base = PathBuf::from(&config.base_path);
        fs::create_dir_all(&base).map_err(|source| LogError::Io {
            path: base.clone(),
            source,
        })?;

        let mut sinks: HashMap<String, Arc<dyn LogAppender>> = HashMap::new();
        for category in &config.categories {
            let appender = RollingFileAppender::new(RollingFileAppenderConfig {
                file_path: config.log_path(category).to_string_lossy().into_owned(),
                max_size: config.max_size,
                max_files: config.max_files,
                banner: config.banner.clone(),
                rotate_on_open: config.rotate_on_open,
            })?;
            sinks.insert(category.clone(), Arc::new(appender));
        }

        let formatter = Arc::new(PatternFormatter::new(config.pattern.clone()));
        let registry = Registry::new(sinks, config.default_category.clone(), formatter, config.level)?
            .with_flush_level(config.flush_on);
        let registry = Arc::new(registry);

        for category in &config.categories {
            registry.get_or_create(category, ROOT_LOGGER_NAME)?;
        }

        let target = Arc::clone(&registry);
        let flusher = PeriodicFlusher::start(config.flush_interval, move || target.flush_all())?;

        Ok(Self {
            config,
            registry,
            flusher: Mutex::new(Some(flusher)),
        })
    }

    pub fn config(&self) -> &LogManagerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// 获取或创建 logger
    pub fn get_or_create_logger(&self, category: &str, name: &str) -> Result<Arc<Logger>, LogError> {
        self.registry.get_or_create(category, name)
    }

    /// 默认类别下的根 logger
    pub fn default_logger(&self) -> Result<Arc<Logger>, LogError> {
        self.registry.get_or_create_default(ROOT_LOGGER_NAME)
    }

    /// 立即刷新所有 sink
    pub fn flush(&self) {
        self.registry.flush_all();
    }

    /// 刷新线程是否在运行
    pub fn is_running(&self) -> bool {
        self.flusher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// 停止刷新线程，关闭所有 sink，丢弃缓存的 logger
    ///
    /// 返回之后不会再有刷新发生。可以重复调用，并发调用时后来者等待
    /// 先到者完成关闭才返回
    pub fn shutdown(&self) {
        let mut slot = self.flusher.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(mut flusher) = slot.take() else {
            return;
        };

        flusher.stop();
        self.registry.close_all();
        self.registry.clear();
        drop(slot);
    }
}

impl Drop for LogManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
