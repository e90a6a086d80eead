use crate::log::error::LogError;
use crate::log::manager::{LogManager, LogManagerConfig};
use crate::log::registry::Registry;
use crate::log::Logger;
use arc_swap::ArcSwapOption;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// 当前生效的注册表，句柄解析时无锁读取
static ACTIVE_REGISTRY: ArcSwapOption<Registry> = ArcSwapOption::const_empty();

/// 进程级 LogManager，初始化和关闭在这把锁内串行执行
static GLOBAL_MANAGER: Mutex<Option<LogManager>> = Mutex::new(None);

/// 使用默认配置初始化进程级日志系统
///
/// 在 `base_path` 下为每个 sink 类别创建 `<category>.log`。失败时把原因
/// 写到标准错误并返回 false，是否退出进程由调用方决定
///
/// # 示例
///
/// ```no_run
/// if !catlog::log::initialize("/var/log/agent") {
///     std::process::exit(1);
/// }
/// catlog::log::shutdown();
/// ```
pub fn initialize(base_path: impl AsRef<Path>) -> bool {
    match initialize_with(LogManagerConfig::with_base_path(base_path)) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Unable to initialize logging: {}", e);
            false
        }
    }
}

/// 使用指定配置初始化进程级日志系统
///
/// 已初始化时返回 `AlreadyInitialized`；任何失败都不会留下全局状态
pub fn initialize_with(config: LogManagerConfig) -> Result<(), LogError> {
    let mut slot = GLOBAL_MANAGER.lock().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Err(LogError::AlreadyInitialized);
    }

    let manager = LogManager::new(config)?;
    ACTIVE_REGISTRY.store(Some(Arc::clone(manager.registry())));
    *slot = Some(manager);
    Ok(())
}

/// 关闭进程级日志系统
///
/// 先撤下注册表，再停止刷新线程并关闭所有 sink。未初始化时为空操作，
/// 可以重复调用。已解析的句柄在关闭之后不保证还能输出
pub fn shutdown() {
    let mut slot = GLOBAL_MANAGER.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(manager) = slot.take() {
        ACTIVE_REGISTRY.store(None);
        manager.shutdown();
    }
}

/// 日志系统是否已初始化
pub fn is_initialized() -> bool {
    ACTIVE_REGISTRY.load().is_some()
}

pub(crate) fn active_registry() -> Option<Arc<Registry>> {
    ACTIVE_REGISTRY.load_full()
}

/// 获取或创建指定类别下的 logger（全局）
pub fn get_or_create_logger(category: &str, name: &str) -> Result<Arc<Logger>, LogError> {
    match &*ACTIVE_REGISTRY.load() {
        Some(registry) => registry.get_or_create(category, name),
        None => Err(LogError::NotInitialized),
    }
}

/// 获取或创建默认类别下的 logger（全局）
pub fn get_logger(name: &str) -> Result<Arc<Logger>, LogError> {
    match &*ACTIVE_REGISTRY.load() {
        Some(registry) => registry.get_or_create_default(name),
        None => Err(LogError::NotInitialized),
    }
}

/// 默认 logger（全局）
pub fn default_logger() -> Result<Arc<Logger>, LogError> {
    get_logger(crate::log::manager::ROOT_LOGGER_NAME)
}

/// 立即刷新所有 sink（全局），未初始化时为空操作
pub fn flush() {
    if let Some(registry) = &*ACTIVE_REGISTRY.load() {
        registry.flush_all();
    }
}
