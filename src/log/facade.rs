use crate::log::error::LogError;
use crate::log::global;
use ::log::{LevelFilter, Log, Metadata, Record};

/// 把 `log` crate 的记录转发到注册表
///
/// 记录的 target 作为默认类别下的逻辑名称，日志系统未初始化时记录被丢弃
struct FacadeBridge;

impl Log for FacadeBridge {
    /// 只查询，不为 target 创建 logger
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        match global::active_registry() {
            Some(registry) => registry.is_enabled(
                registry.default_category(),
                metadata.target(),
                metadata.level().into(),
            ),
            None => false,
        }
    }

    fn log(&self, record: &Record<'_>) {
        if let Ok(logger) = global::get_logger(record.target()) {
            logger.log(record.level().into(), *record.args());
        }
    }

    fn flush(&self) {
        global::flush();
    }
}

/// 安装 `log` crate 的全局 logger
///
/// 之后 `log::info!` 等宏的输出写入默认类别的 sink。进程内只能安装一次，
/// 已有其他实现时返回 `FacadeAlreadyInstalled`
pub fn install_log_facade() -> Result<(), LogError> {
    ::log::set_boxed_logger(Box::new(FacadeBridge))
        .map_err(|_| LogError::FacadeAlreadyInstalled)?;
    ::log::set_max_level(LevelFilter::Trace);
    Ok(())
}
