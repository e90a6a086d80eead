use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// 日志模块错误类型
#[derive(Error, Debug)]
pub enum LogError {
    #[error("logging is not initialized")]
    NotInitialized,
    #[error("logging is already initialized")]
    AlreadyInitialized,
    #[error("unknown sink category: {0}")]
    UnknownCategory(String),
    #[error("invalid logging configuration: {0}")]
    InvalidConfig(String),
    #[error("cannot open {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start flush thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("a log facade logger is already installed")]
    FacadeAlreadyInstalled,
}

/// 最后的诊断通道
///
/// 稳态日志路径上的失败（写入失败、格式化失败、过早使用等）不会返回给调用方，
/// 只写到进程标准错误
pub(crate) fn report(args: fmt::Arguments<'_>) {
    eprintln!("catlog: {}", args);
}
