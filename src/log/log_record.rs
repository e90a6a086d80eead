use crate::log::level::LogLevel;
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    // 每个线程首次记录日志时分配一个进程内唯一的数字 ID
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// 当前线程的编号，用于日志行中的 `%t` 字段
///
/// 编号由本库分配：进程内第一个记录日志的线程是 1，之后依次递增，
/// 同一线程始终不变、不会复用。它不是操作系统的线程 ID（`gettid`），
/// 也和 [`std::thread::ThreadId`] 无关。
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| *id)
}

/// 日志记录
///
/// 只借用 logger 名称和已渲染的消息，格式化完成后即丢弃
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    /// 日志级别
    pub level: LogLevel,
    /// logger 对外名称（已按 sink 类别限定）
    pub logger_name: &'a str,
    /// 已渲染的消息
    pub message: &'a str,
    /// 时间戳
    pub timestamp: DateTime<Local>,
    /// 线程 ID
    pub thread_id: u64,
}

impl<'a> LogRecord<'a> {
    /// 创建新的日志记录，时间戳和线程 ID 取自当前调用点
    pub fn new(level: LogLevel, logger_name: &'a str, message: &'a str) -> Self {
        Self {
            level,
            logger_name,
            message,
            timestamp: Local::now(),
            thread_id: current_thread_id(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_thread_id(mut self, thread_id: u64) -> Self {
        self.thread_id = thread_id;
        self
    }
}
