use crate::log::appender::LogAppender;
use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// 内存输出器
///
/// 把日志行保存在内存中，并统计刷新次数，只在单元测试中使用
#[derive(Debug, Default)]
pub struct MemoryAppender {
    lines: Mutex<Vec<String>>,
    flushes: AtomicUsize,
    closed: AtomicBool,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已输出的全部行
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// flush 被调用的次数
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl LogAppender for MemoryAppender {
    fn append(&self, line: &str) -> Result<()> {
        if self.is_closed() {
            return Err(anyhow!("memory appender is closed"));
        }
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.flush()?;
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_appender_records_lines() -> Result<()> {
        let appender = MemoryAppender::new();
        assert!(appender.is_empty());

        appender.append("one")?;
        appender.append("two")?;
        appender.flush()?;

        assert_eq!(appender.lines(), vec!["one", "two"]);
        assert_eq!(appender.flush_count(), 1);
        Ok(())
    }

    #[test]
    fn test_memory_appender_close() -> Result<()> {
        let appender = MemoryAppender::new();
        appender.close()?;
        assert!(appender.is_closed());
        assert!(appender.append("late").is_err());
        Ok(())
    }
}
