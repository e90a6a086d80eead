use anyhow::Result;

/// 日志输出器 trait
///
/// 负责将格式化后的日志行输出到目标介质。实现必须自行保证线程安全：
/// 同一个输出器被同一 sink 类别下的所有 logger 共享，写入、切分和刷新
/// 都应由同一把锁串行化
pub trait LogAppender: Send + Sync {
    /// 输出一行日志（不含换行符，由输出器追加）
    fn append(&self, line: &str) -> Result<()>;

    /// 刷新缓冲区（默认实现为空操作）
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// 关闭输出器，之后的写入都会失败（默认只刷新）
    fn close(&self) -> Result<()> {
        self.flush()
    }
}
