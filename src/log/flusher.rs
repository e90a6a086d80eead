use crate::log::error::{report, LogError};
use crossbeam::channel::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// 周期性刷新器
///
/// 后台线程每隔 `interval` 执行一次任务。`stop` 关闭停止通道并等待线程
/// 退出，返回后不会再有任务执行
pub struct PeriodicFlusher {
    interval: Duration,
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl PeriodicFlusher {
    /// 启动后台线程
    pub fn start<F>(interval: Duration, task: F) -> Result<Self, LogError>
    where
        F: Fn() + Send + 'static,
    {
        let (stop_tx, stop_rx) = channel::bounded::<()>(1);

        let worker = thread::Builder::new()
            .name("catlog-flusher".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => task(),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(LogError::Spawn)?;

        Ok(Self {
            interval,
            stop_tx: Some(stop_tx),
            worker: Some(worker),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// 停止并等待后台线程退出，可重复调用
    pub fn stop(&mut self) {
        // 关闭发送端即唤醒等待中的线程
        drop(self.stop_tx.take());

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                report(format_args!("flush thread panicked"));
            }
        }
    }
}

impl Drop for PeriodicFlusher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_flusher_runs_periodically() -> anyhow::Result<()> {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);

        let mut flusher = PeriodicFlusher::start(Duration::from_millis(10), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })?;
        assert!(flusher.is_running());
        assert_eq!(flusher.interval(), Duration::from_millis(10));

        thread::sleep(Duration::from_millis(200));
        flusher.stop();

        assert!(ticks.load(Ordering::SeqCst) >= 2);
        assert!(!flusher.is_running());
        Ok(())
    }

    #[test]
    fn test_flusher_never_runs_after_stop() -> anyhow::Result<()> {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);

        let mut flusher = PeriodicFlusher::start(Duration::from_millis(5), move || {
            // 模拟较慢的刷新，stop 时很可能正在执行
            thread::sleep(Duration::from_millis(20));
            counter.fetch_add(1, Ordering::SeqCst);
        })?;

        thread::sleep(Duration::from_millis(50));
        flusher.stop();
        let after_stop = ticks.load(Ordering::SeqCst);

        thread::sleep(Duration::from_millis(100));
        assert_eq!(ticks.load(Ordering::SeqCst), after_stop);

        // 重复 stop 是安全的
        flusher.stop();
        Ok(())
    }

    #[test]
    fn test_flusher_stops_promptly_with_long_interval() -> anyhow::Result<()> {
        let mut flusher = PeriodicFlusher::start(Duration::from_secs(3600), || {})?;
        let started = std::time::Instant::now();
        flusher.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
        Ok(())
    }
}
