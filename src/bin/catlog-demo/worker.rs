use catlog::log::LoggerHandle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

static LOG: LoggerHandle = LoggerHandle::new("agent_messaging");
static LOG_MSG: LoggerHandle = LoggerHandle::with_category("messaging", "agent_messaging");

/// 后台工作线程，循环写日志直到被停止
pub struct ServiceWorker {
    name: String,
    done: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl ServiceWorker {
    pub fn start(name: impl Into<String>) -> anyhow::Result<Self> {
        let name = name.into();
        let done = Arc::new(AtomicBool::new(false));

        // 句柄随线程移动，首次记录时才解析
        let member_log = LoggerHandle::from_name(name.clone());
        let worker = {
            let name = name.clone();
            let done = Arc::clone(&done);
            thread::Builder::new()
                .name(format!("worker-{}", name))
                .spawn(move || run(&name, &member_log, &done))?
        };

        Ok(Self {
            name,
            done,
            worker: Some(worker),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stop(&self) {
        self.done.store(true, Ordering::SeqCst);
    }

    pub fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                eprintln!("worker {} panicked", self.name);
            }
        }
    }
}

impl Drop for ServiceWorker {
    fn drop(&mut self) {
        self.stop();
        self.join();
    }
}

fn run(name: &str, member_log: &LoggerHandle, done: &AtomicBool) {
    catlog::info!(member_log, "instance logger");
    catlog::info!(LOG, "Static logger");

    while !done.load(Ordering::SeqCst) {
        catlog::debug!(LOG_MSG, "{} is logging...", name);
        thread::sleep(Duration::from_millis(1));
    }

    catlog::info!(member_log, "{} stopped", name);
}
