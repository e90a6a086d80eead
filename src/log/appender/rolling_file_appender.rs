use crate::log::appender::LogAppender;
use crate::log::error::{report, LogError};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use smart_default::SmartDefault;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// RollingFileAppender 配置
#[derive(Debug, Clone, Deserialize, SmartDefault, PartialEq)]
#[serde(default)]
pub struct RollingFileAppenderConfig {
    /// 日志文件路径
    #[default("app.log".to_string())]
    pub file_path: String,

    /// 单个文件最大大小（字节），超过后切分
    #[default(1024)]
    pub max_size: usize,

    /// 保留的历史文件数量，0 表示切分时直接丢弃旧内容
    #[default(3)]
    pub max_files: usize,

    /// 每次打开文件时写入的横幅，输出为 `*** <banner> ***`
    #[default(None)]
    pub banner: Option<String>,

    /// 打开时如果文件非空，先切分一次
    #[default(false)]
    pub rotate_on_open: bool,
}

/// 当前文件信息
struct CurrentFile {
    /// 重新打开失败后为 None，下一次写入时再打开
    writer: Option<BufWriter<File>>,
    size: usize,
    banner_len: usize,
    closed: bool,
}

/// 按大小滚动的文件输出器
///
/// 当前文件为 `app.log`，历史文件依次为 `app.log.1`（最新）到
/// `app.log.<max_files>`（最旧）。写入、切分和刷新共用同一把锁，
/// 每条记录在锁内以完整一行写入。
pub struct RollingFileAppender {
    config: RollingFileAppenderConfig,
    path: PathBuf,
    current: Mutex<CurrentFile>,
}

impl RollingFileAppender {
    /// 打开（必要时创建）日志文件，文件或目录不可写时返回错误
    pub fn new(config: RollingFileAppenderConfig) -> Result<Self, LogError> {
        let path = PathBuf::from(&config.file_path);

        // 确保父目录存在
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LogError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let io_error = |source: io::Error| LogError::Io {
            path: path.clone(),
            source,
        };

        let non_empty = fs::metadata(&path).map(|m| m.len() > 0).unwrap_or(false);
        if config.rotate_on_open && non_empty {
            shift_history(&path, config.max_files).map_err(io_error)?;
        }

        let current = open_file(&path, config.banner.as_deref(), false).map_err(io_error)?;

        Ok(Self {
            config,
            path,
            current: Mutex::new(current),
        })
    }

    /// 当前日志文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &RollingFileAppenderConfig {
        &self.config
    }

    /// 当前文件已写入的字节数（含横幅和缓冲区中的内容）
    pub fn current_size(&self) -> usize {
        self.lock().size
    }

    fn lock(&self) -> MutexGuard<'_, CurrentFile> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 执行切分
    ///
    /// 历史文件移动失败时截断当前文件重新开始，保证文件大小仍受 `max_size` 限制
    fn rotate(&self, current: &mut CurrentFile) -> io::Result<()> {
        if let Some(writer) = current.writer.as_mut() {
            writer.flush()?;
        }
        // 先关闭当前文件再移动
        current.writer = None;

        let banner = self.config.banner.as_deref();
        match shift_history(&self.path, self.config.max_files) {
            Ok(()) => *current = open_file(&self.path, banner, false)?,
            Err(e) => {
                report(format_args!(
                    "failed to rotate {}, truncating: {}",
                    self.path.display(),
                    e
                ));
                *current = open_file(&self.path, banner, true)?;
            }
        }
        Ok(())
    }
}

/// 第 `index` 个历史文件的路径：`app.log` -> `app.log.<index>`
pub fn history_path(base: &Path, index: usize) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(format!(".{}", index));
    PathBuf::from(name)
}

/// 历史文件整体后移一位，最旧的一个被删除，当前文件变为 `.1`
fn shift_history(path: &Path, max_files: usize) -> io::Result<()> {
    if max_files == 0 {
        return remove_if_exists(path);
    }

    remove_if_exists(&history_path(path, max_files))?;
    for index in (1..max_files).rev() {
        let src = history_path(path, index);
        if src.exists() {
            fs::rename(&src, history_path(path, index + 1))?;
        }
    }
    if path.exists() {
        fs::rename(path, history_path(path, 1))?;
    }
    Ok(())
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// 打开文件并写入横幅，`truncate` 为 false 时追加到已有内容之后
fn open_file(path: &Path, banner: Option<&str>, truncate: bool) -> io::Result<CurrentFile> {
    let file = if truncate {
        OpenOptions::new().create(true).write(true).truncate(true).open(path)?
    } else {
        OpenOptions::new().create(true).append(true).open(path)?
    };
    let existing = file.metadata()?.len() as usize;

    let mut writer = BufWriter::new(file);
    let mut banner_len = 0;
    if let Some(banner) = banner {
        let line = format!("*** {} ***\n", banner);
        writer.write_all(line.as_bytes())?;
        banner_len = line.len();
    }

    Ok(CurrentFile {
        writer: Some(writer),
        size: existing + banner_len,
        banner_len,
        closed: false,
    })
}

impl LogAppender for RollingFileAppender {
    fn append(&self, line: &str) -> Result<()> {
        let message_size = line.len() + 1; // +1 for newline

        let mut current = self.lock();
        if current.closed {
            return Err(anyhow!("{} is closed", self.path.display()));
        }

        // 只有文件中已有记录时才切分，单条超长记录直接写入
        let exceeded = current.size + message_size > self.config.max_size;
        if current.writer.is_some() && exceeded && current.size > current.banner_len {
            self.rotate(&mut current)
                .with_context(|| format!("failed to rotate {}", self.path.display()))?;
        }

        if current.writer.is_none() {
            *current = open_file(&self.path, self.config.banner.as_deref(), false)
                .with_context(|| format!("failed to reopen {}", self.path.display()))?;
        }

        let writer = match current.writer.as_mut() {
            Some(writer) => writer,
            None => return Err(anyhow!("{} is not open", self.path.display())),
        };
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        current.size += message_size;

        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let mut current = self.lock();
        if let Some(writer) = current.writer.as_mut() {
            writer.flush()?;
            writer.get_ref().sync_data()?;
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        let mut current = self.lock();
        current.closed = true;
        if let Some(mut writer) = current.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}
