#[cfg(test)]
mod memory_appender;
mod rolling_file_appender;
mod trait_;

#[cfg(test)]
pub use memory_appender::MemoryAppender;
pub use rolling_file_appender::{history_path, RollingFileAppender, RollingFileAppenderConfig};
pub use trait_::LogAppender;
