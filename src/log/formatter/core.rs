use crate::log::log_record::LogRecord;

/// 日志格式化器 trait
///
/// 负责将 LogRecord 渲染为一行文本（不含换行符）
pub trait LogFormatter: Send + Sync {
    /// 将记录追加写入 `out`
    fn format_to(&self, record: &LogRecord<'_>, out: &mut String);

    /// 格式化日志记录
    fn format(&self, record: &LogRecord<'_>) -> String {
        let mut out = String::with_capacity(64 + record.logger_name.len() + record.message.len());
        self.format_to(record, &mut out);
        out
    }
}
