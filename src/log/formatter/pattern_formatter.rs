use crate::log::formatter::LogFormatter;
use crate::log::log_record::LogRecord;
use chrono::{Datelike, Timelike};
use std::fmt::Write;

/// 默认输出格式
///
/// 示例: `2023-09-05 13:19:08,221 [732] DEBUG messaging.agent_messaging - Foo is logging...`
pub const DEFAULT_PATTERN: &str = "%Y-%m-%d %H:%M:%S,%e [%t] %l %n - %v";

/// 编译后的格式片段
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millis,
    ThreadId,
    Level,
    Name,
    Message,
}

/// 模式格式化器
///
/// 模式在构造时编译一次，格式化时只做顺序写入。支持的占位符：
///
/// | 占位符 | 含义 |
/// |--------|------|
/// | `%Y` `%m` `%d` | 年（4 位）月 日 |
/// | `%H` `%M` `%S` | 时 分 秒 |
/// | `%e` | 毫秒（3 位） |
/// | `%t` | 线程编号，见 [`current_thread_id`] |
/// | `%l` | 级别名称 |
/// | `%n` `%!` | logger 名称 |
/// | `%v` | 消息 |
/// | `%%` | 字面量 `%` |
///
/// 无法识别的占位符原样输出。
///
/// `%t` 输出的是本库按线程首次记录日志的顺序分配的编号（从 1 开始），
/// 不是操作系统的线程 ID，不能和 `gettid` 或 `ps -L` 的输出对照。
///
/// [`current_thread_id`]: crate::log::current_thread_id
#[derive(Debug, Clone)]
pub struct PatternFormatter {
    pattern: String,
    tokens: Vec<Token>,
}

impl PatternFormatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let tokens = compile(&pattern);
        Self { pattern, tokens }
    }

    /// 原始模式字符串
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Default for PatternFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN)
    }
}

fn compile(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        let token = match chars.next() {
            Some('Y') => Token::Year,
            Some('m') => Token::Month,
            Some('d') => Token::Day,
            Some('H') => Token::Hour,
            Some('M') => Token::Minute,
            Some('S') => Token::Second,
            Some('e') => Token::Millis,
            Some('t') => Token::ThreadId,
            Some('l') => Token::Level,
            Some('n') | Some('!') => Token::Name,
            Some('v') => Token::Message,
            Some('%') => {
                literal.push('%');
                continue;
            }
            Some(other) => {
                literal.push('%');
                literal.push(other);
                continue;
            }
            None => {
                literal.push('%');
                break;
            }
        };

        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(token);
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

impl LogFormatter for PatternFormatter {
    fn format_to(&self, record: &LogRecord<'_>, out: &mut String) {
        let ts = &record.timestamp;
        // 写入 String 不会失败
        for token in &self.tokens {
            let _ = match token {
                Token::Literal(text) => {
                    out.push_str(text);
                    Ok(())
                }
                Token::Year => write!(out, "{:04}", ts.year()),
                Token::Month => write!(out, "{:02}", ts.month()),
                Token::Day => write!(out, "{:02}", ts.day()),
                Token::Hour => write!(out, "{:02}", ts.hour()),
                Token::Minute => write!(out, "{:02}", ts.minute()),
                Token::Second => write!(out, "{:02}", ts.second()),
                // 闰秒时 chrono 返回 >= 1000 的毫秒值
                Token::Millis => write!(out, "{:03}", ts.timestamp_subsec_millis().min(999)),
                Token::ThreadId => write!(out, "{}", record.thread_id),
                Token::Level => {
                    out.push_str(record.level.as_str());
                    Ok(())
                }
                Token::Name => {
                    out.push_str(record.logger_name);
                    Ok(())
                }
                Token::Message => {
                    out.push_str(record.message);
                    Ok(())
                }
            };
        }
    }
}
