use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

// 重新导出serde_with
pub use serde_with::{serde_as, DeserializeAs, SerializeAs};

/// Duration的人性化格式化器
///
/// 支持格式: "5s", "1500ms", "2m", "1h30m"
pub struct HumanDur;

impl SerializeAs<Duration> for HumanDur {
    fn serialize_as<S>(source: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_duration(*source))
    }
}

impl<'de> DeserializeAs<'de, Duration> for HumanDur {
    fn deserialize_as<D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }
}

/// 单位换算成纳秒
fn unit_nanos(unit: &str) -> Option<f64> {
    let nanos = match unit {
        "ns" => 1.0,
        "us" | "μs" => 1e3,
        "ms" => 1e6,
        "s" => 1e9,
        "m" => 60.0 * 1e9,
        "h" => 3600.0 * 1e9,
        "d" => 86400.0 * 1e9,
        _ => return None,
    };
    Some(nanos)
}

/// 解析时间字符串: "1m30s" -> Duration
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return Err(anyhow!("空字符串"));
    }

    let mut total = Duration::ZERO;
    let mut rest = s.as_str();
    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (num_str, tail) = rest.split_at(num_end);
        if num_str.is_empty() {
            return Err(anyhow!("期望数字: {}", rest));
        }
        let value: f64 = num_str
            .parse()
            .map_err(|_| anyhow!("无效数字: {}", num_str))?;

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        if unit.is_empty() {
            return Err(anyhow!("缺少时间单位: {}", num_str));
        }
        let scale = unit_nanos(unit).ok_or_else(|| anyhow!("不支持的时间单位: {}", unit))?;

        total += Duration::from_nanos((value * scale).round() as u64);
        rest = tail;
    }

    Ok(total)
}

/// Duration格式化为字符串: Duration -> "1m30s"
///
/// 不足一秒的部分以毫秒（或更小单位）输出，保证能被 `parse_duration` 读回
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let nanos = duration.subsec_nanos();

    if secs == 0 {
        return match nanos {
            0 => "0s".to_string(),
            n if n % 1_000_000 == 0 => format!("{}ms", n / 1_000_000),
            n if n % 1_000 == 0 => format!("{}us", n / 1_000),
            n => format!("{}ns", n),
        };
    }

    let mut out = String::new();
    let mut remaining = secs;
    for (unit, size) in [("d", 86400), ("h", 3600), ("m", 60)] {
        if remaining >= size {
            out.push_str(&format!("{}{}", remaining / size, unit));
            remaining %= size;
        }
    }

    if nanos == 0 {
        if remaining > 0 {
            out.push_str(&format!("{}s", remaining));
        }
    } else {
        out.push_str(&format!("{}ms", remaining * 1000 + u64::from(nanos / 1_000_000)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("1500ms").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_duration("250us").unwrap(), Duration::from_micros(250));
        assert_eq!(parse_duration("10ns").unwrap(), Duration::from_nanos(10));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("1d").unwrap(), Duration::from_secs(86400));
    }

    #[test]
    fn test_parse_duration_decimal_and_compound() {
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_duration("0.5m").unwrap(), Duration::from_secs(30));
        assert_eq!(
            parse_duration("1m500ms").unwrap(),
            Duration::from_secs(60) + Duration::from_millis(500)
        );
        assert_eq!(
            parse_duration("1h30m45s").unwrap(),
            Duration::from_secs(3600 + 1800 + 45)
        );
        // 空白字符和大小写
        assert_eq!(parse_duration("  3S ").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn test_parse_duration_errors() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("s").is_err()); // 缺少数字
        assert!(parse_duration("5").is_err()); // 缺少单位
        assert!(parse_duration("5x").is_err()); // 无效单位
        assert!(parse_duration("1.2.3s").is_err()); // 无效数字
        assert!(parse_duration("-1s").is_err()); // 负数
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_secs(5)), "5s");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_micros(3)), "3us");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1500ms");
        assert_eq!(format_duration(Duration::from_millis(61_500)), "1m1500ms");
    }

    #[test]
    fn test_human_dur_serde() {
        #[serde_as]
        #[derive(Debug, Serialize, Deserialize, PartialEq)]
        struct Config {
            #[serde_as(as = "HumanDur")]
            flush_interval: Duration,
        }

        let config: Config = json5::from_str(r#"{ flush_interval: "2s" }"#).unwrap();
        assert_eq!(config.flush_interval, Duration::from_secs(2));

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"flush_interval":"2s"}"#);

        let yaml: Config = serde_yaml::from_str("flush_interval: 1500ms").unwrap();
        assert_eq!(yaml.flush_interval, Duration::from_millis(1500));

        assert!(serde_json::from_str::<Config>(r#"{"flush_interval":"soon"}"#).is_err());
    }
}
