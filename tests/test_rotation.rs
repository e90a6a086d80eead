//! 文件输出的集成测试：切分、保留数量、顺序、并发写入

use anyhow::Result;
use catlog::log::appender::history_path;
use catlog::log::{default_banner, LogManager, LogManagerConfig};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn messages(content: &str) -> Vec<&str> {
    content
        .lines()
        .filter(|line| !line.starts_with("*** "))
        .collect()
}

// ============================================================================
// 切分
// ============================================================================

#[test]
fn test_rotation_with_default_limits() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let manager = LogManager::new(LogManagerConfig::with_base_path(temp_dir.path()))?;
    let logger = manager.get_or_create_logger("messaging", "agent_messaging")?;

    for i in 0..200 {
        logger.debug(format_args!("Foo is logging... {:04}", i));
    }
    manager.shutdown();

    let current = temp_dir.path().join("messaging.log");
    let banner = format!("*** {} ***", default_banner());
    for path in [
        current.clone(),
        history_path(&current, 1),
        history_path(&current, 2),
        history_path(&current, 3),
    ] {
        let content = fs::read_to_string(&path)?;
        assert!(content.len() <= 1024, "{} is {} bytes", path.display(), content.len());
        assert_eq!(content.lines().next(), Some(banner.as_str()));
        assert!(!messages(&content).is_empty());
    }
    assert!(!history_path(&current, 4).exists());

    // 最新的记录在当前文件末尾，`.1` 紧接在它之前
    let newest = fs::read_to_string(&current)?;
    assert!(newest.trim_end().ends_with("Foo is logging... 0199"));

    let previous = fs::read_to_string(history_path(&current, 1))?;
    let last_of_previous = messages(&previous).last().copied().unwrap_or_default();
    let first_of_current = messages(&newest)[0];
    let seq = |line: &str| -> u32 { line.rsplit(' ').next().unwrap().parse().unwrap() };
    assert_eq!(seq(last_of_previous) + 1, seq(first_of_current));

    // default 类别没有写入，不会切分
    assert!(!history_path(&temp_dir.path().join("default.log"), 1).exists());
    Ok(())
}

#[test]
fn test_rotate_on_open_keeps_previous_run() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = LogManagerConfig {
        rotate_on_open: true,
        banner: None,
        pattern: "%v".to_string(),
        ..LogManagerConfig::with_base_path(temp_dir.path())
    };

    let first = LogManager::new(config.clone())?;
    first.default_logger()?.info(format_args!("first run"));
    drop(first);

    let second = LogManager::new(config)?;
    second.default_logger()?.info(format_args!("second run"));
    second.shutdown();

    let current = temp_dir.path().join("default.log");
    assert_eq!(fs::read_to_string(&current)?, "second run\n");
    assert_eq!(fs::read_to_string(history_path(&current, 1))?, "first run\n");
    Ok(())
}

// ============================================================================
// 顺序
// ============================================================================

fn large_file_config(dir: &Path) -> LogManagerConfig {
    LogManagerConfig {
        max_size: 1 << 20,
        banner: None,
        pattern: "%v".to_string(),
        ..LogManagerConfig::with_base_path(dir)
    }
}

#[test]
fn test_sequential_records_keep_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let manager = LogManager::new(large_file_config(temp_dir.path()))?;
    let logger = manager.get_or_create_logger("default", "seq")?;

    for i in 0..1000 {
        logger.info(format_args!("{}", i));
    }
    manager.shutdown();

    let content = fs::read_to_string(temp_dir.path().join("default.log"))?;
    let numbers: Vec<u32> = content.lines().map(|l| l.parse().unwrap()).collect();
    assert_eq!(numbers, (0..1000).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn test_concurrent_records_are_not_torn() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let manager = Arc::new(LogManager::new(large_file_config(temp_dir.path()))?);
    let threads = 8;
    let per_thread = 250;

    let joins: Vec<_> = (0..threads)
        .map(|t| {
            let manager = Arc::clone(&manager);
            std::thread::spawn(move || {
                let logger = manager
                    .get_or_create_logger("messaging", &format!("worker{}", t))
                    .unwrap();
                for i in 0..per_thread {
                    logger.info(format_args!("T{} N{} {}", t, i, "x".repeat(40)));
                }
            })
        })
        .collect();
    for join in joins {
        join.join().unwrap();
    }
    manager.shutdown();

    let content = fs::read_to_string(temp_dir.path().join("messaging.log"))?;
    let mut next: HashMap<u32, u32> = HashMap::new();
    let mut total = 0;
    for line in content.lines() {
        let mut parts = line.split(' ');
        let t: u32 = parts.next().unwrap()[1..].parse()?;
        let n: u32 = parts.next().unwrap()[1..].parse()?;
        assert_eq!(parts.next(), Some("x".repeat(40).as_str()), "torn line: {}", line);
        assert!(parts.next().is_none());

        // 同一个线程的记录保持发出顺序
        let expected = next.entry(t).or_insert(0);
        assert_eq!(n, *expected);
        *expected += 1;
        total += 1;
    }
    assert_eq!(total, threads * per_thread);
    Ok(())
}
