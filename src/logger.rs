use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// 初始化日志
///
/// 控制台输出 + 追加写入运行日志文件。`RUST_LOG` 可覆盖默认级别。
pub fn init(verbose: bool, log_file: Option<&str>) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = log_file
        .and_then(|path| OpenOptions::new().create(true).append(true).open(path).ok())
        .map(|file| fmt::layer().with_ansi(false).with_target(false).with_writer(Mutex::new(file)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .try_init();
}
