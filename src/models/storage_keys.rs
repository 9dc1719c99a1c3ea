use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::error::ConfigError;

/// 输入名单文件名前缀
pub const REGISTER_PREFIX: &str = "schools_register";
/// 结果文件名前缀
pub const RESULTS_PREFIX: &str = "schools_results";
/// 数据文件扩展名
pub const DATA_EXTENSION: &str = "json";

/// 一次运行使用的两个存储位置：只读的输入名单 + 追加写入的结果文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl StorageKeys {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// 根据输入文件名中的编号推导结果文件名
    ///
    /// `schools_register12.json` → 同目录下的 `schools_results12.json`
    pub fn derive(input: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let input = input.into();
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let suffix = register_suffix(&name).ok_or_else(|| ConfigError::UnexpectedInputName {
            name: name.clone(),
            expected: format!("{}<编号>.{}", REGISTER_PREFIX, DATA_EXTENSION),
        })?;

        let output = input.with_file_name(format!("{}{}.{}", RESULTS_PREFIX, suffix, DATA_EXTENSION));
        debug!("结果文件: {}", output.display());
        Ok(Self { input, output })
    }

    /// 在数据目录中查找输入名单文件（按文件名排序取第一个）
    pub async fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let no_input = || ConfigError::NoInputFile {
            dir: dir.to_path_buf(),
        };

        let mut entries = fs::read_dir(dir).await.map_err(|_| no_input())?;
        let mut matches = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let name = entry.file_name().to_string_lossy().to_string();
            if register_suffix(&name).is_some() {
                matches.push(entry.path());
            }
        }
        matches.sort();

        let input = matches.into_iter().next().ok_or_else(no_input)?;
        info!("📁 找到输入文件: {}", input.display());
        Self::derive(input)
    }
}

/// 提取 `schools_register<编号>.json` 中的编号
fn register_suffix(name: &str) -> Option<&str> {
    let digits = name
        .strip_prefix(REGISTER_PREFIX)?
        .strip_suffix(DATA_EXTENSION)?
        .strip_suffix('.')?;
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}
