use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::StorageKeys;

/// 抓取重试后仍失败时的处理策略
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegradedPolicy {
    /// 继续解析当前页面（页面可能是旧的）
    #[default]
    Proceed,
    /// 跳过该机构，下次运行再处理
    Skip,
}

impl FromStr for DegradedPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proceed" => Ok(DegradedPolicy::Proceed),
            "skip" => Ok(DegradedPolicy::Skip),
            _ => Err(()),
        }
    }
}

/// 程序配置
///
/// 优先级：环境变量 > 配置文件（`HARVEST_CONFIG`）> 默认值
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 站点根地址
    pub base_url: String,
    /// 查找输入名单的目录（未指定 input_file 时使用）
    pub data_dir: PathBuf,
    /// 输入名单文件
    pub input_file: Option<PathBuf>,
    /// 结果文件（不指定时根据输入文件名推导）
    pub output_file: Option<PathBuf>,
    /// 连接已运行浏览器的调试端口，不设置则自行启动无头浏览器
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件路径
    pub chrome_executable: Option<PathBuf>,
    /// 是否使用无头模式启动
    pub headless: bool,
    /// 页面加载失败时的最大尝试次数
    pub fetch_retries: usize,
    /// 页面加载重试间隔（秒）
    pub fetch_pause_secs: u64,
    /// 读取信息面板的最大尝试次数
    pub panel_retries: usize,
    /// 读取信息面板的重试间隔（秒）
    pub panel_pause_secs: u64,
    /// 点击标签后等待面板出现的时间（秒）
    pub panel_wait_secs: u64,
    /// 页面加载后等待标签栏出现的时间（秒）
    pub tab_ready_timeout_secs: u64,
    /// 两个机构之间的间隔（秒）
    pub candidate_pause_secs: u64,
    /// 浏览器崩溃后重启前的等待（秒）
    pub restart_pause_secs: u64,
    /// 页面加载重试耗尽后的策略
    pub on_degraded: DegradedPolicy,
    /// 整页 HTML 调试输出文件
    pub page_dump_file: Option<PathBuf>,
    /// 信息面板 HTML 调试输出文件
    pub panel_dump_file: Option<PathBuf>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 运行日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://bus.gov.ru".to_string(),
            data_dir: PathBuf::from("."),
            input_file: None,
            output_file: None,
            browser_debug_port: None,
            chrome_executable: None,
            headless: true,
            fetch_retries: 15,
            fetch_pause_secs: 10,
            panel_retries: 5,
            panel_pause_secs: 2,
            panel_wait_secs: 10,
            tab_ready_timeout_secs: 60,
            candidate_pause_secs: 2,
            restart_pause_secs: 5,
            on_degraded: DegradedPolicy::Proceed,
            page_dump_file: Some(PathBuf::from("pretty_scrape.html")),
            panel_dump_file: Some(PathBuf::from("info_frame.html")),
            verbose_logging: false,
            output_log_file: "harvest_log.txt".to_string(),
        }
    }
}

impl Config {
    /// 读取配置文件（如果有）并应用环境变量
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = match std::env::var("HARVEST_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        base.with_env_overrides()
    }

    /// 从 TOML 文件读取配置，缺失的字段使用默认值
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidFile {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        toml::from_str(&content).map_err(|e| invalid(e.to_string()))
    }

    fn with_env_overrides(self) -> Result<Self, ConfigError> {
        let default = self;
        Ok(Self {
            base_url: env_string("HARVEST_BASE_URL").unwrap_or(default.base_url),
            data_dir: env_string("HARVEST_DATA_DIR").map(PathBuf::from).unwrap_or(default.data_dir),
            input_file: env_string("HARVEST_INPUT_FILE").map(PathBuf::from).or(default.input_file),
            output_file: env_string("HARVEST_OUTPUT_FILE").map(PathBuf::from).or(default.output_file),
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT", "u16")?.or(default.browser_debug_port),
            chrome_executable: env_string("CHROME_EXECUTABLE").map(PathBuf::from).or(default.chrome_executable),
            headless: env_parse("HARVEST_HEADLESS", "bool")?.unwrap_or(default.headless),
            fetch_retries: env_parse("HARVEST_FETCH_RETRIES", "usize")?.unwrap_or(default.fetch_retries),
            fetch_pause_secs: env_parse("HARVEST_FETCH_PAUSE_SECS", "u64")?.unwrap_or(default.fetch_pause_secs),
            panel_retries: env_parse("HARVEST_PANEL_RETRIES", "usize")?.unwrap_or(default.panel_retries),
            panel_pause_secs: env_parse("HARVEST_PANEL_PAUSE_SECS", "u64")?.unwrap_or(default.panel_pause_secs),
            panel_wait_secs: env_parse("HARVEST_PANEL_WAIT_SECS", "u64")?.unwrap_or(default.panel_wait_secs),
            tab_ready_timeout_secs: env_parse("HARVEST_TAB_READY_SECS", "u64")?
                .unwrap_or(default.tab_ready_timeout_secs),
            candidate_pause_secs: env_parse("HARVEST_CANDIDATE_PAUSE_SECS", "u64")?
                .unwrap_or(default.candidate_pause_secs),
            restart_pause_secs: env_parse("HARVEST_RESTART_PAUSE_SECS", "u64")?
                .unwrap_or(default.restart_pause_secs),
            on_degraded: env_parse("HARVEST_ON_DEGRADED", "proceed|skip")?.unwrap_or(default.on_degraded),
            page_dump_file: env_string("HARVEST_PAGE_DUMP").map(PathBuf::from).or(default.page_dump_file),
            panel_dump_file: env_string("HARVEST_PANEL_DUMP").map(PathBuf::from).or(default.panel_dump_file),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?.unwrap_or(default.verbose_logging),
            output_log_file: env_string("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        })
    }

    /// 确定输入名单和结果文件
    ///
    /// 显式配置优先；只给出输入文件时按编号推导结果文件；
    /// 没有输入文件时在 `data_dir` 中查找，显式给出的结果文件仍然生效。
    pub async fn storage_keys(&self) -> Result<StorageKeys, ConfigError> {
        match (&self.input_file, &self.output_file) {
            (Some(input), Some(output)) => Ok(StorageKeys::new(input, output)),
            (Some(input), None) => StorageKeys::derive(input),
            (None, output) => {
                let mut keys = StorageKeys::discover(&self.data_dir).await?;
                if let Some(output) = output {
                    keys.output = output.clone();
                }
                Ok(keys)
            }
        }
    }

    pub fn fetch_pause(&self) -> Duration {
        Duration::from_secs(self.fetch_pause_secs)
    }

    pub fn panel_pause(&self) -> Duration {
        Duration::from_secs(self.panel_pause_secs)
    }

    pub fn panel_wait(&self) -> Duration {
        Duration::from_secs(self.panel_wait_secs)
    }

    pub fn tab_ready_timeout(&self) -> Duration {
        Duration::from_secs(self.tab_ready_timeout_secs)
    }

    pub fn candidate_pause(&self) -> Duration {
        Duration::from_secs(self.candidate_pause_secs)
    }

    pub fn restart_pause(&self) -> Duration {
        Duration::from_secs(self.restart_pause_secs)
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match env_string(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_file_overrides_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.toml");
        std::fs::write(
            &path,
            "fetch_retries = 3\non_degraded = \"skip\"\ninput_file = \"data/schools_register5.json\"\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.fetch_retries, 3);
        assert_eq!(config.on_degraded, DegradedPolicy::Skip);
        assert_eq!(config.panel_retries, 5);
        assert_eq!(config.base_url, "https://bus.gov.ru");
    }

    #[test]
    fn broken_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harvest.toml");
        std::fs::write(&path, "fetch_retries = \"many\"").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::InvalidFile { .. })
        ));
    }

    #[tokio::test]
    async fn explicit_pair_wins_over_derivation() {
        let config = Config {
            input_file: Some(PathBuf::from("in/list.json")),
            output_file: Some(PathBuf::from("out/results.json")),
            ..Default::default()
        };
        let keys = config.storage_keys().await.unwrap();
        assert_eq!(keys, StorageKeys::new("in/list.json", "out/results.json"));
    }

    #[tokio::test]
    async fn input_only_derives_output() {
        let config = Config {
            input_file: Some(PathBuf::from("schools_register3.json")),
            ..Default::default()
        };
        let keys = config.storage_keys().await.unwrap();
        assert_eq!(keys.output, PathBuf::from("schools_results3.json"));
    }

    #[tokio::test]
    async fn explicit_output_is_kept_when_input_is_discovered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("schools_register4.json"), "[]").unwrap();
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            output_file: Some(PathBuf::from("out/results.json")),
            ..Default::default()
        };

        let keys = config.storage_keys().await.unwrap();
        assert_eq!(keys.input, dir.path().join("schools_register4.json"));
        assert_eq!(keys.output, PathBuf::from("out/results.json"));
    }

    #[test]
    fn degraded_policy_parses_case_insensitively() {
        assert_eq!("SKIP".parse::<DegradedPolicy>(), Ok(DegradedPolicy::Skip));
        assert!("maybe".parse::<DegradedPolicy>().is_err());
    }
}
