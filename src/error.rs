use std::path::PathBuf;

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器会话错误
    #[error("浏览器错误: {0}")]
    Session(#[from] SessionError),
    /// 结果存储错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 页面解析错误
    #[error("解析错误: {0}")]
    Extract(#[from] ExtractError),
}

/// 浏览器会话错误
///
/// 区分两类失败：
/// - 可重试的导航失败（网络抖动、驱动偶发错误）
/// - 会话本身崩溃（必须重建会话）
#[derive(Debug, Error)]
pub enum SessionError {
    /// 导航失败（可重试）
    #[error("导航到 {url} 失败: {message}")]
    Navigation { url: String, message: String },
    /// 等待元素超时
    #[error("等待 {what} 超时 ({timeout_secs} 秒)")]
    Timeout { what: String, timeout_secs: u64 },
    /// 页面操作失败（元素查找、点击、读取等）
    #[error("页面操作失败: {0}")]
    Page(String),
    /// 会话已崩溃或窗口已关闭
    #[error("浏览器会话已崩溃: {0}")]
    Crashed(String),
    /// 启动或连接浏览器失败
    #[error("无法启动浏览器会话: {0}")]
    Launch(String),
}

impl SessionError {
    /// 会话是否已不可用（需要重建）
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::Crashed(_))
    }
}

impl From<chromiumoxide::error::CdpError> for SessionError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        use chromiumoxide::error::CdpError;
        match err {
            // websocket 断开或 handler 已退出，会话不可恢复
            CdpError::Ws(_) | CdpError::ChannelSendError(_) => {
                SessionError::Crashed(err.to_string())
            }
            other => SessionError::Page(other.to_string()),
        }
    }
}

/// 结果存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 文件不存在
    #[error("文件不存在: {}", path.display())]
    NotFound { path: PathBuf },
    /// 读取文件失败
    #[error("读取文件失败 ({}): {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({}): {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// JSON 解析或序列化失败
    #[error("JSON 处理失败 ({}): {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 输入文件名不符合命名约定
    #[error("输入文件名不符合约定 (应为 {expected}): {name}")]
    UnexpectedInputName { name: String, expected: String },
    /// 数据目录中没有找到输入文件
    #[error("目录 {} 中没有找到输入文件", dir.display())]
    NoInputFile { dir: PathBuf },
    /// 配置文件读取或解析失败
    #[error("配置文件 {} 无效: {message}", path.display())]
    InvalidFile { path: PathBuf, message: String },
}

/// 页面解析错误
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 信息面板缺少标记元素
    #[error("信息面板中没有找到标记元素 <{marker}>")]
    MarkerMissing { marker: String },
}

// ========== 便捷构造函数 ==========

impl StoreError {
    /// 根据 io 错误类型区分“不存在”和“读取失败”
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound { path }
        } else {
            StoreError::ReadFailed { path, source }
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::WriteFailed {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StoreError::Json {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_crash_is_fatal() {
        assert!(SessionError::Crashed("window closed".into()).is_fatal());
        assert!(!SessionError::Navigation {
            url: "https://bus.gov.ru/x".into(),
            message: "net::ERR_CONNECTION_RESET".into(),
        }
        .is_fatal());
        assert!(!SessionError::Page("stale element".into()).is_fatal());
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = StoreError::read(
            "schools_results1.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
