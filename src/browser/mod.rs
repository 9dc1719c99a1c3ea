//! 浏览器会话
//!
//! 流程只依赖 [`Session`] / [`SessionFactory`] 两个抽象：
//! - `Session`：导航、等待元素、打开标签页面板、读取页面源码
//! - `SessionFactory`：创建新会话（首次启动和崩溃后重建）
//!
//! 生产实现基于 chromiumoxide，见 [`ChromeSession`]。

mod chrome;
pub mod connection;
pub mod headless;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::SessionError;

pub use chrome::ChromeSession;
pub use connection::connect_to_browser;
pub use headless::launch_headless_browser;

/// 标签栏中每个标签的文字容器
pub const TAB_LABEL_SELECTOR: &str = "div.mat-tab-label-content";
/// 当前激活标签的内容区域
pub const TAB_BODY_SELECTOR: &str = "div.mat-tab-body-wrapper";

/// 一个可用的浏览器会话
#[async_trait]
pub trait Session: Send {
    /// 导航到指定地址
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError>;

    /// 等待匹配 `selector` 的元素出现，超时返回 `false`
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<bool, SessionError>;

    /// 查找文字完全等于 `label` 的标签并点击，返回其内容区域的 HTML
    ///
    /// 标签不存在时返回 `None`；点击后内容区域在 `panel_wait` 内未出现时返回超时错误。
    async fn open_tab(&mut self, label: &str, panel_wait: Duration)
        -> Result<Option<String>, SessionError>;

    /// 当前页面的完整 HTML
    async fn page_source(&mut self) -> Result<String, SessionError>;

    /// 释放会话（失败只记录日志）
    async fn close(&mut self);
}

/// 会话工厂
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: Session;

    async fn create(&self) -> Result<Self::Session, SessionError>;
}

/// 基于 chromiumoxide 的会话工厂
///
/// 配置了调试端口时连接已运行的浏览器，否则自行启动一个。
#[derive(Debug, Clone)]
pub struct ChromeSessionFactory {
    pub debug_port: Option<u16>,
    pub executable: Option<PathBuf>,
    pub headless: bool,
}

impl ChromeSessionFactory {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debug_port: config.browser_debug_port,
            executable: config.chrome_executable.clone(),
            headless: config.headless,
        }
    }
}

#[async_trait]
impl SessionFactory for ChromeSessionFactory {
    type Session = ChromeSession;

    async fn create(&self) -> Result<ChromeSession, SessionError> {
        match self.debug_port {
            Some(port) => connect_to_browser(port).await,
            None => launch_headless_browser(self.executable.as_deref(), self.headless).await,
        }
    }
}
