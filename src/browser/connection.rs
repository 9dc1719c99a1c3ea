use chromiumoxide::Browser;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

use super::chrome::{spawn_handler, ChromeSession};
use crate::error::SessionError;

/// 连接到已运行的浏览器（通过远程调试端口）并打开一个新页面
///
/// 适合需要人工登录或观察抓取过程的场景，会话关闭时只关闭该页面。
pub async fn connect_to_browser(port: u16) -> Result<ChromeSession, SessionError> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        SessionError::Launch(format!("无法连接到浏览器 (端口: {}): {}", port, e))
    })?;
    debug!("浏览器连接成功");

    let handler = spawn_handler(handler);

    // 添加短暂延迟以等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建新页面失败: {}", e);
        SessionError::Launch(format!("创建页面失败: {}", e))
    })?;
    info!("✓ 已连接浏览器并创建页面");

    Ok(ChromeSession::new(browser, page, handler, false))
}
