use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig};
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

use super::chrome::{spawn_handler, ChromeSession};
use crate::error::SessionError;

/// 启动浏览器并创建空白页面
///
/// # 参数
/// - `executable`: 浏览器可执行文件，`None` 时由 chromiumoxide 自动查找
/// - `headless`: 是否使用无头模式
pub async fn launch_headless_browser(
    executable: Option<&Path>,
    headless: bool,
) -> Result<ChromeSession, SessionError> {
    info!("🚀 启动浏览器 (无头模式: {})...", headless);

    let mut builder = BrowserConfig::builder();
    builder = if headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(path) = executable {
        debug!("浏览器路径: {}", path.display());
        builder = builder.chrome_executable(path);
    }

    let config = builder
        .args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
        ])
        .build()
        .map_err(|e| {
            error!("配置浏览器失败: {}", e);
            SessionError::Launch(format!("配置浏览器失败: {}", e))
        })?;

    let (browser, handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        SessionError::Launch(format!("启动浏览器失败: {}", e))
    })?;
    debug!("浏览器启动成功");

    let handler = spawn_handler(handler);

    // 添加短暂延迟以等待浏览器状态同步
    sleep(Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        SessionError::Launch(format!("创建页面失败: {}", e))
    })?;

    info!("✅ 浏览器已就绪");
    Ok(ChromeSession::new(browser, page, handler, true))
}
