use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, Handler, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::{Session, TAB_BODY_SELECTOR, TAB_LABEL_SELECTOR};
use crate::error::SessionError;

/// 元素轮询间隔
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// chromiumoxide 会话
///
/// 持有 Browser、唯一的 Page 和后台事件处理任务。
/// 事件处理任务退出即表示与浏览器的连接已断开。
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    alive: Arc<AtomicBool>,
    /// 浏览器是否由本程序启动（连接模式下不关闭用户的浏览器）
    owned: bool,
}

impl ChromeSession {
    pub(crate) fn new(browser: Browser, page: Page, handler: HandlerTask, owned: bool) -> Self {
        Self {
            browser,
            page,
            handler_task: handler.task,
            alive: handler.alive,
            owned,
        }
    }

    /// CDP 错误归类：连接已断开时一律视为会话崩溃
    fn classify(&self, err: CdpError) -> SessionError {
        if !self.alive.load(Ordering::SeqCst) {
            return SessionError::Crashed(format!("浏览器连接已断开: {}", err));
        }
        err.into()
    }

    async fn has_element(&self, selector: &str) -> Result<bool, SessionError> {
        match self.page.find_elements(selector).await {
            Ok(elements) => Ok(!elements.is_empty()),
            Err(e) => match self.classify(e) {
                err @ SessionError::Crashed(_) => Err(err),
                // 页面还在加载时查询可能失败，按“未出现”处理
                _ => Ok(false),
            },
        }
    }
}

#[async_trait]
impl Session for ChromeSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        debug!("导航到: {}", url);
        match self.page.goto(url).await {
            Ok(_) => Ok(()),
            Err(e) => Err(match self.classify(e) {
                SessionError::Page(message) => SessionError::Navigation {
                    url: url.to_string(),
                    message,
                },
                other => other,
            }),
        }
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<bool, SessionError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.has_element(selector).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn open_tab(
        &mut self,
        label: &str,
        panel_wait: Duration,
    ) -> Result<Option<String>, SessionError> {
        let tabs = self
            .page
            .find_elements(TAB_LABEL_SELECTOR)
            .await
            .map_err(|e| self.classify(e))?;

        let mut target = None;
        for tab in tabs {
            let text = tab.inner_text().await.map_err(|e| self.classify(e))?;
            if text.as_deref().map(str::trim) == Some(label) {
                target = Some(tab);
                break;
            }
        }
        let Some(tab) = target else {
            debug!("未找到标签: {}", label);
            return Ok(None);
        };

        tab.click().await.map_err(|e| self.classify(e))?;

        if !self.wait_for(TAB_BODY_SELECTOR, panel_wait).await? {
            return Err(SessionError::Timeout {
                what: TAB_BODY_SELECTOR.to_string(),
                timeout_secs: panel_wait.as_secs(),
            });
        }

        let body = self
            .page
            .find_element(TAB_BODY_SELECTOR)
            .await
            .map_err(|e| self.classify(e))?;
        let html = body.inner_html().await.map_err(|e| self.classify(e))?;
        Ok(Some(html.unwrap_or_default()))
    }

    async fn page_source(&mut self) -> Result<String, SessionError> {
        self.page.content().await.map_err(|e| self.classify(e))
    }

    async fn close(&mut self) {
        if self.owned {
            if let Err(e) = self.browser.close().await {
                debug!("关闭浏览器失败: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                debug!("等待浏览器进程退出失败: {}", e);
            }
        } else if let Err(e) = self.page.clone().close().await {
            debug!("关闭页面失败: {}", e);
        }
        self.handler_task.abort();
        self.alive.store(false, Ordering::SeqCst);
    }
}

impl Drop for ChromeSession {
    // 未经 close() 就被丢弃时（panic 展开）也要停止事件处理任务
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}

/// 后台事件处理任务及其存活标记
pub(crate) struct HandlerTask {
    task: JoinHandle<()>,
    alive: Arc<AtomicBool>,
}

/// 在后台处理浏览器事件
pub(crate) fn spawn_handler(mut handler: Handler) -> HandlerTask {
    let alive = Arc::new(AtomicBool::new(true));
    let flag = alive.clone();
    let task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                debug!("浏览器事件处理错误: {}", e);
            }
        }
        warn!("⚠️ 浏览器事件流已结束");
        flag.store(false, Ordering::SeqCst);
    });
    HandlerTask { task, alive }
}
