//! 调试输出服务 - 业务能力层
//!
//! 把最近一次的页面和面板 HTML 写到文件里，方便排查解析问题。
//! 写入失败只记录警告，不影响抓取流程。

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::browser::Session;

/// 调试输出服务
#[derive(Debug, Clone, Default)]
pub struct DebugDump {
    page_path: Option<PathBuf>,
    panel_path: Option<PathBuf>,
}

impl DebugDump {
    pub fn new(page_path: Option<PathBuf>, panel_path: Option<PathBuf>) -> Self {
        Self {
            page_path,
            panel_path,
        }
    }

    /// 不输出任何文件
    pub fn disabled() -> Self {
        Self::default()
    }

    /// 写入面板 HTML
    pub async fn panel(&self, fragment: &str) {
        if let Some(path) = &self.panel_path {
            write_best_effort(path, fragment).await;
        }
    }

    /// 写入当前整页 HTML
    pub async fn page<S: Session + ?Sized>(&self, session: &mut S) {
        let Some(path) = &self.page_path else {
            return;
        };
        match session.page_source().await {
            Ok(html) => write_best_effort(path, &html).await,
            Err(e) => warn!("⚠️ 读取页面源码失败，跳过调试输出: {}", e),
        }
    }
}

async fn write_best_effort(path: &Path, html: &str) {
    match fs::write(path, pretty(html)).await {
        Ok(()) => debug!("调试输出已写入: {}", path.display()),
        Err(e) => warn!("⚠️ 写入调试文件 {} 失败: {}", path.display(), e),
    }
}

/// 每个标签另起一行，便于人工阅读
fn pretty(html: &str) -> String {
    html.replace("><", ">\n<")
}
