//! 信息面板读取服务 - 业务能力层
//!
//! 面板内容由前端异步渲染，标签可能在页面加载后一段时间才出现，
//! 因此按固定间隔轮询，次数有上限。

use std::time::Duration;

use tracing::{debug, warn};

use crate::browser::Session;
use crate::error::SessionError;
use crate::infrastructure::{RetryPolicy, Waiter};

/// “其他信息”标签的文字
pub const INFO_TAB_LABEL: &str = "ПРОЧАЯ ИНФОРМАЦИЯ";

/// 面板读取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelOutcome {
    /// 面板 HTML 片段
    Present(String),
    /// 轮询结束仍未找到面板
    Absent { attempts: usize },
}

/// 信息面板读取服务
pub struct InfoPanelReader {
    policy: RetryPolicy,
    panel_wait: Duration,
    label: String,
}

impl InfoPanelReader {
    pub fn new(policy: RetryPolicy, panel_wait: Duration) -> Self {
        Self {
            policy,
            panel_wait,
            label: INFO_TAB_LABEL.to_string(),
        }
    }

    /// 使用其他标签文字
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// 打开标签并读取面板
    ///
    /// 标签不存在或面板未及时出现都算一次失败的尝试；会话崩溃直接返回错误。
    pub async fn read<S, W>(&self, session: &mut S, waiter: &W) -> Result<PanelOutcome, SessionError>
    where
        S: Session + ?Sized,
        W: Waiter + ?Sized,
    {
        for attempt in 1..=self.policy.attempts {
            match session.open_tab(&self.label, self.panel_wait).await {
                Ok(Some(fragment)) => {
                    debug!("面板已读取 (第 {} 次尝试), 长度 {}", attempt, fragment.len());
                    return Ok(PanelOutcome::Present(fragment));
                }
                Ok(None) => {
                    debug!(
                        "标签 '{}' 尚未出现 (尝试 {}/{})",
                        self.label, attempt, self.policy.attempts
                    );
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(
                        "⚠️ 打开标签 '{}' 失败 (尝试 {}/{}): {}",
                        self.label, attempt, self.policy.attempts, e
                    );
                }
            }
            if self.policy.has_next(attempt) {
                waiter.wait(self.policy.pause).await;
            }
        }

        Ok(PanelOutcome::Absent {
            attempts: self.policy.attempts,
        })
    }
}
