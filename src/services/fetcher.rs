//! 页面加载服务 - 业务能力层
//!
//! 只负责“带重试地打开一个页面”，不关心页面内容

use tracing::{debug, warn};

use crate::browser::Session;
use crate::error::SessionError;
use crate::infrastructure::{RetryPolicy, Waiter};

/// 页面加载结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 页面已加载
    Loaded { attempts: usize },
    /// 重试耗尽仍未加载成功，浏览器里可能还是上一个页面
    Degraded {
        attempts: usize,
        last_error: Option<String>,
    },
}

impl FetchOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, FetchOutcome::Loaded { .. })
    }
}

/// 页面加载服务
///
/// 导航失败时等待固定时间后重试。只有会话崩溃会以错误返回，
/// 其余失败在重试耗尽后以 [`FetchOutcome::Degraded`] 返回。
pub struct PageFetcher {
    policy: RetryPolicy,
}

impl PageFetcher {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub async fn fetch<S, W>(&self, session: &mut S, url: &str, waiter: &W) -> Result<FetchOutcome, SessionError>
    where
        S: Session + ?Sized,
        W: Waiter + ?Sized,
    {
        let mut last_error = None;

        for attempt in 1..=self.policy.attempts {
            match session.navigate(url).await {
                Ok(()) => {
                    debug!("页面加载成功 (第 {} 次尝试): {}", attempt, url);
                    return Ok(FetchOutcome::Loaded { attempts: attempt });
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(
                        "⚠️ 读取页面时浏览器出错 (尝试 {}/{}): {}",
                        attempt, self.policy.attempts, e
                    );
                    last_error = Some(e.to_string());
                    if self.policy.has_next(attempt) {
                        waiter.wait(self.policy.pause).await;
                    }
                }
            }
        }

        Ok(FetchOutcome::Degraded {
            attempts: self.policy.attempts,
            last_error,
        })
    }
}
