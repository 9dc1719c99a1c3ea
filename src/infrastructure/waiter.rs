//! 等待原语 - 基础设施层
//!
//! 所有重试间隔、机构间隔都通过 [`Waiter`] 完成，
//! 业务代码里不直接调用 sleep，测试时可以替换成不真正等待的实现。

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

/// 等待能力
#[async_trait]
pub trait Waiter: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// 基于 tokio 定时器的等待
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioWaiter;

#[async_trait]
impl Waiter for TokioWaiter {
    async fn wait(&self, duration: Duration) {
        sleep(duration).await;
    }
}

/// 有界重试策略：最多尝试 `attempts` 次，两次尝试之间等待 `pause`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: usize,
    pub pause: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: usize, pause: Duration) -> Self {
        Self { attempts, pause }
    }

    /// 第 `attempt` 次（从 1 开始）失败后是否还能继续
    pub fn has_next(&self, attempt: usize) -> bool {
        attempt < self.attempts
    }
}
