//! 机构处理流程 - 流程层
//!
//! 核心职责：定义“一个机构”的完整处理流程
//!
//! 流程顺序：
//! 1. 打开详情页（带重试）
//! 2. 等待标签栏出现
//! 3. 打开“其他信息”面板（轮询）
//! 4. 解析面板，合并到原始记录

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::browser::{Session, TAB_LABEL_SELECTOR};
use crate::config::{Config, DegradedPolicy};
use crate::error::SessionError;
use crate::extract::parse_info;
use crate::infrastructure::{RetryPolicy, Waiter};
use crate::models::{PendingCandidate, ResultRecord};
use crate::services::{DebugDump, FetchOutcome, InfoPanelReader, PageFetcher, PanelOutcome};
use crate::workflow::candidate_ctx::CandidateCtx;

/// 跳过原因（机构保留在待处理名单中，下次运行再试）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 页面加载重试耗尽，且策略为跳过
    PageDegraded,
    /// 信息面板始终未出现
    PanelAbsent,
    /// 打开的面板不是“其他信息”面板
    MarkerMissing,
}

/// 机构处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessResult {
    /// 解析成功，等待写入结果文件
    Extracted {
        record: ResultRecord,
        /// 页面加载重试耗尽后仍继续解析的
        degraded: bool,
    },
    /// 跳过
    Skipped(SkipReason),
}

/// 机构处理流程
///
/// - 编排单个机构的处理步骤
/// - 不持有会话，由编排层传入
/// - 只有会话崩溃以错误返回
pub struct CandidateFlow {
    base_url: String,
    fetcher: PageFetcher,
    panel_reader: InfoPanelReader,
    debug_dump: DebugDump,
    tab_ready_timeout: Duration,
    on_degraded: DegradedPolicy,
}

impl CandidateFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            fetcher: PageFetcher::new(RetryPolicy::new(config.fetch_retries, config.fetch_pause())),
            panel_reader: InfoPanelReader::new(
                RetryPolicy::new(config.panel_retries, config.panel_pause()),
                config.panel_wait(),
            ),
            debug_dump: DebugDump::new(config.page_dump_file.clone(), config.panel_dump_file.clone()),
            tab_ready_timeout: config.tab_ready_timeout(),
            on_degraded: config.on_degraded,
        }
    }

    /// 替换调试输出
    pub fn with_debug_dump(mut self, debug_dump: DebugDump) -> Self {
        self.debug_dump = debug_dump;
        self
    }

    pub async fn run<S, W>(
        &self,
        session: &mut S,
        candidate: &PendingCandidate,
        ctx: &CandidateCtx,
        waiter: &W,
    ) -> Result<ProcessResult, SessionError>
    where
        S: Session + ?Sized,
        W: Waiter + ?Sized,
    {
        // ========== 步骤 1: 打开详情页 ==========
        let url = candidate.detail_page_url(&self.base_url);
        debug!("{} 详情页: {}", ctx, url);

        let fetched = self.fetcher.fetch(session, &url, waiter).await?;
        let degraded = !fetched.is_loaded();
        if let FetchOutcome::Degraded { attempts, last_error } = &fetched {
            warn!(
                "{} ⚠️ 页面加载 {} 次均失败，当前页面可能已过期: {}",
                ctx,
                attempts,
                last_error.as_deref().unwrap_or("-")
            );
            if self.on_degraded == DegradedPolicy::Skip {
                return Ok(ProcessResult::Skipped(SkipReason::PageDegraded));
            }
        }

        // ========== 步骤 2: 等待标签栏 ==========
        match session.wait_for(TAB_LABEL_SELECTOR, self.tab_ready_timeout).await {
            Ok(true) => {}
            Ok(false) => debug!("{} 等待标签栏超时，继续尝试读取面板", ctx),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => debug!("{} 等待标签栏出错: {}", ctx, e),
        }

        // ========== 步骤 3: 读取信息面板 ==========
        let fragment = match self.panel_reader.read(session, waiter).await? {
            PanelOutcome::Present(fragment) => fragment,
            PanelOutcome::Absent { attempts } => {
                warn!("{} ⚠️ 尝试 {} 次仍未找到信息面板，跳过", ctx, attempts);
                return Ok(ProcessResult::Skipped(SkipReason::PanelAbsent));
            }
        };

        self.debug_dump.panel(&fragment).await;
        self.debug_dump.page(session).await;

        // ========== 步骤 4: 解析并合并 ==========
        let info = match parse_info(&fragment) {
            Ok(info) => info,
            Err(e) => {
                warn!("{} ⚠️ {}，跳过", ctx, e);
                return Ok(ProcessResult::Skipped(SkipReason::MarkerMissing));
            }
        };

        let fields = info.present_keys();
        info!("{} ✓ 解析出 {} 个字段: {}", ctx, fields.len(), fields.join(", "));

        Ok(ProcessResult::Extracted {
            record: ResultRecord::merge(candidate.clone(), info),
            degraded,
        })
    }
}
