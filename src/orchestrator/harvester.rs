//! 抓取编排器 - 编排层
//!
//! ## 职责
//!
//! 1. **确定存储位置**：输入名单和结果文件，名称不合法时在启动浏览器之前失败
//! 2. **筛选名单**：去重、去掉已处理的机构
//! 3. **会话管理**：创建会话，崩溃时重建，退出时一定关闭
//! 4. **逐个处理**：严格顺序，一个机构处理完再处理下一个
//! 5. **断点保存**：每成功一个立即写入结果文件
//! 6. **全局统计**

use std::panic::{resume_unwind, AssertUnwindSafe};

use futures::FutureExt;
use tracing::{error, info, warn};

use crate::browser::{ChromeSessionFactory, Session, SessionFactory};
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{TokioWaiter, Waiter};
use crate::models::{PendingCandidate, StorageKeys};
use crate::services::{load_candidates, select_pending, ResultStore};
use crate::utils::logging::{log_candidates_loaded, log_startup, print_final_stats, truncate_text};
use crate::workflow::{CandidateCtx, CandidateFlow, ProcessResult};

/// 一次运行的统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// 本次待处理数量
    pub total: usize,
    /// 成功写入结果文件
    pub recorded: usize,
    /// 跳过（留待下次运行）
    pub skipped: usize,
    /// 页面加载降级后仍写入的
    pub degraded: usize,
    /// 会话崩溃次数
    pub crashes: usize,
}

/// 抓取编排器
///
/// 唯一持有会话和结果文件的模块。
pub struct Harvester<F, W = TokioWaiter> {
    config: Config,
    keys: StorageKeys,
    factory: F,
    waiter: W,
    flow: CandidateFlow,
}

impl Harvester<ChromeSessionFactory, TokioWaiter> {
    /// 根据配置初始化（使用 chromiumoxide 浏览器）
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let keys = config.storage_keys().await?;
        log_startup(&config, &keys);
        let factory = ChromeSessionFactory::from_config(&config);
        Ok(Self::new(config, keys, factory, TokioWaiter))
    }
}

impl<F, W> Harvester<F, W>
where
    F: SessionFactory,
    W: Waiter,
{
    pub fn new(config: Config, keys: StorageKeys, factory: F, waiter: W) -> Self {
        let flow = CandidateFlow::new(&config);
        Self {
            config,
            keys,
            factory,
            waiter,
            flow,
        }
    }

    /// 替换单个机构的处理流程（例如关闭调试输出）
    pub fn with_flow(mut self, flow: CandidateFlow) -> Self {
        self.flow = flow;
        self
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// 运行一次完整的抓取
    pub async fn run(&self) -> AppResult<RunStats> {
        let candidates = load_candidates(&self.keys.input).await?;
        let mut store = ResultStore::open(&self.keys.output).await?;

        let pending = select_pending(&candidates, store.records());
        log_candidates_loaded(candidates.len(), pending.len(), store.len());

        let mut stats = RunStats {
            total: pending.len(),
            ..Default::default()
        };

        if pending.is_empty() {
            warn!("⚠️ 没有需要处理的机构，程序结束");
            return Ok(stats);
        }

        let mut session = Some(self.factory.create().await?);

        let outcome = AssertUnwindSafe(self.process_all(&mut session, &pending, &mut store, &mut stats))
            .catch_unwind()
            .await;

        // 无论成功、失败还是 panic 都释放会话
        if let Some(mut session) = session.take() {
            session.close().await;
        }

        let result = match outcome {
            Ok(result) => result,
            Err(panic) => {
                error!("❌ 处理过程中发生 panic，会话已关闭");
                resume_unwind(panic);
            }
        };

        if let Err(e) = &result {
            error!("❌ 运行中止: {}", e);
        }
        result?;

        print_final_stats(&stats, &self.config.output_log_file);
        Ok(stats)
    }

    async fn process_all(
        &self,
        session: &mut Option<F::Session>,
        pending: &[PendingCandidate],
        store: &mut ResultStore,
        stats: &mut RunStats,
    ) -> AppResult<()> {
        let total = pending.len();

        for (idx, candidate) in pending.iter().enumerate() {
            let ctx = CandidateCtx::new(idx + 1, total, candidate.main_url.clone());
            info!(
                "\n{} 开始处理: {}",
                ctx,
                truncate_text(&candidate.main_url, 80)
            );

            let active = match session.take() {
                Some(active) => active,
                None => {
                    info!("🔄 正在重新创建浏览器会话...");
                    self.factory.create().await?
                }
            };
            let active = session.insert(active);

            match self.flow.run(active, candidate, &ctx, &self.waiter).await {
                Ok(ProcessResult::Extracted { record, degraded }) => {
                    if store.append(record).await? {
                        stats.recorded += 1;
                        if degraded {
                            stats.degraded += 1;
                        }
                        info!("{} ✅ 已保存 (结果文件共 {} 条)", ctx, store.len());
                    } else {
                        warn!("{} ⚠️ 结果文件中已存在该机构，未重复写入", ctx);
                    }
                }
                Ok(ProcessResult::Skipped(reason)) => {
                    stats.skipped += 1;
                    warn!("{} ⏭️ 已跳过 ({:?})，下次运行会重新处理", ctx, reason);
                }
                Err(e) if e.is_fatal() => {
                    stats.crashes += 1;
                    error!("{} 💥 浏览器会话崩溃或窗口被关闭: {}", ctx, e);
                    if let Some(mut dead) = session.take() {
                        dead.close().await;
                    }
                    self.waiter.wait(self.config.restart_pause()).await;
                    continue;
                }
                Err(e) => {
                    stats.skipped += 1;
                    warn!("{} ⏭️ 处理失败，已跳过: {}", ctx, e);
                }
            }

            if idx + 1 < total {
                self.waiter.wait(self.config.candidate_pause()).await;
            }
        }

        Ok(())
    }
}
