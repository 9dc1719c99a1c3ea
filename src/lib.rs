//! # Registry Harvest
//!
//! 从 bus.gov.ru 机构详情页增量抓取结构化信息（识别号、负责人、主管机构、
//! 补贴历史、人员与工资历史），可在崩溃或网络故障后安全续跑。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层
//! - `browser/` - 浏览器会话（唯一的页面持有者），只暴露导航、等待、打开标签等能力
//! - `infrastructure/` - 等待原语和重试策略
//!
//! ### ② 业务能力层
//! - `services/` - 名单筛选、带重试的页面加载、面板轮询、结果存储、调试输出
//! - `extract/` - 面板 HTML 的纯函数解析
//!
//! ### ③ 流程层
//! - `workflow/` - 单个机构的完整处理流程（加载 → 面板 → 解析 → 合并）
//!
//! ### ④ 编排层
//! - `orchestrator/` - 逐个处理待处理名单，管理会话生命周期和断点保存

pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{ChromeSessionFactory, Session, SessionFactory};
pub use config::{Config, DegradedPolicy};
pub use error::{AppError, AppResult};
pub use models::{Candidate, OrgInfo, PendingCandidate, ResultRecord, StorageKeys};
pub use orchestrator::{Harvester, RunStats};
pub use services::select_pending;
pub use workflow::{CandidateCtx, CandidateFlow, ProcessResult, SkipReason};
