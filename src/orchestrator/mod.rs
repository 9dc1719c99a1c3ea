//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! harvester (处理整个待处理名单，持有会话和结果文件)
//!     ↓
//! workflow::CandidateFlow (处理单个机构)
//!     ↓
//! services (能力层：fetch / panel / store / dump)
//!     ↓
//! browser + infrastructure (会话、等待)
//! ```

pub mod harvester;

pub use harvester::{Harvester, RunStats};
