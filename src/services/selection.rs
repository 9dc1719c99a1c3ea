//! 待处理名单筛选 - 业务能力层

use std::collections::HashSet;

use crate::models::{Candidate, PendingCandidate, ResultRecord};

/// 计算本次运行需要处理的机构
///
/// 1. 只保留同时有 `main_url` 和 `details_url` 的记录，同一 `main_url` 只保留第一条
/// 2. 去掉已经在结果文件中的机构
///
/// 输出保持输入顺序。
pub fn select_pending(candidates: &[Candidate], previous: &[ResultRecord]) -> Vec<PendingCandidate> {
    let done: HashSet<&str> = previous.iter().map(|r| r.main_url.as_str()).collect();
    let mut seen: HashSet<String> = HashSet::new();

    candidates
        .iter()
        .filter_map(Candidate::eligible)
        .filter(|c| seen.insert(c.main_url.clone()))
        .filter(|c| !done.contains(c.main_url.as_str()))
        .collect()
}
