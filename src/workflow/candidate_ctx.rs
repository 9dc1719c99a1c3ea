//! 机构处理上下文
//!
//! 封装“正在处理名单中的第几个机构”这一信息

use std::fmt::Display;

/// 机构处理上下文
#[derive(Debug, Clone)]
pub struct CandidateCtx {
    /// 在本次待处理列表中的序号（从1开始）
    pub index: usize,

    /// 本次待处理总数
    pub total: usize,

    /// 机构主页地址
    pub main_url: String,
}

impl CandidateCtx {
    pub fn new(index: usize, total: usize, main_url: impl Into<String>) -> Self {
        Self {
            index,
            total,
            main_url: main_url.into(),
        }
    }
}

impl Display for CandidateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[机构 {}/{}]", self.index, self.total)
    }
}
