//! 名单读取与结果存储 - 业务能力层
//!
//! 结果文件是一个 JSON 数组。每处理成功一个机构就把完整数组重写一次
//! （先写临时文件再改名），崩溃时最多丢失正在处理的那一个。

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::{Candidate, ResultRecord};

/// 读取输入名单（文件必须存在）
pub async fn load_candidates(path: &Path) -> Result<Vec<Candidate>, StoreError> {
    let candidates: Vec<Candidate> = read_json(path).await?;
    info!("✓ 从 {} 读取了 {} 条记录", path.display(), candidates.len());
    Ok(candidates)
}

/// 结果文件
#[derive(Debug)]
pub struct ResultStore {
    path: PathBuf,
    records: Vec<ResultRecord>,
}

impl ResultStore {
    /// 打开结果文件，文件不存在时从空列表开始
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = match read_json(&path).await {
            Ok(records) => records,
            Err(StoreError::NotFound { .. }) => {
                info!("结果文件 {} 不存在，从头开始", path.display());
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        debug!("已有结果 {} 条", records.len());
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, main_url: &str) -> bool {
        self.records.iter().any(|r| r.main_url == main_url)
    }

    /// 追加一条结果并立即写盘
    ///
    /// `main_url` 已存在时不写入，返回 `false`。
    /// 写盘失败时内存中的列表也回滚，保持与文件一致。
    pub async fn append(&mut self, record: ResultRecord) -> Result<bool, StoreError> {
        if self.contains(&record.main_url) {
            return Ok(false);
        }
        self.records.push(record);
        if let Err(e) = self.persist().await {
            self.records.pop();
            return Err(e);
        }
        Ok(true)
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(&self.records)
            .map_err(|e| StoreError::json(&self.path, e))?;

        let tmp = tmp_path(&self.path);
        fs::write(&tmp, json)
            .await
            .map_err(|e| StoreError::write(&tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::write(&self.path, e))?;

        debug!("已保存 {} 条结果到 {}", self.records.len(), self.path.display());
        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = fs::read(path).await.map_err(|e| StoreError::read(path, e))?;
    serde_json::from_slice(&content).map_err(|e| StoreError::json(path, e))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
