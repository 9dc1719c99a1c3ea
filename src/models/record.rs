use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::models::org_info::OrgInfo;

/// 输入名单中的一条机构记录
///
/// 只有 `main_url` 和 `details_url` 是流程关心的字段，
/// 其余字段原样保留，最终写回结果文件。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Candidate {
    pub fn new(main_url: impl Into<String>, details_url: impl Into<String>) -> Self {
        Self {
            main_url: Some(main_url.into()),
            details_url: Some(details_url.into()),
            extra: Map::new(),
        }
    }

    /// 两个 URL 都存在时才可以进入处理流程
    pub fn eligible(&self) -> Option<PendingCandidate> {
        match (&self.main_url, &self.details_url) {
            (Some(main_url), Some(details_url)) => Some(PendingCandidate {
                main_url: main_url.clone(),
                details_url: details_url.clone(),
                extra: self.extra.clone(),
            }),
            _ => None,
        }
    }
}

/// 待处理的机构（两个 URL 必然存在）
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCandidate {
    pub main_url: String,
    pub details_url: String,
    pub extra: Map<String, JsonValue>,
}

impl PendingCandidate {
    /// 拼接详情页完整地址
    ///
    /// `details_url` 已经是绝对地址时直接使用
    pub fn detail_page_url(&self, base_url: &str) -> String {
        if self.details_url.starts_with("http://") || self.details_url.starts_with("https://") {
            return self.details_url.clone();
        }
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.details_url.trim_start_matches('/')
        )
    }
}

/// 处理成功的机构记录：原始字段 + 解析出的字段
///
/// 写入结果文件后不再修改。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub main_url: String,
    pub details_url: String,
    // info 必须声明在 extra 之前：反序列化时先取走已知字段，剩余的才进入 extra
    #[serde(flatten)]
    pub info: OrgInfo,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl ResultRecord {
    /// 合并候选记录和解析结果
    ///
    /// 原始字段保留，但与解析字段同名的原始字段一律去掉（无论是否解析出值），
    /// 否则重新读取结果文件时这些键会被当成解析字段。
    pub fn merge(candidate: PendingCandidate, info: OrgInfo) -> Self {
        let mut extra = candidate.extra;
        for key in OrgInfo::FIELD_KEYS {
            extra.remove(key);
        }
        Self {
            main_url: candidate.main_url,
            details_url: candidate.details_url,
            info,
            extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn candidate_without_details_url_is_not_eligible() {
        let candidate: Candidate =
            serde_json::from_value(json!({"main_url": "a", "region": "77"})).unwrap();
        assert!(candidate.eligible().is_none());
        assert_eq!(candidate.extra["region"], json!("77"));
    }

    #[test]
    fn detail_url_is_joined_with_base() {
        let pending = Candidate::new("m", "/agency/123/details").eligible().unwrap();
        assert_eq!(
            pending.detail_page_url("https://bus.gov.ru/"),
            "https://bus.gov.ru/agency/123/details"
        );

        let absolute = Candidate::new("m", "https://other.example/x").eligible().unwrap();
        assert_eq!(
            absolute.detail_page_url("https://bus.gov.ru"),
            "https://other.example/x"
        );
    }

    #[test]
    fn parsed_fields_override_metadata_and_keep_the_rest() {
        let mut candidate = Candidate::new("a", "x");
        candidate.extra.insert("director".into(), json!("old"));
        candidate.extra.insert("name".into(), json!("Школа №1"));

        let info = OrgInfo {
            director: Some("Иванов И.И.".into()),
            ..Default::default()
        };
        let record = ResultRecord::merge(candidate.eligible().unwrap(), info);

        assert!(!record.extra.contains_key("director"));
        assert_eq!(record.extra["name"], json!("Школа №1"));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["director"], json!("Иванов И.И."));
        assert_eq!(value["name"], json!("Школа №1"));
        assert_eq!(value["main_url"], json!("a"));
    }

    #[test]
    fn unparsed_field_names_are_dropped_from_metadata() {
        let mut candidate = Candidate::new("a", "x");
        candidate.extra.insert("INN".into(), json!(7701234567u64));
        candidate.extra.insert("staff".into(), json!("много"));
        candidate.extra.insert("region".into(), json!("77"));

        let record = ResultRecord::merge(candidate.eligible().unwrap(), OrgInfo::default());
        assert_eq!(record.extra.len(), 1);
        assert_eq!(record.info, OrgInfo::default());

        let value = serde_json::to_value(&record).unwrap();
        let reloaded: ResultRecord = serde_json::from_value(value).unwrap();
        assert_eq!(reloaded, record);
    }

    #[test]
    fn record_json_keeps_metadata_out_of_parsed_fields() {
        let value = json!({
            "main_url": "a",
            "details_url": "x",
            "INN": "7701234567",
            "subsidies": {"year": ["2020"], "subsidy": ["1234.56"]},
            "region": "77"
        });
        let record: ResultRecord = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(record.info.inn.as_deref(), Some("7701234567"));
        assert_eq!(record.extra.len(), 1);
        assert_eq!(serde_json::to_value(&record).unwrap(), value);
    }
}
