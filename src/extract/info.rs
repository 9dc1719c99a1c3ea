use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::identifiers::parse_identifiers;
use super::labelled::{parse_authority, parse_director};
use super::tables::{parse_staff, parse_subsidies};
use crate::error::ExtractError;
use crate::models::OrgInfo;

/// “其他信息”标签页的根组件
pub const INFO_MARKER: &str = "app-other-information-tab";

static MARKER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(INFO_MARKER).expect("valid selector"));

/// 解析面板 HTML 片段
pub fn parse_info(fragment: &str) -> Result<OrgInfo, ExtractError> {
    parse_info_document(&Html::parse_fragment(fragment))
}

/// 解析“其他信息”面板
///
/// 片段中没有标记组件说明打开的不是这个面板，返回错误。
pub fn parse_info_document(doc: &Html) -> Result<OrgInfo, ExtractError> {
    if doc.select(&MARKER).next().is_none() {
        return Err(ExtractError::MarkerMissing {
            marker: INFO_MARKER.to_string(),
        });
    }

    let mut info = OrgInfo::default();
    for (kind, value) in parse_identifiers(doc) {
        info.set_identifier_once(kind, value);
    }
    info.director = parse_director(doc);
    info.authority = parse_authority(doc);
    info.subsidies = parse_subsidies(doc);
    info.staff = parse_staff(doc);
    Ok(info)
}
