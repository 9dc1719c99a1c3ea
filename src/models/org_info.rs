use serde::{Deserialize, Serialize};

/// 机构识别号类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// 纳税人识别号
    Inn,
    /// 登记原因代码
    Kpp,
    /// 国家注册号
    Ogrn,
}

impl IdentifierKind {
    pub const ALL: [IdentifierKind; 3] = [IdentifierKind::Inn, IdentifierKind::Kpp, IdentifierKind::Ogrn];

    /// 页面上显示的标签
    pub fn label(self) -> &'static str {
        match self {
            IdentifierKind::Inn => "ИНН",
            IdentifierKind::Kpp => "КПП",
            IdentifierKind::Ogrn => "ОГРН",
        }
    }

    /// 结果文件中的字段名
    pub fn key(self) -> &'static str {
        match self {
            IdentifierKind::Inn => "INN",
            IdentifierKind::Kpp => "KPP",
            IdentifierKind::Ogrn => "OGRN",
        }
    }

    /// 从页面标签解析
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }
}

/// 补贴表：年份 / 金额，按页面顺序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsidyTable {
    pub year: Vec<String>,
    pub subsidy: Vec<String>,
}

impl SubsidyTable {
    pub fn len(&self) -> usize {
        self.year.len()
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_empty()
    }
}

/// 人员表：年份 / 员工数 / 平均工资，按页面顺序
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffTable {
    pub year: Vec<String>,
    pub employees: Vec<String>,
    pub mean_salary: Vec<String>,
}

impl StaffTable {
    pub fn len(&self) -> usize {
        self.year.len()
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_empty()
    }
}

/// 从“其他信息”面板解析出的字段
///
/// 每个字段要么存在要么缺失，缺失时不会写入结果文件。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrgInfo {
    #[serde(rename = "INN", skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,
    #[serde(rename = "KPP", skip_serializing_if = "Option::is_none")]
    pub kpp: Option<String>,
    #[serde(rename = "OGRN", skip_serializing_if = "Option::is_none")]
    pub ogrn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subsidies: Option<SubsidyTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff: Option<StaffTable>,
}

impl OrgInfo {
    /// 结果文件中由解析结果占用的全部字段名
    pub const FIELD_KEYS: [&'static str; 7] =
        ["INN", "KPP", "OGRN", "director", "authority", "subsidies", "staff"];

    pub fn identifier(&self, kind: IdentifierKind) -> Option<&str> {
        match kind {
            IdentifierKind::Inn => self.inn.as_deref(),
            IdentifierKind::Kpp => self.kpp.as_deref(),
            IdentifierKind::Ogrn => self.ogrn.as_deref(),
        }
    }

    /// 设置识别号，已存在时保留第一次的值
    pub fn set_identifier_once(&mut self, kind: IdentifierKind, value: String) {
        let slot = match kind {
            IdentifierKind::Inn => &mut self.inn,
            IdentifierKind::Kpp => &mut self.kpp,
            IdentifierKind::Ogrn => &mut self.ogrn,
        };
        slot.get_or_insert(value);
    }

    /// 已解析出的字段名（与序列化后的键一致）
    pub fn present_keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = IdentifierKind::ALL
            .into_iter()
            .filter(|kind| self.identifier(*kind).is_some())
            .map(IdentifierKind::key)
            .collect();
        if self.director.is_some() {
            keys.push("director");
        }
        if self.authority.is_some() {
            keys.push("authority");
        }
        if self.subsidies.is_some() {
            keys.push("subsidies");
        }
        if self.staff.is_some() {
            keys.push("staff");
        }
        keys
    }
}
