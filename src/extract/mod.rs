//! 信息面板解析
//!
//! 纯函数：输入面板 HTML 片段，输出带类型的字段。
//! 找不到的字段直接缺省，不会填默认值。

pub mod identifiers;
pub mod info;
pub mod labelled;
pub mod tables;
pub mod text;

pub use identifiers::parse_identifiers;
pub use info::{parse_info, parse_info_document, INFO_MARKER};
pub use labelled::{parse_authority, parse_director, AUTHORITY_LABEL, DIRECTOR_LABEL};
pub use tables::{parse_staff, parse_subsidies};
pub use text::{clean_cell, normalize};
