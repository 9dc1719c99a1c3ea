use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use super::text::{normalize, own_string};
use crate::models::IdentifierKind;

static DIV: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div").expect("valid selector"));

/// `<标签> <值>`，标签取自 [`IdentifierKind::label`]
static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let labels: Vec<&str> = IdentifierKind::ALL.iter().map(|kind| kind.label()).collect();
    Regex::new(&format!(r"^({})\s+(\w+)$", labels.join("|"))).expect("valid identifier pattern")
});

/// 解析 ИНН / КПП / ОГРН
///
/// 每个标签只取第一次出现的值。
pub fn parse_identifiers(doc: &Html) -> HashMap<IdentifierKind, String> {
    let mut found = HashMap::new();
    for div in doc.select(&DIV) {
        let Some(text) = own_string(div) else {
            continue;
        };
        let text = normalize(&text);
        let Some(caps) = IDENTIFIER_RE.captures(&text) else {
            continue;
        };
        if let Some(kind) = IdentifierKind::from_label(&caps[1]) {
            found.entry(kind).or_insert_with(|| caps[2].to_string());
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_all_three_identifiers() {
        let doc = Html::parse_fragment(
            r#"<div class="info">
                 <div>ИНН 2310012345</div>
                 <div>КПП 231001001</div>
                 <div><span>ОГРН 1022301234567</span></div>
               </div>"#,
        );
        let ids = parse_identifiers(&doc);
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[&IdentifierKind::Inn], "2310012345");
        assert_eq!(ids[&IdentifierKind::Kpp], "231001001");
        assert_eq!(ids[&IdentifierKind::Ogrn], "1022301234567");
    }

    #[test]
    fn whitespace_variants_are_normalized() {
        // 不换行空格和首尾空白
        let doc = Html::parse_fragment("<div>  ИНН\u{a0}123456789 </div>");
        let ids = parse_identifiers(&doc);
        assert_eq!(ids.get(&IdentifierKind::Inn).map(String::as_str), Some("123456789"));
    }

    #[test]
    fn first_occurrence_wins() {
        let doc = Html::parse_fragment("<div>ИНН 111</div><div>ИНН 222</div>");
        assert_eq!(parse_identifiers(&doc)[&IdentifierKind::Inn], "111");
    }

    #[test]
    fn ignores_unknown_labels_and_mixed_content() {
        let doc = Html::parse_fragment(
            "<div>ОКПО 12345</div><div>ИНН <b>999</b></div><div>ИНН: 777</div>",
        );
        assert!(parse_identifiers(&doc).is_empty());
    }
}
