use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::text::{content_string, normalize, own_string};

static DIV: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div").expect("valid selector"));

/// 负责人一栏的标签
pub const DIRECTOR_LABEL: &str = "Директор";
/// 上级主管机构一栏的标签
pub const AUTHORITY_LABEL: &str = "Вышестоящая организация";

/// 负责人姓名
pub fn parse_director(doc: &Html) -> Option<String> {
    parse_labelled_value(doc, DIRECTOR_LABEL)
}

/// 上级主管机构名称
pub fn parse_authority(doc: &Html) -> Option<String> {
    parse_labelled_value(doc, AUTHORITY_LABEL)
}

/// 查找文字等于 `label` 的叶子 div，取它所在行的第二个内容节点作为值
///
/// 页面结构为 `<div><div>标签</div><div>值</div></div>`。
/// 只匹配叶子 div，外层包装 div 的文字虽然相同，但它的父节点不是这一行。
pub fn parse_labelled_value(doc: &Html, label: &str) -> Option<String> {
    doc.select(&DIV)
        .filter(|div| is_leaf(*div))
        .filter(|div| own_string(*div).is_some_and(|text| normalize(&text) == label))
        .find_map(|div| {
            let row = div.parent().and_then(ElementRef::wrap)?;
            let value = normalize(&content_string(row, 1)?);
            (!value.is_empty()).then_some(value)
        })
}

fn is_leaf(element: ElementRef<'_>) -> bool {
    element.children().all(|child| !child.value().is_element())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANEL: &str = r#"
        <div class="row">
            <div class="label">Директор</div>
            <div class="value">  Сидорова   Анна Викторовна </div>
        </div>
        <div class="row">
            <div class="label">Вышестоящая организация</div>
            <div class="value"><a href="/agency/1">Департамент образования</a></div>
        </div>"#;

    #[test]
    fn director_is_the_sibling_value() {
        let doc = Html::parse_fragment(PANEL);
        assert_eq!(
            parse_director(&doc).as_deref(),
            Some("Сидорова   Анна Викторовна")
        );
    }

    #[test]
    fn authority_value_may_be_nested() {
        let doc = Html::parse_fragment(PANEL);
        assert_eq!(
            parse_authority(&doc).as_deref(),
            Some("Департамент образования")
        );
    }

    #[test]
    fn wrapper_div_does_not_shadow_the_row() {
        let doc = Html::parse_fragment(
            r#"<section><div><div class="row"><div>Директор</div><div>Орлов О.О.</div></div></div><div>Другое</div></section>"#,
        );
        assert_eq!(parse_director(&doc).as_deref(), Some("Орлов О.О."));
    }

    #[test]
    fn missing_label_or_value_is_omitted() {
        let doc = Html::parse_fragment(r#"<div><div>Директор</div></div><div>Бухгалтер</div>"#);
        assert_eq!(parse_director(&doc), None);
        assert_eq!(parse_authority(&doc), None);
    }
}
