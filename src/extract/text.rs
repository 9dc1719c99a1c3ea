//! 文本规范化工具

use scraper::{ElementRef, Node};
use unicode_normalization::UnicodeNormalization;

/// NFC 规范化，不换行空格换成普通空格，并去掉首尾空白
///
/// 页面上同一个词可能以组合或分解两种形式出现，比较和保存之前都要先规范化。
/// 只做标准等价变换，`№`、全角数字等字符原样保留。
pub fn normalize(s: &str) -> String {
    s.nfc()
        .map(|c| if is_fixed_space(c) { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_fixed_space(c: char) -> bool {
    matches!(c, '\u{a0}' | '\u{2007}' | '\u{202f}')
}

/// 表格单元格清洗
///
/// 规范化后，如果看起来是数字，去掉内部空白并把小数逗号换成小数点：
/// `"1 234,56"` → `"1234.56"`
pub fn clean_cell(s: &str) -> String {
    let text = normalize(s);
    if !looks_numeric(&text) {
        return text;
    }
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

fn looks_numeric(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
        && s
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, ',' | '.' | '-' | '+'))
}

/// 元素“自己的”文字
///
/// 元素只有一个子节点时沿着这个子节点往下找文字；
/// 有多个子节点或没有子节点时返回 `None`。
pub fn own_string(element: ElementRef<'_>) -> Option<String> {
    let mut children = element.children();
    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }
    if let Some(text) = only.value().as_text() {
        let text: &str = text;
        return Some(text.to_owned());
    }
    ElementRef::wrap(only).and_then(own_string)
}

/// 第 `index` 个内容节点的文字（跳过只含空白的文字节点和注释）
pub fn content_string(parent: ElementRef<'_>, index: usize) -> Option<String> {
    let node = parent
        .children()
        .filter(|child| match child.value() {
            Node::Text(text) => {
                let text: &str = text;
                !text.trim().is_empty()
            }
            Node::Comment(_) => false,
            _ => true,
        })
        .nth(index)?;

    if let Some(text) = node.value().as_text() {
        let text: &str = text;
        return Some(text.to_owned());
    }
    ElementRef::wrap(node).and_then(own_string)
}
