use std::sync::LazyLock;

use regex::Regex;

use super::{COMMA_PADDING, WHITESPACE, collapse_whitespace, drop_home_city, fold_text, split_segments};

static JUNK_WITH_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:помещение|пом|офис|оф|квартира|кв|подъезд|п-?зд|этаж|эт|пункт|п)\b\.?\s*[\w./-]+(?:\s*,\s*[\w./-]+)*",
    )
    .expect("junk pattern")
});
static CORPUS_WITH_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:корпус|корп|к)\b\.?\s*[\w./-]+").expect("corpus pattern")
});
static STRUCTURE_WITH_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:строение|стр|здание|зд)\b\.?\s*[\w./-]+").expect("structure pattern")
});
static HOUSE_LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d+(?:/\d+)?(?:\s*,\s*\d+(?:/\d+)?)+\b").expect("house list pattern")
});
static SLASH_PADDING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*/\s*").expect("slash pattern"));
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.;:]").expect("punctuation pattern"));
static REPEATED_COMMAS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(?:\s*,)+").expect("comma pattern"));

/// Looser key used to group near-duplicate display addresses in the summary.
///
/// Unlike [`normalize_address`](super::normalize_address) it works on the raw
/// display string, removes room/office/flat markers together with their values,
/// drops corpus and structure tokens, and collapses repeated house numbers
/// (`39/3, 39/4` becomes `39`). It must never be used as a comparison key.
pub fn report_key(display: &str, home_city: &str) -> String {
    let text = fold_text(display);
    if text.is_empty() {
        return String::new();
    }

    let text = text.replace(['—', '–'], "-");
    let text = COMMA_PADDING.replace_all(&text, ",");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = text.trim_matches([' ', ',']);

    let text = drop_home_city(split_segments(text), home_city).join(", ");

    let text = JUNK_WITH_VALUE.replace_all(&text, "");
    let text = CORPUS_WITH_VALUE.replace_all(&text, "");
    let text = STRUCTURE_WITH_VALUE.replace_all(&text, "");
    let text = collapse_house_lists(&text);
    let text = SLASH_PADDING.replace_all(&text, "/");

    let text = PUNCTUATION.replace_all(&text, "");
    let text = collapse_whitespace(&text);
    let text = REPEATED_COMMAS.replace_all(&text, ",");
    let text = COMMA_PADDING.replace_all(&text, ", ");
    text.trim_matches([' ', ',']).to_string()
}

/// Replaces every run of at least two list items sharing the same leading
/// number with that number: `39/3, 39/4, 40` becomes `39, 40`.
fn collapse_house_lists(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for list in HOUSE_LIST.find_iter(text) {
        out.push_str(&text[cursor..list.start()]);
        out.push_str(&collapse_list(list.as_str()));
        cursor = list.end();
    }
    out.push_str(&text[cursor..]);
    out
}

fn collapse_list(list: &str) -> String {
    let items: Vec<&str> = list.split(',').map(str::trim).collect();
    let base = |item: &str| item.split('/').next().unwrap_or(item).to_string();

    let mut parts: Vec<String> = Vec::new();
    let mut idx = 0;
    while idx < items.len() {
        let head = base(items[idx]);
        let mut end = idx + 1;
        while end < items.len() && base(items[end]) == head {
            end += 1;
        }
        if end - idx >= 2 {
            parts.push(head);
        } else {
            parts.push(items[idx].to_string());
        }
        idx = end;
    }

    if parts.len() == items.len() {
        return list.to_string();
    }
    parts.join(", ")
}
