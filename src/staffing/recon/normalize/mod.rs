//! Address canonicalisation.
//!
//! Customer sheets and database exports spell the same store differently: a
//! redundant home-city prefix, office or floor suffixes, corpus codes. The
//! comparison key produced by [`normalize_address`] converges those spellings
//! while keeping genuinely different stores apart, so the rules are a fixed,
//! ordered list of small rewrites rather than fuzzy matching. Each stage is a
//! public function and can be exercised on its own.
//!
//! [`report_key`] is a looser variant used only to group rows in the summary
//! sheet, and [`base_address`] strips the entrance/section suffix consulted by
//! the variant merger.

mod report_key;

use std::sync::LazyLock;

use regex::Regex;

pub use report_key::report_key;

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($re).expect("static address pattern"));
    };
}

pattern!(WHITESPACE, r"\s+");
pattern!(SEMICOLONS, r"[;:]+");
pattern!(COMMA_PADDING, r"\s*,\s*");
pattern!(CITY_MARKER, r"\b(?:г|город)\b");
pattern!(
    JUNK_WORD,
    r"\b(?:пом|помещение|офис|оф|кв|квартира|подъезд|п-?зд|эт|этаж|пункт|п)\b"
);
pattern!(SLASH_PADDING, r"\s*/\s*");
pattern!(CORPUS_TOKEN, r"\b(?:корпус|корп|к)(?:\s*\d[\w/.-]*|\s+[\w/.-]+)");
pattern!(STRUCTURE_TOKEN, r"\b(?:стр|зд)(?:\s*\d[\w/.-]*|\s+[\w/.-]+)");
pattern!(HOUSE_MARKER, r"\b(?:(?:дом|д)\s*)+(\d)");
pattern!(HOUSE_TOKEN, r"\b(\d+[а-яa-z]?)(?:/\d+|-\d+)?\b");
pattern!(HOUSE_SEGMENT, r"^(\d+[а-яa-z]?)(?:/\d+|-\d+)?$");
pattern!(
    HOUSE_RUN,
    r"^\d+[а-яa-z]?(?:/\d+|-\d+)?(?: \d+[а-яa-z]?(?:/\d+|-\d+)?)*$"
);
pattern!(NUMBER_LIST, r"\b\d+(?:\s*,\s*\d+)+\b");
pattern!(
    MERGE_SUFFIX,
    r"(?:\s*/\s*\d+|\s*-\s*\d+|\s+к\s*\d+|\s+стр\s*\d+)\s*$"
);

/// Whole-word abbreviations applied to every segment, in order.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("улица", "ул"),
    ("ул", "ул"),
    ("проспект", "пр-кт"),
    ("пр-т", "пр-кт"),
    ("переулок", "пер"),
    ("шоссе", "ш"),
    ("бульвар", "бул"),
    ("площадь", "пл"),
    ("микрорайон", "мкр"),
    ("мкрн", "мкр"),
    ("мкр", "мкр"),
    ("строение", "стр"),
    ("стр", "стр"),
    ("здание", "зд"),
    ("зд", "зд"),
];

static ABBREVIATION_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    ABBREVIATIONS
        .iter()
        .map(|(word, short)| {
            let pattern = format!(r"\b{}\b", regex::escape(word));
            (
                Regex::new(&pattern).expect("abbreviation pattern"),
                *short,
            )
        })
        .collect()
});

/// Builds the comparison key for a free-text address.
///
/// Returns an empty string when nothing address-like survives. The output is
/// its own normal form: it splits back into the same city, street and house,
/// so normalizing it again returns it unchanged.
pub fn normalize_address(raw: &str, home_city: &str) -> String {
    let text = unify_separators(&fold_text(raw));
    let segments = drop_home_city(split_segments(&text), home_city);

    let segments: Vec<String> = segments
        .iter()
        .map(|segment| normalize_segment(segment))
        .filter(|segment| !segment.is_empty() && !is_junk_segment(segment))
        .collect();

    let Some((city, rest)) = segments.split_first() else {
        return String::new();
    };

    let rest: Vec<String> = rest
        .iter()
        .map(|segment| strip_building_tokens(segment))
        .filter(|segment| !segment.is_empty())
        .collect();

    let (street, house) = extract_house(&rest);
    let street = clean_street(&street);
    assemble(city, &street, house.as_deref(), home_city)
}

/// Lowercases, maps `ё` to `е`, collapses whitespace and trims.
pub fn fold_text(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase().replace('ё', "е");
    collapse_whitespace(&lowered)
}

/// Unifies dashes and separators so that segments are split on commas only.
pub fn unify_separators(text: &str) -> String {
    let text = text.replace(['—', '–'], "-");
    let text = SEMICOLONS.replace_all(&text, ",");
    let text = COMMA_PADDING.replace_all(&text, ",");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim_matches([' ', ',']).to_string()
}

/// Splits on commas into trimmed, non-empty segments.
pub fn split_segments(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Drops a leading home-city segment when the next segment looks like a city
/// name (contains no digits).
pub fn drop_home_city(mut segments: Vec<String>, home_city: &str) -> Vec<String> {
    if segments.len() >= 2
        && city_core(&segments[0]) == home_city
        && !segments[1].chars().any(char::is_numeric)
    {
        segments.remove(0);
    }
    segments
}

/// The bare city name of a segment: no periods, no `г`/`город` marker.
fn city_core(segment: &str) -> String {
    let without_periods = segment.replace('.', "");
    let without_marker = CITY_MARKER.replace_all(&without_periods, "");
    collapse_whitespace(&without_marker)
}

/// Per-segment cleanup: periods, the city marker and the abbreviation table.
pub fn normalize_segment(segment: &str) -> String {
    let without_periods = segment.replace('.', "");
    let mut text = CITY_MARKER
        .replace_all(&without_periods, "")
        .trim()
        .to_string();
    for (pattern, short) in ABBREVIATION_PATTERNS.iter() {
        text = pattern.replace_all(&text, *short).into_owned();
    }
    collapse_whitespace(&text)
}

/// Segments naming a room, office, flat, entrance, floor or pickup point.
pub fn is_junk_segment(segment: &str) -> bool {
    JUNK_WORD.is_match(segment)
}

/// Removes corpus and structure tokens and the `д`/`дом` markers in front of
/// a house number. Slashes are re-tightened after the removals.
pub fn strip_building_tokens(text: &str) -> String {
    let text = SLASH_PADDING.replace_all(text, "/");
    let text = CORPUS_TOKEN.replace_all(&text, "");
    let text = STRUCTURE_TOKEN.replace_all(&text, "");
    let text = HOUSE_MARKER.replace_all(&text, "$1");
    SLASH_PADDING
        .replace_all(&collapse_whitespace(&text), "/")
        .into_owned()
}

/// Splits the remaining segments into `(street, house)`.
///
/// The first segment made of a house token alone wins and any further
/// standalone numbers are dropped as an enumerated list (`39/3, 39/4, 40`).
/// Otherwise the first house token found in the joined text is used. The
/// `/N` and `-N` tails are dropped from the house number.
pub fn extract_house(segments: &[String]) -> (String, Option<String>) {
    let standalone = segments
        .iter()
        .find_map(|segment| HOUSE_SEGMENT.captures(segment).map(|caps| caps[1].to_string()));

    if let Some(house) = standalone {
        let street = segments
            .iter()
            .filter(|segment| !HOUSE_SEGMENT.is_match(segment))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        return (collapse_whitespace(&street), Some(house));
    }

    let rest = segments.join(" ");
    match HOUSE_TOKEN.captures(&rest) {
        Some(caps) => {
            let token = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
            let street = format!("{} {}", &rest[..token.start], &rest[token.end..]);
            (collapse_whitespace(&street), Some(caps[1].to_string()))
        }
        None => (rest, None),
    }
}

/// Final pass over the street once the house is taken out.
///
/// Joining segments can bring a marker next to a number, so the segment rules
/// run once more on the whole street. A street left with house numbers only
/// (`40` from `39, 40`) or with a junk word is dropped.
pub fn clean_street(street: &str) -> String {
    let cleaned = strip_number_lists(&strip_building_tokens(&normalize_segment(street)));
    if HOUSE_RUN.is_match(&cleaned) || is_junk_segment(&cleaned) {
        return String::new();
    }
    cleaned
}

/// Removes leftovers of enumerated house lists such as `39, 40`.
pub fn strip_number_lists(street: &str) -> String {
    let cleaned = NUMBER_LIST.replace_all(street, "");
    collapse_whitespace(&cleaned)
        .trim_matches([' ', ','])
        .to_string()
}

/// Joins the parts into `city, street, house`, skipping the empty ones.
///
/// The home-city rule is applied to the assembled parts as well: `тюмень`
/// followed by a street without digits is dropped here, the same way it
/// would be when the result is read back.
pub fn assemble(city: &str, street: &str, house: Option<&str>, home_city: &str) -> String {
    let mut parts = vec![city.to_string()];
    if !street.is_empty() {
        parts.push(street.to_string());
    }
    if let Some(house) = house {
        parts.push(house.to_string());
    }
    drop_home_city(parts, home_city).join(", ")
}

/// Strips exactly one trailing `/N`, `-N`, ` к N` or ` стр N` suffix.
pub fn base_address(normalized: &str) -> String {
    MERGE_SUFFIX
        .replace(normalized.trim(), "")
        .trim()
        .to_string()
}

/// Whether the address ends with a suffix that [`base_address`] would strip.
pub fn has_merge_suffix(normalized: &str) -> bool {
    MERGE_SUFFIX.is_match(normalized.trim())
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}
