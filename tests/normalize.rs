use staffing_recon::normalize::{
    assemble, base_address, clean_street, drop_home_city, extract_house, has_merge_suffix,
    is_junk_segment, normalize_address, normalize_segment, report_key, split_segments,
    strip_building_tokens, unify_separators,
};

const HOME: &str = "тюмень";

fn norm(raw: &str) -> String {
    normalize_address(raw, HOME)
}

#[test]
fn home_city_prefix_and_room_suffix_are_dropped() {
    assert_eq!(
        norm("г. Тюмень, Москва, ул. Ленина, д. 10, пом. 3"),
        "москва, ул ленина, 10"
    );
}

#[test]
fn home_city_spellings_converge() {
    let expected = "ул ленина, 10";
    assert_eq!(norm("Тюмень, ул Ленина 10"), expected);
    assert_eq!(norm("г. Тюмень, ул. Ленина, д. 10"), expected);
    assert_eq!(norm("ТЮМЕНЬ; улица Ленина; 10"), expected);
}

#[test]
fn other_city_after_home_city_is_kept() {
    assert_eq!(norm("Тюмень, Ишим, ул Ленина 5"), "ишим, ул ленина, 5");
    assert_eq!(norm("Ишим, ул. Ленина, 5"), "ишим, ул ленина, 5");
}

#[test]
fn house_suffixes_and_building_tokens_are_removed() {
    assert_eq!(norm("Ишим, ул. Ленина, 16а-1"), "ишим, ул ленина, 16а");
    assert_eq!(norm("Ишим, ул Ленина, 39/3"), "ишим, ул ленина, 39");
    assert_eq!(norm("Ишим, ул Ленина, 5 корп 2"), "ишим, ул ленина, 5");
    assert_eq!(norm("Ишим, ул Ленина, 5 стр. 1"), "ишим, ул ленина, 5");
    assert_eq!(norm("Ишим, проспект Мира, 7, офис 12"), "ишим, пр-кт мира, 7");
}

#[test]
fn corpus_marker_must_be_a_whole_word() {
    assert_eq!(norm("Ишим, ул Кирова, 7"), "ишим, ул кирова, 7");
    assert_eq!(norm("Ишим, ул Строителей, 2"), "ишим, ул строителей, 2");
}

#[test]
fn empty_and_junk_only_addresses_normalize_to_empty() {
    assert_eq!(norm(""), "");
    assert_eq!(norm("  , ; "), "");
    assert_eq!(norm("офис 5"), "");
}

#[test]
fn address_without_house_keeps_city_and_street() {
    assert_eq!(norm("Ишим, мкр. Солнечный"), "ишим, мкр солнечный");
    assert_eq!(norm("Ишим"), "ишим");
}

#[test]
fn normalization_is_idempotent() {
    let samples = [
        "г. Тюмень, Москва, ул. Ленина, д. 10, пом. 3",
        "Тюмень, ул Ленина 10",
        "Тюмень, ул. Ленина, 10",
        "Тюмень, Ишим, ул Ленина 5",
        "Ишим, ул. Ленина, 16а-1",
        "Ишим, ул Ленина, 5 корп 2",
        "Ишим, проспект Мира, 7, офис 12",
        "Тюмень, ул 8 Марта 5",
        "Ишим, мкр. Солнечный",
        "Тюмень, Ленина 10 к",
        "Ишим — ул. Мира: 3/1",
        "офис 5",
        "Ишим, 39, 40",
        "Ишим, 12 3",
        "1 мира ; 16а-1 39/3",
        "Ишим, ул. Ленина, 39/3, 39/4, 40",
        "Тюмень, ленина 10",
        "Тюмень, дом д 10",
        "д к2, дом:дом,16а-1;дом  12 3:",
        "г ишим — стр, ,тюмень — /,зд,зд, ,ул — ",
    ];
    for sample in samples {
        let once = norm(sample);
        assert_eq!(norm(&once), once, "not idempotent for {sample:?}");
    }
}

#[test]
fn enumerated_house_numbers_keep_the_first_one() {
    assert_eq!(norm("Ишим, 39, 40"), "ишим, 39");
    assert_eq!(norm("Ишим, 12 3"), "ишим, 12");
    assert_eq!(norm("1 мира ; 16а-1 39/3"), "1 мира, 16а");
    assert_eq!(norm("Ишим, ул. Ленина, 39/3, 39/4, 40"), "ишим, ул ленина, 39");
    assert_eq!(norm("Ишим, Садовая, 4, 6"), "ишим, садовая, 4");
}

#[test]
fn home_city_is_dropped_again_once_the_house_is_split_off() {
    assert_eq!(norm("Тюмень, ленина 10"), "ленина, 10");
    assert_eq!(norm("Тюмень, дом д 10"), "тюмень, 10");
    assert_eq!(norm("Тюмень, Тюмень, Ленина 10"), "ленина, 10");
}

#[test]
fn assembled_parts_follow_the_home_city_rule() {
    assert_eq!(assemble("ишим", "ул мира", Some("3"), HOME), "ишим, ул мира, 3");
    assert_eq!(assemble("тюмень", "ленина", Some("10"), HOME), "ленина, 10");
    assert_eq!(assemble("тюмень", "", Some("10"), HOME), "тюмень, 10");
    assert_eq!(assemble("ишим", "", None, HOME), "ишим");
}

#[test]
fn street_left_with_numbers_only_is_dropped() {
    assert_eq!(clean_street("40"), "");
    assert_eq!(clean_street("д 12 3"), "");
    assert_eq!(clean_street("офис"), "");
    assert_eq!(clean_street("ул ленина 39, 40"), "ул ленина");
    assert_eq!(clean_street("ул 8 марта"), "ул 8 марта");
}

#[test]
fn separators_are_unified_before_splitting() {
    let text = unify_separators("ишим — ул мира;  3 ,, ");
    assert_eq!(text, "ишим - ул мира,3");
    assert_eq!(split_segments(&text), vec!["ишим - ул мира", "3"]);
}

#[test]
fn home_city_is_dropped_only_before_a_digitless_segment() {
    let segments = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    assert_eq!(
        drop_home_city(segments(&["г. тюмень", "ишим", "ул мира 3"]), HOME),
        segments(&["ишим", "ул мира 3"])
    );
    assert_eq!(
        drop_home_city(segments(&["тюмень", "ул мира 3"]), HOME),
        segments(&["тюмень", "ул мира 3"])
    );
    assert_eq!(drop_home_city(segments(&["тюмень"]), HOME), segments(&["тюмень"]));
}

#[test]
fn segment_abbreviations_apply_on_word_boundaries() {
    assert_eq!(normalize_segment("улица ленина"), "ул ленина");
    assert_eq!(normalize_segment("бульвар победы"), "бул победы");
    assert_eq!(normalize_segment("мкрн. восточный"), "мкр восточный");
    assert_eq!(normalize_segment("пр-т мира"), "пр-кт мира");
    assert_eq!(normalize_segment("г. ишим"), "ишим");
    assert_eq!(normalize_segment("улицкая"), "улицкая");
}

#[test]
fn junk_segments_are_recognised() {
    assert!(is_junk_segment("пом 3"));
    assert!(is_junk_segment("2 этаж"));
    assert!(is_junk_segment("п-зд 1"));
    assert!(is_junk_segment("кв 15"));
    assert!(!is_junk_segment("ул ленина"));
    assert!(!is_junk_segment("пр-кт мира"));
}

#[test]
fn building_tokens_and_house_marker_are_stripped() {
    assert_eq!(strip_building_tokens("10 корпус 2"), "10");
    assert_eq!(strip_building_tokens("10 к2"), "10");
    assert_eq!(strip_building_tokens("д 10"), "10");
    assert_eq!(strip_building_tokens("дом 10 / 2"), "10/2");
    assert_eq!(strip_building_tokens("дом д 10"), "10");
    assert_eq!(strip_building_tokens("/ зд зд ул"), "/ул");
    assert_eq!(strip_building_tokens("ул кирова"), "ул кирова");
}

#[test]
fn house_prefers_a_standalone_segment() {
    let segments = vec!["ул 8 марта".to_string(), "5".to_string()];
    assert_eq!(extract_house(&segments), ("ул 8 марта".to_string(), Some("5".to_string())));

    let joined = vec!["ул ленина 39/3 подвал".to_string()];
    assert_eq!(
        extract_house(&joined),
        ("ул ленина подвал".to_string(), Some("39".to_string()))
    );

    let list = vec!["39".to_string(), "40".to_string()];
    assert_eq!(extract_house(&list), (String::new(), Some("39".to_string())));

    let none = vec!["ул ленина".to_string()];
    assert_eq!(extract_house(&none), ("ул ленина".to_string(), None));
}

#[test]
fn base_address_strips_exactly_one_suffix() {
    assert_eq!(base_address("ленина 10/1"), "ленина 10");
    assert_eq!(base_address("ленина 10 - 2"), "ленина 10");
    assert_eq!(base_address("ленина 10 к 2"), "ленина 10");
    assert_eq!(base_address("ленина 10 стр 3"), "ленина 10");
    assert_eq!(base_address("ленина 10/1/2"), "ленина 10/1");
    assert_eq!(base_address("ленина 10"), "ленина 10");
    assert!(has_merge_suffix("ленина 10/1"));
    assert!(!has_merge_suffix("ленина 10"));
}

#[test]
fn report_key_collapses_house_lists() {
    assert_eq!(report_key("Тюмень, ул. Ленина, 39/3, 39/4", HOME), "ул ленина, 39");
    assert_eq!(report_key("Ишим, ул. Ленина, 39/3, 39/4, 40", HOME), "ишим, ул ленина, 39, 40");
}

#[test]
fn report_key_groups_rooms_and_offices_together() {
    let with_room = report_key("г. Ишим, ул. Ленина, д. 5, пом. 3", HOME);
    let with_office = report_key("г. Ишим, ул. Ленина, д. 5, офис 7", HOME);
    let with_corpus = report_key("г. Ишим, ул. Ленина, д. 5, корп. 1", HOME);
    assert_eq!(with_room, "г ишим, ул ленина, д 5");
    assert_eq!(with_room, with_office);
    assert_eq!(with_room, with_corpus);
}

#[test]
fn report_key_of_blank_display_is_empty() {
    assert_eq!(report_key("   ", HOME), "");
}
