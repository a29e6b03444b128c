use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use staffing_recon::model::{Cell, Sheet};
use staffing_recon::parse::{
    SheetFormat, detect_format, detect_header_row, find_header_columns, parse_date,
    parse_header_date, parse_hours, parse_matrix, parse_rowwise, parse_sheet,
};
use staffing_recon::normalize::normalize_address;
use staffing_recon::parse::rowwise::compose_key_address;
use staffing_recon::{ReconConfig, ReconError};

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).expect("decimal literal")
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn text(value: &str) -> Cell {
    Cell::text(value)
}

fn config() -> ReconConfig {
    ReconConfig::default().with_year(2024)
}

fn matrix_header(days: u32) -> Vec<Cell> {
    let mut header = vec![text("Адрес магазина")];
    header.extend((1..=days).map(|day| text(&format!("{day}.3"))));
    header
}

#[test]
fn hours_accept_numbers_text_and_times() {
    assert_eq!(parse_hours(&Cell::Number(8.0)), Some(dec("8.00")));
    assert_eq!(parse_hours(&text(" 7,5 ")), Some(dec("7.50")));
    assert_eq!(parse_hours(&text("1e1")), Some(dec("10.00")));
    let half_past_two = NaiveTime::from_hms_opt(2, 30, 0).expect("valid time");
    assert_eq!(parse_hours(&Cell::Time(half_past_two)), Some(dec("2.50")));
    let one_twenty = NaiveTime::from_hms_opt(1, 20, 0).expect("valid time");
    assert_eq!(parse_hours(&Cell::Time(one_twenty)), Some(dec("1.33")));
}

#[test]
fn hours_reject_dashes_and_garbage() {
    assert_eq!(parse_hours(&text("-")), None);
    assert_eq!(parse_hours(&text("—")), None);
    assert_eq!(parse_hours(&text("восемь")), None);
    assert_eq!(parse_hours(&text("  ")), None);
    assert_eq!(parse_hours(&Cell::Empty), None);
    assert_eq!(parse_hours(&Cell::Bool(true)), None);
    assert_eq!(parse_hours(&Cell::Number(f64::NAN)), None);
}

#[test]
fn hours_round_half_to_even() {
    assert_eq!(parse_hours(&Cell::Number(1.005)), Some(dec("1.00")));
    assert_eq!(parse_hours(&text("1.015")), Some(dec("1.02")));
}

#[test]
fn dates_parse_from_supported_formats() {
    let expected = date(2024, 1, 5);
    for value in ["05.01.2024", "2024-01-05", "05/01/2024", "05.01.24", "05.01.2024 10:30", "05.01.2024 10:30:15"] {
        assert_eq!(parse_date(&text(value)), Some(expected), "format {value:?}");
    }
    assert_eq!(parse_date(&Cell::Date(expected)), Some(expected));
    assert_eq!(parse_date(&Cell::Number(45296.0)), None);
    assert_eq!(parse_date(&text("вчера")), None);
}

#[test]
fn header_dates_accept_day_month_short_form() {
    assert_eq!(parse_header_date(&text("1.3"), 2024), Some(date(2024, 3, 1)));
    assert_eq!(parse_header_date(&text("29.2"), 2024), Some(date(2024, 2, 29)));
    assert_eq!(parse_header_date(&text("31.2"), 2024), None);
    assert_eq!(parse_header_date(&text("Адрес"), 2024), None);
    assert_eq!(parse_header_date(&text("07.03.2023"), 2024), Some(date(2023, 3, 7)));
}

#[test]
fn matrix_sheet_yields_one_row_per_non_zero_cell() {
    let sheet: Sheet = vec![
        matrix_header(12),
        vec![
            text("Ишим, ул. Ленина, 5"),
            Cell::Number(8.0),
            Cell::Empty,
            text("-"),
            Cell::Number(0.0),
            text("7,5"),
        ],
        vec![Cell::Empty, Cell::Number(5.0)],
        vec![text("офис 5"), Cell::Number(5.0)],
    ];

    let rows = parse_matrix(&sheet, &config()).expect("matrix parsed");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].key.date, date(2024, 3, 1));
    assert_eq!(rows[0].key.address, "ишим, ул ленина, 5");
    assert_eq!(rows[0].address_raw, "Ишим, ул. Ленина, 5");
    assert_eq!(rows[0].hours, dec("8.00"));
    assert_eq!(rows[1].key.date, date(2024, 3, 5));
    assert_eq!(rows[1].hours, dec("7.50"));
    assert_eq!(rows[1].source.len(), 6);
}

#[test]
fn matrix_requires_address_column_and_enough_dates() {
    let mut no_address = vec![matrix_header(12)];
    no_address[0][0] = text("Магазин");
    assert!(matches!(
        parse_matrix(&no_address, &config()),
        Err(ReconError::MissingAddressColumn)
    ));

    let few_dates = vec![matrix_header(9)];
    assert!(matches!(
        parse_matrix(&few_dates, &config()),
        Err(ReconError::NotEnoughDateColumns { found: 9, required: 10 })
    ));
}

#[test]
fn fewer_than_ten_header_dates_route_to_row_wise() {
    let config = config();
    assert_eq!(detect_format(&vec![matrix_header(10)], &config), Some(SheetFormat::Matrix));
    assert_eq!(detect_format(&vec![matrix_header(9)], &config), Some(SheetFormat::RowWise));
    assert_eq!(detect_format(&Vec::new(), &config), None);
}

fn database_sheet() -> Sheet {
    vec![
        vec![text("Выгрузка часов за март")],
        vec![],
        vec![text("Дата"), text("Город"), text("Сегмент"), text("Кол-во часов")],
        vec![text("01.03.2024"), text("Тюмень"), text("ул. Ленина, 10"), Cell::Number(8.0)],
        vec![Cell::Date(date(2024, 3, 2)), text("Ишим"), text("Ишим, ул. Мира, 3"), text("4,5")],
        vec![Cell::Empty, text("Тюмень"), text("ул. Ленина, 10"), Cell::Number(5.0)],
        vec![text("03.03.2024"), text("Тюмень"), text("ул. Ленина, 10"), Cell::Number(0.0)],
        vec![text("04.03.2024"), Cell::Empty, Cell::Empty, Cell::Number(3.0)],
    ]
}

#[test]
fn row_wise_header_is_found_below_a_title() {
    let sheet = database_sheet();
    assert_eq!(detect_header_row(&sheet, 250), 2);

    let columns = find_header_columns(&sheet[2]);
    assert_eq!(columns.date, Some(0));
    assert_eq!(columns.city, Some(1));
    assert_eq!(columns.address, Some(2));
    assert_eq!(columns.hours, Some(3));
    assert!(columns.missing().is_empty());
}

#[test]
fn row_wise_rows_combine_city_and_segment() {
    let rows = parse_rowwise(&database_sheet(), &config()).expect("row-wise parsed");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].key.date, date(2024, 3, 1));
    assert_eq!(rows[0].key.address, "ул ленина, 10");
    assert_eq!(rows[0].address_raw, "Тюмень, ул. Ленина, 10");
    assert_eq!(rows[0].hours, dec("8.00"));

    assert_eq!(rows[1].key.date, date(2024, 3, 2));
    assert_eq!(rows[1].key.address, "ишим, ул мира, 3");
    assert_eq!(rows[1].address_raw, "Ишим, ул. Мира, 3");
    assert_eq!(rows[1].hours, dec("4.50"));
}

#[test]
fn row_wise_and_matrix_keys_agree_for_the_same_store() {
    let mut matrix = vec![matrix_header(10)];
    matrix.push(vec![text("г. Тюмень, ул. Ленина, д. 10"), Cell::Number(8.0)]);
    let customer = parse_sheet(&matrix, &config()).expect("matrix parsed");
    let database = parse_sheet(&database_sheet(), &config()).expect("row-wise parsed");

    assert_eq!(customer[0].key, database[0].key);
}

#[test]
fn date_column_is_sniffed_from_content() {
    let mut sheet: Sheet = vec![vec![text("Когда"), text("Адрес"), text("Часы")]];
    for day in 1..=3 {
        sheet.push(vec![
            text(&format!("0{day}.03.2024")),
            text("Ишим, ул. Мира, 3"),
            Cell::Number(2.0),
        ]);
    }

    let rows = parse_rowwise(&sheet, &config()).expect("row-wise parsed");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2].key.date, date(2024, 3, 3));

    sheet.truncate(3);
    assert!(matches!(
        parse_rowwise(&sheet, &config()),
        Err(ReconError::MissingDateColumn)
    ));
}

#[test]
fn missing_row_wise_columns_are_named() {
    let sheet: Sheet = vec![
        vec![text("Дата"), text("Адрес"), text("Комментарий")],
        vec![text("01.03.2024"), text("Ишим, ул. Мира, 3"), text("ок")],
    ];

    let error = parse_rowwise(&sheet, &config()).expect_err("hours column is missing");
    match &error {
        ReconError::MissingColumns(missing) => assert_eq!(missing, &vec!["hours".to_string()]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(error.to_string().contains("hours"));
}

#[test]
fn empty_sheet_parses_to_no_rows() {
    let rows = parse_sheet(&Vec::new(), &config()).expect("empty sheet accepted");
    assert!(rows.is_empty());
}

#[test]
fn rowwise_key_matches_the_full_address_key() {
    let home = "тюмень";
    for (city, segment) in [("Тюмень", "ул. Ленина, 10"), ("Ишим", "ул. Мира, 3/1")] {
        assert_eq!(
            compose_key_address(city, segment, home),
            normalize_address(&format!("{city}, {segment}"), home)
        );
    }
    assert_eq!(compose_key_address("Тюмень", "ул. Ленина, 10", home), "ул ленина, 10");
}

#[test]
fn rowwise_key_does_not_repeat_the_city() {
    let home = "тюмень";
    assert_eq!(compose_key_address("Ишим", "Ишим, ул. Мира, 3", home), "ишим, ул мира, 3");
    assert_eq!(compose_key_address("Ишим", "", home), "ишим");
    assert_eq!(compose_key_address("", "Ишим, ул. Мира, 3", home), "ишим, ул мира, 3");
}
