use rust_decimal::Decimal;

use crate::staffing::recon::model::{DiffResult, ParsedRow, RowKey};

/// Renders the chronological plain-text summary of a reconciliation.
///
/// Each category lists at most `limit` keys as `dd.mm.yyyy | address`.
pub fn render_text_summary(
    customer: &[ParsedRow],
    database: &[ParsedRow],
    diff: &DiffResult,
    limit: usize,
) -> String {
    let customer_keys = diff.only_customer.len() + diff.differing.len() + diff.matched.len();
    let database_keys = diff.only_database.len() + diff.differing.len() + diff.matched.len();

    let mut lines = vec![
        "РЕЗУЛЬТАТ СВЕРКИ".to_string(),
        String::new(),
        format!(
            "Строк (после очистки): заказчик={}, база={}",
            customer.len(),
            database.len()
        ),
        format!("Уникальных ключей (дата+адрес): заказчик={customer_keys}, база={database_keys}"),
        String::new(),
        format!("Есть у заказчика, нет в базе: {}", diff.only_customer.len()),
        format!("Есть в базе, нет у заказчика: {}", diff.only_database.len()),
        format!(
            "Несовпадение часов при одинаковом ключе: {}",
            diff.differing.len()
        ),
    ];

    push_totals(&mut lines, "ТОЛЬКО У ЗАКАЗЧИКА", &diff.only_customer, limit);
    push_totals(&mut lines, "ТОЛЬКО В БАЗЕ", &diff.only_database, limit);

    if !diff.differing.is_empty() {
        lines.push(String::new());
        lines.push(format!("РАЗНЫЕ ЧАСЫ (первые {limit}):"));
        lines.extend(diff.differing.iter().take(limit).map(|mismatch| {
            format!(
                "  - {} | заказчик={} | база={}",
                mismatch.key, mismatch.customer, mismatch.database
            )
        }));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn push_totals(
    lines: &mut Vec<String>,
    title: &str,
    totals: &[(RowKey, Decimal)],
    limit: usize,
) {
    if totals.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(format!("{title} (первые {limit}):"));
    lines.extend(
        totals
            .iter()
            .take(limit)
            .map(|(key, hours)| format!("  - {key} | часы={hours}")),
    );
}
