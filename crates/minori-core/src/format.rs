//! Display formatting helpers for anime metadata values.
//!
//! User-facing strings are Russian, matching the catalog's UI.

/// Shared placeholder for absent values.
pub const PLACEHOLDER: &str = "—";

/// Release year from a start-date string: first four characters, or the
/// placeholder.
pub fn year(start_date: Option<&str>) -> String {
    start_date
        .and_then(|d| d.get(..4))
        .map(str::to_string)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Score fixed to one decimal. Absent or zero scores show the placeholder.
pub fn score(score: Option<f64>) -> String {
    match score {
        Some(s) if s > 0.0 => format!("{s:.1}"),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Popularity rank as `#N`; absent or zero shows the placeholder.
pub fn popularity(rank: Option<u32>) -> String {
    match rank {
        Some(r) if r > 0 => format!("#{r}"),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Episode count, `?` when unknown.
pub fn episodes(count: Option<u32>) -> String {
    match count {
        Some(c) if c > 0 => c.to_string(),
        _ => "?".to_string(),
    }
}

/// Pagination label.
pub fn page_label(page: u32) -> String {
    format!("Страница {page}")
}

/// Approximate match-count line for the filter panel.
pub fn found_count(total: u64) -> String {
    if total > 0 {
        format!(
            "Найдено ≈ {} тайтлов по выбранным фильтрам",
            group_thousands(total)
        )
    } else {
        "По таким фильтрам ничего не найдено".to_string()
    }
}

/// Thousands grouping with non-breaking spaces, Russian locale style.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('\u{00A0}');
        }
        out.push(c);
    }
    out
}
