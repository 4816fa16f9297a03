//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Local::now().year())
}

/// Result counter for list pages.
///
/// Usage in templates: `{{ total|results }}` renders `1 resultado` or `3 resultados`.
#[askama::filter_fn]
pub fn results(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let count = count.to_string();
    Ok(if count == "1" {
        "1 resultado".to_string()
    } else {
        format!("{count} resultados")
    })
}
