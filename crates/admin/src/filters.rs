//! Custom Askama template filters.

use std::fmt::Display;

use chrono::{Datelike, Utc};

/// Returns the current year, for the page footer.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(Utc::now().year())
}
