//! Reports route handler.
//!
//! The sales-per-customer chart currently shows fixed sample figures; it does
//! not read the sales table.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, routing::get};

use crate::{filters, middleware::Flash, state::AppState};

/// One bar of the sales-per-customer chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub customer_name: &'static str,
    pub total_sales: u32,
}

/// Sample figures shown on the report page.
pub const SAMPLE_REPORT: &[ReportRow] = &[
    ReportRow {
        customer_name: "João",
        total_sales: 5,
    },
    ReportRow {
        customer_name: "Maria",
        total_sales: 3,
    },
    ReportRow {
        customer_name: "Carlos",
        total_sales: 8,
    },
];

/// Reports page template.
#[derive(Template, WebTemplate)]
#[template(path = "reports/index.html")]
pub struct ReportsTemplate {
    pub current_path: &'static str,
    pub flashes: Vec<Flash>,
    pub rows: &'static [ReportRow],
    /// Largest total, used as the bar scale.
    pub max_sales: u32,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/relatorios", get(index))
}

/// Reports page handler.
pub async fn index() -> ReportsTemplate {
    ReportsTemplate {
        current_path: "/relatorios",
        flashes: Vec::new(),
        rows: SAMPLE_REPORT,
        max_sales: SAMPLE_REPORT
            .iter()
            .map(|row| row.total_sales)
            .max()
            .unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_report_uses_sample_figures() {
        let page = index().await;
        let totals: Vec<(&str, u32)> = page
            .rows
            .iter()
            .map(|r| (r.customer_name, r.total_sales))
            .collect();
        assert_eq!(totals, [("João", 5), ("Maria", 3), ("Carlos", 8)]);
        assert_eq!(page.max_sales, 8);
    }
}
