//! Display strings for the product page

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ProductView;

const NOT_AVAILABLE: &str = "N/A";
const NO_DESCRIPTION: &str = "No description available";
const NO_VERIFICATION_INFO: &str = "No verification information available";

/// Pre-formatted text for the product detail page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDisplay {
    pub description: String,
    pub mrr: String,
    pub arr: String,
    /// "March 2024"
    pub added: String,
    pub badge_label: Option<&'static str>,
    /// "High confidence"
    pub badge_confidence: Option<String>,
    pub verification_description: String,
    pub source_url: Option<String>,
}

impl ProductDisplay {
    pub fn from_view(view: &ProductView) -> Self {
        let revenue = view.revenue.as_ref();

        Self {
            description: non_empty(view.product.description.as_deref())
                .unwrap_or(NO_DESCRIPTION)
                .to_string(),
            mrr: revenue_cell(revenue.and_then(|r| r.mrr)),
            arr: revenue_cell(revenue.and_then(|r| r.arr)),
            added: month_year(&view.product.date_added),
            badge_label: view.badge.label,
            badge_confidence: view
                .badge
                .confidence_level
                .as_ref()
                .filter(|_| view.badge.is_shown())
                .map(|level| format!("{} confidence", level)),
            verification_description: non_empty(
                view.verification_tier
                    .as_ref()
                    .and_then(|t| t.description.as_deref()),
            )
            .unwrap_or(NO_VERIFICATION_INFO)
            .to_string(),
            source_url: revenue.and_then(|r| r.source_url.clone()),
        }
    }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

/// Revenue figure as whole US dollars, "N/A" when missing or zero
pub fn revenue_cell(amount: Option<f64>) -> String {
    match amount {
        Some(value) if value != 0.0 => format_usd(value),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Format as whole US dollars with thousands separators ("$12,500")
pub fn format_usd(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

pub fn month_year(date: &DateTime<Utc>) -> String {
    date.format("%B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.0), "$0");
        assert_eq!(format_usd(29.0), "$29");
        assert_eq!(format_usd(999.4), "$999");
        assert_eq!(format_usd(999.5), "$1,000");
        assert_eq!(format_usd(12500.0), "$12,500");
        assert_eq!(format_usd(1234567.0), "$1,234,567");
        assert_eq!(format_usd(-4200.0), "-$4,200");
    }

    #[test]
    fn test_revenue_cell_missing_or_zero() {
        assert_eq!(revenue_cell(None), "N/A");
        assert_eq!(revenue_cell(Some(0.0)), "N/A");
        assert_eq!(revenue_cell(Some(2000.0)), "$2,000");
    }

    #[test]
    fn test_month_year() {
        let date = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        assert_eq!(month_year(&date), "March 2024");
    }
}
