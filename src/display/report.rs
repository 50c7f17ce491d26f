//! Report formatting helpers for terminal output

use crate::models::{Money, MoneyFormat};

/// Width of the report layouts
pub const REPORT_WIDTH: usize = 72;

/// Format an amount, in red when negative
pub fn format_money_signed(amount: Money, fmt: &MoneyFormat, color: bool) -> String {
    let text = amount.format(fmt);
    if color && amount.is_negative() {
        format!("\x1b[31m{}\x1b[0m", text)
    } else {
        text
    }
}

/// Format a percentage with precision that shrinks as the value grows
pub fn format_percentage(pct: f64) -> String {
    if pct > 0.0 && pct < 0.1 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Horizontal bar proportional to `value / max_value`
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Title line followed by a double rule
pub fn format_title(title: &str) -> String {
    format!("{}\n{}\n", title, "═".repeat(REPORT_WIDTH))
}

pub fn separator() -> String {
    "─".repeat(REPORT_WIDTH)
}

/// Shorten to `max_len` characters with a trailing ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.05), "0.05%");
        assert_eq!(format_percentage(5.43), "5.4%");
        assert_eq!(format_percentage(55.7), "56%");
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(50.0, 100.0, 10), "█████░░░░░");
        assert_eq!(format_bar(0.0, 100.0, 4), "    ");
        assert_eq!(format_bar(500.0, 100.0, 4), "████");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("Groceries", 20), "Groceries");
        assert_eq!(truncate("Entertainment", 8), "Enter...");
        assert_eq!(truncate("Café au lait", 7), "Café...");
    }

    #[test]
    fn test_signed_money() {
        let fmt = MoneyFormat::default();
        assert_eq!(format_money_signed(Money::from_cents(-500), &fmt, false), "-$5.00");
        assert!(format_money_signed(Money::from_cents(-500), &fmt, true).starts_with("\x1b[31m"));
    }
}
