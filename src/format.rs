//! Display formatting for amounts shown on the two screens
//!
//! Currency totals use Indian digit grouping (12,34,56,789) with at most
//! three fraction digits; USD subtotals and percentages use two decimals.

/// Format an amount with Indian digit grouping
pub fn format_inr(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-∞".to_string() } else { "∞".to_string() };
    }

    let rendered = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let grouped = group_indian(int_part);
    let negative = value < 0.0 && (grouped != "0" || !frac_part.is_empty());

    let mut out = String::with_capacity(grouped.len() + frac_part.len() + 2);
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Format with exactly two decimals
pub fn format_fixed2(value: f64) -> String {
    format!("{:.2}", value)
}

/// Format a percentage with two decimals and a trailing %
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Insert separators: last three digits, then groups of two
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    let mut out = groups.join(",");
    out.push(',');
    out.push_str(tail);
    out
}
