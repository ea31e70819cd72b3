//! Number and date formatting for chart axes and tooltips.

use chrono::Datelike;

use trendscope_common::parse_label;

/// How values on a chart are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueFormat {
    /// Plain grouped number ("12,345").
    #[default]
    Plain,
    /// US dollars ("$950,000").
    Currency,
    /// Dollar amounts in billions on the axis ("$394B"), full cents in tooltips.
    Billions,
}

/// Insert thousands separators into a string of ASCII digits.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// en-US grouped number with up to `max_fraction` digits, trailing zeros trimmed.
fn format_grouped(value: f64, max_fraction: usize, prefix: &str) -> String {
    let rounded = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let is_zero = int_part.chars().all(|c| c == '0') && frac.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if frac.is_empty() {
        format!("{sign}{prefix}{}", group_digits(int_part))
    } else {
        format!("{sign}{prefix}{}.{frac}", group_digits(int_part))
    }
}

/// Format a number like `Intl.NumberFormat('en-US')`: grouped, up to 3 decimals.
pub fn format_number(value: f64) -> String {
    format_grouped(value, 3, "")
}

/// Format a dollar amount with no forced decimals ("$1,234.5").
pub fn format_currency(value: f64) -> String {
    format_grouped(value, 2, "$")
}

/// Format a dollar amount with exactly two decimals ("$1,234.50").
pub fn format_currency_cents(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let sign = if value < 0.0 && rounded != "0.00" { "-" } else { "" };
    format!("{sign}${}.{frac_part}", group_digits(int_part))
}

/// Format a dollar amount in whole billions ("$394B").
pub fn format_billions(value: f64) -> String {
    format!("${:.0}B", value / 1_000_000_000.0)
}

/// Y-axis tick label.
pub fn format_tick(value: f64, format: ValueFormat) -> String {
    match format {
        ValueFormat::Plain => format_number(value),
        ValueFormat::Currency => format!("${}", format_number(value)),
        ValueFormat::Billions => format_billions(value),
    }
}

/// Value shown in a tooltip line.
pub fn format_tooltip_value(value: f64, format: ValueFormat) -> String {
    match format {
        ValueFormat::Plain => format_number(value),
        ValueFormat::Currency => format_currency(value),
        ValueFormat::Billions => format_currency_cents(value),
    }
}

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHS_LONG: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// X-axis label: "Jan 2024" on January, the short month otherwise.
///
/// Labels that are not dates are shown as-is.
pub fn month_tick_label(label: &str) -> String {
    match parse_label(label) {
        Some(date) => {
            let month = MONTHS_SHORT[date.month0() as usize];
            if date.month() == 1 {
                format!("{} {}", month, date.year())
            } else {
                month.to_string()
            }
        }
        None => label.to_string(),
    }
}

/// Tooltip heading: "January 2024".
pub fn tooltip_title(label: &str) -> String {
    match parse_label(label) {
        Some(date) => format!("{} {}", MONTHS_LONG[date.month0() as usize], date.year()),
        None => label.to_string(),
    }
}
