//! Display formatting for prices and changes

/// Direction of a 24h change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    /// Tone of a percent change; absent or zero is neutral
    pub fn of(change: Option<f64>) -> Self {
        match change {
            Some(c) if c > 0.0 => Tone::Positive,
            Some(c) if c < 0.0 => Tone::Negative,
            _ => Tone::Neutral,
        }
    }
}

/// Symbol shown before a price quoted in `vs`
pub fn currency_prefix(vs: &str) -> String {
    match vs.to_lowercase().as_str() {
        "usd" => "$".to_string(),
        "gbp" => "£".to_string(),
        "eur" => "€".to_string(),
        "jpy" => "¥".to_string(),
        other => format!("{} ", other.to_uppercase()),
    }
}

/// Group a number for display.
///
/// At most 2 fraction digits from 1 upward and 6 below, trailing zeros
/// dropped, thousands separated by `,`. Absent and non-finite values
/// render as `-`.
pub fn format_number(value: Option<f64>) -> String {
    let value = match value {
        Some(v) if v.is_finite() => v,
        _ => return "-".to_string(),
    };

    let digits = if value >= 1.0 { 2 } else { 6 };
    let fixed = format!("{:.*}", digits, value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');

    let (sign, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", trimmed),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let grouped = group_thousands(int_part);
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None if grouped == "0" => grouped,
        None => format!("{}{}", sign, grouped),
    }
}

/// Price with its currency prefix; `-` when absent
pub fn format_price(price: Option<f64>, vs: &str) -> String {
    match price {
        Some(p) if p.is_finite() => format!("{}{}", currency_prefix(vs), format_number(Some(p))),
        _ => "-".to_string(),
    }
}

/// 24h change as `"-1.20% / 24h"`; absent counts as zero
pub fn format_change(change: Option<f64>) -> String {
    let change = change.filter(|c| c.is_finite()).unwrap_or(0.0);
    let fixed = format!("{:.2}", change);
    let fixed = if fixed == "-0.00" { "0.00".to_string() } else { fixed };

    format!("{}% / 24h", fixed)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
