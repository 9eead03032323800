pub fn format_with_commas(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    if n < 0 {
        result.insert(0, '-');
    }
    result
}

/// Counts (followers, posts) grouped by thousands
pub fn format_count(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    format_with_commas(value.round() as i64)
}

/// Reward amounts in USD
pub fn format_reward_value(value: f64) -> String {
    if !value.is_finite() || value < 0.0 {
        return "$0.00".to_string();
    }
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1000.0 {
        format!("${:.1}K", value / 1000.0)
    } else {
        format!("${:.2}", value)
    }
}

pub fn format_percentage(percentage: f64) -> String {
    if !percentage.is_finite() {
        return "-".to_string();
    }
    format!("{:.1}%", percentage)
}
