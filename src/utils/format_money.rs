/// Format a monthly amount the way the dashboard shows prices.
pub fn format_money(amount: f64) -> String {
    format!("${:.2}", amount)
}

#[cfg(test)]
mod tests {
    use super::format_money;

    #[test]
    fn rounds_to_cents() {
        assert_eq!(format_money(1400.0), "$1400.00");
        assert_eq!(format_money(12.5), "$12.50");
    }
}
