/// Render a currency magnitude with a suffix: `$2.50B`, `$1.20T`,
/// `$999.00`. Thresholds are inclusive (`1e9` is `"$1.00B"`), and
/// values below a million print raw with two decimals. Pure function,
/// used uniformly for market-cap display.
#[must_use]
pub fn format_magnitude(value: f64) -> String {
    if value >= 1e12 {
        format!("${:.2}T", value / 1e12)
    } else if value >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else {
        format!("${value:.2}")
    }
}
