use std::sync::LazyLock;

use regex::Regex;

static NUMERIC_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\d.]+").unwrap());

const SQM_PER_HECTARE: f64 = 10_000.0;
const SQM_PER_ACRE: f64 = 4_046.86;

/// Convert a free-text land size ("2.5 ha", "500 sqm", "10 acres") to square
/// meters. Only the first numeric token counts; ranges are not combined.
/// Unrecognized units are taken as square meters already.
pub fn parse_land_size(raw: &str) -> Option<f64> {
    let text = raw.to_lowercase().replace(',', "");

    let token = NUMERIC_TOKEN.find(&text)?;
    let value: f64 = token.as_str().parse().ok()?;

    if text.contains("hectare") || text.contains("ha") {
        Some(value * SQM_PER_HECTARE)
    } else if text.contains("acre") {
        Some(value * SQM_PER_ACRE)
    } else if text.contains("m²") || text.contains("sqm") || text.contains("m2") {
        Some(value)
    } else {
        Some(value)
    }
}
