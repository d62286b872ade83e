/// Parses a locale-formatted price cell into an integer amount
///
/// Every non-digit character is discarded, so thousands separators and
/// currency prefixes disappear ("Rp 12.950" becomes 12950). Cells without
/// any digit, or with more digits than fit in an `i64`, yield `None`.
pub fn parse_price(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return None;
    }

    digits.parse().ok()
}
