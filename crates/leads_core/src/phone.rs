//! Phone number cleanup applied by the lead sources.

/// Country prefix stripped from long ads-sheet numbers unless configured otherwise.
pub const DEFAULT_COUNTRY_PREFIX: &str = "55";

/// Digits in a national number (area code + subscriber).
const NATIONAL_NUMBER_MAX_DIGITS: usize = 11;

/// Normalize an ads-sheet phone value.
///
/// Every non-digit is removed. If the remaining digits start with
/// `country_prefix` and are longer than a national number, the prefix is
/// dropped.
pub fn normalize_ads_phone(raw: &str, country_prefix: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if !country_prefix.is_empty()
        && digits.starts_with(country_prefix)
        && digits.len() > NATIONAL_NUMBER_MAX_DIGITS
    {
        return digits[country_prefix.len()..].to_string();
    }
    digits
}

/// Normalize a phone captured from an email body: keep digits and `+`.
pub fn clean_contact_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}
