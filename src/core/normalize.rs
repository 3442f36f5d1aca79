//! Field heuristics for the Notion export. Each is a pure function over text.

use crate::domain::model::PricingType;

const CURRENCY_SYMBOLS: [char; 4] = ['$', '₹', '€', '£'];

const INDIA_KEYWORDS: [&str; 9] = [
    "india",
    "delhi",
    "bangalore",
    "mumbai",
    "hyderabad",
    "pune",
    "chennai",
    "₹",
    "inr",
];

/// Map free-form pricing text onto the `pricing_type` enum.
///
/// Checks run in priority order, so "Free demo" is `Free` while
/// "Paid, book a demo" is `ContactSales`. Anything unrecognised, including a
/// missing value, is `Freemium`.
pub fn classify_pricing(text: Option<&str>) -> PricingType {
    let v = text.unwrap_or_default().to_lowercase();

    if v.contains("free") && !v.contains("paid") {
        return PricingType::Free;
    }
    if v.contains("contact") || v.contains("demo") {
        return PricingType::ContactSales;
    }
    if v.contains("paid") || v.contains(&CURRENCY_SYMBOLS[..]) {
        return PricingType::Paid;
    }
    PricingType::Freemium
}

/// Substring match of the India keyword list over all given fields.
pub fn detect_india<'a, I>(fields: I) -> bool
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let blob = fields
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    INDIA_KEYWORDS.iter().any(|k| blob.contains(k))
}

/// The name part of a slug, before the row index is appended.
pub fn slug_base(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace([' ', '.', '/'], "-")
        .replace("ai", "-ai")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// `slug_base(name)` suffixed with `-<index>`; unique as long as indices are.
pub fn make_slug(name: &str, index: usize) -> String {
    format!("{}-{}", slug_base(name), index)
}
