/// Default budget categories, in display order. Charts and breakdowns keep this order.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Marriage",
    "Reception",
    "Engagement",
    "Home Setup",
    "Attire",
    "Jewellery",
    "Photography",
    "Decor",
    "Travel",
    "Other",
];

/// Resolve user input to a known category name (case-insensitive).
/// Unknown names are returned trimmed and unchanged so custom categories still work.
pub fn canonical_category(input: &str) -> String {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();
    DEFAULT_CATEGORIES
        .iter()
        .find(|c| c.to_lowercase() == lower)
        .map(|c| c.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Default categories followed by any extra categories seen in `names`, first-seen order.
pub fn categories_with_extras<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
    for name in names {
        if !out.iter().any(|c| c == name) {
            out.push(name.to_string());
        }
    }
    out
}
