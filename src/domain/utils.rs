//! Small helpers shared by the account and profile entities

/// Labels used by [`bool_label`]
pub const STATUS_LABELS: (&str, &str) = ("active", "inactive");

/// Human-readable label for a boolean, defaulting to `"active"` / `"inactive"`
///
/// ```
/// use sbxt_accounts::domain::utils::bool_label;
///
/// assert_eq!(bool_label(true), "active");
/// assert_eq!(bool_label(false), "inactive");
/// ```
pub fn bool_label(value: bool) -> &'static str {
    bool_label_with(value, STATUS_LABELS)
}

/// Human-readable label for a boolean using `(true_label, false_label)`
///
/// ```
/// use sbxt_accounts::domain::utils::bool_label_with;
///
/// assert_eq!(bool_label_with(false, ("yes", "no")), "no");
/// ```
pub fn bool_label_with<'a>(value: bool, labels: (&'a str, &'a str)) -> &'a str {
    let (yes, no) = labels;

    if value { yes } else { no }
}

/// Lowercase a username, trim it and join its words with underscores
///
/// ```
/// use sbxt_accounts::domain::utils::normalize_username;
///
/// assert_eq!(normalize_username("That awesome guy"), "that_awesome_guy");
/// ```
pub fn normalize_username(username: &str) -> String {
    username
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Capitalize the first character and leave the rest as it was
///
/// ```
/// use sbxt_accounts::domain::utils::format_name;
///
/// assert_eq!(format_name("mcDaniel"), "McDaniel");
/// ```
pub fn format_name(name: &str) -> String {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Relative media path for a profile image uploaded by `username`
pub fn user_profile_media(username: &str, filename: &str) -> String {
    format!("users/profile/{}/{}", username, filename)
}
