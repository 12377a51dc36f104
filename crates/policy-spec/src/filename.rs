use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Replaces each whitespace run with `-` and lowercases the result.
pub fn slugify(name: &str) -> String {
    WHITESPACE.replace_all(name, "-").to_lowercase()
}

/// `<slug>-privacy-policy.<extension>`.
pub fn export_file_name(business_name: &str, extension: &str) -> String {
    format!("{}-privacy-policy.{extension}", slugify(business_name.trim()))
}
