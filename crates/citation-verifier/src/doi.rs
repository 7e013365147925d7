//! DOI normalization and shape checks.

/// URL and scheme prefixes that users commonly paste in front of a DOI.
const DOI_PREFIXES: &[&str] = &[
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi.org/",
    "dx.doi.org/",
    "doi:",
];

/// Strip surrounding whitespace and a single resolver/scheme prefix.
pub fn normalize_doi(raw: &str) -> String {
    let trimmed = raw.trim();
    for prefix in DOI_PREFIXES {
        if trimmed.len() >= prefix.len()
            && trimmed.is_char_boundary(prefix.len())
            && trimmed[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            return trimmed[prefix.len()..].trim().to_string();
        }
    }
    trimmed.to_string()
}

/// A DOI is `10.<registrant>/<suffix>` with non-empty registrant and suffix.
pub fn is_well_formed(doi: &str) -> bool {
    let Some(rest) = doi.strip_prefix("10.") else {
        return false;
    };
    match rest.split_once('/') {
        Some((registrant, suffix)) => {
            !registrant.is_empty()
                && !suffix.is_empty()
                && !doi.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
