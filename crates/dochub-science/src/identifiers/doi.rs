use crate::error::{Result, ScienceError};
use serde::{Deserialize, Serialize};

const PREFIXES: &[&str] = &[
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi:",
    "DOI:",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doi {
    pub raw: String,
    /// Prefix-stripped DOI, case preserved.
    pub id: String,
    pub url: String,
}

impl Doi {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let stripped = strip_prefix(input);

        // Must start with "10.", contain "/", and have a non-empty suffix
        if !stripped.starts_with("10.") {
            return Err(ScienceError::InvalidDoi(input.to_string()));
        }
        let slash_pos = stripped
            .find('/')
            .ok_or_else(|| ScienceError::InvalidDoi(input.to_string()))?;
        if stripped[slash_pos + 1..].is_empty() {
            return Err(ScienceError::InvalidDoi(input.to_string()));
        }

        Ok(Self::unchecked(input, stripped))
    }

    /// Parse, or keep the trimmed input as-is when it is not DOI-shaped.
    /// A wrong guess surfaces later as an HTTP error from the API.
    pub fn lenient(input: &str) -> Self {
        Self::parse(input).unwrap_or_else(|_| {
            let input = input.trim();
            Self::unchecked(input, strip_prefix(input))
        })
    }

    fn unchecked(raw: &str, id: &str) -> Self {
        Self {
            raw: raw.to_string(),
            id: id.to_string(),
            url: format!("https://doi.org/{id}"),
        }
    }
}

fn strip_prefix(input: &str) -> &str {
    PREFIXES
        .iter()
        .find_map(|prefix| input.strip_prefix(*prefix))
        .map(str::trim_start)
        .unwrap_or(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_doi() {
        let doi = Doi::parse("10.1038/nature16961").unwrap();
        assert_eq!(doi.id, "10.1038/nature16961");
        assert_eq!(doi.url, "https://doi.org/10.1038/nature16961");
    }

    #[test]
    fn doi_with_https_prefix() {
        let doi = Doi::parse("https://doi.org/10.1000/xyz123").unwrap();
        assert_eq!(doi.id, "10.1000/xyz123");
        assert_eq!(doi.raw, "https://doi.org/10.1000/xyz123");
    }

    #[test]
    fn doi_with_space_after_colon() {
        let doi = Doi::parse("DOI: 10.1000/xyz123").unwrap();
        assert_eq!(doi.id, "10.1000/xyz123");
    }

    #[test]
    fn case_is_preserved() {
        let doi = Doi::parse("10.1016/J.ADVENGSOFT.2016.01.008").unwrap();
        assert_eq!(doi.id, "10.1016/J.ADVENGSOFT.2016.01.008");
    }

    #[test]
    fn reject_malformed() {
        assert!(Doi::parse("not-a-doi").is_err());
        assert!(Doi::parse("10.1000").is_err());
        assert!(Doi::parse("").is_err());
    }

    #[test]
    fn lenient_keeps_unrecognized_input() {
        let doi = Doi::lenient("  hep-th/9901001 ");
        assert_eq!(doi.id, "hep-th/9901001");
        assert_eq!(doi.url, "https://doi.org/hep-th/9901001");
    }
}
