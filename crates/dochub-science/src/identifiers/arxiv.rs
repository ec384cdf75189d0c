use crate::error::{Result, ScienceError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// YYMM.NNNN or YYMM.NNNNN, optional version
static NEW_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}\.\d{4,5})(v(\d+))?$").unwrap());

const ABS_URL: &str = "https://arxiv.org/abs/";
const PDF_URL: &str = "https://arxiv.org/pdf/";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArxivId {
    pub raw: String,
    pub id: String,
    pub version: Option<u8>,
    pub abs_url: String,
    pub pdf_url: String,
}

impl ArxivId {
    /// Strict parse of a modern arXiv identifier, with or without URL or
    /// `arXiv:` prefix.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        let stripped = [
            "https://arxiv.org/abs/",
            "http://arxiv.org/abs/",
            "https://arxiv.org/pdf/",
            "http://arxiv.org/pdf/",
            "arXiv:",
            "arxiv:",
        ]
        .iter()
        .find_map(|prefix| input.strip_prefix(*prefix))
        .unwrap_or(input)
        .trim_end_matches(".pdf");

        let caps = NEW_FORMAT
            .captures(stripped)
            .ok_or_else(|| ScienceError::InvalidArxivId(input.to_string()))?;

        let mut parsed = Self::from_bare(input, &caps[1]);
        parsed.version = caps.get(3).and_then(|v| v.as_str().parse::<u8>().ok());
        Ok(parsed)
    }

    /// Build from an already-normalized bare ID without validating its shape.
    pub fn from_bare(raw: &str, id: &str) -> Self {
        Self {
            raw: raw.to_string(),
            abs_url: format!("{ABS_URL}{id}"),
            pdf_url: format!("{PDF_URL}{id}"),
            id: id.to_string(),
            version: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_format_bare() {
        let id = ArxivId::parse("2301.04567").unwrap();
        assert_eq!(id.id, "2301.04567");
        assert_eq!(id.version, None);
        assert_eq!(id.abs_url, "https://arxiv.org/abs/2301.04567");
        assert_eq!(id.pdf_url, "https://arxiv.org/pdf/2301.04567");
    }

    #[test]
    fn entry_url_with_version() {
        let id = ArxivId::parse("http://arxiv.org/abs/1706.03762v7").unwrap();
        assert_eq!(id.id, "1706.03762");
        assert_eq!(id.version, Some(7));
    }

    #[test]
    fn capital_prefix() {
        let id = ArxivId::parse("arXiv:2301.04567v5").unwrap();
        assert_eq!(id.id, "2301.04567");
        assert_eq!(id.version, Some(5));
    }

    #[test]
    fn pdf_url_with_suffix() {
        let id = ArxivId::parse("https://arxiv.org/pdf/1802.07740v2.pdf").unwrap();
        assert_eq!(id.id, "1802.07740");
    }

    #[test]
    fn rejects_error_entry_ids() {
        assert!(ArxivId::parse("http://arxiv.org/api/errors#incorrect_id_format").is_err());
        assert!(ArxivId::parse("123.456").is_err());
    }

    #[test]
    fn from_bare_keeps_id_unchecked() {
        let id = ArxivId::from_bare("https://arxiv.org/abs/1234.x", "1234.x");
        assert_eq!(id.id, "1234.x");
        assert_eq!(id.pdf_url, "https://arxiv.org/pdf/1234.x");
    }
}
