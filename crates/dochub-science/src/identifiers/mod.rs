//! Reference classification: arXiv ID or DOI.

pub mod arxiv;
pub mod doi;

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use arxiv::ArxivId;
use doi::Doi;

/// Characters that make up arXiv URL scaffolding (`https://www.arxiv.org/pdf/`, `.pdf`).
const SCRUB_CHARS: &str = "htps:/warxiv.orgbdf";

static VERSION_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"v\d").unwrap());

/// A classified reference, ready to be resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    Arxiv(ArxivId),
    Doi(Doi),
}

impl Reference {
    pub fn classify(raw: &str) -> Self {
        let scrubbed = scrub_arxiv_id(raw);
        if is_arxiv_id(&scrubbed) {
            Reference::Arxiv(ArxivId::from_bare(raw.trim(), &scrubbed))
        } else {
            Reference::Doi(Doi::lenient(raw))
        }
    }

    /// The normalized identifier: bare arXiv ID or prefix-stripped DOI.
    pub fn id(&self) -> &str {
        match self {
            Reference::Arxiv(arxiv) => &arxiv.id,
            Reference::Doi(doi) => &doi.id,
        }
    }

    pub fn is_arxiv(&self) -> bool {
        matches!(self, Reference::Arxiv(_))
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Reduce an arXiv ID, versioned ID or abs/pdf URL to the bare unversioned ID.
///
/// Strips URL scaffolding characters from both ends, then cuts at the first
/// `v<digits>` version marker. Non-arXiv input passes through mostly intact.
pub fn scrub_arxiv_id(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = strip_prefix_ignore_case(trimmed, "arxiv:").unwrap_or(trimmed);
    let scrubbed = trimmed.trim_matches(|c| SCRUB_CHARS.contains(c));
    match VERSION_MARKER.find(scrubbed) {
        Some(m) => scrubbed[..m.start()].to_string(),
        None => scrubbed.to_string(),
    }
}

/// arXiv IDs carry a four-character YYMM segment before the first dot.
pub fn is_arxiv_id(scrubbed: &str) -> bool {
    scrubbed
        .split('.')
        .next()
        .is_some_and(|head| head.chars().count() == 4)
        && scrubbed.contains('.')
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    input
        .get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &input[prefix.len()..])
}
