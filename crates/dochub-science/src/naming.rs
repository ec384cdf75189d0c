//! Citation key and filename derivation.
//!
//! `identifier` is the transliterated, lowercased surname of the first author
//! followed by the year (`vaswani2017`). `filename` joins it to a slug of the
//! title with `--` (`vaswani2017--Attention_Is_All_You_Need`).

use dochub_core::Publication;
use deunicode::deunicode;

use crate::sources::{SourceFailure, SourceRecord};

pub const FILENAME_SEPARATOR: &str = "--";
pub const MAX_SLUG_LEN: usize = 95;

/// Turn a complete source record into the canonical publication.
///
/// Fails, naming the absent fields, when authors, year or title are missing.
pub fn derive(record: SourceRecord) -> Result<Publication, SourceFailure> {
    let missing = record.missing_fields();
    if !missing.is_empty() {
        return Err(SourceFailure::missing_fields(record.source, &missing));
    }

    let year = record.year.unwrap_or_default();
    let title = record.title.unwrap_or_default();
    let identifier = cite_key(&record.authors[0], &year);
    let filename = filename(&identifier, &title);

    Ok(Publication {
        identifier,
        filename,
        year,
        month: record.month,
        title,
        authors: record.authors,
        arxiv_id: record.arxiv_id,
        doi: record.doi,
        url: record.url,
        url_pdf: record.url_pdf,
        keywords: record.keywords,
        abstract_text: record.abstract_text,
        citation_count: record.citation_count,
        source: record.source,
    })
}

/// `lastname + year`, e.g. `("Ashish Vaswani", "2017")` → `vaswani2017`.
pub fn cite_key(first_author: &str, year: &str) -> String {
    let surname = surname(first_author);
    format!("{}{}", fold_ascii(surname).to_lowercase(), year.trim())
}

pub fn filename(identifier: &str, title: &str) -> String {
    format!("{identifier}{FILENAME_SEPARATOR}{}", slugify_title(title))
}

/// Case-preserving slug of the transliterated title: runs of anything but
/// ASCII letters and digits become a single `_`.
pub fn slugify_title(title: &str) -> String {
    let ascii = deunicode(title);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_sep = false;
    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }

    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        let trimmed = slug.trim_end_matches('_').len();
        slug.truncate(trimmed);
    }
    slug
}

fn surname(author: &str) -> &str {
    let author = author.trim();
    // "Last, First"
    if let Some((last, _)) = author.split_once(',') {
        return last.trim();
    }
    author.split_whitespace().last().unwrap_or(author)
}

/// Transliterate to ASCII (`Gödel` → `Godel`, `Ветров` → `Vetrov`), keeping
/// only letters and digits.
fn fold_ascii(s: &str) -> String {
    deunicode(s).chars().filter(char::is_ascii_alphanumeric).collect()
}
