use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::arxiv::types::ArxivEntry;
use crate::error::{Result, ScienceError};
use crate::identifiers::arxiv::ArxivId;
use crate::sources::normalize_author_name;

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    id: String,
    title: String,
    summary: String,
    published: String,
    updated: String,
    #[serde(rename = "author", default)]
    authors: Vec<AtomAuthor>,
    #[serde(rename = "arxiv:doi", alias = "doi")]
    doi: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomAuthor {
    name: String,
}

pub fn parse_atom_response(xml: &str) -> Result<Vec<ArxivEntry>> {
    let feed: AtomFeed =
        from_str(xml).map_err(|e| ScienceError::Parse(format!("invalid atom xml: {e}")))?;

    feed.entries.into_iter().map(parse_entry).collect()
}

fn parse_entry(entry: AtomEntry) -> Result<ArxivEntry> {
    let arxiv_id = ArxivId::parse(entry.id.trim())
        .map_err(|_| ScienceError::Parse(format!("invalid arXiv id in entry: {}", entry.id)))?;

    let authors = entry
        .authors
        .iter()
        .map(|author| normalize_author_name(&author.name))
        .filter(|name| !name.is_empty())
        .collect();

    Ok(ArxivEntry {
        arxiv_id,
        doi: entry.doi.map(|d| clean_text(&d)).filter(|d| !d.is_empty()),
        title: clean_text(&entry.title),
        authors,
        abstract_text: clean_text(&entry.summary),
        published: parse_rfc3339(&entry.published, "published")?,
        updated: parse_rfc3339(&entry.updated, "updated")?,
    })
}

fn parse_rfc3339(value: &str, field_name: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ScienceError::Parse(format!("invalid {field_name} datetime: {e}")))
}

fn clean_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const ATTENTION_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom"
      xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/"
      xmlns:arxiv="http://arxiv.org/schemas/atom">
  <id>http://arxiv.org/api/query?id_list=1706.03762</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <updated>2023-08-02T17:54:37Z</updated>
    <published>2017-06-12T17:57:40Z</published>
    <title>
      Attention Is All
      You Need
    </title>
    <summary>
      The dominant sequence transduction models are based on recurrent or convolutional neural networks.
    </summary>
    <author>
      <name>Ashish Vaswani</name>
      <arxiv:affiliation>Google Brain</arxiv:affiliation>
    </author>
    <author>
      <name>Noam Shazeer</name>
    </author>
    <arxiv:doi>10.48550/arXiv.1706.03762</arxiv:doi>
    <link rel="alternate" type="text/html" href="http://arxiv.org/abs/1706.03762v7" />
    <link title="pdf" rel="related" type="application/pdf" href="http://arxiv.org/pdf/1706.03762v7" />
    <arxiv:primary_category term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.CL" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
</feed>
"#;

    #[test]
    fn parses_attention_fixture() {
        let entries = parse_atom_response(ATTENTION_XML).unwrap();
        assert_eq!(entries.len(), 1);

        let item = &entries[0];
        assert_eq!(item.arxiv_id.id, "1706.03762");
        assert_eq!(item.arxiv_id.version, Some(7));
        assert_eq!(item.title, "Attention Is All You Need");
        assert!(
            item.abstract_text
                .starts_with("The dominant sequence transduction models")
        );
        assert_eq!(item.authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert_eq!(item.doi.as_deref(), Some("10.48550/arXiv.1706.03762"));
        assert_eq!(item.year(), "2017");
        assert_eq!(item.month(), "06");
        assert_eq!(item.updated.to_rfc3339(), "2023-08-02T17:54:37+00:00");
    }

    #[test]
    fn record_uses_unversioned_urls() {
        let entry = parse_atom_response(ATTENTION_XML).unwrap().remove(0);
        let record = entry.into_record();
        assert_eq!(record.arxiv_id.as_deref(), Some("1706.03762"));
        assert_eq!(record.url.as_deref(), Some("https://arxiv.org/abs/1706.03762"));
        assert_eq!(record.url_pdf.as_deref(), Some("https://arxiv.org/pdf/1706.03762"));
        assert!(record.keywords.is_empty());
        assert!(record.missing_fields().is_empty());
    }

    #[test]
    fn empty_feed_has_no_entries() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>ArXiv Query</title></feed>"#;
        assert!(parse_atom_response(xml).unwrap().is_empty());
    }

    #[test]
    fn error_entry_is_rejected() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/api/errors#incorrect_id_format_for_1706.0376x</id>
    <title>Error</title>
    <summary>incorrect id format for 1706.0376x</summary>
    <updated>2024-01-01T00:00:00-05:00</updated>
    <published>2024-01-01T00:00:00-05:00</published>
    <author><name>arXiv api core</name></author>
  </entry>
</feed>"#;
        assert!(matches!(
            parse_atom_response(xml),
            Err(ScienceError::Parse(_))
        ));
    }
}
