use std::path::Path;

use dochub_core::Publication;

/// reStructuredText notes scaffold for a paper.
pub fn render_notes(publication: &Publication, local_pdf: &Path) -> String {
    let mut doc = String::new();

    doc.push_str(".. meta::\n");
    doc.push_str(&format!("    :keywords: {}\n", publication.keywords.join(", ")));
    doc.push('\n');

    doc.push_str(&heading(&publication.title, '#', true));
    doc.push_str(&heading(&short_authors(&publication.authors), '~', true));
    doc.push('\n');

    let (label, ref_id, link) = source_link(publication);
    doc.push_str(&format!(":{label}: |refID|_\n"));
    doc.push_str(":local_pdf: paper_\n\n");

    doc.push_str(&format!(".. rubric:: {}\n\n", publication.identifier));

    doc.push_str(".. admonition:: Abstract\n\n");
    doc.push_str(&format!("    {}\n\n", publication.abstract_or_unavailable()));

    doc.push_str(&heading("Summary", '=', false));
    doc.push_str("\n\n");
    doc.push_str(&heading("Method", '-', false));
    doc.push_str("\n\n");
    doc.push_str(&heading("Notes", '-', false));
    doc.push_str("\n\n");
    doc.push_str(&heading("See Also", '^', false));
    doc.push_str("\n\n");
    doc.push_str(&heading("References", '-', false));
    doc.push('\n');

    doc.push_str(".. Substitutions\n\n");
    doc.push_str(&format!(".. |refID| replace:: {ref_id}\n"));
    doc.push_str(&format!(".. _refID: {link}\n"));
    doc.push_str(&format!(".. _paper: {}\n", local_pdf.display()));
    doc
}

fn heading(text: &str, underline: char, overline: bool) -> String {
    let line = underline.to_string().repeat(text.chars().count().max(1));
    if overline {
        format!("{line}\n{text}\n{line}\n")
    } else {
        format!("{text}\n{line}\n")
    }
}

/// First three authors as `A. Vaswani, N. Shazeer, N. Parmar`.
fn short_authors(authors: &[String]) -> String {
    authors
        .iter()
        .take(3)
        .map(|author| {
            let parts = author.split_whitespace().collect::<Vec<_>>();
            match parts.as_slice() {
                [] => String::new(),
                [only] => only.to_string(),
                [first, .., last] => {
                    let initial = first.chars().next().unwrap_or_default();
                    format!("{initial}. {last}")
                }
            }
        })
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn source_link(publication: &Publication) -> (&'static str, String, String) {
    if let Some(arxiv) = &publication.arxiv_id {
        let link = format!("https://arxiv.org/abs/{arxiv}");
        return ("arXiv_link", format!("arXiv:{arxiv}"), link);
    }
    let ref_id = publication.doi.clone().unwrap_or_default();
    let link = publication
        .url
        .clone()
        .unwrap_or_else(|| format!("https://doi.org/{ref_id}"));
    ("doi_link", ref_id, link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dochub_core::MetadataSource;

    fn publication() -> Publication {
        Publication {
            identifier: "vaswani2017".to_string(),
            filename: "vaswani2017--Attention_Is_All_You_Need".to_string(),
            year: "2017".to_string(),
            month: Some("06".to_string()),
            title: "Attention Is All You Need".to_string(),
            authors: vec![
                "Ashish Vaswani".to_string(),
                "Noam Shazeer".to_string(),
                "Niki Parmar".to_string(),
                "Jakob Uszkoreit".to_string(),
            ],
            arxiv_id: Some("1706.03762".to_string()),
            doi: None,
            url: Some("https://arxiv.org/abs/1706.03762".to_string()),
            url_pdf: Some("https://arxiv.org/pdf/1706.03762".to_string()),
            keywords: vec!["Transformer".to_string()],
            abstract_text: None,
            citation_count: None,
            source: MetadataSource::Arxiv,
        }
    }

    #[test]
    fn renders_title_block_and_substitutions() {
        let pdf = Path::new("/lit/vaswani2017--Attention_Is_All_You_Need.pdf");
        let notes = render_notes(&publication(), pdf);

        assert!(notes.starts_with(".. meta::\n    :keywords: Transformer\n\n"));
        assert!(notes.contains(
            "#########################\nAttention Is All You Need\n#########################\n"
        ));
        assert!(notes.contains("\nA. Vaswani, N. Shazeer, N. Parmar\n"));
        assert!(!notes.contains("Uszkoreit"));
        assert!(notes.contains(":arXiv_link: |refID|_\n:local_pdf: paper_\n"));
        assert!(notes.contains("    (Unavailable)\n"));
        assert!(notes.contains("Summary\n=======\n"));
        assert!(notes.contains(".. |refID| replace:: arXiv:1706.03762\n"));
        assert!(notes.contains(".. _refID: https://arxiv.org/abs/1706.03762\n"));
        assert!(notes.ends_with(
            ".. _paper: /lit/vaswani2017--Attention_Is_All_You_Need.pdf\n"
        ));
    }

    #[test]
    fn doi_only_papers_link_to_their_landing_page() {
        let mut publication = publication();
        publication.arxiv_id = None;
        publication.doi = Some("10.1038/nature16961".to_string());
        publication.url = None;

        let notes = render_notes(&publication, Path::new("x.pdf"));
        assert!(notes.contains(":doi_link: |refID|_\n"));
        assert!(notes.contains(".. _refID: https://doi.org/10.1038/nature16961\n"));
    }

    #[test]
    fn short_authors_handles_single_names() {
        let authors = vec!["Plato".to_string(), "Kurt Gödel".to_string()];
        assert_eq!(short_authors(&authors), "Plato, K. Gödel");
    }
}
