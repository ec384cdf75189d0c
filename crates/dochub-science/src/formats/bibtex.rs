use dochub_core::Publication;

/// Render a publication as a BibTeX `@article` entry keyed by its identifier.
///
/// Optional fields are omitted when absent; `abstract` always appears, with
/// `(Unavailable)` standing in for a missing one.
pub fn generate_bibtex(publication: &Publication) -> String {
    let mut bib = format!("@article{{{},\n", publication.identifier);

    push_field(&mut bib, "year", &publication.year);
    if let Some(month) = &publication.month {
        push_field(&mut bib, "month", month);
    }
    push_field(&mut bib, "author", &escape_bibtex(&publication.authors.join(" and ")));
    push_field(&mut bib, "title", &escape_bibtex(&publication.title));

    // Identifiers and links are emitted verbatim
    if let Some(doi) = &publication.doi {
        push_field(&mut bib, "doi", doi);
    }
    if let Some(arxiv) = &publication.arxiv_id {
        push_field(&mut bib, "eprint", arxiv);
        bib.push_str("  archivePrefix = {arXiv},\n");
    }
    if let Some(url) = &publication.url {
        push_field(&mut bib, "url", url);
    }
    if let Some(url_pdf) = &publication.url_pdf {
        push_field(&mut bib, "urlpdf", url_pdf);
    }

    if !publication.keywords.is_empty() {
        push_field(&mut bib, "keywords", &escape_bibtex(&publication.keywords.join(", ")));
    }
    push_field(
        &mut bib,
        "abstract",
        &escape_bibtex(publication.abstract_or_unavailable()),
    );

    bib.push_str("}\n");
    bib
}

fn push_field(bib: &mut String, name: &str, value: &str) {
    bib.push_str(&format!("  {name} = {{{value}}},\n"));
}

fn escape_bibtex(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' | '_' | '$' | '%' | '#' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '\\' => out.push_str("\\textbackslash{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dochub_core::MetadataSource;

    fn attention() -> Publication {
        Publication {
            identifier: "vaswani2017".to_string(),
            filename: "vaswani2017--Attention_Is_All_You_Need".to_string(),
            year: "2017".to_string(),
            month: Some("06".to_string()),
            title: "Attention Is All You Need".to_string(),
            authors: vec!["Ashish Vaswani".to_string(), "Noam Shazeer".to_string()],
            arxiv_id: Some("1706.03762".to_string()),
            doi: None,
            url: Some("https://arxiv.org/abs/1706.03762".to_string()),
            url_pdf: Some("https://arxiv.org/pdf/1706.03762".to_string()),
            keywords: vec!["Transformer".to_string(), "Attention".to_string()],
            abstract_text: Some("The dominant sequence transduction models.".to_string()),
            citation_count: None,
            source: MetadataSource::Arxiv,
        }
    }

    #[test]
    fn test_generate_bibtex() {
        let bib = generate_bibtex(&attention());
        assert_eq!(
            bib,
            "@article{vaswani2017,\n\
             \x20 year = {2017},\n\
             \x20 month = {06},\n\
             \x20 author = {Ashish Vaswani and Noam Shazeer},\n\
             \x20 title = {Attention Is All You Need},\n\
             \x20 eprint = {1706.03762},\n\
             \x20 archivePrefix = {arXiv},\n\
             \x20 url = {https://arxiv.org/abs/1706.03762},\n\
             \x20 urlpdf = {https://arxiv.org/pdf/1706.03762},\n\
             \x20 keywords = {Transformer, Attention},\n\
             \x20 abstract = {The dominant sequence transduction models.},\n\
             }\n"
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let mut publication = attention();
        publication.month = None;
        publication.keywords.clear();
        publication.abstract_text = None;
        publication.url_pdf = None;
        publication.doi = Some("10.1000/a_b".to_string());

        let bib = generate_bibtex(&publication);
        assert!(!bib.contains("month"));
        assert!(!bib.contains("keywords"));
        assert!(!bib.contains("urlpdf"));
        assert!(bib.contains("  doi = {10.1000/a_b},\n"));
        assert!(bib.contains("  abstract = {(Unavailable)},\n"));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_bibtex("Q&A: 100% {fun}"), "Q\\&A: 100\\% \\{fun\\}");
        assert_eq!(escape_bibtex("snake_case #1 $5"), "snake\\_case \\#1 \\$5");
        assert_eq!(escape_bibtex("a\\b"), "a\\textbackslash{}b");
        assert_eq!(
            escape_bibtex("Approx ~ x^2"),
            "Approx \\textasciitilde{} x\\textasciicircum{}2"
        );
    }
}
