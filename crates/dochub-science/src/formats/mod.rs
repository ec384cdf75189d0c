pub mod bibtex;
pub mod notes;

use std::path::Path;

use dochub_core::Publication;

pub trait Citable {
    fn to_bibtex(&self) -> String;
    fn to_notes(&self, local_pdf: &Path) -> String;
}

impl Citable for Publication {
    fn to_bibtex(&self) -> String {
        bibtex::generate_bibtex(self)
    }

    fn to_notes(&self, local_pdf: &Path) -> String {
        notes::render_notes(self, local_pdf)
    }
}
