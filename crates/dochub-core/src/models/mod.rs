pub mod publication;

pub use publication::{MetadataSource, Publication, UNAVAILABLE};
