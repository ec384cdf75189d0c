pub mod bibliography;
pub mod inbox;
pub mod notes;
pub mod papers;
