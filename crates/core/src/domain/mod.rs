pub mod layout;
pub mod recommendation;
pub mod stats;
