pub mod definition;
pub mod document;
pub(crate) mod node;
pub mod path;

pub use definition::DefinitionResolver;
pub use document::{SpecDocument, SpecVersion};
pub use path::PathResolver;
