pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{Result, WaspError};
pub use schema::{SpecDocument, SpecVersion};
pub use validation::{RequestBody, ResponseBody};
