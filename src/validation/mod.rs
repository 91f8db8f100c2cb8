mod body;
mod matcher;

pub use body::{RequestBody, ResponseBody};
pub use matcher::SchemaMatcher;
