pub mod document;
pub mod record;
pub mod schema;

pub use document::*;
pub use record::*;
pub use schema::*;
