mod types;

pub use types::{Catalog, CatalogSnapshot, Envelope, File, Job};
