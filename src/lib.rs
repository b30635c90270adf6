extern crate nom;

pub mod catalog;
pub mod config;
pub mod error;
pub mod lex;
pub mod loader;
pub mod paginate;
pub mod parser;
pub mod prompt;
pub mod router;
pub mod store;
pub mod table;

pub use catalog::{Catalog, CatalogOptions};
pub use config::Config;
pub use router::{CommandRouter, Flow};
pub use store::{SqliteStore, Store, Value};
