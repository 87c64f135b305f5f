pub mod config;
pub mod errors;
pub mod models;
pub mod profile;
pub mod routes;
pub mod sources;
pub mod state;

pub use config::Config;
pub use models::area::AreaCode;
pub use profile::builder::ProfileBuilder;
pub use profile::report::{generate_tax_breaks, render_text, TaxBreakReport};
