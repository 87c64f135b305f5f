use crate::profile::builder::ProfileBuilder;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Holds the three sources as `Arc<dyn ...>`; tests swap in stubs.
    pub builder: ProfileBuilder,
}
