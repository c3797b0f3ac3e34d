// sitewatch-api: Async Rust client for the sitewatch monitoring backend

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::SiteClient;
pub use error::Error;
pub use models::{CreateSiteRequest, CreatedSite, RecentCheck, Site, Stats};
pub use transport::TransportConfig;
