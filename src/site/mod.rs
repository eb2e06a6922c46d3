//! Access to the static novel site: resource paths, JSON types, and clients.

mod cached_client;
mod client;
pub mod resources;
pub mod types;

pub use cached_client::CachedSiteClient;
#[cfg(test)]
pub use client::SiteClient;
