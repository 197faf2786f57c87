//! Live-site access for hoplint
//!
//! This crate contains:
//! - The [`Prober`] trait and its reqwest-backed implementation
//! - Declaration fetching (the site's published redirect list)

pub mod declaration;
pub mod http;
pub mod probe;

pub use declaration::{
    DEFAULT_DECLARATION_PATH, DeclarationClient, DeclarationDoc, RuleSource,
};
pub use http::{HttpProber, HttpProberOptions};
pub use probe::{ProbeError, ProbeResponse, Prober};
