pub mod config;
pub mod logging;

pub mod classify;
pub mod column_query;
pub mod copier;
pub mod error;
pub mod external_roots;
pub mod grant;
pub mod location;
pub mod manifest;
pub mod provider;
pub mod reference;
pub mod resolver;
pub mod strategy;

pub use classify::{CapabilityTier, ProviderCategory};
pub use error::{ErrorKind, ProviderError, ResolveError};
pub use location::ResolvedLocation;
pub use reference::DocumentReference;
pub use resolver::{Resolver, ResolverSettings};
