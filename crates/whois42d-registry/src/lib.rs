//! Lookup engine for a flat-file, RPSL-style network registry.
//!
//! Records live on disk as one file per object below
//! `<data>/<object-type>/<key>`. A query token is first classified into its
//! candidate representations ([`classify`]), then tested against the ordered
//! [`TypeCatalog`]. Name-shaped rules match on the upper- or lower-cased
//! token; address-shaped rules ask a [`RouteIndex`] for every stored network
//! containing the queried address. Each resulting [`Location`] is read
//! independently and missing files are skipped, so a single token can yield
//! several records (an `aut-num` and an `as-set`, or every enclosing
//! `inetnum`).
//!
//! Nothing is cached: every lookup re-reads the filesystem, which keeps the
//! engine free of shared mutable state and safe to call from any number of
//! connection workers at once.
//!
//! ```no_run
//! use whois42d_registry::{Registry, RegistryConfig};
//!
//! # fn main() -> Result<(), whois42d_registry::CatalogError> {
//! let config = RegistryConfig::new("/srv/registry/data", "dn42 whois", "dn42", "DN42");
//! let registry = Registry::new(config)?;
//! for record in registry.lookup("AS4242420000") {
//!     println!("{}", record.location());
//! }
//! # Ok(())
//! # }
//! ```

mod catalog;
mod lookup;
mod network;
mod object;
mod record;
mod route_index;

pub use catalog::{CatalogError, MatchKind, TypeCatalog, TypeFilter, TypeRule};
pub use lookup::{Query, Registry, RegistryConfig};
pub use network::{Network, NetworkParseError};
pub use object::{ClassifiedQuery, classify};
pub use record::{Location, Record};
pub use route_index::{DirectoryRouteIndex, RouteIndex, containing_networks};

const LOOKUP_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::lookup");
