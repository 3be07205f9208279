//! Resolution of classified queries into record bytes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::LOOKUP_TARGET;
use crate::catalog::{CatalogError, TypeCatalog, TypeFilter};
use crate::object::{ClassifiedQuery, classify};
use crate::record::{Location, Record};
use crate::route_index::DirectoryRouteIndex;

/// Immutable registry settings shared by every worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    data_path: PathBuf,
    header: String,
    dns_top_level: String,
    registry_top_level: String,
}

impl RegistryConfig {
    /// Builds the settings from the data directory and naming suffixes.
    #[must_use]
    pub fn new(
        data_path: impl Into<PathBuf>,
        header: impl Into<String>,
        dns_top_level: impl Into<String>,
        registry_top_level: impl Into<String>,
    ) -> Self {
        Self {
            data_path: data_path.into(),
            header: header.into(),
            dns_top_level: dns_top_level.into(),
            registry_top_level: registry_top_level.into(),
        }
    }

    /// Directory holding one sub-directory per object type.
    #[must_use]
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Announcement line for protocol responses.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// DNS suffix recognised by the `dns` rule.
    #[must_use]
    pub fn dns_top_level(&self) -> &str {
        &self.dns_top_level
    }

    /// Registry suffix recognised by the `person` rule.
    #[must_use]
    pub fn registry_top_level(&self) -> &str {
        &self.registry_top_level
    }
}

/// A parsed request: the classified terms plus the type restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    terms: Vec<ClassifiedQuery>,
    filter: TypeFilter,
}

impl Query {
    /// Classifies every token and pairs the terms with `filter`.
    #[must_use]
    pub fn new<'a>(tokens: impl IntoIterator<Item = &'a str>, filter: TypeFilter) -> Self {
        Self {
            terms: tokens.into_iter().map(classify).collect(),
            filter,
        }
    }

    /// Classified terms in request order.
    #[must_use]
    pub fn terms(&self) -> &[ClassifiedQuery] {
        &self.terms
    }

    /// Type restriction applied to every term.
    #[must_use]
    pub const fn filter(&self) -> &TypeFilter {
        &self.filter
    }
}

/// Lookup engine over one registry checkout.
///
/// Holds no mutable state; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Registry {
    config: RegistryConfig,
    catalog: TypeCatalog,
    routes: DirectoryRouteIndex,
}

impl Registry {
    /// Builds the catalog for `config`.
    pub fn new(config: RegistryConfig) -> Result<Self, CatalogError> {
        let catalog = TypeCatalog::new(config.dns_top_level(), config.registry_top_level())?;
        let routes = DirectoryRouteIndex::new(config.data_path());
        Ok(Self {
            config,
            catalog,
            routes,
        })
    }

    /// Settings the registry was built with.
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Object-type catalog in search order.
    #[must_use]
    pub const fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Every location answering `term`, in catalog order.
    #[must_use]
    pub fn locate(&self, term: &ClassifiedQuery, filter: &TypeFilter) -> Vec<Location> {
        self.catalog.locate(term, &self.routes, filter)
    }

    /// Reads the record at `location`.
    ///
    /// A missing file is an ordinary miss. Any other I/O failure is logged and
    /// also treated as absence.
    #[must_use]
    pub fn read(&self, location: &Location) -> Option<Record> {
        let path = location.path_in(self.config.data_path());
        match fs::read(&path) {
            Ok(body) => Some(Record::new(location.clone(), body)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(target: LOOKUP_TARGET, %location, "no record at location");
                None
            }
            Err(error) => {
                warn!(
                    target: LOOKUP_TARGET,
                    path = %path.display(),
                    error = %error,
                    "cannot read record"
                );
                None
            }
        }
    }

    /// Records answering a single classified term.
    #[must_use]
    pub fn resolve_term(&self, term: &ClassifiedQuery, filter: &TypeFilter) -> Vec<Record> {
        self.locate(term, filter)
            .iter()
            .filter_map(|location| self.read(location))
            .collect()
    }

    /// Records answering every term of `query`, term by term.
    #[must_use]
    pub fn resolve(&self, query: &Query) -> Vec<Record> {
        query
            .terms()
            .iter()
            .flat_map(|term| self.resolve_term(term, query.filter()))
            .collect()
    }

    /// Classifies and resolves one token without a type restriction.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Vec<Record> {
        self.resolve_term(&classify(token), &TypeFilter::any())
    }
}
