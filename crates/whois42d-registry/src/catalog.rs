//! Ordered object-type rules.
//!
//! The catalog order is significant twice over: it is the order rules are
//! tried in and the order their locations are returned in. Every matching
//! rule contributes, so `AS4242420000` yields both an `aut-num` and an
//! `as-set` location, `aut-num` first.

use std::collections::BTreeSet;
use std::net::IpAddr;

use regex::Regex;
use thiserror::Error;

use crate::object::ClassifiedQuery;
use crate::record::Location;
use crate::route_index::RouteIndex;

/// Which candidate of a [`ClassifiedQuery`] a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// Pattern match on the upper-cased name.
    Upper,
    /// Pattern match on the lower-cased name.
    Lower,
    /// Containment lookup for IPv4 addresses.
    RouteV4,
    /// Containment lookup for IPv6 addresses.
    RouteV6,
}

impl MatchKind {
    /// Returns `true` for the address-shaped kinds.
    #[must_use]
    pub const fn is_route(self) -> bool {
        matches!(self, Self::RouteV4 | Self::RouteV6)
    }
}

/// One registered object type.
#[derive(Debug, Clone)]
pub struct TypeRule {
    name: String,
    pattern: Option<Regex>,
    kind: MatchKind,
}

impl TypeRule {
    /// Builds a name rule matched by `pattern`.
    pub fn pattern(name: &str, kind: MatchKind, pattern: &str) -> Result<Self, CatalogError> {
        let regex = Regex::new(pattern).map_err(|source| CatalogError::Pattern {
            name: name.to_owned(),
            source,
        })?;
        Ok(Self {
            name: name.to_owned(),
            pattern: Some(regex),
            kind,
        })
    }

    /// Builds a route rule resolved through a [`RouteIndex`].
    #[must_use]
    pub fn route(name: &str, kind: MatchKind) -> Self {
        Self {
            name: name.to_owned(),
            pattern: None,
            kind,
        }
    }

    /// Object type name, also the data sub-directory.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Candidate kind inspected by the rule.
    #[must_use]
    pub const fn kind(&self) -> MatchKind {
        self.kind
    }

    fn locate(&self, query: &ClassifiedQuery, routes: &dyn RouteIndex) -> Vec<Location> {
        match self.kind {
            MatchKind::RouteV4 => query.ipv4().map_or_else(Vec::new, |address| {
                routes.find_containing(&self.name, IpAddr::V4(address))
            }),
            MatchKind::RouteV6 => query.ipv6().map_or_else(Vec::new, |address| {
                routes.find_containing(&self.name, IpAddr::V6(address))
            }),
            MatchKind::Upper => self.match_name(query.upper()),
            MatchKind::Lower => self.match_name(query.lower()),
        }
    }

    fn match_name(&self, candidate: &str) -> Vec<Location> {
        match &self.pattern {
            Some(pattern) if pattern.is_match(candidate) => {
                vec![Location::new(self.name.as_str(), candidate)]
            }
            _ => Vec::new(),
        }
    }
}

/// Restricts a lookup to a set of object types; empty means unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeFilter {
    names: BTreeSet<String>,
}

impl TypeFilter {
    /// Filter admitting every object type.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Returns `true` when `name` passes the filter.
    #[must_use]
    pub fn allows(&self, name: &str) -> bool {
        self.names.is_empty() || self.names.contains(name)
    }

    /// Returns `true` when no restriction applies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for TypeFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered set of object-type rules for one registry.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    rules: Vec<TypeRule>,
}

impl TypeCatalog {
    /// Builds the standard catalog for the given DNS and registry suffixes.
    ///
    /// The suffixes are escaped before being interpolated, so configuration
    /// cannot inject regular-expression syntax.
    pub fn new(dns_top_level: &str, registry_top_level: &str) -> Result<Self, CatalogError> {
        let dns = format!(".{}$", regex::escape(dns_top_level));
        let person = format!("-{}$", regex::escape(registry_top_level));
        let rules = vec![
            TypeRule::pattern("aut-num", MatchKind::Upper, "^AS[0-9]+$")?,
            TypeRule::pattern("dns", MatchKind::Lower, &dns)?,
            TypeRule::pattern("person", MatchKind::Upper, &person)?,
            TypeRule::pattern("mntner", MatchKind::Upper, "-MNT$")?,
            TypeRule::pattern("schema", MatchKind::Upper, "-SCHEMA$")?,
            TypeRule::pattern("organisation", MatchKind::Upper, "ORG-")?,
            TypeRule::pattern("tinc-keyset", MatchKind::Upper, "^SET-.+-TINC$")?,
            TypeRule::pattern("tinc-key", MatchKind::Upper, "-TINC$")?,
            TypeRule::pattern("as-set", MatchKind::Upper, "^AS")?,
            TypeRule::pattern("route-set", MatchKind::Upper, "^RS-")?,
            TypeRule::route("inetnum", MatchKind::RouteV4),
            TypeRule::route("inet6num", MatchKind::RouteV6),
            TypeRule::route("route", MatchKind::RouteV4),
            TypeRule::route("route6", MatchKind::RouteV6),
            TypeRule::pattern("as-block", MatchKind::Upper, "[0-9]+_[0-9]+")?,
        ];
        Ok(Self { rules })
    }

    /// Builds a catalog from explicit rules, keeping their order.
    #[must_use]
    pub const fn from_rules(rules: Vec<TypeRule>) -> Self {
        Self { rules }
    }

    /// Rules in search order.
    #[must_use]
    pub fn rules(&self) -> &[TypeRule] {
        &self.rules
    }

    /// Object type names in search order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(TypeRule::name)
    }

    /// Resolves every location answering `query`, in catalog order.
    #[must_use]
    pub fn locate(
        &self,
        query: &ClassifiedQuery,
        routes: &dyn RouteIndex,
        filter: &TypeFilter,
    ) -> Vec<Location> {
        self.rules
            .iter()
            .filter(|rule| filter.allows(rule.name()))
            .flat_map(|rule| rule.locate(query, routes))
            .collect()
    }
}

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A rule pattern failed to compile.
    #[error("invalid pattern for object type '{name}': {source}")]
    Pattern {
        /// Object type whose pattern was rejected.
        name: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use rstest::{fixture, rstest};

    use super::*;
    use crate::object::classify;

    /// Route index that answers from a fixed table and records calls.
    #[derive(Default)]
    struct StaticRoutes {
        answers: Vec<(String, Location)>,
        calls: RefCell<Vec<(String, IpAddr)>>,
    }

    impl StaticRoutes {
        fn with(mut self, object_type: &str, key: &str) -> Self {
            self.answers
                .push((object_type.to_owned(), Location::new(object_type, key)));
            self
        }
    }

    impl RouteIndex for StaticRoutes {
        fn find_containing(&self, object_type: &str, address: IpAddr) -> Vec<Location> {
            self.calls
                .borrow_mut()
                .push((object_type.to_owned(), address));
            self.answers
                .iter()
                .filter(|(kind, _)| kind == object_type)
                .map(|(_, location)| location.clone())
                .collect()
        }
    }

    #[fixture]
    fn catalog() -> TypeCatalog {
        TypeCatalog::new("dn42", "DN42").expect("standard catalog")
    }

    fn located(catalog: &TypeCatalog, token: &str) -> Vec<String> {
        catalog
            .locate(&classify(token), &StaticRoutes::default(), &TypeFilter::any())
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[rstest]
    fn catalog_lists_types_in_priority_order(catalog: TypeCatalog) {
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(
            names,
            [
                "aut-num",
                "dns",
                "person",
                "mntner",
                "schema",
                "organisation",
                "tinc-keyset",
                "tinc-key",
                "as-set",
                "route-set",
                "inetnum",
                "inet6num",
                "route",
                "route6",
                "as-block",
            ]
        );
    }

    #[rstest]
    fn autonomous_system_numbers_match_aut_num_then_as_set(catalog: TypeCatalog) {
        assert_eq!(
            located(&catalog, "as4242420000"),
            ["aut-num/AS4242420000", "as-set/AS4242420000"]
        );
    }

    #[rstest]
    #[case("foo-mnt", &["mntner/FOO-MNT"])]
    // The dot before the DNS suffix is a regex wildcard, so `-` matches it.
    #[case("FOO-DN42", &["dns/foo-dn42", "person/FOO-DN42"])]
    #[case("ns1.Example.DN42", &["dns/ns1.example.dn42"])]
    #[case("ORG-FOO", &["organisation/ORG-FOO"])]
    #[case("SET-1-TINC", &["tinc-keyset/SET-1-TINC", "tinc-key/SET-1-TINC"])]
    #[case("AS-FOO", &["as-set/AS-FOO"])]
    #[case("RS-FOO", &["route-set/RS-FOO"])]
    #[case("INETNUM-SCHEMA", &["schema/INETNUM-SCHEMA"])]
    #[case("AS4242420000_4242429999", &["as-set/AS4242420000_4242429999", "as-block/AS4242420000_4242429999"])]
    #[case("nothing", &[])]
    fn names_resolve_through_patterns(
        catalog: TypeCatalog,
        #[case] token: &str,
        #[case] expected: &[&str],
    ) {
        assert_eq!(located(&catalog, token), expected);
    }

    #[rstest]
    fn suffixes_are_matched_literally(catalog: TypeCatalog) {
        let custom = TypeCatalog::new("a.b", "X+").expect("escaped catalog");
        assert_eq!(located(&custom, "host.a.b"), ["dns/host.a.b"]);
        assert!(located(&custom, "host.axb").is_empty());
        assert_eq!(located(&custom, "FOO-X+"), ["person/FOO-X+"]);
        assert!(located(&catalog, "FOO-X+").is_empty());
    }

    #[rstest]
    fn ipv4_queries_consult_only_ipv4_route_types(catalog: TypeCatalog) {
        let routes = StaticRoutes::default()
            .with("inetnum", "10.0.0.0_8")
            .with("route", "10.0.0.0_16")
            .with("inet6num", "fd00::_8");
        let locations = catalog.locate(&classify("10.0.0.1"), &routes, &TypeFilter::any());
        let rendered: Vec<String> = locations.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["inetnum/10.0.0.0_8", "route/10.0.0.0_16"]);

        let calls: Vec<String> = routes
            .calls
            .borrow()
            .iter()
            .map(|(kind, _)| kind.clone())
            .collect();
        assert_eq!(calls, ["inetnum", "route"]);
    }

    #[rstest]
    fn ipv6_queries_consult_only_ipv6_route_types(catalog: TypeCatalog) {
        let routes = StaticRoutes::default().with("inet6num", "fd00::_8");
        let locations = catalog.locate(&classify("fd00::1"), &routes, &TypeFilter::any());
        assert_eq!(locations, [Location::new("inet6num", "fd00::_8")]);
        assert_eq!(routes.calls.borrow().len(), 2);
    }

    #[rstest]
    fn filters_skip_excluded_rules(catalog: TypeCatalog) {
        let filter: TypeFilter = ["as-set"].into_iter().collect();
        let locations = catalog.locate(
            &classify("AS4242420000"),
            &StaticRoutes::default(),
            &filter,
        );
        assert_eq!(locations, [Location::new("as-set", "AS4242420000")]);
    }

    #[rstest]
    fn unknown_filter_names_exclude_everything(catalog: TypeCatalog) {
        let filter: TypeFilter = ["no-such-type"].into_iter().collect();
        let routes = StaticRoutes::default().with("inetnum", "10.0.0.0_8");
        assert!(catalog.locate(&classify("10.0.0.1"), &routes, &filter).is_empty());
        assert!(routes.calls.borrow().is_empty());
    }
}
