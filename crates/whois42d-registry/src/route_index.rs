//! Containment lookup over route-style record directories.

use std::fs;
use std::io;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::LOOKUP_TARGET;
use crate::network::Network;
use crate::record::Location;

/// Finds the records of a route-style type whose network contains an address.
pub trait RouteIndex {
    /// Returns every containing record of `object_type`, least specific first.
    fn find_containing(&self, object_type: &str, address: IpAddr) -> Vec<Location>;
}

/// Route index that scans `<data_dir>/<object_type>/` on every query.
///
/// Scanning per query keeps results in step with the registry checkout
/// without any reload signal.
#[derive(Debug, Clone)]
pub struct DirectoryRouteIndex {
    data_dir: PathBuf,
}

impl DirectoryRouteIndex {
    /// Builds an index over the given data directory.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Data directory the index scans.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn entry_names(&self, object_type: &str) -> Vec<String> {
        let directory = self.data_dir.join(object_type);
        let entries = match fs::read_dir(&directory) {
            Ok(entries) => entries,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(
                    target: LOOKUP_TARGET,
                    directory = %directory.display(),
                    "route directory absent"
                );
                return Vec::new();
            }
            Err(error) => {
                warn!(
                    target: LOOKUP_TARGET,
                    directory = %directory.display(),
                    error = %error,
                    "cannot list route directory"
                );
                return Vec::new();
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => entry.file_name().into_string().ok(),
                Err(error) => {
                    warn!(
                        target: LOOKUP_TARGET,
                        directory = %directory.display(),
                        error = %error,
                        "skipping unreadable route entry"
                    );
                    None
                }
            })
            .collect();
        names.sort();
        names
    }
}

impl RouteIndex for DirectoryRouteIndex {
    fn find_containing(&self, object_type: &str, address: IpAddr) -> Vec<Location> {
        let names = self.entry_names(object_type);
        containing_networks(names.iter().map(String::as_str), address)
            .into_iter()
            .map(|network| Location::new(object_type, network.key()))
            .collect()
    }
}

/// Selects the networks named in `names` that contain `address`.
///
/// Names use the on-disk `addr_len` form. Unparseable names are logged and
/// skipped. The result is ordered by ascending prefix length; networks with
/// equal prefix lengths keep the order in which `names` listed them.
pub fn containing_networks<'a>(
    names: impl IntoIterator<Item = &'a str>,
    address: IpAddr,
) -> Vec<Network> {
    let mut matches: Vec<Network> = Vec::new();
    for name in names {
        let network = match Network::from_key(name) {
            Ok(network) => network,
            Err(error) => {
                warn!(
                    target: LOOKUP_TARGET,
                    entry = name,
                    error = %error,
                    "skipping malformed route entry"
                );
                continue;
            }
        };
        if !network.contains(address) {
            continue;
        }
        let slot = matches.partition_point(|held| held.prefix_len() <= network.prefix_len());
        matches.insert(slot, network);
    }
    matches
}
