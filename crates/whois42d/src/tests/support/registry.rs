//! A small registry checkout on disk.

use std::fs;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

use whois42d_registry::{Registry, RegistryConfig};

pub(crate) const FIXTURE_HEADER: &str = "This is the dn42 whois query service.";

/// Registry checkout under a temporary directory with a handful of records.
pub(crate) struct RegistryFixture {
    _checkout: TempDir,
    root: Utf8PathBuf,
    registry: Arc<Registry>,
}

impl RegistryFixture {
    pub(crate) const MNTNER_BODY: &'static str = "\
mntner:             FOO-MNT
admin-c:            FOO-DN42
tech-c:             FOO-DN42
auth:               pgp-fingerprint 0123456789ABCDEF0123456789ABCDEF01234567
source:             DN42
";

    pub(crate) fn new() -> Self {
        let dir = TempDir::new().expect("create registry checkout");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .expect("temporary directory should be UTF-8");
        let data = root.join("data");
        write(&data, "mntner/FOO-MNT", Self::MNTNER_BODY);
        write(
            &data,
            "person/FOO-DN42",
            "person:             Foo Example\nnic-hdl:            FOO-DN42\nmnt-by:             FOO-MNT\nsource:             DN42\n",
        );
        write(
            &data,
            "aut-num/AS4242420000",
            "aut-num:            AS4242420000\nas-name:            FOO-AS\nmnt-by:             FOO-MNT\nsource:             DN42\n",
        );
        write(
            &data,
            "inetnum/172.20.0.0_14",
            "inetnum:            172.20.0.0 - 172.23.255.255\ncidr:               172.20.0.0/14\nnetname:            DN42-V4\nsource:             DN42\n",
        );
        write(
            &data,
            "inetnum/172.20.0.0_24",
            "inetnum:            172.20.0.0 - 172.20.0.255\ncidr:               172.20.0.0/24\nnetname:            FOO-NET\nmnt-by:             FOO-MNT\nsource:             DN42\n",
        );
        write(
            &data,
            "route/172.20.0.0_24",
            "route:              172.20.0.0/24\norigin:             AS4242420000\nmnt-by:             FOO-MNT\nsource:             DN42\n",
        );
        write(
            &data,
            "inet6num/fd42:d42:d42::_48",
            "inet6num:           fd42:0d42:0d42:0000:0000:0000:0000:0000 - fd42:0d42:0d42:ffff:ffff:ffff:ffff:ffff\ncidr:               fd42:d42:d42::/48\nnetname:            FOO-NET6\nsource:             DN42\n",
        );

        let registry = Registry::new(RegistryConfig::new(
            data.as_std_path(),
            FIXTURE_HEADER,
            "dn42",
            "DN42",
        ))
        .expect("build registry");
        Self {
            _checkout: dir,
            root,
            registry: Arc::new(registry),
        }
    }

    pub(crate) fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Checkout root, the parent of `data/`.
    pub(crate) fn root(&self) -> &Utf8Path {
        &self.root
    }
}

fn write(data: &Utf8Path, relative: &str, body: &str) {
    let path = data.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create type directory");
    }
    fs::write(&path, body).expect("write record");
}
