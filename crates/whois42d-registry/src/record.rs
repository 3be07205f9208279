use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Pointer to exactly one record file below the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    object_type: String,
    key: String,
}

impl Location {
    /// Builds a location from an object type and record key.
    #[must_use]
    pub fn new(object_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            key: key.into(),
        }
    }

    /// Object type, which is also the directory name.
    #[must_use]
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Record key, which is also the file name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Full path of the record below `data_dir`.
    #[must_use]
    pub fn path_in(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.object_type).join(&self.key)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.object_type, self.key)
    }
}

/// A located record together with its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    location: Location,
    body: Vec<u8>,
}

impl Record {
    /// Pairs a location with the bytes read from it.
    #[must_use]
    pub const fn new(location: Location, body: Vec<u8>) -> Self {
        Self { location, body }
    }

    /// Where the record was read from.
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// Raw record bytes exactly as stored.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Flattens `key: value` lines into a map.
    ///
    /// The first `:` on a line separates key from value and both sides are
    /// trimmed. Lines without a `:` after their first byte are dropped, and a
    /// repeated attribute keeps its last value.
    #[must_use]
    pub fn fields(&self) -> BTreeMap<String, String> {
        String::from_utf8_lossy(&self.body)
            .split('\n')
            .filter_map(|line| match line.split_once(':') {
                Some((key, value)) if !key.is_empty() => {
                    Some((key.trim().to_owned(), value.trim().to_owned()))
                }
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_displays_as_relative_path() {
        let location = Location::new("mntner", "FOO-MNT");
        assert_eq!(location.to_string(), "mntner/FOO-MNT");
        assert_eq!(
            location.path_in(Path::new("/srv/data")),
            PathBuf::from("/srv/data/mntner/FOO-MNT")
        );
    }

    #[test]
    fn fields_flatten_attribute_lines() {
        let record = Record::new(
            Location::new("mntner", "FOO-MNT"),
            b"mntner:             FOO-MNT\nadmin-c:            FOO-DN42\nremarks: see http://example.dn42\n  continuation\n: orphan\nsource:             DN42\n".to_vec(),
        );
        let fields = record.fields();
        assert_eq!(fields.get("mntner").map(String::as_str), Some("FOO-MNT"));
        assert_eq!(
            fields.get("remarks").map(String::as_str),
            Some("see http://example.dn42")
        );
        assert_eq!(fields.get("source").map(String::as_str), Some("DN42"));
        assert_eq!(fields.len(), 4);
    }

    #[test]
    fn repeated_attributes_keep_the_last_value() {
        let record = Record::new(
            Location::new("person", "FOO-DN42"),
            b"nic-hdl: FOO-DN42\ne-mail: a@example.com\ne-mail: b@example.com\n".to_vec(),
        );
        assert_eq!(
            record.fields().get("e-mail").map(String::as_str),
            Some("b@example.com")
        );
    }
}
