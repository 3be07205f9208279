//! Response rendering for the line protocol.

use std::io::{self, Write};

use whois42d_registry::{Record, Registry};

/// Reply to `-V version`.
pub(crate) const VERSION_LINE: &str =
    concat!("% ", env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

const NOT_FOUND: &[u8] = b"% 404\n";

pub(crate) fn write_greeting(out: &mut impl Write, header: &str) -> io::Result<()> {
    write!(out, "% {header}\n\n")
}

/// Writes the single block answering a server-information topic.
pub(crate) fn write_server_info(
    out: &mut impl Write,
    registry: &Registry,
    topic: &str,
) -> io::Result<()> {
    match topic {
        "version" => writeln!(out, "{VERSION_LINE}"),
        "sources" => writeln!(out, "{}:3:N:0-0", registry.config().registry_top_level()),
        "types" => registry
            .catalog()
            .names()
            .try_for_each(|name| writeln!(out, "{name}")),
        other => writeln!(out, "% unknown option {other}"),
    }
}

pub(crate) fn write_record(out: &mut impl Write, record: &Record) -> io::Result<()> {
    writeln!(out, "% Information related to '{}':", record.location())?;
    out.write_all(record.body())?;
    out.write_all(b"\n")
}

pub(crate) fn write_not_found(out: &mut impl Write) -> io::Result<()> {
    out.write_all(NOT_FOUND)
}

pub(crate) fn write_footer(out: &mut impl Write) -> io::Result<()> {
    out.write_all(b"\n")
}
