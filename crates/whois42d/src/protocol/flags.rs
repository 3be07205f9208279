//! Flag grammar for whois request lines.

use clap::{ArgAction, ColorChoice, CommandFactory, Parser, error::ErrorKind};
use thiserror::Error;

use whois42d_registry::TypeFilter;

/// Request-line grammar, parsed without a binary name.
#[derive(Parser, Debug)]
#[command(
    name = "whois",
    no_binary_name = true,
    disable_version_flag = true,
    color = ColorChoice::Never,
    about = "Query the registry for objects, prefixes and addresses."
)]
struct QueryArgs {
    /// Restricts the search to the listed object types.
    #[arg(
        short = 'T',
        value_name = "TYPE[,TYPE...]",
        value_delimiter = ',',
        action = ArgAction::Append
    )]
    types: Vec<String>,
    /// Asks for server information: version, sources or types.
    #[arg(short = 'V', visible_short_alias = 'q', value_name = "TOPIC")]
    server_info: Option<String>,
    /// Object names, addresses or prefixes to look up.
    #[arg(value_name = "QUERY")]
    terms: Vec<String>,
}

/// A parsed request line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct QueryFlags {
    pub(crate) type_filter: TypeFilter,
    pub(crate) server_info: Option<String>,
    pub(crate) terms: Vec<String>,
}

/// Request lines that end the exchange with usage text instead of a lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum FlagError {
    /// `-h` was given.
    #[error("{usage}")]
    Help { usage: String },
    /// The line did not match the grammar.
    #[error("{message}\n{usage}")]
    Invalid { message: String, usage: String },
}

/// Parses one request line into flags and positional terms.
pub(crate) fn parse_line(line: &str) -> Result<QueryFlags, FlagError> {
    let args = QueryArgs::try_parse_from(line.split_whitespace()).map_err(|error| {
        if error.kind() == ErrorKind::DisplayHelp {
            FlagError::Help { usage: usage() }
        } else {
            let rendered = error.render().to_string();
            let message = rendered.lines().next().unwrap_or_default().to_owned();
            FlagError::Invalid {
                message,
                usage: usage(),
            }
        }
    })?;

    let type_filter = args
        .types
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    Ok(QueryFlags {
        type_filter,
        server_info: args.server_info.map(|topic| topic.trim().to_owned()),
        terms: args.terms,
    })
}

/// Help block sent after a parse error or on `-h`.
pub(crate) fn usage() -> String {
    QueryArgs::command().render_help().to_string()
}
