//! Request routing for the HTTP adapter, independent of the server library.

use std::collections::BTreeMap;

use serde::Serialize;
use url::Url;

use whois42d_registry::Registry;

const TEXT: &str = "text/plain; charset=utf-8";
const JSON: &str = "application/json; charset=utf-8";
const HTML: &str = "text/html; charset=utf-8";

const HELP_PAGE: &str = "<html><body><pre>
whois42d HTTP API

Paths:
/               This message.
/api/1/text     Query with a plain text response
/api/1/json     Query with a JSON response
/api/1/version  Server version
/api/1/types    Object types the server knows about

Query parameter:
Put the query in the URL variable 'q'.

Examples:
/api/1/json?q=10.0.0.0/8
/api/1/json?q=SOMEONE-MNT
</pre></body></html>
";

/// A rendered HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HttpReply {
    pub(crate) status: u16,
    pub(crate) content_type: &'static str,
    pub(crate) body: Vec<u8>,
}

impl HttpReply {
    fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    fn error(status: u16, message: &str) -> Self {
        Self::new(status, TEXT, format!("{message}\n"))
    }

    fn json(value: &impl Serialize) -> Self {
        match serde_json::to_vec(value) {
            Ok(mut body) => {
                body.push(b'\n');
                Self::new(200, JSON, body)
            }
            Err(_) => Self::error(500, "Internal Server Error"),
        }
    }
}

#[derive(Serialize)]
struct VersionBody {
    version: &'static str,
}

/// Routes one request. `target` is the request target as sent by the client.
pub(crate) fn route(registry: &Registry, is_get: bool, target: &str) -> HttpReply {
    if !is_get {
        return HttpReply::error(405, "Method Not Allowed");
    }
    let Ok(url) = Url::parse("http://localhost/").and_then(|base| base.join(target)) else {
        return HttpReply::error(400, "Bad Request");
    };

    match url.path() {
        "/" => HttpReply::new(200, HTML, HELP_PAGE),
        "/api/1/version" => HttpReply::json(&VersionBody {
            version: env!("CARGO_PKG_VERSION"),
        }),
        "/api/1/types" => {
            let names: Vec<&str> = registry.catalog().names().collect();
            HttpReply::json(&names)
        }
        "/api/1/text" => query(registry, &url, |records| {
            let mut body: Vec<u8> = records
                .iter()
                .flat_map(|record| record.body().iter().copied())
                .collect();
            body.push(b'\n');
            HttpReply::new(200, TEXT, body)
        }),
        "/api/1/json" => query(registry, &url, |records| {
            let objects: Vec<BTreeMap<String, String>> =
                records.iter().map(whois42d_registry::Record::fields).collect();
            HttpReply::json(&objects)
        }),
        _ => HttpReply::error(404, "Not Found"),
    }
}

fn query(
    registry: &Registry,
    url: &Url,
    render: impl FnOnce(&[whois42d_registry::Record]) -> HttpReply,
) -> HttpReply {
    let token = url
        .query_pairs()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default();
    if token.is_empty() {
        return HttpReply::error(400, "Bad Request");
    }
    let records = registry.lookup(&token);
    if records.is_empty() {
        return HttpReply::error(404, "Not Found");
    }
    render(&records)
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::Value;

    use super::*;
    use crate::tests::support::RegistryFixture;

    #[fixture]
    fn fixture() -> RegistryFixture {
        RegistryFixture::new()
    }

    fn get(fixture: &RegistryFixture, target: &str) -> HttpReply {
        route(&fixture.registry(), true, target)
    }

    fn json(reply: &HttpReply) -> Value {
        serde_json::from_slice(&reply.body).expect("json body")
    }

    #[rstest]
    fn json_queries_flatten_records(fixture: RegistryFixture) {
        let reply = get(&fixture, "/api/1/json?q=foo-mnt");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, JSON);
        let body = json(&reply);
        assert_eq!(body[0]["mntner"], "FOO-MNT");
        assert_eq!(body[0]["source"], "DN42");
    }

    #[rstest]
    fn text_queries_concatenate_records(fixture: RegistryFixture) {
        let reply = get(&fixture, "/api/1/text?q=172.20.0.1");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, TEXT);
        let text = String::from_utf8(reply.body).expect("utf-8 body");
        assert_eq!(text.matches("inetnum:").count(), 2);
        assert!(text.contains("route:"));
    }

    #[rstest]
    fn encoded_prefixes_are_decoded(fixture: RegistryFixture) {
        let reply = get(&fixture, "/api/1/json?q=172.20.0.0%2F24");
        assert_eq!(reply.status, 200);
        assert_eq!(json(&reply).as_array().map(Vec::len), Some(3));
    }

    #[rstest]
    #[case("/api/1/json")]
    #[case("/api/1/json?q=")]
    #[case("/api/1/text?other=FOO-MNT")]
    fn missing_queries_are_bad_requests(fixture: RegistryFixture, #[case] target: &str) {
        assert_eq!(get(&fixture, target).status, 400);
    }

    #[rstest]
    #[case("/api/1/json?q=NOBODY-MNT")]
    #[case("/api/1/text?q=203.0.113.1")]
    #[case("/api/2/json?q=FOO-MNT")]
    #[case("/favicon.ico")]
    fn unknown_objects_and_paths_are_not_found(fixture: RegistryFixture, #[case] target: &str) {
        assert_eq!(get(&fixture, target).status, 404);
    }

    #[rstest]
    fn version_and_types_describe_the_server(fixture: RegistryFixture) {
        let version = json(&get(&fixture, "/api/1/version"));
        assert_eq!(version["version"], env!("CARGO_PKG_VERSION"));

        let types = json(&get(&fixture, "/api/1/types"));
        assert_eq!(types[0], "aut-num");
        assert_eq!(types.as_array().map(Vec::len), Some(15));
    }

    #[rstest]
    fn root_serves_the_help_page(fixture: RegistryFixture) {
        let reply = get(&fixture, "/");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, HTML);
        assert!(String::from_utf8_lossy(&reply.body).contains("/api/1/json"));
    }

    #[rstest]
    fn only_get_is_allowed(fixture: RegistryFixture) {
        let reply = route(&fixture.registry(), false, "/api/1/json?q=FOO-MNT");
        assert_eq!(reply.status, 405);
    }
}
