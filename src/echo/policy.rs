//! Environment driven response policy.
//!
//! # Responsibilities
//! - Snapshot the process environment once per request
//! - Turn `SEND_HEADER_*` variables into response headers
//! - Decide whether the server hostname is disclosed
//!
//! # Design Decisions
//! - Policy is a pure function of `(Environment, request headers)`; the
//!   environment is passed in, never read ambiently, so rules are testable
//! - The environment is re-read for every request, so changes apply without
//!   a restart
//! - Header application overwrites: the later writer wins

use axum::http::{HeaderMap, HeaderName, HeaderValue};

/// Prefix of variables that become response headers.
pub const SEND_HEADER_PREFIX: &str = "SEND_HEADER_";
/// Process-wide hostname disclosure flag.
pub const SEND_SERVER_HOSTNAME: &str = "SEND_SERVER_HOSTNAME";
/// Per-request hostname disclosure override.
pub const SEND_SERVER_HOSTNAME_HEADER: &str = "x-send-server-hostname";
/// Root prefix for the UI page's base path.
pub const WEBSOCKET_ROOT: &str = "WEBSOCKET_ROOT";
/// Non-empty enables header logging.
pub const LOG_HTTP_HEADERS: &str = "LOG_HTTP_HEADERS";
/// Non-empty enables body logging.
pub const LOG_HTTP_BODY: &str = "LOG_HTTP_BODY";

/// An ordered snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: Vec<(String, String)>,
}

impl Environment {
    /// Snapshot the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Build a snapshot from explicit pairs, keeping their order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Value of a variable, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// True when the variable is set to a non-empty value.
    pub fn enabled(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }

    /// Iterate over all variables in snapshot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Where request handlers obtain their environment snapshot.
pub trait EnvironmentSource: Send + Sync {
    fn snapshot(&self) -> Environment;
}

/// Reads the live process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentSource for ProcessEnvironment {
    fn snapshot(&self) -> Environment {
        Environment::capture()
    }
}

impl EnvironmentSource for Environment {
    fn snapshot(&self) -> Environment {
        self.clone()
    }
}

/// Response headers injected through `SEND_HEADER_<NAME>` variables.
///
/// `<NAME>` has underscores replaced with hyphens. Variables that do not form
/// a valid header name or value are skipped with a warning.
pub fn injected_headers(env: &Environment) -> Vec<(HeaderName, HeaderValue)> {
    env.iter()
        .filter_map(|(key, value)| {
            let name = key.strip_prefix(SEND_HEADER_PREFIX)?.replace('_', "-");
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => Some((name, value)),
                _ => {
                    tracing::warn!(variable = %key, "Ignoring invalid SEND_HEADER_ variable");
                    None
                }
            }
        })
        .collect()
}

/// Whether the server hostname should be disclosed for this request.
///
/// A non-empty `X-Send-Server-Hostname` header takes precedence over the
/// `SEND_SERVER_HOSTNAME` variable. Only a case-insensitive `false` disables.
pub fn send_server_hostname(env: &Environment, request_headers: &HeaderMap) -> bool {
    let setting = request_headers
        .get(SEND_SERVER_HOSTNAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .or_else(|| env.get(SEND_SERVER_HOSTNAME))
        .unwrap_or_default();

    !setting.eq_ignore_ascii_case("false")
}

/// Per-request response decisions.
#[derive(Debug, Clone, Default)]
pub struct ResponsePolicy {
    /// Headers to add to every response for this request.
    pub headers: Vec<(HeaderName, HeaderValue)>,
    /// Whether to prefix output with the server identity.
    pub disclose_hostname: bool,
}

impl ResponsePolicy {
    /// Evaluate both rule sources for one request.
    pub fn evaluate(env: &Environment, request_headers: &HeaderMap) -> Self {
        Self {
            headers: injected_headers(env),
            disclose_hostname: send_server_hostname(env, request_headers),
        }
    }

    /// Write the injected headers into a response header map.
    pub fn apply(&self, response_headers: &mut HeaderMap) {
        for (name, value) in &self.headers {
            response_headers.insert(name.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.append(*k, HeaderValue::from_static(*v));
        }
        map
    }

    #[test]
    fn send_header_variables_become_headers() {
        let env = Environment::from_pairs([
            ("PATH", "/usr/bin"),
            ("SEND_HEADER_X_FOO", "bar"),
            ("SEND_HEADER_CACHE_CONTROL", "no-store"),
        ]);
        let injected = injected_headers(&env);
        assert_eq!(injected.len(), 2);
        assert_eq!(injected[0].0, "x-foo");
        assert_eq!(injected[0].1, "bar");
        assert_eq!(injected[1].0, "cache-control");
    }

    #[test]
    fn invalid_send_header_variables_are_skipped() {
        let env = Environment::from_pairs([
            ("SEND_HEADER_", "empty name"),
            ("SEND_HEADER_BAD NAME", "x"),
            ("SEND_HEADER_X_OK", "line\nbreak"),
            ("SEND_HEADER_X_GOOD", "yes"),
        ]);
        let injected = injected_headers(&env);
        assert_eq!(injected.len(), 1);
        assert_eq!(injected[0].0, "x-good");
    }

    #[test]
    fn hostname_enabled_by_default() {
        assert!(send_server_hostname(&Environment::default(), &HeaderMap::new()));
    }

    #[test]
    fn environment_flag_disables_case_insensitively() {
        for value in ["false", "FALSE", "False"] {
            let env = Environment::from_pairs([(SEND_SERVER_HOSTNAME, value)]);
            assert!(!send_server_hostname(&env, &HeaderMap::new()), "{value}");
        }
        let env = Environment::from_pairs([(SEND_SERVER_HOSTNAME, "no")]);
        assert!(send_server_hostname(&env, &HeaderMap::new()));
    }

    #[test]
    fn request_header_overrides_environment() {
        let disabled = headers(&[("x-send-server-hostname", "False")]);
        assert!(!send_server_hostname(&Environment::default(), &disabled));

        let env = Environment::from_pairs([(SEND_SERVER_HOSTNAME, "false")]);
        let enabled = headers(&[("x-send-server-hostname", "true")]);
        assert!(send_server_hostname(&env, &enabled));

        let empty = headers(&[("x-send-server-hostname", "")]);
        assert!(!send_server_hostname(&env, &empty), "empty header falls back to env");
    }

    #[test]
    fn apply_overwrites_existing_headers() {
        let env = Environment::from_pairs([("SEND_HEADER_CONTENT_TYPE", "application/x-test")]);
        let policy = ResponsePolicy::evaluate(&env, &HeaderMap::new());
        let mut response = headers(&[("content-type", "text/plain")]);
        policy.apply(&mut response);
        assert_eq!(response.get_all("content-type").iter().count(), 1);
        assert_eq!(response["content-type"], "application/x-test");
    }

    #[test]
    fn later_variable_wins_lookup() {
        let env = Environment::from_pairs([("A", "1"), ("A", "2")]);
        assert_eq!(env.get("A"), Some("2"));
        assert!(env.enabled("A"));
        assert!(!Environment::from_pairs([("B", "")]).enabled("B"));
    }
}
