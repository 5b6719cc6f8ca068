use std::env;

/// One GB expressed in the KB units the deployment driver expects for disk sizes.
pub const GB: u64 = 1024 * 1024;

/// Number of ESX hosts when neither `ESX_COUNT` nor `--esx-count` is given.
pub const DEFAULT_NUM_HOSTS: usize = 4;

/// Config holds the per-invocation generator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub num_hosts: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_hosts: DEFAULT_NUM_HOSTS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults, then apply
    /// the `--esx-count` command line value when one was given.
    pub fn load(esx_count: Option<&str>) -> Self {
        let env_count = get_env("ESX_COUNT", &DEFAULT_NUM_HOSTS.to_string());
        let mut cfg = Self {
            num_hosts: parse_host_count("ESX_COUNT", &env_count),
        };
        if let Some(raw) = esx_count {
            cfg.num_hosts = parse_host_count("--esx-count", raw);
        }
        cfg
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a host count the permissive way: a malformed value degrades to its
/// leading integer (or zero) and a negative value means no hosts.
fn parse_host_count(source: &str, raw: &str) -> usize {
    let value = leading_int(raw);
    if raw.trim().parse::<i64>().is_err() {
        tracing::warn!(
            "{} value {:?} is not an integer, using {} hosts",
            source,
            raw,
            value.max(0)
        );
    }
    usize::try_from(value).unwrap_or(0)
}

/// Integer prefix of `s`: leading whitespace and an optional sign, then as
/// many digits as are present. No digits yields 0.
pub fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let magnitude = digits
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });
    if negative {
        -magnitude
    } else {
        magnitude
    }
}
