use std::str::FromStr;

pub const ENV_IPFS_GATEWAY: &str = "RUSTY_NATSPEC_IPFS_GATEWAY";
pub const ENV_SOURCIFY_REPO: &str = "RUSTY_NATSPEC_SOURCIFY_REPO";
pub const ENV_RPC_URL: &str = "RUSTY_NATSPEC_RPC_URL";
pub const ENV_HTTP_TIMEOUT_MS: &str = "RUSTY_NATSPEC_HTTP_TIMEOUT_MS";
pub const ENV_METADATA_MAX_BYTES: &str = "RUSTY_NATSPEC_METADATA_MAX_BYTES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatspecAdapterConfig {
    pub ipfs_gateway_url: String,
    pub sourcify_repo_url: String,
    pub rpc_url: String,
    pub http_timeout_ms: u64,
    pub metadata_max_bytes: usize,
}

impl Default for NatspecAdapterConfig {
    fn default() -> Self {
        Self {
            ipfs_gateway_url: "https://ipfs.io".to_owned(),
            sourcify_repo_url: "https://repo.sourcify.dev".to_owned(),
            rpc_url: "http://127.0.0.1:8545".to_owned(),
            http_timeout_ms: 15_000,
            metadata_max_bytes: 2 * 1024 * 1024,
        }
    }
}

impl NatspecAdapterConfig {
    /// Defaults overridden by whichever `RUSTY_NATSPEC_*` variables are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().trim_end_matches('/').to_owned())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        Self {
            ipfs_gateway_url: text(ENV_IPFS_GATEWAY, defaults.ipfs_gateway_url),
            sourcify_repo_url: text(ENV_SOURCIFY_REPO, defaults.sourcify_repo_url),
            rpc_url: text(ENV_RPC_URL, defaults.rpc_url),
            http_timeout_ms: parsed(&lookup, ENV_HTTP_TIMEOUT_MS, defaults.http_timeout_ms),
            metadata_max_bytes: parsed(
                &lookup,
                ENV_METADATA_MAX_BYTES,
                defaults.metadata_max_bytes,
            ),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "ignoring unparseable setting");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_lookup_overrides_and_fallbacks() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_IPFS_GATEWAY, "http://localhost:8080/"),
            (ENV_HTTP_TIMEOUT_MS, "2500"),
            (ENV_METADATA_MAX_BYTES, "lots"),
            (ENV_RPC_URL, "  "),
        ]);
        let cfg = NatspecAdapterConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.ipfs_gateway_url, "http://localhost:8080");
        assert_eq!(cfg.http_timeout_ms, 2_500);
        assert_eq!(cfg.metadata_max_bytes, 2 * 1024 * 1024);
        assert_eq!(cfg.rpc_url, "http://127.0.0.1:8545");
        assert_eq!(cfg.sourcify_repo_url, "https://repo.sourcify.dev");
    }
}
