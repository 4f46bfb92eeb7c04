/*
 * Responsibility
 * - 環境変数の読み込み (identity provider / JWKS cache / HTTP timeouts)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Identity-provider settings the gate validates tokens against.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    pub algorithms: Vec<Algorithm>,
    pub leeway_seconds: u64,
}

/// Signing-key set location and cache policy.
#[derive(Debug, Clone)]
pub struct JwksConfig {
    pub url: Url,
    pub cache_ttl: Duration,
    pub min_refresh_interval: Duration,
    pub fetch_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub auth: AuthConfig,
    pub jwks: JwksConfig,

    pub claims_permission: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = match get("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(&get("APP_ENV").unwrap_or_default());

        let domain = get("AUTH_DOMAIN").ok_or(ConfigError::Missing("AUTH_DOMAIN"))?;
        let domain = domain.trim().trim_end_matches('/').to_string();

        let audience = get("AUTH_AUDIENCE").ok_or(ConfigError::Missing("AUTH_AUDIENCE"))?;

        let issuer = get("AUTH_ISSUER").unwrap_or_else(|| format!("https://{}/", domain));

        let algorithms = match get("AUTH_ALGORITHMS") {
            Some(raw) => parse_algorithms(&raw)?,
            None => vec![Algorithm::RS256],
        };

        let jwks_url = get("JWKS_URL")
            .unwrap_or_else(|| format!("https://{}/.well-known/jwks.json", domain));
        let jwks_url = Url::parse(&jwks_url).map_err(|_| ConfigError::Invalid("JWKS_URL"))?;
        // Keys fetched over plain HTTP could be swapped in transit.
        if app_env.is_production() && jwks_url.scheme() != "https" {
            return Err(ConfigError::Invalid("JWKS_URL"));
        }

        let jwks = JwksConfig {
            url: jwks_url,
            cache_ttl: seconds(&get, "JWKS_CACHE_TTL_SECONDS", 300)?,
            min_refresh_interval: seconds(&get, "JWKS_MIN_REFRESH_SECONDS", 30)?,
            fetch_timeout: seconds(&get, "JWKS_FETCH_TIMEOUT_SECONDS", 5)?,
        };
        if jwks.fetch_timeout.is_zero() {
            return Err(ConfigError::Invalid("JWKS_FETCH_TIMEOUT_SECONDS"));
        }

        let leeway_seconds = seconds(&get, "ACCESS_TOKEN_LEEWAY_SECONDS", 0)?.as_secs();

        let claims_permission = get("CLAIMS_PERMISSION")
            .map(|p| p.trim().to_string())
            .unwrap_or_else(|| "get:claims".to_string());

        let request_timeout = seconds(&get, "REQUEST_TIMEOUT_SECONDS", 30)?;
        if request_timeout.is_zero() {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        Ok(Self {
            addr,
            app_env,
            auth: AuthConfig {
                issuer,
                audience,
                algorithms,
                leeway_seconds,
            },
            jwks,
            claims_permission,
            request_timeout,
        })
    }
}

fn seconds<F>(get: &F, key: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::Invalid(key)),
        None => Ok(Duration::from_secs(default)),
    }
}

fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let algorithms = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Algorithm::from_str(s).map_err(|_| ConfigError::Invalid("AUTH_ALGORITHMS")))
        .collect::<Result<Vec<_>, _>>()?;

    // Published keys are RSA JWKs, so only RSA signature algorithms can ever verify.
    let rsa_only = algorithms.iter().all(|alg| {
        matches!(
            alg,
            Algorithm::RS256
                | Algorithm::RS384
                | Algorithm::RS512
                | Algorithm::PS256
                | Algorithm::PS384
                | Algorithm::PS512
        )
    });
    if algorithms.is_empty() || !rsa_only {
        return Err(ConfigError::Invalid("AUTH_ALGORITHMS"));
    }
    Ok(algorithms)
}
