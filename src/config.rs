//! Settings for talking to MOCO and matching intervals.
//!
//! Every setting comes from, in order of precedence:
//! - the command line, or its environment variable
//! - the Timewarrior configuration section of the report, e.g. `moco.domain: acme` in `timewarrior.cfg`
//! - a built-in default, where one exists

use crate::args::Common;
use crate::error::{ErrorType, IntoResult, Res};
use crate::search::{Matcher, DEFAULT_THRESHOLD};
use crate::timew::ReportConfig;
use crate::Result;
use anyhow::{anyhow, ensure, Context};
use std::fmt::{Debug, Formatter};

const DOMAIN_KEY: &str = "moco.domain";
const THRESHOLD_KEY: &str = "moco.threshold";

#[derive(Clone, PartialEq)]
pub struct Config {
    domain: Option<String>,
    api_key: Option<String>,
    threshold: f64,
}

impl Config {
    /// Creates a `Config` with the default threshold.
    pub fn new(domain: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            api_key: Some(api_key.into()),
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Merges the command line with the `moco.*` keys from the Timewarrior configuration.
    ///
    /// The domain and API key may remain unset here; they are only required once a real MOCO
    /// client is created.
    ///
    /// # Errors
    /// - Returns an `ErrorType::Config` error if the threshold is not in `(0, 1]`.
    pub fn resolve(common: &Common, timew: &ReportConfig) -> Result<Self> {
        let domain = common
            .domain()
            .or_else(|| timew.get_str(DOMAIN_KEY))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let api_key = common
            .api_key()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);

        let threshold = match common.threshold() {
            Some(threshold) => threshold,
            None => match timew.get_str(THRESHOLD_KEY) {
                Some(value) => value
                    .trim()
                    .parse::<f64>()
                    .with_context(|| format!("Invalid value for {THRESHOLD_KEY}: '{value}'"))
                    .pub_result(ErrorType::Config)?,
                None => DEFAULT_THRESHOLD,
            },
        };
        validate_threshold(threshold).pub_result(ErrorType::Config)?;

        Ok(Self {
            domain,
            api_key,
            threshold,
        })
    }

    pub(crate) fn domain(&self) -> Res<&str> {
        self.domain.as_deref().ok_or_else(|| {
            anyhow!("The MOCO domain is not set, use --domain, MOCO_DOMAIN or '{DOMAIN_KEY}'")
        })
    }

    pub(crate) fn api_key(&self) -> Res<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| anyhow!("The MOCO API key is not set, use --api-key or MOCO_API_KEY"))
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// A `Matcher` that accepts candidates scoring at least `threshold`.
    pub fn matcher(&self) -> Matcher {
        Matcher::new().with_threshold(self.threshold)
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("domain", &self.domain)
            .field("api_key", &self.api_key.as_ref().map(|_| "********"))
            .field("threshold", &self.threshold)
            .finish()
    }
}

/// Similarities are in `[0, 1]`. Zero would accept unrelated projects and anything above one
/// could never match.
fn validate_threshold(threshold: f64) -> Res<()> {
    ensure!(
        threshold > 0.0 && threshold <= 1.0,
        "The similarity threshold must be greater than 0 and at most 1, got {threshold}"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    fn common(domain: Option<&str>, api_key: Option<&str>, threshold: Option<f64>) -> Common {
        Common::new(
            LevelFilter::INFO,
            domain.map(String::from),
            api_key.map(String::from),
            threshold,
        )
    }

    fn timew(section: &str) -> ReportConfig {
        crate::timew::Report::parse(&format!("{section}\n\n[]"))
            .unwrap()
            .config()
            .clone()
    }

    #[test]
    fn test_defaults() {
        let config = Config::resolve(&common(None, None, None), &timew("")).unwrap();
        assert_eq!(config.threshold(), DEFAULT_THRESHOLD);
        assert!(config.domain().is_err());
        assert!(config.api_key().is_err());
    }

    #[test]
    fn test_timewarrior_config_is_used() {
        let config = Config::resolve(
            &common(None, Some("key"), None),
            &timew("moco.domain: acme\nmoco.threshold: 0.5"),
        )
        .unwrap();
        assert_eq!(config.domain().unwrap(), "acme");
        assert_eq!(config.api_key().unwrap(), "key");
        assert_eq!(config.threshold(), 0.5);
    }

    #[test]
    fn test_command_line_wins() {
        let config = Config::resolve(
            &common(Some("globex"), Some("key"), Some(0.9)),
            &timew("moco.domain: acme\nmoco.threshold: 0.5"),
        )
        .unwrap();
        assert_eq!(config.domain().unwrap(), "globex");
        assert_eq!(config.threshold(), 0.9);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = Config::resolve(&common(Some("  "), Some(""), None), &timew("")).unwrap();
        assert!(config.domain().is_err());
        assert!(config.api_key().is_err());
    }

    #[test]
    fn test_bad_threshold() {
        let err = Config::resolve(
            &common(None, None, None),
            &timew("moco.threshold: very high"),
        )
        .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);

        for threshold in [-1.0, 0.0, 1.5, f64::NAN, f64::INFINITY] {
            let err =
                Config::resolve(&common(None, None, Some(threshold)), &timew("")).unwrap_err();
            assert_eq!(err.error_type(), ErrorType::Config, "{threshold}");
        }
        let err = Config::resolve(&common(None, None, None), &timew("moco.threshold: 0"))
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);

        let config = Config::resolve(&common(None, None, Some(1.0)), &timew("")).unwrap();
        assert_eq!(config.threshold(), 1.0);
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = Config::new("acme", "super-secret");
        let debug = format!("{config:?}");
        assert!(debug.contains("acme"));
        assert!(!debug.contains("super-secret"));
    }
}
