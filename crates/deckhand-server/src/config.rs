//! Server configuration
//!
//! Built once at startup from a key lookup (Shuttle secrets, then process
//! environment) and injected into services. Nothing below reads ambient
//! state.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use deckhand::{RetryPolicy, READINESS_THRESHOLD};

use crate::application::{ConversationPolicy, DeckPolicy};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-5-mini";

/// Chat-completion credentials and transport settings
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Per-call HTTP timeout
    pub http_timeout: Duration,
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bearer key guarding the API; `None` disables authentication
    pub api_key: Option<String>,
    pub openai: OpenAiConfig,
    /// Overall deadline for one request
    pub request_timeout: Duration,
    /// Include upstream error detail in error bodies
    pub debug_errors: bool,
    pub conversation: ConversationPolicy,
    pub deck: DeckPolicy,
}

impl ServerConfig {
    /// Build from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = get("OPENAI_API_KEY").context("OPENAI_API_KEY not configured")?;

        let retry = RetryPolicy {
            max_attempts: parse_or(&get, "RETRY_MAX_ATTEMPTS", 3)?,
            base_delay: Duration::from_millis(parse_or(&get, "RETRY_BASE_DELAY_MS", 250)?),
            ..RetryPolicy::default()
        };
        if retry.max_attempts == 0 {
            bail!("RETRY_MAX_ATTEMPTS must be at least 1");
        }

        let readiness_threshold: u8 = parse_or(&get, "READINESS_THRESHOLD", READINESS_THRESHOLD)?;
        if readiness_threshold > 100 {
            bail!("READINESS_THRESHOLD must be between 0 and 100");
        }

        let max_round_trips: usize = parse_or(&get, "MAX_ROUND_TRIPS", 5)?;
        if max_round_trips == 0 {
            bail!("MAX_ROUND_TRIPS must be at least 1");
        }

        Ok(Self {
            api_key: get("DECKHAND_API_KEY"),
            openai: OpenAiConfig {
                api_key: openai_api_key,
                base_url: get("OPENAI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                http_timeout: Duration::from_secs(parse_or(&get, "HTTP_TIMEOUT_SECS", 30)?),
            },
            request_timeout: Duration::from_secs(parse_or(&get, "REQUEST_TIMEOUT_SECS", 90)?),
            debug_errors: parse_or(&get, "DEBUG_ERRORS", false)?,
            conversation: ConversationPolicy {
                max_round_trips,
                readiness_threshold,
                retry: retry.clone(),
                max_completion_tokens: parse_or(&get, "ASSISTANT_MAX_TOKENS", 1024)?,
            },
            deck: DeckPolicy {
                retry,
                max_completion_tokens: parse_or(&get, "DECK_MAX_TOKENS", 4000)?,
            },
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {} ({:?}): {}", key, raw, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")])).unwrap();

        assert_eq!(config.api_key, None);
        assert_eq!(config.openai.base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(config.openai.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.conversation.max_round_trips, 5);
        assert_eq!(config.conversation.readiness_threshold, 80);
        assert_eq!(config.conversation.max_completion_tokens, 1024);
        assert_eq!(config.conversation.retry, RetryPolicy::default());
        assert_eq!(config.deck.max_completion_tokens, 4000);
        assert!(!config.debug_errors);
    }

    #[test]
    fn test_missing_openai_key_fails() {
        assert!(ServerConfig::from_lookup(lookup(&[])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("DECKHAND_API_KEY", "secret"),
            ("MAX_ROUND_TRIPS", "3"),
            ("RETRY_BASE_DELAY_MS", "100"),
            ("DEBUG_ERRORS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.conversation.max_round_trips, 3);
        assert_eq!(config.deck.retry.base_delay, Duration::from_millis(100));
        assert!(config.debug_errors);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for (key, value) in [
            ("MAX_ROUND_TRIPS", "0"),
            ("MAX_ROUND_TRIPS", "many"),
            ("READINESS_THRESHOLD", "120"),
            ("RETRY_MAX_ATTEMPTS", "0"),
        ] {
            let result =
                ServerConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk"), (key, value)]));
            assert!(result.is_err(), "{}={} should be rejected", key, value);
        }
    }
}
