//! HTTP transport for JSON-RPC endpoints
//!
//! Sends a prepared request, logs traffic, classifies transport failures and
//! retries the transient ones. Envelope parsing lives with each backend.

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP helper functions
pub struct HttpUtils;

impl HttpUtils {
    /// Send one request and return the status code and body.
    ///
    /// # Arguments
    /// * `request_builder` - fully configured request (URL, headers, body)
    /// * `provider_name` - backend name (for logs and errors)
    /// * `rpc_method` - JSON-RPC method name (for logs)
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        rpc_method: &str,
    ) -> Result<(u16, String), ProviderError> {
        log::debug!("[{provider_name}] -> {rpc_method}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_builder() {
                // malformed endpoint: nothing to talk to
                ProviderError::NotInstalled {
                    provider: provider_name.to_string(),
                }
            } else if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Rate limited (HTTP 429), retry_after={retry_after:?}");
            return Err(ProviderError::RateLimited {
                provider: provider_name.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Gateway error (HTTP {status_code})");
            return Err(ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{provider_name}] <- {rpc_method} (HTTP {status_code}) {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON response body.
    pub fn parse_json<T>(response_text: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{provider_name}] JSON parse failed: {e}");
            log::error!(
                "[{provider_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }

    /// Send a request, retrying transient failures.
    ///
    /// # Retry strategy
    /// - Only [`ProviderError::is_transient`] errors are retried
    /// - `Retry-After` is honored (capped at 30s), otherwise exponential
    ///   backoff: 100ms, 200ms, 400ms, ... (capped at 10s)
    /// - `max_retries == 0` sends exactly once
    pub async fn execute_request_with_retry(
        request_builder: RequestBuilder,
        provider_name: &str,
        rpc_method: &str,
        max_retries: u32,
    ) -> Result<(u16, String), ProviderError> {
        if max_retries == 0 {
            return Self::execute_request(request_builder, provider_name, rpc_method).await;
        }

        let mut last_error = None;

        for attempt in 0..=max_retries {
            let Some(req) = request_builder.try_clone() else {
                log::warn!("[{provider_name}] Cannot clone request, disabling retry");
                return Self::execute_request(request_builder, provider_name, rpc_method).await;
            };

            match Self::execute_request(req, provider_name, rpc_method).await {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < max_retries && e.is_transient() => {
                    let delay = retry_delay(&e, attempt);
                    log::warn!(
                        "[{}] {} failed (attempt {}/{}), retrying in {:.1}s: {}",
                        provider_name,
                        rpc_method,
                        attempt + 1,
                        max_retries,
                        delay.as_secs_f32(),
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::NetworkError {
            provider: provider_name.to_string(),
            detail: "All retries exhausted with no error captured".to_string(),
        }))
    }
}

/// Retry delay: `retry_after` when rate limited, otherwise exponential backoff.
fn retry_delay(error: &ProviderError, attempt: u32) -> Duration {
    if let ProviderError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(30))
    } else {
        backoff_delay(attempt)
    }
}

/// 100ms doubled per attempt, capped at 10 seconds.
fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20);
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}
