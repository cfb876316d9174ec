//! Blocking HTTP implementations of the catalog and booking collaborators.
use super::{BookingApi, BookingReceipt, ServiceCatalog};
use crate::config::ClientConfig;
use crate::error::{CatalogError, SubmissionError};
use crate::submission::SubmissionPayload;
use serde_json::Value;
use std::time::Duration;
use ureq::Agent;

fn agent(config: &ClientConfig) -> Agent {
    let config = Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
        .http_status_as_error(false)
        .build();
    Agent::new_with_config(config)
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Best human-readable message from an error body.
///
/// JSON bodies contribute their `message` or `error` string; anything else is
/// used verbatim, falling back to the status line when empty.
pub fn error_message(status: u16, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["message", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_string))
    });
    from_json
        .or_else(|| Some(body.trim().to_string()).filter(|text| !text.is_empty()))
        .unwrap_or_else(|| format!("request failed with status {status}"))
}

/// `GET {base}/services/{idOrSlug}`.
pub struct HttpServiceCatalog {
    agent: Agent,
    base_url: String,
    user_agent: String,
}

impl HttpServiceCatalog {
    pub fn new(config: &ClientConfig) -> Self {
        HttpServiceCatalog {
            agent: agent(config),
            base_url: config.api_base_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl ServiceCatalog for HttpServiceCatalog {
    fn fetch_service(&self, id_or_slug: &str) -> Result<Value, CatalogError> {
        let url = endpoint(&self.base_url, &format!("services/{id_or_slug}"));
        tracing::debug!(%url, "fetching service");
        let mut response = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .map_err(|err| CatalogError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| CatalogError::Transport(err.to_string()))?;
        match status {
            200..=299 => {
                serde_json::from_str(&body).map_err(|err| CatalogError::Decode(err.to_string()))
            }
            404 => Err(CatalogError::NotFound(id_or_slug.to_string())),
            _ => Err(CatalogError::Status {
                status,
                message: error_message(status, &body),
            }),
        }
    }
}

/// `POST {base}/bookings`.
pub struct HttpBookingApi {
    agent: Agent,
    base_url: String,
    user_agent: String,
}

impl HttpBookingApi {
    pub fn new(config: &ClientConfig) -> Self {
        HttpBookingApi {
            agent: agent(config),
            base_url: config.api_base_url.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl BookingApi for HttpBookingApi {
    fn submit(&self, payload: &SubmissionPayload) -> Result<BookingReceipt, SubmissionError> {
        let url = endpoint(&self.base_url, "bookings");
        tracing::debug!(%url, service = %payload.service_slug, "submitting booking");
        let mut response = self
            .agent
            .post(&url)
            .header("Accept", "application/json")
            .header("User-Agent", self.user_agent.as_str())
            .send_json(payload)
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;
        if !(200..=299).contains(&status) {
            return Err(SubmissionError::Rejected {
                status,
                message: error_message(status, &body),
            });
        }
        serde_json::from_str(&body).map_err(|err| {
            SubmissionError::Transport(format!("unreadable booking confirmation: {err}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slashes() {
        assert_eq!(
            endpoint("https://api.example.test/v1/", "/services/cleaning"),
            "https://api.example.test/v1/services/cleaning"
        );
        assert_eq!(endpoint("http://h", "bookings"), "http://h/bookings");
    }

    #[test]
    fn error_message_prefers_json_fields() {
        assert_eq!(
            error_message(422, r#"{"message": "Slot taken", "error": "conflict"}"#),
            "Slot taken"
        );
        assert_eq!(error_message(500, r#"{"error": "boom"}"#), "boom");
        assert_eq!(error_message(502, "Bad gateway\n"), "Bad gateway");
        assert_eq!(error_message(503, "  "), "request failed with status 503");
    }
}
