//! Blocking HTTP client for the advisory service, plus a thin worker that
//! runs one advice request off the event loop and reports back over a
//! channel.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::advisor::protocol::{Advice, AdvisorRequest};
use crate::template::{BoardTemplate, TemplateResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// The service answered but refused the request; carries its own
    /// error text when it provided one.
    #[error("advisor service error: {0}")]
    Server(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct AdvisorClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl AdvisorClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AdvisorError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the fixed board topology. Called once per session; a failure
    /// here blocks the screen until the user retries.
    pub fn fetch_template(&self) -> Result<BoardTemplate, AdvisorError> {
        let url = format!("{}/api/advisor/board-template", self.base_url);
        info!(%url, "fetching board template");
        let body = self.http.get(&url).send()?.text()?;
        let response: TemplateResponse = serde_json::from_str(&body)?;
        if !response.success {
            let message = response
                .error
                .clone()
                .unwrap_or_else(|| "template request failed".to_owned());
            warn!(%message, "template fetch refused");
            return Err(AdvisorError::Server(message));
        }
        debug!(
            tiles = response.tiles.len(),
            nodes = response.nodes.len(),
            edges = response.edges.len(),
            "board template received"
        );
        Ok(BoardTemplate::from_response(response))
    }

    /// Submit a snapshot and decode the recommendation. Failures leave the
    /// caller's state untouched; the message prefers server-provided text.
    pub fn request_advice(&self, request: &AdvisorRequest) -> Result<Advice, AdvisorError> {
        let url = format!("{}/api/advisor", self.base_url);
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        info!(
            %request_id,
            %url,
            buildings = request.buildings.len(),
            roads = request.roads.len(),
            advised = %request.advised_player,
            "requesting advice"
        );
        let body = self.http.post(&url).json(request).send()?.text()?;
        let advice: Advice = serde_json::from_str(&body)?;
        if !advice.success {
            let message = advice
                .error
                .clone()
                .unwrap_or_else(|| "advisor request failed".to_owned());
            warn!(%request_id, %message, "advisor refused the request");
            return Err(AdvisorError::Server(message));
        }
        debug!(
            %request_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            action = advice.action_type.as_deref().unwrap_or("-"),
            "advice received"
        );
        Ok(advice)
    }
}

/// Result of a background advice request, tagged with the sequence number
/// it was issued under so stale responses can be recognized and dropped.
#[derive(Debug)]
pub struct AdviceOutcome {
    pub seq: u64,
    pub result: Result<Advice, AdvisorError>,
}

/// Run one advice request on a detached thread. The receiver yields exactly
/// one outcome; if the UI has since moved on to a newer sequence number the
/// outcome is simply discarded.
pub fn spawn_advice_request(
    client: AdvisorClient,
    request: AdvisorRequest,
    seq: u64,
) -> mpsc::Receiver<AdviceOutcome> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = client.request_advice(&request);
        let _ = tx.send(AdviceOutcome { seq, result });
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = AdvisorClient::new("http://localhost:5001/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:5001");
    }

    #[test]
    fn server_errors_keep_their_text() {
        let err = AdvisorError::Server("board state invalid".to_owned());
        assert_eq!(err.to_string(), "advisor service error: board state invalid");
    }
}
