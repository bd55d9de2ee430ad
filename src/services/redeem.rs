//! Redemption client adapter.
//!
//! Issues the idempotent "redeem this code" call and classifies every
//! possible outcome into the taxonomy the session state machine
//! understands. Nothing propagates out of here as a fault: transport
//! errors, auth absence, and unexpected payloads all become
//! `Rejected(Other(..))`.

use crate::auth::TokenProvider;
use crate::config::ApiConfig;
use crate::types::{RedemptionOutcome, RejectReason};
use log::{debug, warn};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::sync::LazyLock;

/// Compiled regex for the "user already scanned" server message.
static RE_ALREADY_SCANNED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ID (\d+)").expect("Invalid regex"));

/// Seam between the session pipeline and the network. Tests substitute
/// fakes; production uses `RedemptionClient`.
pub trait Redeemer {
    fn redeem(&self, code: &str) -> impl Future<Output = RedemptionOutcome> + Send;
}

/// Success payload of `POST /scan/`.
#[derive(Debug, Deserialize)]
struct ScanResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Error payload of any non-2xx API response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

pub struct RedemptionClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl RedemptionClient {
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, anyhow::Error> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            tokens,
        })
    }

    async fn try_redeem(&self, code: &str) -> Result<RedemptionOutcome, anyhow::Error> {
        // Missing token short-circuits locally: no network call.
        let token = match self.tokens.current_bearer_token() {
            Some(token) => token,
            None => {
                debug!("Redeem without auth token, rejecting locally");
                return Ok(RedemptionOutcome::Rejected(RejectReason::Other(
                    "not authenticated".to_string(),
                )));
            }
        };

        let response = self
            .http
            .post(format!("{}/scan/", self.base_url))
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&serde_json::json!({ "barcode_data": code }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: ScanResponse = response.json().await?;
            let message = body.message.unwrap_or_default();
            let points = parse_awarded_points(&message);
            return Ok(RedemptionOutcome::Accepted {
                points_awarded: points,
                message,
            });
        }

        let detail = match response.json::<ErrorBody>().await {
            Ok(body) => body.detail,
            Err(_) => format!("HTTP {status}"),
        };
        Ok(RedemptionOutcome::Rejected(classify_rejection(&detail)))
    }
}

impl Redeemer for RedemptionClient {
    /// Single bearer-authenticated call. Idempotency per code+user is a
    /// server contract this adapter relies on; no retry here.
    async fn redeem(&self, code: &str) -> RedemptionOutcome {
        match self.try_redeem(code).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Redeem call failed for {code}: {e}");
                RedemptionOutcome::Rejected(RejectReason::Other(e.to_string()))
            }
        }
    }
}

/// Map a server error `detail` onto the rejection taxonomy.
///
/// The server reports a duplicate scan as "User with ID N already
/// scanned this barcode" (Russian deployments use the same shape with
/// "ID N" embedded), and an unknown code with a "not in database"
/// message. Everything else passes through verbatim.
pub fn classify_rejection(detail: &str) -> RejectReason {
    if let Some(caps) = RE_ALREADY_SCANNED.captures(detail) {
        if let Ok(by_user_id) = caps[1].parse::<u64>() {
            return RejectReason::AlreadyRedeemed { by_user_id };
        }
    }
    if detail.contains("not in database") || detail.contains("нет в базе") {
        return RejectReason::UnknownCode;
    }
    RejectReason::Other(detail.to_string())
}

/// Extract the awarded point count from the server's award message:
/// the first integer in the text, 0 when absent.
pub fn parse_awarded_points(message: &str) -> u32 {
    static RE_POINTS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\d+").expect("Invalid regex"));
    RE_POINTS
        .find(message)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
