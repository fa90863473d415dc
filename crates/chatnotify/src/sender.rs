use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::card::Card;
use crate::error::NotifyError;

/// Webhook body carrying a single card.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    pub text: &'a str,
    #[serde(rename = "cardsV2")]
    pub cards_v2: Vec<CardEntry<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardEntry<'a> {
    pub card_id: &'a str,
    pub card: NamedCard<'a>,
}

#[derive(Debug, Serialize)]
pub struct NamedCard<'a> {
    pub name: &'a str,
    #[serde(flatten)]
    pub card: &'a Card,
}

impl<'a> Envelope<'a> {
    pub fn new(name: &'a str, card: &'a Card) -> Self {
        Envelope {
            text: "",
            cards_v2: vec![CardEntry {
                card_id: name,
                card: NamedCard { name, card },
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed {
        reason: String,
        request_body: String,
        response_body: String,
    },
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered)
    }

    pub fn into_result(self) -> Result<(), NotifyError> {
        match self {
            DeliveryOutcome::Delivered => Ok(()),
            DeliveryOutcome::Failed {
                reason,
                request_body,
                response_body,
            } => Err(NotifyError::Delivery {
                reason,
                request_body,
                response_body,
            }),
        }
    }
}

/// POST the card to `url` once. Every failure is folded into the outcome.
pub async fn deliver(
    client: &reqwest::Client,
    url: &str,
    name: &str,
    card: &Card,
) -> DeliveryOutcome {
    let request_body = match serde_json::to_string(&Envelope::new(name, card)) {
        Ok(body) => body,
        Err(err) => {
            return DeliveryOutcome::Failed {
                reason: format!("serializing card: {err}"),
                request_body: String::new(),
                response_body: String::new(),
            }
        }
    };
    debug!(%url, body = %request_body, "sending notification");

    let resp = match client
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .body(request_body.clone())
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(err) => {
            warn!(%err, "webhook request failed");
            return DeliveryOutcome::Failed {
                reason: err.to_string(),
                request_body,
                response_body: String::new(),
            };
        }
    };

    let status = resp.status();
    if status.is_success() {
        info!(%status, "notification delivered");
        return DeliveryOutcome::Delivered;
    }

    let response_body = resp.text().await.unwrap_or_default();
    warn!(%status, "webhook rejected notification");
    DeliveryOutcome::Failed {
        reason: format!("webhook responded with {status}"),
        request_body,
        response_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::build_card;
    use crate::config::Assets;
    use crate::context::RunContext;
    use crate::input::NotificationRequest;
    use assert_matches::assert_matches;
    use axum::http::{header, HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde_json::{json, Value};
    use tokio::sync::mpsc;

    fn sample_card(name: &str) -> Card {
        let req = NotificationRequest {
            name: name.into(),
            url: String::new(),
            validation_id: "v-1".into(),
            validation_status: "failure".into(),
            validation_url: "https://ci.example/v-1".into(),
            validation_details: "2 files need formatting".into(),
        };
        let ctx = RunContext {
            owner: "acme".into(),
            repo: "widgets".into(),
            event_name: "push".into(),
            sha: "abc123".into(),
            ..Default::default()
        };
        build_card(&req, &ctx, &Assets::default())
    }

    /// Start a webhook stub answering every POST with `status` and `reply`.
    /// Received (content type, body) pairs arrive on the returned channel.
    async fn spawn_hook(
        status: StatusCode,
        reply: &'static str,
    ) -> (String, mpsc::UnboundedReceiver<(String, String)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Router::new().route(
            "/hook",
            post(move |headers: HeaderMap, body: String| {
                let tx = tx.clone();
                async move {
                    let content_type = headers
                        .get(header::CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    let _ = tx.send((content_type, body));
                    (status, reply)
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
        (format!("http://{addr}/hook"), rx)
    }

    #[test]
    fn envelope_shape() {
        let card = sample_card("lint");
        let value = serde_json::to_value(Envelope::new("lint", &card)).unwrap();
        assert_eq!(value["text"], json!(""));
        let entry = &value["cardsV2"][0];
        assert_eq!(entry["cardId"], json!("lint"));
        assert_eq!(entry["card"]["name"], json!("lint"));
        assert_eq!(entry["card"]["header"]["title"], json!("lint"));
        assert_eq!(entry["card"]["sections"].as_array().unwrap().len(), 3);
        assert_eq!(value["cardsV2"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ok_response_is_success() {
        let (url, mut rx) = spawn_hook(StatusCode::OK, "{}").await;
        let card = sample_card("lint");

        let outcome = deliver(&reqwest::Client::new(), &url, "lint", &card).await;
        assert_eq!(outcome, DeliveryOutcome::Delivered);
        assert!(outcome.is_success());

        let (content_type, body) = rx.recv().await.expect("request received");
        assert_eq!(content_type, "application/json");
        let sent: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(sent["cardsV2"][0]["cardId"], json!("lint"));
        assert!(rx.try_recv().is_err(), "exactly one request");
    }

    #[tokio::test]
    async fn server_error_is_failure_with_bodies() {
        let (url, mut rx) =
            spawn_hook(StatusCode::INTERNAL_SERVER_ERROR, "{\"error\":\"boom\"}").await;
        let card = sample_card("lint");

        let outcome = deliver(&reqwest::Client::new(), &url, "lint", &card).await;
        assert!(!outcome.is_success());
        assert_matches!(
            &outcome,
            DeliveryOutcome::Failed { reason, request_body, response_body } => {
                assert!(reason.contains("500"));
                assert!(request_body.contains("\"cardsV2\""));
                assert_eq!(response_body, "{\"error\":\"boom\"}");
            }
        );

        rx.recv().await.expect("request received");
        assert!(rx.try_recv().is_err(), "no retry");

        let err = outcome.into_result().unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn unreachable_destination_is_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let card = sample_card("lint");
        let url = format!("http://{addr}/hook");
        let outcome = deliver(&reqwest::Client::new(), &url, "lint", &card).await;
        assert_matches!(
            outcome,
            DeliveryOutcome::Failed { ref response_body, ref request_body, .. } => {
                assert!(response_body.is_empty());
                assert!(!request_body.is_empty());
            }
        );
    }

    #[tokio::test]
    async fn malformed_url_is_failure() {
        let card = sample_card("lint");
        let outcome = deliver(&reqwest::Client::new(), "not a url", "lint", &card).await;
        assert!(!outcome.is_success());
    }
}
