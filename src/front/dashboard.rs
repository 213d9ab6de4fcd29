//! Dashboard endpoints: current snapshots and the live event stream.

use super::{AppState, errors};
use futures::stream;
use ntex::{util::Bytes, web};
use tokio::sync::broadcast::error::RecvError;

/// Current snapshot of the three cached resources.
#[web::get("/api/state")]
pub async fn get_state(
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let state = app_state
        .store
        .get_state()
        .map_err(|err| errors::ServerError::InternalServerError(err.to_string()))?;

    Ok(web::HttpResponse::Ok().json(&state))
}

/// Live event stream (SSE), one connection per open dashboard view.
///
/// Registers a broadcaster subscriber and relays each message as an SSE
/// frame. A lagging connection skips the messages it missed and keeps
/// streaming; the stream ends when the broadcaster goes away.
#[web::get("/events")]
pub async fn events(
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let subscriber = app_state.broadcaster.subscribe();

    let body = stream::unfold(subscriber, |mut subscriber| async move {
        loop {
            match subscriber.recv().await {
                Ok(message) => {
                    let Ok(data) = serde_json::to_string(&message.payload) else {
                        continue;
                    };
                    let frame = format!("event: {}\ndata: {}\n\n", message.channel, data);
                    return Some((Ok::<_, web::Error>(Bytes::from(frame)), subscriber));
                }
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("dashboard subscriber lagged, skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(web::HttpResponse::Ok()
        .content_type("text/event-stream")
        .set_header("cache-control", "no-cache")
        .streaming(Box::pin(body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customer::{CustomerSnapshot, VerificationStatus};
    use crate::services::broadcast::EventBroadcaster;
    use crate::state::{StateStore, memory::InMemoryStateStore};
    use ntex::http::StatusCode;
    use ntex::web::test;
    use serde_json::json;
    use std::sync::Arc;

    #[ntex::test]
    async fn test_get_state_serves_cached_snapshots() {
        let store = Arc::new(InMemoryStateStore::new());
        store
            .set_customer(CustomerSnapshot {
                id: "cust_1".into(),
                name: "Ada Lovelace".into(),
                email: "ada@example.com".into(),
                phone: "+15555550100".into(),
                verification_status: VerificationStatus::Verified,
                risk_score: Some(0.1),
            })
            .unwrap();

        let app = test::init_service(
            ntex::web::App::new()
                .state(AppState {
                    store,
                    broadcaster: EventBroadcaster::default(),
                    webhook_secret: "whsec_test".into(),
                })
                .configure(crate::front::routes::dashboard),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/state").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let state: serde_json::Value =
            serde_json::from_slice(&test::read_body(resp).await).unwrap();
        assert_eq!(state["customer"]["id"], json!("cust_1"));
        assert_eq!(state["customer"]["verification_status"], json!("verified"));
        assert_eq!(state["paykey"], json!(null));
        assert_eq!(state["charge"], json!(null));
    }
}
