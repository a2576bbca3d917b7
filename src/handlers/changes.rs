use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use tokio::sync::broadcast;

use crate::AppState;

/// Server-sent change notices. Emits one `change` event naming the data
/// key (master_items, master_locations, master_suppliers, local_orders)
/// whenever a write lands, so clients can refetch only what moved.
#[utoipa::path(
    get,
    path = "/api/v1/changes",
    summary = "Change-notice stream",
    responses(
        (status = 200, description = "SSE stream of change notices", content_type = "text/event-stream"),
    )
)]
pub async fn change_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.store.subscribe();
    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(key) => {
                    let event = Event::default().event("change").data(key.as_str());
                    return Some((Ok(event), rx));
                }
                // A slow consumer only misses notices, never data; resume.
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
