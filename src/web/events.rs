//! Server-Sent Events (SSE) stream of store changes - `/api/events`

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use serde::Serialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::store::{ChangeKind, StoreChange};
use crate::web::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Connected {
    version: u64,
    records: usize,
    file_name: Option<String>,
}

fn event_name(change: &StoreChange) -> &'static str {
    match change.kind {
        ChangeKind::Replaced { .. } => "replaced",
        ChangeKind::Upserted { .. } => "upserted",
        ChangeKind::Removed { .. } => "removed",
        ChangeKind::StatusChanged { .. } => "status-changed",
    }
}

pub async fn api_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Subscribe before reading the snapshot so no change falls in between
    let rx = state.store.subscribe();
    let snapshot = state.store.snapshot();

    let changes = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(change) => {
            let data = serde_json::to_string(&change).unwrap_or_default();
            Some(Ok::<_, Infallible>(
                Event::default().event(event_name(&change)).data(data),
            ))
        }
        // Lagged receivers pick up the next change; clients refetch on version gaps
        Err(_) => None,
    });

    let connected = Connected {
        version: snapshot.version,
        records: snapshot.records.len(),
        file_name: snapshot.file_name,
    };
    let initial_data = serde_json::to_string(&connected).unwrap_or_default();
    let initial = futures::stream::once(async move {
        Ok(Event::default().event("connected").data(initial_data))
    });

    Sse::new(initial.chain(changes)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
