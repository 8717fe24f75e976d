pub mod publish;

use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};

use crate::{providers::nckvs::RecordStore, AppState};

pub fn build_router<S>(state: AppState<S>, max_content_length: usize) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route("/", get(publish::wsdl::<S>).post(publish::publish::<S>))
        .route("/health", get(publish::health))
        .layer(DefaultBodyLimit::max(max_content_length))
        .with_state(state)
}
