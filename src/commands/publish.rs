use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    core::{errors::AppError, types::UpsertOutcome},
    providers::nckvs::RecordStore,
    soap::{
        envelope::{parse_publish_request, render_fault, render_publish_response, FaultCode},
        wsdl::render_wsdl,
    },
    AppState,
};

const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

fn xml_response(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, XML_CONTENT_TYPE)], body).into_response()
}

fn fault_response(err: &AppError) -> Response {
    let (status, code) = if err.is_client_fault() {
        (StatusCode::BAD_REQUEST, FaultCode::Client)
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, FaultCode::Server)
    };
    xml_response(status, render_fault(code, &format!("{}: {err}", err.code())))
}

pub async fn publish<S>(State(state): State<AppState<S>>, body: String) -> Response
where
    S: RecordStore + 'static,
{
    let request_id = Uuid::new_v4();
    tracing::info!(target: "request_body", %request_id, "{body}");

    let message = match parse_publish_request(&body) {
        Ok(message) => message,
        Err(err) => {
            tracing::warn!(%request_id, error = %err, "rejected publish envelope");
            return fault_response(&err);
        }
    };

    match state.publisher.publish(&message).await {
        Ok(outcome) => {
            let written = !matches!(outcome, UpsertOutcome::Unchanged);
            tracing::debug!(%request_id, written, "publish completed");
            xml_response(StatusCode::OK, render_publish_response(0))
        }
        Err(err) => {
            tracing::error!(%request_id, code = err.code(), error = ?err, "publish failed: {err}");
            fault_response(&err)
        }
    }
}

pub async fn wsdl<S>(State(state): State<AppState<S>>, RawQuery(query): RawQuery) -> Response
where
    S: RecordStore + 'static,
{
    let wants_wsdl = query.as_deref().is_some_and(|query| {
        query
            .split('&')
            .any(|param| param.eq_ignore_ascii_case("wsdl") || param.to_ascii_lowercase().starts_with("wsdl="))
    });
    if !wants_wsdl {
        return (StatusCode::BAD_REQUEST, "POST a SOAP envelope or GET ?wsdl").into_response();
    }
    xml_response(StatusCode::OK, render_wsdl(&state.service_location))
}

pub async fn health() -> &'static str {
    "ok"
}
