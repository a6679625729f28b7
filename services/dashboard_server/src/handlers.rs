//! Endpoint handlers
//!
//! Handlers are synchronous: the store does blocking IO, so the server
//! runs [`dispatch`] on the blocking pool.

use crate::config::Coords;
use crate::response::{error_response, json_response, method_not_allowed, text_response};
use crate::router::{route, Route};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response, StatusCode};
use serde::Serialize;
use sismo_core::time::Timestamp;
use sismo_core::{group_series, Bridge, HospitalView, ServiceStatus, ShelterView, SummaryView};
use sismo_db::Store;
use tracing::{debug, error};

/// State shared by every connection
pub struct AppState {
    pub store: Store,
    pub coords: Coords,
}

/// Body of `GET /api/summary/`
#[derive(Debug, Serialize)]
pub struct SummaryPayload {
    #[serde(flatten)]
    pub summary: SummaryView,
    pub coords: Coords,
    pub bridges: Vec<Bridge>,
    pub hospitals: Vec<HospitalView>,
    pub shelters: Vec<ShelterView>,
    pub services: Vec<ServiceStatus>,
}

/// Route a request and produce its response
pub fn dispatch(
    state: &AppState,
    method: &Method,
    path: &str,
    now: Timestamp,
) -> Response<Full<Bytes>> {
    let result = match route(method, path) {
        Route::Health => return text_response(StatusCode::OK, "ok"),
        Route::NotFound => return error_response(StatusCode::NOT_FOUND, "Not found"),
        Route::MethodNotAllowed { allow } => return method_not_allowed(allow),
        Route::Summary => summary(state, now).map(|p| json_response(StatusCode::OK, &p)),
        Route::Metrics => state
            .store
            .list_metric_points()
            .map(|points| json_response(StatusCode::OK, &group_series(points))),
        Route::Simulate => state
            .store
            .advance_simulation(now)
            .map(|outcome| json_response(StatusCode::OK, &outcome.next.derive())),
    };

    match result {
        Ok(response) => {
            debug!(%method, path, status = %response.status(), "request served");
            response
        }
        Err(e) => {
            error!(%method, path, error = %e, "request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Current summary with every resource attached
pub fn summary(state: &AppState, now: Timestamp) -> sismo_db::Result<SummaryPayload> {
    let store = &state.store;
    let current = store.current_or_default(now)?;
    Ok(SummaryPayload {
        summary: current.derive(),
        coords: state.coords,
        bridges: store.list_bridges()?,
        hospitals: store.list_hospitals()?.iter().map(|h| h.view()).collect(),
        shelters: store.list_shelters()?.iter().map(|s| s.view()).collect(),
        services: store.list_services()?,
    })
}
