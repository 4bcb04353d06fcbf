//! HTTP front end: upload a RAW file, then query the parsed case and its tables.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{info, warn};
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

use crate::case::Case;
use crate::grammar::Grammar;
use crate::parse::CaseParser;

#[derive(Clone)]
struct AppState {
    grammar: Arc<Grammar>,
    /// Last successfully uploaded case
    case: Arc<Mutex<Option<Case>>>,
}

// Helper: respond with JSON
fn json_ok(val: serde_json::Value) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        val.to_string(),
    )
        .into_response()
}

fn json_err(status: StatusCode, msg: &str) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        json!({"error": msg}).to_string(),
    )
        .into_response()
}

/// Header values, record counts and warnings of a case.
pub fn summary(case: &Case) -> serde_json::Value {
    let counts: serde_json::Map<String, serde_json::Value> = case
        .section_counts()
        .into_iter()
        .map(|(name, count)| (name.to_string(), json!(count)))
        .collect();
    json!({
        "case_name": case.case_name,
        "identification": case.identification,
        "revision": case.revision,
        "base_mva": case.base_mva,
        "base_frequency": case.base_frequency,
        "counts": counts,
        "warnings": case.warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
    })
}

// POST /api/upload  multipart/form-data with field "file"
async fn upload_raw(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let bytes = match field.bytes().await {
                Ok(b) => b,
                Err(_) => return json_err(StatusCode::BAD_REQUEST, "Failed to read file bytes"),
            };
            let content = String::from_utf8_lossy(&bytes);
            return match CaseParser::new(&state.grammar).parse_str(&content) {
                Ok(case) => {
                    let body = summary(&case);
                    *state.case.lock().await = Some(case);
                    json_ok(body)
                }
                Err(e) => {
                    warn!("Rejected upload: {}", e);
                    json_err(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string())
                }
            };
        }
    }
    json_err(StatusCode::BAD_REQUEST, "No 'file' field in multipart form")
}

// GET /api/case
async fn get_case(State(state): State<AppState>) -> Response {
    let guard = state.case.lock().await;
    match guard.as_ref() {
        Some(case) => json_ok(serde_json::to_value(case).unwrap_or(json!(null))),
        None => json_err(StatusCode::NOT_FOUND, "No case loaded"),
    }
}

// GET /api/tables
async fn list_tables(State(state): State<AppState>) -> Response {
    let guard = state.case.lock().await;
    match guard.as_ref() {
        Some(_) => json_ok(json!(Case::TABLE_NAMES)),
        None => json_err(StatusCode::NOT_FOUND, "No case loaded"),
    }
}

// GET /api/tables/{name}
async fn get_table(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let guard = state.case.lock().await;
    let case = match guard.as_ref() {
        Some(c) => c,
        None => return json_err(StatusCode::NOT_FOUND, "No case loaded"),
    };
    match case.table(&name) {
        Some(table) => json_ok(serde_json::to_value(table).unwrap_or(json!(null))),
        None => json_err(StatusCode::NOT_FOUND, &format!("Unknown table '{}'", name)),
    }
}

/// Routes of the service, parsing uploads with `grammar`.
pub fn router(grammar: Grammar) -> Router {
    let state = AppState {
        grammar: Arc::new(grammar),
        case: Arc::new(Mutex::new(None)),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/upload", post(upload_raw))
        .route("/api/case", get(get_case))
        .route("/api/tables", get(list_tables))
        .route("/api/tables/{name}", get(get_table))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(addr: &str, grammar: Grammar) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("pssraw server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(grammar)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    const BOUNDARY: &str = "pssraw-test-boundary";

    fn raw_case(header: &str, buses: &[&str]) -> String {
        let mut lines = vec![header, "RECORD 1", "RECORD 2"];
        lines.extend_from_slice(buses);
        lines.push("Q");
        lines.join("\n")
    }

    fn upload(content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"case.raw\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn summary_reports_counts_and_warnings() {
        let case = crate::parse_case_str("0,100.0,,0,1,60.0 / SUMMARY\nA\nB\nQ\n").unwrap();
        let body = summary(&case);
        assert_eq!(body["case_name"], "SUMMARY");
        assert_eq!(body["revision"], 33);
        assert_eq!(body["counts"]["buses"], 0);
        assert_eq!(body["warnings"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn change_data_upload_is_unprocessable() {
        let app = router(Grammar::v33());
        let (status, body) = send(&app, upload(&raw_case("1,100.0,33,0,1,60.0", &[]))).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().is_some_and(|e| e.contains("ic value")));

        let (status, _) = send(&app, get("/api/case")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn case_is_not_found_before_upload() {
        let app = router(Grammar::v33());

        let (status, body) = send(&app, get("/api/case")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No case loaded");

        let (status, _) = send(&app, get("/api/tables/bus")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn uploaded_case_is_served_as_tables() {
        let app = router(Grammar::v33());
        let buses = [
            "1,'BUS1',138.0,3,1,1,1,1.02,0.0",
            "2,'BUS2',138.0,1,1,1,1,1.0,-2.5",
        ];
        let content = raw_case("0,100.0,33,0,1,60.0 / UPLOADED", &buses);

        let (status, body) = send(&app, upload(&content)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["case_name"], "UPLOADED");
        assert_eq!(body["counts"]["buses"], 2);

        let (status, body) = send(&app, get("/api/case")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["buses"][1]["name"], "BUS2");

        let (status, table) = send(&app, get("/api/tables/bus")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(table["name"], "bus");
        assert_eq!(table["columns"][0], "index");
        let rows = table["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], 1);
        assert_eq!(rows[0][2], "BUS1");
        assert_eq!(rows[1][0], 1);
        assert_eq!(rows[1][2], "BUS2");

        let (status, body) = send(&app, get("/api/tables/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Unknown table 'nope'");
    }

    #[tokio::test]
    async fn upload_without_file_field_is_rejected() {
        let app = router(Grammar::v33());
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"other\"\r\n\r\n\
             x\r\n\
             --{BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
