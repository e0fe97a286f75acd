use std::net::SocketAddr;
use std::path::{ Path, PathBuf };
use std::sync::Arc;

use axum::extract::{ Multipart, State };
use axum::http::StatusCode;
use axum::response::{ IntoResponse, Response };
use axum::routing::post;
use axum::{ Json, Router };
use log::{ error, info, warn };
use serde_json::json;
use tokio::net::TcpListener;

use crate::errors::VizResult;
use crate::implementations::pipeline::GenerationPipeline;

/// Multipart field carrying the task file
pub const FILE_FIELD: &str = "file";

pub struct AppState {
    pub pipeline: Arc<GenerationPipeline>,
    pub uploads_dir: PathBuf,
}

impl AppState {
    pub fn new(pipeline: Arc<GenerationPipeline>, uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            pipeline,
            uploads_dir: uploads_dir.into(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/upload", post(upload_handler)).with_state(state)
}

/// Create the uploads directory and serve on `listener` until the process exits
pub async fn serve_listener(listener: TcpListener, state: Arc<AppState>) -> VizResult<()> {
    tokio::fs::create_dir_all(&state.uploads_dir).await?;
    if let Ok(addr) = listener.local_addr() {
        info!("Upload endpoint listening on http://{}/upload", addr);
    }
    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> VizResult<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_listener(listener, state).await
}

fn bad_request(detail: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail.into() }))).into_response()
}

/// Bare file name of an uploaded file, with any directory components dropped
pub fn sanitize_filename(name: &str) -> Option<String> {
    let normalized = name.replace('\\', "/");
    Path::new(&normalized)
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

async fn upload_handler(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return bad_request("No file provided");
            }
            Err(e) => {
                warn!("Rejected malformed upload: {}", e);
                return bad_request(format!("Invalid multipart body: {}", e));
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let Some(filename) = field.file_name().and_then(sanitize_filename) else {
            return bad_request("No selected file");
        };

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                return bad_request(format!("Could not read uploaded file: {}", e));
            }
        };

        let path = state.uploads_dir.join(&filename);
        if let Err(e) = save_upload(&state.uploads_dir, &path, &data).await {
            error!("Failed to save upload {}: {}", path.display(), e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": format!("Could not save file: {}", e) })),
            ).into_response();
        }
        info!("Saved upload {} ({} bytes)", path.display(), data.len());

        let pipeline = Arc::clone(&state.pipeline);
        tokio::spawn(async move {
            match pipeline.run(&path).await {
                Ok(outcome) => {
                    info!("{} finished, artifact at {}", outcome.run_id, outcome.generated_path.display());
                }
                Err(e) => error!("Pipeline run for {} failed: {}", path.display(), e),
            }
        });

        return (
            StatusCode::OK,
            Json(json!({ "message": "File uploaded successfully", "filename": filename })),
        ).into_response();
    }
}

async fn save_upload(dir: &Path, path: &Path, data: &[u8]) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(path, data).await
}
