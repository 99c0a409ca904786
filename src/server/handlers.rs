//! Request handlers
//!
//! Thin adapters between HTTP requests and the catalog/storage modules.
//! Blocking filesystem work runs on the blocking thread pool.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Form, FromRequest, Multipart, Path, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use log::{debug, error};
use serde::Deserialize;
use std::io::{self, SeekFrom};
use std::sync::Arc;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::catalog::{self, CatalogQuery, KindFilter};
use crate::error::StorageError;
use crate::error::handlers::NOT_FOUND_PAGE;
use crate::pagination::{PAGE_SIZE, paginate};
use crate::server::core::AppState;
use crate::server::responses::ListingResponse;
use crate::storage::{delete_path, prepare_file_retrieval, store_upload};

/// Query parameters of a folder listing
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Kept as text so a malformed value falls back to page 1
    pub page: Option<String>,
}

/// Form body of a delete request
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub path: Option<String>,
}

/// `GET /`
pub async fn index(
    State(state): State<AppState>,
    params: Result<Query<ListingParams>, QueryRejection>,
) -> Result<Json<ListingResponse>, StorageError> {
    show_folder(state, String::new(), listing_params(params)).await
}

/// `GET /folder/*subpath`
pub async fn folder(
    State(state): State<AppState>,
    Path(subpath): Path<String>,
    params: Result<Query<ListingParams>, QueryRejection>,
) -> Result<Json<ListingResponse>, StorageError> {
    show_folder(state, subpath, listing_params(params)).await
}

/// A query string that cannot be decoded renders the unfiltered first page
fn listing_params(params: Result<Query<ListingParams>, QueryRejection>) -> ListingParams {
    match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            debug!("Ignoring malformed listing query: {}", rejection);
            ListingParams::default()
        }
    }
}

async fn show_folder(
    state: AppState,
    subpath: String,
    params: ListingParams,
) -> Result<Json<ListingResponse>, StorageError> {
    let dir = state.sandbox.resolve(&subpath)?;

    let kind = KindFilter::parse(params.kind.as_deref().unwrap_or("all"));
    let query = CatalogQuery::new(subpath.clone())
        .with_search(params.search.as_deref())
        .with_kind(kind);
    let page = parse_page(params.page.as_deref());

    let sandbox = Arc::clone(&state.sandbox);
    let catalog_query = query.clone();
    let listing = run_blocking(move || {
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                error!("Failed to create folder {}: {}", dir.display(), e);
                StorageError::Io(e)
            })?;
        }
        catalog::list(&sandbox, &catalog_query)
    })
    .await?;

    if let Some(diagnostic) = &listing.diagnostic {
        debug!("Listing of '{}' degraded: {:?}", subpath, diagnostic);
    }

    let paged = paginate(listing.items, page, PAGE_SIZE);

    Ok(Json(ListingResponse {
        current: subpath,
        items: paged.items,
        pagination: paged.page,
        search_query: query.search.unwrap_or_default(),
        file_type_filter: kind.as_str().to_string(),
    }))
}

/// Positive page number, defaulting to 1
fn parse_page(page: Option<&str>) -> usize {
    page.and_then(|p| p.trim().parse::<usize>().ok())
        .filter(|&p| p >= 1)
        .unwrap_or(1)
}

/// `POST /upload` with multipart fields `file` and `folder`
///
/// The file part is spooled to an anonymous temp file first, since the
/// target folder may arrive after it.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<StatusCode, StorageError> {
    let max_bytes = state.config.max_upload_bytes();
    let mut folder = String::new();
    let mut spooled: Option<(String, tokio::fs::File)> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                if file_name.is_empty() {
                    return Err(StorageError::InvalidInput("No file selected"));
                }

                let mut spool = tempfile::tempfile()
                    .map(tokio::fs::File::from_std)
                    .map_err(StorageError::UploadFailed)?;

                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| multipart_error(e, max_bytes))?
                {
                    spool
                        .write_all(&chunk)
                        .await
                        .map_err(StorageError::UploadFailed)?;
                }

                spool.flush().await.map_err(StorageError::UploadFailed)?;
                spool
                    .seek(SeekFrom::Start(0))
                    .await
                    .map_err(StorageError::UploadFailed)?;

                spooled = Some((file_name, spool));
            }
            Some("folder") => {
                folder = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(e, max_bytes))?;
            }
            _ => {}
        }
    }

    let (file_name, mut spool) = spooled.ok_or(StorageError::InvalidInput("No file selected"))?;

    store_upload(&state.sandbox, &folder, &file_name, &mut spool).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn multipart_error(err: MultipartError, max_bytes: u64) -> StorageError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        StorageError::OversizedPayload { max_bytes }
    } else {
        debug!("Rejected malformed upload: {}", err);
        StorageError::InvalidInput("Malformed upload")
    }
}

/// `POST /delete` with field `path`, urlencoded or multipart
pub async fn delete(
    State(state): State<AppState>,
    request: Request,
) -> Result<StatusCode, StorageError> {
    let path = delete_target(request, &state).await?;
    let sandbox = Arc::clone(&state.sandbox);

    run_blocking(move || delete_path(&sandbox, &path)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Reads the `path` field; a missing or unreadable body counts as empty
async fn delete_target(request: Request, state: &AppState) -> Result<String, StorageError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    if !is_multipart {
        return match Form::<DeleteParams>::from_request(request, state).await {
            Ok(Form(params)) => Ok(params.path.unwrap_or_default()),
            Err(rejection) => {
                debug!("Delete request without form body: {}", rejection);
                Ok(String::new())
            }
        };
    }

    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|e| {
            debug!("Rejected malformed delete request: {}", e);
            StorageError::InvalidInput("Path required")
        })?;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Rejected malformed delete request: {}", e);
        StorageError::InvalidInput("Path required")
    })? {
        if field.name() == Some("path") {
            return field
                .text()
                .await
                .map_err(|_| StorageError::InvalidInput("Path required"));
        }
    }

    Ok(String::new())
}

/// `GET /files/*path`; ranges, caching headers and content type are left to `ServeFile`
pub async fn serve_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
    request: Request,
) -> Result<Response, StorageError> {
    let sandbox = Arc::clone(&state.sandbox);
    let target = run_blocking(move || prepare_file_retrieval(&sandbox, &path)).await?;

    debug!(
        "Serving {} from {}",
        target.file_name,
        target.directory.display()
    );

    match ServeFile::new(&target.file_path).oneshot(request).await {
        Ok(response) => Ok(response.into_response()),
        Err(never) => match never {},
    }
}

/// Fallback for unmatched routes
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, NOT_FOUND_PAGE)
}

/// Runs filesystem work on the blocking pool
async fn run_blocking<T, F>(work: F) -> Result<T, StorageError>
where
    F: FnOnce() -> Result<T, StorageError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        error!("Blocking filesystem task failed: {}", e);
        StorageError::Io(io::Error::other(e))
    })?
}
