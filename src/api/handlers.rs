// Document and upload handlers

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_TYPE;
use hyper::{Request, Response, StatusCode};
use multer::{Constraints, Multipart, SizeLimit};
use serde_json::Value;

use super::response::{error_response, json_response, text_response};
use super::types::{SuccessResponse, UploadResponse};
use crate::config::AppState;
use crate::logger;
use crate::store::{DocumentKind, StoreError, WriteAck};
use crate::upload::{UploadError, UploadHandler};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Room left in the multipart stream for boundaries, part headers and form fields
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

/// GET: return the stored document, or its seeded default if it has one
pub async fn get_document(state: &AppState, kind: DocumentKind) -> Response<Full<Bytes>> {
    let store = state.documents.get(kind);
    match store.read().await {
        Ok(doc) => {
            logger::log_api_request("GET", kind.route(), 200);
            json_response(StatusCode::OK, &doc)
        }
        Err(e @ StoreError::NotFound { .. }) => match kind.default_value() {
            Some(default) => {
                logger::log_api_request("GET", kind.route(), 200);
                json_response(StatusCode::OK, &default)
            }
            None => store_failure("GET", kind, &e, false),
        },
        Err(e) => store_failure("GET", kind, &e, false),
    }
}

/// POST: replace the document with the JSON request body
pub async fn put_document<B>(
    req: Request<B>,
    state: &AppState,
    kind: DocumentKind,
) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let limit = usize::try_from(state.config.http.max_json_body_size).unwrap_or(usize::MAX);

    let whole_body = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!(
                "JSON body for {} exceeds {limit} bytes",
                kind.route()
            ));
            logger::log_api_request("POST", kind.route(), 413);
            return error_response(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read body for {}: {e}", kind.route()));
            logger::log_api_request("POST", kind.route(), 400);
            return error_response(StatusCode::BAD_REQUEST, "Failed to read request body");
        }
    };

    let doc: Value = match serde_json::from_slice(&whole_body) {
        Ok(v) => v,
        Err(e) => {
            logger::log_warning(&format!("Invalid JSON for {}: {e}", kind.route()));
            logger::log_api_request("POST", kind.route(), 400);
            return error_response(StatusCode::BAD_REQUEST, &format!("Invalid JSON: {e}"));
        }
    };

    // Documents are always objects or arrays
    if !(doc.is_object() || doc.is_array()) {
        logger::log_warning(&format!("Rejected non-container JSON for {}", kind.route()));
        logger::log_api_request("POST", kind.route(), 400);
        return error_response(
            StatusCode::BAD_REQUEST,
            "Invalid JSON: expected object or array",
        );
    }

    let store = state.documents.get(kind);
    match store.write(&doc).await {
        Ok(bytes) => {
            logger::log_document_written(kind, store.path(), bytes);
            logger::log_api_request("POST", kind.route(), 200);
            match kind.write_ack() {
                WriteAck::Status => text_response(StatusCode::OK, "OK"),
                WriteAck::Success => json_response(StatusCode::OK, &SuccessResponse::OK),
            }
        }
        Err(e) => store_failure("POST", kind, &e, true),
    }
}

fn store_failure(
    method: &str,
    kind: DocumentKind,
    err: &StoreError,
    writing: bool,
) -> Response<Full<Bytes>> {
    let status = err.status_code();
    if status.is_server_error() {
        logger::log_error(&err.to_string());
    } else {
        logger::log_warning(&err.to_string());
    }
    logger::log_api_request(method, kind.route(), status.as_u16());
    error_response(status, err.public_message(writing))
}

/// POST multipart: store one media file through `handler`
pub async fn upload<B>(req: Request<B>, handler: &UploadHandler, path: &str) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError> + 'static,
{
    match accept_upload(req, handler).await {
        Ok(stored) => {
            logger::log_upload_stored(&stored, handler.dir());
            logger::log_api_request("POST", path, 200);
            json_response(
                StatusCode::OK,
                &UploadResponse {
                    success: true,
                    file: &stored,
                },
            )
        }
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                logger::log_error(&format!("Upload to {path} failed: {e}"));
            } else {
                logger::log_warning(&format!("Upload to {path} rejected: {e}"));
            }
            logger::log_api_request("POST", path, status.as_u16());
            error_response(status, &e.public_message())
        }
    }
}

async fn accept_upload<B>(
    req: Request<B>,
    handler: &UploadHandler,
) -> Result<crate::upload::StoredUpload, UploadError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError> + 'static,
{
    let boundary = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or(multer::Error::NoMultipart)
        .and_then(multer::parse_boundary)
        .map_err(UploadError::NotMultipart)?;

    let constraints = Constraints::new().size_limit(
        SizeLimit::new()
            .per_field(handler.max_size())
            .whole_stream(handler.max_size().saturating_add(MULTIPART_OVERHEAD)),
    );
    let multipart = Multipart::with_constraints(
        req.into_body().into_data_stream(),
        boundary,
        constraints,
    );

    // Report the file limit, not the whole-stream allowance
    handler.accept(multipart).await.map_err(|e| match e {
        UploadError::PayloadTooLarge { .. } => UploadError::PayloadTooLarge {
            limit: handler.max_size(),
        },
        other => other,
    })
}
