// API module entry
// JSON document endpoints and media uploads under /api

mod handlers;
mod response;
mod types;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;

use crate::config::AppState;
use crate::logger;
use crate::store::DocumentKind;

use response::not_found;

pub const VIDEO_UPLOAD_PATH: &str = "/api/upload";
pub const AUDIO_UPLOAD_PATH: &str = "/api/upload-audio";

/// API route handler
///
/// Every document kind answers GET and POST on its own route; the two
/// upload routes take POST only.
pub async fn handle_api<B>(
    req: Request<B>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    if let Some(kind) = DocumentKind::from_route(&path) {
        return Ok(match method {
            Method::GET | Method::HEAD => handlers::get_document(state, kind).await,
            Method::POST => handlers::put_document(req, state, kind).await,
            _ => {
                logger::log_api_request(method.as_str(), &path, 405);
                response::method_not_allowed("GET, HEAD, POST")
            }
        });
    }

    match (method, path.as_str()) {
        (Method::POST, VIDEO_UPLOAD_PATH) => {
            Ok(handlers::upload(req, &state.video_uploads, VIDEO_UPLOAD_PATH).await)
        }
        (Method::POST, AUDIO_UPLOAD_PATH) => {
            Ok(handlers::upload(req, &state.audio_uploads, AUDIO_UPLOAD_PATH).await)
        }
        (method, VIDEO_UPLOAD_PATH | AUDIO_UPLOAD_PATH) => {
            logger::log_api_request(method.as_str(), &path, 405);
            Ok(response::method_not_allowed("POST"))
        }
        (method, _) => {
            logger::log_api_request(method.as_str(), &path, 404);
            Ok(not_found())
        }
    }
}
