use axum::Json;
use axum::http::Uri;

use crate::dto::GuardedPageResponse;

/// Answers navigation the route guard let through.
pub async fn guarded_page_handler(uri: Uri) -> Json<GuardedPageResponse> {
    Json(GuardedPageResponse {
        path: uri.path().to_owned(),
        status: "allowed",
    })
}
