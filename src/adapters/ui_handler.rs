use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

/// Compiled browser UI (`trunk build` output)
#[derive(RustEmbed)]
#[folder = "ui/dist"]
struct Asset;

pub struct UIHandler;

impl UIHandler {
    /// Serve an embedded asset; unknown paths get `index.html` so the
    /// client-side router can resolve `/objects/..` and `/branches/..`
    pub async fn serve(uri: Uri) -> Response {
        let path = uri.path().trim_start_matches('/');

        if !path.is_empty() && path != "index.html" {
            if let Some(response) = Self::asset(path) {
                return response;
            }
        }

        Self::asset("index.html")
            .unwrap_or_else(|| (StatusCode::NOT_FOUND, "404 Not Found").into_response())
    }

    fn asset(path: &str) -> Option<Response> {
        let content = Asset::get(path)?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        // trunk fingerprints everything but the entry page
        let cache = if path == "index.html" {
            "no-cache"
        } else {
            "public, max-age=31536000, immutable"
        };
        Some(
            (
                [
                    (header::CONTENT_TYPE, mime.as_ref().to_string()),
                    (header::CACHE_CONTROL, cache.to_string()),
                ],
                content.data,
            )
                .into_response(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_path_falls_back_to_index() {
        let response = UIHandler::serve("/objects/InfraDevice".parse().unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html"
        );
    }
}
