//! Static assets embedded into the binary.

use axum::extract::Path;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Assets;

/// Serve one embedded file with a content type guessed from its extension.
pub async fn serve(Path(path): Path<String>) -> Response {
    match Assets::get(&path) {
        Some(file) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                file.data.into_owned(),
            )
                .into_response()
        }
        None => {
            tracing::debug!(%path, "unknown asset requested");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

pub fn get_utf8(path: &str) -> anyhow::Result<String> {
    let file = Assets::get(path).ok_or_else(|| anyhow::anyhow!("missing embedded asset: {path}"))?;
    let s = std::str::from_utf8(file.data.as_ref())?;
    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_script_is_embedded() {
        let script = get_utf8("app.js").unwrap();
        assert!(script.contains("/api/toasts"));
        assert!(get_utf8("missing.js").is_err());
    }
}
