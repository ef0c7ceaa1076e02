//! Per-page text dumps.
//!
//! Each page with a body becomes `<url slug>.txt` holding its extracted text
//! with emoji and navigation boilerplate removed.

use super::ensure_writable_dir;
use contact_scraper::FetchResult;
use contact_scraper::extract_text;
use contact_scraper::utils::{remove_decorative, remove_phrases, slugify_url};
use std::error::Error;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// Readable text for one page body.
pub fn page_text(html: &str) -> String {
    remove_phrases(&remove_decorative(&extract_text(html)))
}

/// Write one text file per page, returning how many were written.
///
/// Pages without a body are skipped; a failed write is logged and skipped.
#[instrument(level = "info", skip_all, fields(text_output_dir = %text_output_dir))]
pub async fn write_texts(
    pages: &[FetchResult],
    text_output_dir: &str,
) -> Result<usize, Box<dyn Error>> {
    ensure_writable_dir(text_output_dir).await?;

    let mut written = 0;
    for page in pages {
        let Some(body) = &page.body else {
            debug!(url = %page.url, "No body kept; skipping text dump");
            continue;
        };
        let path = format!(
            "{}/{}.txt",
            text_output_dir.trim_end_matches('/'),
            slugify_url(&page.url)
        );
        match fs::write(&path, page_text(body)).await {
            Ok(()) => written += 1,
            Err(e) => warn!(%path, error = %e, "Failed writing text dump"),
        }
    }

    info!(written, pages = pages.len(), "Wrote text dumps");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contact_scraper::{FrameworkInfo, Signals};

    fn page(url: &str, body: Option<&str>) -> FetchResult {
        FetchResult {
            url: url.to_string(),
            size_bytes: body.map_or(0, str::len),
            signals: Signals::default(),
            framework: FrameworkInfo::default(),
            body: body.map(str::to_string),
        }
    }

    #[test]
    fn test_page_text() {
        let html = "<html><body><h1>🌮 Tacos Don Pepe</h1><p>Leer más</p><p>Abierto diario</p></body></html>";
        assert_eq!(page_text(html), "Tacos Don Pepe\nAbierto diario");
    }

    #[tokio::test]
    async fn test_write_texts_skips_pages_without_body() {
        let dir = std::env::temp_dir().join(format!("contact_scraper_text_{}", std::process::id()));
        let dir_str = dir.to_str().unwrap();
        let pages = vec![
            page("https://tienda.mx/contacto", Some("<p>Escríbenos hoy</p>")),
            page("https://vacia.mx", None),
        ];

        let written = write_texts(&pages, dir_str).await.unwrap();

        assert_eq!(written, 1);
        let text = std::fs::read_to_string(dir.join("tienda-mx-contacto.txt")).unwrap();
        assert_eq!(text, "Escríbenos hoy");
        assert!(!dir.join("vacia-mx.txt").exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
