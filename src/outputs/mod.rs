//! Report and text-dump writers for the binary.
//!
//! # Submodules
//!
//! - [`json`]: the scrape report, to a dated file or to stdout
//! - [`text`]: one cleaned-up text file per fetched page
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06_taqueria-centro.json
//!
//! text_output_dir/
//! ├── taqueria-mx-contacto.txt
//! └── cocina-com-mx.txt
//! ```

pub mod json;
pub mod text;

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::info;

/// Create `path` if needed and check that a file can be written into it.
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!(%path, "Output directory is writable");
    Ok(())
}
