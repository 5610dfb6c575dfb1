use std::path::{Path, PathBuf};

use base64::Engine as _;
use publisher_logging::{publish_info, publish_warn};

use crate::{AtomicFileWriter, Page};

pub const SCREENSHOT_FILENAME: &str = "screenshot.png";

/// Best-effort capture of what the page showed when a run failed.
///
/// The image is logged as a `data:` URI so it survives environments where
/// only the log stream is kept, and is also written to `logs_dir`. Nothing
/// here can fail the caller.
pub(crate) async fn capture_screenshot(page: &dyn Page, logs_dir: &Path) -> Option<PathBuf> {
    let png = match page.screenshot().await {
        Ok(png) => png,
        Err(err) => {
            publish_warn!("Unable to take a screenshot: {err}");
            return None;
        }
    };

    publish_info!("Screenshot base64:");
    publish_info!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&png)
    );

    match AtomicFileWriter::new(logs_dir.to_path_buf()).write_bytes(SCREENSHOT_FILENAME, &png) {
        Ok(path) => {
            publish_info!("Screenshot saved to {}", path.display());
            Some(path)
        }
        Err(err) => {
            publish_warn!("Unable to save screenshot in {}: {err}", logs_dir.display());
            None
        }
    }
}
