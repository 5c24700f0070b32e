//! Static hosting for the bundled front-end

use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

/// Serve `dir` as a website. Directories serve their `index.html`, and any
/// path without a matching file gets the root `index.html` with a 200.
pub fn service(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(dir.join("index.html")))
}
