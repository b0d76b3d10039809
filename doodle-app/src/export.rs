//! Writes the session out as files: an HTML page and one PNG per guess.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use doodle_core::{GalleryBlock, GameSession, SessionView};
use thiserror::Error;

/// HTML page written into the output directory.
pub const GALLERY_FILE: &str = "gallery.html";

/// Errors raised while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Filesystem failure.
    #[error("failed to write {path}: {source}")]
    Io {
        /// File or directory being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// What an export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    /// The HTML page.
    pub page: PathBuf,
    /// Guess images, oldest round first.
    pub guesses: Vec<PathBuf>,
}

/// Write `gallery.html` and `guess-<n>.png` files into `out_dir`.
///
/// Guesses are numbered in the order they were archived, starting at 1.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be written.
pub fn export_session(
    session: &GameSession,
    out_dir: &Path,
) -> Result<ExportSummary, ExportError> {
    fs::create_dir_all(out_dir).map_err(|source| ExportError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let total = session.gallery().len();
    let mut guesses = Vec::with_capacity(total);
    // Gallery iterates newest first
    for (index, entry) in session.gallery().iter().enumerate() {
        let path = out_dir.join(format!("guess-{}.png", total - index));
        write_file(&path, entry.guess().png_bytes())?;
        guesses.push(path);
    }
    guesses.reverse();

    let page = out_dir.join(GALLERY_FILE);
    let html = render_page(&session.view(), &session.gallery().render());
    write_file(&page, html.as_bytes())?;

    tracing::info!(
        "Exported {} gallery entries to {}",
        total,
        out_dir.display()
    );
    Ok(ExportSummary { page, guesses })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Render the panel and gallery as a standalone HTML page.
#[must_use]
pub fn render_page(view: &SessionView, blocks: &[GalleryBlock]) -> String {
    let mut html = String::with_capacity(4096 + blocks.len() * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Dex Doodle</title>\n</head>\n<body>\n");

    html.push_str("<section class=\"panel\">\n");
    let _ = writeln!(
        html,
        "<p class=\"number\">{}</p>\n<h1 class=\"name\">{}</h1>\n<p class=\"description\">{}</p>",
        escape(&view.fields.number),
        escape(&view.fields.name),
        escape(&view.fields.description),
    );
    if let Some(reference) = &view.reference {
        let _ = writeln!(
            html,
            "<img class=\"answer\" src=\"{}\" alt=\"answer\">",
            escape(reference)
        );
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"gallery\">\n");
    for block in blocks {
        let label = escape(&block.subject_label);
        let _ = writeln!(
            html,
            "<div class=\"gallery-item\">\n<h2>No.{} {label}</h2>\n\
             <figure><img src=\"{}\" alt=\"guess for {label}\"><figcaption>Your drawing</figcaption></figure>\n\
             <figure><img src=\"{}\" alt=\"{label}\"><figcaption>Answer</figcaption></figure>\n</div>",
            block.number,
            escape(&block.guess_data_uri),
            escape(&block.reference_image_ref),
        );
    }
    html.push_str("</section>\n</body>\n</html>\n");
    html
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
