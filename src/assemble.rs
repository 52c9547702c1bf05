//! Wraps generated content into a document and hands it to a renderer.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::error::{ReportError, Result};
use crate::model::{ContentBlock, DocumentDescription, PageFooter};
use crate::reports::ReportType;
use crate::style::StyleDictionary;

/// MIME type of every exported report.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Turns a document description into a byte buffer.
///
/// Implementations must not keep per-document state between calls so that a
/// single renderer can serve concurrent generations.
pub trait DocumentRenderer {
    fn render(&self, doc: &DocumentDescription) -> Result<Vec<u8>>;
}

impl<R: DocumentRenderer + ?Sized> DocumentRenderer for Arc<R> {
    fn render(&self, doc: &DocumentDescription) -> Result<Vec<u8>> {
        (**self).render(doc)
    }
}

/// Combines the body, the style dictionary and the footer into one document.
pub fn assemble(
    content: Vec<ContentBlock>,
    styles: StyleDictionary,
    footer: PageFooter,
    title: impl Into<String>,
) -> DocumentDescription {
    DocumentDescription {
        title: title.into(),
        content,
        styles,
        footer,
    }
}

/// Renders `doc` on the blocking thread pool.
///
/// With a `deadline` the call fails with [`ReportError::Timeout`] once it
/// elapses; the blocking task itself cannot be interrupted and is left to
/// finish in the background.
pub async fn render_async<R>(
    renderer: Arc<R>,
    doc: DocumentDescription,
    deadline: Option<Duration>,
) -> Result<Vec<u8>>
where
    R: DocumentRenderer + Send + Sync + 'static,
{
    let task = tokio::task::spawn_blocking(move || renderer.render(&doc));
    let joined = match deadline {
        Some(after) => match tokio::time::timeout(after, task).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!("Render step exceeded deadline of {:?}", after);
                return Err(ReportError::Timeout { after });
            }
        },
        None => task.await,
    };
    let bytes = joined.map_err(|err| ReportError::Join(err.to_string()))??;
    debug!("Render task produced {} bytes", bytes.len());
    Ok(bytes)
}

/// A rendered report ready to be sent as an attachment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdfExport {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl PdfExport {
    pub fn new(report: ReportType, bytes: Vec<u8>) -> Self {
        Self {
            file_name: report.file_name(),
            content_type: PDF_CONTENT_TYPE,
            bytes,
        }
    }

    /// `Content-Disposition` header value for the attachment.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.file_name)
    }
}
