//! Paginated PDF report generation for the academic monitoring backend.
//!
//! A report request is turned into a [`DocumentDescription`] by laying its
//! records out page by page (see [`paginate`]), and the description is then
//! rendered to PDF bytes by a [`DocumentRenderer`] such as [`GenpdfRenderer`].
//!
//! ```no_run
//! use monitoreo_reports::{
//!     export, load_assets, resolve_asset_root, AsOf, GenpdfRenderer, ReportConfig, ReportRequest,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let assets = load_assets(resolve_asset_root(None)?)?;
//! let config = ReportConfig::default();
//! let renderer = GenpdfRenderer::from_config(assets, &config);
//! let request = ReportRequest::from_json_str(r#"{"report":"administrators","data":{"records":[]}}"#)?;
//! let pdf = export(&renderer, &request, &config, AsOf::now())?;
//! std::fs::write(pdf.file_name, &pdf.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod aggregate;
pub mod assemble;
pub mod assets;
pub mod config;
pub mod context;
pub mod elements;
pub mod error;
pub mod layout;
pub mod model;
pub mod paginate;
pub mod records;
pub mod render;
pub mod reports;
pub mod richtext;
pub mod schema;
pub mod style;

pub use assemble::{assemble, render_async, DocumentRenderer, PdfExport};
pub use assets::{load_assets, AssetBundle};
pub use config::{resolve_asset_root, ReportConfig};
pub use context::{AsOf, DocumentContext};
pub use error::{AssetError, ReportError, Result};
pub use model::{ContentBlock, DocumentDescription, PageFooter, TableBlock};
pub use paginate::{paginate, ReportLayout};
pub use render::GenpdfRenderer;
pub use reports::{build_document, export, export_async, ReportRequest, ReportType};
