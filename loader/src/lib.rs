//! Client-side loading of daily LMC sheets.
//!
//! [`SheetLoader`] tracks the selected day and product, resolves the
//! product's tanks and nozzles through a per-product cache, and loads the
//! sheet for the selection. The rendering layer reads [`LoaderState`] and
//! picks between the creation form (no sheet yet) and the editing area.

mod actions;
mod backend;
pub mod config;
mod filters;
pub mod prerequisites;
mod report;
mod sheet_loader;
pub mod telemetry;

pub use actions::{ActionError, LineItem, LineItemRef};
pub use backend::LmcBackend;
pub use config::Config;
pub use filters::{Filters, FiltersUpdate};
pub use prerequisites::{PrerequisiteResolver, Prerequisites, ResolveError};
pub use report::{REPORT_LOAD_FAILED, fetch_report};
pub use sheet_loader::{
    LoaderState, PRODUCTS_LOAD_FAILED, SHEET_LOAD_FAILED, SheetLoader, Status,
};
