//! Batch postage-stamp cutout service for astronomical FITS images.
//!
//! A job document names one source image and a list of sky positions; each
//! position becomes a small axis-aligned FITS cutout whose header keeps a
//! valid WCS, and the whole batch is summarized in a JSON result document.
//! The celestial projection and the FITS codec are external concerns
//! (`wcs`/`fitsrs` and `fitsio`); this crate owns the cutout geometry, the
//! request loop, and the reporting around them.

pub mod batch;
pub mod cutter;
pub mod error;
pub mod geometry;
pub mod header;
pub mod job;
pub mod store;

pub use cutter::ImageCutter;
pub use error::{CutoutError, Result};
pub use geometry::StampGeometry;
pub use header::{Keyword, KeywordValue, StampHeader};
pub use job::{BatchReport, CutoutJob, CutoutRequest, RequestRecord};
