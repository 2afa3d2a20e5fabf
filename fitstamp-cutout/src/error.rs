use std::path::Path;

use thiserror::Error;

use fitstamp_wcs::WcsError;

pub type Result<T> = std::result::Result<T, CutoutError>;

#[derive(Debug, Error)]
pub enum CutoutError {
    #[error("cannot open {path}: {message}")]
    Open { path: String, message: String },

    #[error(transparent)]
    Wcs(#[from] WcsError),

    #[error("region read failed: {0}")]
    Read(String),

    #[error("cannot write cutout {path}: {message}")]
    Write { path: String, message: String },

    #[error("job document error: {0}")]
    Job(String),

    #[error("invalid cutout size: {width} x {height} arcmin")]
    Validation { width: f64, height: f64 },

    #[error("source image is not open")]
    Closed,
}

impl CutoutError {
    pub fn open(path: &Path, message: impl ToString) -> Self {
        Self::Open {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    pub fn read(message: impl ToString) -> Self {
        Self::Read(message.to_string())
    }

    pub fn write(path: &Path, message: impl ToString) -> Self {
        Self::Write {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    pub fn job(message: impl ToString) -> Self {
        Self::Job(message.to_string())
    }

    pub fn validation(width: f64, height: f64) -> Self {
        Self::Validation { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn open_error_names_the_path() {
        let err = CutoutError::open(&PathBuf::from("Nothing.fits"), "no such file");
        assert!(err.to_string().contains("Nothing.fits"));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn wcs_error_passes_through() {
        let err: CutoutError = WcsError::invalid_header("no CTYPE1").into();
        assert!(err.to_string().contains("no CTYPE1"));
    }

    #[test]
    fn validation_error_reports_both_extents() {
        let err = CutoutError::validation(-1.0, 0.5);
        assert!(err.to_string().contains("-1"));
        assert!(err.to_string().contains("0.5"));
    }

    #[test]
    fn closed_error_display() {
        assert_eq!(CutoutError::Closed.to_string(), "source image is not open");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CutoutError>();
    }
}
