use thiserror::Error;

pub type WcsResult<T> = std::result::Result<T, WcsError>;

#[derive(Debug, Error)]
pub enum WcsError {
    #[error("unusable WCS header: {message}")]
    InvalidHeader { message: String },

    #[error("cannot project ({ra_deg}, {dec_deg}) onto the image plane")]
    Projection { ra_deg: f64, dec_deg: f64 },

    #[error("coordinate out of bounds: {message}")]
    OutOfBounds { message: String },
}

impl WcsError {
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    pub fn projection(ra_deg: f64, dec_deg: f64) -> Self {
        Self::Projection { ra_deg, dec_deg }
    }

    pub fn out_of_bounds(message: impl Into<String>) -> Self {
        Self::OutOfBounds {
            message: message.into(),
        }
    }
}
