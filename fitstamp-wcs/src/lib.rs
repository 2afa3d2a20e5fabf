pub mod coordinate;
pub mod error;
pub mod transform;

pub use coordinate::{PixelCoord, SkyCoord};
pub use error::{WcsError, WcsResult};
pub use transform::{SkyProjector, SkyTransform};
