use fitsrs::hdu::header::extension::image::Image;
use fitsrs::hdu::header::Header;
use wcs::{LonLat, WCS};

use crate::coordinate::{PixelCoord, SkyCoord};
use crate::error::{WcsError, WcsResult};

/// Sky-to-pixel boundary of the cutout pipeline. The geometry engine only
/// sees this trait, so tests can drive it with a flat affine stub while the
/// production path goes through a full celestial projection.
pub trait SkyProjector {
    /// Project a sky position to zero-based pixel coordinates.
    fn sky_to_pixel(&self, sky: &SkyCoord) -> WcsResult<PixelCoord>;

    /// Per-axis plane scale in degrees per pixel.
    fn pixel_scales(&self) -> (f64, f64);
}

/// Projector for one image header, backed by the `wcs` crate.
///
/// The projection itself (TAN and friends, SIP distortion) is entirely the
/// library's business; this type only fixes the conventions at the seam:
/// coordinates go in as degrees, come out zero-based, and the plane scales
/// are derived from the same linear-transform keywords the library reads.
#[derive(Debug)]
pub struct SkyTransform {
    wcs: WCS,
    scales: (f64, f64),
}

impl SkyTransform {
    pub fn from_header(header: &Header<Image>) -> WcsResult<Self> {
        let wcs =
            WCS::try_from(header).map_err(|err| WcsError::invalid_header(err.to_string()))?;
        let scales = ScaleCards::from_header(header).plane_scales();
        Ok(Self { wcs, scales })
    }
}

impl SkyProjector for SkyTransform {
    fn sky_to_pixel(&self, sky: &SkyCoord) -> WcsResult<PixelCoord> {
        let lonlat = LonLat::new(sky.ra_deg().to_radians(), sky.dec_deg().to_radians());
        self.wcs
            .proj_lonlat(&lonlat)
            .map(|xy| PixelCoord::new(xy.x(), xy.y()))
            .ok_or_else(|| WcsError::projection(sky.ra_deg(), sky.dec_deg()))
    }

    fn pixel_scales(&self) -> (f64, f64) {
        self.scales
    }
}

/// Linear-transform keywords of one header, in the priority order the WCS
/// library itself applies: CD matrix first, then PC with CDELT, then the old
/// CDELT with CROTA2 convention. Absent keywords take the library's defaults
/// (identity matrix, unit scale).
#[derive(Debug, Clone, Default, PartialEq)]
struct ScaleCards {
    cd1_1: Option<f64>,
    cd1_2: Option<f64>,
    cd2_1: Option<f64>,
    cd2_2: Option<f64>,
    pc1_1: Option<f64>,
    pc1_2: Option<f64>,
    pc2_1: Option<f64>,
    pc2_2: Option<f64>,
    cdelt1: Option<f64>,
    cdelt2: Option<f64>,
    crota2: Option<f64>,
}

impl ScaleCards {
    fn from_header(header: &Header<Image>) -> Self {
        Self {
            cd1_1: card(header, "CD1_1"),
            cd1_2: card(header, "CD1_2"),
            cd2_1: card(header, "CD2_1"),
            cd2_2: card(header, "CD2_2"),
            pc1_1: card(header, "PC1_1"),
            pc1_2: card(header, "PC1_2"),
            pc2_1: card(header, "PC2_1"),
            pc2_2: card(header, "PC2_2"),
            cdelt1: card(header, "CDELT1"),
            cdelt2: card(header, "CDELT2"),
            crota2: card(header, "CROTA2"),
        }
    }

    fn plane_scales(&self) -> (f64, f64) {
        let cd_present = self.cd1_1.is_some()
            || self.cd1_2.is_some()
            || self.cd2_1.is_some()
            || self.cd2_2.is_some();
        if cd_present {
            return (
                self.cd1_1.unwrap_or(1.0).abs(),
                self.cd2_2.unwrap_or(1.0).abs(),
            );
        }

        let cdelt1 = self.cdelt1.unwrap_or(1.0);
        let cdelt2 = self.cdelt2.unwrap_or(1.0);

        let pc_present = self.pc1_1.is_some()
            || self.pc1_2.is_some()
            || self.pc2_1.is_some()
            || self.pc2_2.is_some();
        if pc_present {
            return (
                (cdelt1 * self.pc1_1.unwrap_or(1.0)).abs(),
                (cdelt2 * self.pc2_2.unwrap_or(1.0)).abs(),
            );
        }

        let cosc = self.crota2.unwrap_or(0.0).to_radians().cos();
        ((cdelt1 * cosc).abs(), (cdelt2 * cosc).abs())
    }
}

fn card(header: &Header<Image>, key: &'static str) -> Option<f64> {
    match header.get_parsed::<f64>(key) {
        Some(Ok(value)) => Some(value),
        _ => header
            .get_parsed::<i64>(key)
            .and_then(|parsed| parsed.ok())
            .map(|value| value as f64),
    }
}
