use std::path::Path;

use tracing::{debug, info};

use fitstamp_wcs::{SkyCoord, SkyProjector};

use crate::error::{CutoutError, Result};
use crate::geometry;
use crate::job::{CutoutRequest, RequestRecord};
use crate::store::{SourceImage, StampWriter};

/// Orchestrates one batch: owns the open source image, runs the geometry
/// for each request, and turns the results into stamp files and records.
///
/// At most one source is open at a time; `cut` after `close` (or before
/// `prepare`) fails rather than touching stale state.
#[derive(Default)]
pub struct ImageCutter {
    source: Option<SourceImage>,
}

impl ImageCutter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.source.is_some()
    }

    /// Open the source image in read mode.
    pub fn prepare(&mut self, path: &Path) -> Result<()> {
        let source = SourceImage::open(path)?;
        info!(path = %path.display(), "source image prepared");
        self.source = Some(source);
        Ok(())
    }

    /// Cut one stamp. Any failure aborts the whole call; no output record
    /// is produced for a failed request.
    pub fn cut(&mut self, request: &CutoutRequest) -> Result<RequestRecord> {
        let source = self.source.as_mut().ok_or(CutoutError::Closed)?;

        // WCS always comes from the reference extension, shared by every
        // extension of the exposure.
        let (header, transform) = source.wcs_header()?;
        let sky = SkyCoord::new(request.ra, request.dec);
        let geometry = geometry::compute(&transform, &sky, request.xs, request.ys)?;
        debug!(
            req = %request.req,
            naxis1 = geometry.naxis1,
            naxis2 = geometry.naxis2,
            "stamp geometry computed"
        );

        let data = source.read_region(geometry.y_range(), geometry.x_range())?;

        let (crpix1, crpix2) = geometry.corrected_crpix(header.crpix1(), header.crpix2());
        let mut stamp_header = header.with_reference_pixel(crpix1, crpix2);
        stamp_header.set_real("RA_CUT", request.ra);
        stamp_header.set_real("DEC_CUT", request.dec);

        let mut writer = StampWriter::create(
            &request.outfile,
            geometry.naxis1 as usize,
            geometry.naxis2 as usize,
        )?;
        for extname in &request.hdu {
            writer.write_extension(extname, &data, &stamp_header)?;
        }
        writer.close();
        info!(req = %request.req, outfile = %request.outfile.display(), "stamp cut");

        let (x_scale_deg, y_scale_deg) = transform.pixel_scales();
        Ok(RequestRecord {
            req: request.req.clone(),
            log: vec!["OK".to_string()],
            output: request.outfile.display().to_string(),
            title: format!("Cutout from {}", source.path().display()),
            ra_deg: request.ra,
            dec_deg: request.dec,
            cut_size_deg: [request.xs / 60.0, request.ys / 60.0],
            naxes: 2,
            naxis: [geometry.naxis1, geometry.naxis2],
            scale_deg: [x_scale_deg, y_scale_deg],
            format: "image/fits".to_string(),
        })
    }

    /// Release the source image. Best effort and idempotent: the handle is
    /// simply dropped, and nothing propagates from here.
    pub fn close(&mut self) {
        if let Some(source) = self.source.take() {
            debug!(path = %source.path().display(), "closing source image");
            drop(source);
        }
    }
}
