use std::fs::File;
use std::io::BufReader;
use std::ops::Range;
use std::path::{Path, PathBuf};

use fitsio::images::{ImageDescription, ImageType};
use fitsio::FitsFile;
use fitsrs::{Fits, HDU};
use tracing::debug;

use fitstamp_wcs::SkyTransform;

use crate::error::{CutoutError, Result};
use crate::header::{KeywordValue, StampHeader};

/// Read-mode handle on the batch's source image.
pub struct SourceImage {
    path: PathBuf,
    file: FitsFile,
}

impl SourceImage {
    pub fn open(path: &Path) -> Result<Self> {
        let file = FitsFile::open(path).map_err(|err| CutoutError::open(path, err))?;
        debug!(path = %path.display(), "opened source image");
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header of the WCS-reference extension (extension 0), parsed fresh
    /// from disk, plus the sky transform it defines.
    pub fn wcs_header(&self) -> Result<(StampHeader, SkyTransform)> {
        let file = File::open(&self.path).map_err(|err| CutoutError::read(err))?;
        let mut hdu_list = Fits::from_reader(BufReader::new(file));
        match hdu_list.next() {
            Some(Ok(HDU::Primary(hdu))) => {
                let header = hdu.get_header();
                let stamp = StampHeader::from_fits(header);
                let transform = SkyTransform::from_header(header)?;
                Ok((stamp, transform))
            }
            Some(Ok(_)) => Err(CutoutError::read("first HDU carries no image header")),
            Some(Err(err)) => Err(CutoutError::read(err)),
            None => Err(CutoutError::read("source image has no HDUs")),
        }
    }

    /// Pixel block `[y1:y2, x1:x2]` from extension 0. Reads always target
    /// the WCS-reference extension, whatever extension names a request
    /// lists for its output.
    pub fn read_region(&mut self, rows: Range<usize>, cols: Range<usize>) -> Result<Vec<f64>> {
        let hdu = self.file.hdu(0).map_err(|err| CutoutError::read(err))?;
        let data: Vec<f64> = hdu
            .read_region(&mut self.file, &[&rows, &cols])
            .map_err(|err| CutoutError::read(err))?;
        Ok(data)
    }
}

/// Writer for one output stamp file. Creation clobbers: an existing file at
/// the path is replaced.
pub struct StampWriter {
    path: PathBuf,
    file: FitsFile,
    naxis1: usize,
    naxis2: usize,
    hdus_written: usize,
}

impl StampWriter {
    pub fn create(path: &Path, naxis1: usize, naxis2: usize) -> Result<Self> {
        let description = ImageDescription {
            data_type: ImageType::Double,
            dimensions: &[naxis2, naxis1],
        };
        let file = FitsFile::create(path)
            .with_custom_primary(&description)
            .overwrite()
            .open()
            .map_err(|err| CutoutError::write(path, err))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            naxis1,
            naxis2,
            hdus_written: 0,
        })
    }

    /// Write one image HDU. The first goes into the primary HDU, the rest
    /// become image extensions; all carry the same corrected header cards
    /// plus their EXTNAME.
    pub fn write_extension(
        &mut self,
        extname: &str,
        data: &[f64],
        header: &StampHeader,
    ) -> Result<()> {
        // The first HDU is the file's primary and needs its EXTNAME set by
        // hand; later ones are named by create_image itself.
        let (hdu, name_card_needed) = if self.hdus_written == 0 {
            (self.file.primary_hdu(), true)
        } else {
            let description = ImageDescription {
                data_type: ImageType::Double,
                dimensions: &[self.naxis2, self.naxis1],
            };
            (
                self.file.create_image(extname.to_string(), &description),
                false,
            )
        };
        let hdu = hdu.map_err(|err| CutoutError::write(&self.path, err))?;

        hdu.write_image(&mut self.file, data)
            .map_err(|err| CutoutError::write(&self.path, err))?;

        for card in header.cards() {
            match &card.value {
                KeywordValue::Integer(value) => {
                    hdu.write_key(&mut self.file, &card.name, *value)
                }
                KeywordValue::Real(value) => hdu.write_key(&mut self.file, &card.name, *value),
                KeywordValue::String(value) => {
                    hdu.write_key(&mut self.file, &card.name, value.clone())
                }
            }
            .map_err(|err| CutoutError::write(&self.path, err))?;
        }
        if name_card_needed {
            hdu.write_key(&mut self.file, "EXTNAME", extname.to_string())
                .map_err(|err| CutoutError::write(&self.path, err))?;
        }

        self.hdus_written += 1;
        Ok(())
    }

    /// Flush and release the output file.
    pub fn close(self) {
        debug!(path = %self.path.display(), hdus = self.hdus_written, "stamp written");
    }
}
