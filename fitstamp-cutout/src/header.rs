use fitsrs::hdu::header::extension::image::Image;
use fitsrs::hdu::header::Header;

/// Keywords carried over from the source header into every cutout HDU.
/// This is the linear WCS set plus the frame bookkeeping around it; the
/// structural keywords (SIMPLE, BITPIX, NAXISn) are the writer's business.
const REAL_CARDS: [&str; 18] = [
    "CRVAL1", "CRVAL2", "CRPIX1", "CRPIX2", "CDELT1", "CDELT2", "CD1_1", "CD1_2", "CD2_1",
    "CD2_2", "PC1_1", "PC1_2", "PC2_1", "PC2_2", "CROTA2", "EQUINOX", "LONPOLE", "LATPOLE",
];

const STRING_CARDS: [&str; 5] = ["CTYPE1", "CTYPE2", "CUNIT1", "CUNIT2", "RADESYS"];

#[derive(Debug, Clone, PartialEq)]
pub enum KeywordValue {
    Integer(i64),
    Real(f64),
    String(String),
}

impl KeywordValue {
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub name: String,
    pub value: KeywordValue,
}

impl Keyword {
    pub fn integer(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value: KeywordValue::Integer(value),
        }
    }

    pub fn real(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: KeywordValue::Real(value),
        }
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: KeywordValue::String(value.into()),
        }
    }
}

/// The curated header of one cutout: the cards worth copying from the
/// source, in source order, ready for reference-pixel repair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StampHeader {
    cards: Vec<Keyword>,
}

impl StampHeader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the carried-over keyword set from a parsed FITS header.
    pub fn from_fits(header: &Header<Image>) -> Self {
        let mut cards = Vec::new();
        for name in STRING_CARDS {
            if let Some(value) = string_card(header, name) {
                cards.push(Keyword::string(name, value));
            }
        }
        for name in REAL_CARDS {
            if let Some(value) = real_card(header, name) {
                cards.push(Keyword::real(name, value));
            }
        }
        Self { cards }
    }

    pub fn cards(&self) -> &[Keyword] {
        &self.cards
    }

    pub fn real(&self, name: &str) -> Option<f64> {
        self.cards
            .iter()
            .find(|card| card.name == name)
            .and_then(|card| card.value.as_real())
    }

    /// CRPIX defaults to 0.0 when absent, the same fallback the WCS library
    /// applies when it builds the projection.
    pub fn crpix1(&self) -> f64 {
        self.real("CRPIX1").unwrap_or(0.0)
    }

    pub fn crpix2(&self) -> f64 {
        self.real("CRPIX2").unwrap_or(0.0)
    }

    /// Replace a card in place, or append it when new.
    pub fn set_real(&mut self, name: &str, value: f64) {
        match self.cards.iter_mut().find(|card| card.name == name) {
            Some(card) => card.value = KeywordValue::Real(value),
            None => self.cards.push(Keyword::real(name, value)),
        }
    }

    /// Copy of this header with the reference pixel moved to the cutout's
    /// own grid.
    pub fn with_reference_pixel(&self, crpix1: f64, crpix2: f64) -> Self {
        let mut corrected = self.clone();
        corrected.set_real("CRPIX1", crpix1);
        corrected.set_real("CRPIX2", crpix2);
        corrected
    }
}

fn real_card(header: &Header<Image>, key: &'static str) -> Option<f64> {
    match header.get_parsed::<f64>(key) {
        Some(Ok(value)) => Some(value),
        _ => header
            .get_parsed::<i64>(key)
            .and_then(|parsed| parsed.ok())
            .map(|value| value as f64),
    }
}

fn string_card(header: &Header<Image>, key: &'static str) -> Option<String> {
    header
        .get_parsed::<String>(key)
        .and_then(|parsed| parsed.ok())
        .map(|value| value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> StampHeader {
        let mut header = StampHeader::new();
        header.set_real("CRPIX1", 512.5);
        header.set_real("CRPIX2", 1024.5);
        header.set_real("CD1_1", -7.5e-5);
        header
    }

    #[test]
    fn real_lookup_finds_cards() {
        let header = sample_header();
        assert_eq!(header.real("CRPIX1"), Some(512.5));
        assert_eq!(header.real("CD1_1"), Some(-7.5e-5));
        assert_eq!(header.real("CRVAL1"), None);
    }

    #[test]
    fn crpix_defaults_to_zero() {
        let header = StampHeader::new();
        assert_eq!(header.crpix1(), 0.0);
        assert_eq!(header.crpix2(), 0.0);
    }

    #[test]
    fn set_real_replaces_existing_card() {
        let mut header = sample_header();
        header.set_real("CRPIX1", 1.0);
        assert_eq!(header.real("CRPIX1"), Some(1.0));
        assert_eq!(header.cards().len(), 3);
    }

    #[test]
    fn set_real_appends_new_card() {
        let mut header = sample_header();
        header.set_real("RA_CUT", 8.807);
        assert_eq!(header.cards().len(), 4);
        assert_eq!(header.real("RA_CUT"), Some(8.807));
    }

    #[test]
    fn with_reference_pixel_leaves_original_untouched() {
        let header = sample_header();
        let corrected = header.with_reference_pixel(-38.5, 12.0);
        assert_eq!(corrected.crpix1(), -38.5);
        assert_eq!(corrected.crpix2(), 12.0);
        assert_eq!(header.crpix1(), 512.5);
        assert_eq!(corrected.real("CD1_1"), header.real("CD1_1"));
    }

    #[test]
    fn integer_values_read_back_as_real() {
        let value = KeywordValue::Integer(2000);
        assert_eq!(value.as_real(), Some(2000.0));
        assert_eq!(value.as_str(), None);
    }
}
