use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_request_id() -> String {
    "REQ".to_string()
}

fn default_extent_arcmin() -> f64 {
    1.0
}

fn default_extensions() -> Vec<String> {
    vec!["SCI".to_string()]
}

/// One batch job: a source image and the cutouts to take from it.
#[derive(Debug, Clone, Deserialize)]
pub struct CutoutJob {
    /// Source FITS image. `null` aborts the job with only a logged error.
    pub input: Option<PathBuf>,
    #[serde(default)]
    pub request: Vec<CutoutRequest>,
}

/// Parameters of a single cutout.
#[derive(Debug, Clone, Deserialize)]
pub struct CutoutRequest {
    /// Right ascension of the cutout center, degrees.
    pub ra: f64,
    /// Declination of the cutout center, degrees.
    pub dec: f64,
    /// Output FITS path; an existing file is replaced.
    pub outfile: PathBuf,
    /// Caller-chosen request identifier, echoed in the result document.
    #[serde(default = "default_request_id")]
    pub req: String,
    /// Angular width in arcminutes.
    #[serde(default = "default_extent_arcmin")]
    pub xs: f64,
    /// Angular height in arcminutes.
    #[serde(default = "default_extent_arcmin")]
    pub ys: f64,
    /// Extension names to materialize in the output. Honored whenever the
    /// field is present; the default kicks in only when it is absent.
    #[serde(default = "default_extensions")]
    pub hdu: Vec<String>,
}

/// Result record for one completed request, carrying the SIA-V1 metadata
/// keys expected by image-access clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub req: String,
    pub log: Vec<String>,
    #[serde(rename = "OUTPUT")]
    pub output: String,
    #[serde(rename = "VOX:Image_Title")]
    pub title: String,
    #[serde(rename = "POS_EQ_RA_MAIN")]
    pub ra_deg: f64,
    #[serde(rename = "POS_EQ_DEC_MAIN")]
    pub dec_deg: f64,
    /// Requested extents converted to degrees.
    #[serde(rename = "CUTSIZE")]
    pub cut_size_deg: [f64; 2],
    #[serde(rename = "VOX:Image_Naxes")]
    pub naxes: u32,
    #[serde(rename = "VOX:Image_Naxis")]
    pub naxis: [i64; 2],
    /// Plane scale in degrees per pixel.
    #[serde(rename = "VOX:Image_Scale")]
    pub scale_deg: [f64; 2],
    #[serde(rename = "VOX:Image_Format")]
    pub format: String,
}

/// Aggregate result of one job. Built afresh per run and returned by value;
/// nothing is shared between batches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    pub log: Vec<String>,
    pub requests: Vec<RequestRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // --- job parsing ---

    #[test]
    fn request_defaults_apply() {
        let job: CutoutJob = serde_json::from_value(json!({
            "input": "test.fits",
            "request": [{"ra": 8.807, "dec": -19.4344, "outfile": "out1.fits"}]
        }))
        .unwrap();

        let request = &job.request[0];
        assert_eq!(request.req, "REQ");
        assert_eq!(request.xs, 1.0);
        assert_eq!(request.ys, 1.0);
        assert_eq!(request.hdu, vec!["SCI".to_string()]);
    }

    #[test]
    fn explicit_extension_list_is_honored_on_its_own() {
        // The list must not need any companion key to take effect.
        let job: CutoutJob = serde_json::from_value(json!({
            "input": "test.fits",
            "request": [{
                "ra": 8.807, "dec": -19.4344, "outfile": "out1.fits",
                "hdu": ["SCI", "WGT", "MSK"]
            }]
        }))
        .unwrap();

        assert_eq!(job.request[0].hdu, vec!["SCI", "WGT", "MSK"]);
    }

    #[test]
    fn null_input_parses_to_none() {
        let job: CutoutJob =
            serde_json::from_value(json!({"input": null, "request": []})).unwrap();
        assert!(job.input.is_none());
        assert!(job.request.is_empty());
    }

    #[test]
    fn missing_request_list_defaults_to_empty() {
        let job: CutoutJob = serde_json::from_value(json!({"input": "test.fits"})).unwrap();
        assert!(job.request.is_empty());
    }

    #[test]
    fn request_without_coordinates_is_rejected() {
        let parsed = serde_json::from_value::<CutoutJob>(json!({
            "input": "test.fits",
            "request": [{"outfile": "out1.fits"}]
        }));
        assert!(parsed.is_err());
    }

    // --- report serialization ---

    fn sample_record() -> RequestRecord {
        RequestRecord {
            req: "REQ".to_string(),
            log: vec!["OK".to_string()],
            output: "out1.fits".to_string(),
            title: "Cutout from test.fits".to_string(),
            ra_deg: 8.807,
            dec_deg: -19.4344,
            cut_size_deg: [1.0 / 60.0, 1.0 / 60.0],
            naxes: 2,
            naxis: [61, 61],
            scale_deg: [2.778e-4, 2.778e-4],
            format: "image/fits".to_string(),
        }
    }

    #[test]
    fn record_uses_sia_key_names() {
        let value = serde_json::to_value(sample_record()).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("OUTPUT"));
        assert!(object.contains_key("VOX:Image_Title"));
        assert!(object.contains_key("POS_EQ_RA_MAIN"));
        assert!(object.contains_key("POS_EQ_DEC_MAIN"));
        assert!(object.contains_key("CUTSIZE"));
        assert!(object.contains_key("VOX:Image_Naxis"));
        assert!(object.contains_key("VOX:Image_Scale"));
        assert_eq!(object["VOX:Image_Format"], "image/fits");
        assert_eq!(object["VOX:Image_Naxes"], 2);
    }

    #[test]
    fn report_omits_input_when_absent() {
        let report = BatchReport {
            log: vec!["Error! No input FITS file from JSON".to_string()],
            ..BatchReport::default()
        };
        let value = serde_json::to_value(&report).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("input"));
        assert_eq!(object["requests"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = BatchReport {
            input: Some("test.fits".to_string()),
            log: vec![],
            requests: vec![sample_record()],
        };
        let text = serde_json::to_string_pretty(&report).unwrap();
        let parsed: BatchReport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, report);
    }
}
