use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::{info, warn};

use crate::cutter::ImageCutter;
use crate::error::{CutoutError, Result};
use crate::job::{BatchReport, CutoutJob, CutoutRequest};

/// Run one batch job from a JSON job document and write the JSON result
/// document. The report is written whether the batch succeeded or died
/// mid-way; only an unreadable job document or an unwritable report path
/// propagate as errors.
pub fn run(job_path: &Path, report_path: &Path) -> Result<BatchReport> {
    let job = load_job(job_path)?;
    let mut report = BatchReport::default();

    let Some(input) = job.input.as_deref() else {
        warn!("job names no input image");
        report
            .log
            .push("Error! No input FITS file from JSON".to_string());
        write_report(&report, report_path)?;
        return Ok(report);
    };
    report.input = Some(input.display().to_string());

    let mut cutter = ImageCutter::new();
    match process(&mut cutter, input, &job.request, &mut report) {
        Ok(()) => info!(requests = report.requests.len(), "batch complete"),
        Err(err) => {
            // All-or-nothing per job: the first failure ends the request
            // loop, and already completed records stay in the report.
            warn!(error = %err, "batch aborted");
            report.log.push(format!("Error! {err}"));
            report.log.push("Error! Processing failed".to_string());
        }
    }
    cutter.close();

    write_report(&report, report_path)?;
    Ok(report)
}

fn process(
    cutter: &mut ImageCutter,
    input: &Path,
    requests: &[CutoutRequest],
    report: &mut BatchReport,
) -> Result<()> {
    cutter.prepare(input)?;
    for request in requests {
        let record = cutter.cut(request)?;
        report.requests.push(record);
    }
    Ok(())
}

fn load_job(path: &Path) -> Result<CutoutJob> {
    let file = File::open(path)
        .map_err(|err| CutoutError::job(format!("cannot open {}: {err}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|err| CutoutError::job(format!("malformed {}: {err}", path.display())))
}

fn write_report(report: &BatchReport, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|err| CutoutError::write(path, err))?;
    serde_json::to_writer_pretty(file, report).map_err(|err| CutoutError::write(path, err))?;
    Ok(())
}
