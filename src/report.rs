use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::predict::Pass;

/// Flat, serializable view of a [`Pass`].
#[derive(Debug, Clone, Serialize)]
pub struct PassSummary {
    pub catalog_number: u32,
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_seconds: i64,
    pub peak_elevation_deg: f64,
    pub peak_time: DateTime<Utc>,
    pub azimuth_at_peak_deg: f64,
    pub samples: usize,
}

impl From<&Pass<'_>> for PassSummary {
    fn from(pass: &Pass<'_>) -> Self {
        Self {
            catalog_number: pass.satellite.catalog_number,
            name: pass.satellite.name.clone(),
            start: pass.start_time(),
            end: pass.end_time(),
            duration_seconds: pass.duration().num_seconds(),
            peak_elevation_deg: round2(pass.peak_elevation_deg()),
            peak_time: pass.peak_time(),
            azimuth_at_peak_deg: round2(pass.azimuth_at_peak_deg()),
            samples: pass.samples().len(),
        }
    }
}

pub fn render_text<W: Write>(passes: &[Pass<'_>], out: &mut W) -> io::Result<()> {
    for pass in passes {
        writeln!(
            out,
            "{:>6}  {:<22}  {} → {}  peak {:5.1}° at {}  az≈{:5.1}°",
            pass.satellite.catalog_number,
            pass.satellite.name,
            pass.start_time().format("%Y-%m-%d %H:%M:%SZ"),
            pass.end_time().format("%Y-%m-%d %H:%M:%SZ"),
            pass.peak_elevation_deg(),
            pass.peak_time().format("%H:%M:%S"),
            pass.azimuth_at_peak_deg(),
        )?;
    }
    Ok(())
}

pub fn render_json<W: Write>(passes: &[Pass<'_>], out: &mut W) -> serde_json::Result<()> {
    let summaries: Vec<PassSummary> = passes.iter().map(PassSummary::from).collect();
    serde_json::to_writer_pretty(&mut *out, &summaries)?;
    writeln!(out).map_err(serde_json::Error::io)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::{parse_catalog, SatelliteRecord, VisibilitySample};
    use chrono::TimeZone;

    fn record() -> SatelliteRecord {
        parse_catalog(
            "STARLINK-1007
1 44713U 19074A   24001.50000000  .00001234  00000-0  10000-3 0  9996
2 44713  53.0540 123.4567 0001400  90.0000 270.1234 15.06400000 23459",
        )
        .remove(0)
    }

    fn pass(sat: &SatelliteRecord) -> Pass<'_> {
        let t0 = Utc.with_ymd_and_hms(2025, 9, 14, 18, 30, 0).unwrap();
        let samples = [(0, 12.04), (30, 47.26), (60, 11.5)]
            .into_iter()
            .map(|(secs, el)| VisibilitySample {
                time: t0 + chrono::Duration::seconds(secs),
                elevation_deg: el,
                azimuth_deg: 301.449,
                range_km: 700.0,
            })
            .collect();
        Pass::new(sat, samples).unwrap()
    }

    #[test]
    fn text_row() {
        let sat = record();
        let mut out = Vec::new();
        render_text(&[pass(&sat)], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            " 44713  STARLINK-1007           2025-09-14 18:30:00Z → 2025-09-14 18:31:00Z  peak  47.3° at 18:30:30  az≈301.4°\n"
        );
    }

    #[test]
    fn json_rows() {
        let sat = record();
        let mut out = Vec::new();
        render_json(&[pass(&sat)], &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let row = &value[0];
        assert_eq!(row["catalog_number"], 44713);
        assert_eq!(row["name"], "STARLINK-1007");
        assert_eq!(row["duration_seconds"], 60);
        assert_eq!(row["peak_elevation_deg"], 47.26);
        assert_eq!(row["azimuth_at_peak_deg"], 301.45);
        assert_eq!(row["peak_time"], "2025-09-14T18:30:30Z");
        assert_eq!(row["samples"], 3);
    }

    #[test]
    fn empty_list_renders_nothing() {
        let mut out = Vec::new();
        render_text(&[], &mut out).unwrap();
        assert!(out.is_empty());
    }
}
