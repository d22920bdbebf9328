use std::fs;
use std::path::Path;

use crate::predict::error::PredictError;
use crate::predict::types::{ElementSet, SatelliteRecord};

/// Read a catalog file. Only I/O failures are errors; an unusable file yields an empty catalog.
pub fn load_catalog(path: &Path) -> Result<Vec<SatelliteRecord>, PredictError> {
    let content = fs::read_to_string(path)?;
    let catalog = parse_catalog(&content);
    log::info!(
        "Loaded {} element sets from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}

/// Parse `name / line1 / line2` triples, skipping anything that does not line up.
pub fn parse_catalog(content: &str) -> Vec<SatelliteRecord> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut records = Vec::new();
    let mut i = 0;

    while i + 2 < lines.len() {
        let (name, line1, line2) = (lines[i], lines[i + 1], lines[i + 2]);
        if !(line1.starts_with("1 ") && line2.starts_with("2 ")) {
            log::debug!("Skipping catalog line {}: {:?}", i + 1, name);
            i += 1;
            continue;
        }

        match parse_catalog_number(line1) {
            Some(catalog_number) => records.push(SatelliteRecord {
                catalog_number,
                name: name.to_string(),
                elements: ElementSet {
                    line1: line1.to_string(),
                    line2: line2.to_string(),
                },
            }),
            None => log::debug!("Skipping {:?}: unreadable catalog number", name),
        }
        i += 3;
    }

    records
}

/// Columns 3-7 of line 1, either all digits or Alpha-5 (`A0001` is 100001).
fn parse_catalog_number(line1: &str) -> Option<u32> {
    let field = line1.get(2..7)?.trim();
    let mut chars = field.chars();
    let first = chars.next()?;
    let rest = chars.as_str();

    if first.is_ascii_digit() {
        return field.parse().ok();
    }

    if rest.len() != 4 || !rest.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let prefix = alpha5_prefix(first)?;
    Some(prefix * 10_000 + rest.parse::<u32>().ok()?)
}

// I and O are not used, to avoid confusion with 1 and 0.
fn alpha5_prefix(c: char) -> Option<u32> {
    let c = c.to_ascii_uppercase();
    if !c.is_ascii_uppercase() || c == 'I' || c == 'O' {
        return None;
    }
    let mut value = 10 + (c as u32 - 'A' as u32);
    if c > 'I' {
        value -= 1;
    }
    if c > 'O' {
        value -= 1;
    }
    Some(value)
}
