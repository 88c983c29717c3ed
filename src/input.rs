//! Recorded pointer events: one JSON object per line.

use anyhow::{Result, anyhow};
use log::warn;
use std::{fs, io::BufRead, path::Path};

use crate::coordinator::PointerEvent;

pub fn parse_trace<R: BufRead>(reader: R) -> Result<Vec<PointerEvent>> {
    let mut out = vec![];
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let ev: PointerEvent = serde_json::from_str(text)
            .map_err(|e| anyhow!("line {}: invalid event: {e}", idx + 1))?;
        out.push(ev);
    }
    if out.is_empty() {
        warn!("trace contains no events");
    }
    Ok(out)
}

pub fn load_trace(path: &Path) -> Result<Vec<PointerEvent>> {
    let file = fs::File::open(path).map_err(|e| anyhow!("failed to read {}: {e}", path.display()))?;
    parse_trace(std::io::BufReader::new(file))
        .map_err(|e| anyhow!("failed to parse {}: {e}", path.display()))
}
