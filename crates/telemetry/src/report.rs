//! JSON report output.

use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Write `payload` as pretty JSON, replacing any existing file.
///
/// # Arguments
/// * `path` - Destination file
/// * `payload` - Serializable detection output
pub fn write_report<P: AsRef<Path>, T: Serialize>(path: P, payload: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(payload)?;
    fs::write(path.as_ref(), json + "\n")?;
    info!("Wrote report to {:?}", path.as_ref());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_overwrites_previous_content() {
        let path = std::env::temp_dir().join(format!("ringwatch-report-{}.json", std::process::id()));
        write_report(&path, &vec!["first", "run"]).unwrap();
        write_report(&path, &vec!["second"]).unwrap();

        let written: Vec<String> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, vec!["second"]);
        fs::remove_file(&path).unwrap();
    }
}
