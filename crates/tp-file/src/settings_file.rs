//! Settings persistence as pretty-printed JSON

use std::fs;
use std::path::Path;

use tp_master::MasteringSettings;

use crate::error::FileResult;

/// Load a settings tree from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> FileResult<MasteringSettings> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Save a settings tree as pretty JSON
pub fn save_settings<P: AsRef<Path>>(path: P, settings: &MasteringSettings) -> FileResult<()> {
    let text = serde_json::to_string_pretty(settings)?;
    fs::write(path, text)?;
    Ok(())
}
