use std::path::Path;

use crate::foundation::error::{LyricaError, LyricaResult};

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    format: Option<ProbeFormat>,
}

/// Duration in seconds of a media file, read from `ffprobe -show_format`.
#[tracing::instrument(skip_all, fields(path = %source_path.display()))]
pub fn probe_duration_secs(source_path: &Path) -> LyricaResult<f64> {
    if !source_path.is_file() {
        return Err(LyricaError::validation(format!(
            "media file '{}' does not exist",
            source_path.display()
        )));
    }

    if !is_on_path("ffprobe") {
        return Err(LyricaError::validation(
            "ffprobe is required to read the audio duration, but was not found on PATH",
        ));
    }

    let out = std::process::Command::new("ffprobe")
        .args(["-v", "error", "-print_format", "json", "-show_format"])
        .arg(source_path)
        .output()
        .map_err(|e| LyricaError::validation(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(LyricaError::validation(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let duration = parse_probe_duration(&out.stdout)?;
    tracing::debug!(duration, "probed media duration");
    Ok(duration)
}

/// Extract `format.duration` from `ffprobe` JSON output.
pub(crate) fn parse_probe_duration(json: &[u8]) -> LyricaResult<f64> {
    let parsed: ProbeOut = serde_json::from_slice(json)
        .map_err(|e| LyricaError::serde(format!("ffprobe json parse failed: {e}")))?;
    let raw = parsed
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| LyricaError::validation("ffprobe reported no duration"))?;
    let secs = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| LyricaError::validation(format!("invalid ffprobe duration '{raw}': {e}")))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(LyricaError::validation(format!(
            "ffprobe duration must be positive, got {secs}"
        )));
    }
    Ok(secs)
}

/// Return `true` when `program -version` runs successfully from `PATH`.
pub fn is_on_path(program: &str) -> bool {
    std::process::Command::new(program)
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/media.rs"]
mod tests;
