use crate::foundation::error::{LyricaError, LyricaResult};
use crate::timeline::model::{LyricLine, Timeline};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Length given to a final line that has no end marker after it.
pub const TRAILING_LINE_SECONDS: f64 = 3.0;
/// Length of a preview render.
pub const PREVIEW_SECONDS: f64 = 30.0;

#[derive(Debug, Clone, serde::Deserialize)]
struct LyricsFileDef {
    title: String,
    artist: String,
    lyrics: Vec<LyricEntryDef>,
}

#[derive(Debug, Clone, serde::Deserialize)]
struct LyricEntryDef {
    time: f64,
    text: String,
}

/// Parsed lyrics document: song metadata plus timed lines.
///
/// The JSON form is
///
/// ```json
/// { "title": "...", "artist": "...", "lyrics": [{ "time": 12.5, "text": "..." }, ...] }
/// ```
///
/// Entries with empty text are end markers; every other entry lasts until the next entry.
#[derive(Debug, Clone)]
pub struct LyricsDoc {
    /// Song title.
    pub title: String,
    /// Performing artist.
    pub artist: String,
    /// Timed lines, zero-duration entries already dropped.
    pub lines: Vec<LyricLine>,
}

impl LyricsDoc {
    /// Parse a lyrics document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LyricaResult<Self> {
        let def: LyricsFileDef = serde_json::from_reader(r)
            .map_err(|e| LyricaError::serde(format!("parse lyrics JSON: {e}")))?;
        Self::from_def(def)
    }

    /// Parse a lyrics document from a JSON string.
    pub fn from_json_str(s: &str) -> LyricaResult<Self> {
        let def: LyricsFileDef = serde_json::from_str(s)
            .map_err(|e| LyricaError::serde(format!("parse lyrics JSON: {e}")))?;
        Self::from_def(def)
    }

    /// Parse a lyrics document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LyricaResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            LyricaError::validation(format!("open lyrics JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    fn from_def(def: LyricsFileDef) -> LyricaResult<Self> {
        if def.lyrics.len() < 2 {
            return Err(LyricaError::validation(
                "'lyrics' must have at least 2 entries (one line + end marker)",
            ));
        }

        let mut lines = Vec::with_capacity(def.lyrics.len());
        for (i, entry) in def.lyrics.iter().enumerate() {
            if entry.text.is_empty() {
                continue;
            }
            let end_time = match def.lyrics.get(i + 1) {
                Some(next) => next.time,
                None => entry.time + TRAILING_LINE_SECONDS,
            };
            if end_time == entry.time {
                tracing::warn!(index = i, time = entry.time, "dropping zero-duration lyric entry");
                continue;
            }
            lines.push(LyricLine::new(entry.text.clone(), entry.time, end_time));
        }

        Ok(Self {
            title: def.title,
            artist: def.artist,
            lines,
        })
    }

    /// Keep only lines that start before `secs` (preview renders).
    pub fn truncate_to(&mut self, secs: f64) {
        self.lines.retain(|line| line.start_time < secs);
    }

    /// Validate the lines into an immutable [`Timeline`].
    pub fn timeline(&self) -> LyricaResult<Timeline> {
        Timeline::new(self.lines.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/lyrics.rs"]
mod tests;
