use crate::foundation::error::{LyricaError, LyricaResult};

/// One timed lyric line.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LyricLine {
    /// Display text.
    pub text: String,
    /// Time the line starts being sung, in seconds.
    pub start_time: f64,
    /// Time the line stops being sung, in seconds.
    pub end_time: f64,
}

impl LyricLine {
    /// Build a line from its text and time span.
    pub fn new(text: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            text: text.into(),
            start_time,
            end_time,
        }
    }

    /// `end_time - start_time`.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// `true` when `start_time <= t < end_time`.
    pub fn contains(&self, t: f64) -> bool {
        self.start_time <= t && t < self.end_time
    }
}

/// Validated, immutable list of lyric lines sorted by start time.
///
/// Construction is the only fallible step; every query afterwards is total.
#[derive(Clone, Debug, serde::Serialize)]
pub struct Timeline {
    lines: Vec<LyricLine>,
}

impl Timeline {
    /// Validate `lines` and take ownership of them.
    ///
    /// Rejects an empty list, non-finite or negative times, `end_time <= start_time`, and lines
    /// that are not ascending by `start_time`.
    pub fn new(lines: Vec<LyricLine>) -> LyricaResult<Self> {
        if lines.is_empty() {
            return Err(LyricaError::invalid_timeline(
                "timeline must contain at least one line",
            ));
        }

        for (i, line) in lines.iter().enumerate() {
            if !line.start_time.is_finite() || !line.end_time.is_finite() {
                return Err(LyricaError::invalid_timeline(format!(
                    "line {i} has non-finite timing"
                )));
            }
            if line.start_time < 0.0 {
                return Err(LyricaError::invalid_timeline(format!(
                    "line {i} starts before 0 ({})",
                    line.start_time
                )));
            }
            if line.end_time <= line.start_time {
                return Err(LyricaError::invalid_timeline(format!(
                    "line {i} ends at {} which is not after its start {}",
                    line.end_time, line.start_time
                )));
            }
        }

        if let Some(i) = lines
            .windows(2)
            .position(|w| w[1].start_time < w[0].start_time)
        {
            return Err(LyricaError::invalid_timeline(format!(
                "lines are not ascending by start_time at index {}",
                i + 1
            )));
        }

        Ok(Self { lines })
    }

    /// Lines in timeline order.
    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    /// Number of lines (always >= 1).
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line at `idx`, if any.
    pub fn get(&self, idx: usize) -> Option<&LyricLine> {
        self.lines.get(idx)
    }

    /// First line of the song.
    pub fn first(&self) -> &LyricLine {
        &self.lines[0]
    }

    /// End time of the last line.
    pub fn end_time(&self) -> f64 {
        self.lines[self.lines.len() - 1].end_time
    }

    /// Index of the line being sung at `t`.
    ///
    /// Returns the first line with `start_time <= t < end_time`. When no line contains `t`
    /// (gaps, or past the end) this is the last line that has started, and `None` before the
    /// first line starts.
    pub fn active_line_index(&self, t: f64) -> Option<usize> {
        let mut last_started = None;
        for (i, line) in self.lines.iter().enumerate() {
            if line.start_time <= t {
                if t < line.end_time {
                    return Some(i);
                }
                last_started = Some(i);
            }
        }
        last_started
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
