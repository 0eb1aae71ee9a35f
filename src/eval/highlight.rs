use crate::timeline::model::Timeline;

/// Row width, in characters, lyric text is wrapped to.
pub const WRAP_MAX_CHARS: usize = 40;

/// Granularity of progressive highlight coloring on the active line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightMode {
    /// The whole active line is drawn in the active style.
    #[default]
    Line,
    /// Whitespace-delimited words light up in reading order.
    Word,
    /// Individual characters light up in reading order.
    Character,
}

/// Highlight state of the active line at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct HighlightState {
    /// Fraction of the active line that has been sung, in `[0, 1]`.
    pub progress: f64,
    /// Tokens drawn lit.
    pub lit_token_count: usize,
    /// Tokens in the line across all wrapped rows.
    pub total_token_count: usize,
}

impl HighlightState {
    /// State for `total` tokens at `progress`.
    pub fn new(progress: f64, total: usize) -> Self {
        Self {
            progress,
            lit_token_count: lit_token_count(total, progress),
            total_token_count: total,
        }
    }
}

/// One word or character of a wrapped line, tagged lit or dim.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct HighlightToken {
    /// Wrapped row the token belongs to.
    pub row: usize,
    /// Token text (words keep their trailing space except at the end of a row).
    pub text: String,
    /// Whether the token is drawn in the lit style.
    pub lit: bool,
}

pub(crate) fn highlight_progress(timeline: &Timeline, t: f64) -> f64 {
    let Some(line) = timeline.active_line_index(t).and_then(|i| timeline.get(i)) else {
        return 0.0;
    };
    let duration = line.duration();
    if duration.is_nan() || duration <= 0.0 {
        return 0.0;
    }
    ((t - line.start_time) / duration).clamp(0.0, 1.0)
}

/// Number of tokens `k` with `k < progress * total`.
pub fn lit_token_count(total: usize, progress: f64) -> usize {
    let threshold = progress.clamp(0.0, 1.0) * total as f64;
    (threshold.ceil() as usize).min(total)
}

/// Greedy word wrap to rows of at most `max_chars` characters.
///
/// Follows Python's `textwrap.wrap`: words may also break after a hyphen joining two words, and
/// a word longer than a whole row fills the rest of the current row before continuing in
/// row-sized pieces (preferring a hyphen inside the piece as the break). Whitespace runs collapse
/// to a single space and rows carry no trailing space; text without words produces no rows.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let width = max_chars.max(1);

    // Reversed so the next chunk is at the end; " " marks a gap between words.
    let mut chunks = Vec::new();
    for (i, word) in text.split_whitespace().enumerate() {
        if i > 0 {
            chunks.push(vec![' ']);
        }
        chunks.extend(hyphen_pieces(word));
    }
    chunks.reverse();

    let mut rows = Vec::new();
    while !chunks.is_empty() {
        if chunks.last().is_some_and(|c| c == &[' ']) {
            chunks.pop();
        }

        let mut row = Vec::<char>::new();
        while let Some(chunk) = chunks.last() {
            if row.len() + chunk.len() > width {
                break;
            }
            row.extend_from_slice(chunk);
            chunks.pop();
        }

        if let Some(chunk) = chunks.last_mut()
            && chunk.len() > width
        {
            let space_left = width - row.len();
            let end = chunk[..space_left]
                .iter()
                .rposition(|&c| c == '-')
                .filter(|&h| h > 0 && chunk[..h].iter().any(|&c| c != '-'))
                .map_or(space_left, |h| h + 1);
            row.extend(chunk.drain(..end));
        }

        let row = row.into_iter().collect::<String>();
        let row = row.trim_end();
        if !row.is_empty() {
            rows.push(row.to_string());
        }
    }
    rows
}

/// Split `word` after hyphens that join two words (`well-known` -> `well-`, `known`).
fn hyphen_pieces(word: &str) -> Vec<Vec<char>> {
    let chars = word.chars().collect::<Vec<_>>();
    let mut pieces = Vec::new();
    let mut start = 0;
    for i in 0..chars.len() {
        if chars[i] != '-' {
            continue;
        }
        let before = &chars[start..i];
        let after = chars[i + 1..]
            .iter()
            .take_while(|c| c.is_alphanumeric())
            .collect::<Vec<_>>();
        let joins_words = before.len() >= 2
            && before[before.len() - 2..].iter().all(|c| c.is_alphanumeric())
            && before[before.len() - 1].is_alphabetic()
            && after.len() >= 2
            && after[1..].iter().any(|c| c.is_alphabetic());
        if joins_words {
            pieces.push(chars[start..=i].to_vec());
            start = i + 1;
        }
    }
    pieces.push(chars[start..].to_vec());
    pieces
}

/// Split wrapped rows into highlight tokens in reading order, as `(row, text)` pairs.
///
/// `HighlightMode::Line` has no sub-line tokens.
pub fn tokenize(rows: &[String], mode: HighlightMode) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    match mode {
        HighlightMode::Line => {}
        HighlightMode::Word => {
            for (r, row) in rows.iter().enumerate() {
                let words = row.split_whitespace().collect::<Vec<_>>();
                let last = words.len().saturating_sub(1);
                for (i, w) in words.iter().enumerate() {
                    if i < last {
                        out.push((r, format!("{w} ")));
                    } else {
                        out.push((r, (*w).to_owned()));
                    }
                }
            }
        }
        HighlightMode::Character => {
            for (r, row) in rows.iter().enumerate() {
                out.extend(row.chars().map(|c| (r, c.to_string())));
            }
        }
    }
    out
}

/// Tokenize `rows` and mark the first `progress * total` tokens lit.
///
/// The boundary token is never partially lit.
pub fn partition_tokens(
    rows: &[String],
    mode: HighlightMode,
    progress: f64,
) -> (HighlightState, Vec<HighlightToken>) {
    let tokens = tokenize(rows, mode);
    let state = HighlightState::new(progress, tokens.len());
    let tokens = tokens
        .into_iter()
        .enumerate()
        .map(|(k, (row, text))| HighlightToken {
            row,
            text,
            lit: k < state.lit_token_count,
        })
        .collect();
    (state, tokens)
}

#[cfg(test)]
#[path = "../../tests/unit/eval/highlight.rs"]
mod tests;
