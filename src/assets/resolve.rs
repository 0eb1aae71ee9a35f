use std::path::{Path, PathBuf};

use crate::foundation::error::{LyricaError, LyricaResult};

/// Default input root, relative to the working directory.
pub const DEFAULT_INPUT_DIR: &str = "input";
/// Audio extensions tried in order when matching a song name.
pub const AUDIO_EXTENSIONS: [&str; 2] = ["mp3", "wav"];

/// Files matched for one song.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongInputs {
    /// Lyrics JSON.
    pub lyrics: PathBuf,
    /// Audio track.
    pub audio: PathBuf,
}

/// `<input_dir>/lyrics/<song>.json`, which must exist.
pub fn resolve_lyrics(input_dir: &Path, song: &str) -> LyricaResult<PathBuf> {
    check_song_name(song)?;
    let path = input_dir.join("lyrics").join(format!("{song}.json"));
    if path.is_file() {
        return Ok(path);
    }
    Err(LyricaError::validation(format!(
        "lyrics file not found: '{}'; place the lyrics JSON for '{song}' there",
        path.display()
    )))
}

/// First of `<input_dir>/audio/<song>.{mp3,wav}` that exists.
pub fn resolve_audio(input_dir: &Path, song: &str) -> LyricaResult<PathBuf> {
    check_song_name(song)?;
    let audio_dir = input_dir.join("audio");
    AUDIO_EXTENSIONS
        .iter()
        .map(|ext| audio_dir.join(format!("{song}.{ext}")))
        .find(|p| p.is_file())
        .ok_or_else(|| {
            LyricaError::validation(format!(
                "no audio file for '{song}' in '{}'; expected '{}' (supported: {})",
                audio_dir.display(),
                audio_dir.join(format!("{song}.mp3")).display(),
                AUDIO_EXTENSIONS.join(", ")
            ))
        })
}

fn check_song_name(song: &str) -> LyricaResult<()> {
    if song.is_empty() || song.contains(['/', '\\']) {
        return Err(LyricaError::validation(format!(
            "song name must be a bare file stem, got '{song}'"
        )));
    }
    Ok(())
}

/// Match lyrics and audio for `song` under `input_dir`.
///
/// An explicit path replaces the matched one and is taken as given; only matched paths are
/// required to exist here. The name is checked even when both paths are explicit.
#[tracing::instrument(skip(input_dir, lyrics_override, audio_override))]
pub fn resolve_song(
    input_dir: &Path,
    song: &str,
    lyrics_override: Option<&Path>,
    audio_override: Option<&Path>,
) -> LyricaResult<SongInputs> {
    check_song_name(song)?;
    let lyrics = match lyrics_override {
        Some(p) => p.to_path_buf(),
        None => resolve_lyrics(input_dir, song)?,
    };
    let audio = match audio_override {
        Some(p) => p.to_path_buf(),
        None => resolve_audio(input_dir, song)?,
    };
    tracing::debug!(lyrics = %lyrics.display(), audio = %audio.display(), "resolved song inputs");
    Ok(SongInputs { lyrics, audio })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolve.rs"]
mod tests;
