use rand::{Rng, distr::Alphanumeric};

/// File-name suffixes the engine may leak into its recommendation, since
/// the dataset is keyed by audio file names.
const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "wav", "flac", "m4a", "ogg", "aac"];

pub fn generate_session_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

pub fn generate_state_param() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Strips one trailing parenthetical annotation from a track title.
///
/// `"Levitating (feat. DaBaby)"` becomes `"Levitating"`; titles without a
/// trailing parenthetical, and titles that are nothing but a parenthetical,
/// come back trimmed but otherwise unchanged. Runs before the engine is
/// invoked, never inside it.
pub fn strip_trailing_parenthetical(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.ends_with(')') {
        if let Some(open) = trimmed.rfind('(') {
            if open > 0 {
                return trimmed[..open].trim_end().to_string();
            }
        }
    }
    trimmed.to_string()
}

/// Strips a trailing audio file extension from an engine recommendation.
///
/// `"Physical.mp3"` becomes `"Physical"`. Only known audio extensions are
/// removed so titles containing dots survive intact.
pub fn strip_audio_extension(name: &str) -> String {
    let trimmed = name.trim();
    if let Some((stem, ext)) = trimmed.rsplit_once('.') {
        if !stem.is_empty() && AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
            return stem.trim_end().to_string();
        }
    }
    trimmed.to_string()
}

/// Parses the comma-separated "not found" marker allow-list into lowercase
/// entries, dropping empty segments.
pub fn parse_marker_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|m| m.trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .collect()
}

/// Extracts the first column of a headered CSV, used to pick a random
/// dataset entry. Quoting is not handled; the dataset's file-name column
/// never contains commas.
pub fn csv_first_column(contents: &str) -> Vec<String> {
    contents
        .lines()
        .skip(1)
        .filter_map(|line| line.split(',').next())
        .map(|field| field.trim().to_string())
        .filter(|field| !field.is_empty())
        .collect()
}
