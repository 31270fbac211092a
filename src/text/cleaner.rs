//! Removal of player UI chrome from recognized text.
//!
//! Screenshots of a playlist carry transport icons, bullets, duration stamps
//! and badges around every title. These are stripped in a fixed order, the
//! later passes relying on the earlier noise being gone.

use lazy_static::lazy_static;
use regex::Regex;

/// Player transport icons, bullets and offline/download badges.
///
/// U+FE0F is the emoji variation selector that OCR output often keeps
/// attached to an icon (e.g. `▶️`).
pub const UI_GLYPHS: &[char] = &[
    '►', '▶', '⏸', '⏯', '⏭', '⏮', '⏹', '🔀', '🔁', '•', '●', '◦', '⬇', '💾', '📱', '\u{FE0F}',
];

lazy_static! {
    static ref DOT_RUN: Regex =
        Regex::new(r"\.{3,}|…").expect("Invalid Regex, this should be fixed at runtime.");
    static ref VIDEO_WORD: Regex =
        Regex::new(r"(?i)\bvideo\b").expect("Invalid Regex, this should be fixed at runtime.");
    static ref DURATION: Regex =
        Regex::new(r"\d{1,2}:\d{2}").expect("Invalid Regex, this should be fixed at runtime.");
    static ref WHITESPACE_RUN: Regex =
        Regex::new(r"\s+").expect("Invalid Regex, this should be fixed at runtime.");
}

/// Clean a line (or block) of recognized text.
///
/// Removing one kind of noise can expose another (`"..Video."` becomes
/// `"..."`), so the passes are repeated until the text stops changing.
/// The result is therefore stable: cleaning it again is a no-op.
/// The returned string may be empty.
pub fn clean_line(text: &str) -> String {
    let mut current = clean_once(text);
    loop {
        let next = clean_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn clean_once(text: &str) -> String {
    let text: String = text.chars().filter(|c| !UI_GLYPHS.contains(c)).collect();
    let text = DOT_RUN.replace_all(&text, "");
    let text = VIDEO_WORD.replace_all(&text, "");
    let text = DURATION.replace_all(&text, "");
    WHITESPACE_RUN.replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_player_glyphs() {
        assert_eq!(clean_line("▶️ Blinding Lights"), "Blinding Lights");
        assert_eq!(clean_line("● The Weeknd •"), "The Weeknd");
        assert_eq!(clean_line("⬇ 💾 Levitating 🔀"), "Levitating");
    }

    #[test]
    fn test_removes_ellipsis_and_dot_runs() {
        assert_eq!(clean_line("Some Very Long Title…"), "Some Very Long Title");
        assert_eq!(clean_line("Another Title....."), "Another Title");
        // Two dots are not an ellipsis
        assert_eq!(clean_line("Mr.. Brightside"), "Mr.. Brightside");
    }

    #[test]
    fn test_removes_video_word_only_as_whole_word() {
        assert_eq!(clean_line("Video Killed"), "Killed");
        assert_eq!(clean_line("VIDEO Song"), "Song");
        assert_eq!(clean_line("Videogames"), "Videogames");
        assert_eq!(clean_line("My Video Star"), "My Star");
    }

    #[test]
    fn test_removes_durations() {
        assert_eq!(clean_line("Bohemian Rhapsody 5:55"), "Bohemian Rhapsody");
        assert_eq!(clean_line("3:20"), "");
        assert_eq!(clean_line("12:05 Long Mix"), "Long Mix");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean_line("  Dua    Lipa \t "), "Dua Lipa");
        assert_eq!(clean_line("\n\n"), "");
    }

    #[test]
    fn test_noise_exposed_by_earlier_pass_is_removed() {
        assert_eq!(clean_line("..Video."), "");
        assert_eq!(clean_line("Title ..3:45."), "Title");
        assert_eq!(clean_line("Vid●eo Star"), "Star");
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        let samples = [
            "",
            "   ",
            "▶️ Blinding Lights - The Weeknd 3:20 ...",
            "..Video.",
            "Vi Video deo",
            "1:2:345",
            "….…Title…",
            "●●●",
            "Song • Artist • Video",
            "Stand by Me",
            "12:3456:78",
            "a . . . b",
        ];
        for sample in samples {
            let once = clean_line(sample);
            assert_eq!(clean_line(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
