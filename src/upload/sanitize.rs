/// Replace every character outside `[A-Za-z0-9._-]` with `_`
pub fn sanitize_filename(original: &str) -> String {
    original
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Sanitized names that would not name a regular file inside the directory
pub fn is_storable(sanitized: &str) -> bool {
    !matches!(sanitized, "" | "." | "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("my video!!.mp4"), "my_video__.mp4");
        assert_eq!(sanitize_filename("a/b\\c.mp3"), "a_b_c.mp3");
        assert_eq!(sanitize_filename("final-2024_v2.webm"), "final-2024_v2.webm");
    }

    #[test]
    fn test_non_ascii_is_replaced_per_character() {
        assert_eq!(sanitize_filename("Гимн.mp3"), "____.mp3");
        assert_eq!(sanitize_filename("🎵.ogg"), "_.ogg");
    }

    #[test]
    fn test_idempotent() {
        for name in ["my video!!.mp4", "Гимн.mp3", "../../etc/passwd", "plain.mp4", ""] {
            let once = sanitize_filename(name);
            assert_eq!(sanitize_filename(&once), once);
        }
    }

    #[test]
    fn test_traversal_is_flattened() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert!(is_storable(".._.._etc_passwd"));
    }

    #[test]
    fn test_is_storable() {
        assert!(!is_storable(""));
        assert!(!is_storable("."));
        assert!(!is_storable(".."));
        assert!(is_storable("..."));
        assert!(is_storable("clip.mp4"));
    }
}
