//! Text normalization for raw extractor output.
//!
//! `normalize` is a total function: it never fails and is idempotent, so
//! the recovery subsystem can safely re-apply it to already-clean text.

pub mod format_specific;

/// Mojibake repairs for currency and accented glyphs that upstream PDF
/// text extraction commonly mangles. Order matters: multi-byte artifacts
/// are replaced before their prefixes.
const ENCODING_REPAIRS: &[(&str, &str)] = &[
    ("\u{fffd}", ""),
    ("â‚¬", "€"),
    ("â€™", "'"),
    ("Ã¤", "ä"),
    ("Ã¶", "ö"),
    ("Ã¼", "ü"),
    ("Ã„", "Ä"),
    ("Ã–", "Ö"),
    ("Ãœ", "Ü"),
    ("ÃŸ", "ß"),
    ("Ã©", "é"),
    ("Ã¨", "è"),
    ("Ãª", "ê"),
    ("Ã§", "ç"),
    ("Ã ", "à"),
    ("Ã¡", "á"),
    ("Ã­", "í"),
    ("Ã³", "ó"),
    ("Ãº", "ú"),
    ("Ã±", "ñ"),
    ("Â£", "£"),
    ("Â¥", "¥"),
    ("Â°", "°"),
];

/// Normalize raw invoice text.
///
/// Repairs encoding artifacts, unifies line endings to `\n`, strips BOM
/// and zero-width characters, converts non-breaking spaces to regular
/// spaces, collapses runs of spaces and tabs, trims trailing whitespace
/// per line, and collapses runs of blank lines. Line boundaries are
/// preserved; downstream extractors are line-anchored.
pub fn normalize(raw: &str) -> String {
    let mut text = raw.replace("\r\n", "\n").replace('\r', "\n");

    for (artifact, replacement) in ENCODING_REPAIRS {
        if text.contains(artifact) {
            text = text.replace(artifact, replacement);
        }
    }

    let text: String = text
        .chars()
        .filter(|c| !matches!(c, '\u{feff}' | '\u{200b}' | '\u{200c}' | '\u{200d}'))
        .map(|c| if c == '\u{00a0}' || c == '\t' { ' ' } else { c })
        .collect();

    let mut lines: Vec<String> = Vec::new();
    let mut blank_run = 0usize;
    for line in text.lines() {
        let mut cleaned = String::with_capacity(line.len());
        let mut last_was_space = false;
        for c in line.chars() {
            if c == ' ' {
                if !last_was_space {
                    cleaned.push(' ');
                }
                last_was_space = true;
            } else {
                cleaned.push(c);
                last_was_space = false;
            }
        }
        let cleaned = cleaned.trim_end().to_string();

        if cleaned.is_empty() {
            blank_run += 1;
            if blank_run == 1 {
                lines.push(cleaned);
            }
        } else {
            blank_run = 0;
            lines.push(cleaned);
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idempotent() {
        let samples = [
            "Rechnung\r\nBestellnummer:  302-4563851-9372615\r\n\r\n\r\n66,38 â‚¬",
            "  plain text  ",
            "",
            "a\n\n\n\nb",
            "Ã¤Ã¶Ã¼ÃŸ Â£10.00\t\tx",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_currency_mojibake_repaired() {
        assert_eq!(normalize("66,38 â‚¬"), "66,38 €");
        assert_eq!(normalize("Â£23.99"), "£23.99");
    }

    #[test]
    fn test_accents_repaired() {
        assert_eq!(normalize("GebÃ¼hr"), "Gebühr");
        assert_eq!(normalize("numÃ©ro"), "numéro");
    }

    #[test]
    fn test_line_structure_preserved() {
        let text = "line one   \nline two\n\n\n\nline three";
        assert_eq!(normalize(text), "line one\nline two\n\nline three");
    }

    #[test]
    fn test_nbsp_and_tabs_become_spaces() {
        assert_eq!(normalize("1\u{00a0}234,56 €"), "1 234,56 €");
        assert_eq!(normalize("a\tb"), "a b");
    }

    #[test]
    fn test_crlf_unified() {
        assert_eq!(normalize("a\r\nb\rc"), "a\nb\nc");
    }
}
