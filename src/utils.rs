//! Text cleanup helpers for extracted page text and log output.
//!
//! - [`remove_decorative`]: strip emoji and pictographs
//! - [`remove_phrases`]: strip Spanish navigation boilerplate
//! - [`truncate_for_log`] and [`slugify_url`] for logs and file names

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

static DECORATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        "[",
        "\u{1F600}-\u{1F64F}",
        "\u{1F300}-\u{1F5FF}",
        "\u{1F680}-\u{1F6FF}",
        "\u{1F1E0}-\u{1F1FF}",
        "\u{2700}-\u{27BF}",
        "\u{1F900}-\u{1F9FF}",
        "\u{2600}-\u{26FF}",
        "\u{2B00}-\u{2BFF}",
        "\u{2300}-\u{23FF}",
        "]+"
    ))
    .expect("decorative regex is valid")
});

/// Navigation phrases that carry no content.
pub const SAFE_PHRASES: &[&str] = &[
    r"\bAnterior\b",
    r"\bSiguiente\b",
    r"Página siguiente",
    r"Seleccionar país",
    r"Más información",
    r"Leer más",
    r"Todas las opiniones",
];

static PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| {
    SAFE_PHRASES
        .iter()
        .filter_map(|p| RegexBuilder::new(p).case_insensitive(true).build().ok())
        .collect()
});

static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("space regex is valid"));
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("blank line regex is valid"));

fn collapse(text: &str) -> String {
    let text = SPACE_RUN.replace_all(text, " ");
    BLANK_LINES.replace_all(&text, "\n").trim().to_string()
}

/// Remove emoji, pictographs, dingbats and arrows, then tidy whitespace.
pub fn remove_decorative(text: &str) -> String {
    collapse(&DECORATIVE.replace_all(text, ""))
}

/// Remove [`SAFE_PHRASES`] (case-insensitive), then tidy whitespace.
pub fn remove_phrases(text: &str) -> String {
    let mut text = text.to_string();
    for phrase in PHRASES.iter() {
        text = phrase.replace_all(&text, "").into_owned();
    }
    let text = BLANK_LINES.replace_all(&text, "\n");
    SPACE_RUN.replace_all(&text, " ").trim().to_string()
}

/// Truncate a string for logging, appending how many bytes were cut.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Turn a URL into a file-name-safe slug: `https://a.mx/b?c` -> `a-mx-b-c`.
pub fn slugify_url(url: &str) -> String {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    without_scheme
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_decorative() {
        let text = "🔥 Ofertas  de   hoy ✨\n\n\n📞 Llámanos ☎ ya";
        assert_eq!(remove_decorative(text), "Ofertas de hoy \n Llámanos ya");
    }

    #[test]
    fn test_remove_decorative_keeps_accents_and_symbols() {
        assert_eq!(remove_decorative("Teléfono: +52 (449)"), "Teléfono: +52 (449)");
    }

    #[test]
    fn test_remove_phrases() {
        let text = "Menú del día\nLEER MÁS\nAnterior  Siguiente\nTacos al pastor Más información";
        assert_eq!(remove_phrases(text), "Menú del día\nTacos al pastor");
    }

    #[test]
    fn test_phrases_respect_word_boundaries() {
        assert_eq!(remove_phrases("Anteriormente vendíamos"), "Anteriormente vendíamos");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.ends_with("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        assert_eq!(truncate_for_log("ññ", 3), "ñ…(+2 bytes)");
    }

    #[test]
    fn test_slugify_url() {
        assert_eq!(slugify_url("https://Tienda.mx/contacto?x=1"), "tienda-mx-contacto-x-1");
        assert_eq!(slugify_url("tienda.mx"), "tienda-mx");
        assert_eq!(slugify_url("https://café.mx/"), "café-mx");
    }
}
