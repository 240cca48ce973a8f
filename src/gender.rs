//! Checkbox-based gender detection in word-processing document markup
//!
//! CV templates often render "Giới tính: ☐ Nam ☐ Nữ" with checkbox glyphs
//! instead of plain text, so the selected value never reaches the text
//! transcript. This module looks at the raw `word/document.xml` body and
//! tries three strategies in order:
//!
//! 1. legacy form fields (`w:fldChar` begin/end pairs with `FORMCHECKBOX`)
//! 2. structured content controls (`w:sdt` blocks carrying checkbox state)
//! 3. symbol-font glyphs (`w:sym` with the checked/empty box codes), resolved
//!    by proximity of "Nam"/"Nữ" to the middle of the glyph's context window

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static FORM_FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)<w:fldChar[^>]*w:fldCharType="begin"[^>]*>.*?<w:fldChar[^>]*w:fldCharType="end"[^>]*>"#,
    )
    .unwrap()
});

static CONTENT_CONTROL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<w:sdt[\s>].*?</w:sdt>").unwrap());

static SYM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<w:sym\b([^>]*?)/?>").unwrap());
static SYM_FONT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"w:font="([^"]*)""#).unwrap());
static SYM_CHAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"w:char="([^"]*)""#).unwrap());

static TEXT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

static GENDER_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)nam|nữ").unwrap());

/// Gender value selected in a CV
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Nam,
    Nu,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Nam => "Nam",
            Gender::Nu => "Nữ",
        }
    }

    /// Normalize a matched token (`nam`, `NỮ`, `male`, ...) to a gender
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "nam" | "male" => Some(Gender::Nam),
            "nữ" | "female" => Some(Gender::Nu),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbol-font checkbox settings
#[derive(Debug, Clone)]
pub struct CheckboxConfig {
    /// Font name of `w:sym` glyphs treated as checkboxes (default: Wingdings)
    pub symbol_font: String,
    /// Glyph code of a ticked box (default: F0FE, ☑)
    pub checked_code: String,
    /// Glyph code of an empty box (default: F0A8, ☐)
    pub empty_code: String,
    /// Bytes of markup taken on each side of a glyph for context
    pub context_radius: usize,
}

impl Default for CheckboxConfig {
    fn default() -> Self {
        Self {
            symbol_font: "Wingdings".to_string(),
            checked_code: "F0FE".to_string(),
            empty_code: "F0A8".to_string(),
            context_radius: 500,
        }
    }
}

/// A checkbox glyph found in the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckboxSymbol {
    pub code: String,
    /// Byte offset of the `w:sym` element
    pub offset: usize,
    pub checked: bool,
    pub surrounding_text: String,
}

/// Find the gender selected via a checkbox, using the default config
pub fn find_checked_gender(markup: &str) -> Option<Gender> {
    find_checked_gender_with_config(markup, &CheckboxConfig::default())
}

/// Find the gender selected via a checkbox.
///
/// Returns `None` when no strategy finds a ticked gender box; that is the
/// normal outcome for documents without checkboxes.
pub fn find_checked_gender_with_config(markup: &str, config: &CheckboxConfig) -> Option<Gender> {
    if let Some(gender) = from_form_fields(markup) {
        debug!("gender {} from form field", gender);
        return Some(gender);
    }
    if let Some(gender) = from_content_controls(markup) {
        debug!("gender {} from content control", gender);
        return Some(gender);
    }
    let gender = from_symbol_glyphs(markup, config);
    if let Some(gender) = gender {
        debug!("gender {} from symbol glyph", gender);
    }
    gender
}

fn from_form_fields(markup: &str) -> Option<Gender> {
    FORM_FIELD_RE
        .find_iter(markup)
        .map(|m| m.as_str())
        .filter(|field| field.contains("FORMCHECKBOX") || field.contains('☑') || field.contains('☐'))
        .find_map(|field| first_gender_token(&markup_text(field)))
}

fn from_content_controls(markup: &str) -> Option<Gender> {
    CONTENT_CONTROL_RE
        .find_iter(markup)
        .map(|m| m.as_str())
        .filter(|block| block.contains("checkbox") || block.contains("checked"))
        .find_map(|block| first_gender_token(&markup_text(block)))
}

fn from_symbol_glyphs(markup: &str, config: &CheckboxConfig) -> Option<Gender> {
    scan_checkbox_symbols(markup, config)
        .iter()
        .filter(|s| s.checked)
        .find_map(|s| gender_near_middle(&s.surrounding_text))
}

/// Collect every symbol-font checkbox glyph with its context text
pub fn scan_checkbox_symbols(markup: &str, config: &CheckboxConfig) -> Vec<CheckboxSymbol> {
    let mut symbols = Vec::new();

    for caps in SYM_RE.captures_iter(markup) {
        let attrs = &caps[1];
        let font_matches = SYM_FONT_RE
            .captures(attrs)
            .is_some_and(|f| f[1].eq_ignore_ascii_case(&config.symbol_font));
        if !font_matches {
            continue;
        }
        let Some(code) = SYM_CHAR_RE.captures(attrs).map(|c| c[1].to_string()) else {
            continue;
        };

        let offset = caps.get(0).map_or(0, |m| m.start());
        let start = floor_char_boundary(markup, offset.saturating_sub(config.context_radius));
        let end = floor_char_boundary(markup, offset.saturating_add(config.context_radius));
        let surrounding_text = text_fragments(&markup[start..end]).join(" ");
        let checked = code.eq_ignore_ascii_case(&config.checked_code);

        trace!(
            "glyph {} at {} (checked: {}, empty: {}): {:?}",
            code,
            offset,
            checked,
            code.eq_ignore_ascii_case(&config.empty_code),
            surrounding_text
        );

        symbols.push(CheckboxSymbol {
            code,
            offset,
            checked,
            surrounding_text,
        });
    }

    symbols
}

/// Pick the gender word a checked glyph labels from its context text.
///
/// The context must mention the gender category (`giới` or `tính`). When both
/// values appear, the one nearer the middle of the context wins; on a tie the
/// earlier one does.
fn gender_near_middle(context: &str) -> Option<Gender> {
    let lower = context.to_lowercase();
    if !(lower.contains("giới") || lower.contains("tính")) {
        return None;
    }

    let nam = char_index_of(&lower, "nam");
    let nu = char_index_of(&lower, "nữ");

    match (nam, nu) {
        (Some(_), None) => Some(Gender::Nam),
        (None, Some(_)) => Some(Gender::Nu),
        (Some(nam_pos), Some(nu_pos)) => {
            let mid = lower.chars().count() as f64 / 2.0;
            let nam_dist = (nam_pos as f64 - mid).abs();
            let nu_dist = (nu_pos as f64 - mid).abs();
            if nam_dist < nu_dist || (nam_dist == nu_dist && nam_pos < nu_pos) {
                Some(Gender::Nam)
            } else {
                Some(Gender::Nu)
            }
        }
        (None, None) => None,
    }
}

fn first_gender_token(text: &str) -> Option<Gender> {
    GENDER_TOKEN_RE
        .find(text)
        .and_then(|m| Gender::from_token(m.as_str()))
}

fn char_index_of(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .find(needle)
        .map(|byte_pos| haystack[..byte_pos].chars().count())
}

/// Trimmed, non-empty `<w:t>` run contents of a markup fragment
fn text_fragments(fragment: &str) -> Vec<String> {
    TEXT_RUN_RE
        .captures_iter(fragment)
        .map(|c| TAG_RE.replace_all(&c[1], "").trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Plain text of a markup fragment: text runs if any, otherwise tags stripped
fn markup_text(fragment: &str) -> String {
    let runs = text_fragments(fragment);
    if runs.is_empty() {
        TAG_RE.replace_all(fragment, " ").to_string()
    } else {
        runs.join(" ")
    }
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> String {
        format!("<w:r><w:t>{}</w:t></w:r>", text)
    }

    fn sym(code: &str) -> String {
        format!(r#"<w:r><w:sym w:font="Wingdings" w:char="{}"/></w:r>"#, code)
    }

    #[test]
    fn test_gender_from_token() {
        assert_eq!(Gender::from_token("NAM"), Some(Gender::Nam));
        assert_eq!(Gender::from_token("Nữ"), Some(Gender::Nu));
        assert_eq!(Gender::from_token("female"), Some(Gender::Nu));
        assert_eq!(Gender::from_token("khác"), None);
        assert_eq!(Gender::Nu.to_string(), "Nữ");
    }

    #[test]
    fn test_gender_near_middle_single_word() {
        assert_eq!(gender_near_middle("Giới tính: Nữ"), Some(Gender::Nu));
        assert_eq!(gender_near_middle("Họ tên: Nam"), None);
    }

    #[test]
    fn test_gender_near_middle_prefers_nearest() {
        // 21 chars, mid 10.5: "nam" at 11, "nữ" at 17
        assert_eq!(gender_near_middle("Giới tính: Nam ☑ Nữ ☐"), Some(Gender::Nam));
        // 20 chars, mid 10: "nữ" at 6, "nam" at 17
        assert_eq!(gender_near_middle("tính: nữ x giới: nam"), Some(Gender::Nu));
    }

    #[test]
    fn test_gender_near_middle_tie_first_wins() {
        // 16 chars, mid 8: "nữ" at 5 and "nam" at 11
        let ctx = "tính nữ ab namxy";
        assert_eq!(ctx.chars().count(), 16);
        assert_eq!(gender_near_middle(ctx), Some(Gender::Nu));

        // 16 chars, mid 8: "nam" at 5 and "nữ" at 11
        let ctx = "tính nam a nữxyz";
        assert_eq!(ctx.chars().count(), 16);
        assert_eq!(gender_near_middle(ctx), Some(Gender::Nam));
    }

    #[test]
    fn test_scan_symbols_context_and_checked() {
        let markup = format!(
            "{}{}{}{}{}",
            run("Giới tính:"),
            sym("F0FE"),
            run("Nam"),
            sym("F0A8"),
            run("Nữ")
        );
        let symbols = scan_checkbox_symbols(&markup, &CheckboxConfig::default());
        assert_eq!(symbols.len(), 2);
        assert!(symbols[0].checked);
        assert!(!symbols[1].checked);
        assert_eq!(symbols[0].surrounding_text, "Giới tính: Nam Nữ");
        assert!(symbols[0].offset < symbols[1].offset);
    }

    #[test]
    fn test_scan_ignores_other_fonts() {
        let markup = r#"<w:sym w:font="Symbol" w:char="F0FE"/>"#;
        assert!(scan_checkbox_symbols(markup, &CheckboxConfig::default()).is_empty());
    }

    #[test]
    fn test_scan_attribute_order() {
        let markup = r#"<w:sym w:char="F0FE" w:font="Wingdings"/>"#;
        let symbols = scan_checkbox_symbols(markup, &CheckboxConfig::default());
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].code, "F0FE");
        assert_eq!(symbols[0].surrounding_text, "");
    }

    #[test]
    fn test_form_field_strategy() {
        let markup = concat!(
            r#"<w:r><w:fldChar w:fldCharType="begin"><w:ffData><w:name w:val="Check1"/>"#,
            r#"<w:checkBox><w:default w:val="1"/></w:checkBox></w:ffData></w:fldChar></w:r>"#,
            r#"<w:r><w:instrText> FORMCHECKBOX </w:instrText></w:r>"#,
            r#"<w:r><w:t>Nữ</w:t></w:r>"#,
            r#"<w:r><w:fldChar w:fldCharType="end"/></w:r>"#,
        );
        assert_eq!(find_checked_gender(markup), Some(Gender::Nu));
    }

    #[test]
    fn test_content_control_strategy() {
        let markup = concat!(
            r#"<w:sdt><w:sdtPr><w14:checkbox><w14:checked w14:val="1"/></w14:checkbox></w:sdtPr>"#,
            r#"<w:sdtContent><w:r><w:t>☒ Nam</w:t></w:r></w:sdtContent></w:sdt>"#,
        );
        assert_eq!(find_checked_gender(markup), Some(Gender::Nam));
    }

    #[test]
    fn test_plain_sdt_without_checkbox_ignored() {
        let markup = r#"<w:sdt><w:sdtContent><w:r><w:t>Nam</w:t></w:r></w:sdtContent></w:sdt>"#;
        assert_eq!(find_checked_gender(markup), None);
    }

    #[test]
    fn test_floor_char_boundary() {
        let s = "aữb";
        assert_eq!(floor_char_boundary(s, 2), 1);
        assert_eq!(floor_char_boundary(s, 100), s.len());
    }
}
