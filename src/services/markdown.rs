use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BOLD: Regex = Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern");
    static ref ITALIC: Regex = Regex::new(r"\*(.+?)\*").expect("italic pattern");
    static ref LINK: Regex = Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("link pattern");
    static ref HEADER: Regex = Regex::new(r"(?m)^#+\s*").expect("header pattern");
    static ref CODE: Regex = Regex::new(r"`([^`]+)`").expect("code pattern");
}

/// Strip markdown decoration from model prose so the frontend can render it as plain text.
///
/// Substitutions run in a fixed order: bold, italic, links (text kept), headers, inline code.
pub fn clean(text: &str) -> String {
    let text = BOLD.replace_all(text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = LINK.replace_all(&text, "$1");
    let text = HEADER.replace_all(&text, "");
    let text = CODE.replace_all(&text, "$1");
    text.trim().to_string()
}
