//! Markup query helpers over the `scraper` crate.
//!
//! Lookups a page layout guarantees use the `select_first` / `attr` family,
//! which turn an empty match into [`Error::Parse`]. Optional lookups use
//! `find_first`.

use crate::error::{Error, Result};
use regex::Regex;
use scraper::{ElementRef, Selector};

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Selector(format!("{css}: {e:?}")))
}

pub fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Result<Vec<ElementRef<'a>>> {
    let sel = selector(css)?;
    Ok(scope.select(&sel).collect())
}

pub fn find_first<'a>(scope: ElementRef<'a>, css: &str) -> Result<Option<ElementRef<'a>>> {
    let sel = selector(css)?;
    Ok(scope.select(&sel).next())
}

pub fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Result<ElementRef<'a>> {
    find_first(scope, css)?.ok_or_else(|| Error::parse(format!("no element matches {css:?}")))
}

/// Whether anything under `scope` matches `css`.
pub fn exists(scope: ElementRef<'_>, css: &str) -> Result<bool> {
    Ok(find_first(scope, css)?.is_some())
}

/// All text below `el`, concatenated and trimmed.
pub fn text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// The first non-blank text node below `el`, trimmed.
pub fn first_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .unwrap_or("")
        .to_string()
}

pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> Result<&'a str> {
    el.value()
        .attr(name)
        .ok_or_else(|| Error::parse(format!("<{}> has no {name} attribute", el.value().name())))
}

pub fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

pub fn classes(el: ElementRef<'_>) -> Vec<String> {
    el.value().classes().map(str::to_string).collect()
}

pub fn regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Selector(format!("{pattern}: {e}")))
}

/// Drop every non-ASCII character, after mapping U+2212 MINUS SIGN to `-`.
///
/// Numbers on game pages are wrapped in bidi isolation marks and use the
/// typographic minus for negatives.
pub fn ascii_only(raw: &str) -> String {
    raw.chars()
        .map(|c| if c == '\u{2212}' { '-' } else { c })
        .filter(char::is_ascii)
        .collect()
}

/// Parse a locale-formatted integer such as `"\u{202d}12,345\u{202c}"`.
pub fn parse_number(raw: &str, what: &str) -> Result<i64> {
    let cleaned = ascii_only(raw).replace(',', "");
    cleaned
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::parse(format!("{what}: not a number: {raw:?}")))
}

/// Parse the text of `el` as a locale-formatted integer.
pub fn number(el: ElementRef<'_>, what: &str) -> Result<i64> {
    parse_number(&text(el), what)
}
