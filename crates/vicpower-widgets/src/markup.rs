#![forbid(unsafe_code)]

//! Minimal HTML/SVG writer.
//!
//! [`Markup`] appends to a `String`. Text and attribute values are always
//! escaped; [`Markup::raw`] is the only way to emit unescaped content.
//! Numbers written into SVG attributes go through [`num`] so that output is
//! stable (two decimals, no `-0`).

use std::fmt::{self, Write};

/// An attribute list: `(name, value)` pairs, written in order.
pub type Attrs<'a> = &'a [(&'a str, &'a str)];

/// Accumulating markup buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    buf: String,
}

impl Markup {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty buffer with reserved capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
        }
    }

    /// `<tag attrs>`
    pub fn open(&mut self, tag: &str, attrs: Attrs<'_>) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.write_attrs(attrs);
        self.buf.push('>');
        self
    }

    /// `</tag>`
    pub fn close(&mut self, tag: &str) -> &mut Self {
        self.buf.push_str("</");
        self.buf.push_str(tag);
        self.buf.push('>');
        self
    }

    /// `<tag attrs/>`, for SVG shapes and HTML void elements.
    pub fn void(&mut self, tag: &str, attrs: Attrs<'_>) -> &mut Self {
        self.buf.push('<');
        self.buf.push_str(tag);
        self.write_attrs(attrs);
        self.buf.push_str("/>");
        self
    }

    /// `<tag attrs>text</tag>` with `text` escaped.
    pub fn element(&mut self, tag: &str, attrs: Attrs<'_>, text: &str) -> &mut Self {
        self.open(tag, attrs);
        self.text(text);
        self.close(tag)
    }

    /// Escaped text.
    pub fn text(&mut self, text: &str) -> &mut Self {
        escape_into(&mut self.buf, text);
        self
    }

    /// Unescaped content. Callers guarantee it is well formed.
    pub fn raw(&mut self, markup: &str) -> &mut Self {
        self.buf.push_str(markup);
        self
    }

    /// Append another buffer.
    pub fn append(&mut self, other: &Markup) -> &mut Self {
        self.buf.push_str(&other.buf);
        self
    }

    /// Newline, for readable output between block elements.
    pub fn newline(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// The markup so far.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the buffer.
    pub fn into_string(self) -> String {
        self.buf
    }

    fn write_attrs(&mut self, attrs: Attrs<'_>) {
        for (name, value) in attrs {
            self.buf.push(' ');
            self.buf.push_str(name);
            self.buf.push_str("=\"");
            escape_into(&mut self.buf, value);
            self.buf.push('"');
        }
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}

impl Write for Markup {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}

/// HTML-escape `s` into `out`.
pub fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// HTML-escape `s`.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(&mut out, s);
    out
}

/// Format a coordinate: at most two decimals, trailing zeros trimmed.
/// Non-finite values become `0`.
pub fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let rounded = (v * 100.0).round() / 100.0;
    let mut s = format!("{:.2}", rounded + 0.0);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}
