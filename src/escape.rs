//! Percent-escaping of the values embedded as url path segments.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::settings::Escaping;

// Bytes left alone by the browser escape() function.
const LEGACY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'@')
    .remove(b'*')
    .remove(b'_')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'/');

// RFC 3986 unreserved.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

impl Escaping {
    fn ascii_set(self) -> &'static AsciiSet {
        match self {
            Escaping::Legacy => LEGACY,
            Escaping::Component => COMPONENT,
        }
    }
}

/// Escapes `value` for use inside a path segment. Non-ASCII text is escaped
/// byte-wise from its UTF-8 encoding.
pub fn escape(value: &str, escaping: Escaping) -> String {
    utf8_percent_encode(value, escaping.ascii_set()).to_string()
}

/// Backslash-escapes double quotes so a value can sit inside `"..."`.
pub fn quote(value: &str) -> String {
    value.replace('"', "\\\"")
}
