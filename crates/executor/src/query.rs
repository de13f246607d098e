//! Lexical structure of a query.
//!
//! ```text
//! query   := segment (" : " segment)*
//! segment := token (whitespace rest)?
//! ```

/// Separator between the segments of a chain. The spaces are part of it:
/// `a:b` and `a :b` are single segments.
pub const SEPARATOR: &str = " : ";

/// Split a query into its segments.
pub fn split_query(query: &str) -> Vec<&str> {
    query.split(SEPARATOR).collect()
}

/// Split a segment on its first whitespace run into the leading token and
/// the rest. Leading whitespace is skipped; a segment without whitespace
/// has an empty rest, an all-whitespace segment an empty token.
pub fn split_first_word(segment: &str) -> (&str, &str) {
    let segment = segment.trim_start();
    match segment.find(char::is_whitespace) {
        Some(end) => (&segment[..end], segment[end..].trim_start()),
        None => (segment, ""),
    }
}
