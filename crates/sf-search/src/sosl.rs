//! SOSL expression construction.
//!
//! User input never enters a search expression unescaped: every character
//! with meaning in SOSL term syntax is backslash-escaped first.

/// Maximum number of records a search returns; fixed, no pagination.
pub const SEARCH_LIMIT: usize = 20;

/// Characters reserved in SOSL search terms.
const RESERVED: &[char] = &[
    '?', '&', '|', '!', '{', '}', '[', ']', '(', ')', '^', '~', '*', ':', '\\', '"', '\'', '+',
    '-',
];

/// Backslash-escape every SOSL reserved character in a search term.
///
/// Applied exactly once, on raw user input; escaping already-escaped input
/// would double the backslashes.
pub fn sanitize(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 8);
    for ch in term.chars() {
        if RESERVED.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Build the full-text search expression for a raw user query over the given
/// object API names.
///
/// Shape: `FIND {<sanitized>} IN ALL FIELDS RETURNING Obj1(id, name),
/// Obj2(id, name) LIMIT 20`. Field projection is fixed to `id, name`.
pub fn find_expression<S: AsRef<str>>(term: &str, objects: &[S]) -> String {
    let returning = objects
        .iter()
        .map(|obj| format!("{}(id, name)", obj.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "FIND {{{}}} IN ALL FIELDS RETURNING {} LIMIT {}",
        sanitize(term),
        returning,
        SEARCH_LIMIT
    )
}
