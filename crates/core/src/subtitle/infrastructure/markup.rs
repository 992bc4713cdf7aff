/// Remove `<...>` formatting tags and `{...}` override blocks, then collapse
/// whitespace.
///
/// An opener without a matching closer is literal text and is kept as is.
pub fn strip_markup(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut pending = String::new();
    let mut closing: Option<char> = None;

    for c in text.chars() {
        match (closing, c) {
            (Some(end), _) if c == end => {
                pending.clear();
                closing = None;
            }
            (_, '<' | '{') => {
                plain.push_str(&pending);
                pending.clear();
                pending.push(c);
                closing = Some(if c == '<' { '>' } else { '}' });
            }
            (None, _) => plain.push(c),
            (Some(_), _) => pending.push(c),
        }
    }
    plain.push_str(&pending);

    plain.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join dialogue lines of one cue into a single line of plain text.
pub fn join_dialogue<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let joined: Vec<String> = lines
        .into_iter()
        .map(strip_markup)
        .filter(|l| !l.is_empty())
        .collect();
    joined.join(" ")
}
