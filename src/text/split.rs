/// One independently animated word of a text line.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TextUnit {
    /// Word text, never empty and never containing a breaking space.
    pub text: String,
    /// Left-to-right position; drives the stagger offset.
    pub index: usize,
}

// Spaces that glue tokens together; `char::is_whitespace` treats them as breaking.
fn is_non_breaking(c: char) -> bool {
    matches!(c, '\u{00A0}' | '\u{2007}' | '\u{202F}')
}

/// Split `text` into words on whitespace runs.
///
/// Empty or whitespace-only input yields no units. Non-breaking spaces stay inside their word.
pub fn split(text: &str) -> Vec<TextUnit> {
    text.split(|c: char| c.is_whitespace() && !is_non_breaking(c))
        .filter(|word| !word.is_empty())
        .enumerate()
        .map(|(index, word)| TextUnit {
            text: word.to_owned(),
            index,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/text/split.rs"]
mod tests;
