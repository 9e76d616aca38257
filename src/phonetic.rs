//! Phonetic encoding of name tokens.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use rphonetic::{DoubleMetaphone, Encoder};

static DOUBLE_METAPHONE: Lazy<DoubleMetaphone> = Lazy::new(DoubleMetaphone::default);

/// Primary double-metaphone code of a single token.
///
/// The encoder works on ASCII only. `Ç` and `Ñ` fold to `S` and `N`; other
/// non-ASCII characters carry no sound and are dropped, so a token in a
/// non-Latin script encodes to an empty code.
pub fn encode_token(token: &str) -> String {
    let token = fold_ascii(token);
    if token.is_empty() {
        return String::new();
    }
    DOUBLE_METAPHONE.encode(&token)
}

fn fold_ascii(token: &str) -> Cow<'_, str> {
    if token.is_ascii() {
        return Cow::Borrowed(token);
    }
    Cow::Owned(
        token
            .chars()
            .filter_map(|c| match c {
                'Ç' | 'ç' => Some('S'),
                'Ñ' | 'ñ' => Some('N'),
                c if c.is_ascii() => Some(c),
                _ => None,
            })
            .collect(),
    )
}

/// Encode every whitespace-separated token of `name` and join the codes
/// with single spaces.
pub fn encode_name(name: &str) -> String {
    name.split_whitespace()
        .map(encode_token)
        .filter(|code| !code.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
