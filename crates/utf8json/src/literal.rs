use crate::view::ByteView;

const TRUE_WORD: u32 = u32::from_le_bytes(*b"true");
const NULL_WORD: u32 = u32::from_le_bytes(*b"null");
const FALS_WORD: u32 = u32::from_le_bytes(*b"fals");

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// One of the three JSON keyword literals.
pub enum Literal {
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
}

impl Literal {
    /// Recognizes a view holding exactly one keyword.
    #[must_use]
    pub fn match_bytes(view: ByteView<'_>) -> Option<Self> {
        match view.get(0)? {
            b't' if equals_true(view) => Some(Self::True),
            b'f' if equals_false(view) => Some(Self::False),
            b'n' if equals_null(view) => Some(Self::Null),
            _ => None,
        }
    }

    /// The keyword text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
        }
    }
}

fn first_word(bytes: &[u8]) -> Option<u32> {
    let word: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
    Some(u32::from_le_bytes(word))
}

/// `true` when the view is exactly `true`.
#[must_use]
pub fn equals_true(view: ByteView<'_>) -> bool {
    view.len() == 4 && first_word(view.as_bytes()) == Some(TRUE_WORD)
}

/// `true` when the view is exactly `false`.
#[must_use]
pub fn equals_false(view: ByteView<'_>) -> bool {
    view.len() == 5 && first_word(view.as_bytes()) == Some(FALS_WORD) && view.byte_at(4) == b'e'
}

/// `true` when the view is exactly `null`.
#[must_use]
pub fn equals_null(view: ByteView<'_>) -> bool {
    view.len() == 4 && first_word(view.as_bytes()) == Some(NULL_WORD)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("true", Some(Literal::True))]
    #[case("false", Some(Literal::False))]
    #[case("null", Some(Literal::Null))]
    #[case("tru", None)]
    #[case("truex", None)]
    #[case("falsy", None)]
    #[case("fals", None)]
    #[case("nul", None)]
    #[case("Null", None)]
    #[case("", None)]
    fn matches_keywords(#[case] text: &str, #[case] expected: Option<Literal>) {
        assert_eq!(Literal::match_bytes(ByteView::from(text)), expected);
    }

    #[test]
    fn text_round_trips() {
        for literal in [Literal::True, Literal::False, Literal::Null] {
            assert_eq!(Literal::match_bytes(literal.as_str().into()), Some(literal));
        }
    }
}
