//! Character classes of the message grammar.
//!
//! Each class is a plain predicate so it can be handed to the cursor or to a
//! winnow `take_while`/`one_of` combinator alike.

/// Sigils that open a reserved (unsupported) annotation.
pub const RESERVED_SIGILS: [char; 10] = ['^', '&', '!', '%', '*', '+', '<', '>', '?', '~'];

/// Characters that may open any annotation.
pub fn is_annotation_start(c: char) -> bool {
    c == ':' || RESERVED_SIGILS.contains(&c)
}

pub fn is_name_start(c: char) -> bool {
    matches!(c,
        'a'..='z'
        | 'A'..='Z'
        | '_'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}'
    )
}

pub fn is_name_char(c: char) -> bool {
    is_name_start(c)
        || matches!(c,
            '0'..='9'
            | '-'
            | '.'
            | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}'
        )
}

/// Whitespace, including the ideographic space.
pub fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

/// Any character that carries no structural meaning.
///
/// Excludes NUL, tab, line breaks, space, the ideographic space and
/// `. @ \ { | }`.
pub fn is_content(c: char) -> bool {
    matches!(c,
        '\u{1}'..='\u{8}'
        | '\u{B}'..='\u{C}'
        | '\u{E}'..='\u{1F}'
        | '\u{21}'..='\u{2D}'
        | '\u{2F}'..='\u{3F}'
        | '\u{41}'..='\u{5B}'
        | '\u{5D}'..='\u{7A}'
        | '\u{7E}'..='\u{2FFF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{E000}'..='\u{10FFFF}'
    )
}

/// Characters allowed as the first character of a simple message.
pub fn is_simple_start(c: char) -> bool {
    is_content(c) || is_whitespace(c) || matches!(c, '@' | '|')
}

/// Characters that may appear unescaped in pattern text.
pub fn is_text(c: char) -> bool {
    is_content(c) || is_whitespace(c) || matches!(c, '.' | '@' | '|')
}

/// Characters that may appear unescaped inside `|quoted|` literals.
pub fn is_quoted(c: char) -> bool {
    is_content(c) || is_whitespace(c) || matches!(c, '.' | '@' | '{' | '}')
}

/// Characters that may appear unescaped in a reserved body.
pub fn is_reserved(c: char) -> bool {
    is_content(c) || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_classes() {
        assert!(is_name_start('a'));
        assert!(is_name_start('é'));
        assert!(!is_name_start('1'));
        assert!(!is_name_start('-'));
        assert!(is_name_char('1'));
        assert!(is_name_char('-'));
        assert!(is_name_char('.'));
        assert!(!is_name_char(' '));
        assert!(!is_name_char(':'));
    }

    #[test]
    fn test_structural_characters_are_not_content() {
        for c in ['\0', '\t', '\n', '\r', ' ', '.', '@', '\\', '{', '|', '}', '\u{3000}'] {
            assert!(!is_content(c), "{c:?} should not be content");
        }
        assert!(is_content('a'));
        assert!(is_content('$'));
    }

    #[test]
    fn test_text_and_simple_start() {
        assert!(is_text('.'));
        assert!(!is_simple_start('.'));
        assert!(is_simple_start('|'));
        assert!(!is_text('{'));
        assert!(!is_text('\\'));
        assert!(is_quoted('{'));
        assert!(!is_quoted('|'));
        assert!(!is_reserved(' '));
    }
}
