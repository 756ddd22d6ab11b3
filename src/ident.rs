//! Identifier sanitization
//!
//! Turns asset path segments and names into strings usable as C# identifiers.

/// Characters replaced with a single underscore by [`sanitize_identifier`]
pub const REPLACED_CHARS: [char; 7] = [' ', '-', '.', '/', '\\', '[', ']'];

/// Replacement for `&`
pub const AMPERSAND_REPLACEMENT: &str = "_And_";

/// Sanitize a path segment into an identifier.
///
/// Each of space, `-`, `.`, `/`, `\`, `[`, `]` becomes `_`, `&` becomes
/// `_And_`, and a leading digit gets an `_` prefix. Nothing else is checked:
/// reserved words and sibling collisions pass through, and an empty input
/// stays empty.
pub fn sanitize_identifier(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 1);
    for c in segment.chars() {
        if c == '&' {
            out.push_str(AMPERSAND_REPLACEMENT);
        } else if REPLACED_CHARS.contains(&c) {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    prefix_leading_digit(out)
}

/// Escape an arbitrary name into an identifier.
///
/// Stricter than [`sanitize_identifier`]: anything that is not a letter, an
/// ASCII digit or `_` becomes `_`. Other numeric characters such as `½`, `²`
/// or `٣` are replaced too.
pub fn escape_identifier(name: &str) -> String {
    let out: String = name
        .chars()
        .map(|c| if is_identifier_char(c) { c } else { '_' })
        .collect();
    prefix_leading_digit(out)
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphabetic() || c.is_ascii_digit() || c == '_'
}

/// Escape a value for use inside a C# regular string literal
pub fn escape_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

fn prefix_leading_digit(mut ident: String) -> String {
    if ident.starts_with(char::is_numeric) {
        ident.insert(0, '_');
    }
    ident
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_replaced_chars() {
        assert_eq!(sanitize_identifier("Big Rock-01.v2"), "Big_Rock_01_v2");
        assert_eq!(sanitize_identifier("Icons[hd]"), "Icons_hd_");
        assert_eq!(sanitize_identifier("a/b\\c"), "a_b_c");
    }

    #[test]
    fn test_sanitize_ampersand() {
        assert_eq!(sanitize_identifier("Salt&Pepper"), "Salt_And_Pepper");
    }

    #[test]
    fn test_sanitize_leading_digit() {
        assert_eq!(sanitize_identifier("2DSprites"), "_2DSprites");
        assert_eq!(sanitize_identifier("-1"), "_1");
        assert_eq!(sanitize_identifier("1-Intro"), "_1_Intro");
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize_identifier(""), "");
    }

    #[test]
    fn test_sanitize_keeps_other_chars() {
        // only the fixed set is rewritten
        assert_eq!(sanitize_identifier("Boss(Final)"), "Boss(Final)");
    }

    #[test]
    fn test_escape_identifier() {
        assert_eq!(escape_identifier("1Intro"), "_1Intro");
        assert_eq!(escape_identifier("Main Menu (old)"), "Main_Menu__old_");
        assert_eq!(escape_identifier("Level_03"), "Level_03");
    }

    #[test]
    fn test_escape_identifier_non_ascii_numerics() {
        assert_eq!(escape_identifier("½Boss"), "_Boss");
        assert_eq!(escape_identifier("Level²"), "Level_");
        // letters outside ASCII are kept
        assert_eq!(escape_identifier("Städte"), "Städte");
    }

    #[test]
    fn test_non_ascii_leading_digit() {
        assert_eq!(escape_identifier("٣Intro"), "_Intro");
        assert_eq!(sanitize_identifier("٣Intro"), "_٣Intro");
    }

    #[test]
    fn test_escape_string_literal() {
        assert_eq!(escape_string_literal(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_string_literal(r"a\b"), r"a\\b");
        assert_eq!(escape_string_literal("Props/Crate"), "Props/Crate");
    }

    proptest! {
        #[test]
        fn prop_sanitize_idempotent(s in "[ \\-./\\\\\\[\\]A-Za-z0-9_]{0,24}") {
            let once = sanitize_identifier(&s);
            prop_assert_eq!(sanitize_identifier(&once), once);
        }

        #[test]
        fn prop_digit_first_gets_underscore(d in 0u8..10, rest in "[A-Za-z0-9 .\\-]{0,16}") {
            let input = format!("{}{}", d, rest);
            prop_assert!(sanitize_identifier(&input).starts_with('_'));
            prop_assert!(escape_identifier(&input).starts_with('_'));
        }

        #[test]
        fn prop_escape_output_is_identifier(s in "\\PC{1,24}") {
            let ident = escape_identifier(&s);
            prop_assert!(ident.starts_with(|c: char| c.is_alphabetic() || c == '_'));
            prop_assert!(ident.chars().all(|c| c.is_alphabetic() || c.is_ascii_digit() || c == '_'));
        }
    }
}
