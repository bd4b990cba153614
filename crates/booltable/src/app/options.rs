//! Parsing free-text option input.

use crate::domain::model::OptionList;

/// Split raw, human-typed text into option names.
///
/// All whitespace is removed (including whitespace inside a name), the remainder is split on
/// commas, and empty tokens are dropped. Duplicates are kept.
pub fn parse(raw: &str) -> OptionList {
    if raw.is_empty() {
        return Vec::new();
    }

    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    compact
        .split(',')
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_options() {
        assert!(parse("").is_empty());
        assert!(parse("   ").is_empty());
        assert!(parse(",,,").is_empty());
    }

    #[test]
    fn splits_on_commas() {
        assert_eq!(parse("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn strips_whitespace_and_empty_tokens() {
        assert_eq!(parse(" a , b ,,c,"), vec!["a", "b", "c"]);
        assert_eq!(parse("is logged in,\tis admin"), vec!["isloggedin", "isadmin"]);
    }

    #[test]
    fn keeps_duplicates_in_order() {
        assert_eq!(parse("b,a,b"), vec!["b", "a", "b"]);
    }
}
