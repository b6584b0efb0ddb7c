//! Identifier to command-name conversion.

use convert_case::{Boundary, Case, Casing};

/// Converts a type or operation identifier into a subcommand name.
///
/// Accepts both `CamelCase` type names and `snake_case` function names.
/// Digits stay attached to the word before them; only a capital letter
/// after a digit starts a new word.
///
/// # Examples
///
/// ```
/// use type2cli_core::to_kebab_case;
///
/// assert_eq!(to_kebab_case("RaiseBy"), "raise-by");
/// assert_eq!(to_kebab_case("raise_by"), "raise-by");
/// assert_eq!(to_kebab_case("Bar"), "bar");
/// ```
pub fn to_kebab_case(identifier: &str) -> String {
    identifier
        .trim_start_matches("r#")
        .trim_matches('_')
        .remove_boundaries(&[
            Boundary::LowerDigit,
            Boundary::UpperDigit,
            Boundary::DigitLower,
        ])
        .to_case(Case::Kebab)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case_type_names() {
        assert_eq!(to_kebab_case("NewWithHeight"), "new-with-height");
        assert_eq!(to_kebab_case("HTTPServer"), "http-server");
    }

    #[test]
    fn test_kebab_case_function_names() {
        assert_eq!(to_kebab_case("new_with_height"), "new-with-height");
        assert_eq!(to_kebab_case("raise"), "raise");
    }

    #[test]
    fn test_kebab_case_keeps_digits_in_words() {
        assert_eq!(to_kebab_case("raise_by2"), "raise-by2");
        assert_eq!(to_kebab_case("sha256"), "sha256");
        assert_eq!(to_kebab_case("RaiseBy2"), "raise-by2");
        assert_eq!(to_kebab_case("Sha256Sum"), "sha256-sum");
        assert_eq!(to_kebab_case("v2_api"), "v2-api");
    }

    #[test]
    fn test_kebab_case_raw_identifier() {
        assert_eq!(to_kebab_case("r#type"), "type");
    }
}
