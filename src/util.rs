//! Identifier case conversion
//!
//! Every output path and package name is derived from Go identifiers through
//! these two functions, so their segmentation must stay bit-for-bit stable.

/// Convert PascalCase or camelCase to snake_case
///
/// A separator goes before an ASCII uppercase letter (never at position 0)
/// when the previous character is lowercase or the next one is, which keeps
/// acronym runs such as `P2P` or `HTTP` together.
///
/// # Examples
/// ```
/// use implgen::util::to_snake_case;
/// assert_eq!(to_snake_case("HelloWorld"), "hello_world");
/// assert_eq!(to_snake_case("InvoiceP2P"), "invoice_p2p");
/// assert_eq!(to_snake_case("HTTPServer"), "http_server");
/// ```
pub fn to_snake_case(s: &str) -> String {
    segment(s, '_')
}

/// Convert PascalCase or camelCase to kebab-case
///
/// # Examples
/// ```
/// use implgen::util::to_kebab_case;
/// assert_eq!(to_kebab_case("OrderRepo"), "order-repo");
/// assert_eq!(to_kebab_case("getHTTPResponse"), "get-http-response");
/// ```
pub fn to_kebab_case(s: &str) -> String {
    segment(s, '-')
}

fn segment(s: &str, separator: char) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev_lower || next_lower {
                result.push(separator);
            }
        }
        result.extend(c.to_lowercase());
        prev_lower = c.is_ascii_lowercase();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case("Get", "get")]
    #[case("HelloWorld", "hello_world")]
    #[case("fooBar", "foo_bar")]
    #[case("InvoiceP2P", "invoice_p2p")]
    #[case("HTTPServer", "http_server")]
    #[case("GetByID", "get_by_id")]
    #[case("already_snake", "already_snake")]
    #[case("V2Client", "v2_client")]
    fn test_to_snake_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_snake_case(input), expected);
    }

    #[test]
    fn test_to_kebab_case() {
        assert_eq!(to_kebab_case("OrderRepo"), "order-repo");
        assert_eq!(to_kebab_case("AbobaRepository"), "aboba-repository");
        assert_eq!(to_kebab_case("Implementation"), "implementation");
        assert_eq!(to_kebab_case(""), "");
    }

    #[test]
    fn test_no_leading_separator() {
        assert_eq!(to_snake_case("A"), "a");
        assert_eq!(to_snake_case("Ab"), "ab");
        assert_eq!(to_kebab_case("ABc"), "a-bc");
    }

    #[test]
    fn test_digits_and_underscores_pass_through() {
        assert_eq!(to_snake_case("Sha256Sum"), "sha256_sum");
        assert_eq!(to_snake_case("x_1"), "x_1");
        // digit before an uppercase letter does not count as lowercase
        assert_eq!(to_snake_case("a1B"), "a1b");
    }
}
