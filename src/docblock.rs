//! Docblock type annotation parsing.
//!
//! The Local Type Scanner honours explicit `@var` overrides and `@param`
//! declarations over anything it can infer. This module extracts those
//! tags from raw comment text and normalises the type strings they carry:
//! union/intersection splitting, nullable expansion, and `Type[]`
//! element-type extraction.

/// Scalar / built-in type names that can never be a classlike.
pub(crate) const SCALAR_TYPES: &[&str] = &[
    "int", "integer", "float", "double", "string", "bool", "boolean", "void", "never", "null",
    "false", "true", "array", "callable", "iterable", "resource", "mixed", "object",
];

/// Check whether a type name is a built-in scalar (i.e. can never be a
/// classlike and must not go through FQCN resolution).
pub(crate) fn is_scalar(type_name: &str) -> bool {
    let base = type_name.strip_suffix("[]").unwrap_or(type_name);
    let lower = base.to_ascii_lowercase();
    SCALAR_TYPES.contains(&lower.as_str())
}

/// Check whether a type name is one of the late-binding keywords that
/// resolve through the keyword passes instead of the Name Resolver.
pub(crate) fn is_keyword(type_name: &str) -> bool {
    let base = type_name.strip_suffix("[]").unwrap_or(type_name);
    matches!(base, "self" | "static" | "parent" | "$this")
}

/// Split off the first type token from `s`, respecting `<…>` nesting.
///
/// Returns `(type_token, remainder)` where `type_token` is the full type
/// (e.g. `Collection<int, User>`) and `remainder` is whatever follows.
pub(crate) fn split_type_token(s: &str) -> (&str, &str) {
    let mut angle_depth = 0i32;
    for (i, c) in s.char_indices() {
        match c {
            '<' => angle_depth += 1,
            '>' => {
                angle_depth -= 1;
                if angle_depth == 0 {
                    let end = i + c.len_utf8();
                    return (&s[..end], &s[end..]);
                }
            }
            c if c.is_whitespace() && angle_depth == 0 => {
                return (&s[..i], &s[i..]);
            }
            _ => {}
        }
    }
    (s, "")
}

/// Expand a docblock type string into its member types.
///
/// Union (`A|B`) and intersection (`A&B`) types expand to their member
/// list; a nullable `?T` expands to `[T, null]`. Member order follows the
/// written order. Empty members (sloppy docblocks like `A||B`) are
/// dropped.
pub fn split_type_list(type_str: &str) -> Vec<String> {
    let s = type_str.trim();
    if let Some(inner) = s.strip_prefix('?') {
        let mut types = split_type_list(inner);
        types.push("null".to_string());
        return types;
    }

    let mut types = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '<' | '(' | '{' => depth += 1,
            '>' | ')' | '}' => depth -= 1,
            '|' | '&' if depth == 0 => {
                let part = s[start..i].trim();
                if !part.is_empty() {
                    types.push(part.to_string());
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = s[start..].trim();
    if !last.is_empty() {
        types.push(last.to_string());
    }
    types
}

/// Extract the element type from an array-shaped type string.
///
/// `User[]` → `Some("User")`, `\A\B[]` → `Some("\A\B")`. Returns `None`
/// for anything that is not `Type[]` shaped.
pub fn array_element_type(type_str: &str) -> Option<&str> {
    let base = type_str.strip_suffix("[]")?;
    if base.is_empty() { None } else { Some(base) }
}

/// Extract the type (and optional variable name) from an `@var` tag in
/// `docblock_text`.
///
/// Supports both annotation formats:
///   - `/** @var TheType */`
///   - `/** @var TheType $var */`
pub fn parse_var_tag(docblock_text: &str) -> Option<(String, Option<String>)> {
    let after = tag_payload(docblock_text, "@var")?;
    let (type_token, remainder) = split_type_token(after);
    if type_token.is_empty() {
        return None;
    }

    let var_name = remainder
        .split_whitespace()
        .next()
        .filter(|word| word.starts_with('$'))
        .map(|word| word.to_string());

    Some((type_token.to_string(), var_name))
}

/// Extract the declared type for `param_name` (including `$`) from the
/// `@param` tags in `docblock_text`.
pub fn parse_param_tag(docblock_text: &str, param_name: &str) -> Option<String> {
    let mut rest = docblock_text;
    while let Some(after) = tag_payload(rest, "@param") {
        let (type_token, remainder) = split_type_token(after);
        let named = remainder
            .split_whitespace()
            .next()
            .is_some_and(|word| word == param_name);
        if named && !type_token.is_empty() {
            return Some(type_token.to_string());
        }
        rest = after;
    }
    None
}

/// The text following the first occurrence of `tag` in `text`, trimmed of
/// leading whitespace, or `None` when the tag is absent.
fn tag_payload<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let idx = text.find(tag)?;
    let after = &text[idx + tag.len()..];
    // Guard against matching `@varx` style tags.
    if after.chars().next().is_some_and(|c| !c.is_whitespace()) {
        return None;
    }
    Some(after.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_type_list_handles_unions_and_intersections() {
        assert_eq!(split_type_list("Foo|Bar"), vec!["Foo", "Bar"]);
        assert_eq!(split_type_list("Foo&Stringable"), vec!["Foo", "Stringable"]);
        assert_eq!(split_type_list("Foo"), vec!["Foo"]);
    }

    #[test]
    fn split_type_list_expands_nullable() {
        assert_eq!(split_type_list("?Foo"), vec!["Foo", "null"]);
    }

    #[test]
    fn split_type_list_respects_generic_nesting() {
        assert_eq!(
            split_type_list("array<int|string, User>|null"),
            vec!["array<int|string, User>", "null"]
        );
    }

    #[test]
    fn parse_var_tag_with_and_without_name() {
        assert_eq!(
            parse_var_tag("/** @var Foo $x */"),
            Some(("Foo".to_string(), Some("$x".to_string())))
        );
        assert_eq!(
            parse_var_tag("/** @var Foo[] */"),
            Some(("Foo[]".to_string(), None))
        );
        assert_eq!(parse_var_tag("/** nothing here */"), None);
    }

    #[test]
    fn parse_param_tag_finds_matching_parameter() {
        let text = "/**\n * @param int $a\n * @param Foo|Bar $b desc\n */";
        assert_eq!(parse_param_tag(text, "$b"), Some("Foo|Bar".to_string()));
        assert_eq!(parse_param_tag(text, "$a"), Some("int".to_string()));
        assert_eq!(parse_param_tag(text, "$c"), None);
    }

    #[test]
    fn array_element_type_strips_suffix() {
        assert_eq!(array_element_type("User[]"), Some("User"));
        assert_eq!(array_element_type("string"), None);
        assert_eq!(array_element_type("[]"), None);
    }
}
