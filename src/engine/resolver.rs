//! Maps an inbound request path to a canonical type name.

use crate::domain::RouteMapping;
use crate::engine::inflection;

/// Resolves a request path to a type name plus singular/plural flag.
///
/// Only the terminal non-empty path segment matters: `/api/v1/users` and
/// `/users` both resolve to `User` as an array route. The segment is
/// singularized when plural, then normalized to a PascalCase identifier by
/// splitting on hyphen/underscore and lower-to-upper case boundaries
/// ("user-profiles" → "UserProfile", "userProfile" → "UserProfile").
///
/// Empty and root paths resolve to an empty type name, which misses every
/// catalog lookup deterministically; that miss is the serving layer's 404, not
/// an error here.
pub fn resolve(path: &str) -> RouteMapping {
    let segment = path
        .split('?')
        .next()
        .unwrap_or("")
        .split('/')
        .rev()
        .find(|s| !s.is_empty())
        .unwrap_or("");

    if segment.is_empty() {
        return RouteMapping {
            type_name: String::new(),
            is_array: false,
        };
    }

    let is_array = inflection::is_plural(segment);
    let canonical = if is_array {
        inflection::singularize(segment)
    } else {
        segment.to_string()
    };

    RouteMapping {
        type_name: pascal_case(&canonical),
        is_array,
    }
}

/// "user-profile" / "user_profile" / "userProfile" → "UserProfile".
fn pascal_case(word: &str) -> String {
    word.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .flat_map(case_pieces)
        .map(|piece| {
            let mut chars = piece.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Splits at lower-to-upper case boundaries: "userProfile" → ["user", "Profile"].
fn case_pieces(part: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut prev_lower = false;
    for (idx, ch) in part.char_indices() {
        if ch.is_ascii_uppercase() && prev_lower {
            pieces.push(&part[start..idx]);
            start = idx;
        }
        prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
    }
    pieces.push(&part[start..]);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_segment_resolves_to_array_route() {
        let mapping = resolve("/api/v1/users");
        assert_eq!(mapping.type_name, "User");
        assert!(mapping.is_array);
    }

    #[test]
    fn test_singular_segment_resolves_to_single_route() {
        let mapping = resolve("/api/user");
        assert_eq!(mapping.type_name, "User");
        assert!(!mapping.is_array);
    }

    #[test]
    fn test_irregular_plural() {
        let mapping = resolve("/api/people");
        assert_eq!(mapping.type_name, "Person");
        assert!(mapping.is_array);
    }

    #[test]
    fn test_hyphenated_segment() {
        let mapping = resolve("/user-profiles");
        assert_eq!(mapping.type_name, "UserProfile");
        assert!(mapping.is_array);

        let mapping = resolve("/user_profile");
        assert_eq!(mapping.type_name, "UserProfile");
        assert!(!mapping.is_array);
    }

    #[test]
    fn test_camel_case_segment() {
        let mapping = resolve("/api/userProfile");
        assert_eq!(mapping.type_name, "UserProfile");
        assert!(!mapping.is_array);

        let mapping = resolve("/api/userProfiles");
        assert_eq!(mapping.type_name, "UserProfile");
        assert!(mapping.is_array);
    }

    #[test]
    fn test_root_and_empty_paths() {
        for path in ["/", "", "///"] {
            let mapping = resolve(path);
            assert_eq!(mapping.type_name, "");
            assert!(!mapping.is_array);
        }
    }

    #[test]
    fn test_trailing_slash_and_query_ignored() {
        let mapping = resolve("/api/orders/");
        assert_eq!(mapping.type_name, "Order");
        assert!(mapping.is_array);

        let mapping = resolve("/api/orders?page=2");
        assert_eq!(mapping.type_name, "Order");
        assert!(mapping.is_array);
    }
}
