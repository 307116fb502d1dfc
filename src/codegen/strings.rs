//! Identifier and literal helpers for the Crystal target

/// Convert a string to snake_case
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            out.push('_');
            continue;
        }
        if c.is_uppercase() {
            let boundary = match chars.get(i.wrapping_sub(1)) {
                Some(prev) if prev.is_lowercase() || prev.is_ascii_digit() => true,
                // Acronym end: "HTTPStatus" -> "http_status"
                Some(prev) if prev.is_uppercase() => {
                    chars.get(i + 1).is_some_and(|next| next.is_lowercase())
                }
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Convert a string to PascalCase
///
/// Names already in PascalCase/camelCase keep their internal capitalization;
/// separated names ("order_status", "order-status") are title-cased per word.
pub fn to_pascal_case(s: &str) -> String {
    if !s.contains(['_', '-', ' ']) {
        let mut chars = s.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        };
    }

    s.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect()
}

/// Convert a string to CONSTANT_CASE
pub fn to_constant_case(s: &str) -> String {
    to_snake_case(s).to_uppercase()
}

/// Attempt to convert a plural word to its singular form
///
/// Covers common English pluralization plus a short irregular list; words
/// that do not look plural are returned unchanged.
pub fn singularize(word: &str) -> String {
    if word.len() <= 1 {
        return word.to_string();
    }

    let lower = word.to_lowercase();

    let irregular = match lower.as_str() {
        "children" => Some("child"),
        "people" => Some("person"),
        "men" => Some("man"),
        "women" => Some("woman"),
        "feet" => Some("foot"),
        "teeth" => Some("tooth"),
        "geese" => Some("goose"),
        "mice" => Some("mouse"),
        "dice" => Some("die"),
        _ => None,
    };
    if let Some(singular) = irregular {
        return match_casing(word, singular);
    }

    if lower.ends_with("ies") && word.len() > 3 {
        // companies -> company
        return format!("{}y", &word[..word.len() - 3]);
    }

    if lower.ends_with("ves") && word.len() > 3 {
        // knives -> knife
        return format!("{}fe", &word[..word.len() - 3]);
    }

    if lower.ends_with("ses") && word.len() > 3 {
        // classes -> class
        return word[..word.len() - 2].to_string();
    }

    if lower.ends_with("es") && word.len() > 2 {
        // boxes -> box, only for stems that take -es
        let stem = &word[..word.len() - 2];
        let stem_lower = stem.to_lowercase();
        if stem_lower.ends_with(['x', 's', 'z'])
            || stem_lower.ends_with("ch")
            || stem_lower.ends_with("sh")
        {
            return stem.to_string();
        }
    }

    if lower.ends_with('s') {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

fn match_casing(original: &str, word: &str) -> String {
    if original.chars().all(|c| !c.is_lowercase()) {
        return word.to_uppercase();
    }
    if original.chars().next().is_some_and(|c| c.is_uppercase()) {
        let mut chars = word.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        };
    }
    word.to_string()
}

/// Normalize a module name to Crystal module syntax
///
/// Handles nested modules ("shop.db" or "Shop::Db" -> "Shop::Db") and falls
/// back to "Db" for the empty name.
pub fn module_name(name: &str) -> String {
    if name.is_empty() {
        return "Db".to_string();
    }

    let parts: Vec<&str> = if name.contains("::") {
        name.split("::").collect()
    } else if name.contains('.') {
        name.split('.').collect()
    } else {
        vec![name]
    };

    parts
        .into_iter()
        .map(to_pascal_case)
        .collect::<Vec<_>>()
        .join("::")
}

/// Quote a string as a Crystal string literal
///
/// Escapes backslash, quote, control characters, and the `#{` interpolation
/// opener so raw SQL text survives embedding verbatim.
pub fn crystal_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '#' if chars.peek() == Some(&'{') => out.push_str("\\#"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("GetAuthor"), "get_author");
        assert_eq!(to_snake_case("ListAuthorsByName"), "list_authors_by_name");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("HTTPStatus"), "http_status");
        assert_eq!(to_snake_case("id"), "id");
        assert_eq!(to_snake_case(""), "");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("user"), "User");
        assert_eq!(to_pascal_case("order_status"), "OrderStatus");
        assert_eq!(to_pascal_case("order-line-items"), "OrderLineItems");
        assert_eq!(to_pascal_case("GetAuthor"), "GetAuthor");
        assert_eq!(to_pascal_case("getAuthor"), "GetAuthor");
        assert_eq!(to_pascal_case("ORDER_STATUS"), "OrderStatus");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_to_constant_case() {
        assert_eq!(to_constant_case("GetAuthor"), "GET_AUTHOR");
        assert_eq!(to_constant_case("listAuthorsByIds"), "LIST_AUTHORS_BY_IDS");
        assert_eq!(to_constant_case("simple"), "SIMPLE");
    }

    #[test]
    fn test_singularize_regular() {
        assert_eq!(singularize("authors"), "author");
        assert_eq!(singularize("books"), "book");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("knives"), "knife");
        assert_eq!(singularize("classes"), "class");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("staff"), "staff");
    }

    #[test]
    fn test_singularize_irregular() {
        assert_eq!(singularize("people"), "person");
        assert_eq!(singularize("People"), "Person");
        assert_eq!(singularize("CHILDREN"), "CHILD");
    }

    #[test]
    fn test_singularize_short_words() {
        assert_eq!(singularize("s"), "s");
        assert_eq!(singularize(""), "");
    }

    #[test]
    fn test_module_name() {
        assert_eq!(module_name(""), "Db");
        assert_eq!(module_name("db"), "Db");
        assert_eq!(module_name("my_app"), "MyApp");
        assert_eq!(module_name("Shop::Db"), "Shop::Db");
        assert_eq!(module_name("shop.db"), "Shop::Db");
    }

    #[test]
    fn test_crystal_string() {
        assert_eq!(crystal_string("SELECT 1"), "\"SELECT 1\"");
        assert_eq!(
            crystal_string("SELECT 'a\"b'"),
            "\"SELECT 'a\\\"b'\""
        );
        assert_eq!(crystal_string("line1\nline2"), "\"line1\\nline2\"");
        assert_eq!(crystal_string("a\\b"), "\"a\\\\b\"");
        assert_eq!(crystal_string("#{boom}"), "\"\\#{boom}\"");
        assert_eq!(crystal_string("# comment"), "\"# comment\"");
    }
}
