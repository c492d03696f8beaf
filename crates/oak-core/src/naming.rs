use std::collections::HashSet;

use heck::{ToLowerCamelCase, ToPascalCase};
use serde::Serialize;

/// The two identifier forms derived from an `operationId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationName {
    pub original: String,
    /// Capitalized form, used for types and namespaces (`ListPets`).
    pub type_name: String,
    /// Lowercase-leading form, used for functions and values (`listPets`).
    pub value_name: String,
}

impl OperationName {
    pub fn from_operation_id(operation_id: &str) -> Self {
        Self {
            original: operation_id.to_string(),
            type_name: type_identifier(operation_id),
            value_name: value_identifier(operation_id),
        }
    }
}

/// Capitalized, identifier-safe form of an arbitrary name.
pub fn type_identifier(name: &str) -> String {
    guard_leading_digit(sanitize_identifier(name).to_pascal_case())
}

/// Lowercase-leading, identifier-safe form of an arbitrary name.
pub fn value_identifier(name: &str) -> String {
    guard_leading_digit(sanitize_identifier(name).to_lower_camel_case())
}

/// Suffix used in mock binding names: `200` → `200`, `default` → `Default`.
pub fn status_suffix(status: &str) -> String {
    if status.chars().all(|c| c.is_ascii_alphanumeric()) && !status.is_empty() {
        status.to_pascal_case()
    } else {
        type_identifier(status)
    }
}

/// Member name inside a `Responses` namespace: `200` → `$200`, `default` → `Default`.
pub fn status_type_name(status: &str) -> String {
    let suffix = status_suffix(status);
    if suffix.starts_with(|c: char| c.is_ascii_digit()) {
        format!("${suffix}")
    } else {
        suffix
    }
}

/// Claim `base` in `taken`, or the first free `base_2`, `base_3`, ... when it is already used.
pub fn unique_identifier(base: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.clone()) {
        return base;
    }
    (2..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| taken.insert(candidate.clone()))
        .unwrap_or(base)
}

/// Render an object key for TypeScript, quoting it when it is not a bare identifier.
pub fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        serde_json::to_string(name).unwrap_or_else(|_| format!("\"{name}\""))
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn guard_leading_digit(name: String) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name
    }
}

/// Replace runs of non-alphanumeric characters with a single word separator.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        let n = OperationName::from_operation_id("listPets");
        assert_eq!(n.type_name, "ListPets");
        assert_eq!(n.value_name, "listPets");
        assert_eq!(n.original, "listPets");
    }

    #[test]
    fn test_kebab_and_snake_case() {
        assert_eq!(type_identifier("pet-store"), "PetStore");
        assert_eq!(value_identifier("get_pet_by_id"), "getPetById");
    }

    #[test]
    fn test_special_chars() {
        assert_eq!(type_identifier("pets.list"), "PetsList");
        assert_eq!(value_identifier("GET /pets"), "getPets");
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(type_identifier("3dModel"), "_3dModel");
        assert_eq!(value_identifier("3dModel"), "_3dModel");
    }

    #[test]
    fn test_unique_identifier() {
        let mut taken = HashSet::new();
        assert_eq!(unique_identifier("Pet".to_string(), &mut taken), "Pet");
        assert_eq!(unique_identifier("Pet".to_string(), &mut taken), "Pet_2");
        assert_eq!(unique_identifier("Pet".to_string(), &mut taken), "Pet_3");
        assert_eq!(unique_identifier("Tag".to_string(), &mut taken), "Tag");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(type_identifier("--"), "Unnamed");
        assert_eq!(value_identifier(""), "unnamed");
    }

    #[test]
    fn test_status_names() {
        assert_eq!(status_suffix("200"), "200");
        assert_eq!(status_suffix("default"), "Default");
        assert_eq!(status_type_name("200"), "$200");
        assert_eq!(status_type_name("default"), "Default");
    }

    #[test]
    fn test_property_key() {
        assert_eq!(property_key("petId"), "petId");
        assert_eq!(property_key("x-request-id"), "\"x-request-id\"");
        assert_eq!(property_key("1st"), "\"1st\"");
    }
}
