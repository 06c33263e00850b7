//! HTML form input and validation.
//!
//! Each form struct deserializes the raw submitted strings (so the form can be
//! re-rendered exactly as typed) and exposes `validate()`, which returns either
//! a typed value ready for the repository or the per-field messages.
//!
//! Field keys are the HTML input names (`nome`, `idade`, ...), which keeps
//! template lookups trivial.

pub mod customer;
pub mod product;
pub mod sale;

use std::collections::BTreeMap;

pub use customer::CustomerForm;
pub use product::{ImageUpload, NewProduct, ProductForm};
pub use sale::SaleForm;

/// Validation messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Create an empty set of errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message for a field wins.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&String> {
        self.0.get(field)
    }

    /// Whether `field` has a message.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Trimmed required text of at most `max` characters.
fn required_text(
    errors: &mut FieldErrors,
    field: &'static str,
    label: &str,
    raw: &str,
    max: usize,
) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        errors.insert(field, format!("{label} é obrigatório."));
        return None;
    }
    if value.chars().count() > max {
        errors.insert(
            field,
            format!("{label} deve ter no máximo {max} caracteres."),
        );
        return None;
    }
    Some(value.to_owned())
}

/// Required integer.
fn required_integer(
    errors: &mut FieldErrors,
    field: &'static str,
    label: &str,
    raw: &str,
) -> Option<i64> {
    let value = raw.trim();
    if value.is_empty() {
        errors.insert(field, format!("{label} é obrigatório."));
        return None;
    }
    if let Ok(n) = value.parse::<i64>() {
        Some(n)
    } else {
        errors.insert(field, format!("{label} deve ser um número inteiro."));
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("nome", "primeiro");
        errors.insert("nome", "segundo");
        assert_eq!(errors.get("nome").map(String::as_str), Some("primeiro"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_required_text_trims_and_limits() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            required_text(&mut errors, "nome", "Nome", "  Ana  ", 10),
            Some("Ana".to_owned())
        );
        assert!(errors.is_empty());

        assert_eq!(required_text(&mut errors, "nome", "Nome", "   ", 10), None);
        assert_eq!(
            errors.get("nome").map(String::as_str),
            Some("Nome é obrigatório.")
        );
    }

    #[test]
    fn test_required_text_counts_characters_not_bytes() {
        let mut errors = FieldErrors::new();
        // 4 characters, 8 bytes
        assert!(required_text(&mut errors, "nome", "Nome", "ãõéç", 4).is_some());
        assert!(required_text(&mut errors, "endereco", "Endereço", "ãõéçá", 4).is_none());
        assert!(errors.has("endereco"));
    }

    #[test]
    fn test_required_integer() {
        let mut errors = FieldErrors::new();
        assert_eq!(required_integer(&mut errors, "idade", "Idade", " 42 "), Some(42));
        assert_eq!(required_integer(&mut errors, "idade", "Idade", "4.5"), None);
        assert_eq!(
            errors.get("idade").map(String::as_str),
            Some("Idade deve ser um número inteiro.")
        );
    }
}
