//! Customer create/edit form.

use serde::Deserialize;

use loja_core::{Email, EmailError, NationalId, NationalIdError};

use super::{FieldErrors, required_integer, required_text};
use crate::models::{Customer, NewCustomer};

const MAX_NAME: usize = 100;
const MAX_ADDRESS: usize = 200;
const MAX_AGE: i64 = 150;

/// Raw customer form submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomerForm {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "idade")]
    pub age: String,
    #[serde(rename = "cpf")]
    pub national_id: String,
    pub email: String,
    #[serde(rename = "endereco")]
    pub address: String,
}

impl CustomerForm {
    /// Validate every field, collecting one message per failing field.
    ///
    /// # Errors
    ///
    /// Returns the field messages if any field is missing or invalid.
    pub fn validate(&self) -> Result<NewCustomer, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required_text(&mut errors, "nome", "Nome", &self.name, MAX_NAME);

        let age = required_integer(&mut errors, "idade", "Idade", &self.age).and_then(|age| {
            if (0..=MAX_AGE).contains(&age) {
                Some(age)
            } else {
                errors.insert("idade", format!("Idade deve estar entre 0 e {MAX_AGE}."));
                None
            }
        });

        let national_id = NationalId::parse(&self.national_id)
            .map_err(|e| errors.insert("cpf", national_id_message(&e)))
            .ok();

        let email = Email::parse(&self.email)
            .map_err(|e| errors.insert("email", email_message(&e)))
            .ok();

        let address = required_text(
            &mut errors,
            "endereco",
            "Endereço",
            &self.address,
            MAX_ADDRESS,
        );

        match (name, age, national_id, email, address) {
            (Some(name), Some(age), Some(national_id), Some(email), Some(address))
                if errors.is_empty() =>
            {
                Ok(NewCustomer {
                    name,
                    age,
                    national_id,
                    email,
                    address,
                })
            }
            _ => Err(errors),
        }
    }
}

impl From<&Customer> for CustomerForm {
    fn from(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            age: customer.age.to_string(),
            national_id: customer.national_id.formatted(),
            email: customer.email.to_string(),
            address: customer.address.clone(),
        }
    }
}

fn national_id_message(err: &NationalIdError) -> String {
    match err {
        NationalIdError::Empty => "CPF é obrigatório.".to_owned(),
        NationalIdError::InvalidCharacter => {
            "CPF deve conter apenas números, pontos e hífen.".to_owned()
        }
        NationalIdError::WrongLength { expected, actual } => {
            format!("CPF deve ter {expected} dígitos (informados: {actual}).")
        }
        NationalIdError::RepeatedDigits => "CPF inválido.".to_owned(),
    }
}

fn email_message(err: &EmailError) -> String {
    match err {
        EmailError::Empty => "E-mail é obrigatório.".to_owned(),
        EmailError::TooLong { max } => format!("E-mail deve ter no máximo {max} caracteres."),
        EmailError::Malformed => "E-mail inválido.".to_owned(),
    }
}
