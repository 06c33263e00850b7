//! Product create/edit form.
//!
//! Products are submitted as `multipart/form-data` because of the image
//! upload; the route collects the parts into a [`ProductForm`].

use axum::body::Bytes;

use loja_core::{Price, PriceError};

use super::{FieldErrors, required_integer, required_text};
use crate::models::{Product, ProductInput};

const MAX_NAME: usize = 100;
const MAX_DESCRIPTION: usize = 1000;
const MAX_FILE_NAME: usize = 120;

/// Image extensions accepted for product uploads.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// An uploaded file as received from the browser.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// File name as sent by the client, or sanitized after validation.
    pub file_name: String,
    pub bytes: Bytes,
}

/// Raw product form submission.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub description: String,
    pub stock_quantity: String,
    pub image: Option<ImageUpload>,
}

/// A validated product with its (sanitized) image, if one was uploaded.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub fields: ProductInput,
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    /// Set a text field by its HTML input name. Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "nome" => self.name = value,
            "preco" => self.price = value,
            "descricao" => self.description = value,
            "quantidade_estoque" => self.stock_quantity = value,
            _ => {}
        }
    }

    /// Validate every field.
    ///
    /// `require_image` is set when creating a product; on edit the image is
    /// optional and the current one is kept when none is uploaded.
    ///
    /// # Errors
    ///
    /// Returns the field messages if any field is missing or invalid.
    pub fn validate(&self, require_image: bool) -> Result<NewProduct, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required_text(&mut errors, "nome", "Nome", &self.name, MAX_NAME);

        let price = Price::parse(&self.price)
            .map_err(|e| errors.insert("preco", price_message(&e)))
            .ok();

        let description = required_text(
            &mut errors,
            "descricao",
            "Descrição",
            &self.description,
            MAX_DESCRIPTION,
        );

        let stock_quantity = required_integer(
            &mut errors,
            "quantidade_estoque",
            "Quantidade em estoque",
            &self.stock_quantity,
        )
        .and_then(|stock| {
            if stock >= 0 {
                Some(stock)
            } else {
                errors.insert(
                    "quantidade_estoque",
                    "Quantidade em estoque não pode ser negativa.",
                );
                None
            }
        });

        let image = match &self.image {
            Some(upload) => match sanitize_file_name(&upload.file_name) {
                Ok(file_name) => Some(ImageUpload {
                    file_name,
                    bytes: upload.bytes.clone(),
                }),
                Err(message) => {
                    errors.insert("imagem", message);
                    None
                }
            },
            None => {
                if require_image {
                    errors.insert("imagem", "Imagem é obrigatória.");
                }
                None
            }
        };

        match (name, price, description, stock_quantity) {
            (Some(name), Some(price), Some(description), Some(stock_quantity))
                if errors.is_empty() =>
            {
                Ok(NewProduct {
                    fields: ProductInput {
                        name,
                        price,
                        description,
                        stock_quantity,
                    },
                    image,
                })
            }
            _ => Err(errors),
        }
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            stock_quantity: product.stock_quantity.to_string(),
            image: None,
        }
    }
}

/// Reduce a client-supplied file name to a safe name inside the upload dir.
///
/// Keeps the last path component, replaces anything outside
/// `[A-Za-z0-9._-]` with `_`, and requires an image extension.
fn sanitize_file_name(raw: &str) -> Result<String, &'static str> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let sanitized = sanitized.trim_start_matches('.');

    let Some((stem, extension)) = sanitized.rsplit_once('.') else {
        return Err("Imagem deve ser PNG, JPG, GIF ou WEBP.");
    };
    if stem.is_empty() {
        return Err("Nome de arquivo inválido.");
    }
    if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str()) {
        return Err("Imagem deve ser PNG, JPG, GIF ou WEBP.");
    }
    if sanitized.len() > MAX_FILE_NAME {
        return Err("Nome de arquivo muito longo.");
    }

    Ok(sanitized.to_owned())
}

fn price_message(err: &PriceError) -> String {
    match err {
        PriceError::Empty => "Preço é obrigatório.".to_owned(),
        PriceError::NotANumber => "Preço deve ser um número.".to_owned(),
        PriceError::Negative => "Preço não pode ser negativo.".to_owned(),
        PriceError::TooPrecise { max } => {
            format!("Preço pode ter no máximo {max} casas decimais.")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn upload(name: &str) -> Option<ImageUpload> {
        Some(ImageUpload {
            file_name: name.to_owned(),
            bytes: Bytes::from_static(b"\x89PNG"),
        })
    }

    fn valid() -> ProductForm {
        ProductForm {
            name: "Camiseta".to_owned(),
            price: "49,90".to_owned(),
            description: "Camiseta de algodão".to_owned(),
            stock_quantity: "10".to_owned(),
            image: upload("camiseta.png"),
        }
    }

    #[test]
    fn test_valid_form() {
        let product = valid().validate(true).unwrap();
        assert_eq!(product.fields.price.to_string(), "49.90");
        assert_eq!(product.fields.stock_quantity, 10);
        assert_eq!(product.image.unwrap().file_name, "camiseta.png");
    }

    #[test]
    fn test_set_field_by_input_name() {
        let mut form = ProductForm::default();
        form.set_field("nome", "Boné".to_owned());
        form.set_field("preco", "25".to_owned());
        form.set_field("descricao", "Boné aba reta".to_owned());
        form.set_field("quantidade_estoque", "4".to_owned());
        form.set_field("desconhecido", "x".to_owned());
        assert!(form.validate(false).is_ok());
    }

    #[test]
    fn test_image_required_on_create_only() {
        let mut form = valid();
        form.image = None;
        assert_eq!(
            form.validate(true)
                .unwrap_err()
                .get("imagem")
                .map(String::as_str),
            Some("Imagem é obrigatória.")
        );
        assert!(form.validate(false).unwrap().image.is_none());
    }

    #[test]
    fn test_negative_stock_and_bad_price() {
        let mut form = valid();
        form.stock_quantity = "-2".to_owned();
        form.price = "1,999".to_owned();
        let errors = form.validate(true).unwrap_err();
        assert!(errors.has("quantidade_estoque"));
        assert_eq!(
            errors.get("preco").map(String::as_str),
            Some("Preço pode ter no máximo 2 casas decimais.")
        );
    }

    #[test]
    fn test_sanitize_strips_directories_and_odd_characters() {
        assert_eq!(
            sanitize_file_name("../../etc/foto final.PNG").unwrap(),
            "foto_final.PNG"
        );
        assert_eq!(
            sanitize_file_name("C:\\Users\\ana\\caneca.jpg").unwrap(),
            "caneca.jpg"
        );
        assert_eq!(sanitize_file_name("..hidden.gif").unwrap(), "hidden.gif");
    }

    #[test]
    fn test_sanitize_rejects_non_images() {
        assert!(sanitize_file_name("script.sh").is_err());
        assert!(sanitize_file_name("noextension").is_err());
        assert!(sanitize_file_name(".png").is_err());
        assert!(sanitize_file_name("").is_err());
    }
}
