//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use tower_sessions::Session;
use tracing::instrument;

use loja_core::ProductId;

use crate::{
    db::{ProductRepository, RepositoryError},
    error::AppError,
    filters,
    forms::{FieldErrors, ImageUpload, ProductForm},
    middleware::{Flash, FlashLevel},
    models::Product,
    state::AppState,
    uploads,
};

const LIST_PATH: &str = "/produtos";
const IMAGE_FIELD: &str = "imagem";

/// Products list page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub current_path: &'static str,
    pub flashes: Vec<Flash>,
    pub products: Vec<Product>,
}

/// Product create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub current_path: &'static str,
    pub flashes: Vec<Flash>,
    pub title: &'static str,
    pub action: String,
    pub form: ProductForm,
    pub errors: FieldErrors,
    /// Stored image of the product being edited.
    pub current_image: Option<String>,
    pub image_required: bool,
}

impl ProductFormTemplate {
    fn new_product(form: ProductForm, errors: FieldErrors) -> Self {
        Self {
            current_path: LIST_PATH,
            flashes: Vec::new(),
            title: "Novo Produto",
            action: "/produto/novo".to_string(),
            form,
            errors,
            current_image: None,
            image_required: true,
        }
    }

    fn edit_product(product: &Product, form: ProductForm, errors: FieldErrors) -> Self {
        Self {
            current_path: LIST_PATH,
            flashes: Vec::new(),
            title: "Editar Produto",
            action: format!("/produto/editar/{}", product.id),
            form,
            errors,
            current_image: Some(product.image.clone()),
            image_required: false,
        }
    }

    fn invalid(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, self).into_response()
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_PATH, get(index))
        .route("/produto/novo", get(new_form).post(create))
        .route("/produto/editar/{id}", get(edit_form).post(update))
        .route("/produto/deletar/{id}", get(delete))
}

/// Collect the multipart parts into a form. An empty file input counts as
/// no upload.
async fn read_form(mut multipart: Multipart) -> Result<ProductForm, AppError> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        if name == IMAGE_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            if !file_name.is_empty() && !bytes.is_empty() {
                form.image = Some(ImageUpload { file_name, bytes });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            form.set_field(&name, value);
        }
    }

    Ok(form)
}

async fn find_product(state: &AppState, id: ProductId) -> Result<Product, AppError> {
    ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Produto {id}")))
}

/// Products list page handler.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<ProductsIndexTemplate, AppError> {
    let products = ProductRepository::new(state.pool()).list_all().await?;

    Ok(ProductsIndexTemplate {
        current_path: LIST_PATH,
        flashes: Flash::take_all(&session).await?,
        products,
    })
}

/// Empty new-product form.
pub async fn new_form() -> ProductFormTemplate {
    ProductFormTemplate::new_product(ProductForm::default(), FieldErrors::new())
}

/// Create a product and store its image.
#[instrument(skip(state, session, multipart))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_form(multipart).await?;
    let product = match form.validate(true) {
        Ok(product) => product,
        Err(errors) => return Ok(ProductFormTemplate::new_product(form, errors).invalid()),
    };
    let Some(image) = &product.image else {
        return Err(AppError::Internal("validated product without image".to_string()));
    };

    let upload_dir = &state.config().upload_dir;
    let stored = uploads::save_image(upload_dir, image).await?;
    if let Err(e) = ProductRepository::new(state.pool())
        .create(&product.fields, &stored)
        .await
    {
        uploads::remove_image(upload_dir, &stored).await;
        return Err(e.into());
    }

    Flash::success(&session, "Produto cadastrado com sucesso!").await?;
    Ok(Redirect::to(LIST_PATH).into_response())
}

/// Edit form pre-filled with the stored product.
#[instrument(skip(state))]
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<ProductFormTemplate, AppError> {
    let product = find_product(&state, id).await?;
    Ok(ProductFormTemplate::edit_product(
        &product,
        ProductForm::from(&product),
        FieldErrors::new(),
    ))
}

/// Update a product; a new image replaces the current one only when uploaded.
#[instrument(skip(state, session, multipart))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let existing = find_product(&state, id).await?;
    let form = read_form(multipart).await?;
    let product = match form.validate(false) {
        Ok(product) => product,
        Err(errors) => {
            return Ok(ProductFormTemplate::edit_product(&existing, form, errors).invalid());
        }
    };

    let upload_dir = &state.config().upload_dir;
    let stored = match &product.image {
        Some(image) => Some(uploads::save_image(upload_dir, image).await?),
        None => None,
    };

    let result = ProductRepository::new(state.pool())
        .update(id, &product.fields, stored.as_deref())
        .await;
    match (result, stored) {
        (Ok(_), Some(_)) => uploads::remove_image(upload_dir, &existing.image).await,
        (Ok(_), None) => {}
        (Err(e), stored) => {
            if let Some(stored) = stored {
                uploads::remove_image(upload_dir, &stored).await;
            }
            return Err(match e {
                RepositoryError::NotFound(_) => AppError::NotFound(format!("Produto {id}")),
                e => e.into(),
            });
        }
    }

    Flash::success(&session, "Produto atualizado com sucesso!").await?;
    Ok(Redirect::to(LIST_PATH).into_response())
}

/// Delete a product, refusing when sales reference it.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<Redirect, AppError> {
    let product = find_product(&state, id).await?;
    match ProductRepository::new(state.pool()).delete(id).await {
        Ok(()) => {
            uploads::remove_image(&state.config().upload_dir, &product.image).await;
            Flash::success(&session, "Produto deletado com sucesso!").await?;
        }
        Err(RepositoryError::Conflict(_)) => {
            Flash::push(
                &session,
                FlashLevel::Error,
                "Não é possível deletar um produto com vendas registradas.",
            )
            .await?;
        }
        Err(RepositoryError::NotFound(_)) => {
            return Err(AppError::NotFound(format!("Produto {id}")));
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to(LIST_PATH))
}
