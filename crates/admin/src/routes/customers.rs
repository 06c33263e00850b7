//! Customer route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use tower_sessions::Session;
use tracing::instrument;

use loja_core::CustomerId;

use crate::{
    db::{CustomerRepository, RepositoryError},
    error::AppError,
    filters,
    forms::{CustomerForm, FieldErrors},
    middleware::{Flash, FlashLevel},
    models::Customer,
    state::AppState,
};

const LIST_PATH: &str = "/clientes";

/// Customers list page template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/index.html")]
pub struct CustomersIndexTemplate {
    pub current_path: &'static str,
    pub flashes: Vec<Flash>,
    pub customers: Vec<Customer>,
}

/// Customer create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "customers/form.html")]
pub struct CustomerFormTemplate {
    pub current_path: &'static str,
    pub flashes: Vec<Flash>,
    pub title: &'static str,
    pub action: String,
    pub form: CustomerForm,
    pub errors: FieldErrors,
}

impl CustomerFormTemplate {
    fn new_customer(form: CustomerForm, errors: FieldErrors) -> Self {
        Self {
            current_path: LIST_PATH,
            flashes: Vec::new(),
            title: "Novo Cliente",
            action: "/cliente/novo".to_string(),
            form,
            errors,
        }
    }

    fn edit_customer(id: CustomerId, form: CustomerForm, errors: FieldErrors) -> Self {
        Self {
            current_path: LIST_PATH,
            flashes: Vec::new(),
            title: "Editar Cliente",
            action: format!("/cliente/editar/{id}"),
            form,
            errors,
        }
    }

    fn invalid(self) -> Response {
        (StatusCode::UNPROCESSABLE_ENTITY, self).into_response()
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_PATH, get(index))
        .route("/cliente/novo", get(new_form).post(create))
        .route("/cliente/editar/{id}", get(edit_form).post(update))
        .route("/cliente/deletar/{id}", get(delete))
}

/// Customers list page handler.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<CustomersIndexTemplate, AppError> {
    let customers = CustomerRepository::new(state.pool()).list_all().await?;

    Ok(CustomersIndexTemplate {
        current_path: LIST_PATH,
        flashes: Flash::take_all(&session).await?,
        customers,
    })
}

/// Empty new-customer form.
pub async fn new_form() -> CustomerFormTemplate {
    CustomerFormTemplate::new_customer(CustomerForm::default(), FieldErrors::new())
}

/// Create a customer from the submitted form.
#[instrument(skip(state, session, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CustomerForm>,
) -> Result<Response, AppError> {
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return Ok(CustomerFormTemplate::new_customer(form, errors).invalid()),
    };

    match CustomerRepository::new(state.pool()).create(&input).await {
        Ok(_) => {}
        Err(RepositoryError::Conflict(_)) => {
            return Ok(CustomerFormTemplate::new_customer(form, duplicate_national_id()).invalid());
        }
        Err(e) => return Err(e.into()),
    }

    Flash::success(&session, "Cliente cadastrado com sucesso!").await?;
    Ok(Redirect::to(LIST_PATH).into_response())
}

/// Edit form pre-filled with the stored customer.
#[instrument(skip(state))]
pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<CustomerFormTemplate, AppError> {
    let customer = CustomerRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Cliente {id}")))?;

    Ok(CustomerFormTemplate::edit_customer(
        id,
        CustomerForm::from(&customer),
        FieldErrors::new(),
    ))
}

/// Replace a customer's fields from the submitted form.
#[instrument(skip(state, session, form))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<CustomerId>,
    Form(form): Form<CustomerForm>,
) -> Result<Response, AppError> {
    let repo = CustomerRepository::new(state.pool());
    if repo.get_by_id(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Cliente {id}")));
    }

    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => return Ok(CustomerFormTemplate::edit_customer(id, form, errors).invalid()),
    };

    match repo.update(id, &input).await {
        Ok(_) => {}
        Err(RepositoryError::Conflict(_)) => {
            return Ok(
                CustomerFormTemplate::edit_customer(id, form, duplicate_national_id()).invalid(),
            );
        }
        Err(RepositoryError::NotFound(_)) => {
            return Err(AppError::NotFound(format!("Cliente {id}")));
        }
        Err(e) => return Err(e.into()),
    }

    Flash::success(&session, "Cliente atualizado com sucesso!").await?;
    Ok(Redirect::to(LIST_PATH).into_response())
}

/// Delete a customer, refusing when sales reference it.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<CustomerId>,
) -> Result<Redirect, AppError> {
    match CustomerRepository::new(state.pool()).delete(id).await {
        Ok(()) => Flash::success(&session, "Cliente deletado com sucesso!").await?,
        Err(RepositoryError::Conflict(_)) => {
            Flash::push(
                &session,
                FlashLevel::Error,
                "Não é possível deletar um cliente com vendas registradas.",
            )
            .await?;
        }
        Err(RepositoryError::NotFound(_)) => {
            return Err(AppError::NotFound(format!("Cliente {id}")));
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to(LIST_PATH))
}

fn duplicate_national_id() -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert("cpf", "CPF já cadastrado.");
    errors
}
