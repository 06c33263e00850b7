//! Sale route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    db::{CustomerRepository, ProductRepository, RepositoryError, SaleOutcome, SaleRepository},
    error::AppError,
    filters,
    forms::{FieldErrors, SaleForm},
    middleware::{Flash, FlashLevel},
    models::{Customer, Product, SaleWithNames},
    state::AppState,
};

const LIST_PATH: &str = "/vendas";

/// Sales list page template.
#[derive(Template, WebTemplate)]
#[template(path = "sales/index.html")]
pub struct SalesIndexTemplate {
    pub current_path: &'static str,
    pub flashes: Vec<Flash>,
    pub sales: Vec<SaleWithNames>,
}

/// New sale form template.
#[derive(Template, WebTemplate)]
#[template(path = "sales/form.html")]
pub struct SaleFormTemplate {
    pub current_path: &'static str,
    pub flashes: Vec<Flash>,
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub form: SaleForm,
    pub errors: FieldErrors,
}

impl SaleFormTemplate {
    async fn load(
        state: &AppState,
        form: SaleForm,
        errors: FieldErrors,
    ) -> Result<Self, AppError> {
        Ok(Self {
            current_path: LIST_PATH,
            flashes: Vec::new(),
            customers: CustomerRepository::new(state.pool()).list_all().await?,
            products: ProductRepository::new(state.pool()).list_all().await?,
            form,
            errors,
        })
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(LIST_PATH, get(index))
        .route("/venda/nova", get(new_form).post(create))
}

/// Sales list page handler.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<SalesIndexTemplate, AppError> {
    let sales = SaleRepository::new(state.pool()).list_with_names().await?;

    Ok(SalesIndexTemplate {
        current_path: LIST_PATH,
        flashes: Flash::take_all(&session).await?,
        sales,
    })
}

/// New sale form with customer and product choices.
#[instrument(skip(state))]
pub async fn new_form(State(state): State<AppState>) -> Result<SaleFormTemplate, AppError> {
    SaleFormTemplate::load(&state, SaleForm::default(), FieldErrors::new()).await
}

/// Record a sale through the stock-checked transaction.
#[instrument(skip(state, session, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SaleForm>,
) -> Result<Response, AppError> {
    let sale = match form.validate() {
        Ok(sale) => sale,
        Err(errors) => return invalid(&state, form, errors).await,
    };

    match SaleRepository::new(state.pool()).record_sale(&sale).await {
        Ok(SaleOutcome::Recorded(_)) => {
            Flash::success(&session, "Venda registrada com sucesso!").await?;
        }
        Ok(SaleOutcome::InsufficientStock { .. }) => {
            Flash::push(
                &session,
                FlashLevel::Warning,
                "Estoque insuficiente para a venda.",
            )
            .await?;
        }
        Err(RepositoryError::NotFound(entity)) => {
            let mut errors = FieldErrors::new();
            if entity == "customer" {
                errors.insert("cliente_id", "Cliente não encontrado.");
            } else {
                errors.insert("produto_id", "Produto não encontrado.");
            }
            return invalid(&state, form, errors).await;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to(LIST_PATH).into_response())
}

async fn invalid(
    state: &AppState,
    form: SaleForm,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    let template = SaleFormTemplate::load(state, form, errors).await?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, template).into_response())
}
