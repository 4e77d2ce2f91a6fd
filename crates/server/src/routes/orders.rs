//! Customer order form.
//!
//! A submitted form either lands on the success page or is redirected to the
//! failure page with the validation message in `?reason=`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::Redirect,
};
use r4c_core::OrderForm;
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::services::{OrderError, place_order};
use crate::state::AppState;

pub const SUCCESS_PATH: &str = "/orders/success/";
pub const FAIL_PATH: &str = "/orders/fail/";

#[derive(Template, WebTemplate)]
#[template(path = "orders/new.html")]
pub struct NewOrderTemplate {
    pub title: &'static str,
}

#[derive(Template, WebTemplate)]
#[template(path = "orders/success.html")]
pub struct OrderSuccessTemplate {
    pub title: &'static str,
}

#[derive(Template, WebTemplate)]
#[template(path = "orders/fail.html")]
pub struct OrderFailTemplate {
    pub title: &'static str,
    pub reason: Option<String>,
}

/// Query string of the failure page.
#[derive(Debug, Deserialize)]
pub struct FailQuery {
    pub reason: Option<String>,
}

/// Render the order form.
#[instrument]
pub async fn new_order_form() -> NewOrderTemplate {
    NewOrderTemplate {
        title: "Новый заказ",
    }
}

/// Accept a submitted order form.
#[instrument(skip(state, form))]
pub async fn create_order(
    State(state): State<AppState>,
    Form(form): Form<OrderForm>,
) -> Result<Redirect, AppError> {
    match place_order(state.pool(), &form).await {
        Ok(_) => Ok(Redirect::to(SUCCESS_PATH)),
        Err(OrderError::Validation(e)) => {
            tracing::info!(reason = %e, "Order rejected");
            Ok(Redirect::to(&fail_location(&e.to_string())))
        }
        Err(e) => Err(e.into()),
    }
}

/// Render the success page.
#[instrument]
pub async fn order_success() -> OrderSuccessTemplate {
    OrderSuccessTemplate {
        title: "Заказ принят",
    }
}

/// Render the failure page.
#[instrument]
pub async fn order_fail(Query(query): Query<FailQuery>) -> OrderFailTemplate {
    OrderFailTemplate {
        title: "Ошибка заказа",
        reason: query.reason.filter(|r| !r.is_empty()),
    }
}

fn fail_location(reason: &str) -> String {
    format!("{FAIL_PATH}?reason={}", urlencoding::encode(reason))
}
