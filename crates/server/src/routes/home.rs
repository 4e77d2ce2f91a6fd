//! Landing page.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

#[derive(Template, WebTemplate)]
#[template(path = "home/index.html")]
pub struct HomeTemplate {
    pub title: &'static str,
}

/// Render the landing page.
#[instrument]
pub async fn home() -> HomeTemplate {
    HomeTemplate { title: "Главная" }
}
