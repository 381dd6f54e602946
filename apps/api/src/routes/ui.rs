use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// GET /
/// The form and preview page. All state lives server-side; the page only calls the API.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
