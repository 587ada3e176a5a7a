use axum::response::Html;

/// Serves the embedded single-page chat client.
pub async fn chat_page() -> Html<&'static str> {
    Html(include_str!("../index.html"))
}
