use axum::response::Html;

use crate::views;

/// GET /test
pub async fn test_page() -> Html<String> {
    Html(views::test_page("Hello, World"))
}
