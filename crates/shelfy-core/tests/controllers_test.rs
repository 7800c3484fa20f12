#![allow(clippy::unwrap_used)]
// Controller workflows against a mock server.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelfy_api::{ShelfClient, TransportConfig};
use shelfy_core::{
    BookReviewPage, Books, Categories, Context, CoreError, DeletePhase, EntityId, LoadState,
    ResourceScreen, ReviewFilter, Reviews, Selection, Session,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Context) {
    let server = MockServer::start().await;
    let api = ShelfClient::new(&server.uri(), &TransportConfig::default()).unwrap();
    let session = Session::with_token(SecretString::from("test-token".to_owned()));
    (server, Context::from_client(api, session, 10))
}

fn category_json(id: u64, name: &str) -> serde_json::Value {
    json!({ "id": id, "name": name, "description": format!("{name} books") })
}

fn book_json(id: u64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "author": "Frank Herbert",
        "category_id": 2,
        "category": { "id": 2, "name": "Sci-Fi" },
        "image_url": "https://img.example/cover.jpg"
    })
}

fn review_json(id: u64, book_id: u64, text: &str) -> serde_json::Value {
    json!({ "id": id, "book_id": book_id, "ulasan": text })
}

// ── Create / edit ───────────────────────────────────────────────────

#[tokio::test]
async fn create_book_posts_draft_then_refetches() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([category_json(2, "Sci-Fi")])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/books"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_json(json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "categoryId": 2,
            "imageUrl": ""
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([book_json(1, "Dune")])))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = ResourceScreen::<Books>::new(ctx);
    screen.load_options().await.unwrap();
    screen.create();
    assert_eq!(
        screen.form().unwrap().draft().category_id,
        Some(EntityId::new(2))
    );

    let form = screen.form_mut().unwrap();
    form.set_field("title", "Dune").unwrap();
    form.set_field("author", "Frank Herbert").unwrap();
    screen.submit().await.unwrap();

    assert!(screen.form().is_none());
    assert_eq!(screen.selection(), &Selection::Idle);
    assert_eq!(screen.list().state(), &LoadState::Loaded);
    assert_eq!(screen.list().items()[0].title, "Dune");
}

#[tokio::test]
async fn edit_form_is_prefilled_and_puts_whole_draft() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([category_json(4, "Poetry")])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/category/4"))
        .and(body_json(json!({ "name": "Poems", "description": "Poetry books" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = ResourceScreen::<Categories>::new(ctx);
    screen.refresh().await.unwrap();
    let category = screen.list().items()[0].clone();

    screen.edit(category);
    let form = screen.form_mut().unwrap();
    assert_eq!(form.draft().name, "Poetry");
    assert_eq!(form.draft().description, "Poetry books");

    form.set_field("name", "Poems").unwrap();
    screen.submit().await.unwrap();
    assert!(screen.form().is_none());
}

#[tokio::test]
async fn invalid_draft_never_reaches_the_server() {
    let (server, ctx) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/category"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut screen = ResourceScreen::<Categories>::new(ctx);
    screen.create();
    screen.form_mut().unwrap().set_field("description", "x").unwrap();

    let err = screen.submit().await.unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
    assert_eq!(screen.form().unwrap().error(), Some("Name is required"));
}

#[tokio::test]
async fn save_without_server_message_uses_default_text() {
    let (server, ctx) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/category"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut screen = ResourceScreen::<Categories>::new(ctx);
    screen.create();
    let form = screen.form_mut().unwrap();
    form.set_field("name", "Poetry").unwrap();
    form.set_field("description", "Verse").unwrap();

    assert!(screen.submit().await.is_err());
    let form = screen.form().unwrap();
    assert_eq!(form.error(), Some("An error occurred while saving the category"));
    assert_eq!(form.draft().name, "Poetry");
    assert!(!form.is_submitting());
    assert_eq!(screen.selection(), &Selection::Creating);
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_success_closes_detail_and_reloads() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([category_json(3, "Drama")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/category/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = ResourceScreen::<Categories>::new(ctx);
    screen.refresh().await.unwrap();
    let first = screen.list().items()[0].clone();
    screen.view(first);
    assert!(screen.request_delete());

    screen.confirm_delete().await.unwrap();
    assert_eq!(screen.selection(), &Selection::Idle);
    assert_eq!(screen.deletion().phase(), DeletePhase::Idle);
    assert!(screen.list().items().is_empty());
}

#[tokio::test]
async fn delete_failure_keeps_detail_open_with_server_message() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([category_json(3, "Drama")])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/category/3"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Category in use" })),
        )
        .mount(&server)
        .await;

    let mut screen = ResourceScreen::<Categories>::new(ctx);
    screen.refresh().await.unwrap();
    let first = screen.list().items()[0].clone();
    screen.view(first);
    screen.request_delete();

    let err = screen.confirm_delete().await.unwrap_err();
    assert!(matches!(err, CoreError::Api { status: Some(409), .. }));
    assert!(screen.selection().is_detail_open());
    assert_eq!(screen.deletion().error(), Some("Category in use"));
    assert!(!screen.deletion().is_confirming());
    assert!(!screen.deletion().is_deleting());
    assert_eq!(screen.list().items().len(), 1);
}

#[tokio::test]
async fn selection_is_locked_while_delete_is_in_flight() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/category"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            category_json(3, "Drama"),
            category_json(4, "Poetry")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/category/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = ResourceScreen::<Categories>::new(ctx);
    screen.refresh().await.unwrap();
    let first = screen.list().items()[0].clone();
    let second = screen.list().items()[1].clone();
    screen.view(first.clone());
    screen.request_delete();
    let ticket = screen.begin_delete().unwrap();

    assert!(!screen.view(second.clone()));
    assert!(!screen.edit(second));
    assert!(!screen.create());
    assert!(!screen.close());
    assert!(!screen.edit_selected());
    assert_eq!(screen.selection(), &Selection::Viewing(first));
    assert!(screen.form().is_none());

    let outcome = ticket.run().await;
    assert!(screen.finish_delete(outcome).is_some());
    assert_eq!(screen.selection(), &Selection::Idle);
    assert_eq!(screen.deletion().phase(), DeletePhase::Idle);
}

#[tokio::test]
async fn confirm_without_prompt_is_refused() {
    let (server, ctx) = setup().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut screen = ResourceScreen::<Categories>::new(ctx);
    assert_eq!(
        screen.confirm_delete().await.unwrap_err(),
        CoreError::NotConfirmed
    );
}

// ── Paging & filter ─────────────────────────────────────────────────

#[tokio::test]
async fn failed_page_change_reverts_and_keeps_rows() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([book_json(1, "Dune")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut screen = ResourceScreen::<Books>::new(ctx);
    screen.refresh().await.unwrap();
    assert!(screen.list_mut().change_page(1));
    assert!(screen.refresh().await.is_err());

    assert_eq!(screen.list().page(), 1);
    assert_eq!(screen.list().items().len(), 1);
    assert_eq!(screen.list().state().error(), Some("Failed to load books"));
}

#[tokio::test]
async fn review_filter_switches_endpoint() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/review"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            review_json(1, 5, "Loved it"),
            review_json(2, 6, "Meh")
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/review/book/5"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([review_json(1, 5, "Loved it")])))
        .expect(1)
        .mount(&server)
        .await;

    let mut screen = ResourceScreen::<Reviews>::new(ctx);
    screen.refresh().await.unwrap();
    assert_eq!(screen.list().items().len(), 2);

    assert!(screen.list_mut().set_filter(ReviewFilter::book(EntityId::new(5))));
    screen.refresh().await.unwrap();
    assert_eq!(screen.list().items().len(), 1);

    screen.create();
    assert_eq!(
        screen.form().unwrap().draft().book_id,
        Some(EntityId::new(5))
    );
}

#[tokio::test]
async fn failed_filter_switch_restores_previous_filter() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/review"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([review_json(1, 9, "Fine")])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/review/book/5"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut screen = ResourceScreen::<Reviews>::new(ctx);
    screen.refresh().await.unwrap();

    assert!(screen.list_mut().set_filter(ReviewFilter::book(EntityId::new(5))));
    assert!(screen.refresh().await.is_err());

    assert_eq!(screen.list().filter(), &ReviewFilter::default());
    assert_eq!(screen.list().items().len(), 1);
    assert_eq!(screen.list().items()[0].book_id, EntityId::new(9));
    assert_eq!(screen.list().state().error(), Some("Failed to load reviews"));
}

#[tokio::test]
async fn list_without_session_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    let api = ShelfClient::new(&server.uri(), &TransportConfig::default()).unwrap();
    let ctx = Context::from_client(api, Session::anonymous(), 10);

    let mut screen = ResourceScreen::<Books>::new(ctx);
    assert_eq!(screen.refresh().await.unwrap_err(), CoreError::Unauthenticated);
    assert_eq!(screen.list().state().error(), Some("Not logged in"));
}

// ── Book review page ────────────────────────────────────────────────

#[tokio::test]
async fn book_page_loads_and_posts_review() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/books/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(book_json(3, "Hyperion")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/review/book/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([review_json(1, 3, "Dense")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/review/book/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            review_json(1, 3, "Dense"),
            review_json(2, 3, "Great")
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/review"))
        .and(body_json(json!({ "bookId": 3, "ulasan": "Great" })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut page = BookReviewPage::new(ctx, EntityId::new(3));
    page.load().await.unwrap();
    assert_eq!(page.book().unwrap().title, "Hyperion");
    assert_eq!(page.reviews().len(), 1);

    page.set_review_text("Great");
    page.add_review().await.unwrap();
    assert_eq!(page.reviews().len(), 2);
    assert_eq!(page.draft().ulasan, "");
    assert_eq!(page.draft().book_id, Some(EntityId::new(3)));
}

#[tokio::test]
async fn book_page_keeps_posted_review_when_refetch_fails() {
    let (server, ctx) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/books/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(book_json(3, "Hyperion")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/review/book/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([review_json(1, 3, "Dense")])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/review/book/3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/review"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut page = BookReviewPage::new(ctx, EntityId::new(3));
    page.load().await.unwrap();

    page.set_review_text("Great");
    page.add_review().await.unwrap();
    assert_eq!(page.error(), None);
    assert_eq!(page.draft().ulasan, "");
    assert_eq!(page.reviews().len(), 1);
    assert_eq!(page.state().error(), Some("Failed to load reviews"));

    // Nothing left to post: an empty draft is rejected locally.
    assert!(page.add_review().await.is_err());
}

#[tokio::test]
async fn book_page_rejects_empty_review() {
    let (_server, ctx) = setup().await;
    let mut page = BookReviewPage::new(ctx, EntityId::new(3));
    page.set_review_text("   ");
    assert!(page.add_review().await.is_err());
    assert_eq!(page.error(), Some("Review is required"));
}
