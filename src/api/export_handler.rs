use actix_web::{web, HttpResponse};
use chrono::Utc;

use crate::export;
use crate::models::todo_store::TodoStore;
use crate::storage::ExportStorage;

/// Upload every todo as CSV and answer with a signed download URL
pub async fn export_todos(
    store: web::Data<dyn TodoStore>,
    storage: web::Data<dyn ExportStorage>,
) -> Result<HttpResponse, actix_web::Error> {
    let exported = web::block(move || {
        export::export_todos(store.get_ref(), storage.get_ref(), Utc::now())
    })
    .await??;

    Ok(HttpResponse::Ok().json(&exported))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};

    use crate::api::dtos::todo::ExportResponseDTO;
    use crate::api::test_support::{authed, test_app, RecordingStorage, TestContext};

    #[actix_web::test]
    async fn empty_export_is_header_only() {
        let ctx = TestContext::default();
        let app = test::init_service(test_app(&ctx)).await;

        let req = authed(test::TestRequest::get().uri("/export")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: ExportResponseDTO = test::read_body_json(resp).await;

        let (name, csv) = ctx.storage.last_upload().unwrap();
        assert!(name.starts_with("todos_") && name.ends_with(".csv"));
        assert_eq!(body.url, format!("https://storage.test/todo-exports/{}?sig=abc", name));
        assert_eq!(csv.lines().collect::<Vec<_>>(), vec!["id,title,description,completed"]);
    }

    #[actix_web::test]
    async fn export_has_one_row_per_todo_in_list_order() {
        let ctx = TestContext::default();
        let first = ctx.seed("first", false);
        let second = ctx.seed("second", true);
        let third = ctx.seed("third", false);
        let app = test::init_service(test_app(&ctx)).await;

        let req = authed(test::TestRequest::get().uri("/export")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let (_, csv) = ctx.storage.last_upload().unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], format!("{},first,,false", first.id));
        assert_eq!(lines[2], format!("{},second,,true", second.id));
        assert_eq!(lines[3], format!("{},third,,false", third.id));
    }

    #[actix_web::test]
    async fn storage_failure_is_bad_gateway() {
        let ctx = TestContext::with_storage(RecordingStorage::failing());
        ctx.seed("unlucky", false);
        let app = test::init_service(test_app(&ctx)).await;

        let req = authed(test::TestRequest::get().uri("/export")).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ctx.store.len(), 1);
    }

    #[actix_web::test]
    async fn export_requires_api_key() {
        let ctx = TestContext::default();
        let app = test::init_service(test_app(&ctx)).await;

        let req = test::TestRequest::get().uri("/export").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(ctx.storage.last_upload().is_none());
    }
}
