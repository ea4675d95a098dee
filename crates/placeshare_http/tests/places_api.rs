use actix_web::http::StatusCode;
use actix_web::{test as actix_test, web, App};
use placeshare_core::db::open_db;
use placeshare_core::{NewUser, SqliteEntityStore, User, UserRepository};
use placeshare_http::{configure, AppState};
use serde_json::{json, Value};
use std::path::Path;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    state: AppState,
    user: User,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("api.db");
    let user = seed_user(&path, "u1@example.com");
    Fixture {
        state: AppState::new(path),
        _dir: dir,
        user,
    }
}

fn seed_user(path: &Path, email: &str) -> User {
    let conn = open_db(path).unwrap();
    let store = SqliteEntityStore::try_new(&conn).unwrap();
    store
        .create_user(&NewUser {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            image: "https://example.com/avatar.png".to_string(),
        })
        .unwrap()
}

macro_rules! app {
    ($state:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure),
        )
        .await
    };
}

fn cafe_body(creator: &str) -> Value {
    json!({
        "title": "Cafe",
        "description": "Coffee",
        "address": "1 Main St",
        "creator": creator,
    })
}

#[actix_web::test]
async fn create_then_read_place() {
    let fx = fixture();
    let app = app!(fx.state);

    let request = actix_test::TestRequest::post()
        .uri("/api/places")
        .set_json(cafe_body(&fx.user.id.to_string()))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = actix_test::read_body_json(response).await;
    let place_id = created["place"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["place"]["creator"], fx.user.id.to_string());
    assert_eq!(created["place"]["title"], "Cafe");

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/places/{place_id}"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let loaded: Value = actix_test::read_body_json(response).await;
    assert_eq!(loaded["place"], created["place"]);

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/places/owner/{}", fx.user.id))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let owned: Value = actix_test::read_body_json(response).await;
    assert_eq!(owned["places"].as_array().unwrap().len(), 1);
    assert_eq!(owned["places"][0]["id"], place_id.as_str());
}

#[actix_web::test]
async fn create_with_nonexistent_creator_is_422_and_persists_nothing() {
    let fx = fixture();
    let app = app!(fx.state);

    for creator in ["nonexistent".to_string(), uuid::Uuid::new_v4().to_string()] {
        let request = actix_test::TestRequest::post()
            .uri("/api/places")
            .set_json(cafe_body(&creator))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "Provided Creator ID does not exist");
    }

    let conn = open_db(fx.state.db_path()).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM places;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[actix_web::test]
async fn create_with_invalid_fields_lists_errors() {
    let fx = fixture();
    let app = app!(fx.state);

    let request = actix_test::TestRequest::post()
        .uri("/api/places")
        .set_json(json!({ "title": "", "creator": fx.user.id.to_string() }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = actix_test::read_body_json(response).await;
    let fields: Vec<_> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|err| err["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, vec!["title", "description", "address"]);
}

#[actix_web::test]
async fn malformed_json_is_422() {
    let fx = fixture();
    let app = app!(fx.state);

    let request = actix_test::TestRequest::post()
        .uri("/api/places")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn patch_updates_text_fields_only() {
    let fx = fixture();
    let app = app!(fx.state);
    let request = actix_test::TestRequest::post()
        .uri("/api/places")
        .set_json(cafe_body(&fx.user.id.to_string()))
        .to_request();
    let created: Value = actix_test::call_and_read_body_json(&app, request).await;
    let place_id = created["place"]["id"].as_str().unwrap().to_string();

    let request = actix_test::TestRequest::patch()
        .uri(&format!("/api/places/{place_id}"))
        .set_json(json!({ "title": "Tea House", "description": "Green tea" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = actix_test::read_body_json(response).await;
    assert_eq!(updated["place"]["title"], "Tea House");
    assert_eq!(updated["place"]["description"], "Green tea");
    assert_eq!(updated["place"]["creator"], created["place"]["creator"]);
    assert_eq!(updated["place"]["location"], created["place"]["location"]);
}

#[actix_web::test]
async fn patch_unknown_place_is_404() {
    let fx = fixture();
    let app = app!(fx.state);

    let request = actix_test::TestRequest::patch()
        .uri(&format!("/api/places/{}", uuid::Uuid::new_v4()))
        .set_json(json!({ "title": "Tea House", "description": "Green tea" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn delete_then_read_is_404_and_owner_list_shrinks() {
    let fx = fixture();
    let app = app!(fx.state);
    let request = actix_test::TestRequest::post()
        .uri("/api/places")
        .set_json(cafe_body(&fx.user.id.to_string()))
        .to_request();
    let created: Value = actix_test::call_and_read_body_json(&app, request).await;
    let place_id = created["place"]["id"].as_str().unwrap().to_string();

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/api/places/{place_id}"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(actix_test::read_body(response).await.is_empty());

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/places/{place_id}"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "Could not find a place for the provided pid.");

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/places/owner/{}", fx.user.id))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["message"], "Could not find a place for the provided uid.");
}

#[actix_web::test]
async fn unknown_or_malformed_ids_are_404() {
    let fx = fixture();
    let app = app!(fx.state);

    for uri in [
        "/api/places/not-a-uuid".to_string(),
        format!("/api/places/{}", uuid::Uuid::new_v4()),
        format!("/api/places/owner/{}", uuid::Uuid::new_v4()),
        "/api/places/owner/nobody".to_string(),
    ] {
        let request = actix_test::TestRequest::get().uri(&uri).to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    let request = actix_test::TestRequest::delete()
        .uri("/api/places/not-a-uuid")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn store_failure_is_500_without_details() {
    let fx = fixture();
    let app = app!(fx.state);
    let conn = open_db(fx.state.db_path()).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER fail_link BEFORE INSERT ON user_places
         BEGIN SELECT RAISE(ABORT, 'injected link failure'); END;",
    )
    .unwrap();
    drop(conn);

    let request = actix_test::TestRequest::post()
        .uri("/api/places")
        .set_json(cafe_body(&fx.user.id.to_string()))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body["message"],
        "Creating place unsuccessful. Please try again later"
    );
    let conn = open_db(fx.state.db_path()).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM places;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
