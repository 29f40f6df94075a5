//! Tests for hero HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{CatalogSeedRepository, HeroCommand, HeroQuery, SuperpowerQuery};
use crate::domain::{CatalogSeed, Superpower};
use crate::inbound::http::api_scope;
use crate::inbound::http::validation::tests::capture_logs;
use crate::outbound::memory::InMemoryCatalogStore;

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(api_scope())
}

async fn seeded_state() -> HttpState {
    let store = Arc::new(InMemoryCatalogStore::new());
    let seed = CatalogSeed::reference().expect("bundled seed is valid");
    store.seed_once(&seed).await.expect("seed applies");
    HttpState::with_services(store.clone(), store, Arc::new(DefaultClock))
}

fn hero_body(hero_name: &str, superpower_ids: &[i32]) -> Value {
    json!({
        "name": "Kara Zor-El",
        "heroName": hero_name,
        "birthDate": "1985-06-01",
        "height": 1.73,
        "weight": 60.0,
        "superpowerIds": superpower_ids,
    })
}

fn superpower_ids_of(body: &Value) -> Vec<i64> {
    body["superpowers"]
        .as_array()
        .expect("superpowers array")
        .iter()
        .filter_map(|power| power["id"].as_i64())
        .collect()
}

async fn hero_count(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
) -> usize {
    let req = actix_test::TestRequest::get().uri("/api/hero").to_request();
    let body: Vec<Value> = actix_test::call_and_read_body_json(app, req).await;
    body.len()
}

#[actix_web::test]
async fn list_returns_seeded_heroes_in_id_order() {
    let app = actix_test::init_service(test_app(seeded_state().await)).await;

    let req = actix_test::TestRequest::get().uri("/api/hero").to_request();
    let body: Vec<Value> = actix_test::call_and_read_body_json(&app, req).await;

    let ids: Vec<i64> = body.iter().filter_map(|hero| hero["id"].as_i64()).collect();
    assert_eq!(ids, (1..=10).collect::<Vec<i64>>());
    assert_eq!(body[0]["heroName"], "Super-Homem");
    assert_eq!(superpower_ids_of(&body[0]), vec![1, 2, 6, 19]);
}

#[actix_web::test]
async fn get_returns_hero_with_camel_case_fields() {
    let app = actix_test::init_service(test_app(seeded_state().await)).await;

    let req = actix_test::TestRequest::get().uri("/api/hero/4").to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;

    assert_eq!(body["heroName"], "Flash");
    assert!(body.get("birthDate").is_some());
    assert!(body.get("createdAt").is_some());
    assert_eq!(superpower_ids_of(&body), vec![3, 5]);
}

#[rstest]
#[case("/api/hero/999", StatusCode::NOT_FOUND, "not_found")]
#[case("/api/hero/abc", StatusCode::BAD_REQUEST, "invalid_request")]
#[actix_web::test]
async fn get_reports_missing_or_malformed_ids(
    #[case] uri: &str,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(seeded_state().await)).await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
        .await;
    assert_eq!(res.status(), status);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], code);
}

#[actix_web::test]
async fn create_returns_location_and_collapses_duplicate_links() {
    let app = actix_test::init_service(test_app(seeded_state().await)).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/hero")
        .set_json(hero_body("Supergirl", &[2, 1, 2]))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(location.as_deref(), Some("/api/hero/11"));
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["id"], 11);
    assert_eq!(body["birthDate"], "1985-06-01T00:00:00Z");
    assert_eq!(superpower_ids_of(&body), vec![1, 2]);
}

#[actix_web::test]
async fn create_accepts_alias_as_hero_name_synonym() {
    let app = actix_test::init_service(test_app(seeded_state().await)).await;
    let mut payload = hero_body("unused", &[]);
    let object = payload.as_object_mut().expect("object payload");
    object.remove("heroName");
    object.insert("alias".into(), json!("Supergirl"));

    let req = actix_test::TestRequest::post()
        .uri("/api/hero")
        .set_json(payload)
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["heroName"], "Supergirl");
    assert_eq!(superpower_ids_of(&body), Vec::<i64>::new());
}

#[rstest]
#[case(hero_body("Flash", &[1]), "conflict")]
#[case(hero_body("Supergirl", &[1, 999]), "invalid_reference")]
#[case(hero_body("", &[1]), "invalid_request")]
#[case(json!({"name": "x", "heroName": "y", "birthDate": "yesterday", "height": 1.0, "weight": 1.0, "superpowerIds": []}), "invalid_request")]
#[case(json!({"name": "x"}), "invalid_request")]
#[actix_web::test]
async fn rejected_creates_leave_the_catalogue_unchanged(
    #[case] payload: Value,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(seeded_state().await)).await;

    let req = actix_test::TestRequest::post()
        .uri("/api/hero")
        .set_json(payload)
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], code);
    assert_eq!(hero_count(&app).await, 10);
}

#[rstest]
#[case(json!({"name": "x"}), "malformed_body")]
#[case(hero_body("Flash", &[1]), "create_hero")]
#[actix_web::test]
async fn rejected_creates_are_logged_once(#[case] payload: Value, #[case] marker: &str) {
    let app = actix_test::init_service(test_app(seeded_state().await)).await;
    let (logs, _guard) = capture_logs();

    let req = actix_test::TestRequest::post()
        .uri("/api/hero")
        .set_json(payload)
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let output = logs.contents();
    assert_eq!(output.matches("request rejected").count(), 1, "{output}");
    assert!(output.contains(marker), "{output}");
}

#[actix_web::test]
async fn update_replaces_fields_and_links() {
    let app = actix_test::init_service(test_app(seeded_state().await)).await;
    let mut payload = hero_body("Flash", &[7, 2, 7]);
    payload["id"] = json!(4);
    payload["name"] = json!("Wally West");

    let req = actix_test::TestRequest::put()
        .uri("/api/hero/4")
        .set_json(payload)
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["name"], "Wally West");
    assert_eq!(body["createdAt"], "2025-09-06T13:22:00Z");
    assert_eq!(superpower_ids_of(&body), vec![2, 7]);
}

#[rstest]
#[case("/api/hero/4", 5, "Flash", &[1], StatusCode::BAD_REQUEST, "id_mismatch")]
#[case("/api/hero/999", 999, "Nobody", &[1], StatusCode::NOT_FOUND, "not_found")]
#[case("/api/hero/4", 4, "Batman", &[1], StatusCode::BAD_REQUEST, "conflict")]
#[case("/api/hero/4", 4, "Flash", &[999], StatusCode::BAD_REQUEST, "invalid_reference")]
#[actix_web::test]
async fn rejected_updates_leave_the_hero_untouched(
    #[case] uri: &str,
    #[case] body_id: i32,
    #[case] hero_name: &str,
    #[case] links: &[i32],
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(seeded_state().await)).await;
    let mut payload = hero_body(hero_name, links);
    payload["id"] = json!(body_id);

    let req = actix_test::TestRequest::put()
        .uri(uri)
        .set_json(payload)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), status);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], code);

    let req = actix_test::TestRequest::get().uri("/api/hero/4").to_request();
    let flash: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(flash["name"], "Barry Allen");
    assert_eq!(superpower_ids_of(&flash), vec![3, 5]);
}

#[actix_web::test]
async fn delete_removes_hero_once() {
    let app = actix_test::init_service(test_app(seeded_state().await)).await;

    let first = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete().uri("/api/hero/2").to_request(),
    )
    .await;
    let second = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete().uri("/api/hero/2").to_request(),
    )
    .await;

    assert_eq!(first.status(), StatusCode::NO_CONTENT);
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    assert_eq!(hero_count(&app).await, 9);
}

struct BrokenCatalogue;

#[async_trait]
impl HeroQuery for BrokenCatalogue {
    async fn list_heroes(&self) -> Result<Vec<HeroView>, Error> {
        Err(Error::internal("relation \"heroes\" does not exist"))
    }

    async fn get_hero(&self, _id: HeroId) -> Result<HeroView, Error> {
        Err(Error::internal("relation \"heroes\" does not exist"))
    }
}

#[async_trait]
impl HeroCommand for BrokenCatalogue {
    async fn create_hero(&self, _request: CreateHeroRequest) -> Result<HeroView, Error> {
        Err(Error::internal("connection refused"))
    }

    async fn update_hero(&self, _request: UpdateHeroRequest) -> Result<(), Error> {
        Err(Error::internal("connection refused"))
    }

    async fn delete_hero(&self, _id: HeroId) -> Result<(), Error> {
        Err(Error::internal("connection refused"))
    }

    async fn hero_exists(&self, _id: HeroId) -> Result<bool, Error> {
        Err(Error::internal("connection refused"))
    }
}

#[async_trait]
impl SuperpowerQuery for BrokenCatalogue {
    async fn list_superpowers(&self) -> Result<Vec<Superpower>, Error> {
        Err(Error::internal("connection refused"))
    }

    async fn get_superpower(&self, _id: SuperpowerId) -> Result<Superpower, Error> {
        Err(Error::internal("connection refused"))
    }
}

#[rstest]
#[case("/api/hero")]
#[case("/api/hero/1")]
#[case("/api/superpowers")]
#[actix_web::test]
async fn internal_failures_are_redacted(#[case] uri: &str) {
    let broken = Arc::new(BrokenCatalogue);
    let state = HttpState::new(broken.clone(), broken.clone(), broken);
    let app = actix_test::init_service(test_app(state)).await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["message"], "Internal server error");
}
