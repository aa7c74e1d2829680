//! HTTP-level tests for reference catalog lookups.

mod common;

use axum::http::StatusCode;
use common::{add_reference, body_json, get};
use sirpol_core::reference::ReferenceKind;
use sqlx::PgPool;

fn names(json: &serde_json::Value) -> Vec<String> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn provinces_shortcut_returns_children_ordered_by_name(pool: PgPool) {
    let lima = add_reference(&pool, ReferenceKind::Departments, None, "Lima").await;
    let cusco = add_reference(&pool, ReferenceKind::Departments, None, "Cusco").await;
    add_reference(&pool, ReferenceKind::Provinces, Some(lima), "Huaral").await;
    add_reference(&pool, ReferenceKind::Provinces, Some(lima), "Canta").await;
    add_reference(&pool, ReferenceKind::Provinces, Some(cusco), "Urubamba").await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/provinces?departamento_id={lima}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(names(&body_json(response).await), vec!["Canta", "Huaral"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn districts_shortcut_requires_its_parameter(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/districts").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Parameter 'provincia_id' is required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_supports_search_and_descending_order(pool: PgPool) {
    for name in ["Arequipa", "Ayacucho", "Puno", "Apurimac"] {
        add_reference(&pool, ReferenceKind::Departments, None, name).await;
    }

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/reference/departments?search=A&ordering=-name").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        names(&body_json(response).await),
        vec!["Ayacucho", "Arequipa", "Apurimac"]
    );

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/reference/departments?ordering=population").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_named_parent(pool: PgPool) {
    let fuero = add_reference(&pool, ReferenceKind::CrimeJurisdictions, None, "Comun").await;
    let other = add_reference(&pool, ReferenceKind::CrimeJurisdictions, None, "Militar").await;
    add_reference(&pool, ReferenceKind::CrimeGenerals, Some(fuero), "Contra el Patrimonio").await;
    add_reference(&pool, ReferenceKind::CrimeGenerals, Some(other), "Desercion").await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/reference/crime-generals?fuero_id={fuero}")).await;

    assert_eq!(names(&body_json(response).await), vec!["Contra el Patrimonio"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_item_and_missing_item(pool: PgPool) {
    let id = add_reference(&pool, ReferenceKind::Nationalities, None, "Peruana").await;

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/reference/nationalities/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Peruana");

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/reference/nationalities/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_catalog_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/reference/planets").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn by_parent_requires_parent_id(pool: PgPool) {
    let category = add_reference(&pool, ReferenceKind::WeaponCategories, None, "Fuego").await;
    add_reference(&pool, ReferenceKind::WeaponTypes, Some(category), "Revolver").await;
    add_reference(&pool, ReferenceKind::WeaponTypes, Some(category), "Pistola").await;

    let app = common::build_test_app(pool.clone());
    let response = get(
        app,
        &format!("/api/v1/reference/weapon-types/by-parent?parent_id={category}"),
    )
    .await;
    assert_eq!(names(&body_json(response).await), vec!["Pistola", "Revolver"]);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/reference/weapon-types/by-parent").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cascade_filter_resolves_child_table(pool: PgPool) {
    let directorate =
        add_reference(&pool, ReferenceKind::PoliceDirectorates, None, "DIRCOCOR").await;
    add_reference(
        &pool,
        ReferenceKind::SpecializedDirectorates,
        Some(directorate),
        "DIRANDRO",
    )
    .await;

    let app = common::build_test_app(pool);
    let response = get(
        app,
        &format!(
            "/api/v1/reference/cascade?type=specialized_directorates_by_directorate&parent_id={directorate}"
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(names(&body_json(response).await), vec!["DIRANDRO"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cascade_filter_rejects_bad_requests(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/reference/cascade?parent_id=1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("provinces_by_department"));

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/reference/cascade?type=moons_by_planet&parent_id=1").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/reference/cascade?type=districts_by_province").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_parent_id_is_a_json_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/provinces?departamento_id=abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["content-type"], "application/json");
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("departamento_id"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_item_id_is_a_json_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/reference/departments/lima").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
