//! HTTP-level tests for the drug-seizure registry and its reports.

mod common;

use axum::http::StatusCode;
use common::{
    add_reference, body_json, delete, get, post_json, post_json_anonymous, put_json, put_json_as,
};
use serde_json::json;
use sirpol_core::reference::ReferenceKind;
use sirpol_core::types::DbId;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Places {
    department: DbId,
    province: DbId,
    district: DbId,
    directorate: DbId,
    division: DbId,
    police_department: DbId,
}

async fn seed_places(pool: &PgPool, department: &str, directorate: &str) -> Places {
    let department_id = add_reference(pool, ReferenceKind::Departments, None, department).await;
    let province =
        add_reference(pool, ReferenceKind::Provinces, Some(department_id), department).await;
    let district = add_reference(pool, ReferenceKind::Districts, Some(province), "Centro").await;
    let directorate_id =
        add_reference(pool, ReferenceKind::PoliceDirectorates, None, directorate).await;
    let division = add_reference(
        pool,
        ReferenceKind::PoliceDivisions,
        None,
        &format!("Division {directorate}"),
    )
    .await;
    let police_department = add_reference(
        pool,
        ReferenceKind::PoliceDepartments,
        None,
        &format!("Depincri {directorate}"),
    )
    .await;
    Places {
        department: department_id,
        province,
        district,
        directorate: directorate_id,
        division,
        police_department,
    }
}

fn seizure(places: &Places, kind: &str, date: &str) -> serde_json::Value {
    let mut body = json!({
        "kind": kind,
        "seized_date": date,
        "seized_time": "09:30:00",
        "department_id": places.department,
        "province_id": places.province,
        "district_id": places.district,
        "directorate_id": places.directorate,
        "division_id": places.division,
        "police_department_id": places.police_department,
        "sicpip_note": "SICPIP-2026-301",
        "intervention_type": "operativo",
    });
    if kind.starts_with("env_") {
        body["quantity_units"] = json!(12);
    } else {
        body["quantity_kg"] = json!(1.5);
    }
    body
}

async fn create(pool: &PgPool, body: serde_json::Value) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/api/v1/drug-seizures", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn registry_numbers_are_sequential_per_kind(pool: PgPool) {
    let places = seed_places(&pool, "Lima", "DIRANDRO").await;

    let mut numbers = Vec::new();
    for kind in ["kg_cc", "kg_cc", "env_marihuana", "kg_cc"] {
        let json = create(&pool, seizure(&places, kind, "2026-01-10")).await;
        numbers.push(json["data"]["registry_number"].as_i64().unwrap());
    }
    assert_eq!(numbers, vec![1, 2, 1, 3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn intervention_type_is_normalized(pool: PgPool) {
    let places = seed_places(&pool, "Lima", "DIRANDRO").await;
    let json = create(&pool, seizure(&places, "env_pbc", "2026-01-10")).await;
    assert_eq!(json["data"]["intervention_type"], "OPERATIVO");
    assert_eq!(json["data"]["recorded_by"], common::TEST_USER);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_seizures_are_rejected(pool: PgPool) {
    let places = seed_places(&pool, "Lima", "DIRANDRO").await;
    let other = seed_places(&pool, "Piura", "DIRINCRI").await;

    let mut unknown_kind = seizure(&places, "kg_cc", "2026-01-10");
    unknown_kind["kind"] = json!("kg_sugar");

    let mut wrong_measure = seizure(&places, "kg_cc", "2026-01-10");
    wrong_measure["quantity_units"] = json!(3);

    let mut zero = seizure(&places, "env_marihuana", "2026-01-10");
    zero["quantity_units"] = json!(0);

    let mut intervention = seizure(&places, "kg_cc", "2026-01-10");
    intervention["intervention_type"] = json!("patrullaje");

    let mut crossed = seizure(&places, "kg_cc", "2026-01-10");
    crossed["province_id"] = json!(other.province);

    let mut empty_note = seizure(&places, "kg_cc", "2026-01-10");
    empty_note["sicpip_note"] = json!("");

    for body in [unknown_kind, wrong_measure, zero, intervention, crossed, empty_note] {
        let app = common::build_test_app(pool.clone());
        let response = post_json(app, "/api/v1/drug-seizures", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM drug_seizures")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn specialized_directorate_must_belong_to_directorate(pool: PgPool) {
    let places = seed_places(&pool, "Lima", "DIRANDRO").await;
    let elsewhere = add_reference(&pool, ReferenceKind::PoliceDirectorates, None, "DIRTEPOL").await;
    let foreign =
        add_reference(&pool, ReferenceKind::SpecializedDirectorates, Some(elsewhere), "DIVPOL").await;

    let mut body = seizure(&places, "kg_cc", "2026-01-10");
    body["specialized_directorate_id"] = json!(foreign);

    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/drug-seizures", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("specialized_directorate_id:"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_requires_actor(pool: PgPool) {
    let places = seed_places(&pool, "Lima", "DIRANDRO").await;
    let app = common::build_test_app(pool);
    let response = post_json_anonymous(
        app,
        "/api/v1/drug-seizures",
        seizure(&places, "kg_cc", "2026-01-10"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_get_and_delete(pool: PgPool) {
    let lima = seed_places(&pool, "Lima", "DIRANDRO").await;
    let piura = seed_places(&pool, "Piura", "DIRINCRI").await;
    let first = create(&pool, seizure(&lima, "kg_cc", "2026-01-05")).await;
    create(&pool, seizure(&lima, "kg_marihuana", "2026-02-05")).await;
    create(&pool, seizure(&piura, "kg_cc", "2026-03-05")).await;
    let id = first["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/drug-seizures?kind=kg_cc").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool.clone());
    let json = body_json(
        get(
            app,
            &format!(
                "/api/v1/drug-seizures?department_id={}&date_from=2026-02-01",
                lima.department
            ),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["kind"], "kg_marihuana");

    let app = common::build_test_app(pool.clone());
    let response = get(
        app,
        "/api/v1/drug-seizures?date_from=2026-03-01&date_to=2026-01-01",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = get(app, &format!("/api/v1/drug-seizures/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/drug-seizures/{id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/drug-seizures/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_keeps_registry_number_and_records_editor(pool: PgPool) {
    let lima = seed_places(&pool, "Lima", "DIRANDRO").await;
    create(&pool, seizure(&lima, "kg_cc", "2026-01-05")).await;
    let second = create(&pool, seizure(&lima, "kg_cc", "2026-01-06")).await;
    let id = second["data"]["id"].as_i64().unwrap();
    assert!(second["data"]["updated_by"].is_null());

    let mut edited = seizure(&lima, "kg_cc", "2026-01-07");
    edited["quantity_kg"] = json!(2.25);
    edited["intervention_type"] = json!("Intervención");
    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/drug-seizures/{id}");
    let response = put_json_as(app, &uri, "cap.mendoza", edited).await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["registry_number"], 2);
    assert_eq!(data["quantity_kg"], 2.25);
    assert_eq!(data["seized_date"], "2026-01-07");
    assert_eq!(data["intervention_type"], "INTERVENCION");
    assert_eq!(data["recorded_by"], common::TEST_USER);
    assert_eq!(data["updated_by"], "cap.mendoza");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_rejects_kind_change_and_bad_fields(pool: PgPool) {
    let lima = seed_places(&pool, "Lima", "DIRANDRO").await;
    let piura = seed_places(&pool, "Piura", "DIRINCRI").await;
    let created = create(&pool, seizure(&lima, "kg_cc", "2026-01-05")).await;
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/drug-seizures/{id}");

    let other_kind = seizure(&lima, "kg_pbc", "2026-01-05");
    let mut wrong_measure = seizure(&lima, "kg_cc", "2026-01-05");
    wrong_measure["quantity_units"] = json!(4);
    let mut foreign_province = seizure(&lima, "kg_cc", "2026-01-05");
    foreign_province["province_id"] = json!(piura.province);

    for body in [other_kind, wrong_measure, foreign_province] {
        let app = common::build_test_app(pool.clone());
        let response = put_json(app, &uri, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let app = common::build_test_app(pool.clone());
    let missing = seizure(&lima, "kg_cc", "2026-01-05");
    let response = put_json(app, "/api/v1/drug-seizures/999999", missing).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let json = body_json(get(app, &uri).await).await;
    assert_eq!(json["data"]["kind"], "kg_cc");
    assert_eq!(json["data"]["quantity_kg"], 1.5);
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn summary_reports_totals_and_echoes_filters(pool: PgPool) {
    let lima = seed_places(&pool, "Lima", "DIRANDRO").await;
    let piura = seed_places(&pool, "Piura", "DIRINCRI").await;
    create(&pool, seizure(&lima, "kg_cc", "2026-01-05")).await;
    create(&pool, seizure(&lima, "kg_cc", "2026-01-06")).await;
    create(&pool, seizure(&lima, "env_marihuana", "2026-01-07")).await;
    create(&pool, seizure(&piura, "kg_cc", "2026-01-08")).await;

    let app = common::build_test_app(pool.clone());
    let response = get(
        app,
        &format!(
            "/api/v1/reports/drug-seizures/summary?department_id={}&date_to=2026-01-31",
            lima.department
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = &body_json(response).await["data"];
    assert_eq!(data["total_records"], 3);
    assert_eq!(data["by_intervention_type"]["OPERATIVO"], 3);
    assert_eq!(data["by_intervention_type"]["INTERVENCION"], 0);
    assert_eq!(data["by_kind"]["kg_cc"]["operations"], 2);
    assert_eq!(data["by_kind"]["kg_cc"]["total_quantity"], 3.0);
    assert_eq!(data["by_kind"]["kg_cc"]["average"], 1.5);
    assert_eq!(data["by_kind"]["env_marihuana"]["total_quantity"], 12.0);
    assert_eq!(data["by_kind"]["kg_marihuana"]["operations"], 0);
    assert_eq!(data["filters"]["department_id"], lima.department);
    assert_eq!(data["filters"]["date_to"], "2026-01-31");
    assert!(data["filters"]["date_from"].is_null());

    let app = common::build_test_app(pool);
    let response = get(
        app,
        "/api/v1/reports/drug-seizures/summary?date_from=2026-02-01&date_to=2026-01-01",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ranking_orders_by_count(pool: PgPool) {
    let lima = seed_places(&pool, "Lima", "DIRANDRO").await;
    let piura = seed_places(&pool, "Piura", "DIRINCRI").await;
    create(&pool, seizure(&piura, "kg_cc", "2026-01-05")).await;
    create(&pool, seizure(&piura, "kg_cc", "2026-01-06")).await;
    create(&pool, seizure(&lima, "kg_cc", "2026-01-07")).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get(app, "/api/v1/reports/drug-seizures/ranking").await).await;
    assert_eq!(json["data"]["by"], "department");
    assert_eq!(json["data"]["items"][0]["name"], "Piura");
    assert_eq!(json["data"]["items"][0]["total"], 2);
    assert_eq!(json["data"]["items"][1]["name"], "Lima");

    let app = common::build_test_app(pool.clone());
    let json =
        body_json(get(app, "/api/v1/reports/drug-seizures/ranking?by=unit&limit=1").await).await;
    assert_eq!(json["data"]["by"], "unit");
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "DIRINCRI");

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/reports/drug-seizures/ranking?by=weather").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
