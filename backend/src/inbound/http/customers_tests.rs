//! HTTP tests for the customer handlers, backed by the in-memory store.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    FIXTURE_TENANT_ID, FixtureCustomersCommand, FixtureLoginService, MockCustomersQuery,
};
use crate::domain::{CustomerService, Error, Tenant};
use crate::inbound::http::login::{LoginRequest, login};
use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
use crate::outbound::memory::InMemoryCustomerStore;

const OTHER_TENANT: &str = "9b2e4d1c-0000-4000-8000-0000000000b2";

fn state() -> HttpState {
    let store = Arc::new(InMemoryCustomerStore::with_tenants([
        Tenant {
            id: FIXTURE_TENANT_ID,
            name: "Fixture".to_owned(),
        },
        Tenant {
            id: TenantId::from_uuid(uuid::Uuid::parse_str(OTHER_TENANT).expect("uuid")),
            name: "Other".to_owned(),
        },
    ]));
    let service = Arc::new(CustomerService::new(Arc::clone(&store), store));
    HttpState::new(
        Arc::new(FixtureLoginService),
        service.clone(),
        service,
    )
}

macro_rules! init_app {
    () => {
        init_app!(state())
    };
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(test_session_middleware())
                .service(web::scope("/api/v1").service(login).configure(configure)),
        )
        .await
    };
}

async fn login_as<S>(app: &S, username: &str) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(LoginRequest {
                username: username.to_owned(),
                password: "password".to_owned(),
            })
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    session_cookie(&res)
}

fn body(name: &str) -> Value {
    json!({ "name": name, "email": "ops@example.test", "city": " " })
}

#[actix_web::test]
async fn anonymous_callers_are_rejected() {
    let app = init_app!();

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/customers/tenant/{FIXTURE_TENANT_ID}"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let value: Value = test::read_body_json(res).await;
    assert_eq!(value["code"], "unauthorized");
}

#[rstest]
#[case("user", StatusCode::FORBIDDEN)]
#[case("customeradmin", StatusCode::FORBIDDEN)]
#[case("tenantadmin", StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn delete_requires_tenant_admin(#[case] username: &str, #[case] expected: StatusCode) {
    let app = init_app!();
    let cookie = login_as(&app, username).await;

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/customers/{}", uuid::Uuid::new_v4()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), expected);
}

#[actix_web::test]
async fn create_then_get_returns_the_customer() {
    let app = init_app!();
    let cookie = login_as(&app, "customeradmin").await;

    let mut payload = body("Acme");
    payload["tenantId"] = json!(OTHER_TENANT);
    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/customers")
            .cookie(cookie.clone())
            .set_json(&payload)
            .to_request(),
    )
    .await;

    assert_eq!(created.status(), StatusCode::CREATED);
    let location = created
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("location header");
    let customer: CustomerResponseBody = test::read_body_json(created).await;
    assert_eq!(location, format!("/api/v1/customers/{}", customer.id));
    assert_eq!(customer.tenant_id, FIXTURE_TENANT_ID.to_string());
    assert_eq!(customer.city, None);
    assert_eq!(customer.revision, 1);

    let fetched = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&location)
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched_body: CustomerResponseBody = test::read_body_json(fetched).await;
    assert_eq!(fetched_body.id, customer.id);
    assert_eq!(fetched_body.name, "Acme");
    assert_eq!(fetched_body.email.as_deref(), Some("ops@example.test"));
}

#[actix_web::test]
async fn system_admin_chooses_the_tenant() {
    let app = init_app!();
    let cookie = login_as(&app, "sysadmin").await;

    let mut payload = body("Globex");
    payload["tenantId"] = json!(OTHER_TENANT);
    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/customers")
            .cookie(cookie.clone())
            .set_json(&payload)
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let listed = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/customers/tenant/{OTHER_TENANT}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(listed.status(), StatusCode::OK);
    let customers: Vec<CustomerResponseBody> = test::read_body_json(listed).await;
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].name, "Globex");
}

#[actix_web::test]
async fn empty_tenant_lists_as_not_found() {
    let app = init_app!();
    let cookie = login_as(&app, "user").await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/customers/tenant/{FIXTURE_TENANT_ID}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let value: Value = test::read_body_json(res).await;
    assert_eq!(value["code"], "not_found_customer");
}

#[rstest]
#[case("/api/v1/customers/not-a-uuid", "id")]
#[case("/api/v1/customers/tenant/not-a-uuid", "tenantId")]
#[actix_web::test]
async fn malformed_path_ids_are_invalid_requests(#[case] uri: &str, #[case] field: &str) {
    let app = init_app!();
    let cookie = login_as(&app, "user").await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value: Value = test::read_body_json(res).await;
    assert_eq!(value["details"]["field"], field);
    assert_eq!(value["details"]["code"], "invalid_uuid");
}

#[actix_web::test]
async fn create_without_name_names_the_field() {
    let app = init_app!();
    let cookie = login_as(&app, "customeradmin").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/customers")
            .cookie(cookie)
            .set_json(json!({ "email": "ops@example.test" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value: Value = test::read_body_json(res).await;
    assert_eq!(value["details"]["field"], "name");
    assert_eq!(value["details"]["code"], "missing_field");
}

async fn create<S>(app: &S, cookie: Cookie<'static>, name: &str) -> CustomerResponseBody
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/customers")
            .cookie(cookie)
            .set_json(body(name))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    test::read_body_json(res).await
}

#[actix_web::test]
async fn update_replaces_and_bumps_revision() {
    let app = init_app!();
    let cookie = login_as(&app, "customeradmin").await;
    let customer = create(&app, cookie.clone(), "Acme").await;
    let uri = format!("/api/v1/customers/{}", customer.id);

    let updated = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .cookie(cookie.clone())
            .set_json(json!({
                "id": customer.id,
                "tenantId": customer.tenant_id,
                "name": "Acme Holdings",
                "revision": 1
            }))
            .to_request(),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::NO_CONTENT);

    let fetched = test::call_service(
        &app,
        test::TestRequest::get().uri(&uri).cookie(cookie).to_request(),
    )
    .await;
    let fetched_body: CustomerResponseBody = test::read_body_json(fetched).await;
    assert_eq!(fetched_body.name, "Acme Holdings");
    assert_eq!(fetched_body.email, None);
    assert_eq!(fetched_body.revision, 2);
}

/// Payloads without an `id` are sent with the id of the created customer.
#[rstest]
#[case(
    json!({ "id": uuid::Uuid::new_v4().to_string(), "tenantId": FIXTURE_TENANT_ID.to_string(), "name": "X" }),
    StatusCode::BAD_REQUEST,
    "invalid_request",
    Some("id_mismatch")
)]
#[case(
    json!({ "tenantId": FIXTURE_TENANT_ID.to_string(), "name": "X", "revision": 7 }),
    StatusCode::CONFLICT,
    "concurrency_conflict",
    None
)]
#[case(json!({ "name": "X" }), StatusCode::BAD_REQUEST, "invalid_request", Some("missing_field"))]
#[actix_web::test]
async fn update_rejections(
    #[case] payload: Value,
    #[case] status: StatusCode,
    #[case] code: &str,
    #[case] detail: Option<&str>,
) {
    let app = init_app!();
    let cookie = login_as(&app, "customeradmin").await;
    let customer = create(&app, cookie.clone(), "Acme").await;
    let mut sent = payload;
    if sent.get("id").is_none() {
        sent["id"] = json!(customer.id);
    }

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/customers/{}", customer.id))
            .cookie(cookie)
            .set_json(sent)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), status);
    let value: Value = test::read_body_json(res).await;
    assert_eq!(value["code"], code);
    if let Some(expected) = detail {
        assert_eq!(value["details"]["code"], expected);
    }
}

#[actix_web::test]
async fn nil_id_on_create_gets_a_fresh_id() {
    let app = init_app!();
    let cookie = login_as(&app, "customeradmin").await;
    let nil = uuid::Uuid::nil().to_string();

    let mut ids = Vec::new();
    for name in ["Acme", "Initech"] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/customers")
                .cookie(cookie.clone())
                .set_json(json!({ "id": nil, "name": name }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: CustomerResponseBody = test::read_body_json(res).await;
        assert_ne!(created.id, nil);
        ids.push(created.id);
    }

    assert_ne!(ids.first(), ids.last());
}

#[actix_web::test]
async fn delete_returns_last_state_then_not_found() {
    let app = init_app!();
    let cookie = login_as(&app, "tenantadmin").await;
    let customer = create(&app, cookie.clone(), "Initech").await;
    let uri = format!("/api/v1/customers/{}", customer.id);

    let deleted = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);
    let deleted_body: CustomerResponseBody = test::read_body_json(deleted).await;
    assert_eq!(deleted_body.name, "Initech");

    let fetched = test::call_service(
        &app,
        test::TestRequest::get().uri(&uri).cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn storage_failures_are_redacted() {
    let mut query = MockCustomersQuery::new();
    query
        .expect_get_customer()
        .times(1)
        .returning(|_| Err(Error::internal("connection to db-3 refused")));
    let app = init_app!(HttpState::new(
        Arc::new(FixtureLoginService),
        Arc::new(query),
        Arc::new(FixtureCustomersCommand),
    ));
    let cookie = login_as(&app, "user").await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/customers/{}", uuid::Uuid::new_v4()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let value: Value = test::read_body_json(res).await;
    assert_eq!(value["code"], "internal_error");
    assert_eq!(value["message"], "Internal server error");
    assert!(value.get("details").is_none_or(Value::is_null));
}
