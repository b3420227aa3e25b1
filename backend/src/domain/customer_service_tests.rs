//! Tests for the customer service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockCustomerRepository, MockTenantRepository};
use crate::domain::{ContactDetails, CustomerDraft, ErrorCode, Role, Tenant, UserId};

fn caller(role: Role, tenant_id: TenantId) -> CallerContext {
    CallerContext::new(UserId::random(), role, tenant_id)
}

fn customer(id: CustomerId, tenant_id: TenantId, name: &str, revision: u32) -> Customer {
    Customer::try_new(id, tenant_id, name, ContactDetails::default(), revision)
        .expect("valid customer")
}

fn draft(id: Option<CustomerId>, tenant_id: Option<TenantId>, name: &str) -> CustomerDraft {
    CustomerDraft {
        id,
        tenant_id,
        name: name.to_owned(),
        ..CustomerDraft::default()
    }
}

/// Tenant repository that knows every tenant it is asked about.
#[fixture]
fn known_tenants() -> MockTenantRepository {
    let mut tenants = MockTenantRepository::new();
    tenants.expect_find_by_id().returning(|id| {
        Ok(Some(Tenant {
            id: *id,
            name: "tenant".to_owned(),
        }))
    });
    tenants
}

fn service(
    customers: MockCustomerRepository,
    tenants: MockTenantRepository,
) -> CustomerService<MockCustomerRepository, MockTenantRepository> {
    CustomerService::new(Arc::new(customers), Arc::new(tenants))
}

#[rstest]
#[tokio::test]
async fn list_returns_tenant_customers(known_tenants: MockTenantRepository) {
    let tenant_id = TenantId::random();
    let stored = vec![
        customer(CustomerId::random(), tenant_id, "Alpha", 1),
        customer(CustomerId::random(), tenant_id, "Beta", 1),
    ];
    let expected = stored.clone();

    let mut customers = MockCustomerRepository::new();
    customers
        .expect_list_by_tenant()
        .withf(move |id| *id == tenant_id)
        .times(1)
        .return_once(move |_| Ok(stored));

    let listed = service(customers, known_tenants)
        .list_by_tenant(ListTenantCustomersRequest { tenant_id })
        .await
        .expect("list succeeds");

    assert_eq!(listed, expected);
}

#[rstest]
#[tokio::test]
async fn list_reports_empty_tenant_as_missing_customers(known_tenants: MockTenantRepository) {
    let mut customers = MockCustomerRepository::new();
    customers
        .expect_list_by_tenant()
        .times(1)
        .return_once(|_| Ok(Vec::new()));

    let err = service(customers, known_tenants)
        .list_by_tenant(ListTenantCustomersRequest {
            tenant_id: TenantId::random(),
        })
        .await
        .expect_err("empty tenant");

    assert_eq!(err.code(), ErrorCode::NotFoundCustomer);
    assert_eq!(err.message(), "This tenant does not have any customers");
}

#[rstest]
#[tokio::test]
async fn get_reports_missing_customer(known_tenants: MockTenantRepository) {
    let mut customers = MockCustomerRepository::new();
    customers
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(None));

    let err = service(customers, known_tenants)
        .get_customer(GetCustomerRequest {
            id: CustomerId::random(),
        })
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFoundCustomer);
    assert_eq!(err.message(), "This customer was not found");
}

#[rstest]
#[case(
    CustomerRepositoryError::connection("refused"),
    ErrorCode::ServiceUnavailable
)]
#[case(CustomerRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn get_maps_repository_failures(
    known_tenants: MockTenantRepository,
    #[case] failure: CustomerRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut customers = MockCustomerRepository::new();
    customers
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Err(failure));

    let err = service(customers, known_tenants)
        .get_customer(GetCustomerRequest {
            id: CustomerId::random(),
        })
        .await
        .expect_err("failure");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[case(Role::SystemAdmin, true)]
#[case(Role::TenantAdmin, true)]
#[case(Role::CustomerAdmin, false)]
#[tokio::test]
async fn create_chooses_tenant_by_role(
    known_tenants: MockTenantRepository,
    #[case] role: Role,
    #[case] uses_payload_tenant: bool,
) {
    let home = TenantId::random();
    let requested = TenantId::random();
    let expected_tenant = if uses_payload_tenant { requested } else { home };
    let id = CustomerId::random();

    let mut customers = MockCustomerRepository::new();
    customers
        .expect_insert()
        .withf(move |c| c.tenant_id() == expected_tenant && c.revision() == 1)
        .times(1)
        .return_once(|_| Ok(()));
    customers
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(customer(id, expected_tenant, "Acme", 1))));

    let created = service(customers, known_tenants)
        .create_customer(CreateCustomerRequest {
            caller: caller(role, home),
            draft: draft(Some(id), Some(requested), "Acme"),
        })
        .await
        .expect("create succeeds");

    assert_eq!(created.tenant_id(), expected_tenant);
}

#[rstest]
#[tokio::test]
async fn create_treats_nil_tenant_as_absent(known_tenants: MockTenantRepository) {
    let home = TenantId::random();

    let mut customers = MockCustomerRepository::new();
    customers
        .expect_insert()
        .withf(move |c| c.tenant_id() == home)
        .times(1)
        .return_once(|_| Ok(()));
    customers
        .expect_find_by_id()
        .times(1)
        .return_once(move |id| Ok(Some(customer(*id, home, "Acme", 1))));

    let created = service(customers, known_tenants)
        .create_customer(CreateCustomerRequest {
            caller: caller(Role::SystemAdmin, home),
            draft: draft(None, Some(TenantId::from_uuid(uuid::Uuid::nil())), "Acme"),
        })
        .await
        .expect("create succeeds");

    assert_eq!(created.tenant_id(), home);
}

#[rstest]
#[tokio::test]
async fn create_assigns_an_id_when_the_nil_id_is_sent(known_tenants: MockTenantRepository) {
    let home = TenantId::random();

    let mut customers = MockCustomerRepository::new();
    customers
        .expect_insert()
        .withf(|c| !c.id().as_uuid().is_nil())
        .times(1)
        .return_once(|_| Ok(()));
    customers
        .expect_find_by_id()
        .withf(|id| !id.as_uuid().is_nil())
        .times(1)
        .return_once(move |id| Ok(Some(customer(*id, home, "Acme", 1))));

    let created = service(customers, known_tenants)
        .create_customer(CreateCustomerRequest {
            caller: caller(Role::CustomerAdmin, home),
            draft: draft(Some(CustomerId::from_uuid(uuid::Uuid::nil())), None, "Acme"),
        })
        .await
        .expect("create succeeds");

    assert!(!created.id().as_uuid().is_nil());
}

#[rstest]
#[tokio::test]
async fn create_rejects_unknown_tenant() {
    let mut tenants = MockTenantRepository::new();
    tenants.expect_find_by_id().times(1).return_once(|_| Ok(None));
    let mut customers = MockCustomerRepository::new();
    customers.expect_insert().times(0);

    let err = service(customers, tenants)
        .create_customer(CreateCustomerRequest {
            caller: caller(Role::CustomerAdmin, TenantId::random()),
            draft: draft(None, None, "Acme"),
        })
        .await
        .expect_err("unknown tenant");

    assert_eq!(err.code(), ErrorCode::NotFoundTenant);
}

#[rstest]
#[tokio::test]
async fn create_rejects_blank_name(known_tenants: MockTenantRepository) {
    let mut customers = MockCustomerRepository::new();
    customers.expect_insert().times(0);

    let err = service(customers, known_tenants)
        .create_customer(CreateCustomerRequest {
            caller: caller(Role::CustomerAdmin, TenantId::random()),
            draft: draft(None, None, "   "),
        })
        .await
        .expect_err("invalid name");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|d| d.get("field")),
        Some(&json!("name"))
    );
}

#[rstest]
#[tokio::test]
async fn create_maps_duplicate_to_conflict(known_tenants: MockTenantRepository) {
    let mut customers = MockCustomerRepository::new();
    customers
        .expect_insert()
        .times(1)
        .return_once(|c| Err(CustomerRepositoryError::duplicate(*c.id().as_uuid())));
    customers.expect_find_by_id().times(0);

    let err = service(customers, known_tenants)
        .create_customer(CreateCustomerRequest {
            caller: caller(Role::CustomerAdmin, TenantId::random()),
            draft: draft(Some(CustomerId::random()), None, "Acme"),
        })
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(None)]
#[case(Some(CustomerId::random()))]
#[tokio::test]
async fn update_rejects_id_mismatch_before_anything_else(#[case] payload_id: Option<CustomerId>) {
    let mut tenants = MockTenantRepository::new();
    tenants.expect_find_by_id().times(0);
    let mut customers = MockCustomerRepository::new();
    customers.expect_replace().times(0);

    // Blank name and missing tenant would fail later; the id check wins.
    let err = service(customers, tenants)
        .update_customer(UpdateCustomerRequest {
            caller: caller(Role::CustomerAdmin, TenantId::random()),
            id: CustomerId::random(),
            draft: draft(payload_id, None, ""),
        })
        .await
        .expect_err("mismatch");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().and_then(|d| d.get("code")), Some(&json!("id_mismatch")));
}

#[rstest]
#[tokio::test]
async fn update_requires_tenant(known_tenants: MockTenantRepository) {
    let id = CustomerId::random();
    let mut customers = MockCustomerRepository::new();
    customers.expect_replace().times(0);

    let err = service(customers, known_tenants)
        .update_customer(UpdateCustomerRequest {
            caller: caller(Role::CustomerAdmin, TenantId::random()),
            id,
            draft: draft(Some(id), None, "Acme"),
        })
        .await
        .expect_err("missing tenant");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().and_then(|d| d.get("field")), Some(&json!("tenantId")));
}

#[rstest]
#[tokio::test]
async fn update_passes_expected_revision(known_tenants: MockTenantRepository) {
    let id = CustomerId::random();
    let tenant_id = TenantId::random();
    let mut payload = draft(Some(id), Some(tenant_id), "Renamed");
    payload.revision = Some(3);

    let mut customers = MockCustomerRepository::new();
    customers
        .expect_replace()
        .withf(move |c, expected| c.id() == id && c.name() == "Renamed" && *expected == Some(3))
        .times(1)
        .return_once(|c, _| Ok(c.clone().with_revision(4)));

    service(customers, known_tenants)
        .update_customer(UpdateCustomerRequest {
            caller: caller(Role::CustomerAdmin, tenant_id),
            id,
            draft: payload,
        })
        .await
        .expect("update succeeds");
}

#[rstest]
#[case(CustomerRepositoryError::missing(uuid::Uuid::nil()), ErrorCode::NotFoundCustomer)]
#[case(
    CustomerRepositoryError::stale(uuid::Uuid::nil(), 5_u32),
    ErrorCode::ConcurrencyConflict
)]
#[tokio::test]
async fn update_reports_lost_races(
    known_tenants: MockTenantRepository,
    #[case] failure: CustomerRepositoryError,
    #[case] expected: ErrorCode,
) {
    let id = CustomerId::random();
    let mut customers = MockCustomerRepository::new();
    customers
        .expect_replace()
        .times(1)
        .return_once(move |_, _| Err(failure));

    let err = service(customers, known_tenants)
        .update_customer(UpdateCustomerRequest {
            caller: caller(Role::CustomerAdmin, TenantId::random()),
            id,
            draft: draft(Some(id), Some(TenantId::random()), "Acme"),
        })
        .await
        .expect_err("lost race");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn delete_returns_last_known_state(known_tenants: MockTenantRepository) {
    let id = CustomerId::random();
    let stored = customer(id, TenantId::random(), "Acme", 2);
    let expected = stored.clone();

    let mut customers = MockCustomerRepository::new();
    customers
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(stored)));
    customers
        .expect_delete()
        .withf(move |deleted| *deleted == id)
        .times(1)
        .return_once(|_| Ok(true));

    let deleted = service(customers, known_tenants)
        .delete_customer(DeleteCustomerRequest {
            caller: caller(Role::TenantAdmin, TenantId::random()),
            id,
        })
        .await
        .expect("delete succeeds");

    assert_eq!(deleted, expected);
}

#[rstest]
#[tokio::test]
async fn delete_reports_missing_customer(known_tenants: MockTenantRepository) {
    let mut customers = MockCustomerRepository::new();
    customers
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(None));
    customers.expect_delete().times(0);

    let err = service(customers, known_tenants)
        .delete_customer(DeleteCustomerRequest {
            caller: caller(Role::TenantAdmin, TenantId::random()),
            id: CustomerId::random(),
        })
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFoundCustomer);
}
