//! Customer API handlers.
//!
//! ```text
//! GET    /api/v1/customers/tenant/{tenantId}
//! GET    /api/v1/customers/{id}
//! PUT    /api/v1/customers/{id}
//! POST   /api/v1/customers
//! DELETE /api/v1/customers/{id}
//! ```
//!
//! Every route is wrapped in [`RequireRole`]; the admitted caller reaches
//! the handlers through the [`CallerContext`] extractor.

use actix_web::http::header;
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    CreateCustomerRequest, DeleteCustomerRequest, GetCustomerRequest, ListTenantCustomersRequest,
    UpdateCustomerRequest,
};
use crate::domain::{
    CallerContext, ContactDetails, Customer, CustomerDraft, CustomerId, Error, Role, TenantId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_optional_uuid, parse_uuid,
};
use crate::middleware::RequireRole;

const ID_FIELD: FieldName = FieldName::new("id");
const TENANT_ID_FIELD: FieldName = FieldName::new("tenantId");
const NAME_FIELD: FieldName = FieldName::new("name");

/// Customer payload accepted by create and update.
///
/// `id`, `tenantId` and `revision` are optional. On update a present `id`
/// must match the path; a present `revision` turns the update into a
/// compare-and-swap.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequestBody {
    /// Customer identifier; generated when absent on create.
    #[schema(example = "0f8fad5b-d9cb-469f-a165-70867728950e")]
    pub id: Option<String>,
    /// Owning tenant; defaults to the caller's tenant.
    #[schema(example = "5a1c0e7b-4f2d-4c11-9d3e-000000000001")]
    pub tenant_id: Option<String>,
    /// Display name.
    #[schema(example = "Acme Ltd")]
    pub name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Province or state.
    pub province: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Street.
    pub street: Option<String>,
    /// Free-form address line.
    pub address: Option<String>,
    /// Postal code.
    pub zip_code: Option<String>,
    /// Expected current revision.
    pub revision: Option<u32>,
}

impl TryFrom<CustomerRequestBody> for CustomerDraft {
    type Error = Error;

    fn try_from(body: CustomerRequestBody) -> Result<Self, Self::Error> {
        let id = parse_optional_uuid(body.id.as_deref(), ID_FIELD)?.map(CustomerId::from_uuid);
        let tenant_id =
            parse_optional_uuid(body.tenant_id.as_deref(), TENANT_ID_FIELD)?.map(TenantId::from_uuid);
        let name = body.name.ok_or_else(|| missing_field_error(NAME_FIELD))?;
        Ok(Self {
            id,
            tenant_id,
            name,
            contact: ContactDetails {
                email: body.email,
                phone: body.phone,
                country: body.country,
                province: body.province,
                city: body.city,
                street: body.street,
                address: body.address,
                zip_code: body.zip_code,
            },
            revision: body.revision,
        })
    }
}

/// Customer representation returned by the API.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponseBody {
    /// Customer identifier.
    #[schema(example = "0f8fad5b-d9cb-469f-a165-70867728950e")]
    pub id: String,
    /// Owning tenant.
    #[schema(example = "5a1c0e7b-4f2d-4c11-9d3e-000000000001")]
    pub tenant_id: String,
    /// Display name.
    #[schema(example = "Acme Ltd")]
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Province or state.
    pub province: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Street.
    pub street: Option<String>,
    /// Free-form address line.
    pub address: Option<String>,
    /// Postal code.
    pub zip_code: Option<String>,
    /// Optimistic-concurrency token; increases on every update.
    #[schema(example = 1)]
    pub revision: u32,
}

impl From<&Customer> for CustomerResponseBody {
    fn from(customer: &Customer) -> Self {
        let contact = customer.contact().clone();
        Self {
            id: customer.id().to_string(),
            tenant_id: customer.tenant_id().to_string(),
            name: customer.name().to_owned(),
            email: contact.email,
            phone: contact.phone,
            country: contact.country,
            province: contact.province,
            city: contact.city,
            street: contact.street,
            address: contact.address,
            zip_code: contact.zip_code,
            revision: customer.revision(),
        }
    }
}

fn customer_id_from_path(raw: &str) -> Result<CustomerId, Error> {
    parse_uuid(raw, ID_FIELD).map(CustomerId::from_uuid)
}

/// List every customer of a tenant.
#[utoipa::path(
    get,
    path = "/api/v1/customers/tenant/{tenantId}",
    params(("tenantId" = String, Path, description = "Tenant identifier")),
    responses(
        (status = 200, description = "Customers of the tenant", body = [CustomerResponseBody]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Tenant has no customers", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["customers"],
    operation_id = "listTenantCustomers"
)]
#[get(
    "/customers/tenant/{tenant_id}",
    wrap = "RequireRole::new(Role::NormalUser)"
)]
pub async fn list_tenant_customers(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<CustomerResponseBody>>> {
    let tenant_id = TenantId::from_uuid(parse_uuid(&path, TENANT_ID_FIELD)?);
    let customers = state
        .customers_query
        .list_by_tenant(ListTenantCustomersRequest { tenant_id })
        .await?;
    Ok(web::Json(
        customers.iter().map(CustomerResponseBody::from).collect(),
    ))
}

/// Fetch one customer.
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    params(("id" = String, Path, description = "Customer identifier")),
    responses(
        (status = 200, description = "Customer", body = CustomerResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Customer not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["customers"],
    operation_id = "getCustomer"
)]
#[get("/customers/{id}", wrap = "RequireRole::new(Role::NormalUser)")]
pub async fn get_customer(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CustomerResponseBody>> {
    let id = customer_id_from_path(&path)?;
    let customer = state
        .customers_query
        .get_customer(GetCustomerRequest { id })
        .await?;
    Ok(web::Json(CustomerResponseBody::from(&customer)))
}

/// Replace a customer.
#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    params(("id" = String, Path, description = "Customer identifier")),
    request_body = CustomerRequestBody,
    responses(
        (status = 204, description = "Customer updated"),
        (status = 400, description = "Invalid request or id mismatch", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Customer or tenant not found", body = Error),
        (status = 409, description = "Concurrent modification", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["customers"],
    operation_id = "updateCustomer"
)]
#[put("/customers/{id}", wrap = "RequireRole::new(Role::CustomerAdmin)")]
pub async fn update_customer(
    state: web::Data<HttpState>,
    caller: CallerContext,
    path: web::Path<String>,
    payload: web::Json<CustomerRequestBody>,
) -> ApiResult<HttpResponse> {
    let id = customer_id_from_path(&path)?;
    let draft = CustomerDraft::try_from(payload.into_inner())?;
    state
        .customers_command
        .update_customer(UpdateCustomerRequest { caller, id, draft })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Create a customer.
///
/// Callers below `TenantAdmin` always create inside their own tenant; the
/// payload's `tenantId` is only honoured for tenant and system admins.
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    request_body = CustomerRequestBody,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponseBody,
            headers(("Location" = String, description = "URL of the new customer"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Tenant not found", body = Error),
        (status = 409, description = "Duplicate customer id", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["customers"],
    operation_id = "createCustomer"
)]
#[post("/customers", wrap = "RequireRole::new(Role::CustomerAdmin)")]
pub async fn create_customer(
    state: web::Data<HttpState>,
    caller: CallerContext,
    payload: web::Json<CustomerRequestBody>,
) -> ApiResult<HttpResponse> {
    let draft = CustomerDraft::try_from(payload.into_inner())?;
    let customer = state
        .customers_command
        .create_customer(CreateCustomerRequest { caller, draft })
        .await?;
    Ok(HttpResponse::Created()
        .insert_header((
            header::LOCATION,
            format!("/api/v1/customers/{}", customer.id()),
        ))
        .json(CustomerResponseBody::from(&customer)))
}

/// Delete a customer and return its last state.
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    params(("id" = String, Path, description = "Customer identifier")),
    responses(
        (status = 200, description = "Deleted customer", body = CustomerResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Customer not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["customers"],
    operation_id = "deleteCustomer"
)]
#[delete("/customers/{id}", wrap = "RequireRole::new(Role::TenantAdmin)")]
pub async fn delete_customer(
    state: web::Data<HttpState>,
    caller: CallerContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CustomerResponseBody>> {
    let id = customer_id_from_path(&path)?;
    let customer = state
        .customers_command
        .delete_customer(DeleteCustomerRequest { caller, id })
        .await?;
    Ok(web::Json(CustomerResponseBody::from(&customer)))
}

/// Register every customer route on a service config.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_tenant_customers)
        .service(get_customer)
        .service(update_customer)
        .service(create_customer)
        .service(delete_customer);
}

#[cfg(test)]
#[path = "customers_tests.rs"]
mod tests;
