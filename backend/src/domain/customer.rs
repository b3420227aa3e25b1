//! Customer data model.
//!
//! A [`Customer`] always belongs to exactly one tenant. Writes arrive as a
//! loosely-typed [`CustomerDraft`] and are validated into a [`Customer`] by
//! the customer service once the tenant has been resolved.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TenantId;

/// Maximum length of a customer name, in characters.
pub const CUSTOMER_NAME_MAX: usize = 200;
/// Maximum length of each optional contact field, in characters.
pub const CONTACT_FIELD_MAX: usize = 200;

/// Validation errors returned by [`Customer::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerValidationError {
    /// The name is blank.
    EmptyName,
    /// The name exceeds `max` characters.
    NameTooLong { max: usize },
    /// A contact field exceeds `max` characters.
    FieldTooLong { field: &'static str, max: usize },
}

impl CustomerValidationError {
    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName | Self::NameTooLong { .. } => "name",
            Self::FieldTooLong { field, .. } => field,
        }
    }
}

impl fmt::Display for CustomerValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "customer name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "customer name must be at most {max} characters")
            }
            Self::FieldTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for CustomerValidationError {}

/// Immutable customer identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(Uuid);

impl CustomerId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random [`CustomerId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for CustomerId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Optional descriptive contact fields.
///
/// Blank values are treated as absent once a customer is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
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
}

fn normalise_field(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<String>, CustomerValidationError> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > CONTACT_FIELD_MAX {
        return Err(CustomerValidationError::FieldTooLong {
            field,
            max: CONTACT_FIELD_MAX,
        });
    }
    Ok(Some(trimmed.to_owned()))
}

impl ContactDetails {
    fn normalised(self) -> Result<Self, CustomerValidationError> {
        Ok(Self {
            email: normalise_field(self.email, "email")?,
            phone: normalise_field(self.phone, "phone")?,
            country: normalise_field(self.country, "country")?,
            province: normalise_field(self.province, "province")?,
            city: normalise_field(self.city, "city")?,
            street: normalise_field(self.street, "street")?,
            address: normalise_field(self.address, "address")?,
            zip_code: normalise_field(self.zip_code, "zipCode")?,
        })
    }
}

/// Customer owned by a tenant.
///
/// ## Invariants
/// - `name` is trimmed, non-empty and at most [`CUSTOMER_NAME_MAX`]
///   characters.
/// - `revision` starts at 1 and grows by one on every stored update.
///
/// # Examples
/// ```
/// use tenant_customers::domain::{ContactDetails, Customer, CustomerId, TenantId};
///
/// let customer = Customer::try_new(
///     CustomerId::random(),
///     TenantId::random(),
///     "  Acme Ltd ",
///     ContactDetails::default(),
///     1,
/// )
/// .expect("valid customer");
/// assert_eq!(customer.name(), "Acme Ltd");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    id: CustomerId,
    tenant_id: TenantId,
    name: String,
    contact: ContactDetails,
    revision: u32,
}

impl Customer {
    /// Validate and construct a customer.
    pub fn try_new(
        id: CustomerId,
        tenant_id: TenantId,
        name: &str,
        contact: ContactDetails,
        revision: u32,
    ) -> Result<Self, CustomerValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CustomerValidationError::EmptyName);
        }
        if trimmed.chars().count() > CUSTOMER_NAME_MAX {
            return Err(CustomerValidationError::NameTooLong {
                max: CUSTOMER_NAME_MAX,
            });
        }

        Ok(Self {
            id,
            tenant_id,
            name: trimmed.to_owned(),
            contact: contact.normalised()?,
            revision,
        })
    }

    /// Customer identifier.
    pub fn id(&self) -> CustomerId {
        self.id
    }

    /// Owning tenant.
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Trimmed display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Contact details.
    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    /// Current revision.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Return a copy carrying the given revision.
    #[must_use]
    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = revision;
        self
    }
}

/// Unvalidated customer payload submitted for create or update.
///
/// `id`, `tenant_id` and `revision` are optional on the wire; the service
/// decides how each absence is treated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDraft {
    /// Requested identifier.
    pub id: Option<CustomerId>,
    /// Requested owning tenant.
    pub tenant_id: Option<TenantId>,
    /// Raw display name.
    pub name: String,
    /// Raw contact details.
    pub contact: ContactDetails,
    /// Expected current revision for optimistic concurrency checks.
    pub revision: Option<u32>,
}
