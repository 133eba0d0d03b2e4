//! Event types the Orgo platform delivers

use crate::{Result, WebhookError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Domain object an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Contact,
    ContractUser,
    EventAttend,
    ProductPayment,
    UserRole,
    User,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::ContractUser => "contract_user",
            Self::EventAttend => "event_attend",
            Self::ProductPayment => "product_payment",
            Self::UserRole => "user_role",
            Self::User => "user",
        }
    }
}

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Created,
    Updated,
    Deleted,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// A subscribable `entity.operation` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "contact.created")]
    ContactCreated,
    #[serde(rename = "contact.updated")]
    ContactUpdated,
    #[serde(rename = "contact.deleted")]
    ContactDeleted,
    #[serde(rename = "contract_user.created")]
    ContractUserCreated,
    #[serde(rename = "contract_user.updated")]
    ContractUserUpdated,
    #[serde(rename = "contract_user.deleted")]
    ContractUserDeleted,
    #[serde(rename = "event_attend.created")]
    EventAttendCreated,
    #[serde(rename = "event_attend.updated")]
    EventAttendUpdated,
    #[serde(rename = "event_attend.deleted")]
    EventAttendDeleted,
    #[serde(rename = "product_payment.created")]
    ProductPaymentCreated,
    #[serde(rename = "product_payment.updated")]
    ProductPaymentUpdated,
    #[serde(rename = "product_payment.deleted")]
    ProductPaymentDeleted,
    #[serde(rename = "user_role.created")]
    UserRoleCreated,
    #[serde(rename = "user_role.updated")]
    UserRoleUpdated,
    #[serde(rename = "user_role.deleted")]
    UserRoleDeleted,
    #[serde(rename = "user.created")]
    UserCreated,
    #[serde(rename = "user.updated")]
    UserUpdated,
    #[serde(rename = "user.deleted")]
    UserDeleted,
}

impl EventType {
    /// Every event type, grouped by entity.
    pub const ALL: [EventType; 18] = [
        Self::ContactCreated,
        Self::ContactUpdated,
        Self::ContactDeleted,
        Self::ContractUserCreated,
        Self::ContractUserUpdated,
        Self::ContractUserDeleted,
        Self::EventAttendCreated,
        Self::EventAttendUpdated,
        Self::EventAttendDeleted,
        Self::ProductPaymentCreated,
        Self::ProductPaymentUpdated,
        Self::ProductPaymentDeleted,
        Self::UserRoleCreated,
        Self::UserRoleUpdated,
        Self::UserRoleDeleted,
        Self::UserCreated,
        Self::UserUpdated,
        Self::UserDeleted,
    ];

    /// Entity this event refers to.
    pub fn entity(&self) -> EntityType {
        use EventType::*;
        match self {
            ContactCreated | ContactUpdated | ContactDeleted => EntityType::Contact,
            ContractUserCreated | ContractUserUpdated | ContractUserDeleted => {
                EntityType::ContractUser
            }
            EventAttendCreated | EventAttendUpdated | EventAttendDeleted => {
                EntityType::EventAttend
            }
            ProductPaymentCreated | ProductPaymentUpdated | ProductPaymentDeleted => {
                EntityType::ProductPayment
            }
            UserRoleCreated | UserRoleUpdated | UserRoleDeleted => EntityType::UserRole,
            UserCreated | UserUpdated | UserDeleted => EntityType::User,
        }
    }

    /// Operation performed on the entity.
    pub fn operation(&self) -> Operation {
        use EventType::*;
        match self {
            ContactCreated | ContractUserCreated | EventAttendCreated | ProductPaymentCreated
            | UserRoleCreated | UserCreated => Operation::Created,
            ContactUpdated | ContractUserUpdated | EventAttendUpdated | ProductPaymentUpdated
            | UserRoleUpdated | UserUpdated => Operation::Updated,
            ContactDeleted | ContractUserDeleted | EventAttendDeleted | ProductPaymentDeleted
            | UserRoleDeleted | UserDeleted => Operation::Deleted,
        }
    }

    /// Wire name, e.g. `contract_user.created`.
    pub fn as_str(&self) -> &'static str {
        use EventType::*;
        match self {
            ContactCreated => "contact.created",
            ContactUpdated => "contact.updated",
            ContactDeleted => "contact.deleted",
            ContractUserCreated => "contract_user.created",
            ContractUserUpdated => "contract_user.updated",
            ContractUserDeleted => "contract_user.deleted",
            EventAttendCreated => "event_attend.created",
            EventAttendUpdated => "event_attend.updated",
            EventAttendDeleted => "event_attend.deleted",
            ProductPaymentCreated => "product_payment.created",
            ProductPaymentUpdated => "product_payment.updated",
            ProductPaymentDeleted => "product_payment.deleted",
            UserRoleCreated => "user_role.created",
            UserRoleUpdated => "user_role.updated",
            UserRoleDeleted => "user_role.deleted",
            UserCreated => "user.created",
            UserUpdated => "user.updated",
            UserDeleted => "user.deleted",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        use EventType::*;
        match self {
            ContactCreated => "Contact Created",
            ContactUpdated => "Contact Updated",
            ContactDeleted => "Contact Deleted",
            ContractUserCreated => "Contract Signed",
            ContractUserUpdated => "Contract Updated",
            ContractUserDeleted => "Contract Deleted",
            EventAttendCreated => "Event Registration",
            EventAttendUpdated => "Event Attendance Updated",
            EventAttendDeleted => "Event Registration Cancelled",
            ProductPaymentCreated => "Payment Created",
            ProductPaymentUpdated => "Payment Updated",
            ProductPaymentDeleted => "Payment Deleted",
            UserRoleCreated => "Role Assigned",
            UserRoleUpdated => "Role Updated",
            UserRoleDeleted => "Role Removed",
            UserCreated => "User Created",
            UserUpdated => "User Updated",
            UserDeleted => "User Deleted",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .find(|event| event.as_str() == s)
            .copied()
            .ok_or_else(|| WebhookError::Config(format!("unknown event type: {}", s)))
    }
}
