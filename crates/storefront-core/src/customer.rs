//! Customer profile records.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// A customer profile tied to an external identity.
///
/// At most one customer exists per `user_id`; first self-service access
/// creates the record (get-or-create), so a profile always exists for any
/// authenticated caller that has touched the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Database id.
    pub id: i64,

    /// The external identity this profile belongs to. Unique.
    pub user_id: UserId,

    /// Optional phone number.
    pub phone: Option<String>,

    /// Optional date of birth (ISO date string).
    pub birth_date: Option<String>,
}
