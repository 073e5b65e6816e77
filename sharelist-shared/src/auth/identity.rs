/// Authenticated identity context
///
/// The current user's identity (id + email) is carried as an explicit value
/// — built by the auth middleware from validated token claims and passed to
/// the aggregator and handlers — rather than read from ambient global
/// state. The email is the value collaborator membership is matched
/// against, exactly as stored in the claims.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated user for the duration of one request or stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Identity id of the user
    pub user_id: Uuid,

    /// Normalized email the account was registered with
    pub email: String,
}

impl Identity {
    /// Builds an identity from validated JWT claims
    pub fn from_claims(claims: &super::jwt::Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email.clone(),
        }
    }
}
