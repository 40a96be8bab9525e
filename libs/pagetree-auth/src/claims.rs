use serde::{Deserialize, Serialize};

/// JWT claims: a numeric user identifier and a unix-seconds expiry (§4.2).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub exp: i64,
}
