use agenda_domain::{DateTime, User, Utc, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserDTO {
    pub id: ID,
    pub username: String,
    pub email: Option<String>,
    pub created: DateTime<Utc>,
}

impl UserDTO {
    pub fn new(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created: user.created,
        }
    }
}
