use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}
