use serde::{Deserialize, Serialize};

/// Resolved identity of the requester.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accountability {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub user: Option<String>,
}

impl Accountability {
    pub fn admin() -> Self {
        Self {
            role: None,
            admin: true,
            user: None,
        }
    }

    pub fn role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            admin: false,
            user: None,
        }
    }

    /// Public requests carry no role at all.
    pub fn public() -> Self {
        Self::default()
    }
}
