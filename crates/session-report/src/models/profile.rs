//! Account profile as exposed by `/auth/profile`

use serde::{Deserialize, Serialize};

/// Role that carries body measurements
pub const CYCLIST_ROLE: &str = "cyclist";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,

    #[serde(default)]
    pub role: Option<String>,

    /// Height in centimeters (cyclists only)
    #[serde(default)]
    pub height_cm: Option<f64>,

    /// Weight in kilograms (cyclists only)
    #[serde(default)]
    pub weight_kg: Option<f64>,
}

impl Profile {
    pub fn is_cyclist(&self) -> bool {
        self.role.as_deref() == Some(CYCLIST_ROLE)
    }
}

/// Body of `PUT /auth/profile`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub username: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
}

impl ProfileUpdate {
    /// Build an update for `current`, applying the given overrides.
    ///
    /// Measurements are only sent for cyclists; the backend rejects them for
    /// other roles.
    pub fn for_profile(
        current: &Profile,
        username: Option<String>,
        height_cm: Option<f64>,
        weight_kg: Option<f64>,
    ) -> Self {
        let username = username.unwrap_or_else(|| current.username.clone());
        if !current.is_cyclist() {
            return Self {
                username,
                height_cm: None,
                weight_kg: None,
            };
        }

        Self {
            username,
            height_cm: height_cm.or(current.height_cm),
            weight_kg: weight_kg.or(current.weight_kg),
        }
    }
}
