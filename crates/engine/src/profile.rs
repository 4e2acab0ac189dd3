use serde::{Deserialize, Serialize};

/// Shopkeeper profile persisted under [`crate::PROFILE_KEY`].
///
/// Display data only; credential handling is deliberately out of scope.
/// Wire keys are camelCase to match the persisted format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub join_date: String,
}

impl Profile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_keys_are_camel_case() {
        let profile = Profile {
            first_name: "Jamil".to_string(),
            last_name: "Ahmed".to_string(),
            ..Profile::default()
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["firstName"], "Jamil");
        assert_eq!(json["joinDate"], "");
        assert_eq!(profile.display_name(), "Jamil Ahmed");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let profile: Profile = serde_json::from_str(r#"{"firstName":"Jamil"}"#).unwrap();
        assert_eq!(profile.first_name, "Jamil");
        assert_eq!(profile.email, "");
    }
}
