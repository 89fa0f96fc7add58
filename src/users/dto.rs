use serde::{de, Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};

/// Request body for create and full update.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    #[serde(default = "default_active")]
    #[schema(default = true)]
    pub is_active: bool,
    #[serde(default)]
    #[schema(default = false)]
    pub is_premium: bool,
}
fn default_active() -> bool {
    true
}

#[cfg(test)]
impl UserCreate {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            is_active: true,
            is_premium: false,
        }
    }
}

/// Query string of `GET /users/filter/`. Absent flags match everything.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    #[serde(default, deserialize_with = "loose_bool")]
    pub is_premium: Option<bool>,
    #[serde(default, deserialize_with = "loose_bool")]
    pub is_active: Option<bool>,
}

/// Query-string booleans as HTTP clients actually send them: `true`/`True`,
/// `1`/`0`, `yes`/`no`, `on`/`off`, `t`/`f`, `y`/`n`. Case-insensitive.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn loose_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    raw.map(|v| {
        parse_flag(&v).ok_or_else(|| de::Error::custom(format!("`{}` is not a valid boolean", v)))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_flags_take_defaults() {
        let body: UserCreate =
            serde_json::from_str(r#"{"name":"Ana","email":"ana@x.com"}"#).unwrap();
        assert!(body.is_active);
        assert!(!body.is_premium);
    }

    #[test]
    fn explicit_flags_win() {
        let body: UserCreate = serde_json::from_str(
            r#"{"name":"Ana","email":"ana@x.com","is_active":false,"is_premium":true}"#,
        )
        .unwrap();
        assert!(!body.is_active);
        assert!(body.is_premium);
    }

    #[test]
    fn flags_accept_common_spellings() {
        for (raw, want) in [
            ("true", true),
            ("True", true),
            ("1", true),
            ("YES", true),
            ("on", true),
            ("false", false),
            ("False", false),
            ("0", false),
            ("no", false),
            ("Off", false),
        ] {
            assert_eq!(parse_flag(raw), Some(want), "{raw}");
        }
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn filter_decodes_from_query_values() {
        let by: UserFilter = serde_json::from_str(r#"{"is_premium":"True","is_active":"0"}"#).unwrap();
        assert_eq!(by.is_premium, Some(true));
        assert_eq!(by.is_active, Some(false));

        let empty: UserFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.is_premium, None);
        assert_eq!(empty.is_active, None);

        assert!(serde_json::from_str::<UserFilter>(r#"{"is_active":"maybe"}"#).is_err());
    }

    #[test]
    fn name_and_email_are_required() {
        assert!(serde_json::from_str::<UserCreate>(r#"{"email":"ana@x.com"}"#).is_err());
        assert!(serde_json::from_str::<UserCreate>(r#"{"name":"Ana"}"#).is_err());
    }
}
