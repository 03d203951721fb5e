use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// Access token issued by the remote auth issuer.
// Fields the issuer adds beyond the OAuth basics are kept verbatim in `extra`,
// so the cached copy is exactly what the issuer returned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    // Kept as sent: issuers disagree on number vs string and some omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Widget colours derived from a two-entry `colors` array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub main_color: String,
    pub text_color: String,
}

impl Theme {
    /// Positional mapping: index 0 is the main colour, index 1 the text colour.
    /// Any length other than two yields no theme.
    pub fn from_colors(colors: &[String]) -> Option<Self> {
        match colors {
            [main, text] => Some(Self {
                main_color: main.clone(),
                text_color: text.clone(),
            }),
            _ => None,
        }
    }
}

// Reduced site projection persisted locally for the embed widget.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSite {
    pub website_id: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

// Entry returned by the site listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSummary {
    pub website_id: String,
    pub name: String,
    pub url: String,
}

// Flattened result of a successful site creation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedSite {
    pub website_id: String,
    pub website_name: String,
    pub website_url: String,
    pub widget_position: Option<String>,
    pub is_open: Option<bool>,
    pub comment_status: Option<Value>,
    pub language_id: Option<String>,
    pub colors: Vec<String>,
}

// The remote side has been seen sending `isOpen` as "true"/"false" strings.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_bool(deserializer)?.unwrap_or(false))
}

pub(crate) fn lenient_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flag::Bool(value)) => Ok(Some(value)),
        Some(Flag::Text(text)) => match text.as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" | "" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "expected boolean flag, got {other:?}"
            ))),
        },
    }
}
