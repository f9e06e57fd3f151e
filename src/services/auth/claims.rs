use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded, verified token payload.
///
/// Kept as an open JSON object: Cognito adds custom attributes (`custom:*`),
/// group lists, etc. The typed accessors cover what the verifier needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn sub(&self) -> Option<&str> {
        self.get_str("sub")
    }

    /// `cognito:username` on id tokens, `username` on access tokens.
    pub fn username(&self) -> Option<&str> {
        self.get_str("cognito:username")
            .or_else(|| self.get_str("username"))
    }

    pub fn client_id(&self) -> Option<&str> {
        self.get_str("client_id")
    }

    // `aud` may be a string or an array of strings.
    pub fn has_audience(&self, audience: &str) -> bool {
        match self.0.get("aud") {
            Some(Value::String(s)) => s == audience,
            Some(Value::Array(items)) => items.iter().any(|v| v.as_str() == Some(audience)),
            _ => false,
        }
    }

    pub fn exp(&self) -> Option<i64> {
        self.0.get("exp").and_then(Value::as_i64)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp().and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Cognito `token_use` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenUse {
    Id,
    Access,
}

impl FromStr for TokenUse {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(Self::Id),
            "access" => Ok(Self::Access),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn claims(value: Value) -> Claims {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn username_prefers_cognito_claim() {
        let c = claims(json!({"cognito:username": "alice", "username": "other"}));
        assert_eq!(c.username(), Some("alice"));

        let c = claims(json!({"username": "bob"}));
        assert_eq!(c.username(), Some("bob"));
    }

    #[test]
    fn audience_accepts_string_or_array() {
        assert!(claims(json!({"aud": "client"})).has_audience("client"));
        assert!(claims(json!({"aud": ["x", "client"]})).has_audience("client"));
        assert!(!claims(json!({"aud": "other"})).has_audience("client"));
        assert!(!claims(json!({})).has_audience("client"));
    }

    #[test]
    fn expiry_converts_to_datetime() {
        let c = claims(json!({"exp": 1_700_000_000}));
        assert_eq!(c.exp(), Some(1_700_000_000));
        assert_eq!(c.expires_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn token_use_parses_known_values_only() {
        assert_eq!("id".parse::<TokenUse>(), Ok(TokenUse::Id));
        assert_eq!("access".parse::<TokenUse>(), Ok(TokenUse::Access));
        assert!("refresh".parse::<TokenUse>().is_err());
    }

    #[test]
    fn serializes_transparently() {
        let c = claims(json!({"sub": "abc"}));
        assert_eq!(serde_json::to_value(&c).unwrap(), json!({"sub": "abc"}));
        assert_eq!(c.to_value(), json!({"sub": "abc"}));
    }
}
