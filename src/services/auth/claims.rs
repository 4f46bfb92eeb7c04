use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AuthError;

/// Decoded and verified token claims.
///
/// Kept as the raw claim mapping so every claim the issuer sent (including custom
/// namespaced ones) reaches the protected handler untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// Permission strings granted by the token, or `None` when the claim is absent.
    ///
    /// A `null` claim counts as absent. A claim that is not an array grants nothing,
    /// and non-string elements are ignored.
    pub fn permissions(&self) -> Option<Vec<&str>> {
        match self.get("permissions")? {
            Value::Null => None,
            Value::Array(items) => Some(items.iter().filter_map(Value::as_str).collect()),
            _ => Some(Vec::new()),
        }
    }

    /// `permissions` must be present and contain `required` verbatim.
    pub fn check_permission(&self, required: &str) -> Result<(), AuthError> {
        let permissions = self.permissions().ok_or_else(AuthError::permissions_missing)?;

        if !permissions.contains(&required) {
            return Err(AuthError::permission_denied());
        }
        Ok(())
    }
}
