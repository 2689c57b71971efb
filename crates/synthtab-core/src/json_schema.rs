use schemars::schema::RootSchema;
use schemars::schema_for;
use serde_json::Value;

use crate::error::Result;
use crate::session::SessionConfig;

/// Emit the JSON Schema for session configuration documents.
pub fn session_json_schema() -> RootSchema {
    schema_for!(SessionConfig)
}

/// Session JSON Schema as a JSON value, ready for compilation.
pub fn session_json_schema_value() -> Result<Value> {
    Ok(serde_json::to_value(session_json_schema())?)
}
