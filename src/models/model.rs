//! Base model

use serde::Serialize;
use serde_json::Value;

use super::exceptions::XRPLModelException;

pub trait Model: Serialize {
    /// Returns the json representation of a model as a string.
    fn to_json(&self) -> String {
        serde_json::to_string(&self.to_json_value()).expect("Unable to serialize to json string.")
    }

    /// Returns the json representation of a model as a
    /// `serde_json::Value`.
    fn to_json_value(&self) -> Value {
        serde_json::to_value(self).expect("Unable to serialize to json value.")
    }

    /// Extended in structures to define custom validation logic.
    fn get_errors(&self) -> Result<(), XRPLModelException> {
        Ok(())
    }

    /// Errors if the object is invalid.
    fn validate(&self) -> Result<(), XRPLModelException> {
        self.get_errors()
    }

    /// Returns whether the structure is valid.
    fn is_valid(&self) -> bool {
        self.get_errors().is_ok()
    }
}
