//! Status objects returned by mutating calls.
use serde::{Deserialize, Serialize};

// The server omits zero-valued numeric fields; mirror that on encode.
fn is_default<T: Default + PartialEq>(v: &T) -> bool {
    *v == T::default()
}

/// The structured result a server returns for operations without a body,
/// most commonly delete.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Status {
    /// Whether the operation succeeded, when the server says so
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusSummary>,

    /// Suggested HTTP return code (0 if unset)
    #[serde(default, skip_serializing_if = "is_default")]
    pub code: u16,

    /// Human-readable description of the outcome
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// Machine-readable reason for a `Failure` status
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    /// Extended, reason-specific data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<StatusDetails>,
}

impl Status {
    /// Whether this `Status` reports success
    ///
    /// Can be false together with [`StatusSummary::Failure`] being absent
    /// when the server left the summary unset.
    pub fn is_success(&self) -> bool {
        self.status == Some(StatusSummary::Success)
    }
}

/// The summary value of a [`Status`]
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum StatusSummary {
    /// Operation succeeded
    Success,
    /// Operation failed
    Failure,
}

/// Reason-specific data attached to a [`Status`]
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatusDetails {
    /// Name of the resource the status describes, when there is a single one
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// API group of that resource
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,

    /// Kind of that resource
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    /// UID of that resource, when one can be identified
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uid: String,

    /// Individual causes contributing to a failure
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<StatusCause>,

    /// Seconds to wait before the operation should be retried, if set
    #[serde(default, skip_serializing_if = "is_default")]
    pub retry_after_seconds: u32,
}

/// One cause entry under [`StatusDetails`]
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct StatusCause {
    /// Machine-readable cause of the error
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,

    /// Human-readable cause of the error
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    /// JSON path of the field that caused the error, when field-specific
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub field: String,
}

#[cfg(test)]
mod test {
    use super::Status;

    // ensure our status schema matches what servers send back for deletes
    #[test]
    fn delete_deserialize_test() {
        let statusresp = r#"{"kind":"Status","apiVersion":"v1","metadata":{},"status":"Success","details":{"name":"some-obj","group":"gtest","kind":"rtest","uid":"1234-some-uid"}}"#;
        let s: Status = serde_json::from_str::<Status>(statusresp).unwrap();
        assert!(s.is_success());
        assert_eq!(s.details.unwrap().name, "some-obj");

        let statusnoname = r#"{"kind":"Status","apiVersion":"v1","metadata":{},"status":"Success","details":{"group":"gtest","kind":"rtest","uid":"1234-some-uid"}}"#;
        let s2: Status = serde_json::from_str::<Status>(statusnoname).unwrap();
        assert_eq!(s2.details.unwrap().name, "");
    }
}
