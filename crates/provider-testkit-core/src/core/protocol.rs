// crates/provider-testkit-core/src/core/protocol.rs
// ============================================================================
// Module: Invocation Protocol Model
// Description: Canonical enumerations and progress events for handler invocations.
// Purpose: Mirror the orchestrator's published protocol tables string-for-string.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The orchestrator publishes fixed enumerations for operation kinds,
//! operation statuses, and handler error codes, plus the progress-event shape
//! handlers must return or push. This module is the versioned constant table
//! for those enumerations: wire strings live in `as_str`/`parse` pairs backed
//! by `ALL` arrays, and a compatibility test compares them against the
//! authoritative protocol document checked into the repository.
//!
//! Invariants:
//! - Wire strings are stable; any drift from the orchestrator's tables is a
//!   conformance bug in this crate, not in the handler under test.
//! - [`ProgressEvent::from_document`] never coerces unknown statuses or error
//!   codes; it returns a [`ContractViolation`] instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Resource operation kind targeted by an invocation.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Create a new resource.
    Create,
    /// Read an existing resource.
    Read,
    /// Update an existing resource.
    Update,
    /// Delete an existing resource.
    Delete,
    /// List resources of the type.
    List,
}

impl Action {
    /// All actions in canonical order.
    pub const ALL: [Self; 5] = [Self::Create, Self::Read, Self::Update, Self::Delete, Self::List];

    /// Returns the canonical wire string for this action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::List => "LIST",
        }
    }

    /// Parses a canonical wire string into an action.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == value)
    }

    /// Returns true when the action is synchronous by contract.
    ///
    /// READ and LIST handlers must answer in a single invocation; an
    /// IN_PROGRESS event from them is a contract violation.
    #[must_use]
    pub const fn is_synchronous(self) -> bool {
        matches!(self, Self::Read | Self::List)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hook invocation point targeted by a hook invocation.
///
/// # Invariants
/// - Variants are stable for serialization and contract matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookInvocationPoint {
    /// Invoked before a resource is created.
    CreatePreProvision,
    /// Invoked before a resource is updated.
    UpdatePreProvision,
    /// Invoked before a resource is deleted.
    DeletePreProvision,
}

impl HookInvocationPoint {
    /// All invocation points in canonical order.
    pub const ALL: [Self; 3] =
        [Self::CreatePreProvision, Self::UpdatePreProvision, Self::DeletePreProvision];

    /// Returns the canonical wire string for this invocation point.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatePreProvision => "CREATE_PRE_PROVISION",
            Self::UpdatePreProvision => "UPDATE_PRE_PROVISION",
            Self::DeletePreProvision => "DELETE_PRE_PROVISION",
        }
    }

    /// Parses a canonical wire string into an invocation point.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|point| point.as_str() == value)
    }

    /// Returns true when the invocation point carries previous state.
    #[must_use]
    pub const fn is_update(self) -> bool {
        matches!(self, Self::UpdatePreProvision)
    }
}

impl fmt::Display for HookInvocationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Statuses
// ============================================================================

/// Operation status reported by resource handlers.
///
/// # Invariants
/// - Variants mirror the orchestrator's enumeration string-for-string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    /// Operation accepted but not started.
    Pending,
    /// Operation still running; the handler expects re-invocation.
    InProgress,
    /// Operation finished successfully.
    Success,
    /// Operation finished with a handler-reported failure.
    Failed,
}

impl OperationStatus {
    /// All statuses in canonical order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::InProgress, Self::Success, Self::Failed];

    /// Returns the canonical wire string for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }

    /// Parses a canonical wire string into a status.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    /// Returns true for SUCCESS and FAILED.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation status reported by hook handlers in the `hookStatus` field.
///
/// # Invariants
/// - Variants mirror the orchestrator's enumeration string-for-string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookStatus {
    /// Invocation accepted but not started.
    Pending,
    /// Invocation still running; the handler expects re-invocation.
    InProgress,
    /// Invocation finished successfully.
    Success,
    /// Invocation finished with a handler-reported failure.
    Failed,
}

impl HookStatus {
    /// All statuses in canonical order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::InProgress, Self::Success, Self::Failed];

    /// Returns the canonical wire string for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }

    /// Parses a canonical wire string into a status.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    /// Returns true for SUCCESS and FAILED.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

impl fmt::Display for HookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Error Codes
// ============================================================================

/// Canonical handler error code taxonomy.
///
/// # Invariants
/// - The set and wire spellings mirror the orchestrator's published table
///   exactly; additions or renames here must track the protocol document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerErrorCode {
    /// A create-only property was changed on update.
    NotUpdatable,
    /// The request payload failed handler-side validation.
    InvalidRequest,
    /// The caller is not authorized for the operation.
    AccessDenied,
    /// The supplied credentials are invalid or expired.
    InvalidCredentials,
    /// A resource with the requested identifier already exists.
    AlreadyExists,
    /// The requested resource does not exist.
    NotFound,
    /// The resource is in a conflicting state for the operation.
    ResourceConflict,
    /// The downstream service throttled the request.
    Throttling,
    /// A downstream service limit was exceeded.
    ServiceLimitExceeded,
    /// The resource did not stabilize within the handler's budget.
    NotStabilized,
    /// A downstream service reported a non-specific failure.
    GeneralServiceException,
    /// The downstream service reported an internal error.
    ServiceInternalError,
    /// A network failure prevented the operation.
    NetworkFailure,
    /// The handler itself failed unexpectedly.
    InternalFailure,
}

impl HandlerErrorCode {
    /// All error codes in canonical order.
    pub const ALL: [Self; 14] = [
        Self::NotUpdatable,
        Self::InvalidRequest,
        Self::AccessDenied,
        Self::InvalidCredentials,
        Self::AlreadyExists,
        Self::NotFound,
        Self::ResourceConflict,
        Self::Throttling,
        Self::ServiceLimitExceeded,
        Self::NotStabilized,
        Self::GeneralServiceException,
        Self::ServiceInternalError,
        Self::NetworkFailure,
        Self::InternalFailure,
    ];

    /// Returns the canonical wire string for this error code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotUpdatable => "NotUpdatable",
            Self::InvalidRequest => "InvalidRequest",
            Self::AccessDenied => "AccessDenied",
            Self::InvalidCredentials => "InvalidCredentials",
            Self::AlreadyExists => "AlreadyExists",
            Self::NotFound => "NotFound",
            Self::ResourceConflict => "ResourceConflict",
            Self::Throttling => "Throttling",
            Self::ServiceLimitExceeded => "ServiceLimitExceeded",
            Self::NotStabilized => "NotStabilized",
            Self::GeneralServiceException => "GeneralServiceException",
            Self::ServiceInternalError => "ServiceInternalError",
            Self::NetworkFailure => "NetworkFailure",
            Self::InternalFailure => "InternalFailure",
        }
    }

    /// Parses a canonical wire string into an error code.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_str() == value)
    }
}

impl fmt::Display for HandlerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Contract Violations
// ============================================================================

/// Structural or semantic defect in a handler's progress event.
///
/// # Invariants
/// - Variants are stable for programmatic handling; each names the violated
///   rule of the invocation protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// The event document is not an object or a field has the wrong type.
    #[error("malformed progress event: {0}")]
    MalformedEvent(String),
    /// The event carries no status field.
    #[error("progress event is missing the status field")]
    MissingStatus,
    /// The status string is not one of the canonical values.
    #[error("unknown operation status: {value}")]
    UnknownStatus {
        /// Status string as received.
        value: String,
    },
    /// The error-code string is not one of the canonical values.
    #[error("unknown handler error code: {value}")]
    UnknownErrorCode {
        /// Error-code string as received.
        value: String,
    },
    /// A FAILED event carried no error code.
    #[error("FAILED events must carry an error code")]
    MissingErrorCode,
    /// A FAILED event carried no message, or an empty one.
    #[error("FAILED events must carry a non-empty message")]
    MissingFailureMessage,
    /// An error code was present on a status that forbids one.
    #[error("{status} events must not carry an error code")]
    ErrorCodeOnStatus {
        /// Wire string of the offending status.
        status: &'static str,
    },
    /// A callback delay was present on a terminal event.
    #[error("{status} events must not carry a callback delay")]
    CallbackDelayOnTerminal {
        /// Wire string of the offending status.
        status: &'static str,
    },
    /// Resource models were present on a status that forbids them.
    #[error("{status} events must not include resource models")]
    ModelsOnStatus {
        /// Wire string of the offending status.
        status: &'static str,
    },
    /// A synchronous action returned IN_PROGRESS.
    #[error("{action} handlers must not return IN_PROGRESS")]
    InProgressNotAllowed {
        /// Action whose handler violated synchronicity.
        action: Action,
    },
    /// The callback listener recorded an unusable callback.
    #[error("invalid callback: {reason}")]
    InvalidCallback {
        /// Reason recorded by the listener.
        reason: String,
    },
}

// ============================================================================
// SECTION: Progress Events
// ============================================================================

/// Progress event returned or pushed by a resource handler.
///
/// # Invariants
/// - `status == Failed` implies `error_code` is present and `message` is
///   non-empty (enforced by [`ProgressEvent::ensure_terminal_invariants`]).
/// - `callback_context` is opaque; the engine echoes it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    /// Operation status reported by the handler.
    pub status: OperationStatus,
    /// Error code, required when status is FAILED.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_code: Option<HandlerErrorCode>,
    /// Human-readable progress or failure message.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    /// Current resource model, when the handler reports one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resource_model: Option<Value>,
    /// Listed resource models, only legal on successful LIST responses.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub resource_models: Option<Vec<Value>>,
    /// Pagination token for LIST responses.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next_token: Option<String>,
    /// Opaque resumption state echoed back on the next invocation.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub callback_context: Option<Value>,
    /// Seconds the handler asks the caller to wait before re-invoking.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub callback_delay_seconds: Option<u64>,
}

impl ProgressEvent {
    /// Interprets a JSON document as a progress event, strictly.
    ///
    /// Unknown status or error-code strings are hard violations; the caller
    /// must not coerce or default them.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation`] when the document is not event-shaped or
    /// carries values outside the canonical tables.
    pub fn from_document(doc: &Value) -> Result<Self, ContractViolation> {
        let map = as_event_object(doc)?;
        let status = parse_status_field(map, "status", OperationStatus::parse)?;
        Ok(Self {
            status,
            error_code: parse_error_code_field(map)?,
            message: optional_string_field(map, "message")?,
            resource_model: map.get("resourceModel").filter(|v| !v.is_null()).cloned(),
            resource_models: optional_array_field(map, "resourceModels")?,
            next_token: optional_string_field(map, "nextToken")?,
            callback_context: map.get("callbackContext").filter(|v| !v.is_null()).cloned(),
            callback_delay_seconds: optional_delay_field(map)?,
        })
    }

    /// Validates the invariants an IN_PROGRESS event must uphold.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation`] when the event carries an error code or
    /// resource models.
    pub fn ensure_in_progress_invariants(&self) -> Result<(), ContractViolation> {
        if self.error_code.is_some() {
            return Err(ContractViolation::ErrorCodeOnStatus {
                status: OperationStatus::InProgress.as_str(),
            });
        }
        if self.resource_models.is_some() {
            return Err(ContractViolation::ModelsOnStatus {
                status: OperationStatus::InProgress.as_str(),
            });
        }
        Ok(())
    }

    /// Validates the invariants a terminal event must uphold.
    ///
    /// SUCCESS events must not carry an error code or callback delay; FAILED
    /// events must carry an error code and a non-empty message and must not
    /// carry a delay or resource models.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation`] naming the first violated rule.
    pub fn ensure_terminal_invariants(&self) -> Result<(), ContractViolation> {
        match self.status {
            OperationStatus::Success => {
                if self.error_code.is_some() {
                    return Err(ContractViolation::ErrorCodeOnStatus {
                        status: OperationStatus::Success.as_str(),
                    });
                }
                ensure_no_delay(self.callback_delay_seconds, OperationStatus::Success.as_str())
            }
            OperationStatus::Failed => {
                if self.error_code.is_none() {
                    return Err(ContractViolation::MissingErrorCode);
                }
                if self.message.as_deref().is_none_or(|msg| msg.trim().is_empty()) {
                    return Err(ContractViolation::MissingFailureMessage);
                }
                if self.resource_models.is_some() {
                    return Err(ContractViolation::ModelsOnStatus {
                        status: OperationStatus::Failed.as_str(),
                    });
                }
                ensure_no_delay(self.callback_delay_seconds, OperationStatus::Failed.as_str())
            }
            OperationStatus::Pending | OperationStatus::InProgress => Ok(()),
        }
    }
}

/// Progress event returned or pushed by a hook handler.
///
/// # Invariants
/// - `hook_status == Failed` implies `error_code` is present and `message`
///   is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookProgressEvent {
    /// Hook status reported by the handler.
    pub hook_status: HookStatus,
    /// Error code, required when the status is FAILED.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_code: Option<HandlerErrorCode>,
    /// Human-readable progress or failure message.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    /// Opaque resumption state echoed back on the next invocation.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub callback_context: Option<Value>,
    /// Seconds the handler asks the caller to wait before re-invoking.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub callback_delay_seconds: Option<u64>,
}

impl HookProgressEvent {
    /// Interprets a JSON document as a hook progress event, strictly.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation`] when the document is not event-shaped or
    /// carries values outside the canonical tables.
    pub fn from_document(doc: &Value) -> Result<Self, ContractViolation> {
        let map = as_event_object(doc)?;
        let hook_status = parse_status_field(map, "hookStatus", HookStatus::parse)?;
        Ok(Self {
            hook_status,
            error_code: parse_error_code_field(map)?,
            message: optional_string_field(map, "message")?,
            callback_context: map.get("callbackContext").filter(|v| !v.is_null()).cloned(),
            callback_delay_seconds: optional_delay_field(map)?,
        })
    }

    /// Validates the invariants an IN_PROGRESS hook event must uphold.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation`] when the event carries an error code.
    pub fn ensure_in_progress_invariants(&self) -> Result<(), ContractViolation> {
        if self.error_code.is_some() {
            return Err(ContractViolation::ErrorCodeOnStatus {
                status: HookStatus::InProgress.as_str(),
            });
        }
        Ok(())
    }

    /// Validates the invariants a terminal hook event must uphold.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation`] naming the first violated rule.
    pub fn ensure_terminal_invariants(&self) -> Result<(), ContractViolation> {
        match self.hook_status {
            HookStatus::Success => {
                if self.error_code.is_some() {
                    return Err(ContractViolation::ErrorCodeOnStatus {
                        status: HookStatus::Success.as_str(),
                    });
                }
                ensure_no_delay(self.callback_delay_seconds, HookStatus::Success.as_str())
            }
            HookStatus::Failed => {
                if self.error_code.is_none() {
                    return Err(ContractViolation::MissingErrorCode);
                }
                if self.message.as_deref().is_none_or(|msg| msg.trim().is_empty()) {
                    return Err(ContractViolation::MissingFailureMessage);
                }
                ensure_no_delay(self.callback_delay_seconds, HookStatus::Failed.as_str())
            }
            HookStatus::Pending | HookStatus::InProgress => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Field Helpers
// ============================================================================

/// Requires the event document to be a JSON object.
fn as_event_object(doc: &Value) -> Result<&Map<String, Value>, ContractViolation> {
    doc.as_object().ok_or_else(|| {
        ContractViolation::MalformedEvent("progress event must be a JSON object".to_string())
    })
}

/// Parses a status field through the given canonical-table parser.
fn parse_status_field<S>(
    map: &Map<String, Value>,
    field: &str,
    parse: impl Fn(&str) -> Option<S>,
) -> Result<S, ContractViolation> {
    let raw = map.get(field).ok_or(ContractViolation::MissingStatus)?;
    let text = raw.as_str().ok_or_else(|| {
        ContractViolation::MalformedEvent(format!("{field} must be a string"))
    })?;
    parse(text).ok_or_else(|| ContractViolation::UnknownStatus {
        value: text.to_string(),
    })
}

/// Parses the optional `errorCode` field against the canonical table.
fn parse_error_code_field(
    map: &Map<String, Value>,
) -> Result<Option<HandlerErrorCode>, ContractViolation> {
    let Some(raw) = map.get("errorCode").filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let text = raw.as_str().ok_or_else(|| {
        ContractViolation::MalformedEvent("errorCode must be a string".to_string())
    })?;
    HandlerErrorCode::parse(text).map(Some).ok_or_else(|| ContractViolation::UnknownErrorCode {
        value: text.to_string(),
    })
}

/// Reads an optional string field, rejecting non-string values.
fn optional_string_field(
    map: &Map<String, Value>,
    field: &str,
) -> Result<Option<String>, ContractViolation> {
    match map.get(field).filter(|v| !v.is_null()) {
        None => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => {
            Err(ContractViolation::MalformedEvent(format!("{field} must be a string")))
        }
    }
}

/// Reads an optional array field, rejecting non-array values.
fn optional_array_field(
    map: &Map<String, Value>,
    field: &str,
) -> Result<Option<Vec<Value>>, ContractViolation> {
    match map.get(field).filter(|v| !v.is_null()) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items.clone())),
        Some(_) => {
            Err(ContractViolation::MalformedEvent(format!("{field} must be an array")))
        }
    }
}

/// Reads the optional `callbackDelaySeconds` field as a non-negative integer.
fn optional_delay_field(map: &Map<String, Value>) -> Result<Option<u64>, ContractViolation> {
    match map.get("callbackDelaySeconds").filter(|v| !v.is_null()) {
        None => Ok(None),
        Some(value) => value.as_u64().map(Some).ok_or_else(|| {
            ContractViolation::MalformedEvent(
                "callbackDelaySeconds must be a non-negative integer".to_string(),
            )
        }),
    }
}

/// Rejects a callback delay greater than zero on a terminal status.
fn ensure_no_delay(delay: Option<u64>, status: &'static str) -> Result<(), ContractViolation> {
    if delay.unwrap_or(0) > 0 {
        return Err(ContractViolation::CallbackDelayOnTerminal {
            status,
        });
    }
    Ok(())
}
