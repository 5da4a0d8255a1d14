// crates/provider-testkit-generator/src/pointer.rs
// ============================================================================
// Module: Property Pointers
// Description: Decoding for the schema's JSON-pointer property paths.
// Purpose: Turn extension-keyword pointers like /properties/Id into path segments.
// Dependencies: crate::error
// ============================================================================

//! ## Overview
//! The schema's extension keywords (`primaryIdentifier`,
//! `readOnlyProperties`, `createOnlyProperties`, `writeOnlyProperties`) name
//! properties as JSON pointers rooted at the schema document. Decoding
//! splits them into segments and unescapes the `~0`/`~1` sequences.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::error::GeneratorError;

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Decodes a JSON pointer into path segments.
///
/// # Errors
///
/// Returns [`GeneratorError::InvalidPointer`] when the pointer is empty,
/// lacks the leading slash, or contains an empty segment.
pub fn decode_pointer(pointer: &str) -> Result<Vec<String>, GeneratorError> {
    let Some(body) = pointer.strip_prefix('/') else {
        return Err(GeneratorError::InvalidPointer {
            pointer: pointer.to_string(),
            reason: "pointer must start with '/'".to_string(),
        });
    };
    if body.is_empty() {
        return Err(GeneratorError::InvalidPointer {
            pointer: pointer.to_string(),
            reason: "pointer names no property".to_string(),
        });
    }
    let mut segments = Vec::new();
    for raw in body.split('/') {
        if raw.is_empty() {
            return Err(GeneratorError::InvalidPointer {
                pointer: pointer.to_string(),
                reason: "pointer contains an empty segment".to_string(),
            });
        }
        segments.push(unescape(raw));
    }
    Ok(segments)
}

/// Unescapes `~1` to `/` and `~0` to `~`, in pointer order.
fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
