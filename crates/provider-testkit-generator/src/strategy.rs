// crates/provider-testkit-generator/src/strategy.rs
// ============================================================================
// Module: Schema Strategies
// Description: Recursive schema walk into property-testing value strategies.
// Purpose: Turn schema fragments into strategies that draw schema-valid values.
// Dependencies: crate::error, proptest, serde_json
// ============================================================================

//! ## Overview
//! Each schema fragment maps to one strategy: `const`/`enum` to literal
//! choices, numeric types to bounded ranges, strings to regex-driven
//! generation honoring `pattern` and length bounds, arrays to sized element
//! collections, and objects to a fold over their declared properties.
//! Combiners (`allOf`, `oneOf`, `anyOf`) merge or union the branch
//! strategies. Pattern anchors are stripped before generation; `pattern`
//! itself is validated unanchored downstream, so stripped values still
//! validate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use proptest::bool::ANY;
use proptest::collection::vec as vec_strategy;
use proptest::strategy::BoxedStrategy;
use proptest::strategy::Just;
use proptest::strategy::Strategy;
use proptest::strategy::Union;
use proptest::string::string_regex;
use serde_json::Map;
use serde_json::Value;

use crate::error::GeneratorError;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Builds a value strategy for a schema fragment.
pub(crate) fn schema_strategy(schema: &Value) -> Result<BoxedStrategy<Value>, GeneratorError> {
    let Some(map) = schema.as_object() else {
        return Err(GeneratorError::InvalidSchema(
            "schema fragment must be a JSON object".to_string(),
        ));
    };
    if map.contains_key("allOf") {
        return all_of_strategy(map);
    }
    if let Some(branches) = map.get("oneOf") {
        return combiner_strategy(map, branches, "oneOf");
    }
    if let Some(branches) = map.get("anyOf") {
        return combiner_strategy(map, branches, "anyOf");
    }
    primitive_strategy(map)
}

// ============================================================================
// SECTION: Combiners
// ============================================================================

/// Merges every `allOf` branch into the base fragment and recurses.
fn all_of_strategy(map: &Map<String, Value>) -> Result<BoxedStrategy<Value>, GeneratorError> {
    let branches = map
        .get("allOf")
        .and_then(Value::as_array)
        .ok_or_else(|| GeneratorError::InvalidSchema("allOf must be an array".to_string()))?;
    let mut merged = map.clone();
    merged.remove("allOf");
    for branch in branches {
        merged = merge_fragment(&merged, branch)?;
    }
    schema_strategy(&Value::Object(merged))
}

/// Unions the branch strategies of `oneOf`/`anyOf`.
fn combiner_strategy(
    map: &Map<String, Value>,
    branches: &Value,
    combiner: &str,
) -> Result<BoxedStrategy<Value>, GeneratorError> {
    let branches = branches.as_array().ok_or_else(|| {
        GeneratorError::InvalidSchema(format!("{combiner} must be an array"))
    })?;
    if branches.is_empty() {
        return Err(GeneratorError::InvalidSchema(format!("{combiner} must not be empty")));
    }
    let mut base = map.clone();
    base.remove(combiner);
    let mut strategies = Vec::with_capacity(branches.len());
    for branch in branches {
        let merged = merge_fragment(&base, branch)?;
        strategies.push(schema_strategy(&Value::Object(merged))?);
    }
    Ok(Union::new(strategies).boxed())
}

/// Merges an overlay fragment into a base fragment.
///
/// `properties` maps merge key-wise and `required` arrays union; every other
/// keyword is replaced by the overlay.
fn merge_fragment(
    base: &Map<String, Value>,
    overlay: &Value,
) -> Result<Map<String, Value>, GeneratorError> {
    let overlay = overlay.as_object().ok_or_else(|| {
        GeneratorError::InvalidSchema("combiner branches must be objects".to_string())
    })?;
    let mut merged = base.clone();
    for (key, value) in overlay {
        match key.as_str() {
            "properties" => {
                if let (Some(Value::Object(existing)), Some(extra)) =
                    (merged.get_mut("properties"), value.as_object())
                {
                    for (name, subschema) in extra {
                        existing.insert(name.clone(), subschema.clone());
                    }
                    continue;
                }
                merged.insert(key.clone(), value.clone());
            }
            "required" => {
                if let (Some(Value::Array(existing)), Some(extra)) =
                    (merged.get_mut("required"), value.as_array())
                {
                    for name in extra {
                        if !existing.contains(name) {
                            existing.push(name.clone());
                        }
                    }
                    continue;
                }
                merged.insert(key.clone(), value.clone());
            }
            _ => {
                merged.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(merged)
}

// ============================================================================
// SECTION: Primitives
// ============================================================================

/// Builds a strategy for a non-combined schema fragment.
fn primitive_strategy(map: &Map<String, Value>) -> Result<BoxedStrategy<Value>, GeneratorError> {
    if let Some(value) = map.get("const") {
        return Ok(Just(value.clone()).boxed());
    }
    if let Some(options) = map.get("enum") {
        return enum_strategy(options);
    }
    match json_type(map) {
        "integer" => integer_strategy(map),
        "number" => number_strategy(map),
        "boolean" => Ok(ANY.prop_map(Value::Bool).boxed()),
        "string" => string_strategy(map),
        "array" => array_strategy(map),
        "null" => Ok(Just(Value::Null).boxed()),
        "object" => object_strategy(map),
        other => Err(GeneratorError::Unsupported(format!("unknown schema type '{other}'"))),
    }
}

/// Resolves the fragment's type keyword, defaulting to object.
fn json_type(map: &Map<String, Value>) -> &str {
    match map.get("type") {
        Some(Value::String(name)) => name.as_str(),
        Some(Value::Array(names)) => {
            names.first().and_then(Value::as_str).unwrap_or("object")
        }
        _ => "object",
    }
}

/// Chooses uniformly among the enumerated literals.
fn enum_strategy(options: &Value) -> Result<BoxedStrategy<Value>, GeneratorError> {
    let options = options
        .as_array()
        .ok_or_else(|| GeneratorError::InvalidSchema("enum must be an array".to_string()))?;
    if options.is_empty() {
        return Err(GeneratorError::InvalidSchema("enum must not be empty".to_string()));
    }
    let strategies: Vec<BoxedStrategy<Value>> =
        options.iter().map(|option| Just(option.clone()).boxed()).collect();
    Ok(Union::new(strategies).boxed())
}

/// Draws integers within the fragment's bounds.
fn integer_strategy(map: &Map<String, Value>) -> Result<BoxedStrategy<Value>, GeneratorError> {
    let explicit_min = map.get("minimum").and_then(Value::as_i64);
    let explicit_max = map.get("maximum").and_then(Value::as_i64);
    let exclusive_min = map.get("exclusiveMinimum").and_then(Value::as_i64);
    let mut min = explicit_min
        .unwrap_or_else(|| explicit_max.map_or(0, |max| max.saturating_sub(100_000)));
    if let Some(exclusive) = exclusive_min {
        min = min.max(exclusive.saturating_add(1));
    }
    let max = explicit_max.unwrap_or_else(|| min.saturating_add(100_000));
    if min > max {
        return Err(GeneratorError::InvalidSchema(format!(
            "integer bounds are empty: minimum {min} > maximum {max}"
        )));
    }
    Ok((min..=max).prop_map(|n| Value::Number(n.into())).boxed())
}

/// Draws numbers within the fragment's bounds.
fn number_strategy(map: &Map<String, Value>) -> Result<BoxedStrategy<Value>, GeneratorError> {
    let explicit_min = map.get("minimum").and_then(Value::as_f64);
    let explicit_max = map.get("maximum").and_then(Value::as_f64);
    let min = explicit_min.unwrap_or_else(|| explicit_max.map_or(0.0, |max| max - 1_000_000.0));
    let max = explicit_max.unwrap_or(min + 1_000_000.0);
    if min > max {
        return Err(GeneratorError::InvalidSchema(format!(
            "number bounds are empty: minimum {min} > maximum {max}"
        )));
    }
    Ok((min..=max).prop_map(Value::from).boxed())
}

/// Draws strings honoring `pattern` or length bounds.
fn string_strategy(map: &Map<String, Value>) -> Result<BoxedStrategy<Value>, GeneratorError> {
    if let Some(pattern) = map.get("pattern").and_then(Value::as_str) {
        let generable = pattern.trim_start_matches('^').trim_end_matches('$');
        let strategy = string_regex(generable).map_err(|err| {
            GeneratorError::Unsupported(format!("unsupported pattern '{pattern}': {err}"))
        })?;
        return Ok(strategy.prop_map(Value::String).boxed());
    }
    let explicit_max = map.get("maxLength").and_then(Value::as_u64);
    if explicit_max == Some(0) {
        return Ok(Just(Value::String(String::new())).boxed());
    }
    let min_len = map.get("minLength").and_then(Value::as_u64).unwrap_or(1).max(1);
    let max_len = explicit_max.unwrap_or(min_len + 16).max(min_len);
    let strategy = string_regex(&format!("[a-z0-9]{{{min_len},{max_len}}}")).map_err(|err| {
        GeneratorError::Synthesis(format!("string strategy failed: {err}"))
    })?;
    Ok(strategy.prop_map(Value::String).boxed())
}

/// Draws arrays honoring item schemas and size bounds.
fn array_strategy(map: &Map<String, Value>) -> Result<BoxedStrategy<Value>, GeneratorError> {
    let min_items = map
        .get("minItems")
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    let max_items = map
        .get("maxItems")
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(min_items + 2)
        .max(min_items)
        .min(min_items + 4);
    match map.get("items").or_else(|| map.get("contains")) {
        None => Ok(Just(Value::Array(Vec::new())).boxed()),
        Some(Value::Array(item_schemas)) => {
            let mut strategy: BoxedStrategy<Vec<Value>> = Just(Vec::new()).boxed();
            for item_schema in item_schemas {
                let item = schema_strategy(item_schema)?;
                strategy = (strategy, item)
                    .prop_map(|(mut items, value)| {
                        items.push(value);
                        items
                    })
                    .boxed();
            }
            Ok(strategy.prop_map(Value::Array).boxed())
        }
        Some(item_schema) => {
            let item = schema_strategy(item_schema)?;
            Ok(vec_strategy(item, min_items..=max_items).prop_map(Value::Array).boxed())
        }
    }
}

/// Draws objects by folding over their declared properties.
fn object_strategy(map: &Map<String, Value>) -> Result<BoxedStrategy<Value>, GeneratorError> {
    let Some(properties) = map.get("properties").and_then(Value::as_object) else {
        return Ok(Just(Value::Object(Map::new())).boxed());
    };
    let mut strategy: BoxedStrategy<Map<String, Value>> = Just(Map::new()).boxed();
    for (name, subschema) in properties {
        let value_strategy = schema_strategy(subschema)?;
        let key = name.clone();
        strategy = (strategy, value_strategy)
            .prop_map(move |(mut object, value)| {
                object.insert(key.clone(), value);
                object
            })
            .boxed();
    }
    Ok(strategy.prop_map(Value::Object).boxed())
}
