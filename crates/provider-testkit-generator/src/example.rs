// crates/provider-testkit-generator/src/example.rs
// ============================================================================
// Module: Example Generator
// Description: Seeded example synthesis for create, update, and invalid models.
// Purpose: Draw schema-valid request models deterministically per seed.
// Dependencies: crate::error, crate::schema, crate::strategy, jsonschema,
// proptest, rand, serde_json
// ============================================================================

//! ## Overview
//! An [`ExampleGenerator`] owns one schema digest and one seed. Every example
//! kind draws from a pruned view of the schema with its own salt, through a
//! deterministic runner: the same schema and seed always reproduce the same
//! examples, while the seed itself comes from the operating-system RNG so
//! identifiers are distinct per run. Each drawn example is validated against
//! the schema it was drawn from before being returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use proptest::strategy::Strategy;
use proptest::strategy::ValueTree;
use proptest::test_runner::Config;
use proptest::test_runner::RngAlgorithm;
use proptest::test_runner::TestRng;
use proptest::test_runner::TestRunner;
use rand::RngCore;
use rand::rngs::OsRng;
use serde_json::Value;

use crate::error::GeneratorError;
use crate::schema::ResourceSchema;
use crate::strategy::schema_strategy;

// ============================================================================
// SECTION: Salts
// ============================================================================

/// Salt for create examples.
const CREATE_SALT: u64 = 1;
/// Salt for update examples.
const UPDATE_SALT: u64 = 2;
/// Salt for deliberately invalid examples.
const INVALID_SALT: u64 = 3;

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Seeded, deterministic example generator for one resource schema.
///
/// # Invariants
/// - Same schema + same seed => byte-identical examples.
/// - Every returned example validates against the schema it was drawn from.
pub struct ExampleGenerator {
    /// Digested resource schema.
    schema: ResourceSchema,
    /// Per-instance seed; fresh from the OS RNG unless pinned.
    seed: u64,
}

impl ExampleGenerator {
    /// Creates a generator with a fresh per-run seed.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError`] when the schema cannot be digested.
    pub fn new(schema: Value) -> Result<Self, GeneratorError> {
        let mut bytes = [0u8; 8];
        OsRng.fill_bytes(&mut bytes);
        Self::with_seed(schema, u64::from_be_bytes(bytes))
    }

    /// Creates a generator with a pinned seed for reproducing a run.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError`] when the schema cannot be digested.
    pub fn with_seed(schema: Value, seed: u64) -> Result<Self, GeneratorError> {
        Ok(Self {
            schema: ResourceSchema::parse(schema)?,
            seed,
        })
    }

    /// Returns the seed in use.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the digested schema.
    #[must_use]
    pub const fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    /// Draws a valid create model.
    ///
    /// Read-only properties are omitted; everything declared writable is
    /// populated so the model's shape is stable across runs.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError`] when synthesis or validation fails.
    pub fn create_example(&self) -> Result<Value, GeneratorError> {
        self.draw(&self.schema.create_schema(), CREATE_SALT)
    }

    /// Draws an update model mutating only writable properties.
    ///
    /// Create-only and identifier values are preserved from the create
    /// model so the create/update chain stays internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError`] when synthesis or validation fails.
    pub fn update_example(&self, create_model: &Value) -> Result<Value, GeneratorError> {
        let drawn = self.draw(&self.schema.update_schema(), UPDATE_SALT)?;
        let mut merged = create_model.clone();
        if let (Some(target), Some(updates)) = (merged.as_object_mut(), drawn.as_object()) {
            for (key, value) in updates {
                target.insert(key.clone(), value.clone());
            }
        }
        for path in self.schema.primary_identifier() {
            if let Some(value) = ResourceSchema::model_value(create_model, path) {
                ResourceSchema::set_model_value(&mut merged, path, value.clone());
            }
        }
        Ok(merged)
    }

    /// Draws a well-formed model with a never-created primary identifier.
    ///
    /// The model is schema-valid (including read-only properties, so an
    /// identifier exists even when it is handler-assigned) but drawn under a
    /// distinct salt, so its identifier values cannot collide with the
    /// create example's.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError`] when synthesis or validation fails.
    pub fn invalid_example(&self) -> Result<Value, GeneratorError> {
        self.draw(self.schema.raw(), INVALID_SALT)
    }

    /// Draws one value from the given schema view and validates it.
    fn draw(&self, schema_doc: &Value, salt: u64) -> Result<Value, GeneratorError> {
        let strategy = schema_strategy(schema_doc)?;
        let mut runner = seeded_runner(self.seed, salt);
        let value = strategy
            .new_tree(&mut runner)
            .map_err(|err| GeneratorError::Synthesis(err.to_string()))?
            .current();
        validate(schema_doc, &value)?;
        Ok(value)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a deterministic runner from seed and salt.
fn seeded_runner(seed: u64, salt: u64) -> TestRunner {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&seed.to_le_bytes());
    bytes[8..16].copy_from_slice(&salt.to_le_bytes());
    TestRunner::new_with_rng(Config::default(), TestRng::from_seed(RngAlgorithm::ChaCha, &bytes))
}

/// Validates a drawn value against its source schema, fail-closed.
fn validate(schema_doc: &Value, value: &Value) -> Result<(), GeneratorError> {
    let validator = jsonschema::options()
        .build(schema_doc)
        .map_err(|err| GeneratorError::InvalidSchema(err.to_string()))?;
    validator
        .validate(value)
        .map_err(|err| GeneratorError::Validation(err.to_string()))
}
