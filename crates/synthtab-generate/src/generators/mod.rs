use std::collections::HashMap;

use chrono::NaiveDate;
use rand::{Rng, RngCore};

use synthtab_core::{ColumnSpec, Dtype};

use crate::errors::GenerationError;
use crate::faker_rs::locales::LocaleKey;

pub mod choice;
pub mod primitives;
pub mod semantic;

/// Generated value for a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl GeneratedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, GeneratedValue::Null)
    }

    /// Text form used in exports; nulls become empty fields.
    pub fn to_csv(&self) -> String {
        match self {
            GeneratedValue::Null => String::new(),
            GeneratedValue::Int(value) => value.to_string(),
            GeneratedValue::Float(value) => value.to_string(),
            GeneratedValue::Text(value) => value.clone(),
            GeneratedValue::Date(value) => value.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            GeneratedValue::Int(value) => Some(*value as f64),
            GeneratedValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GeneratedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GeneratedValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            GeneratedValue::Date(value) => Some(*value),
            _ => None,
        }
    }
}

/// Inputs a generator sees for one cell.
pub struct GeneratorContext<'a> {
    pub column: &'a ColumnSpec,
    /// 1-based position of the row in its table.
    pub row_index: u64,
    pub base_date: NaiveDate,
    pub locale: LocaleKey,
    /// Most recent name generated earlier in the same row.
    pub row_name: Option<&'a str>,
}

/// A value rule for one dtype.
pub trait Generator: Send + Sync {
    fn dtype(&self) -> Dtype;

    /// Stable identifier used in generation reports.
    fn id(&self) -> &'static str;

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError>;
}

/// Lookup table from dtype to its generator.
pub struct GeneratorRegistry {
    generators: HashMap<Dtype, Box<dyn Generator>>,
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GeneratorRegistry {
    /// Registry with every built-in generator.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        primitives::register(&mut registry);
        semantic::register(&mut registry);
        choice::register(&mut registry);
        registry
    }

    pub fn empty() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    /// Register a generator, replacing any previous one for the same dtype.
    pub fn register_generator(&mut self, generator: Box<dyn Generator>) {
        self.generators.insert(generator.dtype(), generator);
    }

    pub fn get(&self, dtype: Dtype) -> Option<&dyn Generator> {
        self.generators.get(&dtype).map(|generator| generator.as_ref())
    }

    pub fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let dtype = ctx.column.dtype;
        let generator = self
            .get(dtype)
            .ok_or(GenerationError::MissingGenerator(dtype))?;
        generator.generate(ctx, rng)
    }

    /// Registered `(dtype, generator id)` pairs in listing order.
    pub fn entries(&self) -> Vec<(Dtype, &'static str)> {
        Dtype::ALL
            .iter()
            .filter_map(|dtype| self.get(*dtype).map(|generator| (*dtype, generator.id())))
            .collect()
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("generators", &self.generators.len())
            .finish()
    }
}

pub(crate) fn pick<'a, T>(values: &'a [T], rng: &mut dyn RngCore) -> Option<&'a T> {
    if values.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..values.len());
    values.get(idx)
}

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Fill a template: `#` becomes a digit, `?` an ASCII letter.
pub(crate) fn bothify(pattern: &str, rng: &mut dyn RngCore) -> String {
    pattern
        .chars()
        .map(|ch| match ch {
            '#' => char::from(b'0' + rng.random_range(0..10_u8)),
            '?' => char::from(LETTERS[rng.random_range(0..LETTERS.len())]),
            other => other,
        })
        .collect()
}
