use chrono::NaiveDate;
use rand::{Rng, RngCore};

use synthtab_core::{Dtype, TableSpec};

use crate::errors::GenerationError;
use crate::faker_rs::LocaleKey;
use crate::generators::{GeneratedValue, GeneratorContext, GeneratorRegistry};
use crate::model::GeneratedRow;

/// Produces single rows of one table spec.
pub struct RowGenerator<'a> {
    spec: &'a TableSpec,
    registry: &'a GeneratorRegistry,
    base_date: NaiveDate,
    locale: LocaleKey,
}

impl<'a> RowGenerator<'a> {
    pub fn new(
        spec: &'a TableSpec,
        registry: &'a GeneratorRegistry,
        base_date: NaiveDate,
        locale: LocaleKey,
    ) -> Self {
        Self {
            spec,
            registry,
            base_date,
            locale,
        }
    }

    /// Generate the row at the 1-based `row_index`.
    ///
    /// Columns are visited in declared order. A nullable column draws from
    /// `[0, 100)` first and emits null below its percentage; index columns
    /// never do. Names generated earlier in the row are handed to later
    /// columns through the context.
    pub fn generate_row(
        &self,
        row_index: u64,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedRow, GenerationError> {
        let mut values = Vec::with_capacity(self.spec.columns.len());
        let mut row_name: Option<String> = None;

        for column in &self.spec.columns {
            if column.nullable && column.dtype != Dtype::Index {
                let draw: f64 = rng.random_range(0.0..100.0);
                if draw < f64::from(column.null_percentage) {
                    values.push(GeneratedValue::Null);
                    continue;
                }
            }

            let ctx = GeneratorContext {
                column,
                row_index,
                base_date: self.base_date,
                locale: self.locale,
                row_name: row_name.as_deref(),
            };
            let value = self.registry.generate(&ctx, rng)?;

            if column.dtype == Dtype::Name
                && let GeneratedValue::Text(name) = &value
            {
                row_name = Some(name.clone());
            }
            values.push(value);
        }

        Ok(GeneratedRow { values })
    }
}
