use chrono::Duration;
use rand::{Rng, RngCore};

use synthtab_core::{ColumnSpec, Dtype, I64_LOWER, I64_UPPER};

use crate::errors::GenerationError;
use crate::generators::{
    GeneratedValue, Generator, GeneratorContext, GeneratorRegistry, bothify,
};

/// 2^53: beyond it `f64` cannot count single steps.
const EXACT_STEPS: f64 = 9_007_199_254_740_992.0;

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(IndexGenerator));
    registry.register_generator(Box::new(IntRangeGenerator {
        dtype: Dtype::Number,
        id: "primitive.number",
    }));
    registry.register_generator(Box::new(IntRangeGenerator {
        dtype: Dtype::Age,
        id: "primitive.age",
    }));
    registry.register_generator(Box::new(RealRangeGenerator {
        dtype: Dtype::Float,
        id: "primitive.float",
    }));
    registry.register_generator(Box::new(RealRangeGenerator {
        dtype: Dtype::Ratings,
        id: "primitive.ratings",
    }));
    registry.register_generator(Box::new(DateRangeGenerator));
    registry.register_generator(Box::new(PatternGenerator {
        dtype: Dtype::Alphanumeric,
        id: "pattern.alphanumeric",
        pattern: "??##",
    }));
    registry.register_generator(Box::new(PatternGenerator {
        dtype: Dtype::Region,
        id: "pattern.region",
        pattern: "Region_##",
    }));
    registry.register_generator(Box::new(PatternGenerator {
        dtype: Dtype::Sku,
        id: "pattern.sku",
        pattern: "SKU#?#?#?#?",
    }));
}

struct IndexGenerator;

impl Generator for IndexGenerator {
    fn dtype(&self) -> Dtype {
        Dtype::Index
    }

    fn id(&self) -> &'static str {
        "primitive.index"
    }

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let value = i64::try_from(ctx.row_index).map_err(|_| {
            GenerationError::invalid_range(&ctx.column.name, "row index does not fit i64")
        })?;
        Ok(GeneratedValue::Int(value))
    }
}

struct IntRangeGenerator {
    dtype: Dtype,
    id: &'static str,
}

impl Generator for IntRangeGenerator {
    fn dtype(&self) -> Dtype {
        self.dtype
    }

    fn id(&self) -> &'static str {
        self.id
    }

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let (min, max) = checked_bounds(ctx.column)?;
        let (low, high) = (min.ceil(), max.floor());
        if low < I64_LOWER || high >= I64_UPPER {
            return Err(GenerationError::invalid_range(
                &ctx.column.name,
                format!("bounds {min}..{max} do not fit a 64-bit integer"),
            ));
        }
        let (low, high) = (low as i64, high as i64);
        if low > high {
            return Err(GenerationError::invalid_range(
                &ctx.column.name,
                format!("no integer between {min} and {max}"),
            ));
        }
        Ok(GeneratedValue::Int(rng.random_range(low..=high)))
    }
}

struct RealRangeGenerator {
    dtype: Dtype,
    id: &'static str,
}

impl Generator for RealRangeGenerator {
    fn dtype(&self) -> Dtype {
        self.dtype
    }

    fn id(&self) -> &'static str {
        self.id
    }

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let (min, max) = checked_bounds(ctx.column)?;
        let factor = 10_f64.powi(self.dtype.decimals().unwrap_or(2) as i32);
        let (low, high) = ((min * factor).ceil(), (max * factor).floor());

        // Draw whole steps of the dtype precision; past 2^53 every f64 is
        // already a whole step, and a range with no step is drawn unrounded.
        let value = if low <= high && low.abs() < EXACT_STEPS && high.abs() < EXACT_STEPS {
            let step = rng.random_range(0..=(high - low) as u64);
            (low + step as f64) / factor
        } else {
            rng.random_range(min..=max)
        };
        Ok(GeneratedValue::Float(value.clamp(min, max)))
    }
}

fn checked_bounds(column: &ColumnSpec) -> Result<(f64, f64), GenerationError> {
    let (min, max) = column
        .numeric_bounds()
        .ok_or_else(|| GenerationError::invalid_range(&column.name, "dtype has no range"))?;
    if !min.is_finite() || !max.is_finite() {
        return Err(GenerationError::invalid_range(
            &column.name,
            "bounds must be finite",
        ));
    }
    if max < min {
        return Err(GenerationError::invalid_range(
            &column.name,
            format!("max ({max}) is less than min ({min})"),
        ));
    }
    if !(max - min).is_finite() {
        return Err(GenerationError::invalid_range(
            &column.name,
            format!("span from {min} to {max} is not representable"),
        ));
    }
    Ok((min, max))
}

struct DateRangeGenerator;

impl Generator for DateRangeGenerator {
    fn dtype(&self) -> Dtype {
        Dtype::Date
    }

    fn id(&self) -> &'static str {
        "primitive.date"
    }

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let (start, end) = ctx.column.date_bounds(ctx.base_date);
        if end < start {
            return Err(GenerationError::invalid_range(
                &ctx.column.name,
                format!("end_date {end} is before start_date {start}"),
            ));
        }
        let span = (end - start).num_days();
        let offset = rng.random_range(0..=span);
        start
            .checked_add_signed(Duration::days(offset))
            .map(GeneratedValue::Date)
            .ok_or_else(|| GenerationError::invalid_range(&ctx.column.name, "date out of range"))
    }
}

struct PatternGenerator {
    dtype: Dtype,
    id: &'static str,
    pattern: &'static str,
}

impl Generator for PatternGenerator {
    fn dtype(&self) -> Dtype {
        self.dtype
    }

    fn id(&self) -> &'static str {
        self.id
    }

    fn generate(
        &self,
        _ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        Ok(GeneratedValue::Text(bothify(self.pattern, rng)))
    }
}
