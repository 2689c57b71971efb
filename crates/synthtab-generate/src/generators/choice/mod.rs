use rand::RngCore;

use synthtab_core::Dtype;

use crate::errors::GenerationError;
use crate::generators::{GeneratedValue, Generator, GeneratorContext, GeneratorRegistry, pick};

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(CategoryGenerator {
        dtype: Dtype::Contains,
        id: "choice.contains",
    }));
    registry.register_generator(Box::new(CategoryGenerator {
        dtype: Dtype::Custom,
        id: "choice.custom",
    }));
    registry.register_generator(Box::new(FixedChoiceGenerator {
        dtype: Dtype::Gender,
        id: "choice.gender",
        choices: &[Choice::Text("M"), Choice::Text("F")],
    }));
    registry.register_generator(Box::new(FixedChoiceGenerator {
        dtype: Dtype::YesNo,
        id: "choice.yes_no",
        choices: &[Choice::Text("Yes"), Choice::Text("No")],
    }));
    registry.register_generator(Box::new(FixedChoiceGenerator {
        dtype: Dtype::Binary,
        id: "choice.binary",
        choices: &[Choice::Int(1), Choice::Int(0)],
    }));
    registry.register_generator(Box::new(FixedChoiceGenerator {
        dtype: Dtype::StatusFlags,
        id: "choice.status_flags",
        choices: &[Choice::Text("Active"), Choice::Text("Inactive")],
    }));
}

/// Uniform draw from the column's own domain.
struct CategoryGenerator {
    dtype: Dtype,
    id: &'static str,
}

impl Generator for CategoryGenerator {
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
        match pick(&ctx.column.values, rng) {
            Some(value) => Ok(GeneratedValue::Text(value.clone())),
            None if ctx.column.nullable => Ok(GeneratedValue::Null),
            None => Err(GenerationError::EmptyDomain {
                column: ctx.column.name.clone(),
            }),
        }
    }
}

#[derive(Clone, Copy)]
enum Choice {
    Text(&'static str),
    Int(i64),
}

struct FixedChoiceGenerator {
    dtype: Dtype,
    id: &'static str,
    choices: &'static [Choice],
}

impl Generator for FixedChoiceGenerator {
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
        let choice = pick(self.choices, rng).ok_or_else(|| GenerationError::EmptyDomain {
            column: ctx.column.name.clone(),
        })?;
        Ok(match *choice {
            Choice::Text(value) => GeneratedValue::Text(value.to_string()),
            Choice::Int(value) => GeneratedValue::Int(value),
        })
    }
}
