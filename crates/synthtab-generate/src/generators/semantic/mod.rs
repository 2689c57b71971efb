use rand::RngCore;

use synthtab_core::Dtype;

use crate::errors::GenerationError;
use crate::faker_rs::{FakeRsAdapter, FakerKind};
use crate::generators::{GeneratedValue, Generator, GeneratorContext, GeneratorRegistry};

const EMAIL_DOMAIN: &str = "domain.com";

pub fn register(registry: &mut GeneratorRegistry) {
    registry.register_generator(Box::new(FakerGenerator {
        dtype: Dtype::Name,
        id: "faker.name",
        kind: FakerKind::FullName,
    }));
    registry.register_generator(Box::new(FakerGenerator {
        dtype: Dtype::City,
        id: "faker.city",
        kind: FakerKind::City,
    }));
    registry.register_generator(Box::new(FakerGenerator {
        dtype: Dtype::Country,
        id: "faker.country",
        kind: FakerKind::Country,
    }));
    registry.register_generator(Box::new(FakerGenerator {
        dtype: Dtype::State,
        id: "faker.state",
        kind: FakerKind::State,
    }));
    registry.register_generator(Box::new(FakerGenerator {
        dtype: Dtype::PhoneNumbers,
        id: "faker.phone_number",
        kind: FakerKind::PhoneNumber,
    }));
    registry.register_generator(Box::new(FakerGenerator {
        dtype: Dtype::ZipCode,
        id: "faker.zip_code",
        kind: FakerKind::ZipCode,
    }));
    registry.register_generator(Box::new(FakerGenerator {
        dtype: Dtype::ProductName,
        id: "faker.bs",
        kind: FakerKind::Bs,
    }));
    registry.register_generator(Box::new(AddressGenerator));
    registry.register_generator(Box::new(EmailFromNameGenerator));
}

struct FakerGenerator {
    dtype: Dtype,
    id: &'static str,
    kind: FakerKind,
}

impl Generator for FakerGenerator {
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
        Ok(GeneratedValue::Text(FakeRsAdapter::text(
            self.kind, ctx.locale, rng,
        )))
    }
}

struct AddressGenerator;

impl Generator for AddressGenerator {
    fn dtype(&self) -> Dtype {
        Dtype::Address
    }

    fn id(&self) -> &'static str {
        "faker.address"
    }

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let building = FakeRsAdapter::text(FakerKind::BuildingNumber, ctx.locale, rng);
        let street = FakeRsAdapter::text(FakerKind::StreetName, ctx.locale, rng);
        let city = FakeRsAdapter::text(FakerKind::City, ctx.locale, rng);
        let state = FakeRsAdapter::text(FakerKind::StateAbbr, ctx.locale, rng);
        let zip = FakeRsAdapter::text(FakerKind::ZipCode, ctx.locale, rng);
        Ok(GeneratedValue::Text(format!(
            "{building} {street}, {city}, {state} {zip}"
        )))
    }
}

/// `first.last@domain.com` from the row's name, or from a fresh one.
struct EmailFromNameGenerator;

impl Generator for EmailFromNameGenerator {
    fn dtype(&self) -> Dtype {
        Dtype::Email
    }

    fn id(&self) -> &'static str {
        "derive.email_from_name"
    }

    fn generate(
        &self,
        ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<GeneratedValue, GenerationError> {
        let local = ctx
            .row_name
            .and_then(email_local_part)
            .or_else(|| {
                let name = FakeRsAdapter::text(FakerKind::FullName, ctx.locale, rng);
                email_local_part(&name)
            })
            .unwrap_or_else(|| format!("user{}", ctx.row_index));
        Ok(GeneratedValue::Text(format!("{local}@{EMAIL_DOMAIN}")))
    }
}

/// Lowercased `first.last` with punctuation removed.
pub fn email_local_part(name: &str) -> Option<String> {
    let parts: Vec<String> = name
        .split_whitespace()
        .map(|part| {
            part.chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|ch| ch.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|part| !part.is_empty())
        .collect();

    let first = parts.first()?;
    let last = parts.last()?;
    Some(format!("{first}.{last}"))
}

#[cfg(test)]
mod tests {
    use super::email_local_part;

    #[test]
    fn local_part_uses_first_and_last_tokens() {
        assert_eq!(
            email_local_part("Dr. Mary-Ann O'Neil").as_deref(),
            Some("dr.oneil")
        );
        assert_eq!(email_local_part("Cher").as_deref(), Some("cher.cher"));
        assert_eq!(email_local_part(" ... "), None);
    }
}
