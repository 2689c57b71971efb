use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use schemars::r#gen::SchemaGenerator;
use schemars::schema::{InstanceType, Metadata, Schema, SchemaObject};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::Error;

/// Kind of value a column generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dtype {
    Number,
    Float,
    Date,
    Name,
    Alphanumeric,
    Address,
    City,
    Email,
    PhoneNumbers,
    ZipCode,
    Region,
    Country,
    State,
    StatusFlags,
    Age,
    Sku,
    ProductName,
    Ratings,
    Contains,
    Custom,
    Index,
    Gender,
    YesNo,
    Binary,
}

/// Parameters a dtype reads from its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamFamily {
    /// `min`/`max`, drawn as integers.
    IntegerRange,
    /// `min`/`max`, drawn as rounded reals.
    RealRange,
    /// `start_date`/`end_date`.
    DateRange,
    /// `custom_values`.
    Domain,
    /// Fixed rule, no parameters.
    Plain,
}

impl ParamFamily {
    /// Column keys read by this family.
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            ParamFamily::IntegerRange | ParamFamily::RealRange => &["min", "max"],
            ParamFamily::DateRange => &["start_date", "end_date"],
            ParamFamily::Domain => &["custom_values"],
            ParamFamily::Plain => &[],
        }
    }
}

const ALIASES: &[(&str, Dtype)] = &[
    ("rating", Dtype::Ratings),
    ("phone", Dtype::PhoneNumbers),
    ("zip", Dtype::ZipCode),
];

impl Dtype {
    /// Every supported dtype, in the order they are listed to users.
    pub const ALL: [Dtype; 24] = [
        Dtype::Index,
        Dtype::Name,
        Dtype::Number,
        Dtype::Float,
        Dtype::Date,
        Dtype::Alphanumeric,
        Dtype::Address,
        Dtype::City,
        Dtype::Email,
        Dtype::PhoneNumbers,
        Dtype::ZipCode,
        Dtype::Region,
        Dtype::Country,
        Dtype::State,
        Dtype::StatusFlags,
        Dtype::Age,
        Dtype::Sku,
        Dtype::ProductName,
        Dtype::Ratings,
        Dtype::Contains,
        Dtype::Custom,
        Dtype::Gender,
        Dtype::YesNo,
        Dtype::Binary,
    ];

    /// Persisted name of the dtype.
    pub fn as_str(self) -> &'static str {
        match self {
            Dtype::Number => "number",
            Dtype::Float => "float",
            Dtype::Date => "date",
            Dtype::Name => "name",
            Dtype::Alphanumeric => "alphanumeric",
            Dtype::Address => "address",
            Dtype::City => "city",
            Dtype::Email => "email",
            Dtype::PhoneNumbers => "phone_numbers",
            Dtype::ZipCode => "zip_code",
            Dtype::Region => "region",
            Dtype::Country => "country",
            Dtype::State => "state",
            Dtype::StatusFlags => "status_flags",
            Dtype::Age => "age",
            Dtype::Sku => "sku",
            Dtype::ProductName => "product_name",
            Dtype::Ratings => "ratings",
            Dtype::Contains => "contains",
            Dtype::Custom => "custom",
            Dtype::Index => "index",
            Dtype::Gender => "M/F",
            Dtype::YesNo => "Yes/No",
            Dtype::Binary => "1/0",
        }
    }

    pub fn family(self) -> ParamFamily {
        match self {
            Dtype::Number | Dtype::Age => ParamFamily::IntegerRange,
            Dtype::Float | Dtype::Ratings => ParamFamily::RealRange,
            Dtype::Date => ParamFamily::DateRange,
            Dtype::Contains | Dtype::Custom => ParamFamily::Domain,
            _ => ParamFamily::Plain,
        }
    }

    /// Range used when a numeric column leaves `min` or `max` unset.
    pub fn default_range(self) -> Option<(f64, f64)> {
        match self {
            Dtype::Number | Dtype::Age | Dtype::Float => Some((0.0, 100.0)),
            Dtype::Ratings => Some((1.0, 5.0)),
            _ => None,
        }
    }

    /// Decimal places kept by real-valued dtypes.
    pub fn decimals(self) -> Option<u32> {
        match self {
            Dtype::Float => Some(2),
            Dtype::Ratings => Some(1),
            _ => None,
        }
    }

    /// Names accepted when parsing, aliases included.
    pub fn accepted_names() -> impl Iterator<Item = &'static str> {
        Self::ALL
            .iter()
            .map(|dtype| dtype.as_str())
            .chain(ALIASES.iter().map(|(alias, _)| *alias))
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dtype {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|dtype| dtype.as_str() == raw)
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == raw)
                    .map(|(_, dtype)| *dtype)
            })
            .ok_or_else(|| Error::UnknownDtype(raw.to_string()))
    }
}

impl Serialize for Dtype {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Dtype {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl JsonSchema for Dtype {
    fn schema_name() -> String {
        "Dtype".to_string()
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            metadata: Some(Box::new(Metadata {
                description: Some("Kind of value a column generates.".to_string()),
                ..Default::default()
            })),
            instance_type: Some(InstanceType::String.into()),
            enum_values: Some(Self::accepted_names().map(serde_json::Value::from).collect()),
            ..Default::default()
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for dtype in Dtype::ALL {
            assert_eq!(dtype.as_str().parse::<Dtype>().unwrap(), dtype);
        }
    }

    #[test]
    fn aliases_resolve_to_canonical_dtype() {
        assert_eq!("rating".parse::<Dtype>().unwrap(), Dtype::Ratings);
        assert_eq!(" zip ".parse::<Dtype>().unwrap(), Dtype::ZipCode);
        assert!("uuid".parse::<Dtype>().is_err());
    }
}
