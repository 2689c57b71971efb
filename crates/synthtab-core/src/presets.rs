use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::dtype::Dtype;
use crate::error::{Error, Result};
use crate::table::{ColumnSpec, TableSpec};

/// Ready-made business tables a session can start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainPreset {
    Retail,
    Hr,
    SupplyChain,
}

impl DomainPreset {
    pub const ALL: [DomainPreset; 3] = [
        DomainPreset::Retail,
        DomainPreset::Hr,
        DomainPreset::SupplyChain,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DomainPreset::Retail => "retail",
            DomainPreset::Hr => "hr",
            DomainPreset::SupplyChain => "supply_chain",
        }
    }

    /// Inclusive row count range offered for the domain.
    pub fn row_bounds(self) -> (u64, u64) {
        match self {
            DomainPreset::Retail | DomainPreset::SupplyChain => (100, 50_000),
            DomainPreset::Hr => (100, 501),
        }
    }

    /// Every column of the domain, in table order.
    pub fn columns(self) -> Vec<ColumnSpec> {
        match self {
            DomainPreset::Retail => retail_columns(),
            DomainPreset::Hr => hr_columns(),
            DomainPreset::SupplyChain => supply_chain_columns(),
        }
    }

    /// Build the preset table.
    ///
    /// `selected` picks columns by name and keeps the preset order; an empty
    /// selection keeps them all. `rows` defaults to the lower row bound.
    pub fn table(self, selected: &[String], rows: Option<u64>) -> Result<TableSpec> {
        let (min_rows, max_rows) = self.row_bounds();
        let rows = rows.unwrap_or(min_rows);
        if !(min_rows..=max_rows).contains(&rows) {
            return Err(Error::InvalidConfig(format!(
                "{} tables take {min_rows}..={max_rows} rows, got {rows}",
                self.as_str()
            )));
        }

        let columns = self.columns();
        if let Some(unknown) = selected
            .iter()
            .find(|name| !columns.iter().any(|column| &column.name == *name))
        {
            return Err(Error::InvalidConfig(format!(
                "{} has no column '{unknown}'",
                self.as_str()
            )));
        }

        let columns = if selected.is_empty() {
            columns
        } else {
            columns
                .into_iter()
                .filter(|column| selected.contains(&column.name))
                .collect()
        };

        Ok(TableSpec::new(
            format!("{}_data", self.as_str()),
            rows,
            columns,
        ))
    }
}

impl fmt::Display for DomainPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DomainPreset {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let key = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == key)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown preset '{raw}'")))
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn int(name: &str, dtype: Dtype, min: i64, max: i64) -> ColumnSpec {
    ColumnSpec::new(name, dtype).with_range(min as f64, max as f64)
}

fn one_of(name: &str, values: &[&str]) -> ColumnSpec {
    ColumnSpec::new(name, Dtype::Contains).with_values(values.iter().copied())
}

fn numbered(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|n| format!("{prefix}{n}")).collect()
}

fn one_of_numbered(name: &str, prefix: &str, count: usize) -> ColumnSpec {
    ColumnSpec::new(name, Dtype::Contains).with_values(numbered(prefix, count))
}

fn retail_columns() -> Vec<ColumnSpec> {
    vec![
        int("Product_ID", Dtype::Number, 1_000_000, 9_999_999),
        one_of_numbered("Product_Name", "Product", 3),
        one_of_numbered("Product_Category", "PC", 5),
        one_of_numbered("Product_Subcategory", "PSC", 5),
        one_of_numbered("Brand", "Brand", 5),
        ColumnSpec::new("Supplier_ID", Dtype::Alphanumeric),
        one_of_numbered("Supplier_Name", "Supplier", 5),
        ColumnSpec::new("Store_ID", Dtype::Alphanumeric),
        one_of_numbered("Store_Name", "Store", 5),
        ColumnSpec::new("Store_Location", Dtype::City),
        ColumnSpec::new("Customer_ID", Dtype::Sku),
        ColumnSpec::new("Customer_Name", Dtype::Name),
        int("Customer_Age", Dtype::Age, 18, 80),
        ColumnSpec::new("Customer_Gender", Dtype::Gender),
        one_of_numbered("Customer_Segment", "Segment", 3),
        ColumnSpec::new("Transaction_ID", Dtype::Index),
        ColumnSpec::new("Transaction_Date", Dtype::Date)
            .with_dates(ymd(2022, 1, 1), ymd(2024, 12, 31)),
        int("Quantity_Sold", Dtype::Number, 2, 100),
        int("Price", Dtype::Number, 100, 1_000),
    ]
}

fn hr_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new("EmployeeID", Dtype::Index),
        ColumnSpec::new("Name", Dtype::Name),
        int("Age", Dtype::Age, 20, 60),
        ColumnSpec::new("Gender", Dtype::Gender),
        one_of("MaritalStatus", &["Y", "N"]),
        one_of(
            "Department",
            &["BA", "BI", "Ops", "DE", "DS", "Finance", "DevOps"],
        ),
        one_of(
            "JobTitle",
            &[
                "Analyst",
                "Consultant",
                "Senior Consultant",
                "Manager",
                "Lead Manager",
                "DoD",
            ],
        ),
        int("ManagerID", Dtype::Number, 1, 31),
        ColumnSpec::new("HireDate", Dtype::Date).with_dates(ymd(2002, 1, 1), ymd(2024, 12, 31)),
        int("YearsInCompany", Dtype::Number, 1, 10),
        int("YearsInCurrentRole", Dtype::Number, 1, 5),
        int("PreviousCompanyExperience", Dtype::Number, 1, 5),
        one_of_numbered("EducationLevel", "LVL", 5),
        int("Salary", Dtype::Number, 3, 100),
        one_of(
            "WorkLocation",
            &["Bangalore", "Noida", "Chennai", "Hyderabad", "Kochi"],
        ),
    ]
}

fn supply_chain_columns() -> Vec<ColumnSpec> {
    vec![
        int("Order_ID", Dtype::Number, 10_000_000, 99_999_999),
        ColumnSpec::new("Customer_ID", Dtype::Alphanumeric),
        ColumnSpec::new("Product_ID", Dtype::Alphanumeric),
        ColumnSpec::new("Supplier_ID", Dtype::Alphanumeric),
        ColumnSpec::new("Warehouse_ID", Dtype::Alphanumeric),
        one_of("Shipping_Method", &["Air", "Ocean", "Road"]),
        one_of_numbered("Transporter_Name", "TP", 5),
        ColumnSpec::new("Shipment_ID", Dtype::Index),
        one_of(
            "Destination_Country",
            &[
                "France",
                "Italy",
                "Mexico",
                "Russia",
                "Spain",
                "UAE",
                "SK",
                "Singapore",
                "Argentina",
                "Netherlands",
            ],
        ),
        one_of(
            "Destination_City",
            &[
                "Paris",
                "Rome",
                "Mexico",
                "Moscow",
                "Madrid",
                "Dubai",
                "Seoul",
                "Singapore",
                "Buenos",
                "Amsterdam",
            ],
        ),
        one_of(
            "Source_Country",
            &[
                "USA",
                "Canada",
                "Germany",
                "India",
                "Japan",
                "Australia",
                "Brazil",
                "China",
                "SA",
                "UK",
            ],
        ),
        one_of(
            "Source_City",
            &[
                "NY",
                "Toronto",
                "Berlin",
                "Mumbai",
                "Tokyo",
                "Sydney",
                "Paulo",
                "Shanghai",
                "Johannesburg",
                "London",
            ],
        ),
        one_of_numbered("Product_Category", "PC", 5),
        one_of_numbered("Product_Subcategory", "PSC", 5),
        one_of(
            "Order_Channel",
            &["Third-party Logistics Partner", "Corporate Portal"],
        ),
        one_of("Payment_Method", &["Online", "Offline"]),
        one_of("Shipping_Priority", &["Y", "N"]),
        ColumnSpec::new("Route_ID", Dtype::Alphanumeric),
        ColumnSpec::new("Carrier_ID", Dtype::Alphanumeric),
        one_of(
            "Packaging_Type",
            &["Box", "Pallet", "Drum", "Plastic Wrap", "Bubble Mailer"],
        ),
        one_of("Order_Status", &["Y", "N"]),
        one_of("Shipment_Status", &["Y", "N"]),
        one_of("Delivery_Type", &["Standard", "Express", "Same-Day"]),
        one_of("Return_Status", &["Y", "N"]),
        one_of("Container_Type", &["Small", "Medium", "Large"]),
        ColumnSpec::new("SKU", Dtype::Sku),
        int("Distribution_Center_ID", Dtype::Number, 1_000_000, 9_999_999),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_names_parse_loosely() {
        assert_eq!("Supply Chain".parse::<DomainPreset>().unwrap(), DomainPreset::SupplyChain);
        assert_eq!("HR".parse::<DomainPreset>().unwrap(), DomainPreset::Hr);
        assert!("finance".parse::<DomainPreset>().is_err());
    }

    #[test]
    fn column_picker_keeps_preset_order() {
        let picked = vec!["Price".to_string(), "Product_ID".to_string()];
        let table = DomainPreset::Retail.table(&picked, Some(250)).unwrap();
        assert_eq!(table.column_names(), vec!["Product_ID", "Price"]);
        assert_eq!(table.row_count, 250);
        assert_eq!(table.name, "retail_data");
    }

    #[test]
    fn unknown_column_and_row_ceiling_are_rejected() {
        let picked = vec!["Salary".to_string()];
        assert!(matches!(
            DomainPreset::Retail.table(&picked, None),
            Err(Error::InvalidConfig(_))
        ));
        assert!(DomainPreset::Hr.table(&[], Some(502)).is_err());
        assert!(DomainPreset::Hr.table(&[], Some(99)).is_err());
        assert_eq!(DomainPreset::Hr.table(&[], None).unwrap().row_count, 100);
    }
}
