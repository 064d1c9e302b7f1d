use serde::{Deserialize, Serialize};

/// One attribute column of a combined dataset. `integer` marks columns whose
/// interpolated values are rounded to whole units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(default)]
    pub integer: bool,
}

impl ColumnSpec {
    pub fn real(name: &str) -> Self {
        Self {
            name: name.to_string(),
            integer: false,
        }
    }

    pub fn integer(name: &str) -> Self {
        Self {
            name: name.to_string(),
            integer: true,
        }
    }
}

/// Attribute layout shared by every pipeline stage: which columns the gauge
/// timeline contributes, which the weather stream contributes, and which
/// single column is predicted.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub primary: Vec<ColumnSpec>,
    pub secondary: Vec<ColumnSpec>,
    pub target: String,
}

impl Schema {
    pub fn new(
        primary: Vec<ColumnSpec>,
        secondary: Vec<ColumnSpec>,
        target: &str,
    ) -> Result<Self, String> {
        if primary.is_empty() {
            return Err("schema requires at least one primary attribute".to_string());
        }

        let mut seen: Vec<&str> = Vec::new();
        for spec in primary.iter().chain(secondary.iter()) {
            if spec.name.trim().is_empty() {
                return Err("schema attribute names must be non-empty".to_string());
            }
            if seen.contains(&spec.name.as_str()) {
                return Err(format!("duplicate schema attribute: {}", spec.name));
            }
            seen.push(spec.name.as_str());
        }

        if !seen.contains(&target) {
            return Err(format!("target attribute not in schema: {target}"));
        }

        Ok(Self {
            primary,
            secondary,
            target: target.to_string(),
        })
    }

    /// Column names in table order: primary attributes, then secondary.
    pub fn column_names(&self) -> Vec<String> {
        self.primary
            .iter()
            .chain(self.secondary.iter())
            .map(|spec| spec.name.clone())
            .collect()
    }

    /// Column names reordered for modeling, with the target last.
    pub fn model_order(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .column_names()
            .into_iter()
            .filter(|name| name != &self.target)
            .collect();
        names.push(self.target.clone());
        names
    }

    pub fn is_integer(&self, name: &str) -> bool {
        self.primary
            .iter()
            .chain(self.secondary.iter())
            .any(|spec| spec.name == name && spec.integer)
    }
}
