use super::field::Field;
use crate::error::{DalError, DalResult};
use indexmap::IndexMap;

/// A named collection of fields plus the short alias used in generated SQL.
///
/// Field order is the declaration order and drives the column order of
/// `SELECT` lists. The alias is empty until the table is registered with a
/// [`Schema`](super::Schema), which assigns it exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    fields: IndexMap<String, Field>,
    pub(super) alias: String,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            alias: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Add a field by name. Fails with [`DalError::DuplicateField`] if it already exists.
    pub fn add_field(&mut self, name: impl Into<String>) -> DalResult<&mut Self> {
        self.add(Field::new(name))
    }

    /// Add several fields in order, stopping at the first duplicate.
    pub fn add_fields<I, S>(&mut self, names: I) -> DalResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.add_field(name)?;
        }
        Ok(self)
    }

    /// Add a fully described field.
    pub fn add(&mut self, field: Field) -> DalResult<&mut Self> {
        if field.name.is_empty() {
            return Err(DalError::validation(format!(
                "field name on table `{}` cannot be empty",
                self.name
            )));
        }
        if self.fields.contains_key(&field.name) {
            return Err(DalError::DuplicateField {
                table: self.name.clone(),
                field: field.name,
            });
        }
        self.fields.insert(field.name.clone(), field);
        Ok(self)
    }

    /// Look up a declared field.
    pub fn field(&self, name: &str) -> DalResult<&Field> {
        self.fields
            .get(name)
            .ok_or_else(|| DalError::missing_field(&self.name, name))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}
