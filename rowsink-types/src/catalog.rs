//! The validated set of columns a buffer accepts.

use std::sync::Arc;

use arrow::datatypes::{Schema, SchemaRef};
use rowsink_result::{Error, Result};
use rustc_hash::FxHashMap;

use crate::descriptor::{ColumnDescriptor, ColumnSpec};
use crate::name::normalize_column_name;

/// Normalized column name to validated column, in declaration order.
///
/// A catalog is immutable once built. Changing the schema means building a new
/// catalog and swapping it in wholesale.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    columns: Vec<ColumnSpec>,
    lookup: FxHashMap<String, usize>,
    schema: SchemaRef,
}

impl SchemaCatalog {
    /// Validate every descriptor and build the catalog.
    ///
    /// Fails on the first invalid descriptor, or on the first column whose
    /// normalized name was already taken by an earlier one.
    pub fn try_new(descriptors: &[ColumnDescriptor]) -> Result<Self> {
        let mut columns = Vec::with_capacity(descriptors.len());
        let mut lookup =
            FxHashMap::with_capacity_and_hasher(descriptors.len(), Default::default());

        for descriptor in descriptors {
            let spec = descriptor.validate()?;
            if lookup.contains_key(&spec.name) {
                return Err(Error::schema(
                    spec.declared_name,
                    format!("duplicate column name '{}'", spec.name),
                ));
            }
            lookup.insert(spec.name.clone(), columns.len());
            columns.push(spec);
        }

        let schema = Arc::new(Schema::new(
            columns.iter().map(ColumnSpec::arrow_field).collect::<Vec<_>>(),
        ));

        Ok(Self {
            columns,
            lookup,
            schema,
        })
    }

    /// Position of the column a row-map key refers to.
    pub fn resolve(&self, raw_name: &str) -> Option<usize> {
        self.lookup.get(&normalize_column_name(raw_name)).copied()
    }

    #[inline]
    pub fn column(&self, index: usize) -> &ColumnSpec {
        &self.columns[index]
    }

    #[inline]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Arrow schema of the record batches built from this catalog.
    #[inline]
    pub fn arrow_schema(&self) -> SchemaRef {
        Arc::clone(&self.schema)
    }
}
