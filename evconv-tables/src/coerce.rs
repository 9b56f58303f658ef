use std::sync::Arc;

use arrow::{compute::cast, record_batch::RecordBatch};
use arrow_schema::{DataType, Field, FieldRef, Schema};

use crate::{error::TableError, table::EventTable};

/// Wire-type tag assigned to every column before writing. The five named
/// kinds are pinned to an exact bit width and signedness; everything else
/// passes through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Bool,
    UInt8,
    Int64,
    Float32,
    Float64,
    Passthrough,
}

impl ColumnKind {
    pub fn of(data_type: &DataType) -> Self {
        match data_type {
            DataType::Boolean => Self::Bool,
            DataType::UInt8 => Self::UInt8,
            DataType::Int64 => Self::Int64,
            DataType::Float32 => Self::Float32,
            DataType::Float64 => Self::Float64,
            // Dictionary-encoded variants of the named kinds are unwrapped to
            // their value type.
            DataType::Dictionary(_, value) => Self::of(value.as_ref()),
            _ => Self::Passthrough,
        }
    }

    /// Canonical arrow type this kind is written as, `None` for passthrough.
    pub fn target_type(&self) -> Option<DataType> {
        match self {
            Self::Bool => Some(DataType::Boolean),
            Self::UInt8 => Some(DataType::UInt8),
            Self::Int64 => Some(DataType::Int64),
            Self::Float32 => Some(DataType::Float32),
            Self::Float64 => Some(DataType::Float64),
            Self::Passthrough => None,
        }
    }
}

/// Coerce every column to its wire representation. Columns already in
/// canonical form are reused as-is; the cast is a lossless reinterpretation
/// at the same bit width, never a rounding step.
pub fn normalize(table: &EventTable) -> Result<EventTable, TableError> {
    let mut fields: Vec<FieldRef> = Vec::with_capacity(table.num_columns());
    let mut columns = Vec::with_capacity(table.num_columns());

    for (field, column) in table
        .schema()
        .fields()
        .iter()
        .zip(table.batch().columns().iter())
    {
        match ColumnKind::of(field.data_type()).target_type() {
            Some(target) if field.data_type() != &target => {
                tracing::debug!(
                    "coercing column '{}' from {} to {}",
                    field.name(),
                    field.data_type(),
                    target
                );
                let coerced = cast(column, &target)
                    .map_err(|e| TableError::CoercionError(field.name().clone(), e))?;
                fields.push(Arc::new(Field::new(
                    field.name(),
                    target,
                    field.is_nullable(),
                )));
                columns.push(coerced);
            }
            _ => {
                fields.push(field.clone());
                columns.push(column.clone());
            }
        }
    }

    let schema = Arc::new(Schema::new_with_metadata(
        fields,
        table.schema().metadata().clone(),
    ));
    let batch = RecordBatch::try_new(schema, columns).map_err(TableError::BatchError)?;
    Ok(EventTable::from_batch(batch))
}
