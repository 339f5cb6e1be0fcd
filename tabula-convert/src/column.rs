//! Scalar column building

use tabula_frame::descriptor::TypeDescriptor;
use tabula_frame::error::{Result, TabulaError};
use tabula_frame::value::{RawValue, Scalar};

/// Accumulates one property's values into an aligned scalar column
///
/// The declared descriptor must be a scalar kind; the converter routes
/// record and collection properties elsewhere. Values are checked against
/// the declared kind as they arrive, and the final descriptor is resolved
/// in [`ColumnBuilder::finish`]: it is the declared one, forced nullable
/// when any null was observed. A null observed under a declared
/// `Primitive` kind fails immediately instead of defaulting.
pub struct ColumnBuilder {
    name: String,
    declared: TypeDescriptor,
    values: Vec<Option<Scalar>>,
    saw_null: bool,
}

impl ColumnBuilder {
    /// Builder for one column with the given declared type
    pub fn new(name: &str, declared: TypeDescriptor, capacity: usize) -> Self {
        ColumnBuilder {
            name: name.to_string(),
            declared,
            values: Vec::with_capacity(capacity),
            saw_null: false,
        }
    }

    /// Append the accessor output for the next row
    pub fn push(&mut self, value: RawValue) -> Result<()> {
        match value {
            RawValue::Scalar(scalar) => {
                if !scalar.fits(self.declared.kind()) {
                    return Err(TabulaError::MismatchedValueType {
                        column: self.name.clone(),
                        expected: self.declared.kind().name().to_string(),
                        found: scalar.kind_name().to_string(),
                    });
                }
                self.values.push(Some(scalar));
                Ok(())
            }
            RawValue::Null => {
                if !self.declared.kind().permits_null() {
                    return Err(TabulaError::NullInNonNullableColumn {
                        column: self.name.clone(),
                    });
                }
                self.saw_null = true;
                self.values.push(None);
                Ok(())
            }
            other => Err(TabulaError::MismatchedValueType {
                column: self.name.clone(),
                expected: self.declared.kind().name().to_string(),
                found: other.kind_name().to_string(),
            }),
        }
    }

    /// Append a null for a row whose enclosing record is absent
    ///
    /// Unlike a null produced by the accessor this is legal for any kind;
    /// a primitive column widens to its boxed form in `finish`.
    pub fn push_missing(&mut self) {
        self.saw_null = true;
        self.values.push(None);
    }

    /// Resolve the final descriptor and hand back the aligned values
    pub fn finish(self) -> (TypeDescriptor, Vec<Option<Scalar>>) {
        let descriptor = if self.saw_null {
            self.declared.with_nullable(true)
        } else {
            self.declared
        };
        (descriptor, self.values)
    }
}
