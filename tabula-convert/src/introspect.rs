//! Record shape cache

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tabula_frame::descriptor::ShapeRef;
use tabula_frame::error::{Result, TabulaError};
use tabula_frame::record::{Record, Shape};

/// Process-wide cache of validated record shapes
///
/// Shapes are keyed by `TypeId`, built on first use and shared as
/// immutable `Arc`s afterwards. The cache is explicitly injected into
/// converters rather than living in a global, so callers control its
/// lifetime and sharing. Safe for concurrent use: a racing first use
/// builds the same shape twice and the first insert wins.
pub struct ShapeCache {
    shapes: RwLock<HashMap<TypeId, Arc<Shape>, ahash::RandomState>>,
}

impl ShapeCache {
    /// Empty cache
    pub fn new() -> Self {
        ShapeCache {
            shapes: RwLock::new(HashMap::default()),
        }
    }

    /// Shape of record type `T`, building and validating it on first use
    pub fn shape_of<T: Record>(&self) -> Result<Arc<Shape>> {
        self.shape_for(ShapeRef::of::<T>())
    }

    /// Shape behind a `ShapeRef`, building and validating it on first use
    pub fn shape_for(&self, shape_ref: ShapeRef) -> Result<Arc<Shape>> {
        {
            let shapes = self.shapes.read().unwrap_or_else(|e| e.into_inner());
            if let Some(shape) = shapes.get(&shape_ref.type_id()) {
                return Ok(Arc::clone(shape));
            }
        }

        // Built outside the lock; user shape code must not block the cache.
        let shape = shape_ref.shape();
        validate_shape(&shape)?;

        let mut shapes = self.shapes.write().unwrap_or_else(|e| e.into_inner());
        let entry = shapes
            .entry(shape_ref.type_id())
            .or_insert_with(|| Arc::new(shape));
        Ok(Arc::clone(entry))
    }

    /// Number of cached shapes
    pub fn len(&self) -> usize {
        self.shapes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    /// Whether the cache holds no shapes
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ShapeCache {
    fn default() -> Self {
        ShapeCache::new()
    }
}

fn validate_shape(shape: &Shape) -> Result<()> {
    if shape.properties().is_empty() {
        return Err(TabulaError::UnsupportedRecordShape {
            type_name: shape.name(),
        });
    }
    for (i, property) in shape.properties().iter().enumerate() {
        if shape.properties()[..i]
            .iter()
            .any(|p| p.name() == property.name())
        {
            return Err(TabulaError::DuplicateColumnName {
                name: property.name().to_string(),
            });
        }
    }
    Ok(())
}
