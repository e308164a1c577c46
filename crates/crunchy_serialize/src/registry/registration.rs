use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt::{Debug, Formatter};

use crunchy_buffer::{ByteBuffer, ByteWriter};

use crate::SerializeError;
use crate::construct::Construct;
use crate::manual::{Serializable, deserialize};
use crate::object::{Describe, Object, TypePath};

// -----------------------------------------------------------------------------
// Erased functions

#[derive(Clone, Copy)]
struct ManualFns {
    serialize: fn(&dyn Any, &mut ByteWriter) -> Result<(), SerializeError>,
    deserialize: fn(&mut ByteBuffer) -> Result<Box<dyn Any>, SerializeError>,
}

fn serialize_erased<T: Serializable + TypePath>(
    value: &dyn Any,
    writer: &mut ByteWriter,
) -> Result<(), SerializeError> {
    match value.downcast_ref::<T>() {
        Some(value) => value.serialize(writer),
        None => unreachable!("registration of `{}` called with another type", T::type_path()),
    }
}

fn deserialize_erased<T: Serializable + Construct + TypePath>(
    buffer: &mut ByteBuffer,
) -> Result<Box<dyn Any>, SerializeError> {
    Ok(Box::new(deserialize::<T>(buffer)?))
}

fn allocate_erased<T: Describe>() -> Box<dyn Object> {
    Box::new(T::allocate())
}

// -----------------------------------------------------------------------------
// TypeRegistration

/// Codec capabilities of one registered type.
#[derive(Clone, Copy)]
pub struct TypeRegistration {
    type_id: TypeId,
    type_path: &'static str,
    type_name: &'static str,
    allocate: Option<fn() -> Box<dyn Object>>,
    manual: Option<ManualFns>,
}

impl TypeRegistration {
    /// A registration with the automatic codec.
    pub fn of_automatic<T: Describe>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: T::type_path(),
            type_name: T::type_name(),
            allocate: Some(allocate_erased::<T>),
            manual: None,
        }
    }

    /// A registration with the manual codec.
    pub fn of_manual<T: Serializable + Construct + TypePath>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_path: T::type_path(),
            type_name: T::type_name(),
            allocate: None,
            manual: Some(ManualFns {
                serialize: serialize_erased::<T>,
                deserialize: deserialize_erased::<T>,
            }),
        }
    }

    /// Adds the capabilities of `other`, which must describe the same type.
    pub(crate) fn merge(&mut self, other: TypeRegistration) {
        debug_assert_eq!(self.type_id, other.type_id);
        self.allocate = self.allocate.or(other.allocate);
        self.manual = self.manual.or(other.manual);
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn is_automatic(&self) -> bool {
        self.allocate.is_some()
    }

    #[inline]
    pub fn is_manual(&self) -> bool {
        self.manual.is_some()
    }

    /// A freshly allocated value, if the type supports the automatic codec.
    pub fn allocate(&self) -> Option<Box<dyn Object>> {
        self.allocate.map(|allocate| allocate())
    }

    /// Encodes `value` with the manual codec.
    ///
    /// # Panics
    ///
    /// Panics if `value` is not of the registered type.
    pub fn serialize_manual(
        &self,
        value: &dyn Any,
        writer: &mut ByteWriter,
    ) -> Result<(), SerializeError> {
        match self.manual {
            Some(fns) => (fns.serialize)(value, writer),
            None => Err(self.contract_violation()),
        }
    }

    /// Decodes a value with the manual codec.
    ///
    /// Fails with [`SerializeError::ContractViolation`] before reading
    /// anything when the type has no manual codec.
    pub fn deserialize_manual(&self, buffer: &mut ByteBuffer) -> Result<Box<dyn Any>, SerializeError> {
        match self.manual {
            Some(fns) => (fns.deserialize)(buffer),
            None => Err(self.contract_violation()),
        }
    }

    fn contract_violation(&self) -> SerializeError {
        SerializeError::ContractViolation {
            type_path: self.type_path.into(),
        }
    }
}

impl Debug for TypeRegistration {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeRegistration")
            .field("type_path", &self.type_path)
            .field("automatic", &self.is_automatic())
            .field("manual", &self.is_manual())
            .finish()
    }
}
