use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};

use crunchy_buffer::{ByteBuffer, ByteWriter};
use crunchy_utils::TypeIdMap;
use crunchy_utils::hash::{FixedHashState, HashMap, HashSet};

use super::TypeRegistration;
use crate::SerializeError;
use crate::construct::Construct;
use crate::manual::Serializable;
use crate::object::{Describe, Object, TypePath};
use crate::walk::{WalkOptions, deserialize_object};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of codec-capable types.
///
/// Used to decode values whose type is only known by name at runtime.
///
/// # Example
///
/// ```
/// use crunchy_serialize::{Describe, TypeRegistry, WalkOptions};
///
/// #[derive(Describe, Debug, PartialEq)]
/// struct Ping {
///     seq: u32,
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Ping>();
///
/// let mut buffer = crunchy_serialize::serialize_automatic(&Ping { seq: 9 }, WalkOptions::new()).unwrap();
/// let value = registry
///     .deserialize_automatic_named("Ping", &mut buffer, WalkOptions::new())
///     .unwrap();
///
/// assert_eq!(value.downcast_ref::<Ping>(), Some(&Ping { seq: 9 }));
/// ```
pub struct TypeRegistry {
    registrations: TypeIdMap<TypeRegistration>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
    #[cfg_attr(not(feature = "auto_register"), expect(dead_code, reason = "auto_register disabled"))]
    pub(crate) auto_available: bool,
}

impl Default for TypeRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create an empty [`TypeRegistry`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            registrations: TypeIdMap::new(),
            type_path_to_id: HashMap::with_hasher(FixedHashState),
            type_name_to_id: HashMap::with_hasher(FixedHashState),
            ambiguous_names: HashSet::with_hasher(FixedHashState),
            auto_available: false,
        }
    }

    fn add_new_type_indices(&mut self, registration: &TypeRegistration) {
        let type_name = registration.type_name();

        if !self.ambiguous_names.contains(type_name) {
            if self.type_name_to_id.contains_key(type_name) {
                log::warn!(
                    "type name `{type_name}` is ambiguous, look up `{}` by its full path",
                    registration.type_path(),
                );
                self.type_name_to_id.remove(type_name);
                self.ambiguous_names.insert(type_name);
            } else {
                self.type_name_to_id.insert(type_name, registration.type_id());
            }
        }

        self.type_path_to_id
            .insert(registration.type_path(), registration.type_id());
    }

    /// Inserts `registration`, or merges its capabilities into an existing one.
    pub fn insert(&mut self, registration: TypeRegistration) {
        match self.registrations.get_mut(&registration.type_id()) {
            Some(existing) => existing.merge(registration),
            None => {
                self.add_new_type_indices(&registration);
                self.registrations.insert(registration.type_id(), registration);
            }
        }
    }

    /// Registers `T` for the automatic codec.
    #[inline]
    pub fn register<T: Describe>(&mut self) {
        self.insert(TypeRegistration::of_automatic::<T>());
    }

    /// Registers `T` for the manual codec.
    #[inline]
    pub fn register_manual<T: Serializable + Construct + TypePath>(&mut self) {
        self.insert(TypeRegistration::of_manual::<T>());
    }

    /// Registers every non-generic type deriving `Describe` with
    /// `#[crunchy(auto_register)]`.
    ///
    /// Returns `true` if automatic registration works on this platform.
    /// Without the `auto_register` feature this does nothing and returns `false`.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            if !self.auto_available {
                crate::__macro_exports::auto_register::__register_types(self);
            }
            self.auto_available
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.registrations.contains(&type_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeRegistration> {
        self.registrations.get(&type_id)
    }

    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeRegistration> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `None` for unknown and for ambiguous names.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeRegistration> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Whether `type_name` matches more than one registered type.
    #[inline]
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeRegistration> {
        self.registrations.values()
    }

    /// Looks `name` up as a full type path, then as a short type name.
    pub fn resolve(&self, name: &str) -> Result<&TypeRegistration, SerializeError> {
        if let Some(registration) = self.get_with_type_path(name) {
            return Ok(registration);
        }
        if let Some(registration) = self.get_with_type_name(name) {
            return Ok(registration);
        }
        if self.is_ambiguous(name) {
            return Err(SerializeError::AmbiguousType { name: name.into() });
        }
        Err(SerializeError::UnknownType { name: name.into() })
    }

    /// Allocates the type called `name` and decodes it with the automatic codec.
    pub fn deserialize_automatic_named(
        &self,
        name: &str,
        buffer: &mut ByteBuffer,
        options: WalkOptions,
    ) -> Result<Box<dyn Object>, SerializeError> {
        let registration = self.resolve(name)?;
        let Some(mut value) = registration.allocate() else {
            return Err(SerializeError::UnsupportedType {
                type_path: registration.type_path(),
            });
        };
        deserialize_object(value.as_mut(), buffer, options)?;
        Ok(value)
    }

    /// Decodes the type called `name` with its manual codec.
    ///
    /// Fails with [`SerializeError::ContractViolation`] before reading
    /// anything when the type has no manual codec.
    pub fn deserialize_manual_named(
        &self,
        name: &str,
        buffer: &mut ByteBuffer,
    ) -> Result<Box<dyn Any>, SerializeError> {
        self.resolve(name)?.deserialize_manual(buffer)
    }

    /// Encodes a type-erased value with its registered manual codec.
    pub fn serialize_manual_dyn(&self, value: &dyn Any) -> Result<ByteBuffer, SerializeError> {
        let Some(registration) = self.get(value.type_id()) else {
            return Err(SerializeError::UnknownType {
                name: String::from("<unregistered type>"),
            });
        };
        let mut writer = ByteWriter::new();
        registration.serialize_manual(value, &mut writer)?;
        Ok(writer.into_buffer())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::TypeRegistry;
    use crate::{
        ByteBuffer, ByteWriter, Construct, Describe, Serializable, SerializeError, TypePath,
        WalkOptions,
    };

    #[derive(Describe, Debug, PartialEq)]
    struct Player {
        name: String,
        level: u8,
    }

    mod other {
        #[derive(crate::Describe)]
        pub struct Player {
            pub id: u32,
        }
    }

    #[derive(Debug, PartialEq)]
    struct Token(u64);

    impl Serializable for Token {
        fn serialize(&self, writer: &mut ByteWriter) -> Result<(), SerializeError> {
            writer.write_u64(self.0);
            Ok(())
        }

        fn deserialize(&mut self, buffer: &mut ByteBuffer) -> Result<(), SerializeError> {
            self.0 = buffer.read_u64()?;
            Ok(())
        }
    }

    impl Construct for Token {
        fn allocate() -> Self {
            Token(0)
        }
    }

    impl TypePath for Token {
        fn type_path() -> &'static str {
            "tests::Token"
        }

        fn type_name() -> &'static str {
            "Token"
        }
    }

    #[test]
    fn lookup_by_path_and_name() {
        let mut registry = TypeRegistry::new();
        registry.register::<Player>();

        let by_name = registry.get_with_type_name("Player").unwrap();
        let by_path = registry.get_with_type_path(Player::type_path()).unwrap();
        assert_eq!(by_name.type_id(), by_path.type_id());
        assert!(by_name.is_automatic());
        assert!(!by_name.is_manual());
    }

    #[test]
    fn ambiguous_names_are_refused() {
        let mut registry = TypeRegistry::new();
        registry.register::<Player>();
        registry.register::<other::Player>();

        assert!(registry.is_ambiguous("Player"));
        assert!(registry.get_with_type_name("Player").is_none());
        assert!(matches!(
            registry.resolve("Player"),
            Err(SerializeError::AmbiguousType { .. })
        ));
        assert!(registry.resolve(other::Player::type_path()).is_ok());
    }

    #[test]
    fn unknown_name() {
        let registry = TypeRegistry::new();
        let mut buffer = ByteBuffer::new(alloc::vec![1, 2, 3]);
        let err = registry
            .deserialize_automatic_named("Nope", &mut buffer, WalkOptions::new())
            .unwrap_err();
        assert!(matches!(err, SerializeError::UnknownType { .. }));
        assert_eq!(buffer.position(), 0);
    }

    #[test]
    fn automatic_by_name() {
        let mut registry = TypeRegistry::new();
        registry.register::<Player>();

        let player = Player {
            name: String::from("kit"),
            level: 7,
        };
        let mut buffer = crate::serialize_automatic(&player, WalkOptions::new()).unwrap();
        let value = registry
            .deserialize_automatic_named("Player", &mut buffer, WalkOptions::new())
            .unwrap();

        assert_eq!(value.downcast::<Player>().unwrap().as_ref(), &player);
    }

    #[test]
    fn manual_contract_is_checked_before_reading() {
        let mut registry = TypeRegistry::new();
        registry.register::<Player>();

        let mut buffer = ByteBuffer::new(alloc::vec![0; 8]);
        let err = registry
            .deserialize_manual_named("Player", &mut buffer)
            .unwrap_err();

        assert!(matches!(err, SerializeError::ContractViolation { .. }));
        assert_eq!(buffer.position(), 0);
    }

    #[test]
    fn manual_by_name_and_dyn() {
        let mut registry = TypeRegistry::new();
        registry.register_manual::<Token>();

        let mut buffer = registry.serialize_manual_dyn(&Token(77)).unwrap();
        assert_eq!(buffer.len(), 8);

        let value = registry.deserialize_manual_named("Token", &mut buffer).unwrap();
        assert_eq!(value.downcast_ref::<Token>(), Some(&Token(77)));

        assert!(matches!(
            registry.serialize_manual_dyn(&5_u8),
            Err(SerializeError::UnknownType { .. })
        ));
    }

    #[test]
    fn registering_twice_merges() {
        let mut registry = TypeRegistry::new();
        registry.register_manual::<Token>();
        registry.register_manual::<Token>();
        assert_eq!(registry.len(), 1);
    }
}
