use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};

use crate::descriptor::MemberDescriptor;
use crate::member::Member;

// -----------------------------------------------------------------------------
// TypeDescriptor

/// The member table of `T`, sorted by member name.
///
/// # Examples
///
/// ```
/// use crunchy_serialize::TypeDescriptor;
///
/// struct Point {
///     y: i32,
///     x: i32,
///     label: String,
/// }
///
/// let descriptor = TypeDescriptor::<Point>::builder("demo::Point", "Point")
///     .member::<i32>("y", |p| &p.y, |p| &mut p.y)
///     .member::<i32>("x", |p| &p.x, |p| &mut p.x)
///     .ignored::<String>("label")
///     .build();
///
/// let names: Vec<_> = descriptor.members().iter().map(|m| m.name()).collect();
/// assert_eq!(names, ["label", "x", "y"]);
/// assert_eq!(descriptor.walked().count(), 2);
/// ```
pub struct TypeDescriptor<T> {
    type_path: &'static str,
    type_name: &'static str,
    members: Box<[MemberDescriptor<T>]>,
}

impl<T> TypeDescriptor<T> {
    pub fn builder(type_path: &'static str, type_name: &'static str) -> TypeDescriptorBuilder<T> {
        TypeDescriptorBuilder {
            type_path,
            type_name,
            members: Vec::new(),
        }
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.type_path
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Every member, walked or not, in name order.
    #[inline]
    pub fn members(&self) -> &[MemberDescriptor<T>] {
        &self.members
    }

    /// The members the walker visits, in visiting order.
    pub fn walked(&self) -> impl Iterator<Item = &MemberDescriptor<T>> {
        self.members.iter().filter(|m| m.info().is_walked())
    }

    pub fn member(&self, name: &str) -> Option<&MemberDescriptor<T>> {
        self.members
            .binary_search_by(|m| m.name().cmp(name))
            .ok()
            .map(|index| &self.members[index])
    }
}

impl<T> Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_path", &self.type_path)
            .field("members", &self.members)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeDescriptorBuilder

/// Collects members in any order; [`build`](Self::build) sorts them.
pub struct TypeDescriptorBuilder<T> {
    type_path: &'static str,
    type_name: &'static str,
    members: Vec<MemberDescriptor<T>>,
}

impl<T> TypeDescriptorBuilder<T> {
    /// Adds a readable and writable member of type `M`.
    pub fn member<M: Member>(
        self,
        name: &'static str,
        get: fn(&T) -> &dyn Member,
        set: fn(&mut T) -> &mut dyn Member,
    ) -> Self {
        self.with(MemberDescriptor::new::<M>(name, get, set))
    }

    /// Adds a member that is listed but never walked.
    pub fn read_only<M: Member>(self, name: &'static str, get: fn(&T) -> &dyn Member) -> Self {
        self.with(MemberDescriptor::read_only::<M>(name, get))
    }

    /// Adds a member excluded from walking.
    pub fn ignored<M>(self, name: &'static str) -> Self {
        self.with(MemberDescriptor::ignored::<M>(name))
    }

    pub fn with(mut self, member: MemberDescriptor<T>) -> Self {
        self.members.push(member);
        self
    }

    /// Sorts members by name.
    ///
    /// # Panics
    ///
    /// If two members share a name.
    pub fn build(mut self) -> TypeDescriptor<T> {
        self.members.sort_by(|a, b| a.name().cmp(b.name()));
        if let Some(pair) = self.members.windows(2).find(|w| w[0].name() == w[1].name()) {
            panic!(
                "duplicate member `{}` in descriptor of `{}`",
                pair[0].name(),
                self.type_path
            );
        }

        TypeDescriptor {
            type_path: self.type_path,
            type_name: self.type_name,
            members: self.members.into_boxed_slice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TypeDescriptor;
    use crate::{Classification, ScalarKind};
    use alloc::string::String;

    #[derive(Default)]
    struct Sample {
        b: u8,
        a: String,
        c: [u16; 2],
    }

    fn descriptor() -> TypeDescriptor<Sample> {
        TypeDescriptor::<Sample>::builder("tests::Sample", "Sample")
            .member::<[u16; 2]>("c", |s| &s.c, |s| &mut s.c)
            .member::<u8>("b", |s| &s.b, |s| &mut s.b)
            .read_only::<String>("a", |s| &s.a)
            .build()
    }

    #[test]
    fn sorted_by_name() {
        let d = descriptor();
        let names: alloc::vec::Vec<_> = d.members().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(d.type_path(), "tests::Sample");
        assert_eq!(d.type_name(), "Sample");
    }

    #[test]
    fn walked_skips_read_only() {
        let d = descriptor();
        let walked: alloc::vec::Vec<_> = d.walked().map(|m| m.name()).collect();
        assert_eq!(walked, ["b", "c"]);
    }

    #[test]
    fn lookup_and_access() {
        let d = descriptor();
        let mut sample = Sample::default();

        let b = d.member("b").unwrap();
        assert_eq!(
            b.info().classification(),
            Some(Classification::Scalar(ScalarKind::U8))
        );
        assert!(b.get(&sample).is_some());
        assert!(b.get_mut(&mut sample).is_some());

        let a = d.member("a").unwrap();
        assert!(a.info().is_readable());
        assert!(a.get_mut(&mut sample).is_none());
        assert!(d.member("z").is_none());
    }

    #[test]
    #[should_panic(expected = "duplicate member `x`")]
    fn duplicate_names_panic() {
        struct Twice {
            x: i32,
        }
        TypeDescriptor::<Twice>::builder("tests::Twice", "Twice")
            .member::<i32>("x", |t| &t.x, |t| &mut t.x)
            .member::<i32>("x", |t| &t.x, |t| &mut t.x)
            .build();
    }
}
