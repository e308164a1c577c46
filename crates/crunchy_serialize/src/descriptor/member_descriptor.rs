use core::fmt::{Debug, Formatter};

use crate::Classification;
use crate::member::Member;

// -----------------------------------------------------------------------------
// MemberInfo

/// The type-independent part of a [`MemberDescriptor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberInfo {
    name: &'static str,
    type_name: &'static str,
    classification: Option<Classification>,
    ignore: bool,
    readable: bool,
    writable: bool,
}

impl MemberInfo {
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Name of the declared type, from [`core::any::type_name`].
    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// `None` for ignored members, whose type need not be a [`Member`].
    #[inline]
    pub const fn classification(&self) -> Option<Classification> {
        self.classification
    }

    #[inline]
    pub const fn is_ignored(&self) -> bool {
        self.ignore
    }

    #[inline]
    pub const fn is_readable(&self) -> bool {
        self.readable
    }

    #[inline]
    pub const fn is_writable(&self) -> bool {
        self.writable
    }

    /// Whether the walker visits this member.
    ///
    /// Both sides must agree on the member list, so a member is walked only
    /// if it is not ignored and can be both read and written.
    #[inline]
    pub const fn is_walked(&self) -> bool {
        !self.ignore && self.readable && self.writable
    }
}

// -----------------------------------------------------------------------------
// MemberDescriptor

/// One member of `T`: its [`MemberInfo`] plus accessors.
pub struct MemberDescriptor<T> {
    info: MemberInfo,
    get: Option<fn(&T) -> &dyn Member>,
    set: Option<fn(&mut T) -> &mut dyn Member>,
}

impl<T> MemberDescriptor<T> {
    /// A readable and writable member of type `M`.
    pub fn new<M: Member>(
        name: &'static str,
        get: fn(&T) -> &dyn Member,
        set: fn(&mut T) -> &mut dyn Member,
    ) -> Self {
        Self {
            info: MemberInfo {
                name,
                type_name: core::any::type_name::<M>(),
                classification: Some(M::classification()),
                ignore: false,
                readable: true,
                writable: true,
            },
            get: Some(get),
            set: Some(set),
        }
    }

    /// A member that can only be read. It is listed but never walked.
    pub fn read_only<M: Member>(name: &'static str, get: fn(&T) -> &dyn Member) -> Self {
        Self {
            info: MemberInfo {
                name,
                type_name: core::any::type_name::<M>(),
                classification: Some(M::classification()),
                ignore: false,
                readable: true,
                writable: false,
            },
            get: Some(get),
            set: None,
        }
    }

    /// A member excluded from walking.
    pub fn ignored<M>(name: &'static str) -> Self {
        Self {
            info: MemberInfo {
                name,
                type_name: core::any::type_name::<M>(),
                classification: None,
                ignore: true,
                readable: false,
                writable: false,
            },
            get: None,
            set: None,
        }
    }

    #[inline]
    pub const fn info(&self) -> &MemberInfo {
        &self.info
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.info.name
    }

    #[inline]
    pub fn get<'a>(&self, value: &'a T) -> Option<&'a dyn Member> {
        self.get.map(|get| get(value))
    }

    #[inline]
    pub fn get_mut<'a>(&self, value: &'a mut T) -> Option<&'a mut dyn Member> {
        self.set.map(|set| set(value))
    }
}

impl<T> Debug for MemberDescriptor<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(&self.info, f)
    }
}
