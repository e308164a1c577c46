//! The automatic codec: walks a [`Describe`] value member by member.
//!
//! # Encoding
//!
//! For each walked member, in name order:
//!
//! - a null member writes the null marker (see [`NullEncoding`]);
//! - a scalar or enumeration is written directly;
//! - an array of scalars writes its count and elements;
//! - a [`Serializable`](crate::Serializable) member encodes itself;
//! - anything else that is [`Describe`] is walked one level deeper.
//!
//! A nested object past the depth budget writes nothing, null or not. Only
//! nullable members are checked for the null marker on decode.
//!
//! Decoding mirrors this, and runs each type's initialization before or
//! after member assignment as its [`ConstructionHint`] says.
//!
//! The format has no tags. Reading with a type whose member names or types
//! differ from the writer's gives wrong values, not an error.
//!
//! [`ConstructionHint`]: crate::ConstructionHint

// -----------------------------------------------------------------------------
// Modules

mod decode;
mod encode;
mod member_path;
mod options;

// -----------------------------------------------------------------------------
// Exports

pub use options::{DEFAULT_RECURSION_LIMIT, Depth, DepthPolicy, NULL_SENTINEL, NullEncoding, WalkOptions};

use crunchy_buffer::{ByteBuffer, ByteWriter};

use crate::descriptor::MemberInfo;
use crate::{Classification, SerializeError};
use crate::object::{Describe, Object};

// -----------------------------------------------------------------------------
// Entry points

/// Encodes `value` with the automatic codec.
///
/// ```
/// use crunchy_serialize::{Describe, WalkOptions};
///
/// #[derive(Describe, Debug, PartialEq)]
/// struct Score {
///     player: String,
///     points: u32,
/// }
///
/// let score = Score { player: "ada".into(), points: 42 };
/// let mut buffer = crunchy_serialize::serialize_automatic(&score, WalkOptions::default()).unwrap();
///
/// // `player` sorts before `points`
/// assert_eq!(buffer.read_string().unwrap(), "ada");
/// assert_eq!(buffer.read_u32().unwrap(), 42);
/// ```
pub fn serialize_automatic<T: Describe>(
    value: &T,
    options: WalkOptions,
) -> Result<ByteBuffer, SerializeError> {
    let mut writer = ByteWriter::new();
    serialize_object(value, &mut writer, options)?;
    Ok(writer.into_buffer())
}

/// Decodes a `T` written by [`serialize_automatic`] with equal options.
///
/// With a depth of zero nothing is read and the allocated value is returned.
pub fn deserialize_automatic<T: Describe>(
    buffer: &mut ByteBuffer,
    options: WalkOptions,
) -> Result<T, SerializeError> {
    let mut value = T::allocate();
    deserialize_object(&mut value, buffer, options)?;
    Ok(value)
}

/// Encodes any [`Object`] into `writer`.
pub fn serialize_object(
    value: &dyn Object,
    writer: &mut ByteWriter,
    options: WalkOptions,
) -> Result<(), SerializeError> {
    Walker::new(options).encode_object(value, writer, options.depth)
}

/// Decodes into `target`, which should be freshly allocated.
pub fn deserialize_object(
    target: &mut dyn Object,
    buffer: &mut ByteBuffer,
    options: WalkOptions,
) -> Result<(), SerializeError> {
    Walker::new(options).decode_object(target, buffer, options.depth)
}

// -----------------------------------------------------------------------------
// Walker

/// State of one encode or decode.
struct Walker {
    options: WalkOptions,
    level: u32,
    #[cfg(all(debug_assertions, feature = "debug"))]
    path: member_path::MemberPath,
}

impl Walker {
    fn new(options: WalkOptions) -> Self {
        Self {
            options,
            level: 0,
            #[cfg(all(debug_assertions, feature = "debug"))]
            path: member_path::MemberPath::new(),
        }
    }

    fn enter(&mut self) -> Result<(), SerializeError> {
        self.level += 1;
        if self.level > self.options.recursion_limit {
            return Err(SerializeError::RecursionLimit {
                limit: self.options.recursion_limit,
            });
        }
        Ok(())
    }

    #[inline]
    fn leave(&mut self) {
        self.level -= 1;
    }

    fn depth_exhausted(&self, type_path: &'static str) -> Result<(), SerializeError> {
        match self.options.depth_policy {
            DepthPolicy::Skip => {
                log::trace!("depth budget exhausted, skipping `{type_path}`");
                Ok(())
            }
            DepthPolicy::Fail => Err(SerializeError::DepthExhausted { type_path }),
        }
    }

    /// Members of unsupported types fail even when null.
    fn check_supported(info: &MemberInfo) -> Result<(), SerializeError> {
        match info.classification() {
            Some(Classification::Unsupported) => Err(SerializeError::UnsupportedType {
                type_path: info.type_name(),
            }),
            _ => Ok(()),
        }
    }

    /// Nested objects past the depth budget are left out entirely, null
    /// or not.
    fn depth_skips(info: &MemberInfo, depth: Depth) -> bool {
        info.classification() == Some(Classification::Complex) && depth.descend().is_exhausted()
    }

    /// Runs `f` for member `name`, attaching the member path to its error.
    fn in_member<R>(
        &mut self,
        name: &'static str,
        f: impl FnOnce(&mut Self) -> Result<R, SerializeError>,
    ) -> Result<R, SerializeError> {
        #[cfg(all(debug_assertions, feature = "debug"))]
        self.path.push(name);
        #[cfg(not(all(debug_assertions, feature = "debug")))]
        let _ = name;

        let result = f(self);

        #[cfg(all(debug_assertions, feature = "debug"))]
        let result = {
            let result = result.map_err(|error| self.path.annotate(error));
            self.path.pop();
            result
        };

        result
    }
}

/// Whether `bytes` begins with an encoded [`NULL_SENTINEL`].
fn starts_with_sentinel(bytes: &[u8]) -> bool {
    let Some((count, units)) = bytes.split_first_chunk::<4>() else {
        return false;
    };
    let expected = NULL_SENTINEL.encode_utf16();
    let len = expected.clone().count();
    usize::try_from(i32::from_le_bytes(*count)) == Ok(len)
        && units
            .chunks_exact(2)
            .take(len)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .eq(expected)
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::{
        ByteBuffer, ByteWriter, Depth, DepthPolicy, Describe, NULL_SENTINEL, NullEncoding,
        ScalarEnum, Serializable, SerializeError, WalkOptions, deserialize_automatic,
        serialize_automatic,
    };

    fn round_trip<T: Describe>(value: &T, options: WalkOptions) -> T {
        let mut buffer = serialize_automatic(value, options).unwrap();
        let back = deserialize_automatic(&mut buffer, options).unwrap();
        assert!(buffer.is_exhausted());
        back
    }

    fn sentinel_bytes() -> Vec<u8> {
        let mut writer = ByteWriter::new();
        writer.write_str(NULL_SENTINEL).unwrap();
        writer.into_bytes()
    }

    // -------------------------------------------------------------------------

    #[derive(Describe, Debug, PartialEq)]
    struct Score {
        points: u32,
        player: String,
    }

    #[test]
    fn members_are_written_in_name_order() {
        let score = Score {
            points: 7,
            player: String::from("ab"),
        };
        let buffer = serialize_automatic(&score, WalkOptions::new()).unwrap();

        assert_eq!(
            buffer.as_bytes(),
            [2, 0, 0, 0, b'a', 0, b'b', 0, 7, 0, 0, 0]
        );
        assert_eq!(round_trip(&score, WalkOptions::new()), score);
    }

    #[derive(Describe)]
    struct Forward {
        alpha: u16,
        zeta: u8,
    }

    #[derive(Describe)]
    struct Backward {
        zeta: u8,
        alpha: u16,
    }

    #[test]
    fn declaration_order_does_not_matter() {
        let a = serialize_automatic(&Forward { alpha: 0x0102, zeta: 3 }, WalkOptions::new()).unwrap();
        let b = serialize_automatic(&Backward { zeta: 3, alpha: 0x0102 }, WalkOptions::new()).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.as_bytes(), [0x02, 0x01, 3]);
    }

    // -------------------------------------------------------------------------

    #[derive(Describe, Debug, PartialEq)]
    struct Leaf {
        x: u8,
    }

    #[derive(Describe, Debug, PartialEq)]
    struct Inner {
        leaf: Leaf,
        value: u32,
    }

    #[derive(Describe, Debug, PartialEq)]
    struct Outer {
        id: u8,
        inner: Inner,
        extra: Option<Inner>,
    }

    fn outer() -> Outer {
        Outer {
            id: 9,
            inner: Inner {
                leaf: Leaf { x: 5 },
                value: 300,
            },
            extra: None,
        }
    }

    #[test]
    fn nested_objects_round_trip() {
        let mut value = outer();
        assert_eq!(round_trip(&value, WalkOptions::new()), value);

        value.extra = Some(Inner {
            leaf: Leaf { x: 1 },
            value: 2,
        });
        assert_eq!(round_trip(&value, WalkOptions::new()), value);
    }

    #[test]
    fn depth_one_writes_only_top_level_scalars() {
        let options = WalkOptions::new().with_depth(1);
        let mut buffer = serialize_automatic(&outer(), options).unwrap();

        // `extra` and `inner` are both skipped, null or not.
        assert_eq!(buffer.as_bytes(), [9]);

        let back: Outer = deserialize_automatic(&mut buffer, options).unwrap();
        assert_eq!(back.id, 9);
        assert_eq!(back.inner, Inner { leaf: Leaf { x: 0 }, value: 0 });
        assert!(buffer.is_exhausted());
    }

    #[derive(Describe, Debug, PartialEq)]
    struct Trimmed {
        a: Leaf,
        b: Option<u8>,
        c: u16,
    }

    #[test]
    fn skipped_member_before_a_null_keeps_alignment() {
        let options = WalkOptions::new().with_depth(1);
        let value = Trimmed {
            a: Leaf { x: 5 },
            b: None,
            c: 77,
        };
        let mut buffer = serialize_automatic(&value, options).unwrap();

        let mut expect = sentinel_bytes();
        expect.extend_from_slice(&[77, 0]);
        assert_eq!(buffer.as_bytes(), expect);

        let back: Trimmed = deserialize_automatic(&mut buffer, options).unwrap();
        assert_eq!(
            back,
            Trimmed {
                a: Leaf { x: 0 },
                b: None,
                c: 77,
            }
        );
        assert!(buffer.is_exhausted());
    }

    #[test]
    fn depth_two_stops_before_leaves() {
        let options = WalkOptions::new().with_depth(2);
        let back = round_trip(&outer(), options);
        assert_eq!(back.inner.value, 300);
        assert_eq!(back.inner.leaf, Leaf { x: 0 });
    }

    #[test]
    fn depth_zero_walks_nothing() {
        let options = WalkOptions::new().with_depth(0);
        let mut buffer = serialize_automatic(&outer(), options).unwrap();
        assert!(buffer.is_empty());

        let back: Outer = deserialize_automatic(&mut buffer, options).unwrap();
        assert_eq!(back.id, 0);
    }

    #[test]
    fn exhausted_depth_can_fail() {
        let options = WalkOptions::new()
            .with_depth(1)
            .with_depth_policy(DepthPolicy::Fail);
        let err = serialize_automatic(&outer(), options).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            SerializeError::DepthExhausted { .. }
        ));
    }

    #[test]
    fn unbounded_is_the_default() {
        assert_eq!(WalkOptions::default().depth, Depth::Unbounded);
    }

    // -------------------------------------------------------------------------

    #[derive(Describe, Debug, PartialEq)]
    struct Profile {
        nick: Option<String>,
        age: u16,
        tags: Option<Vec<u8>>,
    }

    #[test]
    fn null_members_keep_alignment() {
        let profile = Profile {
            nick: None,
            age: 31,
            tags: None,
        };
        let buffer = serialize_automatic(&profile, WalkOptions::new()).unwrap();

        let mut expect = Vec::new();
        expect.extend_from_slice(&[31, 0]);
        expect.extend(sentinel_bytes());
        expect.extend(sentinel_bytes());
        assert_eq!(buffer.as_bytes(), expect);

        assert_eq!(round_trip(&profile, WalkOptions::new()), profile);

        let full = Profile {
            nick: Some(String::from("zed")),
            age: 2,
            tags: Some(vec![1, 2]),
        };
        assert_eq!(round_trip(&full, WalkOptions::new()), full);
    }

    #[test]
    fn presence_flag_nulls() {
        let options = WalkOptions::new().with_nulls(NullEncoding::PresenceFlag);
        let profile = Profile {
            nick: Some(String::new()),
            age: 1,
            tags: None,
        };
        let buffer = serialize_automatic(&profile, options).unwrap();
        assert_eq!(buffer.as_bytes(), [1, 0, 1, 0, 0, 0, 0, 0]);
        assert_eq!(round_trip(&profile, options), profile);
    }

    #[derive(Describe, Debug, PartialEq)]
    struct Note {
        text: String,
    }

    #[test]
    fn sentinel_text_in_a_plain_member_is_content() {
        let note = Note {
            text: String::from(NULL_SENTINEL),
        };
        assert_eq!(round_trip(&note, WalkOptions::new()), note);

        let mut buffer = ByteBuffer::new(sentinel_bytes());
        let note: Note = deserialize_automatic(&mut buffer, WalkOptions::new()).unwrap();
        assert_eq!(note.text, NULL_SENTINEL);
    }

    #[test]
    fn sentinel_text_in_a_nullable_member_is_rejected() {
        let profile = Profile {
            nick: Some(String::from(NULL_SENTINEL)),
            age: 3,
            tags: None,
        };
        let err = serialize_automatic(&profile, WalkOptions::new()).unwrap_err();
        assert!(matches!(err.root_cause(), SerializeError::SentinelCollision));

        #[cfg(all(debug_assertions, feature = "debug"))]
        assert_eq!(err.member_path(), Some("nick"));

        let options = WalkOptions::new().with_nulls(NullEncoding::PresenceFlag);
        assert_eq!(round_trip(&profile, options), profile);
    }

    #[derive(Describe, Debug, PartialEq)]
    struct Header {
        a: Option<u8>,
        b: u16,
    }

    #[derive(Describe, Debug, PartialEq)]
    struct Envelope {
        header: Header,
        tail: u8,
    }

    #[test]
    fn nested_object_starting_with_a_null_is_not_null() {
        let value = Envelope {
            header: Header { a: None, b: 513 },
            tail: 4,
        };
        let buffer = serialize_automatic(&value, WalkOptions::new()).unwrap();

        let mut expect = sentinel_bytes();
        expect.extend_from_slice(&[1, 2, 4]);
        assert_eq!(buffer.as_bytes(), expect);

        assert_eq!(round_trip(&value, WalkOptions::new()), value);
    }

    // -------------------------------------------------------------------------

    const MARKER: u32 = 1000;

    fn record(this: &mut Stamped) {
        this.seen = this.value;
        this.value = MARKER;
    }

    #[derive(Describe)]
    #[crunchy(hint = BeforeAssignment, init = record)]
    struct Stamped {
        value: u32,
        #[crunchy(ignore)]
        seen: u32,
    }

    fn record_late(this: &mut StampedLate) {
        this.seen = this.value;
        this.value = MARKER;
    }

    #[derive(Describe)]
    #[crunchy(hint = AfterAssignment, init = record_late)]
    struct StampedLate {
        value: u32,
        #[crunchy(ignore)]
        seen: u32,
    }

    #[derive(Describe)]
    struct Holder {
        early: Stamped,
        late: StampedLate,
    }

    #[test]
    fn hints_order_initialization() {
        let holder = Holder {
            early: Stamped { value: 4, seen: 0 },
            late: StampedLate { value: 6, seen: 0 },
        };
        let back = round_trip(&holder, WalkOptions::new());

        // Before assignment the decoded value overwrites the marker.
        assert_eq!(back.early.value, 4);
        assert_eq!(back.early.seen, 0);
        // After assignment the marker wins over the decoded value.
        assert_eq!(back.late.value, MARKER);
        assert_eq!(back.late.seen, 6);
    }

    #[test]
    fn ignored_members_are_not_written() {
        let stamped = Stamped { value: 1, seen: 77 };
        let buffer = serialize_automatic(&stamped, WalkOptions::new()).unwrap();
        assert_eq!(buffer.len(), 4);
    }

    // -------------------------------------------------------------------------

    #[derive(Describe, Debug)]
    struct Position {
        name: String,
        x: f32,
    }

    #[test]
    fn unsupported_member_fails_at_encounter() {
        let value = Position {
            name: String::from("p"),
            x: 1.5,
        };
        let err = serialize_automatic(&value, WalkOptions::new()).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            SerializeError::UnsupportedType { type_path: "f32" }
        ));

        #[cfg(all(debug_assertions, feature = "debug"))]
        assert_eq!(err.member_path(), Some("x"));

        let mut buffer = ByteBuffer::new(vec![0; 16]);
        let err = deserialize_automatic::<Position>(&mut buffer, WalkOptions::new()).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            SerializeError::UnsupportedType { .. }
        ));
    }

    #[derive(Describe)]
    struct Layered {
        maybe: Option<Option<u8>>,
    }

    #[test]
    fn nested_nullable_is_unsupported_even_when_null() {
        let err = serialize_automatic(&Layered { maybe: None }, WalkOptions::new()).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            SerializeError::UnsupportedType { .. }
        ));
    }

    // -------------------------------------------------------------------------

    #[derive(Describe, Debug, PartialEq)]
    struct Node {
        value: u8,
        next: Option<Box<Node>>,
    }

    fn chain(len: u8) -> Node {
        let mut node = Node {
            value: 0,
            next: None,
        };
        for value in 1..len {
            node = Node {
                value,
                next: Some(Box::new(node)),
            };
        }
        node
    }

    #[test]
    fn recursive_types_round_trip() {
        let options = WalkOptions::new().with_nulls(NullEncoding::PresenceFlag);
        for len in 1..=6 {
            let value = chain(len);
            assert_eq!(round_trip(&value, options), value);
        }

        assert_eq!(round_trip(&chain(1), WalkOptions::new()), chain(1));
    }

    #[test]
    fn nullable_value_starting_with_a_null_is_rejected() {
        // `next` sorts first, so a non-null `next` whose own `next` is null
        // would encode exactly like a null.
        let err = serialize_automatic(&chain(2), WalkOptions::new()).unwrap_err();
        assert!(matches!(err.root_cause(), SerializeError::SentinelCollision));

        #[cfg(all(debug_assertions, feature = "debug"))]
        assert_eq!(err.member_path(), Some("next"));
    }

    #[test]
    fn recursion_limit() {
        let options = WalkOptions::new().with_recursion_limit(3);
        let err = serialize_automatic(&chain(5), options).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            SerializeError::RecursionLimit { limit: 3 }
        ));

        #[cfg(all(debug_assertions, feature = "debug"))]
        assert_eq!(err.member_path(), Some("next.next.next"));
    }

    // -------------------------------------------------------------------------

    #[derive(ScalarEnum, Debug, Clone, Copy, PartialEq)]
    #[repr(i8)]
    enum E8 {
        Low = -3,
        High = 3,
    }

    #[derive(ScalarEnum, Debug, Clone, Copy, PartialEq)]
    #[repr(u8)]
    enum U8 {
        A,
        B,
    }

    #[derive(ScalarEnum, Debug, Clone, Copy, PartialEq)]
    #[repr(i16)]
    enum E16 {
        Neg = -300,
        Pos = 300,
    }

    #[derive(ScalarEnum, Debug, Clone, Copy, PartialEq)]
    #[repr(u16)]
    enum U16 {
        Free = 1,
        Paid = 40,
    }

    #[derive(ScalarEnum, Debug, Clone, Copy, PartialEq)]
    #[repr(i32)]
    enum E32 {
        Min = -70_000,
        Max = 70_000,
    }

    #[derive(ScalarEnum, Debug, Clone, Copy, PartialEq)]
    #[repr(u32)]
    enum U32 {
        Zero,
        Big = 4_000_000_000,
    }

    #[derive(ScalarEnum, Debug, Clone, Copy, PartialEq)]
    #[repr(i64)]
    enum E64 {
        Far = -5_000_000_000,
        Near = 1,
    }

    #[derive(ScalarEnum, Debug, Clone, Copy, PartialEq)]
    #[repr(u64)]
    enum U64 {
        One = 1,
        Huge = 10_000_000_000,
    }

    #[derive(ScalarEnum, Debug, Clone, Copy, PartialEq)]
    enum Plain {
        First,
        Second,
    }

    #[derive(Describe, Debug, PartialEq)]
    struct AllEnums {
        a: E8,
        b: U8,
        c: E16,
        d: U16,
        e: E32,
        f: U32,
        g: E64,
        h: U64,
        i: Plain,
    }

    #[test]
    fn enums_write_their_underlying_integer() {
        let value = AllEnums {
            a: E8::Low,
            b: U8::B,
            c: E16::Neg,
            d: U16::Paid,
            e: E32::Max,
            f: U32::Big,
            g: E64::Far,
            h: U64::Huge,
            i: Plain::Second,
        };
        let buffer = serialize_automatic(&value, WalkOptions::new()).unwrap();
        assert_eq!(buffer.len(), 1 + 1 + 2 + 2 + 4 + 4 + 8 + 8 + 4);
        assert_eq!(&buffer.as_bytes()[4..6], [40, 0]);
        assert_eq!(round_trip(&value, WalkOptions::new()), value);
    }

    #[derive(Describe, Debug)]
    struct Plan {
        tier: U16,
    }

    #[test]
    fn unknown_discriminant() {
        let mut buffer = ByteBuffer::new(vec![2, 0]);
        let err = deserialize_automatic::<Plan>(&mut buffer, WalkOptions::new()).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            SerializeError::UnknownDiscriminant { .. }
        ));
    }

    // -------------------------------------------------------------------------

    #[derive(Describe, Debug, PartialEq)]
    struct Samples {
        values: Vec<i16>,
        fixed: [u8; 3],
        names: Vec<String>,
        empty: Vec<u64>,
    }

    #[test]
    fn arrays_round_trip() {
        let value = Samples {
            values: vec![-1, 2, -3],
            fixed: [7, 8, 9],
            names: vec![String::from("a"), String::new()],
            empty: Vec::new(),
        };
        assert_eq!(round_trip(&value, WalkOptions::new()), value);
    }

    // -------------------------------------------------------------------------

    #[derive(Debug, PartialEq)]
    struct Checksum(u32);

    impl Serializable for Checksum {
        fn serialize(&self, writer: &mut ByteWriter) -> Result<(), SerializeError> {
            writer.write_u32(self.0 ^ 0xFFFF_FFFF);
            Ok(())
        }

        fn deserialize(&mut self, buffer: &mut ByteBuffer) -> Result<(), SerializeError> {
            self.0 = buffer.read_u32()? ^ 0xFFFF_FFFF;
            Ok(())
        }
    }

    impl crate::Construct for Checksum {
        fn allocate() -> Self {
            Checksum(0)
        }
    }

    crate::impl_manual!(Checksum);

    #[derive(Describe, Debug, PartialEq)]
    struct Packet {
        body: String,
        sum: Checksum,
    }

    #[test]
    fn manual_members_encode_themselves() {
        let packet = Packet {
            body: String::new(),
            sum: Checksum(0),
        };
        let buffer = serialize_automatic(&packet, WalkOptions::new()).unwrap();
        assert_eq!(buffer.as_bytes(), [0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(round_trip(&packet, WalkOptions::new()), packet);
    }

    // -------------------------------------------------------------------------

    #[test]
    fn truncated_input_is_a_bounds_fault() {
        let score = Score {
            points: 1,
            player: String::from("long name"),
        };
        let bytes = serialize_automatic(&score, WalkOptions::new())
            .unwrap()
            .into_inner();

        let mut buffer = ByteBuffer::from_slice(&bytes[..bytes.len() - 2]);
        let err = deserialize_automatic::<Score>(&mut buffer, WalkOptions::new()).unwrap_err();
        assert!(err.is_bounds_fault());
    }
}
