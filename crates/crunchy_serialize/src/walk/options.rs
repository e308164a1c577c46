#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Text written in place of a null member under [`NullEncoding::Sentinel`].
pub const NULL_SENTINEL: &str = "\u{0}crunchy:null\u{0}";

/// Default for [`WalkOptions::recursion_limit`].
pub const DEFAULT_RECURSION_LIMIT: u32 = 128;

// -----------------------------------------------------------------------------
// Depth

/// How many levels of nested objects the walker may enter.
///
/// The value passed in is the top level. `Limited(1)` walks the top-level
/// object's members but not into any nested object; `Limited(0)` walks
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Depth {
    #[default]
    Unbounded,
    Limited(u32),
}

impl Depth {
    #[inline]
    pub const fn is_exhausted(self) -> bool {
        matches!(self, Depth::Limited(0))
    }

    /// The budget one level down.
    #[inline]
    pub const fn descend(self) -> Depth {
        match self {
            Depth::Unbounded => Depth::Unbounded,
            Depth::Limited(n) => Depth::Limited(n.saturating_sub(1)),
        }
    }
}

// -----------------------------------------------------------------------------
// NullEncoding

/// How null members are marked on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NullEncoding {
    /// A null member is written as the string [`NULL_SENTINEL`]. Nullable
    /// members are probed for it on decode, so a non-null nullable member
    /// whose encoding starts with the sentinel cannot be encoded.
    #[default]
    Sentinel,
    /// Nullable members are preceded by one byte, `0` for null and `1`
    /// otherwise. Not wire compatible with `Sentinel`.
    PresenceFlag,
}

// -----------------------------------------------------------------------------
// DepthPolicy

/// What happens when the depth budget runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DepthPolicy {
    /// Write nothing for the subtree; on decode leave the member as the
    /// enclosing value's allocation left it.
    #[default]
    Skip,
    /// Fail with [`SerializeError::DepthExhausted`](crate::SerializeError::DepthExhausted).
    Fail,
}

// -----------------------------------------------------------------------------
// WalkOptions

/// Settings for one automatic encode or decode.
///
/// Writer and reader must use equal options.
///
/// ```
/// use crunchy_serialize::{Depth, NullEncoding, WalkOptions};
///
/// let options = WalkOptions::new()
///     .with_depth(2)
///     .with_nulls(NullEncoding::PresenceFlag);
///
/// assert_eq!(options.depth, Depth::Limited(2));
/// assert_eq!(WalkOptions::default().depth, Depth::Unbounded);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct WalkOptions {
    pub depth: Depth,
    pub nulls: NullEncoding,
    pub depth_policy: DepthPolicy,
    /// Hard cap on nesting, applied even when `depth` is unbounded.
    pub recursion_limit: u32,
}

impl WalkOptions {
    pub const fn new() -> Self {
        Self {
            depth: Depth::Unbounded,
            nulls: NullEncoding::Sentinel,
            depth_policy: DepthPolicy::Skip,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    #[inline]
    pub const fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Depth::Limited(depth);
        self
    }

    #[inline]
    pub const fn unbounded(mut self) -> Self {
        self.depth = Depth::Unbounded;
        self
    }

    #[inline]
    pub const fn with_nulls(mut self, nulls: NullEncoding) -> Self {
        self.nulls = nulls;
        self
    }

    #[inline]
    pub const fn with_depth_policy(mut self, policy: DepthPolicy) -> Self {
        self.depth_policy = policy;
        self
    }

    #[inline]
    pub const fn with_recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }
}

impl Default for WalkOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_budget() {
        assert!(!Depth::Unbounded.is_exhausted());
        assert!(!Depth::Unbounded.descend().is_exhausted());
        assert!(!Depth::Limited(1).is_exhausted());
        assert!(Depth::Limited(1).descend().is_exhausted());
        assert_eq!(Depth::Limited(0).descend(), Depth::Limited(0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn options_from_ron() {
        let options: WalkOptions =
            ron::from_str("(depth: Limited(3), nulls: PresenceFlag)").unwrap();
        assert_eq!(options.depth, Depth::Limited(3));
        assert_eq!(options.nulls, NullEncoding::PresenceFlag);
        assert_eq!(options.depth_policy, DepthPolicy::Skip);
        assert_eq!(options.recursion_limit, DEFAULT_RECURSION_LIMIT);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn options_json_round_trip() {
        let options = WalkOptions::new()
            .with_depth(1)
            .with_depth_policy(DepthPolicy::Fail);
        let json = serde_json::to_string(&options).unwrap();
        let back: WalkOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);

        let partial: WalkOptions = serde_json::from_str(r#"{"recursion_limit": 8}"#).unwrap();
        assert_eq!(partial, WalkOptions::new().with_recursion_limit(8));
    }
}
