#![cfg_attr(not(all(debug_assertions, feature = "debug")), allow(dead_code))]

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::SerializeError;

/// Names of the members currently being walked, outermost first.
#[derive(Default, Clone)]
pub(super) struct MemberPath {
    names: Vec<&'static str>,
}

impl MemberPath {
    pub const fn new() -> Self {
        Self { names: Vec::new() }
    }

    pub fn push(&mut self, name: &'static str) {
        self.names.push(name);
    }

    pub fn pop(&mut self) {
        self.names.pop();
    }

    /// Wraps `error` with the current path, unless it already carries one.
    pub fn annotate(&self, error: SerializeError) -> SerializeError {
        if matches!(error, SerializeError::InMember { .. }) {
            return error;
        }
        SerializeError::InMember {
            path: self.joined(),
            source: Box::new(error),
        }
    }

    fn joined(&self) -> String {
        self.names.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::MemberPath;
    use crate::SerializeError;

    #[test]
    fn innermost_path_wins() {
        let mut path = MemberPath::new();
        path.push("inventory");
        path.push("slots");

        let inner = path.annotate(SerializeError::SentinelCollision);
        assert_eq!(inner.member_path(), Some("inventory.slots"));

        path.pop();
        let outer = path.annotate(inner);
        assert_eq!(outer.member_path(), Some("inventory.slots"));
        assert!(matches!(outer.root_cause(), SerializeError::SentinelCollision));
    }
}
