use crunchy_buffer::ByteBuffer;

use super::{Depth, NULL_SENTINEL, NullEncoding, Walker};
use crate::SerializeError;
use crate::construct::ConstructionHint;
use crate::descriptor::MemberInfo;
use crate::member::MemberMut;
use crate::object::Object;
use crate::scalar::read_scalar;

impl Walker {
    pub(super) fn decode_object(
        &mut self,
        object: &mut dyn Object,
        buffer: &mut ByteBuffer,
        depth: Depth,
    ) -> Result<(), SerializeError> {
        if depth.is_exhausted() {
            return self.depth_exhausted(object.object_type_path());
        }
        self.enter()?;

        let hint = object.hint();
        if hint == ConstructionHint::BeforeAssignment {
            object.run_initializer();
        }

        for index in 0..object.field_count() {
            let Some(info) = object.field_info(index) else {
                continue;
            };
            if !info.is_walked() {
                continue;
            }
            let Some(member) = object.field_mut(index) else {
                continue;
            };

            self.in_member(info.name(), |this| {
                Self::check_supported(info)?;
                if Self::depth_skips(info, depth) {
                    return this.depth_exhausted(info.type_name());
                }
                this.decode_member(info, member.member_mut(), buffer, depth, false)
            })?;
        }

        if hint == ConstructionHint::AfterAssignment {
            object.run_initializer();
        }

        self.leave();
        Ok(())
    }

    fn decode_member(
        &mut self,
        info: &'static MemberInfo,
        member: MemberMut<'_>,
        buffer: &mut ByteBuffer,
        depth: Depth,
        in_nullable: bool,
    ) -> Result<(), SerializeError> {
        match member {
            MemberMut::Nullable(_) if in_nullable => Err(SerializeError::UnsupportedType {
                type_path: info.type_name(),
            }),
            MemberMut::Nullable(slot) => {
                let null = match self.options.nulls {
                    NullEncoding::PresenceFlag => !buffer.read_bool()?,
                    NullEncoding::Sentinel if buffer.next_is_string(NULL_SENTINEL) => {
                        buffer.read_string()?;
                        true
                    }
                    NullEncoding::Sentinel => false,
                };
                if null {
                    log::trace!("read null for `{}`", info.name());
                    return Ok(());
                }
                let inner = slot.fill();
                self.decode_member(info, inner.member_mut(), buffer, depth, true)
            }
            MemberMut::Scalar(slot) => {
                let value = read_scalar(buffer, slot.kind())?;
                slot.assign(value)
            }
            MemberMut::Array(slot) => slot.decode(buffer),
            MemberMut::Manual(manual) => manual.deserialize(buffer),
            MemberMut::Complex(object) => {
                object.reset_to_allocated();
                self.decode_object(object, buffer, depth.descend())
            }
            MemberMut::Unsupported(type_path) => Err(SerializeError::UnsupportedType { type_path }),
        }
    }
}
