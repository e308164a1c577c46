use crunchy_buffer::ByteWriter;

use super::{Depth, NULL_SENTINEL, NullEncoding, Walker, starts_with_sentinel};
use crate::SerializeError;
use crate::descriptor::MemberInfo;
use crate::member::MemberRef;
use crate::object::Object;
use crate::scalar::write_scalar;

impl Walker {
    pub(super) fn encode_object(
        &mut self,
        object: &dyn Object,
        writer: &mut ByteWriter,
        depth: Depth,
    ) -> Result<(), SerializeError> {
        if depth.is_exhausted() {
            return self.depth_exhausted(object.object_type_path());
        }
        self.enter()?;

        for index in 0..object.field_count() {
            let Some(info) = object.field_info(index) else {
                continue;
            };
            if !info.is_walked() {
                continue;
            }
            let Some(member) = object.field(index) else {
                continue;
            };

            self.in_member(info.name(), |this| {
                Self::check_supported(info)?;
                if Self::depth_skips(info, depth) {
                    return this.depth_exhausted(info.type_name());
                }
                this.encode_member(info, member.member_ref(), writer, depth, false)
            })?;
        }

        self.leave();
        Ok(())
    }

    fn encode_member(
        &mut self,
        info: &'static MemberInfo,
        member: MemberRef<'_>,
        writer: &mut ByteWriter,
        depth: Depth,
        in_nullable: bool,
    ) -> Result<(), SerializeError> {
        match member {
            MemberRef::Nullable(_) if in_nullable => Err(SerializeError::UnsupportedType {
                type_path: info.type_name(),
            }),
            MemberRef::Nullable(None) => {
                log::trace!("writing null for `{}`", info.name());
                match self.options.nulls {
                    NullEncoding::Sentinel => writer.write_str(NULL_SENTINEL)?,
                    NullEncoding::PresenceFlag => writer.write_bool(false),
                }
                Ok(())
            }
            MemberRef::Nullable(Some(inner)) => match self.options.nulls {
                NullEncoding::PresenceFlag => {
                    writer.write_bool(true);
                    self.encode_member(info, inner.member_ref(), writer, depth, true)
                }
                NullEncoding::Sentinel => {
                    let start = writer.len();
                    self.encode_member(info, inner.member_ref(), writer, depth, true)?;
                    if starts_with_sentinel(&writer.as_bytes()[start..]) {
                        log::warn!("value of `{}` encodes like the null sentinel", info.name());
                        return Err(SerializeError::SentinelCollision);
                    }
                    Ok(())
                }
            },
            MemberRef::Scalar(scalar) => Ok(write_scalar(writer, scalar)?),
            MemberRef::Array(array) => Ok(array.encode(writer)?),
            MemberRef::Manual(manual) => manual.serialize(writer),
            MemberRef::Complex(object) => self.encode_object(object, writer, depth.descend()),
            MemberRef::Unsupported(type_path) => Err(SerializeError::UnsupportedType { type_path }),
        }
    }
}
