//! Compact, byte-oriented type encoding.
//!
//! A type is an ordered sequence of type bytes terminated by [`TypeCode::End`].
//! Composite codes (`Array`, `Func`, `Struct`, `Union`) are followed by a
//! fixed-width inline payload: either an array dimension or a stable index
//! into a side table (see the crate docs for why indices rather than raw
//! pointers — buffers here are plain `Vec<u8>` that get cloned and moved
//! freely, which a raw pointer would not survive).

use std::convert::TryInto;
use std::fmt;

/// Width, in bytes, of the inline payload following a composite type code.
///
/// Wide enough to hold either an array dimension or a `FuncId`/`TagId`.
pub const DECODE_SIZE: usize = 4;

/// One byte of an encoded type sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeCode {
    Void = 0,
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Ptr,
    Array,
    Func,
    Struct,
    Union,
    End,
}

impl TypeCode {
    fn from_u8(b: u8) -> Option<Self> {
        use TypeCode::*;
        Some(match b {
            0 => Void,
            1 => Char,
            2 => UChar,
            3 => Short,
            4 => UShort,
            5 => Int,
            6 => UInt,
            7 => Long,
            8 => ULong,
            9 => Ptr,
            10 => Array,
            11 => Func,
            12 => Struct,
            13 => Union,
            14 => End,
            _ => return None,
        })
    }

    /// Whether this code carries a `DECODE_SIZE`-byte inline payload.
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            TypeCode::Array | TypeCode::Func | TypeCode::Struct | TypeCode::Union
        )
    }
}

/// Stable index into a function-descriptor side table, embedded in the
/// payload of a [`TypeCode::Func`] byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncId(pub u32);

/// Stable index into a struct/union/enum tag side table, embedded in the
/// payload of a [`TypeCode::Struct`]/[`TypeCode::Union`] byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagId(pub u32);

/// One decoded element of a type sequence, with composite payloads resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeElem {
    Void,
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Ptr,
    Array(u32),
    Func(FuncId),
    Struct(TagId),
    Union(TagId),
    End,
}

/// Write an unsigned integer into `DECODE_SIZE` bytes, little-endian.
pub fn encode_size(buf: &mut [u8], n: u32) {
    buf[..DECODE_SIZE].copy_from_slice(&n.to_le_bytes());
}

/// Read an unsigned integer out of `DECODE_SIZE` bytes, little-endian.
pub fn decode_size(buf: &[u8]) -> u32 {
    u32::from_le_bytes(buf[..DECODE_SIZE].try_into().unwrap())
}

/// An end-terminated, owned type byte sequence.
///
/// This is the representation stored in a [`crate::declaration::Declaration`],
/// a struct/union field, or a function parameter once parsing of that
/// particular type is complete. It is always `End`-terminated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeBuf(Vec<u8>);

impl TypeBuf {
    /// The empty type: just `End`. Used as a placeholder before a real
    /// type is assigned.
    pub fn end() -> Self {
        TypeBuf(vec![TypeCode::End as u8])
    }

    fn primitive(code: TypeCode) -> Self {
        TypeBuf(vec![code as u8, TypeCode::End as u8])
    }

    pub fn void() -> Self {
        Self::primitive(TypeCode::Void)
    }
    pub fn char_signed() -> Self {
        Self::primitive(TypeCode::Char)
    }
    pub fn char_unsigned() -> Self {
        Self::primitive(TypeCode::UChar)
    }
    pub fn short() -> Self {
        Self::primitive(TypeCode::Short)
    }
    pub fn ushort() -> Self {
        Self::primitive(TypeCode::UShort)
    }
    pub fn int() -> Self {
        Self::primitive(TypeCode::Int)
    }
    pub fn uint() -> Self {
        Self::primitive(TypeCode::UInt)
    }
    pub fn long() -> Self {
        Self::primitive(TypeCode::Long)
    }
    pub fn ulong() -> Self {
        Self::primitive(TypeCode::ULong)
    }

    pub fn struct_tag(id: TagId) -> Self {
        let mut bytes = vec![TypeCode::Struct as u8, 0, 0, 0, 0];
        encode_size(&mut bytes[1..1 + DECODE_SIZE], id.0);
        bytes.push(TypeCode::End as u8);
        TypeBuf(bytes)
    }

    pub fn union_tag(id: TagId) -> Self {
        let mut bytes = vec![TypeCode::Union as u8, 0, 0, 0, 0];
        encode_size(&mut bytes[1..1 + DECODE_SIZE], id.0);
        bytes.push(TypeCode::End as u8);
        TypeBuf(bytes)
    }

    /// Copy the terminated sequence from `src`, discarding anything past it.
    pub fn type_copy(src: &TypeBuf) -> Self {
        TypeBuf(src.0.clone())
    }

    /// Wrap an already End-terminated byte sequence, e.g. one produced by
    /// [`TypeBuf::tail`] and then re-owned. Panics if `bytes` is empty or
    /// doesn't end in `End`.
    pub fn from_terminated_bytes(bytes: Vec<u8>) -> Self {
        assert_eq!(
            bytes.last().copied(),
            Some(TypeCode::End as u8),
            "type byte sequence must be End-terminated"
        );
        TypeBuf(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn leading_code(&self) -> TypeCode {
        TypeCode::from_u8(self.0[0]).expect("type buffer always starts with a valid code")
    }

    pub fn is_array(&self) -> bool {
        self.leading_code() == TypeCode::Array
    }

    pub fn is_func(&self) -> bool {
        self.leading_code() == TypeCode::Func
    }

    /// Iterate the decoded elements of this type, outermost first.
    pub fn elements(&self) -> Elements<'_> {
        Elements { bytes: &self.0 }
    }

    /// The element sequence after stripping the leading element (e.g. the
    /// pointee of a `Ptr`, or the element type of an `Array`).
    pub fn tail(&self) -> &[u8] {
        let skip = match self.leading_code() {
            c if c.is_composite() => 1 + DECODE_SIZE,
            TypeCode::End => 0,
            _ => 1,
        };
        &self.0[skip..]
    }

    /// Recursively compute the size in bytes of this type.
    ///
    /// Returns `None` for a function type (undefined; callers must check
    /// `is_func` first) and `Some(0)` for an incomplete struct/union (the
    /// resolver reports a zero size for those, matching an unset tag entry).
    pub fn size_of(&self, tags: &dyn TagSizeResolver) -> Option<u32> {
        size_of_bytes(&self.0, tags)
    }
}

fn size_of_bytes(bytes: &[u8], tags: &dyn TagSizeResolver) -> Option<u32> {
    match TypeCode::from_u8(bytes[0]).expect("valid code") {
        TypeCode::Void => Some(0),
        TypeCode::Char | TypeCode::UChar => Some(1),
        TypeCode::Short | TypeCode::UShort | TypeCode::Int | TypeCode::UInt | TypeCode::Ptr => {
            Some(2)
        }
        TypeCode::Long | TypeCode::ULong => Some(4),
        TypeCode::Array => {
            let dim = decode_size(&bytes[1..]);
            let elem = size_of_bytes(&bytes[1 + DECODE_SIZE..], tags)?;
            Some(dim.saturating_mul(elem))
        }
        TypeCode::Func => None,
        TypeCode::Struct => {
            let id = TagId(decode_size(&bytes[1..]));
            Some(tags.tag_size(id).unwrap_or(0))
        }
        TypeCode::Union => {
            let id = TagId(decode_size(&bytes[1..]));
            Some(tags.tag_size(id).unwrap_or(0))
        }
        TypeCode::End => Some(0),
    }
}

/// Resolves the stored size of a struct/union tag, so [`TypeBuf::size_of`]
/// can stay in the `types` crate without knowing about the symbol table.
pub trait TagSizeResolver {
    fn tag_size(&self, id: TagId) -> Option<u32>;
}

pub struct Elements<'a> {
    bytes: &'a [u8],
}

impl<'a> Iterator for Elements<'a> {
    type Item = TypeElem;

    fn next(&mut self) -> Option<TypeElem> {
        let code = TypeCode::from_u8(*self.bytes.first()?)?;
        let (elem, advance) = match code {
            TypeCode::Void => (TypeElem::Void, 1),
            TypeCode::Char => (TypeElem::Char, 1),
            TypeCode::UChar => (TypeElem::UChar, 1),
            TypeCode::Short => (TypeElem::Short, 1),
            TypeCode::UShort => (TypeElem::UShort, 1),
            TypeCode::Int => (TypeElem::Int, 1),
            TypeCode::UInt => (TypeElem::UInt, 1),
            TypeCode::Long => (TypeElem::Long, 1),
            TypeCode::ULong => (TypeElem::ULong, 1),
            TypeCode::Ptr => (TypeElem::Ptr, 1),
            TypeCode::End => {
                self.bytes = &[];
                return Some(TypeElem::End);
            }
            TypeCode::Array => {
                let dim = decode_size(&self.bytes[1..]);
                (TypeElem::Array(dim), 1 + DECODE_SIZE)
            }
            TypeCode::Func => {
                let id = FuncId(decode_size(&self.bytes[1..]));
                (TypeElem::Func(id), 1 + DECODE_SIZE)
            }
            TypeCode::Struct => {
                let id = TagId(decode_size(&self.bytes[1..]));
                (TypeElem::Struct(id), 1 + DECODE_SIZE)
            }
            TypeCode::Union => {
                let id = TagId(decode_size(&self.bytes[1..]));
                (TypeElem::Union(id), 1 + DECODE_SIZE)
            }
        };
        self.bytes = &self.bytes[advance..];
        Some(elem)
    }
}

impl fmt::Display for TypeBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for elem in self.elements() {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            match elem {
                TypeElem::Void => write!(f, "void")?,
                TypeElem::Char => write!(f, "char")?,
                TypeElem::UChar => write!(f, "unsigned char")?,
                TypeElem::Short => write!(f, "short")?,
                TypeElem::UShort => write!(f, "unsigned short")?,
                TypeElem::Int => write!(f, "int")?,
                TypeElem::UInt => write!(f, "unsigned int")?,
                TypeElem::Long => write!(f, "long")?,
                TypeElem::ULong => write!(f, "unsigned long")?,
                TypeElem::Ptr => write!(f, "ptr to")?,
                TypeElem::Array(n) => write!(f, "array[{}] of", n)?,
                TypeElem::Func(id) => write!(f, "func#{} returning", id.0)?,
                TypeElem::Struct(id) => write!(f, "struct#{}", id.0)?,
                TypeElem::Union(id) => write!(f, "union#{}", id.0)?,
                TypeElem::End => write!(f, "end")?,
            }
        }
        Ok(())
    }
}

/// Append-only byte builder used while a declarator is being parsed.
///
/// The declarator parser owns one of these per recursion frame; suffixes
/// (`*`, `[n]`, `(params)`) are appended to it as the recursion unwinds, so
/// what ends up in the buffer is outermost-first even though the grammar
/// is consumed in a different order. Call [`TypeBuilder::seal`] once with
/// the base type to terminate the buffer.
#[derive(Debug, Default)]
pub struct TypeBuilder {
    bytes: Vec<u8>,
    /// Byte offset of the most recently pushed element's code byte, if any.
    last_code_pos: Option<usize>,
}

impl TypeBuilder {
    pub fn new() -> Self {
        TypeBuilder {
            bytes: Vec::new(),
            last_code_pos: None,
        }
    }

    pub fn push_ptr(&mut self) {
        self.last_code_pos = Some(self.bytes.len());
        self.bytes.push(TypeCode::Ptr as u8);
    }

    pub fn push_array(&mut self, dim: u32) {
        self.last_code_pos = Some(self.bytes.len());
        self.bytes.push(TypeCode::Array as u8);
        let at = self.bytes.len();
        self.bytes.resize(at + DECODE_SIZE, 0);
        encode_size(&mut self.bytes[at..], dim);
    }

    pub fn push_func(&mut self, id: FuncId) {
        self.last_code_pos = Some(self.bytes.len());
        self.bytes.push(TypeCode::Func as u8);
        let at = self.bytes.len();
        self.bytes.resize(at + DECODE_SIZE, 0);
        encode_size(&mut self.bytes[at..], id.0);
    }

    /// The `FuncId` of the most recently pushed element, if it was a `Func`.
    ///
    /// Used by the `fastcall` declarator modifier, which needs to reach back
    /// into the function descriptor at the current head of the buffer.
    pub fn last_func_id(&self) -> Option<FuncId> {
        let pos = self.last_code_pos?;
        if self.bytes[pos] == TypeCode::Func as u8 {
            Some(FuncId(decode_size(&self.bytes[pos + 1..])))
        } else {
            None
        }
    }

    /// Seal the builder, appending the (already `End`-terminated) base type.
    pub fn seal(mut self, base: &TypeBuf) -> TypeBuf {
        self.bytes.extend_from_slice(base.as_bytes());
        TypeBuf(self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoTags;
    impl TagSizeResolver for NoTags {
        fn tag_size(&self, _id: TagId) -> Option<u32> {
            None
        }
    }

    #[test]
    fn pointer_to_array_of_int() {
        // int (*p)[4]; -> PTR, ARRAY, 4, INT, END
        let mut b = TypeBuilder::new();
        b.push_ptr();
        b.push_array(4);
        let ty = b.seal(&TypeBuf::int());
        let elems: Vec<_> = ty.elements().collect();
        assert_eq!(
            elems,
            vec![
                TypeElem::Ptr,
                TypeElem::Array(4),
                TypeElem::Int,
                TypeElem::End
            ]
        );
        assert_eq!(ty.size_of(&NoTags).unwrap(), 2);
    }

    #[test]
    fn type_copy_preserves_size() {
        let ty = TypeBuf::long();
        let copy = TypeBuf::type_copy(&ty);
        assert_eq!(ty.size_of(&NoTags), copy.size_of(&NoTags));
    }

    #[test]
    fn primitive_sizes() {
        assert_eq!(TypeBuf::char_signed().size_of(&NoTags), Some(1));
        assert_eq!(TypeBuf::short().size_of(&NoTags), Some(2));
        assert_eq!(TypeBuf::int().size_of(&NoTags), Some(2));
        assert_eq!(TypeBuf::long().size_of(&NoTags), Some(4));
    }
}
