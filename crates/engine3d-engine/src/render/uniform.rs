//! Named uniform slots packed into one WGSL `var<uniform>` block.
//!
//! Offsets follow the uniform address space layout rules: every member is
//! aligned to its type's alignment and the block size is rounded up to 16.
//! Matrices are written row after row, so the shader sees the transpose.

use std::fmt;

use engine3d_math::{Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use thiserror::Error;

/// WGSL type of a uniform slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformKind {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl UniformKind {
    /// Alignment in bytes.
    pub const fn align(self) -> usize {
        match self {
            UniformKind::Scalar => 4,
            UniformKind::Vec2 | UniformKind::Mat2 => 8,
            UniformKind::Vec3 | UniformKind::Vec4 | UniformKind::Mat3 | UniformKind::Mat4 => 16,
        }
    }

    /// Size in bytes, including the padding inside `mat3x3`.
    pub const fn size(self) -> usize {
        match self {
            UniformKind::Scalar => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 => 12,
            UniformKind::Vec4 | UniformKind::Mat2 => 16,
            UniformKind::Mat3 => 48,
            UniformKind::Mat4 => 64,
        }
    }

    pub const fn wgsl_type(self) -> &'static str {
        match self {
            UniformKind::Scalar => "f32",
            UniformKind::Vec2 => "vec2<f32>",
            UniformKind::Vec3 => "vec3<f32>",
            UniformKind::Vec4 => "vec4<f32>",
            UniformKind::Mat2 => "mat2x2<f32>",
            UniformKind::Mat3 => "mat3x3<f32>",
            UniformKind::Mat4 => "mat4x4<f32>",
        }
    }
}

impl fmt::Display for UniformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wgsl_type())
    }
}

/// A value to upload, tagged with its kind.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Scalar(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat2(Mat2),
    Mat3(Mat3),
    Mat4(Mat4),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Scalar(_) => UniformKind::Scalar,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Vec4(_) => UniformKind::Vec4,
            UniformValue::Mat2(_) => UniformKind::Mat2,
            UniformValue::Mat3(_) => UniformKind::Mat3,
            UniformValue::Mat4(_) => UniformKind::Mat4,
        }
    }

    /// Packs the value into `out`, which must hold at least `kind().size()` bytes.
    ///
    /// # Panics
    ///
    /// If `out` is shorter than `kind().size()`.
    pub fn write_std140(&self, out: &mut [u8]) {
        match self {
            UniformValue::Scalar(x) => write_floats(out, &[*x]),
            UniformValue::Vec2(v) => write_floats(out, v.as_slice()),
            UniformValue::Vec3(v) => write_floats(out, v.as_slice()),
            UniformValue::Vec4(v) => write_floats(out, v.as_slice()),
            UniformValue::Mat2(m) => write_floats(out, &m.to_flat_array()),
            UniformValue::Mat3(m) => {
                // Each row occupies a 16-byte slot.
                for (i, row) in m.to_rows().iter().enumerate() {
                    let slot = &mut out[i * 16..(i + 1) * 16];
                    write_floats(slot, row);
                    slot[12..].fill(0);
                }
            }
            UniformValue::Mat4(m) => write_floats(out, &m.to_flat_array()),
        }
    }
}

impl From<f32> for UniformValue {
    fn from(x: f32) -> Self {
        UniformValue::Scalar(x)
    }
}

macro_rules! uniform_from {
    ($($ty:ident),*) => {
        $(
            impl From<$ty> for UniformValue {
                fn from(v: $ty) -> Self {
                    UniformValue::$ty(v)
                }
            }
        )*
    };
}

uniform_from!(Vec2, Vec3, Vec4, Mat2, Mat3, Mat4);

fn write_floats(out: &mut [u8], values: &[f32]) {
    let bytes: &[u8] = bytemuck::cast_slice(values);
    out[..bytes.len()].copy_from_slice(bytes);
}

#[inline]
const fn align_to(offset: usize, align: usize) -> usize {
    offset.div_ceil(align) * align
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UniformError {
    #[error("no uniform named `{0}`")]
    UnknownUniform(String),

    #[error("uniform `{name}` is declared as {declared}, got {given}")]
    KindMismatch {
        name: String,
        declared: UniformKind,
        given: UniformKind,
    },

    #[error("uniform `{0}` is already declared")]
    Duplicate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformSlot {
    pub name: String,
    pub kind: UniformKind,
    pub offset: usize,
}

/// Ordered slots of a uniform block, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct UniformLayout {
    slots: Vec<UniformSlot>,
    end: usize,
}

impl UniformLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a slot and returns its byte offset.
    pub fn push(&mut self, name: &str, kind: UniformKind) -> Result<usize, UniformError> {
        if self.get(name).is_some() {
            return Err(UniformError::Duplicate(name.to_owned()));
        }

        let offset = align_to(self.end, kind.align());
        self.end = offset + kind.size();
        self.slots.push(UniformSlot {
            name: name.to_owned(),
            kind,
            offset,
        });
        Ok(offset)
    }

    pub fn get(&self, name: &str) -> Option<&UniformSlot> {
        self.slots.iter().find(|s| s.name == name)
    }

    pub fn slots(&self) -> &[UniformSlot] {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Buffer size in bytes (a multiple of 16; 0 when empty).
    pub fn size(&self) -> usize {
        align_to(self.end, 16)
    }

    /// WGSL struct declaration matching this layout.
    pub fn wgsl_struct(&self, name: &str) -> String {
        let mut out = format!("struct {name} {{\n");
        for slot in &self.slots {
            out.push_str(&format!("    {}: {},\n", slot.name, slot.kind));
        }
        out.push_str("};\n");
        out
    }
}

/// CPU-side staging bytes for a [`UniformLayout`].
#[derive(Debug, Clone, Default)]
pub struct UniformBlock {
    layout: UniformLayout,
    bytes: Vec<u8>,
    dirty: bool,
}

impl UniformBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    /// Declares a new slot; its bytes start zeroed.
    pub fn declare(&mut self, name: &str, kind: UniformKind) -> Result<usize, UniformError> {
        let offset = self.layout.push(name, kind)?;
        self.bytes.resize(self.layout.size(), 0);
        self.dirty = true;
        Ok(offset)
    }

    /// Writes `value` into the slot `name`.
    pub fn set(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        let slot = self
            .layout
            .get(name)
            .ok_or_else(|| UniformError::UnknownUniform(name.to_owned()))?;

        let given = value.kind();
        if given != slot.kind {
            return Err(UniformError::KindMismatch {
                name: name.to_owned(),
                declared: slot.kind,
                given,
            });
        }

        let range = slot.offset..slot.offset + given.size();
        value.write_std140(&mut self.bytes[range]);
        self.dirty = true;
        Ok(())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the bytes if they changed since the last call.
    pub fn take_dirty(&mut self) -> Option<&[u8]> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(&self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floats(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn offsets_follow_alignment() {
        let mut l = UniformLayout::new();
        assert_eq!(l.push("transform", UniformKind::Mat4), Ok(0));
        assert_eq!(l.push("tint", UniformKind::Vec4), Ok(64));
        assert_eq!(l.push("time", UniformKind::Scalar), Ok(80));
        assert_eq!(l.size(), 96);
    }

    #[test]
    fn scalar_packs_after_vec3() {
        let mut l = UniformLayout::new();
        assert_eq!(l.push("dir", UniformKind::Vec3), Ok(0));
        assert_eq!(l.push("strength", UniformKind::Scalar), Ok(12));
        assert_eq!(l.push("uv", UniformKind::Vec2), Ok(16));
        assert_eq!(l.push("m", UniformKind::Mat3), Ok(32));
        assert_eq!(l.size(), 80);
    }

    #[test]
    fn empty_layout_has_no_size() {
        assert_eq!(UniformLayout::new().size(), 0);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut l = UniformLayout::new();
        l.push("a", UniformKind::Scalar).unwrap();
        assert_eq!(
            l.push("a", UniformKind::Vec2),
            Err(UniformError::Duplicate("a".into()))
        );
        assert_eq!(l.slots().len(), 1);
    }

    #[test]
    fn wgsl_struct_lists_members_in_order() {
        let mut l = UniformLayout::new();
        l.push("transform", UniformKind::Mat4).unwrap();
        l.push("time", UniformKind::Scalar).unwrap();
        assert_eq!(
            l.wgsl_struct("Uniforms"),
            "struct Uniforms {\n    transform: mat4x4<f32>,\n    time: f32,\n};\n"
        );
    }

    // ── packing ───────────────────────────────────────────────────────────

    #[test]
    fn mat3_rows_are_padded() {
        let m = Mat3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let mut out = [0xffu8; 48];
        UniformValue::Mat3(m).write_std140(&mut out);
        assert_eq!(
            floats(&out),
            [1.0, 2.0, 3.0, 0.0, 4.0, 5.0, 6.0, 0.0, 7.0, 8.0, 9.0, 0.0]
        );
    }

    #[test]
    fn mat4_is_row_major() {
        let m = Mat4::from_translation(Vec3::xyz(5.0, 6.0, 7.0));
        let mut out = [0u8; 64];
        UniformValue::from(m).write_std140(&mut out);
        let f = floats(&out);
        assert_eq!(&f[0..4], &[1.0, 0.0, 0.0, 5.0]);
        assert_eq!(&f[12..16], &[0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn kind_tags() {
        assert_eq!(UniformValue::from(1.0).kind(), UniformKind::Scalar);
        assert_eq!(UniformValue::from(Vec2::xy(1.0, 2.0)).kind(), UniformKind::Vec2);
        assert_eq!(UniformValue::from(Mat2::identity()).kind(), UniformKind::Mat2);
    }

    // ── block ─────────────────────────────────────────────────────────────

    #[test]
    fn block_writes_at_slot_offset() {
        let mut b = UniformBlock::new();
        b.declare("tint", UniformKind::Vec4).unwrap();
        b.declare("time", UniformKind::Scalar).unwrap();
        assert_eq!(b.bytes().len(), 32);

        b.set("time", UniformValue::Scalar(2.5)).unwrap();
        b.set("tint", Vec4::xyzw(1.0, 0.5, 0.25, 1.0).into()).unwrap();
        assert_eq!(&floats(b.bytes())[..5], &[1.0, 0.5, 0.25, 1.0, 2.5]);
    }

    #[test]
    fn kind_mismatch_leaves_bytes_alone() {
        let mut b = UniformBlock::new();
        b.declare("time", UniformKind::Scalar).unwrap();
        b.take_dirty();

        let err = b.set("time", Vec2::xy(1.0, 2.0).into()).unwrap_err();
        assert_eq!(
            err,
            UniformError::KindMismatch {
                name: "time".into(),
                declared: UniformKind::Scalar,
                given: UniformKind::Vec2,
            }
        );
        assert_eq!(err.to_string(), "uniform `time` is declared as f32, got vec2<f32>");
        assert!(!b.is_dirty());
        assert!(b.bytes().iter().all(|&x| x == 0));
    }

    #[test]
    fn unknown_name() {
        let mut b = UniformBlock::new();
        assert_eq!(
            b.set("missing", UniformValue::Scalar(1.0)),
            Err(UniformError::UnknownUniform("missing".into()))
        );
    }

    #[test]
    fn dirty_flag_is_consumed() {
        let mut b = UniformBlock::new();
        b.declare("x", UniformKind::Scalar).unwrap();
        assert!(b.take_dirty().is_some());
        assert!(b.take_dirty().is_none());
        b.set("x", UniformValue::Scalar(1.0)).unwrap();
        assert_eq!(b.take_dirty().map(<[u8]>::len), Some(16));
    }
}
