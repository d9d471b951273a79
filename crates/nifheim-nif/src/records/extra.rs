//! Extra data blocks attached to named objects.

use nifheim_common::math::{Matrix3, Vector3, Vector4};

use crate::link::{ExtraData, MultiBoundData, RecordLink};
use crate::record::ReadRecord;
use crate::resolve::PostContext;
use crate::version::beth;
use crate::{DecodeResult, NifStream};

/// Fields every extra data block starts with.
///
/// Newer files name the block; older ones chain blocks through `next` and
/// store the payload size up front.
#[derive(Debug, Clone, Default)]
pub struct ExtraHeader {
    pub name: String,
    pub next: RecordLink<ExtraData>,
    pub record_size: u32,
}

impl ReadRecord for ExtraHeader {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        if nif.since(10, 0, 1, 0) {
            self.name = nif.read_string()?;
        } else if nif.until(4, 2, 2, 0) {
            self.next = nif.read_link()?;
            self.record_size = nif.read_u32()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.next)?;
        Ok(())
    }
}

macro_rules! extra_record {
    (
        $(#[$doc:meta])*
        $name:ident { $($field:ident: $ty:ty),* $(,)? }
        |$this:ident, $nif:ident| $body:block
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            pub base: ExtraHeader,
            $(pub $field: $ty,)*
        }

        impl_as_ref!($name { ExtraHeader => base; });

        impl ReadRecord for $name {
            fn read(&mut self, $nif: &mut NifStream<'_>) -> DecodeResult<()> {
                self.base.read($nif)?;
                let $this = self;
                $body
                Ok(())
            }

            fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
                self.base.post(ctx)
            }
        }
    };
}

extra_record! {
    /// Untyped payload; its size comes from the header.
    NiExtraData { data: Vec<u8> }
    |this, nif| {
        this.data = nif.read_bytes(this.base.record_size as usize)?;
    }
}

extra_record! {
    /// A string, often a marker such as "NCO" or "MRK".
    NiStringExtraData { data: String }
    |this, nif| {
        this.data = nif.read_string()?;
    }
}

extra_record! {
    /// Named points in time, such as animation groups.
    NiTextKeyExtraData { keys: Vec<(f32, String)> }
    |this, nif| {
        let count = nif.read_u32()?;
        for _ in 0..count {
            let time = nif.read_f32()?;
            let text = nif.read_string()?;
            this.keys.push((time, text));
        }
    }
}

extra_record! {
    /// Per-vertex weights; only the count is kept.
    NiVertWeightsExtraData { vertex_count: u16 }
    |this, nif| {
        this.vertex_count = nif.read_u16()?;
        nif.skip(usize::from(this.vertex_count) * 4)?;
    }
}

extra_record! {
    /// Opaque binary payload.
    NiBinaryExtraData { data: Vec<u8> }
    |this, nif| {
        let size = nif.read_u32()? as usize;
        this.data = nif.read_bytes(size)?;
    }
}

extra_record! {
    NiBooleanExtraData { data: bool }
    |this, nif| {
        this.data = nif.read_u8()? != 0;
    }
}

extra_record! {
    /// A four-component vector; also used for colors.
    NiVectorExtraData { data: Vector4 }
    |this, nif| {
        this.data = nif.read()?;
    }
}

/// Color extra data decodes as a four-component vector.
pub type NiColorExtraData = NiVectorExtraData;

extra_record! {
    NiFloatExtraData { data: f32 }
    |this, nif| {
        this.data = nif.read_f32()?;
    }
}

extra_record! {
    NiFloatsExtraData { data: Vec<f32> }
    |this, nif| {
        let count = nif.read_u32()? as usize;
        this.data = nif.read_array(count)?;
    }
}

extra_record! {
    /// An integer; as `BSXFlags` it carries Bethesda's behavior flags.
    NiIntegerExtraData { data: u32 }
    |this, nif| {
        this.data = nif.read_u32()?;
    }
}

/// Bethesda behavior flags.
pub type BSXFlags = NiIntegerExtraData;

extra_record! {
    NiIntegersExtraData { data: Vec<u32> }
    |this, nif| {
        let count = nif.read_u32()? as usize;
        this.data = nif.read_array(count)?;
    }
}

extra_record! {
    /// Null-separated strings referenced by offset from controlled blocks.
    NiStringPalette { palette: String }
    |this, nif| {
        this.palette = nif.read_sized_string()?;
        // Redundant length.
        nif.skip(4)?;
    }
}

impl NiStringPalette {
    /// Look up the string starting at `offset`.
    pub fn get(&self, offset: u32) -> Option<&str> {
        let rest = self.palette.get(offset as usize..)?;
        Some(rest.split('\0').next().unwrap_or(rest))
    }
}

extra_record! {
    /// An axis-aligned bounding box.
    BSBound { center: Vector3, extents: Vector3 }
    |this, nif| {
        this.center = nif.read()?;
        this.extents = nif.read()?;
    }
}

/// A multi-bound volume holder.
#[derive(Debug, Clone, Default)]
pub struct BSMultiBound {
    pub data: RecordLink<MultiBoundData>,
}

impl ReadRecord for BSMultiBound {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.data = nif.read_link()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.data)?;
        Ok(())
    }
}

/// An oriented bounding box.
#[derive(Debug, Clone, Default)]
pub struct BSMultiBoundOBB {
    pub center: Vector3,
    pub size: Vector3,
    pub rotation: Matrix3,
}

impl ReadRecord for BSMultiBoundOBB {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.center = nif.read()?;
        self.size = nif.read()?;
        self.rotation = nif.read()?;
        Ok(())
    }
}

/// A bounding sphere.
#[derive(Debug, Clone, Default)]
pub struct BSMultiBoundSphere {
    pub center: Vector3,
    pub radius: f32,
}

impl ReadRecord for BSMultiBoundSphere {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.center = nif.read()?;
        self.radius = nif.read_f32()?;
        Ok(())
    }
}

/// A spot where an actor can sit or lie.
#[derive(Debug, Clone, Default)]
pub struct FurniturePosition {
    pub offset: Vector3,
    pub orientation: u16,
    pub position_ref: [u8; 2],
    pub heading: f32,
    pub animation_type: u16,
    pub entry_points: u16,
}

extra_record! {
    /// Furniture entry points.
    BSFurnitureMarker { positions: Vec<FurniturePosition> }
    |this, nif| {
        let count = nif.read_u32()?;
        for _ in 0..count {
            let mut position = FurniturePosition {
                offset: nif.read()?,
                ..FurniturePosition::default()
            };
            if nif.beth_version() <= beth::FO3 {
                position.orientation = nif.read_u16()?;
                position.position_ref = [nif.read_u8()?, nif.read_u8()?];
            } else {
                position.heading = nif.read_f32()?;
                position.animation_type = nif.read_u16()?;
                position.entry_points = nif.read_u16()?;
            }
            this.positions.push(position);
        }
    }
}

/// The furniture marker node decodes identically.
pub type BSFurnitureMarkerNode = BSFurnitureMarker;

extra_record! {
    /// Inventory display rotation and zoom.
    BSInvMarker { rotation: [u16; 3], zoom: f32 }
    |this, nif| {
        this.rotation = [nif.read_u16()?, nif.read_u16()?, nif.read_u16()?];
        this.zoom = nif.read_f32()?;
    }
}

extra_record! {
    /// Behavior graph file reference.
    BSBehaviorGraphExtraData { file: String, controls_base_skeleton: bool }
    |this, nif| {
        this.file = nif.read_string()?;
        this.controls_base_skeleton = nif.read_u8()? != 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{stream, ByteWriter};
    use crate::NifVersion;

    #[test]
    fn test_old_extra_data_chain() {
        let bytes = ByteWriter::new()
            .i32(3)
            .u32(7)
            .sized_string("NCO")
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND);
        let mut extra = NiStringExtraData::default();
        extra.read(&mut nif).unwrap();
        assert_eq!(extra.base.next.get(), Some(3));
        assert_eq!(extra.base.record_size, 7);
        assert_eq!(extra.data, "NCO");
        assert_eq!(nif.position(), bytes.len() as u64);
    }

    #[test]
    fn test_text_keys() {
        let bytes = ByteWriter::new()
            .i32(-1)
            .u32(0)
            .u32(2)
            .f32(0.0)
            .sized_string("Idle: Start")
            .f32(2.5)
            .sized_string("Idle: Stop")
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND);
        let mut extra = NiTextKeyExtraData::default();
        extra.read(&mut nif).unwrap();
        assert_eq!(extra.keys.len(), 2);
        assert_eq!(extra.keys[1], (2.5, "Idle: Stop".to_string()));
    }

    #[test]
    fn test_string_palette_lookup() {
        let palette = NiStringPalette {
            palette: "Bip01\0Bip01 Head\0".into(),
            ..Default::default()
        };
        assert_eq!(palette.get(0), Some("Bip01"));
        assert_eq!(palette.get(6), Some("Bip01 Head"));
        assert_eq!(palette.get(100), None);
    }
}
