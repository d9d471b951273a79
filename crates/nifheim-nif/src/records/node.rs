//! Scene graph nodes, cameras and sort accumulators.

use nifheim_common::math::{Vector3, Vector4};
use zerocopy::{FromBytes, Immutable, KnownLayout};

use super::base::{NiAVObject, NiObjectNET};
use crate::link::{AnyRecord, AvObject, DynamicEffect, Node, RecordLink};
use crate::record::ReadRecord;
use crate::records::BSMultiBound;
use crate::resolve::PostContext;
use crate::version::beth;
use crate::{DecodeResult, NifStream};

/// A grouping node. Its children record it as their parent.
#[derive(Debug, Clone, Default)]
pub struct NiNode {
    pub base: NiAVObject,
    pub children: Vec<RecordLink<AvObject>>,
    pub effects: Vec<RecordLink<DynamicEffect>>,
}

impl_as_ref!(NiNode {
    NiAVObject => base;
    NiObjectNET => base.base;
});

impl ReadRecord for NiNode {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.children = nif.read_link_list()?;
        if nif.beth_version() < beth::FO4 {
            self.effects = nif.read_link_list()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        for child in &self.children {
            if let Some(target) = ctx.link(child)? {
                ctx.add_parent(target.index());
            }
        }
        ctx.links(&self.effects)?;
        Ok(())
    }
}

macro_rules! node_subtype {
    ($name:ident) => {
        impl_as_ref!($name {
            NiNode => base;
            NiAVObject => base.base;
            NiObjectNET => base.base.base;
        });
    };
}

/// A node that keeps facing the camera.
#[derive(Debug, Clone, Default)]
pub struct NiBillboardNode {
    pub base: NiNode,
    /// Billboard mode; older files keep it in the flags.
    pub mode: u16,
}

node_subtype!(NiBillboardNode);

impl ReadRecord for NiBillboardNode {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.mode = if nif.since(10, 1, 0, 0) {
            nif.read_u16()?
        } else {
            ((self.base.base.flags >> 5) & 0x3) as u16
        };
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NiSortAdjustNode {
    pub base: NiNode,
    pub mode: u32,
    pub sub_sorter: RecordLink<NiAccumulator>,
}

node_subtype!(NiSortAdjustNode);

impl ReadRecord for NiSortAdjustNode {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.mode = nif.read_u32()?;
        if nif.until(20, 0, 0, 3) {
            self.sub_sorter = nif.read_link()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.sub_sorter)?;
        Ok(())
    }
}

/// Node with a min/max/current index, used for blast, damage and debris nodes.
#[derive(Debug, Clone, Default)]
pub struct BSRangeNode {
    pub base: NiNode,
    pub min: u8,
    pub max: u8,
    pub current: u8,
}

node_subtype!(BSRangeNode);

impl ReadRecord for BSRangeNode {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.min = nif.read_u8()?;
        self.max = nif.read_u8()?;
        self.current = nif.read_u8()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

#[derive(Debug, Clone, Default)]
pub struct BSMultiBoundNode {
    pub base: NiNode,
    pub multi_bound: RecordLink<BSMultiBound>,
    pub culling_type: u32,
}

node_subtype!(BSMultiBoundNode);

impl ReadRecord for BSMultiBoundNode {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.multi_bound = nif.read_link()?;
        if nif.beth_version() >= beth::SKY {
            self.culling_type = nif.read_u32()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.multi_bound)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BSOrderedNode {
    pub base: NiNode,
    pub alpha_sort_bound: Vector4,
    pub static_bound: bool,
}

node_subtype!(BSOrderedNode);

impl ReadRecord for BSOrderedNode {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.alpha_sort_bound = nif.read()?;
        self.static_bound = nif.read_byte_bool()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// SpeedTree node with two bone lists.
#[derive(Debug, Clone, Default)]
pub struct BSTreeNode {
    pub base: NiNode,
    pub bones1: Vec<RecordLink<Node>>,
    pub bones2: Vec<RecordLink<Node>>,
}

node_subtype!(BSTreeNode);

impl ReadRecord for BSTreeNode {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.bones1 = nif.read_link_list()?;
        self.bones2 = nif.read_link_list()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.links(&self.bones1)?;
        ctx.links(&self.bones2)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct BSValueNode {
    pub base: NiNode,
    pub value: i32,
    pub value_flags: u8,
}

node_subtype!(BSValueNode);

impl ReadRecord for BSValueNode {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.value = nif.read_i32()?;
        self.value_flags = nif.read_u8()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// A node that shows one child at a time.
#[derive(Debug, Clone, Default)]
pub struct NiSwitchNode {
    pub base: NiNode,
    pub switch_flags: u16,
    pub initial_index: u32,
}

node_subtype!(NiSwitchNode);

impl ReadRecord for NiSwitchNode {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if nif.since(10, 1, 0, 0) {
            self.switch_flags = nif.read_u16()?;
        }
        self.initial_index = nif.read_u32()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

macro_rules! switch_subtype {
    ($name:ident) => {
        impl_as_ref!($name {
            NiSwitchNode => base;
            NiNode => base.base;
            NiAVObject => base.base.base;
            NiObjectNET => base.base.base.base;
        });
    };
}

/// A switch node that flips through its children over time.
#[derive(Debug, Clone, Default)]
pub struct NiFltAnimationNode {
    pub base: NiSwitchNode,
    pub duration: f32,
}

switch_subtype!(NiFltAnimationNode);

impl ReadRecord for NiFltAnimationNode {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.duration = nif.read_f32()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// Distance band for one level of detail.
#[derive(Debug, Clone, Copy, PartialEq, Default, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct LodRange {
    pub min_range: f32,
    pub max_range: f32,
}

/// A switch node that picks a child by camera distance.
#[derive(Debug, Clone, Default)]
pub struct NiLODNode {
    pub base: NiSwitchNode,
    pub lod_center: Vector3,
    pub levels: Vec<LodRange>,
    /// Separate level data record, after 10.0.1.0.
    pub lod_data: RecordLink<AnyRecord>,
}

switch_subtype!(NiLODNode);

impl ReadRecord for NiLODNode {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if !nif.until(10, 0, 1, 0) {
            self.lod_data = nif.read_link()?;
            return Ok(());
        }
        if nif.since(4, 0, 0, 2) {
            self.lod_center = nif.read()?;
        }
        let count = nif.read_u32()? as usize;
        self.levels = nif.read_array(count)?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.lod_data)?;
        Ok(())
    }
}

/// Root of a keyframe file.
#[derive(Debug, Clone, Default)]
pub struct NiSequenceStreamHelper {
    pub base: NiObjectNET,
}

impl_as_ref!(NiSequenceStreamHelper { NiObjectNET => base; });

impl ReadRecord for NiSequenceStreamHelper {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// A camera with frustum and viewport.
#[derive(Debug, Clone, Default)]
pub struct NiCamera {
    pub base: NiAVObject,
    pub camera_flags: u16,
    /// Left, right, top, bottom, near, far.
    pub frustum: [f32; 6],
    pub orthographic: bool,
    /// Left, right, top, bottom.
    pub viewport: [f32; 4],
    pub lod_adjust: f32,
    pub scene: RecordLink<AnyRecord>,
    pub screen_polygons: u32,
    pub screen_textures: u32,
}

impl_as_ref!(NiCamera {
    NiAVObject => base;
    NiObjectNET => base.base;
});

impl ReadRecord for NiCamera {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if nif.since(10, 1, 0, 0) {
            self.camera_flags = nif.read_u16()?;
        }
        self.frustum = nif.read()?;
        if nif.since(10, 1, 0, 0) {
            self.orthographic = nif.read_byte_bool()?;
        }
        self.viewport = nif.read()?;
        self.lod_adjust = nif.read_f32()?;
        self.scene = nif.read_link()?;
        self.screen_polygons = nif.read_u32()?;
        if nif.since(4, 2, 1, 0) {
            self.screen_textures = nif.read_u32()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.scene)?;
        Ok(())
    }
}

/// Alpha and cluster sorters. They carry no data.
#[derive(Debug, Clone, Default)]
pub struct NiAccumulator;

/// Sorts alpha-blended geometry back to front.
pub type NiAlphaAccumulator = NiAccumulator;
/// Sorts geometry by cluster.
pub type NiClusterAccumulator = NiAccumulator;

impl ReadRecord for NiAccumulator {
    fn read(&mut self, _nif: &mut NifStream<'_>) -> DecodeResult<()> {
        Ok(())
    }
}
