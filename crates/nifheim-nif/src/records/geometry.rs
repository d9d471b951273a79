//! Renderable geometry, vertex data and skinning.

use nifheim_common::math::{
    BoundingSphere, Color4, Matrix3, Quaternion, Triangle, Vector2, Vector3, Vector4,
};
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::error::Warning;
use crate::link::{GeometryData, Node, Property, RecordLink, SkinInstance};
use crate::record::{ReadRecord, RecordData, RecordKind};
use crate::records::{NiAVObject, NiAlphaProperty, NiObjectNET};
use crate::resolve::PostContext;
use crate::version::beth;
use crate::{DecodeResult, NifStream};

/// Shader and material names attached to geometry.
#[derive(Debug, Clone, Default)]
pub struct MaterialData {
    pub names: Vec<String>,
    pub extra_data: Vec<i32>,
    pub active: i32,
    pub needs_update: bool,
}

impl MaterialData {
    fn read(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        let mut material = Self::default();
        if nif.since(10, 0, 1, 0) && nif.until(20, 1, 0, 3) && nif.read_bool()? {
            material.names.push(nif.read_string()?);
            material.extra_data.push(nif.read_i32()?);
        }
        if nif.since(20, 2, 0, 5) {
            let count = nif.read_u32()? as usize;
            material.names = nif.read_strings(count)?;
            material.extra_data = nif.read_array(count)?;
            material.active = nif.read_i32()?;
        }
        if nif.since(20, 2, 0, 7) {
            material.needs_update = nif.read_byte_bool()?;
        }
        Ok(material)
    }
}

/// A renderable object backed by a vertex data record.
///
/// Triangle shapes, strips, lines and old particle systems all share this
/// layout and differ only in the data they expect.
#[derive(Debug, Clone, Default)]
pub struct NiGeometry {
    pub base: NiAVObject,
    pub data: RecordLink<GeometryData>,
    pub skin: RecordLink<SkinInstance>,
    pub material: MaterialData,
    pub shader_property: RecordLink<Property>,
    pub alpha_property: RecordLink<NiAlphaProperty>,
}

pub type NiTriShape = NiGeometry;
pub type NiTriStrips = NiGeometry;
pub type NiLines = NiGeometry;
pub type NiParticles = NiGeometry;
pub type NiAutoNormalParticles = NiGeometry;
pub type NiRotatingParticles = NiGeometry;

impl_as_ref!(NiGeometry {
    NiAVObject => base;
    NiObjectNET => base.base;
});

impl NiGeometry {
    fn expects(kind: RecordKind, data: &RecordData) -> Option<&'static str> {
        let (expected, matches) = match kind {
            RecordKind::NiTriShape | RecordKind::BSLODTriShape => {
                ("NiTriShapeData", matches!(data, RecordData::NiTriShapeData(_)))
            }
            RecordKind::NiTriStrips => {
                ("NiTriStripsData", matches!(data, RecordData::NiTriStripsData(_)))
            }
            RecordKind::NiLines => ("NiLinesData", matches!(data, RecordData::NiLinesData(_))),
            RecordKind::NiParticles => (
                "NiParticlesData",
                matches!(
                    data,
                    RecordData::NiParticlesData(_) | RecordData::NiRotatingParticlesData(_)
                ),
            ),
            _ => return None,
        };
        (!matches).then_some(expected)
    }
}

impl ReadRecord for NiGeometry {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.data = nif.read_link()?;
        if nif.since(3, 3, 0, 13) {
            self.skin = nif.read_link()?;
        }
        self.material = MaterialData::read(nif)?;
        if nif.version() == crate::NifVersion::BETHESDA && nif.beth_version() > beth::FO3 {
            self.shader_property = nif.read_link()?;
            self.alpha_property = nif.read_link()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        let skin = ctx.link(&self.skin)?;
        ctx.link(&self.shader_property)?;
        ctx.link(&self.alpha_property)?;

        let current = ctx.current();
        if current.kind() != RecordKind::NiParticles && skin.is_some() {
            ctx.use_skinning();
        }
        if let Some(data) = ctx.link(&self.data)? {
            if let Some(expected) = Self::expects(current.kind(), data.data()) {
                ctx.warn(Warning::LinkTypeMismatch {
                    from: current.index(),
                    index: data.index(),
                    expected,
                    found: data.type_name().to_string(),
                });
                ctx.clear_geometry_data();
            }
        }
        Ok(())
    }
}

/// A triangle shape with LOD triangle counts.
#[derive(Debug, Clone, Default)]
pub struct BSLODTriShape {
    pub base: NiGeometry,
    pub lod_sizes: [u32; 3],
}

impl_as_ref!(BSLODTriShape {
    NiGeometry => base;
    NiAVObject => base.base;
    NiObjectNET => base.base.base;
});

impl ReadRecord for BSLODTriShape {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.lod_sizes = nif.read()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// Skyrim SE and later geometry with packed vertices stored inline.
#[derive(Debug, Clone, Default)]
pub struct BSTriShape {
    pub base: NiAVObject,
    pub bounds: BoundingSphere,
    pub bound_min_max: [f32; 6],
    pub skin: RecordLink<SkinInstance>,
    pub shader_property: RecordLink<Property>,
    pub alpha_property: RecordLink<NiAlphaProperty>,
    pub vertex_desc: u64,
    pub vertex_count: u16,
    /// Packed vertices, `vertex_stride()` bytes each.
    pub vertex_data: Vec<u8>,
    pub triangles: Vec<Triangle>,
}

impl_as_ref!(BSTriShape {
    NiAVObject => base;
    NiObjectNET => base.base;
});

impl BSTriShape {
    /// Size of one packed vertex in bytes.
    pub fn vertex_stride(&self) -> usize {
        (self.vertex_desc & 0xF) as usize * 4
    }

    /// Vertex attribute flags from the descriptor.
    pub fn vertex_flags(&self) -> u16 {
        ((self.vertex_desc >> 44) & 0xFFF) as u16
    }
}

impl ReadRecord for BSTriShape {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.bounds = nif.read()?;
        if nif.beth_version() >= beth::F76 {
            self.bound_min_max = nif.read()?;
        }
        self.skin = nif.read_link()?;
        self.shader_property = nif.read_link()?;
        self.alpha_property = nif.read_link()?;
        self.vertex_desc = nif.read_u64()?;
        let triangle_count = if nif.beth_version() < beth::FO4 {
            usize::from(nif.read_u16()?)
        } else {
            nif.read_u32()? as usize
        };
        self.vertex_count = nif.read_u16()?;
        let data_size = nif.read_u32()?;
        if data_size > 0 {
            let size = usize::from(self.vertex_count) * self.vertex_stride();
            self.vertex_data = nif.read_bytes(size)?;
            self.triangles = nif.read_array(triangle_count)?;
        }
        if nif.beth_version() == beth::SSE {
            let particle_size = nif.read_u32()?;
            if particle_size > 0 {
                // Half-float positions and normals, then triangles.
                let vertices = usize::from(self.vertex_count) * 3 * 2 * 2;
                nif.skip(vertices + triangle_count * 3 * 2)?;
            }
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        if ctx.link(&self.skin)?.is_some() {
            ctx.use_skinning();
        }
        ctx.link(&self.shader_property)?;
        ctx.link(&self.alpha_property)?;
        Ok(())
    }
}

/// Vertex data shared by every geometry data record.
#[derive(Debug, Clone, Default)]
pub struct NiGeometryData {
    pub group_id: i32,
    pub vertex_count: u16,
    pub keep_flags: u8,
    pub compress_flags: u8,
    pub vertices: Vec<Vector3>,
    pub data_flags: u16,
    pub material_crc: u32,
    pub normals: Vec<Vector3>,
    pub tangents: Vec<Vector3>,
    pub bitangents: Vec<Vector3>,
    pub bounds: BoundingSphere,
    pub colors: Vec<Color4>,
    pub uv_sets: Vec<Vec<Vector2>>,
    pub consistency: u16,
}

impl NiGeometryData {
    const HAS_TANGENTS: u16 = 0x1000;
}

impl ReadRecord for NiGeometryData {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        if nif.since(10, 1, 0, 114) {
            self.group_id = nif.read_i32()?;
        }
        self.vertex_count = nif.read_u16()?;
        let count = usize::from(self.vertex_count);
        if nif.since(10, 1, 0, 0) {
            self.keep_flags = nif.read_u8()?;
            self.compress_flags = nif.read_u8()?;
        }
        if nif.read_bool()? {
            self.vertices = nif.read_array(count)?;
        }
        if nif.since(10, 0, 1, 0) {
            self.data_flags = nif.read_u16()?;
            if nif.version() == crate::NifVersion::BETHESDA && nif.beth_version() > 0 {
                self.material_crc = nif.read_u32()?;
            }
        }
        if nif.read_bool()? {
            self.normals = nif.read_array(count)?;
            if self.data_flags & Self::HAS_TANGENTS != 0 {
                self.tangents = nif.read_array(count)?;
                self.bitangents = nif.read_array(count)?;
            }
        }
        self.bounds = nif.read()?;
        if nif.read_bool()? {
            self.colors = nif.read_array(count)?;
        }
        if nif.until(4, 2, 2, 0) {
            self.data_flags = nif.read_u16()?;
        }

        // Old files store the UV set count directly; newer ones pack it in the low bits.
        let mut uv_count = self.data_flags;
        if nif.since(4, 2, 2, 1) {
            uv_count &= 0x3F;
            if nif.beth_version() > 0 {
                uv_count &= 0x1;
            }
        }
        let has_uvs = if nif.until(4, 0, 0, 2) {
            nif.read_bool()?
        } else {
            true
        };
        if has_uvs {
            for _ in 0..uv_count {
                self.uv_sets.push(nif.read_array(count)?);
            }
        }

        if nif.since(10, 0, 1, 0) {
            self.consistency = nif.read_u16()?;
        }
        if nif.since(20, 0, 0, 4) {
            // Additional data link, never used by the exporters we read.
            nif.skip(4)?;
        }
        Ok(())
    }
}

macro_rules! geometry_data_subtype {
    ($name:ident) => {
        impl_as_ref!($name { NiGeometryData => base; });
    };
}

/// Indexed triangles.
#[derive(Debug, Clone, Default)]
pub struct NiTriShapeData {
    pub base: NiGeometryData,
    pub triangle_count: u16,
    pub triangles: Vec<Triangle>,
    pub match_groups: Vec<Vec<u16>>,
}

geometry_data_subtype!(NiTriShapeData);

impl ReadRecord for NiTriShapeData {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.triangle_count = nif.read_u16()?;
        let mut index_count = nif.read_u32()? as usize;
        if nif.since(10, 1, 0, 0) && !nif.read_bool()? {
            index_count = 0;
        }
        let indices: Vec<u16> = nif.read_array(index_count)?;
        self.triangles = indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
            .collect();
        let groups = nif.read_u16()?;
        for _ in 0..groups {
            let count = usize::from(nif.read_u16()?);
            self.match_groups.push(nif.read_array(count)?);
        }
        Ok(())
    }
}

/// Triangle strips.
#[derive(Debug, Clone, Default)]
pub struct NiTriStripsData {
    pub base: NiGeometryData,
    pub triangle_count: u16,
    pub strips: Vec<Vec<u16>>,
}

geometry_data_subtype!(NiTriStripsData);

impl NiTriStripsData {
    /// Expand the strips into a triangle list, dropping degenerate triangles.
    pub fn triangles(&self) -> Vec<Triangle> {
        let mut triangles = Vec::new();
        for strip in &self.strips {
            for (i, window) in strip.windows(3).enumerate() {
                let [a, b, c] = [window[0], window[1], window[2]];
                if a == b || b == c || a == c {
                    continue;
                }
                triangles.push(if i % 2 == 0 { [a, b, c] } else { [a, c, b] });
            }
        }
        triangles
    }
}

impl ReadRecord for NiTriStripsData {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.triangle_count = nif.read_u16()?;
        let strip_count = usize::from(nif.read_u16()?);
        let lengths: Vec<u16> = nif.read_array(strip_count)?;
        if nif.until(10, 0, 1, 2) || nif.read_bool()? {
            for length in lengths {
                self.strips.push(nif.read_array(usize::from(length))?);
            }
        }
        Ok(())
    }
}

/// Line segments between consecutive vertices.
#[derive(Debug, Clone, Default)]
pub struct NiLinesData {
    pub base: NiGeometryData,
    /// Per vertex: connect to the next vertex when bit 0 is set.
    pub connect: Vec<u8>,
}

geometry_data_subtype!(NiLinesData);

impl NiLinesData {
    /// Vertex index pairs for every connected segment; the last vertex wraps to the first.
    pub fn lines(&self) -> Vec<[u16; 2]> {
        let count = self.connect.len();
        (0..count)
            .filter(|&i| self.connect[i] & 1 != 0)
            .filter_map(|i| {
                let a = u16::try_from(i).ok()?;
                let b = u16::try_from((i + 1) % count).ok()?;
                (a != b).then_some([a, b])
            })
            .collect()
    }
}

impl ReadRecord for NiLinesData {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.connect = nif.read_bytes(usize::from(self.base.vertex_count))?;
        Ok(())
    }
}

/// Per-particle state for old particle systems.
#[derive(Debug, Clone, Default)]
pub struct NiParticlesData {
    pub base: NiGeometryData,
    pub particle_count: u16,
    pub radii: Vec<f32>,
    pub active_count: u16,
    pub sizes: Vec<f32>,
    pub rotations: Vec<Quaternion>,
    pub rotation_angles: Vec<f32>,
    pub rotation_axes: Vec<Vector3>,
    pub has_texture_indices: bool,
    pub subtexture_offsets: Vec<Vector4>,
    pub aspect_ratio: f32,
    pub aspect_flags: u16,
    pub speed_to_aspect: [f32; 2],
}

/// Auto-normal particle data decodes identically.
pub type NiAutoNormalParticlesData = NiParticlesData;

geometry_data_subtype!(NiParticlesData);

impl ReadRecord for NiParticlesData {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        let count = usize::from(self.base.vertex_count);
        if nif.until(4, 0, 0, 2) {
            self.particle_count = nif.read_u16()?;
        }
        let bs202 = nif.version() == crate::NifVersion::BETHESDA && nif.beth_version() > 0;
        let radii = if nif.until(4, 0, 0, 2) {
            1
        } else if !bs202 && nif.read_bool()? {
            count
        } else {
            0
        };
        self.radii = nif.read_array(radii)?;
        self.active_count = nif.read_u16()?;
        if !bs202 && nif.read_bool()? {
            self.sizes = nif.read_array(count)?;
        }
        if nif.since(10, 0, 1, 0) {
            if !bs202 && nif.read_bool()? {
                self.rotations = nif.read_array(count)?;
            }
            if nif.since(20, 0, 0, 4) {
                if !bs202 && nif.read_bool()? {
                    self.rotation_angles = nif.read_array(count)?;
                }
                if !bs202 && nif.read_bool()? {
                    self.rotation_axes = nif.read_array(count)?;
                }
                if bs202 {
                    self.has_texture_indices = nif.read_bool()?;
                    let offsets = if nif.beth_version() <= beth::FO3 {
                        usize::from(nif.read_u8()?)
                    } else {
                        nif.read_u32()? as usize
                    };
                    self.subtexture_offsets = nif.read_array(offsets)?;
                    if nif.beth_version() > beth::FO3 {
                        self.aspect_ratio = nif.read_f32()?;
                        self.aspect_flags = nif.read_u16()?;
                        self.speed_to_aspect = nif.read()?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Particle data with per-particle rotations.
#[derive(Debug, Clone, Default)]
pub struct NiRotatingParticlesData {
    pub base: NiParticlesData,
}

impl_as_ref!(NiRotatingParticlesData {
    NiParticlesData => base;
    NiGeometryData => base.base;
});

impl ReadRecord for NiRotatingParticlesData {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if nif.until(4, 2, 2, 0) && nif.read_bool()? {
            let count = usize::from(self.base.base.vertex_count);
            self.base.rotations = nif.read_array(count)?;
        }
        Ok(())
    }
}

/// Binds geometry to a skeleton.
#[derive(Debug, Clone, Default)]
pub struct NiSkinInstance {
    pub data: RecordLink<NiSkinData>,
    pub partition: RecordLink<NiSkinPartition>,
    pub root: RecordLink<Node>,
    pub bones: Vec<RecordLink<Node>>,
}

impl ReadRecord for NiSkinInstance {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.data = nif.read_link()?;
        if nif.since(10, 1, 0, 101) {
            self.partition = nif.read_link()?;
        }
        self.root = nif.read_link()?;
        self.bones = nif.read_link_list()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        let data = ctx.cast(&self.data)?;
        ctx.link(&self.partition)?;
        let root = ctx.link(&self.root)?;
        let (Some(data), Some(_)) = (data, root) else {
            return Err(ctx.invalid("missing root or data"));
        };
        if data.bones.len() != self.bones.len() {
            return Err(ctx.invalid(format!(
                "{} bones but skin data has {}",
                self.bones.len(),
                data.bones.len()
            )));
        }
        for bone in &self.bones {
            match ctx.link(bone)? {
                Some(node) => ctx.mark_bone(node.index()),
                None => return Err(ctx.invalid("missing bone")),
            }
        }
        Ok(())
    }
}

/// A body part covered by a dismemberable skin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct BodyPart {
    pub flags: u16,
    pub part: u16,
}

/// A skin instance split into dismemberable body parts.
#[derive(Debug, Clone, Default)]
pub struct BSDismemberSkinInstance {
    pub base: NiSkinInstance,
    pub parts: Vec<BodyPart>,
}

impl_as_ref!(BSDismemberSkinInstance { NiSkinInstance => base; });

impl ReadRecord for BSDismemberSkinInstance {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        let count = nif.read_u32()? as usize;
        self.parts = nif.read_array(count)?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// Rotation, translation and scale as stored by skin data.
#[derive(Debug, Clone, Copy, PartialEq, Default, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct SkinTransform {
    pub rotation: Matrix3,
    pub translation: Vector3,
    pub scale: f32,
}

/// Influence of one bone on one vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default, FromBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct VertexWeight {
    pub vertex: u16,
    pub weight: f32,
}

/// Bind pose and weights for one bone.
#[derive(Debug, Clone, Default)]
pub struct BoneData {
    pub transform: SkinTransform,
    pub bounds: BoundingSphere,
    pub weights: Vec<VertexWeight>,
}

/// Bind poses and vertex weights for a skin instance.
#[derive(Debug, Clone, Default)]
pub struct NiSkinData {
    pub transform: SkinTransform,
    pub partition: RecordLink<NiSkinPartition>,
    pub bones: Vec<BoneData>,
}

impl ReadRecord for NiSkinData {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.transform = nif.read()?;
        let bone_count = nif.read_u32()?;
        if nif.since(4, 0, 0, 2) && nif.until(10, 1, 0, 0) {
            self.partition = nif.read_link()?;
        }
        let has_weights = if nif.since(4, 2, 1, 0) {
            nif.read_u8()? != 0
        } else {
            true
        };
        for _ in 0..bone_count {
            let transform = nif.read()?;
            let bounds = nif.read()?;
            let count = usize::from(nif.read_u16()?);
            let weights = if has_weights {
                nif.read_array(count)?
            } else {
                Vec::new()
            };
            self.bones.push(BoneData {
                transform,
                bounds,
                weights,
            });
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.partition)?;
        Ok(())
    }
}

/// One hardware skinning partition.
#[derive(Debug, Clone, Default)]
pub struct SkinPartition {
    pub bones: Vec<u16>,
    pub vertex_map: Vec<u16>,
    pub weights: Vec<f32>,
    pub strips: Vec<Vec<u16>>,
    pub triangles: Vec<Triangle>,
    pub bone_indices: Vec<u8>,
    pub lod_level: u8,
    pub global_vb: bool,
    pub vertex_desc: u64,
    pub true_triangles: Vec<Triangle>,
}

impl SkinPartition {
    fn read(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        let mut partition = Self::default();
        let vertices = usize::from(nif.read_u16()?);
        let triangles = usize::from(nif.read_u16()?);
        let bones = usize::from(nif.read_u16()?);
        let strips = usize::from(nif.read_u16()?);
        let bones_per_vertex = usize::from(nif.read_u16()?);
        partition.bones = nif.read_array(bones)?;

        let presence_flags = nif.since(10, 1, 0, 0);
        if !presence_flags || nif.read_bool()? {
            partition.vertex_map = nif.read_array(vertices)?;
        }
        if !presence_flags || nif.read_bool()? {
            partition.weights = nif.read_array(vertices * bones_per_vertex)?;
        }
        let lengths: Vec<u16> = nif.read_array(strips)?;
        if !presence_flags || nif.read_bool()? {
            if strips > 0 {
                for length in lengths {
                    partition.strips.push(nif.read_array(usize::from(length))?);
                }
            } else {
                partition.triangles = nif.read_array(triangles)?;
            }
        }
        if !presence_flags || nif.read_bool()? {
            partition.bone_indices = nif.read_bytes(vertices * bones_per_vertex)?;
        }
        if nif.beth_version() > beth::FO3 {
            partition.lod_level = nif.read_u8()?;
            partition.global_vb = nif.read_byte_bool()?;
        }
        if nif.beth_version() == beth::SSE {
            partition.vertex_desc = nif.read_u64()?;
            partition.true_triangles = nif.read_array(triangles)?;
        }
        Ok(partition)
    }
}

/// Skin data split for hardware skinning.
#[derive(Debug, Clone, Default)]
pub struct NiSkinPartition {
    pub vertex_size: u32,
    pub vertex_desc: u64,
    /// Packed vertices shared by all partitions (Skyrim SE).
    pub vertex_data: Vec<u8>,
    pub partitions: Vec<SkinPartition>,
}

impl ReadRecord for NiSkinPartition {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        let count = nif.read_u32()?;
        if nif.beth_version() == beth::SSE {
            let data_size = nif.read_u32()? as usize;
            self.vertex_size = nif.read_u32()?;
            self.vertex_desc = nif.read_u64()?;
            self.vertex_data = nif.read_bytes(data_size)?;
        }
        for _ in 0..count {
            self.partitions.push(SkinPartition::read(nif)?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{stream, ByteWriter};
    use crate::NifVersion;

    fn morrowind_triangle() -> ByteWriter {
        ByteWriter::new()
            .u16(3)
            // vertices
            .i32(1)
            .f32(0.0)
            .f32(0.0)
            .f32(0.0)
            .f32(1.0)
            .f32(0.0)
            .f32(0.0)
            .f32(0.0)
            .f32(1.0)
            .f32(0.0)
            // no normals
            .i32(0)
            // bounds
            .f32(0.5)
            .f32(0.5)
            .f32(0.0)
            .f32(1.0)
            // no colors
            .i32(0)
            // one UV set
            .u16(1)
            .i32(1)
            .f32(0.0)
            .f32(0.0)
            .f32(1.0)
            .f32(0.0)
            .f32(0.0)
            .f32(1.0)
    }

    #[test]
    fn test_morrowind_tri_shape_data() {
        let bytes = morrowind_triangle()
            .u16(1)
            .u32(3)
            .u16(0)
            .u16(1)
            .u16(2)
            .u16(0)
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND);
        let mut data = NiTriShapeData::default();
        data.read(&mut nif).unwrap();

        assert_eq!(data.base.vertices.len(), 3);
        assert_eq!(data.base.vertices[1], Vector3::new(1.0, 0.0, 0.0));
        assert!(data.base.normals.is_empty());
        assert_eq!(data.base.uv_sets.len(), 1);
        assert_eq!(data.base.uv_sets[0][2], Vector2 { x: 0.0, y: 1.0 });
        assert_eq!(data.triangles, vec![[0, 1, 2]]);
        assert_eq!(nif.position(), bytes.len() as u64);
    }

    #[test]
    fn test_strips_expand_with_alternating_winding() {
        let data = NiTriStripsData {
            strips: vec![vec![0, 1, 2, 3, 3, 4]],
            ..Default::default()
        };
        assert_eq!(data.triangles(), vec![[0, 1, 2], [1, 3, 2]]);
    }

    #[test]
    fn test_lines_wrap_around() {
        let data = NiLinesData {
            connect: vec![1, 0, 1],
            ..Default::default()
        };
        assert_eq!(data.lines(), vec![[0, 1], [2, 0]]);
    }

    #[test]
    fn test_skin_data_weights() {
        let mut writer = ByteWriter::new();
        // skin transform: identity rotation, zero translation, unit scale
        for value in [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0] {
            writer = writer.f32(value);
        }
        writer = writer.u32(1).i32(-1);
        for value in [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0] {
            writer = writer.f32(value);
        }
        let bytes = writer
            .f32(0.0)
            .f32(0.0)
            .f32(0.0)
            .f32(2.0)
            .u16(2)
            .u16(0)
            .f32(0.75)
            .u16(2)
            .f32(0.25)
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND);
        let mut data = NiSkinData::default();
        data.read(&mut nif).unwrap();

        assert_eq!(data.bones.len(), 1);
        assert!(data.partition.is_empty());
        let weights = &data.bones[0].weights;
        assert_eq!(weights.len(), 2);
        let VertexWeight { vertex, weight } = weights[1];
        assert_eq!((vertex, weight), (2, 0.25));
        assert_eq!(nif.position(), bytes.len() as u64);
    }
}
