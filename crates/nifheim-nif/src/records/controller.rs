//! Time controllers and controller sequences.

use nifheim_common::math::{Color4, Vector3};
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::link::{
    AnyRecord, AvObject, BlendInterpolator, Controller, Interpolator, ObjectNet,
    ParticleCollider, ParticleModifier, RecordLink,
};
use crate::record::ReadRecord;
use crate::records::{
    NiDefaultAVObjectPalette, NiFloatData, NiKeyframeData, NiMorphData, NiPosData,
    NiSourceTexture, NiStringPalette, NiTextKeyExtraData, NiUVData, NiVisData,
};
use crate::resolve::PostContext;
use crate::{DecodeResult, NifStream};

/// Timing and target shared by every controller.
#[derive(Debug, Clone, Default)]
pub struct NiTimeController {
    pub next: RecordLink<Controller>,
    pub flags: u16,
    pub frequency: f32,
    pub phase: f32,
    pub start_time: f32,
    pub stop_time: f32,
    pub target: RecordLink<ObjectNet>,
}

impl NiTimeController {
    /// Check whether the controller is switched on.
    pub fn is_active(&self) -> bool {
        self.flags & 0x8 != 0
    }

    /// Extrapolation mode stored in bits 1-2 of the flags.
    pub fn extrapolation(&self) -> u16 {
        (self.flags >> 1) & 0x3
    }
}

impl ReadRecord for NiTimeController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.next = nif.read_link()?;
        self.flags = nif.read_u16()?;
        self.frequency = nif.read_f32()?;
        self.phase = nif.read_f32()?;
        self.start_time = nif.read_f32()?;
        self.stop_time = nif.read_f32()?;
        if nif.since(3, 3, 0, 13) {
            self.target = nif.read_link()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.next)?;
        ctx.link(&self.target)?;
        Ok(())
    }
}

/// A controller that may be driven by a controller manager.
#[derive(Debug, Clone, Default)]
pub struct NiInterpController {
    pub base: NiTimeController,
    pub manager_controlled: bool,
}

impl_as_ref!(NiInterpController { NiTimeController => base; });

impl ReadRecord for NiInterpController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if nif.since(10, 1, 0, 104) && nif.until(10, 1, 0, 108) {
            self.manager_controlled = nif.read_byte_bool()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// A controller fed by one interpolator.
#[derive(Debug, Clone, Default)]
pub struct NiSingleInterpController {
    pub base: NiInterpController,
    pub interpolator: RecordLink<Interpolator>,
}

impl_as_ref!(NiSingleInterpController {
    NiInterpController => base;
    NiTimeController => base.base;
});

impl ReadRecord for NiSingleInterpController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if nif.since(10, 1, 0, 104) {
            self.interpolator = nif.read_link()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.interpolator)?;
        Ok(())
    }
}

macro_rules! single_interp_subtype {
    ($name:ident) => {
        impl_as_ref!($name {
            NiSingleInterpController => base;
            NiInterpController => base.base;
            NiTimeController => base.base.base;
        });
    };
}

/// A controller animating one float, such as alpha or roll.
#[derive(Debug, Clone, Default)]
pub struct NiFloatInterpController {
    pub base: NiSingleInterpController,
    pub data: RecordLink<NiFloatData>,
}

/// Animates material alpha.
pub type NiAlphaController = NiFloatInterpController;
/// Rotates the target about its axis.
pub type NiRollController = NiFloatInterpController;

single_interp_subtype!(NiFloatInterpController);

impl ReadRecord for NiFloatInterpController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if nif.until(10, 1, 0, 103) {
            self.data = nif.read_link()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.data)?;
        Ok(())
    }
}

/// Toggles visibility over time.
#[derive(Debug, Clone, Default)]
pub struct NiVisController {
    pub base: NiSingleInterpController,
    pub data: RecordLink<NiVisData>,
}

single_interp_subtype!(NiVisController);

impl ReadRecord for NiVisController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if nif.until(10, 1, 0, 103) {
            self.data = nif.read_link()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.data)?;
        Ok(())
    }
}

/// Animates one material color.
#[derive(Debug, Clone, Default)]
pub struct NiMaterialColorController {
    pub base: NiSingleInterpController,
    /// Ambient, diffuse, specular or emissive.
    pub target_color: u16,
    pub data: RecordLink<NiPosData>,
}

single_interp_subtype!(NiMaterialColorController);

impl ReadRecord for NiMaterialColorController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.target_color = if nif.since(10, 1, 0, 0) {
            nif.read_u16()? & 0x3
        } else {
            (self.base.base.base.flags >> 4) & 0x3
        };
        if nif.until(10, 1, 0, 103) {
            self.data = nif.read_link()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.data)?;
        Ok(())
    }
}

/// Cycles through a list of textures.
#[derive(Debug, Clone, Default)]
pub struct NiFlipController {
    pub base: NiSingleInterpController,
    pub texture_slot: u32,
    pub accumulated_time: f32,
    pub delta: f32,
    pub sources: Vec<RecordLink<NiSourceTexture>>,
}

single_interp_subtype!(NiFlipController);

impl ReadRecord for NiFlipController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.texture_slot = nif.read_u32()?;
        if nif.until(10, 1, 0, 103) {
            self.accumulated_time = nif.read_f32()?;
            self.delta = nif.read_f32()?;
        }
        self.sources = nif.read_link_list()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.links(&self.sources)?;
        Ok(())
    }
}

/// Blends vertex morph targets.
#[derive(Debug, Clone, Default)]
pub struct NiGeomMorpherController {
    pub base: NiInterpController,
    pub update_normals: bool,
    pub data: RecordLink<NiMorphData>,
    pub always_update: bool,
    pub interpolators: Vec<RecordLink<Interpolator>>,
    /// Per-interpolator weights, from 20.1.0.3 on.
    pub weights: Vec<f32>,
}

impl_as_ref!(NiGeomMorpherController {
    NiInterpController => base;
    NiTimeController => base.base;
});

impl ReadRecord for NiGeomMorpherController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if nif.since(10, 0, 1, 2) {
            self.update_normals = nif.read_u16()? & 0x1 != 0;
        }
        self.data = nif.read_link()?;
        if nif.since(4, 0, 0, 1) {
            self.always_update = nif.read_u8()? != 0;
        }
        if nif.since(10, 1, 0, 106) {
            let count = nif.read_u32()? as usize;
            if nif.until(20, 1, 0, 2) {
                self.interpolators = nif.read_links(count)?;
            } else {
                for _ in 0..count {
                    self.interpolators.push(nif.read_link()?);
                    self.weights.push(nif.read_f32()?);
                }
            }
            if nif.since(20, 0, 0, 4) && nif.until(20, 0, 0, 5) && nif.beth_version() > 9 {
                let unknown = nif.read_u32()? as usize;
                nif.skip(unknown.saturating_mul(4))?;
            }
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.data)?;
        ctx.links(&self.interpolators)?;
        Ok(())
    }
}

/// Applies keyframed translation, rotation and scale.
#[derive(Debug, Clone, Default)]
pub struct NiKeyframeController {
    pub base: NiSingleInterpController,
    pub data: RecordLink<NiKeyframeData>,
}

/// Newer name for the keyframe controller.
pub type NiTransformController = NiKeyframeController;

single_interp_subtype!(NiKeyframeController);

impl ReadRecord for NiKeyframeController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if nif.until(10, 1, 0, 103) {
            self.data = nif.read_link()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.data)?;
        Ok(())
    }
}

/// Keeps the target pointed at another object.
#[derive(Debug, Clone, Default)]
pub struct NiLookAtController {
    pub base: NiTimeController,
    pub look_at_flags: u16,
    pub look_at: RecordLink<AvObject>,
}

impl_as_ref!(NiLookAtController { NiTimeController => base; });

impl ReadRecord for NiLookAtController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if nif.since(10, 1, 0, 0) {
            self.look_at_flags = nif.read_u16()?;
        }
        self.look_at = nif.read_link()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.look_at)?;
        Ok(())
    }
}

/// Moves the target along a spline.
#[derive(Debug, Clone, Default)]
pub struct NiPathController {
    pub base: NiTimeController,
    pub path_flags: u16,
    pub bank_direction: i32,
    pub max_bank_angle: f32,
    pub smoothing: f32,
    pub follow_axis: u16,
    pub path_data: RecordLink<NiPosData>,
    pub percent_data: RecordLink<NiFloatData>,
}

impl_as_ref!(NiPathController { NiTimeController => base; });

impl ReadRecord for NiPathController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if nif.since(10, 1, 0, 0) {
            self.path_flags = nif.read_u16()?;
        }
        self.bank_direction = nif.read_i32()?;
        self.max_bank_angle = nif.read_f32()?;
        self.smoothing = nif.read_f32()?;
        self.follow_axis = nif.read_u16()?;
        self.path_data = nif.read_link()?;
        self.percent_data = nif.read_link()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.path_data)?;
        ctx.link(&self.percent_data)?;
        Ok(())
    }
}

/// Scrolls texture coordinates.
#[derive(Debug, Clone, Default)]
pub struct NiUVController {
    pub base: NiTimeController,
    pub uv_set: u16,
    pub data: RecordLink<NiUVData>,
}

impl_as_ref!(NiUVController { NiTimeController => base; });

impl ReadRecord for NiUVController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.uv_set = nif.read_u16()?;
        self.data = nif.read_link()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.data)?;
        Ok(())
    }
}

/// One particle as stored by the old particle system controller.
#[derive(Debug, Clone, Copy, PartialEq, Default, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Particle {
    pub velocity: Vector3,
    pub rotation_axis: Vector3,
    pub lifetime: f32,
    pub lifespan: f32,
    pub timestamp: f32,
    pub code: u16,
    pub vertex: u16,
}

/// The Morrowind-era particle emitter.
#[derive(Debug, Clone, Default)]
pub struct NiParticleSystemController {
    pub base: NiTimeController,
    pub speed: f32,
    pub speed_variation: f32,
    pub declination: f32,
    pub declination_variation: f32,
    pub planar_angle: f32,
    pub planar_angle_variation: f32,
    pub initial_normal: Vector3,
    pub initial_color: Color4,
    pub initial_size: f32,
    pub emit_start_time: f32,
    pub emit_stop_time: f32,
    pub reset_particle_system: bool,
    pub birth_rate: f32,
    pub lifetime: f32,
    pub lifetime_variation: f32,
    pub emit_flags: u16,
    pub emitter_dimensions: Vector3,
    pub emitter: RecordLink<AvObject>,
    pub spawn_generations: u16,
    pub percentage_spawned: f32,
    pub spawn_multiplier: u16,
    pub spawn_speed_chaos: f32,
    pub spawn_direction_chaos: f32,
    pub active_particles: u16,
    pub particles: Vec<Particle>,
    pub modifier: RecordLink<ParticleModifier>,
    pub collider: RecordLink<ParticleCollider>,
    pub static_target_bound: u8,
}

/// The BSP-array variant decodes identically.
pub type NiBSPArrayController = NiParticleSystemController;

impl_as_ref!(NiParticleSystemController { NiTimeController => base; });

impl NiParticleSystemController {
    /// Check whether particles spawn at the emitter's world position.
    pub fn emits_from_world(&self) -> bool {
        self.emit_flags & 0x1 == 0
    }
}

impl ReadRecord for NiParticleSystemController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.speed = nif.read_f32()?;
        self.speed_variation = nif.read_f32()?;
        self.declination = nif.read_f32()?;
        self.declination_variation = nif.read_f32()?;
        self.planar_angle = nif.read_f32()?;
        self.planar_angle_variation = nif.read_f32()?;
        self.initial_normal = nif.read()?;
        self.initial_color = nif.read()?;
        self.initial_size = nif.read_f32()?;
        self.emit_start_time = nif.read_f32()?;
        self.emit_stop_time = nif.read_f32()?;
        self.reset_particle_system = nif.read_u8()? != 0;
        self.birth_rate = nif.read_f32()?;
        self.lifetime = nif.read_f32()?;
        self.lifetime_variation = nif.read_f32()?;
        if nif.since(4, 0, 0, 0) {
            self.emit_flags = nif.read_u16()?;
        }
        self.emitter_dimensions = nif.read()?;
        self.emitter = nif.read_link()?;
        if nif.since(4, 0, 0, 0) {
            self.spawn_generations = nif.read_u16()?;
            self.percentage_spawned = nif.read_f32()?;
            self.spawn_multiplier = nif.read_u16()?;
            self.spawn_speed_chaos = nif.read_f32()?;
            self.spawn_direction_chaos = nif.read_f32()?;
        }
        let count = nif.read_u16()? as usize;
        self.active_particles = nif.read_u16()?;
        self.particles = nif.read_array(count)?;
        // Emitter modifier link, never populated.
        nif.skip(4)?;
        self.modifier = nif.read_link()?;
        self.collider = nif.read_link()?;
        self.static_target_bound = nif.read_u8()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.emitter)?;
        ctx.link(&self.modifier)?;
        ctx.link(&self.collider)?;
        Ok(())
    }
}

/// Plays controller sequences on a subtree.
#[derive(Debug, Clone, Default)]
pub struct NiControllerManager {
    pub base: NiTimeController,
    pub cumulative: bool,
    pub sequences: Vec<RecordLink<NiControllerSequence>>,
    pub object_palette: RecordLink<NiDefaultAVObjectPalette>,
}

impl_as_ref!(NiControllerManager { NiTimeController => base; });

impl ReadRecord for NiControllerManager {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.cumulative = nif.read_byte_bool()?;
        self.sequences = nif.read_link_list()?;
        self.object_palette = nif.read_link()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.links(&self.sequences)?;
        ctx.link(&self.object_palette)?;
        Ok(())
    }
}

/// Animates one component of a texture transform.
#[derive(Debug, Clone, Default)]
pub struct NiTextureTransformController {
    pub base: NiSingleInterpController,
    pub shader_map: bool,
    pub texture_slot: u32,
    pub operation: u32,
    pub data: RecordLink<NiFloatData>,
}

single_interp_subtype!(NiTextureTransformController);

impl ReadRecord for NiTextureTransformController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.shader_map = nif.read_byte_bool()?;
        self.texture_slot = nif.read_u32()?;
        self.operation = nif.read_u32()?;
        if nif.until(10, 1, 0, 103) {
            self.data = nif.read_link()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.data)?;
        Ok(())
    }
}

/// Transform controller driving several targets.
#[derive(Debug, Clone, Default)]
pub struct NiMultiTargetTransformController {
    pub base: NiInterpController,
    pub extra_targets: Vec<RecordLink<AvObject>>,
}

impl_as_ref!(NiMultiTargetTransformController {
    NiInterpController => base;
    NiTimeController => base.base;
});

impl ReadRecord for NiMultiTargetTransformController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        let count = nif.read_u16()? as usize;
        self.extra_targets = nif.read_links(count)?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.links(&self.extra_targets)?;
        Ok(())
    }
}

/// Animates a shader color.
#[derive(Debug, Clone, Default)]
pub struct BSEffectShaderPropertyColorController {
    pub base: NiSingleInterpController,
    pub controlled_color: u32,
}

/// The lighting shader variant decodes identically.
pub type BSLightingShaderPropertyColorController = BSEffectShaderPropertyColorController;

single_interp_subtype!(BSEffectShaderPropertyColorController);

impl ReadRecord for BSEffectShaderPropertyColorController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.controlled_color = nif.read_u32()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// Animates a shader float.
#[derive(Debug, Clone, Default)]
pub struct BSEffectShaderPropertyFloatController {
    pub base: NiSingleInterpController,
    pub controlled_variable: u32,
}

/// The lighting shader variant decodes identically.
pub type BSLightingShaderPropertyFloatController = BSEffectShaderPropertyFloatController;

single_interp_subtype!(BSEffectShaderPropertyFloatController);

impl ReadRecord for BSEffectShaderPropertyFloatController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.controlled_variable = nif.read_u32()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// Blends Havok ragdoll and animation.
#[derive(Debug, Clone, Default)]
pub struct BhkBlendController {
    pub base: NiTimeController,
    pub keys: u32,
}

impl_as_ref!(BhkBlendController { NiTimeController => base; });

impl ReadRecord for BhkBlendController {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.keys = nif.read_u32()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// One animated target inside a sequence.
#[derive(Debug, Clone, Default)]
pub struct ControlledBlock {
    pub target_name: String,
    pub interpolator: RecordLink<Interpolator>,
    pub controller: RecordLink<Controller>,
    pub blend_interpolator: RecordLink<BlendInterpolator>,
    pub blend_index: u16,
    pub priority: u8,
    pub string_palette: RecordLink<NiStringPalette>,
    pub node_name: String,
    pub property_type: String,
    pub controller_type: String,
    pub controller_id: String,
    pub interpolator_id: String,
    /// Offsets into the string palette, for files that store names there.
    pub palette_offsets: [u32; 5],
}

impl ControlledBlock {
    fn read(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        let mut block = Self::default();
        if nif.until(10, 1, 0, 103) {
            block.target_name = nif.read_string()?;
        }
        if nif.since(10, 1, 0, 106) {
            block.interpolator = nif.read_link()?;
        }
        if nif.until(20, 5, 0, 0) {
            block.controller = nif.read_link()?;
        }
        if nif.since(10, 1, 0, 104) && nif.until(10, 1, 0, 110) {
            block.blend_interpolator = nif.read_link()?;
            block.blend_index = nif.read_u16()?;
        }
        if nif.since(10, 1, 0, 106) && nif.beth_version() > 0 {
            block.priority = nif.read_u8()?;
        }
        if nif.since(10, 2, 0, 0) && nif.until(20, 1, 0, 0) {
            block.string_palette = nif.read_link()?;
            block.palette_offsets = nif.read()?;
        } else if nif.since(10, 1, 0, 104) {
            block.node_name = nif.read_string()?;
            block.property_type = nif.read_string()?;
            block.controller_type = nif.read_string()?;
            block.controller_id = nif.read_string()?;
            block.interpolator_id = nif.read_string()?;
        }
        Ok(block)
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.interpolator)?;
        ctx.link(&self.controller)?;
        ctx.link(&self.blend_interpolator)?;
        ctx.link(&self.string_palette)?;
        Ok(())
    }
}

/// A named group of controlled blocks.
#[derive(Debug, Clone, Default)]
pub struct NiSequence {
    pub name: String,
    pub accum_root_name: String,
    pub text_keys: RecordLink<NiTextKeyExtraData>,
    pub array_grow_by: u32,
    pub controlled_blocks: Vec<ControlledBlock>,
}

impl ReadRecord for NiSequence {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.name = nif.read_string()?;
        if nif.until(10, 1, 0, 103) {
            self.accum_root_name = nif.read_string()?;
            self.text_keys = nif.read_link()?;
        }
        let count = nif.read_u32()?;
        if nif.since(10, 1, 0, 106) {
            self.array_grow_by = nif.read_u32()?;
        }
        for _ in 0..count {
            self.controlled_blocks.push(ControlledBlock::read(nif)?);
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.text_keys)?;
        for block in &self.controlled_blocks {
            block.post(ctx)?;
        }
        Ok(())
    }
}

/// A sequence played by a controller manager.
#[derive(Debug, Clone, Default)]
pub struct NiControllerSequence {
    pub base: NiSequence,
    pub weight: f32,
    pub extrapolation_mode: u32,
    pub frequency: f32,
    pub phase: f32,
    pub start_time: f32,
    pub stop_time: f32,
    pub play_backwards: bool,
    pub manager: RecordLink<NiControllerManager>,
    pub string_palette: RecordLink<NiStringPalette>,
    pub anim_notes: Vec<RecordLink<AnyRecord>>,
}

impl_as_ref!(NiControllerSequence { NiSequence => base; });

impl ReadRecord for NiControllerSequence {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if nif.until(10, 1, 0, 103) {
            return Ok(());
        }
        self.weight = nif.read_f32()?;
        self.base.text_keys = nif.read_link()?;
        self.extrapolation_mode = nif.read_u32()?;
        self.frequency = nif.read_f32()?;
        if nif.until(10, 4, 0, 1) {
            self.phase = nif.read_f32()?;
        }
        self.start_time = nif.read_f32()?;
        self.stop_time = nif.read_f32()?;
        if nif.version() == crate::NifVersion::new(10, 1, 0, 106) {
            self.play_backwards = nif.read_byte_bool()?;
        }
        self.manager = nif.read_link()?;
        self.base.accum_root_name = nif.read_string()?;
        if nif.since(10, 1, 0, 113) && nif.until(20, 1, 0, 0) {
            self.string_palette = nif.read_link()?;
        } else if nif.beth_version() >= 24 && nif.beth_version() <= 28 {
            self.anim_notes = vec![nif.read_link()?];
        } else if nif.beth_version() > 28 {
            let count = nif.read_u16()? as usize;
            self.anim_notes = nif.read_links(count)?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.manager)?;
        ctx.link(&self.string_palette)?;
        ctx.links(&self.anim_notes)?;
        Ok(())
    }
}
