//! Lights and projected texture effects.

use nifheim_common::math::{Color3, Matrix3, Vector3, Vector4};

use crate::link::{Node, RecordLink};
use crate::record::ReadRecord;
use crate::records::{NiAVObject, NiObjectNET, NiSourceTexture};
use crate::resolve::PostContext;
use crate::version::beth;
use crate::{DecodeResult, NifStream};

/// A scene graph object that affects other objects.
#[derive(Debug, Clone, Default)]
pub struct NiDynamicEffect {
    pub base: NiAVObject,
    pub switch_state: bool,
    pub affected_nodes: Vec<RecordLink<Node>>,
}

impl_as_ref!(NiDynamicEffect {
    NiAVObject => base;
    NiObjectNET => base.base;
});

impl ReadRecord for NiDynamicEffect {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.switch_state = true;
        if nif.beth_version() >= beth::FO4 {
            return Ok(());
        }
        if nif.since(10, 1, 0, 106) {
            self.switch_state = nif.read_byte_bool()?;
        }
        if nif.until(4, 0, 0, 2) {
            // Raw pointers into the exporter's memory, meaningless on load.
            let count = nif.read_u32()? as usize;
            nif.skip(count.saturating_mul(4))?;
        } else if nif.since(10, 1, 0, 0) {
            self.affected_nodes = nif.read_link_list()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.links(&self.affected_nodes)?;
        Ok(())
    }
}

macro_rules! effect_subtype {
    ($name:ident) => {
        impl_as_ref!($name {
            NiDynamicEffect => base;
            NiAVObject => base.base;
            NiObjectNET => base.base.base;
        });
    };
}

/// A light source; ambient and directional lights carry nothing more.
#[derive(Debug, Clone, Default)]
pub struct NiLight {
    pub base: NiDynamicEffect,
    pub dimmer: f32,
    pub ambient: Color3,
    pub diffuse: Color3,
    pub specular: Color3,
}

/// An ambient light.
pub type NiAmbientLight = NiLight;
/// A directional light.
pub type NiDirectionalLight = NiLight;

effect_subtype!(NiLight);

impl ReadRecord for NiLight {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.dimmer = nif.read_f32()?;
        self.ambient = nif.read()?;
        self.diffuse = nif.read()?;
        self.specular = nif.read()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// A light with distance attenuation.
#[derive(Debug, Clone, Default)]
pub struct NiPointLight {
    pub base: NiLight,
    pub constant_attenuation: f32,
    pub linear_attenuation: f32,
    pub quadratic_attenuation: f32,
}

impl_as_ref!(NiPointLight {
    NiLight => base;
    NiDynamicEffect => base.base;
    NiAVObject => base.base.base;
    NiObjectNET => base.base.base.base;
});

impl ReadRecord for NiPointLight {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.constant_attenuation = nif.read_f32()?;
        self.linear_attenuation = nif.read_f32()?;
        self.quadratic_attenuation = nif.read_f32()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// A point light restricted to a cone.
#[derive(Debug, Clone, Default)]
pub struct NiSpotLight {
    pub base: NiPointLight,
    pub outer_spot_angle: f32,
    pub inner_spot_angle: f32,
    pub exponent: f32,
}

impl_as_ref!(NiSpotLight {
    NiPointLight => base;
    NiLight => base.base;
    NiDynamicEffect => base.base.base;
    NiAVObject => base.base.base.base;
    NiObjectNET => base.base.base.base.base;
});

impl ReadRecord for NiSpotLight {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.outer_spot_angle = nif.read_f32()?;
        if nif.since(20, 2, 0, 5) {
            self.inner_spot_angle = nif.read_f32()?;
        }
        self.exponent = nif.read_f32()?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// A texture projected onto the affected nodes.
#[derive(Debug, Clone, Default)]
pub struct NiTextureEffect {
    pub base: NiDynamicEffect,
    pub projection_rotation: Matrix3,
    pub projection_position: Vector3,
    pub filter_mode: u32,
    pub max_anisotropy: u16,
    pub clamp_mode: u32,
    pub texture_type: u32,
    pub coordinate_generation: u32,
    pub texture: RecordLink<NiSourceTexture>,
    pub enable_clipping_plane: bool,
    pub clipping_plane: Vector4,
}

effect_subtype!(NiTextureEffect);

impl NiTextureEffect {
    /// Environment maps are handled differently from projected lights and shadows.
    pub fn is_environment_map(&self) -> bool {
        self.texture_type == 2
    }
}

impl ReadRecord for NiTextureEffect {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.projection_rotation = nif.read()?;
        self.projection_position = nif.read()?;
        self.filter_mode = nif.read_u32()?;
        if nif.since(20, 5, 0, 4) {
            self.max_anisotropy = nif.read_u16()?;
        }
        self.clamp_mode = nif.read_u32()?;
        self.texture_type = nif.read_u32()?;
        self.coordinate_generation = nif.read_u32()?;
        self.texture = nif.read_link()?;
        self.enable_clipping_plane = nif.read_u8()? != 0;
        self.clipping_plane = nif.read()?;
        if nif.until(10, 2, 0, 0) {
            nif.skip(4)?;
        }
        if nif.until(4, 1, 0, 12) {
            nif.skip(2)?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.texture)?;
        Ok(())
    }
}
