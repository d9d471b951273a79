//! Render state attached to scene graph objects.

use nifheim_common::math::{Color3, Color4, Vector2, Vector3, Vector4};

use crate::link::RecordLink;
use crate::record::ReadRecord;
use crate::records::{BSShaderTextureSet, NiObjectNET, NiSourceTexture};
use crate::resolve::PostContext;
use crate::version::beth;
use crate::{DecodeResult, NifStream};

macro_rules! property {
    (
        $(#[$doc:meta])*
        $name:ident { $($field:ident: $ty:ty),* $(,)? }
        |$this:ident, $nif:ident| $body:block
    ) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            pub base: NiObjectNET,
            $(pub $field: $ty,)*
        }

        impl_as_ref!($name { NiObjectNET => base; });

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

property! {
    /// Alpha blending and testing.
    NiAlphaProperty { flags: u16, threshold: u8 }
    |this, nif| {
        this.flags = nif.read_u16()?;
        this.threshold = nif.read_u8()?;
    }
}

impl NiAlphaProperty {
    pub fn use_blending(&self) -> bool {
        self.flags & 0x1 != 0
    }

    pub fn use_testing(&self) -> bool {
        self.flags & 0x200 != 0
    }

    /// Source blend factor.
    pub fn source_blend(&self) -> u16 {
        (self.flags >> 1) & 0xF
    }

    /// Destination blend factor.
    pub fn destination_blend(&self) -> u16 {
        (self.flags >> 5) & 0xF
    }

    pub fn test_function(&self) -> u16 {
        (self.flags >> 10) & 0x7
    }
}

property! {
    /// A property that is only a set of flags: dithering, specular
    /// highlights or wireframe rendering.
    NiFlagProperty { flags: u16 }
    |this, nif| {
        this.flags = nif.read_u16()?;
    }
}

pub type NiDitherProperty = NiFlagProperty;
pub type NiSpecularProperty = NiFlagProperty;
pub type NiWireframeProperty = NiFlagProperty;

property! {
    /// Smooth or flat shading.
    NiShadeProperty { flags: u16 }
    |this, nif| {
        if nif.beth_version() <= beth::FO3 {
            this.flags = nif.read_u16()?;
        }
    }
}

property! {
    NiFogProperty { flags: u16, depth: f32, color: Color3 }
    |this, nif| {
        this.flags = nif.read_u16()?;
        this.depth = nif.read_f32()?;
        this.color = nif.read()?;
    }
}

property! {
    /// Lighting material colors.
    NiMaterialProperty {
        flags: u16,
        ambient: Color3,
        diffuse: Color3,
        specular: Color3,
        emissive: Color3,
        glossiness: f32,
        alpha: f32,
        emissive_multiplier: f32,
    }
    |this, nif| {
        if nif.since(3, 0, 0, 0) && nif.until(10, 0, 1, 2) {
            this.flags = nif.read_u16()?;
        }
        this.ambient = Color3 { r: 1.0, g: 1.0, b: 1.0 };
        this.diffuse = Color3 { r: 1.0, g: 1.0, b: 1.0 };
        if nif.beth_version() < 26 {
            this.ambient = nif.read()?;
            this.diffuse = nif.read()?;
        }
        this.specular = nif.read()?;
        this.emissive = nif.read()?;
        this.glossiness = nif.read_f32()?;
        this.alpha = nif.read_f32()?;
        this.emissive_multiplier = 1.0;
        if nif.beth_version() >= 22 {
            this.emissive_multiplier = nif.read_f32()?;
        }
    }
}

property! {
    /// Stencil buffer test and actions.
    NiStencilProperty {
        flags: u16,
        enabled: bool,
        test_function: u32,
        reference: u32,
        mask: u32,
        fail_action: u32,
        z_fail_action: u32,
        pass_action: u32,
        draw_mode: u32,
    }
    |this, nif| {
        if nif.until(10, 0, 1, 2) {
            this.flags = nif.read_u16()?;
        }
        if nif.until(20, 0, 0, 4) {
            this.enabled = nif.read_u8()? != 0;
            this.test_function = nif.read_u32()?;
            this.reference = nif.read_u32()?;
            this.mask = nif.read_u32()?;
            this.fail_action = nif.read_u32()?;
            this.z_fail_action = nif.read_u32()?;
            this.pass_action = nif.read_u32()?;
            this.draw_mode = nif.read_u32()?;
        } else {
            this.flags = nif.read_u16()?;
            let flags = u32::from(this.flags);
            this.enabled = flags & 0x1 != 0;
            this.fail_action = (flags >> 1) & 0x7;
            this.z_fail_action = (flags >> 4) & 0x7;
            this.pass_action = (flags >> 7) & 0x7;
            this.draw_mode = (flags >> 10) & 0x3;
            this.test_function = (flags >> 12) & 0x7;
            this.reference = nif.read_u32()?;
            this.mask = nif.read_u32()?;
        }
    }
}

property! {
    /// How vertex colors feed into lighting.
    NiVertexColorProperty { flags: u16, vertex_mode: u32, lighting_mode: u32 }
    |this, nif| {
        this.flags = nif.read_u16()?;
        if nif.until(20, 0, 0, 5) {
            this.vertex_mode = nif.read_u32()?;
            this.lighting_mode = nif.read_u32()?;
        } else {
            this.vertex_mode = u32::from((this.flags >> 4) & 0x3);
            this.lighting_mode = u32::from((this.flags >> 3) & 0x1);
        }
    }
}

property! {
    /// Depth buffer test and write.
    NiZBufferProperty { flags: u16, test_function: u32 }
    |this, nif| {
        this.flags = nif.read_u16()?;
        this.test_function = if nif.since(4, 1, 0, 12) && nif.until(20, 0, 0, 5) {
            nif.read_u32()?
        } else {
            u32::from((this.flags >> 2) & 0x7)
        };
    }
}

impl NiZBufferProperty {
    pub fn depth_test(&self) -> bool {
        self.flags & 0x1 != 0
    }

    pub fn depth_write(&self) -> bool {
        self.flags & 0x2 != 0
    }
}

/// Texture coordinate transform of a texture slot.
#[derive(Debug, Clone, Default)]
pub struct TexTransform {
    pub translation: Vector2,
    pub scale: Vector2,
    pub rotation: f32,
    pub method: u32,
    pub origin: Vector2,
}

/// One texture slot.
#[derive(Debug, Clone, Default)]
pub struct TexDesc {
    pub enabled: bool,
    pub source: RecordLink<NiSourceTexture>,
    pub clamp: u32,
    pub filter: u32,
    pub uv_set: u32,
    pub transform: Option<TexTransform>,
}

impl TexDesc {
    fn read(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        let mut desc = Self {
            enabled: nif.read_bool()?,
            ..Self::default()
        };
        if !desc.enabled {
            return Ok(desc);
        }
        if nif.since(3, 3, 0, 13) {
            desc.source = nif.read_link()?;
        }
        if nif.until(20, 0, 0, 5) {
            desc.clamp = nif.read_u32()?;
            desc.filter = nif.read_u32()?;
        } else {
            let flags = u32::from(nif.read_u16()?);
            desc.clamp = flags & 0xF;
            desc.filter = (flags >> 4) & 0xF;
        }
        if nif.since(20, 5, 0, 4) {
            // Max anisotropy.
            nif.skip(2)?;
        }
        if nif.until(20, 0, 0, 5) {
            desc.uv_set = nif.read_u32()?;
        }
        if nif.until(10, 4, 0, 1) {
            // PS2 filtering.
            nif.skip(4)?;
        }
        if nif.until(4, 1, 0, 12) {
            nif.skip(2)?;
        }
        if nif.since(10, 1, 0, 0) && nif.read_bool()? {
            desc.transform = Some(TexTransform {
                translation: nif.read()?,
                scale: nif.read()?,
                rotation: nif.read_f32()?,
                method: nif.read_u32()?,
                origin: nif.read()?,
            });
        }
        Ok(desc)
    }
}

/// Fixed-function texture slots.
pub mod slot {
    pub const BASE: usize = 0;
    pub const DARK: usize = 1;
    pub const DETAIL: usize = 2;
    pub const GLOSS: usize = 3;
    pub const GLOW: usize = 4;
    pub const BUMP: usize = 5;
    pub const NORMAL: usize = 6;
    pub const PARALLAX: usize = 7;
    pub const DECAL0: usize = 8;
}

/// Fixed-function multitexturing.
#[derive(Debug, Clone, Default)]
pub struct NiTexturingProperty {
    pub base: NiObjectNET,
    pub flags: u16,
    pub apply_mode: u32,
    pub textures: Vec<TexDesc>,
    pub env_map_luma_bias: Vector2,
    pub bump_map_matrix: Vector4,
    pub parallax_offset: f32,
    pub shader_textures: Vec<TexDesc>,
}

impl_as_ref!(NiTexturingProperty { NiObjectNET => base; });

impl NiTexturingProperty {
    /// The texture slot at `index`, if present and enabled.
    pub fn texture(&self, index: usize) -> Option<&TexDesc> {
        self.textures.get(index).filter(|desc| desc.enabled)
    }
}

impl ReadRecord for NiTexturingProperty {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if nif.until(10, 0, 1, 2) || nif.since(20, 1, 0, 2) {
            self.flags = nif.read_u16()?;
        }
        self.apply_mode = 2;
        if nif.until(20, 1, 0, 1) {
            self.apply_mode = nif.read_u32()?;
        }
        let count = nif.read_u32()? as usize;
        for index in 0..count {
            let desc = TexDesc::read(nif)?;
            if index == slot::BUMP && desc.enabled {
                self.env_map_luma_bias = nif.read()?;
                self.bump_map_matrix = nif.read()?;
            } else if index == slot::PARALLAX && desc.enabled && nif.since(20, 2, 0, 5) {
                self.parallax_offset = nif.read_f32()?;
            }
            self.textures.push(desc);
        }
        if nif.since(10, 0, 1, 0) {
            let count = nif.read_u32()?;
            for _ in 0..count {
                let desc = TexDesc::read(nif)?;
                if desc.enabled {
                    // Shader map identifier.
                    nif.skip(4)?;
                }
                self.shader_textures.push(desc);
            }
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        let enabled = self.textures.iter().chain(&self.shader_textures).filter(|desc| desc.enabled);
        for desc in enabled {
            ctx.link(&desc.source)?;
        }
        Ok(())
    }
}

/// Shading flags shared by Bethesda shader properties.
#[derive(Debug, Clone, Default)]
pub struct BSShaderProperty {
    pub base: NiShadeProperty,
    pub shader_type: u32,
    pub shader_flags1: u32,
    pub shader_flags2: u32,
    pub env_map_scale: f32,
}

impl_as_ref!(BSShaderProperty {
    NiShadeProperty => base;
    NiObjectNET => base.base;
});

impl ReadRecord for BSShaderProperty {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        if nif.beth_version() <= beth::FO3 {
            self.shader_type = nif.read_u32()?;
            self.shader_flags1 = nif.read_u32()?;
            self.shader_flags2 = nif.read_u32()?;
            self.env_map_scale = nif.read_f32()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

fn read_clamp(nif: &mut NifStream<'_>) -> DecodeResult<u32> {
    if nif.beth_version() <= beth::FO3 {
        nif.read_u32()
    } else {
        Ok(3)
    }
}

/// Per-pixel lit shader used by Fallout 3 and New Vegas.
#[derive(Debug, Clone, Default)]
pub struct BSShaderPPLightingProperty {
    pub base: BSShaderProperty,
    pub clamp: u32,
    pub texture_set: RecordLink<BSShaderTextureSet>,
    pub refraction_strength: f32,
    pub refraction_period: i32,
    pub parallax_passes: f32,
    pub parallax_scale: f32,
    pub emissive_color: Color4,
}

impl_as_ref!(BSShaderPPLightingProperty {
    BSShaderProperty => base;
    NiObjectNET => base.base.base;
});

impl ReadRecord for BSShaderPPLightingProperty {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.clamp = read_clamp(nif)?;
        self.texture_set = nif.read_link()?;
        if nif.beth_version() >= 15 {
            self.refraction_strength = nif.read_f32()?;
            self.refraction_period = nif.read_i32()?;
        }
        if nif.beth_version() >= 25 {
            self.parallax_passes = nif.read_f32()?;
            self.parallax_scale = nif.read_f32()?;
        }
        if nif.beth_version() >= beth::FO3 {
            self.emissive_color = nif.read()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.texture_set)?;
        Ok(())
    }
}

/// Unlit shader with a single texture file.
#[derive(Debug, Clone, Default)]
pub struct BSShaderNoLightingProperty {
    pub base: BSShaderProperty,
    pub clamp: u32,
    pub file_name: String,
    pub falloff: Vector4,
}

impl_as_ref!(BSShaderNoLightingProperty {
    BSShaderProperty => base;
    NiObjectNET => base.base.base;
});

impl ReadRecord for BSShaderNoLightingProperty {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.clamp = read_clamp(nif)?;
        self.file_name = nif.read_sized_string()?;
        if nif.beth_version() >= 27 {
            self.falloff = nif.read()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

/// Newest shader layout this crate decodes.
const LAST_SHADER_LAYOUT: u32 = 139;

/// Shader flags; after Fallout 4 they are stored as lists of name hashes.
fn read_shader_flags(nif: &mut NifStream<'_>, shader: &mut BSShaderProperty) -> DecodeResult<Vec<u32>> {
    if nif.beth_version() > LAST_SHADER_LAYOUT {
        return Err(nif.invalid(format!(
            "shader layout of Bethesda version {} is not supported",
            nif.beth_version()
        )));
    }
    if nif.beth_version() <= beth::FO4 {
        shader.shader_flags1 = nif.read_u32()?;
        shader.shader_flags2 = nif.read_u32()?;
        return Ok(Vec::new());
    }
    let count = nif.read_u32()? as usize;
    nif.read_array(count)
}

/// Wetness response of Fallout 4 materials.
#[derive(Debug, Clone, Default)]
pub struct WetnessParams {
    pub spec_scale: f32,
    pub spec_power: f32,
    pub min_var: f32,
    pub env_map_scale: f32,
    pub fresnel_power: f32,
    pub metalness: f32,
}

impl WetnessParams {
    fn read(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        let mut params = Self {
            spec_scale: nif.read_f32()?,
            spec_power: nif.read_f32()?,
            min_var: nif.read_f32()?,
            ..Self::default()
        };
        if nif.beth_version() == beth::FO4 {
            params.env_map_scale = nif.read_f32()?;
        }
        params.fresnel_power = nif.read_f32()?;
        params.metalness = nif.read_f32()?;
        if nif.beth_version() > beth::FO4 {
            nif.skip(4)?;
        }
        Ok(params)
    }
}

/// Parameters specific to one lighting shader type.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ShaderTypeData {
    #[default]
    None,
    EnvironmentMap {
        scale: f32,
        use_ssr: bool,
        wetness_use_ssr: bool,
    },
    SkinTint {
        color: Color3,
        alpha: f32,
    },
    HairTint {
        color: Color3,
    },
    ParallaxOcclusion {
        passes: f32,
        scale: f32,
    },
    MultiLayerParallax {
        inner_thickness: f32,
        refraction_scale: f32,
        inner_texture_scale: Vector2,
        env_map_strength: f32,
    },
    SparkleSnow {
        parameters: Vector4,
    },
    EyeEnvironmentMap {
        scale: f32,
        left_reflection_center: Vector3,
        right_reflection_center: Vector3,
    },
}

impl ShaderTypeData {
    fn read(nif: &mut NifStream<'_>, shader_type: u32) -> DecodeResult<Self> {
        let fallout4 = nif.beth_version() >= beth::FO4;
        Ok(match shader_type {
            1 => {
                let scale = nif.read_f32()?;
                let (use_ssr, wetness_use_ssr) = if fallout4 {
                    (nif.read_byte_bool()?, nif.read_byte_bool()?)
                } else {
                    (false, false)
                };
                Self::EnvironmentMap {
                    scale,
                    use_ssr,
                    wetness_use_ssr,
                }
            }
            5 => Self::SkinTint {
                color: nif.read()?,
                alpha: if fallout4 { nif.read_f32()? } else { 1.0 },
            },
            6 => Self::HairTint { color: nif.read()? },
            7 => Self::ParallaxOcclusion {
                passes: nif.read_f32()?,
                scale: nif.read_f32()?,
            },
            11 => Self::MultiLayerParallax {
                inner_thickness: nif.read_f32()?,
                refraction_scale: nif.read_f32()?,
                inner_texture_scale: nif.read()?,
                env_map_strength: nif.read_f32()?,
            },
            14 => Self::SparkleSnow {
                parameters: nif.read()?,
            },
            16 => Self::EyeEnvironmentMap {
                scale: nif.read_f32()?,
                left_reflection_center: nif.read()?,
                right_reflection_center: nif.read()?,
            },
            _ => Self::None,
        })
    }
}

/// The lighting shader of Skyrim and Fallout 4.
#[derive(Debug, Clone, Default)]
pub struct BSLightingShaderProperty {
    pub base: BSShaderProperty,
    pub flag_hashes: Vec<u32>,
    pub uv_offset: Vector2,
    pub uv_scale: Vector2,
    pub texture_set: RecordLink<BSShaderTextureSet>,
    pub emissive: Color3,
    pub emissive_multiplier: f32,
    pub root_material: String,
    pub clamp: u32,
    pub alpha: f32,
    pub refraction_strength: f32,
    /// Glossiness before Fallout 4, smoothness from then on.
    pub glossiness: f32,
    pub specular: Color3,
    pub specular_strength: f32,
    pub lighting_effects: [f32; 2],
    pub subsurface_rolloff: f32,
    pub rimlight_power: f32,
    pub backlight_power: f32,
    pub grayscale_to_palette_scale: f32,
    pub fresnel_power: f32,
    pub wetness: Option<WetnessParams>,
    pub type_data: ShaderTypeData,
}

impl_as_ref!(BSLightingShaderProperty {
    BSShaderProperty => base;
    NiObjectNET => base.base.base;
});

impl ReadRecord for BSLightingShaderProperty {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        let shader_type = if nif.beth_version() <= beth::FO4 {
            nif.read_u32()?
        } else {
            0
        };
        self.base.read(nif)?;
        self.base.shader_type = shader_type;
        self.flag_hashes = read_shader_flags(nif, &mut self.base)?;
        self.uv_offset = nif.read()?;
        self.uv_scale = nif.read()?;
        self.texture_set = nif.read_link()?;
        self.emissive = nif.read()?;
        self.emissive_multiplier = nif.read_f32()?;
        let fallout4 = nif.beth_version() >= beth::FO4;
        if fallout4 {
            self.root_material = nif.read_string()?;
        }
        self.clamp = nif.read_u32()?;
        self.alpha = nif.read_f32()?;
        self.refraction_strength = nif.read_f32()?;
        self.glossiness = nif.read_f32()?;
        self.specular = nif.read()?;
        self.specular_strength = nif.read_f32()?;
        if fallout4 {
            self.subsurface_rolloff = nif.read_f32()?;
            self.rimlight_power = nif.read_f32()?;
            if self.rimlight_power == f32::MAX {
                self.backlight_power = nif.read_f32()?;
            }
            self.grayscale_to_palette_scale = nif.read_f32()?;
            self.fresnel_power = nif.read_f32()?;
            self.wetness = Some(WetnessParams::read(nif)?);
        } else {
            self.lighting_effects = nif.read()?;
        }
        self.type_data = ShaderTypeData::read(nif, shader_type)?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.texture_set)?;
        Ok(())
    }
}

/// Shader for glow, fire and other unlit effects.
#[derive(Debug, Clone, Default)]
pub struct BSEffectShaderProperty {
    pub base: BSShaderProperty,
    pub flag_hashes: Vec<u32>,
    pub uv_offset: Vector2,
    pub uv_scale: Vector2,
    pub source_texture: String,
    pub clamp: u8,
    pub lighting_influence: u8,
    pub env_map_min_lod: u8,
    pub falloff: Vector4,
    pub base_color: Color4,
    pub base_color_scale: f32,
    pub falloff_depth: f32,
    pub greyscale_texture: String,
    pub env_map_texture: String,
    pub normal_texture: String,
    pub env_mask_texture: String,
    pub env_map_scale: f32,
}

impl_as_ref!(BSEffectShaderProperty {
    BSShaderProperty => base;
    NiObjectNET => base.base.base;
});

impl ReadRecord for BSEffectShaderProperty {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.flag_hashes = read_shader_flags(nif, &mut self.base)?;
        self.uv_offset = nif.read()?;
        self.uv_scale = nif.read()?;
        self.source_texture = nif.read_sized_string()?;
        let misc = nif.read_u32()?;
        self.clamp = (misc & 0xFF) as u8;
        self.lighting_influence = ((misc >> 8) & 0xFF) as u8;
        self.env_map_min_lod = ((misc >> 16) & 0xFF) as u8;
        self.falloff = nif.read()?;
        self.base_color = nif.read()?;
        self.base_color_scale = nif.read_f32()?;
        self.falloff_depth = nif.read_f32()?;
        self.greyscale_texture = nif.read_sized_string()?;
        if nif.beth_version() >= beth::FO4 {
            self.env_map_texture = nif.read_sized_string()?;
            self.normal_texture = nif.read_sized_string()?;
            self.env_mask_texture = nif.read_sized_string()?;
            self.env_map_scale = nif.read_f32()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{stream, stream_with, ByteWriter};
    use crate::NifVersion;

    fn net_header(writer: ByteWriter) -> ByteWriter {
        writer.sized_string("").i32(-1).i32(-1)
    }

    #[test]
    fn test_alpha_property() {
        let bytes = net_header(ByteWriter::new()).u16(0x00ED).u8(128).finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND);
        let mut alpha = NiAlphaProperty::default();
        alpha.read(&mut nif).unwrap();
        assert!(alpha.use_blending());
        assert!(!alpha.use_testing());
        assert_eq!(alpha.source_blend(), 6);
        assert_eq!(alpha.destination_blend(), 7);
        assert_eq!(alpha.threshold, 128);
    }

    #[test]
    fn test_morrowind_texturing_property() {
        let bytes = net_header(ByteWriter::new())
            .u16(0)
            .u32(2)
            .u32(2)
            // Base texture.
            .i32(1)
            .i32(4)
            .u32(3)
            .u32(2)
            .u32(0)
            .u32(0)
            .u16(0)
            // Dark texture, disabled.
            .i32(0)
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND);
        let mut texturing = NiTexturingProperty::default();
        texturing.read(&mut nif).unwrap();
        assert_eq!(texturing.textures.len(), 2);
        let base = texturing.texture(slot::BASE).unwrap();
        assert_eq!(base.source.get(), Some(4));
        assert_eq!(base.clamp, 3);
        assert!(texturing.texture(slot::DARK).is_none());
        assert_eq!(nif.position(), bytes.len() as u64);
    }

    #[test]
    fn test_skyrim_lighting_shader() {
        let bytes = ByteWriter::new()
            .u32(5)
            // Name index, extra data, controller.
            .u32(0)
            .u32(0)
            .i32(-1)
            .u32(0x8000_0000)
            .u32(0x1)
            .f32(0.0)
            .f32(0.0)
            .f32(1.0)
            .f32(1.0)
            .i32(3)
            .f32(0.0)
            .f32(0.0)
            .f32(0.0)
            .f32(1.0)
            .u32(3)
            .f32(1.0)
            .f32(1.0)
            .f32(80.0)
            .f32(1.0)
            .f32(1.0)
            .f32(1.0)
            .f32(1.0)
            .f32(0.3)
            .f32(2.0)
            // Skin tint.
            .f32(0.8)
            .f32(0.6)
            .f32(0.5)
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream_with(
            &mut source,
            NifVersion::BETHESDA,
            12,
            beth::SKY,
            vec!["Body".into()],
        );
        let mut shader = BSLightingShaderProperty::default();
        shader.read(&mut nif).unwrap();
        assert_eq!(shader.base.base.base.name, "Body");
        assert_eq!(shader.base.shader_type, 5);
        assert_eq!(shader.texture_set.get(), Some(3));
        assert_eq!(shader.glossiness, 80.0);
        assert_eq!(
            shader.type_data,
            ShaderTypeData::SkinTint {
                color: Color3 { r: 0.8, g: 0.6, b: 0.5 },
                alpha: 1.0,
            }
        );
        assert_eq!(nif.position(), bytes.len() as u64);
    }
}
