//! Keyframe and morph data referenced by controllers and interpolators.

use nifheim_common::math::{Color4, Quaternion, Vector3};

use crate::link::{AvObject, RecordLink};
use crate::record::ReadRecord;
use crate::records::{InterpolationType, KeyMap};
use crate::resolve::PostContext;
use crate::{DecodeResult, NifStream};

macro_rules! key_data {
    ($(#[$doc:meta])* $name:ident, $value:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            pub keys: KeyMap<$value>,
        }

        impl ReadRecord for $name {
            fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
                self.keys = KeyMap::read(nif, false)?;
                Ok(())
            }
        }
    };
}

key_data!(
    /// Position keys.
    NiPosData, Vector3
);
key_data!(
    /// Float keys.
    NiFloatData, f32
);
key_data!(
    /// Color keys.
    NiColorData, Color4
);
key_data!(
    /// Boolean keys.
    NiBoolData, bool
);

/// Rotation, translation and scale keys.
#[derive(Debug, Clone, Default)]
pub struct NiKeyframeData {
    pub rotations: KeyMap<Quaternion>,
    /// Euler axis order, only for XYZ rotations.
    pub axis_order: u32,
    pub x_rotations: KeyMap<f32>,
    pub y_rotations: KeyMap<f32>,
    pub z_rotations: KeyMap<f32>,
    pub translations: KeyMap<Vector3>,
    pub scales: KeyMap<f32>,
}

/// Newer name for keyframe data.
pub type NiTransformData = NiKeyframeData;

impl ReadRecord for NiKeyframeData {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.rotations = KeyMap::read(nif, false)?;
        if self.rotations.interpolation == InterpolationType::Xyz {
            if nif.until(10, 1, 0, 0) {
                self.axis_order = nif.read_u32()?;
            }
            self.x_rotations = KeyMap::read(nif, false)?;
            self.y_rotations = KeyMap::read(nif, false)?;
            self.z_rotations = KeyMap::read(nif, false)?;
        }
        self.translations = KeyMap::read(nif, false)?;
        self.scales = KeyMap::read(nif, false)?;
        Ok(())
    }
}

/// One morph target.
#[derive(Debug, Clone, Default)]
pub struct Morph {
    pub name: String,
    pub keys: KeyMap<f32>,
    pub vertices: Vec<Vector3>,
}

/// Vertex morph targets.
#[derive(Debug, Clone, Default)]
pub struct NiMorphData {
    pub relative_targets: bool,
    pub morphs: Vec<Morph>,
}

impl ReadRecord for NiMorphData {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        let morph_count = nif.read_u32()?;
        let vertex_count = nif.read_u32()? as usize;
        self.relative_targets = nif.read_u8()? != 0;
        for _ in 0..morph_count {
            let mut morph = Morph::default();
            if nif.since(10, 1, 0, 106) {
                morph.name = nif.read_string()?;
            }
            if nif.until(10, 1, 0, 0) {
                morph.keys = KeyMap::read(nif, true)?;
            }
            if nif.since(10, 1, 0, 104) && nif.until(20, 1, 0, 2) && nif.beth_version() < 10 {
                // Legacy weight.
                nif.skip(4)?;
            }
            morph.vertices = nif.read_array(vertex_count)?;
            self.morphs.push(morph);
        }
        Ok(())
    }
}

/// Visibility keys.
#[derive(Debug, Clone, Default)]
pub struct NiVisData {
    pub keys: Vec<(f32, bool)>,
}

impl ReadRecord for NiVisData {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        let count = nif.read_u32()?;
        for _ in 0..count {
            let time = nif.read_f32()?;
            let visible = nif.read_u8()? != 0;
            self.keys.push((time, visible));
        }
        Ok(())
    }
}

/// Texture coordinate animation: U and V translation and tiling.
#[derive(Debug, Clone, Default)]
pub struct NiUVData {
    pub keys: [KeyMap<f32>; 4],
}

impl ReadRecord for NiUVData {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        for keys in &mut self.keys {
            *keys = KeyMap::read(nif, false)?;
        }
        Ok(())
    }
}

/// Name lookup for objects animated by a controller manager.
#[derive(Debug, Clone, Default)]
pub struct NiDefaultAVObjectPalette {
    pub scene: RecordLink<AvObject>,
    pub objects: Vec<(String, RecordLink<AvObject>)>,
}

impl ReadRecord for NiDefaultAVObjectPalette {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.scene = nif.read_link()?;
        let count = nif.read_u32()?;
        for _ in 0..count {
            let name = nif.read_sized_string()?;
            let object = nif.read_link()?;
            self.objects.push((name, object));
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.scene)?;
        for (_, object) in &self.objects {
            ctx.link(object)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{stream, ByteWriter};
    use crate::NifVersion;

    #[test]
    fn test_keyframe_data_with_euler_rotations() {
        let bytes = ByteWriter::new()
            // rotations: one XYZ key, no payload
            .u32(1)
            .u32(4)
            .u32(0)
            // x, y, z: empty
            .u32(0)
            .u32(0)
            .u32(0)
            // translations: one linear key
            .u32(1)
            .u32(1)
            .f32(0.0)
            .f32(1.0)
            .f32(2.0)
            .f32(3.0)
            // scales: empty
            .u32(0)
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND);
        let mut data = NiKeyframeData::default();
        data.read(&mut nif).unwrap();
        assert_eq!(data.rotations.interpolation, InterpolationType::Xyz);
        assert!(data.rotations.is_empty());
        assert_eq!(data.translations.keys[0].value, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(nif.position(), bytes.len() as u64);
    }

    #[test]
    fn test_morph_data() {
        let bytes = ByteWriter::new()
            .u32(1)
            .u32(2)
            .u8(1)
            // morph keys: empty but typed
            .u32(0)
            .u32(2)
            .f32(1.0)
            .f32(0.0)
            .f32(0.0)
            .f32(0.0)
            .f32(1.0)
            .f32(0.0)
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND);
        let mut data = NiMorphData::default();
        data.read(&mut nif).unwrap();
        assert!(data.relative_targets);
        assert_eq!(data.morphs.len(), 1);
        assert_eq!(data.morphs[0].keys.interpolation, InterpolationType::Quadratic);
        assert_eq!(data.morphs[0].vertices[1], Vector3::new(0.0, 1.0, 0.0));
    }
}
