//! Interpolators feeding single-interpolator controllers.

use nifheim_common::math::{Color4, Quaternion, Vector3};

use crate::link::{Interpolator, RecordLink};
use crate::record::ReadRecord;
use crate::records::{NiBoolData, NiColorData, NiFloatData, NiKeyframeData, NiPosData};
use crate::resolve::PostContext;
use crate::{DecodeResult, NifStream};

/// A translation, rotation and scale, each possibly flagged unused.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuatTransform {
    pub translation: Vector3,
    pub rotation: Quaternion,
    pub scale: f32,
}

impl Default for QuatTransform {
    fn default() -> Self {
        Self {
            translation: Vector3::default(),
            rotation: Quaternion::IDENTITY,
            scale: 1.0,
        }
    }
}

impl QuatTransform {
    fn read(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        let mut transform = Self {
            translation: nif.read()?,
            rotation: nif.read()?,
            scale: nif.read_f32()?,
        };
        if nif.until(10, 1, 0, 109) {
            if !nif.read_bool()? {
                transform.translation = Vector3::default();
            }
            if !nif.read_bool()? {
                transform.rotation = Quaternion::IDENTITY;
            }
            if !nif.read_bool()? {
                transform.scale = 1.0;
            }
        }
        Ok(transform)
    }
}

macro_rules! value_interpolator {
    ($(#[$doc:meta])* $name:ident, $value:ty, $data:ty, $read:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            pub value: $value,
            pub data: RecordLink<$data>,
        }

        impl ReadRecord for $name {
            fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
                let read: fn(&mut NifStream<'_>) -> DecodeResult<$value> = $read;
                self.value = read(nif)?;
                self.data = nif.read_link()?;
                Ok(())
            }

            fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
                ctx.link(&self.data)?;
                Ok(())
            }
        }
    };
}

value_interpolator!(
    /// Interpolates a boolean.
    NiBoolInterpolator, bool, NiBoolData, |nif| nif.read_bool()
);
value_interpolator!(
    /// Interpolates a float.
    NiFloatInterpolator, f32, NiFloatData, |nif| nif.read_f32()
);
value_interpolator!(
    /// Interpolates a position.
    NiPoint3Interpolator, Vector3, NiPosData, |nif| nif.read()
);
value_interpolator!(
    /// Interpolates a color.
    NiColorInterpolator, Color4, NiColorData, |nif| nif.read()
);
value_interpolator!(
    /// Interpolates a full transform from keyframes.
    NiTransformInterpolator, QuatTransform, NiKeyframeData, QuatTransform::read
);

/// The timeline variant decodes identically.
pub type NiBoolTimelineInterpolator = NiBoolInterpolator;

/// One weighted input of a blend interpolator.
#[derive(Debug, Clone, Default)]
pub struct BlendItem {
    pub interpolator: RecordLink<Interpolator>,
    pub weight: f32,
    pub normalized_weight: f32,
    pub priority: i32,
    pub ease_spinner: f32,
}

impl BlendItem {
    fn read(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        Ok(Self {
            interpolator: nif.read_link()?,
            weight: nif.read_f32()?,
            normalized_weight: nif.read_f32()?,
            priority: if nif.until(10, 1, 0, 109) {
                nif.read_i32()?
            } else {
                i32::from(nif.read_u8()?)
            },
            ease_spinner: nif.read_f32()?,
        })
    }
}

/// State shared by all blend interpolators.
#[derive(Debug, Clone, Default)]
pub struct NiBlendInterpolator {
    pub flags: u8,
    pub weight_threshold: f32,
    pub interp_count: u16,
    pub single_index: u16,
    pub high_priority: i32,
    pub next_high_priority: i32,
    pub single_interpolator: RecordLink<Interpolator>,
    pub single_time: f32,
    pub high_weights_sum: f32,
    pub next_high_weights_sum: f32,
    pub high_ease_spinner: f32,
    pub items: Vec<BlendItem>,
}

impl NiBlendInterpolator {
    pub const MANAGER_CONTROLLED: u8 = 0x1;
    pub const ONLY_USE_HIGHEST_WEIGHT: u8 = 0x2;

    fn read_items(&mut self, nif: &mut NifStream<'_>, count: usize) -> DecodeResult<()> {
        for _ in 0..count {
            self.items.push(BlendItem::read(nif)?);
        }
        Ok(())
    }
}

impl ReadRecord for NiBlendInterpolator {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        if nif.since(10, 1, 0, 112) {
            self.flags = nif.read_u8()?;
            let count = nif.read_u8()? as usize;
            self.weight_threshold = nif.read_f32()?;
            if self.flags & Self::MANAGER_CONTROLLED == 0 {
                self.interp_count = u16::from(nif.read_u8()?);
                self.single_index = u16::from(nif.read_u8()?);
                self.high_priority = i32::from(nif.read_i8()?);
                self.next_high_priority = i32::from(nif.read_i8()?);
                self.single_time = nif.read_f32()?;
                self.high_weights_sum = nif.read_f32()?;
                self.next_high_weights_sum = nif.read_f32()?;
                self.high_ease_spinner = nif.read_f32()?;
                self.read_items(nif, count)?;
            }
            return Ok(());
        }

        let count = if nif.until(10, 1, 0, 109) {
            let count = nif.read_u16()? as usize;
            // Array grow-by.
            nif.skip(2)?;
            count
        } else {
            nif.read_u8()? as usize
        };
        self.read_items(nif, count)?;
        if nif.read_bool()? {
            self.flags |= Self::MANAGER_CONTROLLED;
        }
        self.weight_threshold = nif.read_f32()?;
        if nif.read_bool()? {
            self.flags |= Self::ONLY_USE_HIGHEST_WEIGHT;
        }
        if nif.until(10, 1, 0, 109) {
            self.interp_count = nif.read_u16()?;
            self.single_index = nif.read_u16()?;
        } else {
            self.interp_count = u16::from(nif.read_u8()?);
            self.single_index = u16::from(nif.read_u8()?);
        }
        if nif.since(10, 1, 0, 108) {
            self.single_interpolator = nif.read_link()?;
            self.single_time = nif.read_f32()?;
        }
        if nif.until(10, 1, 0, 109) {
            self.high_priority = nif.read_i32()?;
            self.next_high_priority = nif.read_i32()?;
        } else {
            self.high_priority = i32::from(nif.read_i8()?);
            self.next_high_priority = i32::from(nif.read_i8()?);
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        for item in &self.items {
            ctx.link(&item.interpolator)?;
        }
        ctx.link(&self.single_interpolator)?;
        Ok(())
    }
}

macro_rules! blend_interpolator {
    ($(#[$doc:meta])* $name:ident, $value:ty, |$nif:ident| $read:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            pub base: NiBlendInterpolator,
            pub value: $value,
        }

        impl_as_ref!($name { NiBlendInterpolator => base; });

        impl ReadRecord for $name {
            fn read(&mut self, $nif: &mut NifStream<'_>) -> DecodeResult<()> {
                self.base.read($nif)?;
                if let Some(value) = $read {
                    self.value = value;
                }
                Ok(())
            }

            fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
                self.base.post(ctx)
            }
        }
    };
}

blend_interpolator!(
    /// Blends boolean interpolators.
    NiBlendBoolInterpolator, bool, |nif| Some(nif.read_u8()? != 0)
);
blend_interpolator!(
    /// Blends float interpolators.
    NiBlendFloatInterpolator, f32, |nif| Some(nif.read_f32()?)
);
blend_interpolator!(
    /// Blends position interpolators.
    NiBlendPoint3Interpolator, Vector3, |nif| Some(nif.read()?)
);
blend_interpolator!(
    /// Blends transform interpolators; old files also store a default transform.
    NiBlendTransformInterpolator, QuatTransform, |nif| if nif.until(10, 1, 0, 109) {
        Some(QuatTransform::read(nif)?)
    } else {
        None
    }
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{stream, ByteWriter};
    use crate::NifVersion;

    #[test]
    fn test_float_interpolator() {
        let bytes = ByteWriter::new().f32(0.25).i32(4).finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::OBLIVION);
        let mut interp = NiFloatInterpolator::default();
        interp.read(&mut nif).unwrap();
        assert_eq!(interp.value, 0.25);
        assert_eq!(interp.data.get(), Some(4));
    }

    #[test]
    fn test_manager_controlled_blend_has_no_items() {
        let bytes = ByteWriter::new().u8(1).u8(3).f32(0.1).f32(2.0).finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::OBLIVION);
        let mut interp = NiBlendFloatInterpolator::default();
        interp.read(&mut nif).unwrap();
        assert!(interp.base.items.is_empty());
        assert_eq!(interp.value, 2.0);
        assert_eq!(nif.position(), bytes.len() as u64);
    }

    #[test]
    fn test_unmanaged_blend_reads_items() {
        let bytes = ByteWriter::new()
            .u8(0)
            .u8(1)
            .f32(0.0)
            .u8(1)
            .u8(0)
            .i8(-1)
            .i8(-1)
            .f32(0.0)
            .f32(1.0)
            .f32(0.0)
            .f32(0.0)
            // item
            .i32(7)
            .f32(1.0)
            .f32(1.0)
            .u8(2)
            .f32(0.0)
            // value
            .f32(5.0)
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::OBLIVION);
        let mut interp = NiBlendFloatInterpolator::default();
        interp.read(&mut nif).unwrap();
        assert_eq!(interp.base.items.len(), 1);
        assert_eq!(interp.base.items[0].interpolator.get(), Some(7));
        assert_eq!(interp.base.items[0].priority, 2);
        assert_eq!(interp.value, 5.0);
    }
}
