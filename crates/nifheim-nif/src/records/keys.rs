//! Animation key lists.

use nifheim_common::math::{Color4, Quaternion, Vector3};
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::{DecodeResult, NifStream};

/// How values between two keys are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationType {
    #[default]
    Unknown,
    Linear,
    Quadratic,
    Tbc,
    Xyz,
    Constant,
}

impl InterpolationType {
    fn from_raw(raw: u32) -> Self {
        match raw {
            1 => Self::Linear,
            2 => Self::Quadratic,
            3 => Self::Tbc,
            4 => Self::Xyz,
            5 => Self::Constant,
            _ => Self::Unknown,
        }
    }
}

/// Tension, bias and continuity of a TBC key.
#[derive(Debug, Clone, Copy, PartialEq, Default, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Tbc {
    pub tension: f32,
    pub bias: f32,
    pub continuity: f32,
}

/// A value that can be keyed.
pub trait KeyValue: Copy + Default {
    /// Quadratic keys of this type carry forward and backward tangents.
    const HAS_TANGENTS: bool = true;

    fn read_value(nif: &mut NifStream<'_>) -> DecodeResult<Self>;
}

impl KeyValue for f32 {
    fn read_value(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        nif.read_f32()
    }
}

impl KeyValue for Vector3 {
    fn read_value(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        nif.read()
    }
}

impl KeyValue for Color4 {
    fn read_value(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        nif.read()
    }
}

impl KeyValue for bool {
    fn read_value(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        Ok(nif.read_u8()? != 0)
    }
}

impl KeyValue for Quaternion {
    const HAS_TANGENTS: bool = false;

    fn read_value(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        nif.read()
    }
}

/// One key.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Key<T> {
    pub time: f32,
    pub value: T,
    pub forward: T,
    pub backward: T,
    pub tbc: Tbc,
}

/// A list of keys sharing one interpolation type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyMap<T> {
    pub interpolation: InterpolationType,
    pub keys: Vec<Key<T>>,
}

impl<T: KeyValue> KeyMap<T> {
    /// Read a key list.
    ///
    /// Morph key lists always store the interpolation type, even when empty.
    pub fn read(nif: &mut NifStream<'_>, morph: bool) -> DecodeResult<Self> {
        let count = nif.read_u32()?;
        let mut map = Self::default();
        if count == 0 && !morph {
            return Ok(map);
        }
        let raw = nif.read_u32()?;
        map.interpolation = InterpolationType::from_raw(raw);
        if count == 0 {
            return Ok(map);
        }

        match map.interpolation {
            InterpolationType::Linear | InterpolationType::Constant => {
                for _ in 0..count {
                    let time = nif.read_f32()?;
                    let value = T::read_value(nif)?;
                    map.keys.push(Key {
                        time,
                        value,
                        ..Key::default()
                    });
                }
            }
            InterpolationType::Quadratic => {
                for _ in 0..count {
                    let mut key = Key {
                        time: nif.read_f32()?,
                        value: T::read_value(nif)?,
                        ..Key::default()
                    };
                    if T::HAS_TANGENTS {
                        key.forward = T::read_value(nif)?;
                        key.backward = T::read_value(nif)?;
                    }
                    map.keys.push(key);
                }
            }
            InterpolationType::Tbc => {
                for _ in 0..count {
                    let time = nif.read_f32()?;
                    let value = T::read_value(nif)?;
                    let tbc = nif.read()?;
                    map.keys.push(Key {
                        time,
                        value,
                        tbc,
                        ..Key::default()
                    });
                }
            }
            // Euler rotations store their keys in three separate float lists.
            InterpolationType::Xyz => {}
            InterpolationType::Unknown => {
                return Err(nif.invalid(format!("unknown key interpolation type {}", raw)));
            }
        }
        Ok(map)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{stream, ByteWriter};
    use crate::NifVersion;

    #[test]
    fn test_linear_float_keys() {
        let bytes = ByteWriter::new()
            .u32(2)
            .u32(1)
            .f32(0.0)
            .f32(1.0)
            .f32(1.5)
            .f32(3.0)
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND);
        let map = KeyMap::<f32>::read(&mut nif, false).unwrap();
        assert_eq!(map.interpolation, InterpolationType::Linear);
        assert_eq!(map.keys.len(), 2);
        assert_eq!(map.keys[1].time, 1.5);
        assert_eq!(map.keys[1].value, 3.0);
        assert_eq!(nif.position(), bytes.len() as u64);
    }

    #[test]
    fn test_quadratic_quaternions_have_no_tangents() {
        let bytes = ByteWriter::new()
            .u32(1)
            .u32(2)
            .f32(0.5)
            .f32(1.0)
            .f32(0.0)
            .f32(0.0)
            .f32(0.0)
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND);
        let map = KeyMap::<Quaternion>::read(&mut nif, false).unwrap();
        assert_eq!(map.keys[0].value, Quaternion::IDENTITY);
        assert_eq!(nif.position(), bytes.len() as u64);
    }

    #[test]
    fn test_tbc_keys() {
        let bytes = ByteWriter::new()
            .u32(1)
            .u32(3)
            .f32(0.0)
            .f32(2.0)
            .f32(0.1)
            .f32(0.2)
            .f32(0.3)
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND);
        let map = KeyMap::<f32>::read(&mut nif, false).unwrap();
        assert_eq!(map.keys[0].tbc.continuity, 0.3);
    }

    #[test]
    fn test_empty_morph_keys_still_store_type() {
        let bytes = ByteWriter::new().u32(0).u32(1).finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND);
        let map = KeyMap::<f32>::read(&mut nif, true).unwrap();
        assert!(map.is_empty());
        assert_eq!(nif.position(), 8);
    }

    #[test]
    fn test_unknown_interpolation_is_rejected() {
        let bytes = ByteWriter::new().u32(1).u32(9).finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND);
        assert!(KeyMap::<f32>::read(&mut nif, false).is_err());
    }
}
