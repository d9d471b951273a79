//! Texture sources, pixel data and texture sets.

use nifheim_common::math::ByteColor4;
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::link::RecordLink;
use crate::record::ReadRecord;
use crate::records::NiObjectNET;
use crate::resolve::PostContext;
use crate::{DecodeResult, NifStream};

/// A texture, either a file reference or embedded pixel data.
#[derive(Debug, Clone, Default)]
pub struct NiSourceTexture {
    pub base: NiObjectNET,
    pub external: bool,
    pub file_name: String,
    pub data: RecordLink<NiPixelData>,
    pub pixel_layout: u32,
    pub use_mipmaps: u32,
    pub alpha_format: u32,
    pub is_static: bool,
    pub direct_render: bool,
    pub persist_render_data: bool,
}

impl_as_ref!(NiSourceTexture { NiObjectNET => base; });

impl ReadRecord for NiSourceTexture {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.base.read(nif)?;
        self.external = nif.read_u8()? != 0;
        if self.external || nif.since(10, 1, 0, 0) {
            self.file_name = nif.read_string()?;
        }
        let mut has_data = nif.since(10, 0, 1, 4);
        if !has_data && !self.external {
            has_data = nif.read_u8()? != 0;
        }
        if has_data {
            self.data = nif.read_link()?;
        }
        self.pixel_layout = nif.read_u32()?;
        self.use_mipmaps = nif.read_u32()?;
        self.alpha_format = nif.read_u32()?;
        self.is_static = nif.read_u8()? != 0;
        if nif.since(10, 1, 0, 103) {
            self.direct_render = nif.read_byte_bool()?;
        }
        if nif.since(20, 2, 0, 4) {
            self.persist_render_data = nif.read_byte_bool()?;
        }
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        self.base.post(ctx)?;
        ctx.link(&self.data)?;
        Ok(())
    }
}

/// One channel of a newer pixel format description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelChannel {
    pub kind: u32,
    pub convention: u32,
    pub bits_per_channel: u8,
    pub signed: bool,
}

/// A pixel format description.
#[derive(Debug, Clone, Default)]
pub struct PixelFormat {
    pub format: u32,
    pub color_masks: [u32; 4],
    pub bits_per_pixel: u32,
    pub renderer_hint: u32,
    pub extra_data: u32,
    pub flags: u8,
    pub tiling: u32,
    pub srgb: bool,
    pub channels: [PixelChannel; 4],
}

impl PixelFormat {
    fn read(nif: &mut NifStream<'_>) -> DecodeResult<Self> {
        let mut format = Self {
            format: nif.read_u32()?,
            ..Self::default()
        };
        if nif.until(10, 4, 0, 1) {
            format.color_masks = nif.read()?;
            format.bits_per_pixel = nif.read_u32()?;
            // Old fast-compare bytes.
            nif.skip(8)?;
            if nif.since(10, 1, 0, 0) {
                format.tiling = nif.read_u32()?;
            }
        } else {
            format.bits_per_pixel = u32::from(nif.read_u8()?);
            format.renderer_hint = nif.read_u32()?;
            format.extra_data = nif.read_u32()?;
            format.flags = nif.read_u8()?;
            format.tiling = nif.read_u32()?;
            if nif.since(20, 3, 0, 4) {
                format.srgb = nif.read_byte_bool()?;
            }
            for channel in &mut format.channels {
                channel.kind = nif.read_u32()?;
                channel.convention = nif.read_u32()?;
                channel.bits_per_channel = nif.read_u8()?;
                channel.signed = nif.read_byte_bool()?;
            }
        }
        Ok(format)
    }
}

/// Size and offset of one mipmap level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct Mipmap {
    pub width: u32,
    pub height: u32,
    pub offset: u32,
}

/// Embedded texture pixels.
#[derive(Debug, Clone, Default)]
pub struct NiPixelData {
    pub format: PixelFormat,
    pub palette: RecordLink<NiPalette>,
    pub bytes_per_pixel: u32,
    pub mipmaps: Vec<Mipmap>,
    pub faces: u32,
    pub data: Vec<u8>,
}

impl ReadRecord for NiPixelData {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.format = PixelFormat::read(nif)?;
        self.palette = nif.read_link()?;
        let mipmap_count = nif.read_u32()? as usize;
        self.bytes_per_pixel = nif.read_u32()?;
        self.mipmaps = nif.read_array(mipmap_count)?;
        let pixel_count = nif.read_u32()? as usize;
        self.faces = if nif.since(10, 4, 0, 2) {
            nif.read_u32()?
        } else {
            1
        };
        let size = pixel_count
            .checked_mul(self.faces as usize)
            .ok_or_else(|| nif.invalid("pixel data size overflows"))?;
        self.data = nif.read_bytes(size)?;
        Ok(())
    }

    fn post(&self, ctx: &mut PostContext<'_>) -> DecodeResult<()> {
        ctx.link(&self.palette)?;
        Ok(())
    }
}

/// A color palette for paletted pixel data.
#[derive(Debug, Clone, Default)]
pub struct NiPalette {
    pub use_alpha: bool,
    pub colors: Vec<ByteColor4>,
}

impl ReadRecord for NiPalette {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        self.use_alpha = nif.read_u8()? != 0;
        let count = nif.read_u32()? as usize;
        self.colors = nif.read_array(count)?;
        Ok(())
    }
}

/// Texture paths used by Bethesda shader properties.
#[derive(Debug, Clone, Default)]
pub struct BSShaderTextureSet {
    pub textures: Vec<String>,
}

impl ReadRecord for BSShaderTextureSet {
    fn read(&mut self, nif: &mut NifStream<'_>) -> DecodeResult<()> {
        let count = nif.read_u32()?;
        for _ in 0..count {
            self.textures.push(nif.read_sized_string()?);
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
    fn test_external_source_texture() {
        let bytes = ByteWriter::new()
            // NiObjectNET: name, extra, controller
            .sized_string("")
            .i32(-1)
            .i32(-1)
            .u8(1)
            .sized_string("textures/tx_rock.dds")
            .u32(6)
            .u32(2)
            .u32(3)
            .u8(1)
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::MORROWIND);
        let mut texture = NiSourceTexture::default();
        texture.read(&mut nif).unwrap();
        assert!(texture.external);
        assert_eq!(texture.file_name, "textures/tx_rock.dds");
        assert!(texture.data.is_empty());
        assert_eq!(texture.alpha_format, 3);
        assert_eq!(nif.position(), bytes.len() as u64);
    }

    #[test]
    fn test_texture_set() {
        let bytes = ByteWriter::new()
            .u32(2)
            .sized_string("a.dds")
            .sized_string("a_n.dds")
            .finish();
        let mut source = &bytes[..];
        let mut nif = stream(&mut source, NifVersion::BETHESDA);
        let mut set = BSShaderTextureSet::default();
        set.read(&mut nif).unwrap();
        assert_eq!(set.textures, ["a.dds", "a_n.dds"]);
    }
}
