//! Binary stream layout for indices.
//!
//! Field order: prime level (i64), tag set (u64 tag count, then per tag a
//! u64 byte length and UTF-8 bytes), identifier (u64, or u32 under the
//! legacy narrow-id option), dimension (u64), orientation (i32 sign), block
//! descriptor (u64 entry count, then per entry an i64 charge and u64
//! extent; a count of 0 means no descriptor). All fields little-endian.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::Error;
use crate::index::Index;
use crate::qn::{Arrow, Qn};
use crate::qnblocks::QnBlocks;
use crate::tagset::TagSet;

/// Stream format options.
#[derive(Clone, Copy, Debug, Default)]
pub struct StreamOptions {
    /// Use the legacy 32-bit identifier width. Identifiers are truncated on
    /// write and widened on read; this is a format-version switch only.
    pub legacy_narrow_ids: bool,
}

/// Serialize an index. Writing a null index is an error.
pub fn write_index<W: Write>(w: &mut W, index: &Index, opts: StreamOptions) -> Result<(), Error> {
    if index.is_null() {
        return Err(Error::WriteNullIndex);
    }
    w.write_i64::<LittleEndian>(index.prime_level())?;
    write_tagset(w, index.tags())?;
    if opts.legacy_narrow_ids {
        w.write_u32::<LittleEndian>(index.id() as u32)?;
    } else {
        w.write_u64::<LittleEndian>(index.id())?;
    }
    w.write_u64::<LittleEndian>(index.dim() as u64)?;
    w.write_i32::<LittleEndian>(index.dir().sign() as i32)?;
    match index.blocks() {
        Some(blocks) => {
            w.write_u64::<LittleEndian>(blocks.size() as u64)?;
            for &(qn, size) in blocks.iter() {
                w.write_i64::<LittleEndian>(qn.0)?;
                w.write_u64::<LittleEndian>(size as u64)?;
            }
        }
        None => w.write_u64::<LittleEndian>(0)?,
    }
    Ok(())
}

/// Deserialize an index written by [`write_index`].
pub fn read_index<R: Read>(r: &mut R, opts: StreamOptions) -> Result<Index, Error> {
    let prime = r.read_i64::<LittleEndian>()?;
    if prime < 0 {
        return Err(Error::CorruptStream {
            message: format!("negative prime level {}", prime),
        });
    }
    let tags = read_tagset(r)?;
    let id = if opts.legacy_narrow_ids {
        u64::from(r.read_u32::<LittleEndian>()?)
    } else {
        r.read_u64::<LittleEndian>()?
    };
    let dim = r.read_u64::<LittleEndian>()? as usize;
    let dir = match r.read_i32::<LittleEndian>()? {
        1 => Arrow::Out,
        -1 => Arrow::In,
        sign => {
            return Err(Error::CorruptStream {
                message: format!("invalid orientation sign {}", sign),
            })
        }
    };
    let nblock = r.read_u64::<LittleEndian>()? as usize;
    let blocks = if nblock == 0 {
        None
    } else {
        let mut sectors = Vec::with_capacity(nblock);
        for _ in 0..nblock {
            let qn = Qn(r.read_i64::<LittleEndian>()?);
            let size = r.read_u64::<LittleEndian>()? as usize;
            sectors.push((qn, size));
        }
        let blocks = QnBlocks::new(sectors);
        if blocks.total_dim() != dim {
            return Err(Error::CorruptStream {
                message: format!(
                    "descriptor total {} does not match dimension {}",
                    blocks.total_dim(),
                    dim
                ),
            });
        }
        Some(blocks)
    };
    Ok(Index::from_parts(id, dim, prime, tags, dir, blocks))
}

fn write_tagset<W: Write>(w: &mut W, tags: &TagSet) -> Result<(), Error> {
    w.write_u64::<LittleEndian>(tags.len() as u64)?;
    for tag in tags.iter() {
        w.write_u64::<LittleEndian>(tag.len() as u64)?;
        w.write_all(tag.as_bytes())?;
    }
    Ok(())
}

fn read_tagset<R: Read>(r: &mut R) -> Result<TagSet, Error> {
    let count = r.read_u64::<LittleEndian>()? as usize;
    let mut tags = TagSet::new();
    for _ in 0..count {
        let len = r.read_u64::<LittleEndian>()? as usize;
        let mut bytes = vec![0u8; len];
        r.read_exact(&mut bytes)?;
        let tag = String::from_utf8(bytes).map_err(|_| Error::CorruptStream {
            message: "tag is not valid UTF-8".to_owned(),
        })?;
        tags.add_tag(&tag);
    }
    Ok(tags)
}
