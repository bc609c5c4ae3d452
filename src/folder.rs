use std::fmt;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};

use crate::consts;
use crate::ctype::CompressionType;
use crate::error::Result;
use crate::record;

/// The single CFFOLDER record of a cabinet.
#[derive(Clone, Debug)]
pub struct Folder<'data> {
    raw: &'data [u8],
    first_data_block_offset: u32,
    num_data_blocks: u16,
    compression_bits: u16,
}

impl<'data> Folder<'data> {
    /// Parses the folder record at its fixed offset in `data`.
    pub fn parse(data: &'data [u8]) -> Result<Folder<'data>> {
        let raw = record(
            data,
            consts::FOLDER_OFFSET,
            consts::FOLDER_SIZE,
            "CFFOLDER",
        )?;
        let mut reader = raw;
        let first_data_block_offset = reader.read_u32::<LittleEndian>()?;
        let num_data_blocks = reader.read_u16::<LittleEndian>()?;
        let compression_bits = reader.read_u16::<LittleEndian>()?;
        Ok(Folder {
            raw,
            first_data_block_offset,
            num_data_blocks,
            compression_bits,
        })
    }

    pub fn to_bytes(&self) -> [u8; consts::FOLDER_SIZE] {
        let mut bytes = [0u8; consts::FOLDER_SIZE];
        LittleEndian::write_u32(&mut bytes[0..4], self.first_data_block_offset);
        LittleEndian::write_u16(&mut bytes[4..6], self.num_data_blocks);
        LittleEndian::write_u16(&mut bytes[6..8], self.compression_bits);
        bytes
    }

    /// Returns the bytes this folder was parsed from.
    pub fn raw(&self) -> &'data [u8] {
        self.raw
    }

    /// Returns the `coffCabStart` field, the absolute offset of the folder's
    /// first CFDATA block.
    pub fn first_data_block_offset(&self) -> u32 {
        self.first_data_block_offset
    }

    /// Returns the `cCFData` field.
    pub fn num_data_blocks(&self) -> u16 {
        self.num_data_blocks
    }

    /// Returns the raw `typeCompress` field.
    pub fn compression_bits(&self) -> u16 {
        self.compression_bits
    }

    /// Interprets the `typeCompress` field.
    pub fn compression_type(&self) -> Result<CompressionType> {
        CompressionType::from_bitfield(self.compression_bits)
    }

    /// Overwrites `coffCabStart`.  The data block is not moved.
    pub fn set_first_data_block_offset(&mut self, offset: u32) {
        self.first_data_block_offset = offset;
    }

    /// Overwrites `cCFData`.  The cabinet still holds exactly one block.
    pub fn set_num_data_blocks(&mut self, count: u16) {
        self.num_data_blocks = count;
    }
}

impl<'data> fmt::Display for Folder<'data> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    CoffCabStart: {}", self.first_data_block_offset)?;
        writeln!(f, "    CCFData: {}", self.num_data_blocks)?;
        write!(f, "    TypeCompress: {}", self.compression_bits)?;
        match self.compression_type() {
            Ok(ctype) => writeln!(f, " ({})", ctype),
            Err(_) => writeln!(f, " (unknown)"),
        }
    }
}
