use std::fmt;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use time::PrimitiveDateTime;

use crate::consts;
use crate::datetime::DosTimestamp;
use crate::error::Result;
use crate::record;
use crate::string::{decode_name, find_terminator};

const READ_ONLY_BITS: u16 =
    consts::ATTR_READ_ONLY | consts::ATTR_HIDDEN | consts::ATTR_SYSTEM;

/// The single CFFILE record of a cabinet.
#[derive(Clone, Debug)]
pub struct FileEntry<'data> {
    raw: &'data [u8],
    uncompressed_size: u32,
    uncompressed_offset: u32,
    folder_index: u16,
    timestamp: DosTimestamp,
    attributes: u16,
    name: String,
    end_offset: usize,
}

impl<'data> FileEntry<'data> {
    /// Parses the file record starting at `offset` in `data`.
    ///
    /// The NUL terminating the name is searched for starting one byte past
    /// the first name byte, so the name must be at least two bytes long.
    pub fn parse(data: &'data [u8], offset: usize) -> Result<FileEntry<'data>> {
        let mut reader =
            record(data, offset, consts::FILE_ENTRY_FIXED_SIZE, "CFFILE")?;
        let uncompressed_size = reader.read_u32::<LittleEndian>()?;
        let uncompressed_offset = reader.read_u32::<LittleEndian>()?;
        let folder_index = reader.read_u16::<LittleEndian>()?;
        let date = reader.read_u16::<LittleEndian>()?;
        let time = reader.read_u16::<LittleEndian>()?;
        let attributes = reader.read_u16::<LittleEndian>()?;

        let name_start = offset + consts::FILE_ENTRY_FIXED_SIZE;
        let scan_start = name_start + 1;
        let terminator =
            match find_terminator(data, scan_start, consts::MAX_NAME_WINDOW) {
                Some(terminator) => terminator,
                None => format_error!(
                    "name not terminated within {} bytes of offset 0x{:x}",
                    consts::MAX_NAME_WINDOW,
                    scan_start
                ),
            };
        let end_offset = scan_start + terminator + 1;
        let name = decode_name(&data[name_start..end_offset - 1])?;
        Ok(FileEntry {
            raw: &data[offset..end_offset],
            uncompressed_size,
            uncompressed_offset,
            folder_index,
            timestamp: DosTimestamp::new(date, time),
            attributes,
            name,
            end_offset,
        })
    }

    /// Encodes the record, including the name's NUL terminator.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut fixed = [0u8; consts::FILE_ENTRY_FIXED_SIZE];
        LittleEndian::write_u32(&mut fixed[0..4], self.uncompressed_size);
        LittleEndian::write_u32(&mut fixed[4..8], self.uncompressed_offset);
        LittleEndian::write_u16(&mut fixed[8..10], self.folder_index);
        LittleEndian::write_u16(&mut fixed[10..12], self.timestamp.date);
        LittleEndian::write_u16(&mut fixed[12..14], self.timestamp.time);
        LittleEndian::write_u16(&mut fixed[14..16], self.attributes);
        let mut bytes = Vec::with_capacity(fixed.len() + self.name.len() + 1);
        bytes.extend_from_slice(&fixed);
        bytes.extend_from_slice(self.name.as_bytes());
        bytes.push(0);
        bytes
    }

    /// Returns the bytes this record was parsed from, name terminator
    /// included.
    pub fn raw(&self) -> &'data [u8] {
        self.raw
    }

    /// Returns the absolute offset one past the name's NUL terminator, which
    /// is where the data block starts.
    pub fn end_offset(&self) -> usize {
        self.end_offset
    }

    /// Returns the name of file.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the `cbFile` field, the size of the file when decompressed.
    pub fn uncompressed_size(&self) -> u32 {
        self.uncompressed_size
    }

    /// Returns the `uoffFolderStart` field.
    pub fn uncompressed_offset(&self) -> u32 {
        self.uncompressed_offset
    }

    pub fn folder_index(&self) -> u16 {
        self.folder_index
    }

    pub fn timestamp(&self) -> DosTimestamp {
        self.timestamp
    }

    /// Returns the datetime for this file, or [`None`] if the DOS date/time
    /// fields are not a valid date/time.
    pub fn datetime(&self) -> Option<PrimitiveDateTime> {
        self.timestamp.to_datetime()
    }

    pub fn attributes(&self) -> u16 {
        self.attributes
    }

    /// Returns true if this file has the "read-only" attribute set.
    pub fn is_read_only(&self) -> bool {
        (self.attributes & consts::ATTR_READ_ONLY) != 0
    }

    /// Returns true if this file has the "hidden" attribute set.
    pub fn is_hidden(&self) -> bool {
        (self.attributes & consts::ATTR_HIDDEN) != 0
    }

    /// Returns true if this file has the "system file" attribute set.
    pub fn is_system(&self) -> bool {
        (self.attributes & consts::ATTR_SYSTEM) != 0
    }

    /// Returns true if this file has the "archive" (modified since last
    /// backup) attribute set.
    pub fn is_archive(&self) -> bool {
        (self.attributes & consts::ATTR_ARCH) != 0
    }

    /// Returns true if this file has the "execute after extraction" attribute
    /// set.
    pub fn is_exec(&self) -> bool {
        (self.attributes & consts::ATTR_EXEC) != 0
    }

    /// Returns true if this file has the "name is UTF" attribute set.
    pub fn is_name_utf(&self) -> bool {
        (self.attributes & consts::ATTR_NAME_IS_UTF) != 0
    }

    /// Overwrites `cbFile`.
    pub fn set_uncompressed_size(&mut self, size: u32) {
        self.uncompressed_size = size;
    }

    /// Replaces every attribute bit with `attributes`.
    pub fn set_attributes(&mut self, attributes: u16) {
        self.attributes = attributes;
    }

    /// Sets the read-only, hidden and system attributes, leaving every other
    /// attribute bit alone.
    pub fn mark_read_only(&mut self) {
        self.attributes |= READ_ONLY_BITS;
    }

    /// Sets the DOS date/time fields, clamped to the range DOS can represent.
    pub fn set_datetime(&mut self, datetime: PrimitiveDateTime) {
        self.timestamp = DosTimestamp::from_datetime(datetime);
    }
}

impl<'data> fmt::Display for FileEntry<'data> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    CbFile: {}", self.uncompressed_size)?;
        writeln!(f, "    UoffFolderStart: {}", self.uncompressed_offset)?;
        writeln!(f, "    IFolder: {}", self.folder_index)?;
        writeln!(f, "    Date: {}", self.timestamp.date)?;
        writeln!(f, "    Time: {}", self.timestamp.time)?;
        writeln!(f, "    Modified: {}", self.timestamp)?;
        writeln!(
            f,
            "    Attribs: {} ({}{}{}{}{}{})",
            self.attributes,
            if self.is_read_only() { 'R' } else { '-' },
            if self.is_hidden() { 'H' } else { '-' },
            if self.is_system() { 'S' } else { '-' },
            if self.is_archive() { 'A' } else { '-' },
            if self.is_exec() { 'E' } else { '-' },
            if self.is_name_utf() { 'U' } else { '-' },
        )?;
        writeln!(f, "    SzName: {}", self.name)
    }
}
