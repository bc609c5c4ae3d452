use std::fmt;
use std::io::Write;

use log::{debug, info, warn};

use crate::block::DataBlock;
use crate::consts;
use crate::error::{Error, Result};
use crate::file::FileEntry;
use crate::folder::Folder;
use crate::header::Header;

/// A parsed cabinet holding exactly one folder, one file and one data block.
///
/// Field mutations only change the in-memory records; they show up in the
/// output the next time the cabinet is serialized.
#[derive(Clone, Debug)]
pub struct Cabinet<'data> {
    header: Header<'data>,
    folder: Folder<'data>,
    file: FileEntry<'data>,
    data_block: DataBlock<'data>,
}

impl<'data> Cabinet<'data> {
    /// Parses a cabinet that is fully loaded into memory.
    pub fn parse(data: &'data [u8]) -> Result<Cabinet<'data>> {
        let header = Header::parse(data)?;
        debug!(
            "Parsed CFHEADER: {} bytes, {} folder(s), {} file(s)",
            header.total_size(),
            header.num_folders(),
            header.num_files()
        );
        if header.num_folders() != 1 || header.num_files() != 1 {
            warn!(
                "Cabinet claims {} folder(s) and {} file(s); \
                 only the first of each is parsed",
                header.num_folders(),
                header.num_files()
            );
        }
        if header.first_file_offset() as usize != consts::FILE_ENTRY_OFFSET {
            warn!(
                "coffFiles is 0x{:x}; reading CFFILE at 0x{:x} regardless",
                header.first_file_offset(),
                consts::FILE_ENTRY_OFFSET
            );
        }
        if header.total_size() as usize != data.len() {
            warn!(
                "cbCabinet is {} but the input is {} bytes",
                header.total_size(),
                data.len()
            );
        }

        let folder = Folder::parse(data)?;
        debug!(
            "Parsed CFFOLDER: data at 0x{:x}, {} block(s)",
            folder.first_data_block_offset(),
            folder.num_data_blocks()
        );
        let file = FileEntry::parse(data, consts::FILE_ENTRY_OFFSET)?;
        debug!(
            "Parsed CFFILE {:?}: ends at 0x{:x}",
            file.name(),
            file.end_offset()
        );
        let data_block = DataBlock::parse(data, file.end_offset())?;
        debug!(
            "Parsed CFDATA: {} payload bytes",
            data_block.payload().len()
        );
        Ok(Cabinet { header, folder, file, data_block })
    }

    pub fn header(&self) -> &Header<'data> {
        &self.header
    }

    pub fn folder(&self) -> &Folder<'data> {
        &self.folder
    }

    pub fn file(&self) -> &FileEntry<'data> {
        &self.file
    }

    pub fn data_block(&self) -> &DataBlock<'data> {
        &self.data_block
    }

    /// Gives direct access to the header for mutators this type does not
    /// forward.  Changes show up in the next `to_bytes`.
    pub fn header_mut(&mut self) -> &mut Header<'data> {
        &mut self.header
    }

    /// Mutable access to the folder.
    pub fn folder_mut(&mut self) -> &mut Folder<'data> {
        &mut self.folder
    }

    /// Mutable access to the file entry.
    pub fn file_mut(&mut self) -> &mut FileEntry<'data> {
        &mut self.file
    }

    /// Mutable access to the data block.
    pub fn data_block_mut(&mut self) -> &mut DataBlock<'data> {
        &mut self.data_block
    }

    /// Serializes the header, folder, file and data block, in that order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let file = self.file.to_bytes();
        let data_block = self.data_block.to_bytes();
        let mut bytes = Vec::with_capacity(
            consts::HEADER_SIZE
                + consts::FOLDER_SIZE
                + file.len()
                + data_block.len(),
        );
        bytes.extend_from_slice(&self.header.to_bytes());
        bytes.extend_from_slice(&self.folder.to_bytes());
        bytes.extend_from_slice(&file);
        bytes.extend_from_slice(&data_block);
        bytes
    }

    /// Writes the serialized cabinet to `writer`.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.header.to_bytes())?;
        writer.write_all(&self.folder.to_bytes())?;
        writer.write_all(&self.file.to_bytes())?;
        writer.write_all(&self.data_block.to_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Serializes the cabinet and overwrites `size` bytes at `offset` with
    /// the start of `value`.  The cabinet itself is left unchanged.
    ///
    /// A range that runs past the end of the serialized cabinet is an
    /// [`Error::OutOfBounds`] rather than growing the buffer.
    pub fn patch_bytes(
        &self,
        offset: usize,
        size: usize,
        value: &[u8],
    ) -> Result<Vec<u8>> {
        patch_bytes(&self.to_bytes(), offset, size, value)
    }

    /// Sets the cabinet set ID in the header.
    pub fn set_set_id(&mut self, set_id: u16) {
        info!("Setting cabinet set ID to 0x{:04x}", set_id);
        self.header.set_set_id(set_id);
    }

    /// Clears the data block checksum.
    pub fn zero_checksum(&mut self) {
        info!(
            "Zeroing data block checksum 0x{:08x}",
            self.data_block.checksum()
        );
        self.data_block.zero_checksum();
    }

    /// Sets the folder's `coffCabStart` offset.
    pub fn set_coff_cab_start(&mut self, offset: u32) {
        info!("Setting coffCabStart to 0x{:x}", offset);
        self.folder.set_first_data_block_offset(offset);
    }

    /// Sets the folder's `cCFData` block count.
    pub fn set_data_block_count(&mut self, count: u16) {
        info!("Setting cCFData to {}", count);
        self.folder.set_num_data_blocks(count);
    }

    /// Sets the file's `cbFile` uncompressed size.
    pub fn set_cb_file(&mut self, size: u32) {
        info!("Setting cbFile of {:?} to {}", self.file.name(), size);
        self.file.set_uncompressed_size(size);
    }

    /// Sets the read-only, hidden and system attributes of the file.
    pub fn mark_read_only(&mut self) {
        info!("Marking {:?} read-only, hidden and system", self.file.name());
        self.file.mark_read_only();
    }
}

impl<'data> fmt::Display for Cabinet<'data> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CFHEADER:")?;
        write!(f, "{}", self.header)?;
        writeln!(f, "CFFOLDER:")?;
        write!(f, "{}", self.folder)?;
        writeln!(f, "CFFILE:")?;
        write!(f, "{}", self.file)?;
        writeln!(f, "CFDATA:")?;
        write!(f, "{}", self.data_block)
    }
}

/// Returns a copy of `data` with the `size` bytes at `offset` replaced by the
/// first `size` bytes of `value`.
///
/// Returns [`Error::Length`] if `value` is shorter than `size`, and
/// [`Error::OutOfBounds`] if `offset + size` runs past the end of `data`.
/// The buffer is never grown or shrunk, so the result always has the same
/// length as `data`.
pub fn patch_bytes(
    data: &[u8],
    offset: usize,
    size: usize,
    value: &[u8],
) -> Result<Vec<u8>> {
    if value.len() < size {
        return Err(Error::Length { size, actual: value.len() });
    }
    let end = match offset.checked_add(size) {
        Some(end) if end <= data.len() => end,
        _ => {
            return Err(Error::OutOfBounds { offset, size, len: data.len() })
        }
    };
    info!("Patching {} byte(s) at offset 0x{:x}", size, offset);
    let mut bytes = data.to_vec();
    bytes[offset..end].copy_from_slice(&value[..size]);
    Ok(bytes)
}
