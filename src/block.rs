use std::fmt;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};

use crate::consts;
use crate::error::Result;
use crate::record;

/// The single CFDATA block of a cabinet.  Its payload runs to the end of the
/// input, so any bytes after the block proper are carried along with it.
#[derive(Clone, Debug)]
pub struct DataBlock<'data> {
    raw: &'data [u8],
    checksum: u32,
    compressed_size: u16,
    uncompressed_size: u16,
    payload: &'data [u8],
}

impl<'data> DataBlock<'data> {
    /// Parses the data block starting at `offset` in `data`.
    pub fn parse(data: &'data [u8], offset: usize) -> Result<DataBlock<'data>> {
        let mut reader = record(
            data,
            offset,
            consts::DATA_BLOCK_HEADER_SIZE,
            "CFDATA",
        )?;
        let checksum = reader.read_u32::<LittleEndian>()?;
        let compressed_size = reader.read_u16::<LittleEndian>()?;
        let uncompressed_size = reader.read_u16::<LittleEndian>()?;
        Ok(DataBlock {
            raw: &data[offset..],
            checksum,
            compressed_size,
            uncompressed_size,
            payload: &data[offset + consts::DATA_BLOCK_HEADER_SIZE..],
        })
    }

    /// Encodes the block header followed by the payload as parsed.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut header = [0u8; consts::DATA_BLOCK_HEADER_SIZE];
        LittleEndian::write_u32(&mut header[0..4], self.checksum);
        LittleEndian::write_u16(&mut header[4..6], self.compressed_size);
        LittleEndian::write_u16(&mut header[6..8], self.uncompressed_size);
        let mut bytes = Vec::with_capacity(header.len() + self.payload.len());
        bytes.extend_from_slice(&header);
        bytes.extend_from_slice(self.payload);
        bytes
    }

    /// Returns the bytes this block was parsed from.
    pub fn raw(&self) -> &'data [u8] {
        self.raw
    }

    /// Returns the `csum` field.  It is never verified.
    pub fn checksum(&self) -> u32 {
        self.checksum
    }

    /// Returns the `cbData` field.
    pub fn compressed_size(&self) -> u16 {
        self.compressed_size
    }

    /// Returns the `cbUncomp` field.
    pub fn uncompressed_size(&self) -> u16 {
        self.uncompressed_size
    }

    pub fn payload(&self) -> &'data [u8] {
        self.payload
    }

    /// Returns the first bytes of the payload followed by the last bytes of
    /// the block, for display.
    pub fn payload_preview(&self) -> Vec<u8> {
        let len = consts::PAYLOAD_PREVIEW_LEN;
        let head = &self.payload[..self.payload.len().min(len)];
        let tail = &self.raw[self.raw.len().saturating_sub(len)..];
        let mut preview = Vec::with_capacity(head.len() + tail.len());
        preview.extend_from_slice(head);
        preview.extend_from_slice(tail);
        preview
    }

    /// Clears `csum` without computing a replacement, leaving the block with
    /// a checksum that consumers which verify it will reject.
    pub fn zero_checksum(&mut self) {
        self.checksum = 0;
    }
}

impl<'data> fmt::Display for DataBlock<'data> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    Checksum: {}", self.checksum)?;
        writeln!(f, "    CbData: {}", self.compressed_size)?;
        writeln!(f, "    CbUncompressed: {}", self.uncompressed_size)?;
        writeln!(f, "    Ab: b\"{}\"", self.payload_preview().escape_ascii())
    }
}

#[cfg(test)]
mod tests {
    use super::DataBlock;
    use crate::error::Error;

    const BLOCK: &[u8] = b"\x4c\x1a\x2e\x7f\x0e\0\x0e\0Hello, world!\n";

    #[test]
    fn parse_block_fields() {
        let block = DataBlock::parse(BLOCK, 0).unwrap();
        assert_eq!(block.checksum(), 0x7f2e1a4c);
        assert_eq!(block.compressed_size(), 14);
        assert_eq!(block.uncompressed_size(), 14);
        assert_eq!(block.payload(), b"Hello, world!\n");
        assert_eq!(block.to_bytes(), BLOCK);
    }

    #[test]
    fn zero_checksum_keeps_sizes_and_payload() {
        let mut block = DataBlock::parse(BLOCK, 0).unwrap();
        block.zero_checksum();
        let bytes = block.to_bytes();
        assert_eq!(&bytes[..4], b"\0\0\0\0");
        assert_eq!(&bytes[4..], &BLOCK[4..]);
    }

    #[test]
    fn payload_preview() {
        let block = DataBlock::parse(BLOCK, 0).unwrap();
        assert_eq!(block.payload_preview(), b"Hello, woro, world!\n");

        let short = b"\0\0\0\0\x02\0\x02\0ab";
        let block = DataBlock::parse(short, 0).unwrap();
        assert_eq!(block.payload_preview(), b"ab\0\0\0\0\x02\0\x02\0ab");
    }

    #[test]
    fn empty_payload() {
        let block = DataBlock::parse(&BLOCK[..8], 0).unwrap();
        assert!(block.payload().is_empty());
        assert_eq!(block.to_bytes(), &BLOCK[..8]);
    }

    #[test]
    fn truncated_block() {
        match DataBlock::parse(&BLOCK[..7], 0) {
            Err(Error::Format(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
