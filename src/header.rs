use std::fmt;
use std::io::Read;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};

use crate::consts;
use crate::error::Result;
use crate::record;

/// The CFHEADER record at the start of a cabinet.
#[derive(Clone, Debug)]
pub struct Header<'data> {
    raw: &'data [u8],
    signature: [u8; 4],
    reserved1: u32,
    total_size: u32,
    reserved2: u32,
    first_file_offset: u32,
    reserved3: u32,
    major_version: u8,
    minor_version: u8,
    num_folders: u16,
    num_files: u16,
    flags: u16,
    set_id: u16,
    set_index: u16,
}

impl<'data> Header<'data> {
    /// Parses the header at the start of `data`.
    pub fn parse(data: &'data [u8]) -> Result<Header<'data>> {
        let raw = record(data, 0, consts::HEADER_SIZE, "CFHEADER")?;
        let mut reader = raw;
        let mut signature = [0u8; 4];
        reader.read_exact(&mut signature)?;
        if &signature != consts::FILE_SIGNATURE {
            format_error!("bad signature \"{}\"", signature.escape_ascii());
        }
        let reserved1 = reader.read_u32::<LittleEndian>()?;
        let total_size = reader.read_u32::<LittleEndian>()?;
        let reserved2 = reader.read_u32::<LittleEndian>()?;
        let first_file_offset = reader.read_u32::<LittleEndian>()?;
        let reserved3 = reader.read_u32::<LittleEndian>()?;
        let major_version = reader.read_u8()?;
        let minor_version = reader.read_u8()?;
        let num_folders = reader.read_u16::<LittleEndian>()?;
        let num_files = reader.read_u16::<LittleEndian>()?;
        let flags = reader.read_u16::<LittleEndian>()?;
        let set_id = reader.read_u16::<LittleEndian>()?;
        let set_index = reader.read_u16::<LittleEndian>()?;
        Ok(Header {
            raw,
            signature,
            reserved1,
            total_size,
            reserved2,
            first_file_offset,
            reserved3,
            major_version,
            minor_version,
            num_folders,
            num_files,
            flags,
            set_id,
            set_index,
        })
    }

    /// Encodes the header, re-emitting the signature bytes as parsed.
    pub fn to_bytes(&self) -> [u8; consts::HEADER_SIZE] {
        let mut bytes = [0u8; consts::HEADER_SIZE];
        bytes[0x00..0x04].copy_from_slice(&self.signature);
        LittleEndian::write_u32(&mut bytes[0x04..0x08], self.reserved1);
        LittleEndian::write_u32(&mut bytes[0x08..0x0c], self.total_size);
        LittleEndian::write_u32(&mut bytes[0x0c..0x10], self.reserved2);
        LittleEndian::write_u32(&mut bytes[0x10..0x14], self.first_file_offset);
        LittleEndian::write_u32(&mut bytes[0x14..0x18], self.reserved3);
        bytes[0x18] = self.major_version;
        bytes[0x19] = self.minor_version;
        LittleEndian::write_u16(&mut bytes[0x1a..0x1c], self.num_folders);
        LittleEndian::write_u16(&mut bytes[0x1c..0x1e], self.num_files);
        LittleEndian::write_u16(&mut bytes[0x1e..0x20], self.flags);
        LittleEndian::write_u16(&mut bytes[0x20..0x22], self.set_id);
        LittleEndian::write_u16(&mut bytes[0x22..0x24], self.set_index);
        bytes
    }

    /// Returns the bytes this header was parsed from.
    pub fn raw(&self) -> &'data [u8] {
        self.raw
    }

    pub fn signature(&self) -> [u8; 4] {
        self.signature
    }

    pub fn reserved1(&self) -> u32 {
        self.reserved1
    }

    /// Returns the `cbCabinet` field, the advertised size of the whole file.
    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    pub fn reserved2(&self) -> u32 {
        self.reserved2
    }

    /// Returns the `coffFiles` field, the absolute offset of the first
    /// CFFILE record.
    pub fn first_file_offset(&self) -> u32 {
        self.first_file_offset
    }

    pub fn reserved3(&self) -> u32 {
        self.reserved3
    }

    /// Returns the `(major, minor)` format version.
    pub fn version(&self) -> (u8, u8) {
        (self.major_version, self.minor_version)
    }

    pub fn num_folders(&self) -> u16 {
        self.num_folders
    }

    pub fn num_files(&self) -> u16 {
        self.num_files
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// Returns true if the header claims a previous cabinet in the set.
    pub fn has_prev_cabinet(&self) -> bool {
        (self.flags & consts::FLAG_PREV_CABINET) != 0
    }

    /// Returns true if the header claims a next cabinet in the set.
    pub fn has_next_cabinet(&self) -> bool {
        (self.flags & consts::FLAG_NEXT_CABINET) != 0
    }

    /// Returns true if the header claims reserve fields are present.  Such
    /// fields are not parsed; the records are always read at fixed offsets.
    pub fn has_reserve(&self) -> bool {
        (self.flags & consts::FLAG_RESERVE_PRESENT) != 0
    }

    /// Returns the cabinet set ID (an arbitrary number used to group together
    /// a set of cabinets).
    pub fn set_id(&self) -> u16 {
        self.set_id
    }

    /// Returns this cabinet's (zero-based) index within its cabinet set.
    pub fn set_index(&self) -> u16 {
        self.set_index
    }

    pub fn set_set_id(&mut self, set_id: u16) {
        self.set_id = set_id;
    }
}

impl<'data> fmt::Display for Header<'data> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    Signature: {}", self.signature.escape_ascii())?;
        writeln!(f, "    Reserved1: {}", self.reserved1)?;
        writeln!(f, "    CbCabinet: {}", self.total_size)?;
        writeln!(f, "    Reserved2: {}", self.reserved2)?;
        writeln!(f, "    CoffFiles: {}", self.first_file_offset)?;
        writeln!(f, "    Reserved3: {}", self.reserved3)?;
        writeln!(
            f,
            "    Version: {}.{}",
            self.major_version, self.minor_version
        )?;
        writeln!(f, "    CFolders: {}", self.num_folders)?;
        writeln!(f, "    CFiles: {}", self.num_files)?;
        write!(f, "    Flags: 0x{:04x}", self.flags)?;
        let names = [
            (self.has_prev_cabinet(), "PREV_CABINET"),
            (self.has_next_cabinet(), "NEXT_CABINET"),
            (self.has_reserve(), "RESERVE_PRESENT"),
        ];
        for (_, name) in names.iter().filter(|(set, _)| *set) {
            write!(f, " {}", name)?;
        }
        writeln!(f)?;
        writeln!(f, "    SetID: {}", self.set_id)?;
        writeln!(f, "    ICabinet: {}", self.set_index)
    }
}

#[cfg(test)]
mod tests {
    use super::Header;
    use crate::error::Error;

    const HEADER: &[u8] = b"MSCF\0\0\0\0\x59\0\0\0\0\0\0\0\
        \x2c\0\0\0\0\0\0\0\x03\x01\x01\0\x01\0\x04\0\x34\x12\x02\0";

    #[test]
    fn parse_header_fields() {
        let header = Header::parse(HEADER).unwrap();
        assert_eq!(&header.signature(), b"MSCF");
        assert_eq!(header.total_size(), 0x59);
        assert_eq!(header.first_file_offset(), 0x2c);
        assert_eq!(header.version(), (3, 1));
        assert_eq!(header.num_folders(), 1);
        assert_eq!(header.num_files(), 1);
        assert_eq!(header.flags(), 0x4);
        assert!(header.has_reserve());
        assert!(!header.has_prev_cabinet());
        assert!(!header.has_next_cabinet());
        assert_eq!(header.set_id(), 0x1234);
        assert_eq!(header.set_index(), 2);
        assert_eq!(header.raw(), HEADER);
    }

    #[test]
    fn major_version_is_stored_first() {
        let mut data = HEADER.to_vec();
        data[0x18] = 0x05;
        data[0x19] = 0x02;
        let header = Header::parse(&data).unwrap();
        assert_eq!(header.version(), (5, 2));
        assert!(header.to_string().contains("    Version: 5.2\n"));
        assert_eq!(&header.to_bytes()[0x18..0x1a], b"\x05\x02");
    }

    #[test]
    fn header_round_trip() {
        let header = Header::parse(HEADER).unwrap();
        assert_eq!(&header.to_bytes()[..], HEADER);
    }

    #[test]
    fn set_id_is_little_endian() {
        let mut header = Header::parse(HEADER).unwrap();
        header.set_set_id(0xbeef);
        let bytes = header.to_bytes();
        assert_eq!(&bytes[0x20..0x22], b"\xef\xbe");
        assert_eq!(&bytes[..0x20], &HEADER[..0x20]);
        assert_eq!(&bytes[0x22..], &HEADER[0x22..]);
    }

    #[test]
    fn bad_signature() {
        let mut data = HEADER.to_vec();
        data[3] = b'G';
        match Header::parse(&data) {
            Err(Error::Format(message)) => {
                assert!(message.starts_with("bad signature"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn truncated_header() {
        match Header::parse(&HEADER[..0x20]) {
            Err(Error::Format(_)) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn display_lists_flags() {
        let dump = Header::parse(HEADER).unwrap().to_string();
        assert!(dump.contains("    Signature: MSCF\n"));
        assert!(dump.contains("    Version: 3.1\n"));
        assert!(dump.contains("    Flags: 0x0004 RESERVE_PRESENT\n"));
        assert!(dump.contains("    SetID: 4660\n"));
    }
}
