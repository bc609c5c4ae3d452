pub const FILE_SIGNATURE: &[u8; 4] = b"MSCF";

// Record layout of a single-folder, single-file cabinet:
pub const HEADER_SIZE: usize = 0x24;
pub const FOLDER_OFFSET: usize = 0x24;
pub const FOLDER_SIZE: usize = 8;
pub const FILE_ENTRY_OFFSET: usize = 0x2c;
pub const FILE_ENTRY_FIXED_SIZE: usize = 16;
pub const DATA_BLOCK_HEADER_SIZE: usize = 8;

pub const MAX_NAME_WINDOW: usize = 128;

// Length of each half of the payload preview shown in dumps.
pub const PAYLOAD_PREVIEW_LEN: usize = 10;

// Header flags:
pub const FLAG_PREV_CABINET: u16 = 0x1;
pub const FLAG_NEXT_CABINET: u16 = 0x2;
pub const FLAG_RESERVE_PRESENT: u16 = 0x4;

// File attributes:
pub const ATTR_READ_ONLY: u16 = 0x01;
pub const ATTR_HIDDEN: u16 = 0x02;
pub const ATTR_SYSTEM: u16 = 0x04;
pub const ATTR_ARCH: u16 = 0x20;
pub const ATTR_EXEC: u16 = 0x40;
pub const ATTR_NAME_IS_UTF: u16 = 0x80;
