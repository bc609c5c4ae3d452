#![allow(dead_code)]

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

pub const CHECKSUM: u32 = 0x7f2e1a4c;

/// Fields of a one-folder, one-file, one-block cabinet.
pub struct Fixture<'a> {
    pub name: &'a [u8],
    pub payload: &'a [u8],
    pub set_id: u16,
    pub attributes: u16,
    pub date: u16,
    pub time: u16,
}

impl<'a> Fixture<'a> {
    pub fn new(name: &'a str, payload: &'a [u8]) -> Fixture<'a> {
        Fixture {
            name: name.as_bytes(),
            payload,
            set_id: 0x1234,
            attributes: 0x20,
            date: 0x226c,
            time: 0x59ba,
        }
    }

    /// Absolute offset of the CFDATA block.
    pub fn data_offset(&self) -> usize {
        0x2c + 16 + self.name.len() + 1
    }

    pub fn build(&self) -> Vec<u8> {
        let total_size = self.data_offset() + 8 + self.payload.len();
        let payload_size = self.payload.len() as u16;
        let mut cab = Vec::with_capacity(total_size);
        cab.write_all(b"MSCF").unwrap();
        cab.write_u32::<LittleEndian>(0).unwrap();
        cab.write_u32::<LittleEndian>(total_size as u32).unwrap();
        cab.write_u32::<LittleEndian>(0).unwrap();
        cab.write_u32::<LittleEndian>(0x2c).unwrap();
        cab.write_u32::<LittleEndian>(0).unwrap();
        cab.write_u8(3).unwrap();
        cab.write_u8(1).unwrap();
        cab.write_u16::<LittleEndian>(1).unwrap();
        cab.write_u16::<LittleEndian>(1).unwrap();
        cab.write_u16::<LittleEndian>(0).unwrap();
        cab.write_u16::<LittleEndian>(self.set_id).unwrap();
        cab.write_u16::<LittleEndian>(0).unwrap();

        cab.write_u32::<LittleEndian>(self.data_offset() as u32).unwrap();
        cab.write_u16::<LittleEndian>(1).unwrap();
        cab.write_u16::<LittleEndian>(0).unwrap();

        cab.write_u32::<LittleEndian>(self.payload.len() as u32).unwrap();
        cab.write_u32::<LittleEndian>(0).unwrap();
        cab.write_u16::<LittleEndian>(0).unwrap();
        cab.write_u16::<LittleEndian>(self.date).unwrap();
        cab.write_u16::<LittleEndian>(self.time).unwrap();
        cab.write_u16::<LittleEndian>(self.attributes).unwrap();
        cab.write_all(self.name).unwrap();
        cab.write_u8(0).unwrap();

        cab.write_u32::<LittleEndian>(CHECKSUM).unwrap();
        cab.write_u16::<LittleEndian>(payload_size).unwrap();
        cab.write_u16::<LittleEndian>(payload_size).unwrap();
        cab.write_all(self.payload).unwrap();
        assert_eq!(cab.len(), total_size);
        cab
    }
}

/// Asserts that `actual` equals `expected` outside of `start..end`.
pub fn assert_unchanged_outside(
    expected: &[u8],
    actual: &[u8],
    start: usize,
    end: usize,
) {
    assert_eq!(expected.len(), actual.len());
    assert_eq!(&actual[..start], &expected[..start]);
    assert_eq!(&actual[end..], &expected[end..]);
}
