// SPDX-License-Identifier: Apache-2.0
// Copyright 2024 Joe Pearson
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The on-disk archive codec (`spec.md` §4.3, §6.1).
//!
//! Primitives are little-endian fixed-width integers/floats, strings are
//! LEB128-length-prefixed UTF-8, containers are LEB128-count-prefixed, and
//! UUIDs are the 16 raw bytes in RFC 4122 field layout. LEB128 varints use
//! the `leb128` crate rather than a hand-rolled encoder.

use std::io::{Read, Write};

use crate::error::Error;
use crate::geom::Coordinate;
use crate::link::Link;
use crate::uuid::Uuid;

pub fn write_u8(w: &mut impl Write, v: u8) -> Result<(), Error> {
    w.write_all(&[v])?;
    Ok(())
}

pub fn read_u8(r: &mut impl Read) -> Result<u8, Error> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

macro_rules! fixed_width {
    ($write:ident, $read:ident, $ty:ty) => {
        pub fn $write(w: &mut impl Write, v: $ty) -> Result<(), Error> {
            w.write_all(&v.to_le_bytes())?;
            Ok(())
        }

        pub fn $read(r: &mut impl Read) -> Result<$ty, Error> {
            let mut buf = [0u8; std::mem::size_of::<$ty>()];
            r.read_exact(&mut buf)?;
            Ok(<$ty>::from_le_bytes(buf))
        }
    };
}

fixed_width!(write_u32, read_u32, u32);
fixed_width!(write_u64, read_u64, u64);
fixed_width!(write_i32, read_i32, i32);
fixed_width!(write_i64, read_i64, i64);
fixed_width!(write_f32, read_f32, f32);

pub fn write_varint(w: &mut impl Write, v: u64) -> Result<(), Error> {
    leb128::write::unsigned(w, v).map_err(|_| Error::Io("leb128 write failed".into()))?;
    Ok(())
}

pub fn read_varint(r: &mut impl Read) -> Result<u64, Error> {
    leb128::read::unsigned(r).map_err(|_| Error::TruncatedArchive)
}

pub fn write_string(w: &mut impl Write, s: &str) -> Result<(), Error> {
    write_varint(w, s.len() as u64)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

pub fn read_string(r: &mut impl Read) -> Result<String, Error> {
    let len = read_varint(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|_| Error::TruncatedArchive)
}

pub fn write_uuid(w: &mut impl Write, uuid: Uuid) -> Result<(), Error> {
    w.write_all(uuid.as_bytes())?;
    Ok(())
}

pub fn read_uuid(r: &mut impl Read) -> Result<Uuid, Error> {
    let mut buf = [0u8; 16];
    r.read_exact(&mut buf)?;
    Ok(Uuid::from_bytes(buf))
}

pub fn write_link(w: &mut impl Write, link: &Link) -> Result<(), Error> {
    write_uuid(w, link.uuid())
}

pub fn read_link(r: &mut impl Read) -> Result<Link, Error> {
    Ok(Link::unresolved(read_uuid(r)?))
}

pub fn write_coordinate(w: &mut impl Write, coord: Coordinate) -> Result<(), Error> {
    let (lat, lon) = coord.to_fixed();
    write_i32(w, lat)?;
    write_i32(w, lon)
}

pub fn read_coordinate(r: &mut impl Read) -> Result<Coordinate, Error> {
    let lat = read_i32(r)?;
    let lon = read_i32(r)?;
    Ok(Coordinate::from_fixed(lat, lon))
}

pub fn write_vec<T>(
    w: &mut impl Write,
    items: &[T],
    mut write_one: impl FnMut(&mut dyn Write, &T) -> Result<(), Error>,
) -> Result<(), Error> {
    write_varint(w, items.len() as u64)?;
    for item in items {
        write_one(w, item)?;
    }
    Ok(())
}

pub fn read_vec<T>(
    r: &mut impl Read,
    mut read_one: impl FnMut(&mut dyn Read) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    let len = read_varint(r)? as usize;
    let mut out = Vec::with_capacity(len.min(1 << 20));
    for _ in 0..len {
        out.push(read_one(r)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_roundtrip() {
        let mut buf = Vec::new();
        write_string(&mut buf, "EDDF").unwrap();
        let mut cursor = &buf[..];
        assert_eq!(read_string(&mut cursor).unwrap(), "EDDF");
    }

    #[test]
    fn coordinate_roundtrip() {
        let c = Coordinate::new(50.0379, 8.5622);
        let mut buf = Vec::new();
        write_coordinate(&mut buf, c).unwrap();
        let mut cursor = &buf[..];
        let back = read_coordinate(&mut cursor).unwrap();
        assert!((back.latitude - c.latitude).abs() < 1e-6);
        assert!((back.longitude - c.longitude).abs() < 1e-6);
    }

    #[test]
    fn truncated_stream_is_an_error() {
        let buf = [0u8; 1];
        let mut cursor = &buf[..];
        assert!(matches!(read_u32(&mut cursor), Err(Error::TruncatedArchive)));
    }

    #[test]
    fn vec_roundtrip() {
        let mut buf = Vec::new();
        write_vec(&mut buf, &[1u32, 2, 3], |w, v| write_u32(w, *v)).unwrap();
        let mut cursor = &buf[..];
        let back: Vec<u32> = read_vec(&mut cursor, |r| read_u32(r)).unwrap();
        assert_eq!(back, vec![1, 2, 3]);
    }
}
