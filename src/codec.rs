// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Little-endian byte plumbing shared by the counter serializers.

use std::io;
use std::io::Cursor;
use std::io::Read;

use byteorder::LittleEndian;
use byteorder::ReadBytesExt;

pub(crate) fn put_u8(out: &mut Vec<u8>, n: u8) {
    out.push(n);
}

pub(crate) fn put_u32_le(out: &mut Vec<u8>, n: u32) {
    out.extend_from_slice(&n.to_le_bytes());
}

/// Bounds-checked reader over a serialized counter.
pub(crate) struct SketchSlice<'a> {
    slice: Cursor<&'a [u8]>,
}

impl<'a> SketchSlice<'a> {
    pub fn new(slice: &'a [u8]) -> SketchSlice<'a> {
        SketchSlice {
            slice: Cursor::new(slice),
        }
    }

    pub fn remaining(&self) -> usize {
        let len = self.slice.get_ref().len();
        len.saturating_sub(self.slice.position() as usize)
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        ReadBytesExt::read_u8(&mut self.slice)
    }

    pub fn read_u32_le(&mut self) -> io::Result<u32> {
        self.slice.read_u32::<LittleEndian>()
    }

    /// Reads exactly `len` bytes, refusing to allocate past the end of the input.
    pub fn read_vec(&mut self, len: usize) -> io::Result<Vec<u8>> {
        if len > self.remaining() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "length prefix exceeds remaining input",
            ));
        }
        let mut buf = vec![0u8; len];
        self.slice.read_exact(&mut buf)?;
        Ok(buf)
    }
}

impl Read for SketchSlice<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.slice.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_back_written_fields() {
        let mut out = Vec::new();
        put_u8(&mut out, 7);
        put_u32_le(&mut out, 0xDEAD_BEEF);

        let mut input = SketchSlice::new(&out);
        assert_eq!(input.read_u8().unwrap(), 7);
        assert_eq!(input.read_u32_le().unwrap(), 0xDEAD_BEEF);
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn read_vec_rejects_oversized_length() {
        let bytes = [1u8, 2, 3];
        let mut input = SketchSlice::new(&bytes);
        let err = input.read_vec(usize::MAX).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn read_past_end_fails() {
        let mut input = SketchSlice::new(&[1u8]);
        assert_eq!(input.read_u8().unwrap(), 1);
        assert!(input.read_u32_le().is_err());
    }
}
