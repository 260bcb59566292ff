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

//! Capability contract over compressed integer sets.
//!
//! The frequency counter only needs a small surface from its bitmap type:
//! membership updates, cardinality, boolean set algebra (in-place and
//! allocating), key iteration, and a canonical byte serialization. Any
//! production-grade compressed bitmap satisfying [`Bitmap`] is substitutable;
//! the provided implementations wrap `roaring::RoaringBitmap` (32-bit keys)
//! and `roaring::RoaringTreemap` (64-bit keys).

mod roaring;

use std::fmt;
use std::hash::Hash;
use std::io;

use byteorder::LittleEndian;
use byteorder::ReadBytesExt;

/// An unsigned integer key domain with a fixed little-endian wire width.
pub trait BitmapKey: Copy + Eq + Hash + fmt::Debug {
    /// Number of bytes this key occupies in serialized form.
    const SERIALIZED_BYTES: u8;

    /// Appends the little-endian encoding of this key.
    fn write_le(self, out: &mut Vec<u8>);

    /// Reads one little-endian key.
    fn read_le<R: io::Read>(input: &mut R) -> io::Result<Self>;
}

/// A dynamic set of unsigned integers with boolean set algebra.
pub trait Bitmap: Clone + Default + fmt::Debug {
    /// The key domain of this set.
    type Key: BitmapKey;

    /// Inserts a key, returning true if it was absent.
    fn insert(&mut self, key: Self::Key) -> bool;

    /// Removes a key, returning true if it was present.
    fn remove(&mut self, key: Self::Key) -> bool;

    /// Returns true if the key is present.
    fn contains(&self, key: Self::Key) -> bool;

    /// Number of keys in the set.
    fn cardinality(&self) -> u64;

    /// Returns true if the set holds no keys.
    fn is_empty(&self) -> bool;

    /// `self = self XOR other`.
    fn xor_with(&mut self, other: &Self);

    /// `self = self OR other`.
    fn or_with(&mut self, other: &Self);

    /// `self = self AND-NOT other`.
    fn and_not_with(&mut self, other: &Self);

    /// Returns `self AND other` as a new set.
    fn and(&self, other: &Self) -> Self;

    /// Returns `self OR other` as a new set.
    fn or(&self, other: &Self) -> Self;

    /// Returns `self AND-NOT other` as a new set.
    fn and_not(&self, other: &Self) -> Self;

    /// Cardinality of `self AND other` without materializing it.
    fn and_cardinality(&self, other: &Self) -> u64 {
        self.and(other).cardinality()
    }

    /// Cardinality of `self AND-NOT other` without keeping the result.
    fn and_not_cardinality(&self, other: &Self) -> u64 {
        self.and_not(other).cardinality()
    }

    /// Iterates the keys in ascending order.
    fn keys(&self) -> impl Iterator<Item = Self::Key> + '_;

    /// Size in bytes of the canonical serialization.
    fn serialized_size(&self) -> usize;

    /// Canonical portable serialization of this set.
    fn to_bytes(&self) -> Vec<u8>;

    /// Reconstructs a set from its canonical serialization.
    fn from_bytes(bytes: &[u8]) -> io::Result<Self>;
}

impl BitmapKey for u32 {
    const SERIALIZED_BYTES: u8 = 4;

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn read_le<R: io::Read>(input: &mut R) -> io::Result<Self> {
        input.read_u32::<LittleEndian>()
    }
}

impl BitmapKey for u64 {
    const SERIALIZED_BYTES: u8 = 8;

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn read_le<R: io::Read>(input: &mut R) -> io::Result<Self> {
        input.read_u64::<LittleEndian>()
    }
}
