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

//! Bit-sliced frequency counter core.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::io;

use roaring::RoaringBitmap;
use roaring::RoaringTreemap;

use crate::bitmap::Bitmap;
use crate::bitmap::BitmapKey;
use crate::codec::SketchSlice;
use crate::codec::put_u8;
use crate::codec::put_u32_le;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::frequency::serialization::FLAG_HAS_BITMAPS;
use crate::frequency::serialization::FLAG_HAS_OVERFLOW;
use crate::frequency::serialization::FREQUENCY_FAMILY_ID;
use crate::frequency::serialization::SERIAL_VERSION;

/// Upper bound on the configurable plane count.
///
/// Keeps per-key counts within `u32` and the decoded histogram length
/// (`2^planes`) within reason; typical configurations use 8 to 16 planes.
pub const MAX_PLANES: usize = 24;

/// Counter variant over the 32-bit key domain.
pub type BitmapFrequencySketch32 = BitmapFrequencySketch<RoaringBitmap>;

/// Counter variant over the 64-bit key domain.
pub type BitmapFrequencySketch64 = BitmapFrequencySketch<RoaringTreemap>;

/// A mergeable frequency counter storing per-key counts as bit planes.
///
/// The count of a key is `sum of 2^i` over the planes `i` containing it,
/// plus its overflow entry once the count has reached `2^planes`. Counters
/// built over disjoint data partitions can be merged into one holding the
/// exact pointwise sums, without ever materializing a per-key count table.
///
/// # Examples
///
/// ```
/// use bitfreq::frequency::BitmapFrequencySketch32;
///
/// let mut counter = BitmapFrequencySketch32::new(4);
/// counter.add(7);
/// counter.add(7);
/// counter.add(9);
/// assert_eq!(counter.count(7), 2);
/// assert_eq!(counter.count(9), 1);
/// ```
#[derive(Debug, Clone)]
pub struct BitmapFrequencySketch<B: Bitmap> {
    planes: Vec<Option<B>>,
    overflow: HashMap<B::Key, u32>,
}

impl<B: Bitmap> BitmapFrequencySketch<B> {
    /// Creates an empty counter with the given plane count.
    ///
    /// Counts of `2^planes` or more are kept in an explicit overflow map
    /// rather than the bitmap encoding, and for efficiency such keys should
    /// not make up a large fraction of the distinct keys counted. A plane
    /// count of zero is legal: every count goes straight to overflow.
    ///
    /// # Panics
    ///
    /// Panics if `planes` exceeds [`MAX_PLANES`].
    pub fn new(planes: usize) -> Self {
        assert!(
            planes <= MAX_PLANES,
            "plane count {planes} exceeds maximum {MAX_PLANES}"
        );
        Self {
            planes: vec![None; planes],
            overflow: HashMap::new(),
        }
    }

    /// Returns the configured plane count.
    pub fn num_planes(&self) -> usize {
        self.planes.len()
    }

    /// Returns the number of allocated planes (always a prefix).
    pub fn allocated_planes(&self) -> usize {
        self.planes.iter().take_while(|plane| plane.is_some()).count()
    }

    /// Returns true if no key has ever been added.
    pub fn is_empty(&self) -> bool {
        self.overflow.is_empty() && self.planes.iter().flatten().all(|plane| plane.is_empty())
    }

    /// The map of high-frequency keys (count at or past `2^planes`).
    pub fn overflow(&self) -> &HashMap<B::Key, u32> {
        &self.overflow
    }

    /// Adds one occurrence of the given key.
    pub fn add(&mut self, key: B::Key) {
        if let Some(count) = self.overflow.get_mut(&key) {
            *count += 1;
            return;
        }

        // Binary addition x+1=y: carry the bit until an empty column absorbs it.
        for plane in &mut self.planes {
            let plane = plane.get_or_insert_with(B::default);
            if !plane.remove(key) {
                plane.insert(key);
                return;
            }
        }

        // The carry ran off the end: the count has just reached 2^planes.
        self.overflow.insert(key, 1 << self.planes.len());
    }

    /// Returns the current count of a key.
    ///
    /// Valid in both canonical and merged (non-canonical) states: the true
    /// count is the plane-derived value plus the overflow entry.
    pub fn count(&self, key: B::Key) -> u64 {
        let mut count = u64::from(self.overflow.get(&key).copied().unwrap_or(0));
        for (i, plane) in self.planes.iter().enumerate() {
            if let Some(plane) = plane {
                if plane.contains(key) {
                    count += 1 << i;
                }
            }
        }
        count
    }

    /// Merges this counter with another, consuming both.
    ///
    /// Both operands must have the same plane count. The returned counter
    /// holds the keys of both with their counts added together; the merge
    /// mutates one operand in place and reuses the other's planes as carry
    /// scratch, so neither input survives the call.
    ///
    /// The result may be non-canonical (a key holding both plane bits and an
    /// overflow entry); call [`normalize`](Self::normalize) before decoding.
    ///
    /// # Panics
    ///
    /// Panics if the plane counts differ.
    #[must_use = "merge returns the surviving counter"]
    pub fn merge(mut self, mut other: Self) -> Self {
        assert_eq!(
            self.planes.len(),
            other.planes.len(),
            "cannot merge counters with different plane counts"
        );
        let num_planes = self.planes.len();

        if num_planes == 0 {
            return self.fold_overflow_from(other);
        }

        // The algorithm is a ripple-carry adder over plane vectors, built
        // from half-adders adapted from the standard (s = x xor y,
        // c = x and y) to:
        //
        //   s = x xor y
        //   c = y andnot s
        //
        // which permits in-place modification: x becomes the sum and y the
        // carry, with no allocation beyond what the operands already own.
        let Some(seed) = other.planes[0].take() else {
            // `other` never allocated a plane; its counts are all in overflow.
            return self.fold_overflow_from(other);
        };
        let Some(first) = self.planes[0].as_mut() else {
            other.planes[0] = Some(seed);
            return other.fold_overflow_from(self);
        };
        first.xor_with(&seed);
        let mut carry = seed;
        carry.and_not_with(first);

        let mut i = 1;

        // Full adders while both operands still have allocated planes.
        while i < num_planes {
            let Some(mut y) = other.planes[i].take() else {
                break;
            };
            let Some(x) = self.planes[i].as_mut() else {
                other.planes[i] = Some(y);
                break;
            };
            x.xor_with(&y); // s' = x xor y
            y.and_not_with(x); // c' = y andnot s'
            x.xor_with(&carry); // s = s' xor c_in
            carry.and_not_with(x); // c_out = (c_in andnot s) or c'
            carry.or_with(&y);
            i += 1;
        }

        // One operand is exhausted: ripple the carry through the other.
        while i < num_planes {
            let Some(x) = self.planes[i].as_mut() else {
                break;
            };
            x.xor_with(&carry);
            carry.and_not_with(x);
            i += 1;
        }
        while i < num_planes {
            let Some(mut x) = other.planes[i].take() else {
                break;
            };
            x.xor_with(&carry);
            carry.and_not_with(&x);
            self.planes[i] = Some(x);
            i += 1;
        }

        if i < num_planes {
            // Both operands ran out of allocated planes. Every key still in
            // the carry needs exactly bit i set, so the carry is that plane.
            if !carry.is_empty() {
                self.planes[i] = Some(carry);
            }
        } else {
            // The carry ran past the last plane: each key left in it has
            // overflowed by one additional unit of 2^planes.
            let unit = 1u32 << num_planes;
            for key in carry.keys() {
                *self.overflow.entry(key).or_insert(0) += unit;
            }
        }

        self.fold_overflow_from(other)
    }

    fn fold_overflow_from(mut self, other: Self) -> Self {
        for (key, count) in other.overflow {
            *self.overflow.entry(key).or_insert(0) += count;
        }
        self
    }

    /// Restores canonical form after merging.
    ///
    /// Folds any residual plane bits of overflowed keys into their overflow
    /// counts, so that an overflowed key contributes nothing to the planes.
    /// Idempotent, and required before [`decode`](Self::decode).
    pub fn normalize(&mut self) {
        for (key, count) in &mut self.overflow {
            for (i, plane) in self.planes.iter_mut().enumerate() {
                if let Some(plane) = plane {
                    if plane.remove(*key) {
                        *count += 1 << i;
                    }
                }
            }
        }
    }

    /// Decodes the low-count histogram from the planes.
    ///
    /// Returns a vector of length `2^M` (M = number of allocated planes)
    /// where entry `v` is the exact number of distinct keys whose
    /// plane-derived count equals `v`. Overflowed keys are excluded, which
    /// is only correct on a canonical counter; normalize first after any
    /// merge. The cost is `O(2^M)` bitmap operations, independent of the
    /// number of distinct keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitfreq::frequency::BitmapFrequencySketch32;
    ///
    /// let mut counter = BitmapFrequencySketch32::new(2);
    /// counter.add(101);
    /// for key in [102, 202] {
    ///     counter.add(key);
    ///     counter.add(key);
    /// }
    /// for key in [103, 203, 303] {
    ///     counter.add(key);
    ///     counter.add(key);
    ///     counter.add(key);
    /// }
    /// counter.normalize();
    /// assert_eq!(counter.decode(), vec![0, 1, 2, 3]);
    /// ```
    pub fn decode(&self) -> Vec<u64> {
        let planes: Vec<&B> = self.planes.iter().map_while(Option::as_ref).collect();
        if planes.is_empty() {
            return Vec::new();
        }

        let mut result = vec![0u64; 1 << planes.len()];

        let top = planes.len() - 1;
        if top == 0 {
            result[1] = planes[0].cardinality();
        } else {
            // Split the key universe on the most significant plane: keys with
            // the top bit set descend through decode_branch, the rest through
            // decode_lowest with the top plane excluded to avoid counting a
            // key under two different high bits.
            decode_lowest(&planes, planes[top], top - 1, &mut result);
            decode_branch(&planes, planes[top], top - 1, 1 << top, &mut result);
        }

        result
    }

    /// Derives the frequency-of-frequencies histogram.
    ///
    /// Maps each occurring count to the number of distinct keys having that
    /// count, combining the decoded low-count buckets with one aggregated
    /// bucket per distinct overflow count. The counter must be canonical.
    pub fn frequency_of_frequencies(&self) -> BTreeMap<u32, u64> {
        let mut histogram = BTreeMap::new();

        for (count, keys) in self.decode().into_iter().enumerate() {
            if keys > 0 {
                histogram.insert(count as u32, keys);
            }
        }

        for count in self.overflow.values() {
            *histogram.entry(*count).or_insert(0) += 1;
        }

        histogram
    }

    /// Serializes the counter.
    pub fn serialize(&self) -> Vec<u8> {
        let allocated = self.allocated_planes();

        let mut out = Vec::with_capacity(16);
        put_u8(&mut out, SERIAL_VERSION);
        put_u8(&mut out, FREQUENCY_FAMILY_ID);
        let mut flags = 0u8;
        if allocated > 0 {
            flags |= FLAG_HAS_BITMAPS;
        }
        if !self.overflow.is_empty() {
            flags |= FLAG_HAS_OVERFLOW;
        }
        put_u8(&mut out, flags);
        put_u8(&mut out, B::Key::SERIALIZED_BYTES);
        put_u8(&mut out, self.planes.len() as u8);

        if allocated > 0 {
            put_u8(&mut out, allocated as u8);
            for plane in self.planes.iter().map_while(Option::as_ref) {
                let bytes = plane.to_bytes();
                put_u32_le(&mut out, bytes.len() as u32);
                out.extend_from_slice(&bytes);
            }
        }

        if !self.overflow.is_empty() {
            put_u32_le(&mut out, self.overflow.len() as u32);
            for (key, count) in &self.overflow {
                key.write_le(&mut out);
                put_u32_le(&mut out, *count);
            }
        }

        out
    }

    /// Deserializes a counter.
    ///
    /// The plane count is carried in the serialized form; merging requires
    /// it to match the receiving counter's configuration.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let mut input = SketchSlice::new(bytes);

        let version = input.read_u8().map_err(truncated)?;
        if version != SERIAL_VERSION {
            return Err(
                Error::new(ErrorKind::MalformedDeserializeData, "unsupported serial version")
                    .with_context("version", version),
            );
        }
        let family = input.read_u8().map_err(truncated)?;
        if family != FREQUENCY_FAMILY_ID {
            return Err(
                Error::new(ErrorKind::MalformedDeserializeData, "unexpected family id")
                    .with_context("expected", FREQUENCY_FAMILY_ID)
                    .with_context("actual", family),
            );
        }
        let flags = input.read_u8().map_err(truncated)?;
        let key_bytes = input.read_u8().map_err(truncated)?;
        if key_bytes != B::Key::SERIALIZED_BYTES {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "key width does not match this counter variant",
            )
            .with_context("expected", B::Key::SERIALIZED_BYTES)
            .with_context("actual", key_bytes));
        }
        let num_planes = input.read_u8().map_err(truncated)? as usize;
        if num_planes > MAX_PLANES {
            return Err(
                Error::new(ErrorKind::ConfigInvalid, "plane count exceeds maximum")
                    .with_context("planes", num_planes)
                    .with_context("maximum", MAX_PLANES),
            );
        }

        let mut counter = Self::new(num_planes);

        if flags & FLAG_HAS_BITMAPS != 0 {
            let serialized = input.read_u8().map_err(truncated)? as usize;
            if serialized > num_planes {
                return Err(Error::new(
                    ErrorKind::MalformedDeserializeData,
                    "more serialized planes than the counter holds",
                )
                .with_context("serialized", serialized)
                .with_context("planes", num_planes));
            }
            for i in 0..serialized {
                let len = input.read_u32_le().map_err(truncated)? as usize;
                let plane_bytes = input.read_vec(len).map_err(truncated)?;
                let plane = B::from_bytes(&plane_bytes).map_err(|err| {
                    Error::new(
                        ErrorKind::MalformedDeserializeData,
                        "failed to deserialize plane bitmap",
                    )
                    .with_context("plane", i)
                    .set_source(err)
                })?;
                counter.planes[i] = Some(plane);
            }
        }

        if flags & FLAG_HAS_OVERFLOW != 0 {
            let entries = input.read_u32_le().map_err(truncated)? as usize;
            for _ in 0..entries {
                let key = B::Key::read_le(&mut input).map_err(truncated)?;
                let count = input.read_u32_le().map_err(truncated)?;
                counter.overflow.insert(key, count);
            }
        }

        Ok(counter)
    }
}

fn truncated(err: io::Error) -> Error {
    Error::new(
        ErrorKind::MalformedDeserializeData,
        "serialized counter is truncated",
    )
    .set_source(err)
}

fn decode_branch<B: Bitmap>(
    planes: &[&B],
    included: &B,
    level: usize,
    offset: usize,
    result: &mut [u64],
) {
    if level == 0 {
        result[offset] = included.and_not_cardinality(planes[0]);
        result[offset + 1] = included.and_cardinality(planes[0]);
    } else {
        let high = included.and(planes[level]);
        let low = included.and_not(&high);

        decode_branch(planes, &low, level - 1, offset, result);
        decode_branch(planes, &high, level - 1, offset + (1 << level), result);
    }
}

fn decode_lowest<B: Bitmap>(planes: &[&B], excluded: &B, level: usize, result: &mut [u64]) {
    if level == 0 {
        result[1] = planes[0].and_not_cardinality(excluded);
    } else {
        let high = planes[level].and_not(excluded);
        let excluded = planes[level].or(excluded);

        decode_lowest(planes, &excluded, level - 1, result);
        decode_branch(planes, &high, level - 1, 1 << level, result);
    }
}
