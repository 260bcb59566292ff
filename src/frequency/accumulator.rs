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

//! Shard-side and coordinator-side facades over the frequency counter.
//!
//! A scan over one data partition feeds a [`FrequencyAccumulator`]; its
//! serialized shard value travels to a coordinator, whose
//! [`FrequencyMerger`] folds the partial results together and publishes the
//! final frequency-of-frequencies histogram.

use std::collections::BTreeMap;
use std::mem;

use crate::bitmap::Bitmap;
use crate::error::Error;
use crate::error::ErrorKind;
use crate::frequency::BitmapFrequencySketch;

/// Per-partition counter with the shard-result surface.
#[derive(Debug, Clone)]
pub struct FrequencyAccumulator<B: Bitmap> {
    sketch: BitmapFrequencySketch<B>,
}

impl<B: Bitmap> FrequencyAccumulator<B> {
    /// Creates an accumulator whose counter has the given plane count.
    pub fn new(planes: usize) -> Self {
        Self {
            sketch: BitmapFrequencySketch::new(planes),
        }
    }

    /// Records one observation of a key.
    pub fn add_observation(&mut self, key: B::Key) {
        self.sketch.add(key);
    }

    /// Serializes the counter as a partial (shard) result.
    ///
    /// The counter is emitted as-is; normalization happens once, at the
    /// coordinator, after all partial results have been merged.
    pub fn shard_value(&self) -> Vec<u8> {
        self.sketch.serialize()
    }

    /// Normalizes and serializes the counter as a final result.
    pub fn final_value(&mut self) -> Vec<u8> {
        self.sketch.normalize();
        self.sketch.serialize()
    }

    /// Normalizes the counter and returns its count histogram.
    pub fn final_histogram(mut self) -> BTreeMap<u32, u64> {
        self.sketch.normalize();
        self.sketch.frequency_of_frequencies()
    }

    /// Consumes the accumulator, returning the underlying counter.
    pub fn into_sketch(self) -> BitmapFrequencySketch<B> {
        self.sketch
    }
}

/// Coordinator-side merger of serialized shard results.
#[derive(Debug, Clone)]
pub struct FrequencyMerger<B: Bitmap> {
    result: BitmapFrequencySketch<B>,
}

impl<B: Bitmap> FrequencyMerger<B> {
    /// Creates a merger expecting shards with the given plane count.
    pub fn new(planes: usize) -> Self {
        Self {
            result: BitmapFrequencySketch::new(planes),
        }
    }

    /// Deserializes one shard's partial result and merges it in.
    ///
    /// Returns `ConfigInvalid` if the shard was built with a different plane
    /// count, and a deserialization error if the bytes are malformed; in
    /// either case the accumulated result is left untouched.
    pub fn merge_shard(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let shard = BitmapFrequencySketch::deserialize(bytes)?;
        let planes = self.result.num_planes();
        if shard.num_planes() != planes {
            return Err(Error::new(
                ErrorKind::ConfigInvalid,
                "shard plane count does not match merger configuration",
            )
            .with_context("expected", planes)
            .with_context("actual", shard.num_planes()));
        }

        let result = mem::replace(&mut self.result, BitmapFrequencySketch::new(planes));
        self.result = result.merge(shard);
        Ok(())
    }

    /// Serializes the accumulated result for a further merge tier.
    pub fn shard_value(&self) -> Vec<u8> {
        self.result.serialize()
    }

    /// Normalizes the accumulated result and returns the final histogram.
    pub fn finish(mut self) -> BTreeMap<u32, u64> {
        self.result.normalize();
        self.result.frequency_of_frequencies()
    }

    /// Consumes the merger, returning the accumulated counter.
    pub fn into_sketch(self) -> BitmapFrequencySketch<B> {
        self.result
    }
}
