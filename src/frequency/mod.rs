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

//! Mergeable bitmap frequency counters.
//!
//! A [`BitmapFrequencySketch`] counts occurrences of integer keys by storing
//! the bits of each key's running count as a vector of compressed bitmaps
//! (one "plane" per bit position), with an explicit overflow map for keys
//! whose count has outgrown the planes. Counters built independently over
//! disjoint data partitions merge into an exact combined distribution using
//! only bitmap boolean algebra, and the count histogram is decoded without
//! ever enumerating individual keys.
//!
//! # Usage
//!
//! ```rust
//! use bitfreq::frequency::BitmapFrequencySketch32;
//!
//! let mut x = BitmapFrequencySketch32::new(4);
//! let mut y = BitmapFrequencySketch32::new(4);
//! for _ in 0..10 {
//!     x.add(42);
//! }
//! for _ in 0..5 {
//!     y.add(42);
//! }
//!
//! let mut merged = x.merge(y);
//! merged.normalize();
//! assert_eq!(merged.count(42), 15);
//! assert_eq!(merged.decode()[15], 1);
//! ```
//!
//! For the sharded pipeline (accumulate per partition, serialize, merge the
//! partial results, publish the histogram) see [`FrequencyAccumulator`] and
//! [`FrequencyMerger`].

mod serialization;

mod accumulator;
pub use self::accumulator::FrequencyAccumulator;
pub use self::accumulator::FrequencyMerger;

mod sketch;
pub use self::sketch::BitmapFrequencySketch;
pub use self::sketch::BitmapFrequencySketch32;
pub use self::sketch::BitmapFrequencySketch64;
pub use self::sketch::MAX_PLANES;
