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

//! Mergeable frequency counters backed by compressed bitmaps.
//!
//! The centerpiece is the bit-sliced counter in [`frequency`]: per-key counts
//! are stored as a small stack of Roaring bitmap "planes" (one per count
//! bit), which makes counters built over disjoint data partitions mergeable
//! with plain bitmap algebra and lets the full count histogram be decoded
//! without enumerating keys. High-frequency keys spill into an explicit
//! overflow map so the plane stack stays shallow.
//!
//! ```rust
//! use bitfreq::frequency::BitmapFrequencySketch32;
//!
//! let mut counter = BitmapFrequencySketch32::new(4);
//! counter.add(7);
//! counter.add(7);
//! assert_eq!(counter.count(7), 2);
//! ```
//!
//! The [`term`] module holds a companion exact counter over string terms,
//! with top-K truncation for shard results.

pub mod bitmap;
pub(crate) mod codec;
pub mod error;
pub mod frequency;
pub mod term;
