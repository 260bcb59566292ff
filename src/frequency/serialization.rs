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

//! Binary serialization format constants for bitmap frequency counters.
//!
//! # Counter Binary Format
//!
//! ## Preamble Layout (Little Endian)
//!
//! | Byte | Field | Description |
//! |------|-------|-------------|
//! | 0 | serial_version | Serialization version (currently 1) |
//! | 1 | family_id | Family ID (21 for bitmap frequency counters) |
//! | 2 | flags | Bit flags (see below) |
//! | 3 | key_bytes | Key width in bytes (4 or 8) |
//! | 4 | num_planes | Configured plane count of the counter |
//!
//! ## Flags (Byte 2)
//!
//! | Bit | Name | Description |
//! |-----|------|-------------|
//! | 0 | HAS_BITMAPS | At least one plane is allocated and serialized |
//! | 1 | HAS_OVERFLOW | The overflow map is non-empty and serialized |
//!
//! ## Body
//!
//! If HAS_BITMAPS is set: one `u8` count of serialized planes, then for each
//! plane a `u32` byte length followed by the plane's canonical Roaring
//! serialization. Planes are written in increasing index order and the list
//! is truncated at the first unallocated plane; trailing unallocated planes
//! are never written and deserialize back to the unallocated state.
//!
//! If HAS_OVERFLOW is set: one `u32` entry count, then for each entry a
//! native-width key followed by its `u32` count.

pub const FREQUENCY_FAMILY_ID: u8 = 21;
pub const SERIAL_VERSION: u8 = 1;

pub const FLAG_HAS_BITMAPS: u8 = 1;
pub const FLAG_HAS_OVERFLOW: u8 = 1 << 1;
