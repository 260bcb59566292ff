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

//! [`Bitmap`] implementations over the `roaring` crate.
//!
//! Both widths serialize through the library's portable Roaring format, so
//! plane payloads can be exchanged with other Roaring-based implementations.

use std::io;

use roaring::RoaringBitmap;
use roaring::RoaringTreemap;

use crate::bitmap::Bitmap;

impl Bitmap for RoaringBitmap {
    type Key = u32;

    fn insert(&mut self, key: u32) -> bool {
        RoaringBitmap::insert(self, key)
    }

    fn remove(&mut self, key: u32) -> bool {
        RoaringBitmap::remove(self, key)
    }

    fn contains(&self, key: u32) -> bool {
        RoaringBitmap::contains(self, key)
    }

    fn cardinality(&self) -> u64 {
        self.len()
    }

    fn is_empty(&self) -> bool {
        RoaringBitmap::is_empty(self)
    }

    fn xor_with(&mut self, other: &Self) {
        *self ^= other;
    }

    fn or_with(&mut self, other: &Self) {
        *self |= other;
    }

    fn and_not_with(&mut self, other: &Self) {
        *self -= other;
    }

    fn and(&self, other: &Self) -> Self {
        self & other
    }

    fn or(&self, other: &Self) -> Self {
        self | other
    }

    fn and_not(&self, other: &Self) -> Self {
        self - other
    }

    fn and_cardinality(&self, other: &Self) -> u64 {
        self.intersection_len(other)
    }

    fn keys(&self) -> impl Iterator<Item = u32> + '_ {
        self.iter()
    }

    fn serialized_size(&self) -> usize {
        RoaringBitmap::serialized_size(self)
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(RoaringBitmap::serialized_size(self));
        self.serialize_into(&mut bytes)
            .expect("writing to a Vec cannot fail");
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> io::Result<Self> {
        RoaringBitmap::deserialize_from(bytes)
    }
}

impl Bitmap for RoaringTreemap {
    type Key = u64;

    fn insert(&mut self, key: u64) -> bool {
        RoaringTreemap::insert(self, key)
    }

    fn remove(&mut self, key: u64) -> bool {
        RoaringTreemap::remove(self, key)
    }

    fn contains(&self, key: u64) -> bool {
        RoaringTreemap::contains(self, key)
    }

    fn cardinality(&self) -> u64 {
        self.len()
    }

    fn is_empty(&self) -> bool {
        RoaringTreemap::is_empty(self)
    }

    fn xor_with(&mut self, other: &Self) {
        *self ^= other;
    }

    fn or_with(&mut self, other: &Self) {
        *self |= other;
    }

    fn and_not_with(&mut self, other: &Self) {
        *self -= other;
    }

    fn and(&self, other: &Self) -> Self {
        self & other
    }

    fn or(&self, other: &Self) -> Self {
        self | other
    }

    fn and_not(&self, other: &Self) -> Self {
        self - other
    }

    fn and_cardinality(&self, other: &Self) -> u64 {
        self.intersection_len(other)
    }

    fn keys(&self) -> impl Iterator<Item = u64> + '_ {
        self.iter()
    }

    fn serialized_size(&self) -> usize {
        RoaringTreemap::serialized_size(self)
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(RoaringTreemap::serialized_size(self));
        self.serialize_into(&mut bytes)
            .expect("writing to a Vec cannot fail");
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> io::Result<Self> {
        RoaringTreemap::deserialize_from(bytes)
    }
}
