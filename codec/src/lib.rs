//! Entity property delta decoding for propdelta.
//!
//! Each update message names the property slots of one entity that changed
//! and carries their new values:
//!
//! ```text
//! [wide flag: 1 bit] [index list ... 0xFFF] [value for each listed slot]
//! ```
//!
//! This crate recovers the slot list from its tiered index-delta encoding,
//! decodes the values through a [`ValueDecoder`], and hands each value to the
//! handlers registered on that slot.
//!
//! # Features
//!
//! - Index-delta decoding in both the legacy and the wide format
//! - Entities with per-slot update handlers and name lookup
//! - A shared, thread-safe pool of slot buffers
//! - Latest-value snapshots per entity
//!
//! # Design Principles
//!
//! - **No steady-state allocations** - Slot buffers come from a reusable pool.
//! - **Explicit errors** - Defects and stream corruption are reported, never swallowed.
//! - **Decode only** - Nothing here writes update messages.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use bitstream::{BitReader, BitWriter};
//! use codec::{collect_properties, BasicValueDecoder, Entity, EntityId, PropertySnapshot,
//!     PropertyValue, UpdateBufferPool};
//! use schema::{ClassSchema, PropertyKind};
//!
//! let class = ClassSchema::builder(1, "CCSTeam")
//!     .property("m_iScore", PropertyKind::uint(8))
//!     .build()
//!     .unwrap();
//! let mut team = Entity::new(EntityId::new(70), Arc::new(class));
//! let snapshot = PropertySnapshot::new();
//! collect_properties(&mut team, &snapshot);
//!
//! let mut writer = BitWriter::new();
//! writer.write_bit(false); // legacy index format
//! writer.write_bits(0, 7).unwrap(); // slot 0
//! writer.write_bits(0x7F, 7).unwrap(); // end marker
//! writer.write_bits(0x7F, 7).unwrap();
//! writer.write_bits(16, 8).unwrap(); // m_iScore = 16
//! let bytes = writer.finish();
//!
//! let pool = UpdateBufferPool::new();
//! team.apply_update(&mut BitReader::new(&bytes), &BasicValueDecoder, &pool).unwrap();
//! assert_eq!(snapshot.get(0), Some(PropertyValue::UInt(16)));
//! ```

mod config;
mod entity;
mod error;
mod index;
mod pool;
mod snapshot;
mod types;
mod value;

pub use config::PoolConfig;
pub use entity::{Entity, PropertyEntry, UpdateHandler};
pub use error::{CodecError, CodecResult, ErrorCategory, ValueReason};
pub use index::{read_field_index, IndexDeltaDecoder, INDEX_SENTINEL};
pub use pool::{UpdateBuffer, UpdateBufferPool};
pub use snapshot::{collect_properties, PropertySnapshot};
pub use types::{EntityId, UpdateStats};
pub use value::{BasicValueDecoder, PropertyValue, ValueDecoder};
