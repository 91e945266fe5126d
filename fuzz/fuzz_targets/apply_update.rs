#![no_main]

use std::sync::{Arc, OnceLock};

use bitstream::BitReader;
use codec::{
    collect_properties, BasicValueDecoder, Entity, EntityId, PropertySnapshot, UpdateBufferPool,
};
use libfuzzer_sys::fuzz_target;
use schema::{ClassSchema, PropertyKind};

fn class() -> Arc<ClassSchema> {
    static CLASS: OnceLock<Arc<ClassSchema>> = OnceLock::new();
    Arc::clone(CLASS.get_or_init(|| {
        let kinds = [
            PropertyKind::bool(),
            PropertyKind::uint(5),
            PropertyKind::sint(17),
            PropertyKind::float32(),
            PropertyKind::uint(64),
        ];
        let mut builder = ClassSchema::builder(1, "CFuzzEntity");
        for i in 0..300 {
            builder = builder.property(format!("m_prop{i}"), kinds[i % kinds.len()]);
        }
        Arc::new(builder.build_unchecked())
    }))
}

fn pool() -> &'static UpdateBufferPool {
    static POOL: OnceLock<UpdateBufferPool> = OnceLock::new();
    POOL.get_or_init(UpdateBufferPool::new)
}

fuzz_target!(|data: &[u8]| {
    let mut entity = Entity::new(EntityId::new(1), class());
    let snapshot = PropertySnapshot::new();
    collect_properties(&mut entity, &snapshot);

    let mut reader = BitReader::new(data);
    if let Ok(stats) = entity.apply_update(&mut reader, &BasicValueDecoder, pool()) {
        assert!(snapshot.len() <= stats.changed);
        assert!(stats.bits_read <= data.len() * 8);
    }
});
