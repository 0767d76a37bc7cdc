use std::sync::Arc;
use std::thread;

use crate::dex::{DexError, DexFile, ItemType, LoadOptions, TableKind};
use crate::tests::fixture::{sample, seal, DexBuilder};

#[test]
fn empty_tables_parse_and_reject_every_index() {
    let dex = DexFile::from_vec(DexBuilder::new().build()).expect("minimal dex");

    let expect_oor = |e: DexError, table: TableKind| {
        assert_eq!(e, DexError::IndexOutOfRange { table, index: 0, count: 0 });
    };
    expect_oor(dex.strings().get(0).unwrap_err(), TableKind::StringIds);
    expect_oor(dex.types().get(0).unwrap_err(), TableKind::TypeIds);
    expect_oor(dex.protos().get(0).unwrap_err(), TableKind::ProtoIds);
    expect_oor(dex.fields().get(0).unwrap_err(), TableKind::FieldIds);
    expect_oor(dex.methods().get(0).unwrap_err(), TableKind::MethodIds);
    expect_oor(dex.class_defs().get(0).unwrap_err(), TableKind::ClassDefs);
    assert_eq!(dex.class_summaries().count(), 0);
}

#[test]
fn corrupted_magic_fails_construction() {
    let (builder, _) = sample();
    let mut bytes = builder.build();
    bytes[0] ^= 0xFF;
    let e = DexFile::from_vec(bytes).unwrap_err();
    assert!(matches!(e, DexError::BadMagicOrVersion { .. }));
}

#[test]
fn table_overrunning_file_fails_construction() {
    let (builder, _) = sample();
    let mut bytes = builder.build();
    // class_defs_size
    bytes[96..100].copy_from_slice(&1000u32.to_le_bytes());
    let e = DexFile::from_vec(bytes).unwrap_err();
    assert!(matches!(e.kind(), DexError::OutOfBounds { .. }), "{e}");
}

#[test]
fn version_gate_is_configurable() {
    let bytes = DexBuilder::new().version(*b"037").build();
    assert_eq!(DexFile::from_bytes(&bytes).unwrap().version(), 37);

    let only_35 = LoadOptions::default().only_versions(&[35]);
    assert!(matches!(
        DexFile::with_options(bytes, &only_35),
        Err(DexError::BadMagicOrVersion { .. })
    ));
}

#[test]
fn trailing_bytes_are_not_addressable() {
    let (builder, ids) = sample();
    let mut bytes = builder.build();
    let file_size = bytes.len();
    bytes.extend_from_slice(&[0x41; 64]);

    let dex = DexFile::from_vec(bytes).unwrap();
    assert_eq!(dex.bytes().len(), file_size);
    assert_eq!(dex.string(ids.source_file).unwrap(), "Foo.java");
}

#[test]
fn lookups_are_deterministic() {
    let (builder, ids) = sample();
    let dex = DexFile::from_vec(builder.build()).unwrap();
    for _ in 0..3 {
        assert_eq!(dex.methods().get(ids.m_set).unwrap(), dex.methods().get(ids.m_set).unwrap());
        assert_eq!(dex.class_defs().get(ids.c_foo).unwrap(), dex.class_defs().get(ids.c_foo).unwrap());
    }
    let all: Vec<_> = dex.fields().iter().collect::<Result<_, _>>().unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn multibyte_string_resolves_through_table() {
    let (builder, ids) = sample();
    let dex = DexFile::from_vec(builder.build()).unwrap();
    let s = dex.string(ids.greeting).unwrap();
    assert_eq!(s, "你好");
    assert_eq!(s.chars().count(), 2);
}

#[test]
fn bad_string_does_not_poison_container() {
    let (mut builder, ids) = sample();
    let bad = builder.raw_string(vec![0x01, 0xC3, 0x28, 0x00]);
    let dex = DexFile::from_vec(builder.build()).unwrap();

    assert!(matches!(dex.string(bad), Err(DexError::MalformedEncoding { .. })));
    assert_eq!(dex.string(ids.source_file).unwrap(), "Foo.java");
    assert_eq!(dex.type_descriptor(ids.t_foo).unwrap(), "Lcom/example/Foo;");
}

#[test]
fn string_offset_at_end_of_file_is_out_of_bounds() {
    let (builder, _) = sample();
    let mut bytes = builder.build();
    let string_ids_off = u32::from_le_bytes(bytes[60..64].try_into().unwrap()) as usize;
    let end = bytes.len() as u32;
    bytes[string_ids_off..string_ids_off + 4].copy_from_slice(&end.to_le_bytes());

    let dex = DexFile::from_vec(bytes).unwrap();
    assert!(matches!(dex.string(0), Err(DexError::OutOfBounds { .. })));
    assert!(dex.string(1).is_ok());
}

#[test]
fn map_list_names_sections() {
    let (builder, _) = sample();
    let dex = DexFile::from_vec(builder.build()).unwrap();
    let map = dex.map_list().unwrap();

    assert_eq!(map.first().unwrap().item_type, ItemType::Header);
    assert_eq!(map.last().unwrap().item_type, ItemType::MapList);
    assert_eq!(map.last().unwrap().offset, dex.header().map_off);
    let protos = map.iter().find(|m| m.item_type == ItemType::ProtoId).unwrap();
    assert_eq!(protos.size, 3);
    assert_eq!(protos.offset, dex.header().proto_ids_off);
}

#[test]
fn concurrent_readers_see_identical_values() {
    let (builder, _) = sample();
    let dex = Arc::new(DexFile::from_vec(builder.build()).unwrap());
    let expected: Vec<_> = dex.class_summaries().collect::<Result<_, _>>().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let dex = Arc::clone(&dex);
            thread::spawn(move || dex.class_summaries().collect::<Result<Vec<_>, _>>().unwrap())
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

#[test]
fn lone_surrogate_string_resolves() {
    let mut builder = DexBuilder::new();
    let s = builder.raw_string(vec![0x02, b'x', 0xED, 0xA0, 0x80, 0x00]);
    let dex = DexFile::from_vec(builder.build()).unwrap();
    assert_eq!(dex.string(s).unwrap(), "x\u{FFFD}");
}

#[test]
fn sealed_file_loads_with_integrity_checks() {
    let (builder, ids) = sample();
    let mut bytes = builder.build();
    seal(&mut bytes);
    let options = LoadOptions::default().verify_checksum(true).verify_signature(true);
    let dex = DexFile::with_options(bytes, &options).unwrap();
    assert_eq!(dex.string(ids.source_file).unwrap(), "Foo.java");
}
