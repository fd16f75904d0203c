//! Synthetic package builder for unit tests

use byteorder::{LittleEndian, WriteBytesExt};

use super::PACKAGE_FILE_TAG;
use super::codec;
use super::exports::EXPORT_SCAN_STRIDE;
use super::names::NameEntry;

#[derive(Debug, Default, Clone, Copy)]
struct Offsets {
    total_header_size: i32,
    name_offset: i32,
    gatherable_offset: i32,
    export_offset: i32,
    import_offset: i32,
    depends_offset: i32,
    soft_refs_offset: i32,
    thumbnail_offset: i32,
    asset_registry_offset: i32,
    bulk_data_start: i64,
    preload_offset: i32,
}

/// Builds a self-consistent header file:
/// summary, names, imports, exports, depends map, thumbnails, asset registry.
#[derive(Debug, Clone)]
pub(crate) struct AssetFixture {
    version: i32,
    names: Vec<String>,
    imports: Vec<[i32; 4]>,
    exports: Vec<i32>,
    payload_len: usize,
}

impl AssetFixture {
    pub(crate) fn new(names: &[&str]) -> Self {
        Self {
            version: 0,
            names: names.iter().map(ToString::to_string).collect(),
            imports: Vec::new(),
            exports: Vec::new(),
            payload_len: 0,
        }
    }

    pub(crate) fn version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }

    /// Add an import `[class_package, class_name, outer, object_name]`.
    pub(crate) fn import(mut self, fields: [i32; 4]) -> Self {
        self.imports.push(fields);
        self
    }

    /// Add an export whose object name is `object_name`.
    pub(crate) fn export(mut self, object_name: i32) -> Self {
        self.exports.push(object_name);
        self
    }

    pub(crate) fn payload_len(mut self, len: usize) -> Self {
        self.payload_len = len;
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let summary_len = self.summary(&Offsets::default()).len();

        let mut body = Vec::new();
        let name_offset = summary_len;
        for name in &self.names {
            body.extend(name_bytes(name));
        }
        let import_offset = summary_len + body.len();
        for [package, class, outer, object] in &self.imports {
            body.write_i64::<LittleEndian>(i64::from(*package)).unwrap();
            body.write_i64::<LittleEndian>(i64::from(*class)).unwrap();
            body.write_i32::<LittleEndian>(*outer).unwrap();
            body.write_i32::<LittleEndian>(*object).unwrap();
            body.write_i32::<LittleEndian>(0).unwrap();
        }
        let export_offset = summary_len + body.len();
        let export_data_len = self.exports.len() * EXPORT_SCAN_STRIDE;
        let depends_offset = export_offset + export_data_len;
        let depends_len = self.exports.len() * 4;
        let thumbnail_offset = depends_offset + depends_len;
        let asset_registry_offset = thumbnail_offset + 4;
        let total = asset_registry_offset + 4;

        let mut serial_offset = total as i64;
        for object_name in &self.exports {
            let mut record = vec![0u8; EXPORT_SCAN_STRIDE];
            codec::write_i32(&mut record, 0, -1).unwrap();
            codec::write_i32(&mut record, 16, *object_name).unwrap();
            codec::write_i64(&mut record, 24, 16).unwrap();
            codec::write_i64(&mut record, 32, serial_offset).unwrap();
            serial_offset += 16;
            body.extend(record);
        }
        body.extend(vec![0u8; depends_len]);
        // Thumbnail count, asset registry object count
        body.write_i32::<LittleEndian>(0).unwrap();
        body.write_i32::<LittleEndian>(0).unwrap();

        let offsets = Offsets {
            total_header_size: total as i32,
            name_offset: name_offset as i32,
            gatherable_offset: import_offset as i32,
            export_offset: export_offset as i32,
            import_offset: import_offset as i32,
            depends_offset: depends_offset as i32,
            soft_refs_offset: thumbnail_offset as i32,
            thumbnail_offset: thumbnail_offset as i32,
            asset_registry_offset: asset_registry_offset as i32,
            bulk_data_start: (total + self.payload_len) as i64,
            preload_offset: total as i32,
        };

        let mut out = self.summary(&offsets);
        assert_eq!(out.len(), summary_len);
        out.extend(body);
        assert_eq!(out.len(), total);
        out
    }

    fn summary(&self, o: &Offsets) -> Vec<u8> {
        let mut out = Vec::new();
        let w = &mut out;
        w.write_u32::<LittleEndian>(PACKAGE_FILE_TAG).unwrap();
        w.write_i32::<LittleEndian>(-7).unwrap();
        w.write_i32::<LittleEndian>(864).unwrap();
        w.write_i32::<LittleEndian>(self.version).unwrap();
        w.write_i32::<LittleEndian>(0).unwrap();
        // Custom versions
        w.write_i32::<LittleEndian>(0).unwrap();
        w.write_i32::<LittleEndian>(o.total_header_size).unwrap();
        codec::write_fstring(w, "None").unwrap();
        w.write_u32::<LittleEndian>(0x8000_0000).unwrap();
        w.write_i32::<LittleEndian>(self.names.len() as i32).unwrap();
        w.write_i32::<LittleEndian>(o.name_offset).unwrap();
        if self.version >= 459 {
            w.write_i32::<LittleEndian>(0).unwrap();
            w.write_i32::<LittleEndian>(o.gatherable_offset).unwrap();
        }
        w.write_i32::<LittleEndian>(self.exports.len() as i32).unwrap();
        w.write_i32::<LittleEndian>(o.export_offset).unwrap();
        w.write_i32::<LittleEndian>(self.imports.len() as i32).unwrap();
        w.write_i32::<LittleEndian>(o.import_offset).unwrap();
        w.write_i32::<LittleEndian>(o.depends_offset).unwrap();
        // Soft package references
        w.write_i32::<LittleEndian>(0).unwrap();
        w.write_i32::<LittleEndian>(o.soft_refs_offset).unwrap();
        // Searchable names: absent
        w.write_i32::<LittleEndian>(0).unwrap();
        w.write_i32::<LittleEndian>(o.thumbnail_offset).unwrap();
        w.extend_from_slice(&[0x5A; 16]);
        // One generation
        w.write_i32::<LittleEndian>(1).unwrap();
        w.write_i32::<LittleEndian>(self.exports.len() as i32).unwrap();
        w.write_i32::<LittleEndian>(self.names.len() as i32).unwrap();
        for _ in 0..2 {
            w.write_u16::<LittleEndian>(4).unwrap();
            w.write_u16::<LittleEndian>(22).unwrap();
            w.write_u16::<LittleEndian>(0).unwrap();
            w.write_u32::<LittleEndian>(0).unwrap();
            codec::write_fstring(w, "++UE4+Release-4.22").unwrap();
        }
        // Compression flags, compressed chunks, package source
        w.write_u32::<LittleEndian>(0).unwrap();
        w.write_i32::<LittleEndian>(0).unwrap();
        w.write_u32::<LittleEndian>(0x1234_5678).unwrap();
        // Additional packages to cook
        w.write_i32::<LittleEndian>(0).unwrap();
        w.write_i32::<LittleEndian>(o.asset_registry_offset).unwrap();
        w.write_i64::<LittleEndian>(o.bulk_data_start).unwrap();
        // World tile info: absent
        w.write_i32::<LittleEndian>(0).unwrap();
        // Chunk ids
        w.write_i32::<LittleEndian>(0).unwrap();
        w.write_i32::<LittleEndian>(0).unwrap();
        w.write_i32::<LittleEndian>(o.preload_offset).unwrap();
        out
    }
}

fn name_bytes(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    codec::write_fstring(&mut out, name).unwrap();
    out.write_u32::<LittleEndian>(NameEntry::new(name).unwrap().hash()).unwrap();
    out
}
