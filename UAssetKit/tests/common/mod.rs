//! Synthetic compact-layout package builder for integration tests

use byteorder::{LittleEndian, WriteBytesExt};

/// A name written either as 8-bit or UTF-16 text.
pub enum Name<'a> {
    Narrow(&'a str),
    Wide(&'a str),
}

fn write_name(out: &mut Vec<u8>, name: &Name<'_>) {
    match name {
        Name::Narrow(text) => {
            out.write_i32::<LittleEndian>(text.len() as i32 + 1).unwrap();
            out.extend_from_slice(text.as_bytes());
            out.push(0);
        }
        Name::Wide(text) => {
            let units: Vec<u16> = text.encode_utf16().chain(std::iter::once(0)).collect();
            out.write_i32::<LittleEndian>(-(units.len() as i32)).unwrap();
            for unit in units {
                out.write_u16::<LittleEndian>(unit).unwrap();
            }
        }
    }
    out.write_u32::<LittleEndian>(0x1234_5678).unwrap();
}

fn fstring(out: &mut Vec<u8>, text: &str) {
    out.write_i32::<LittleEndian>(text.len() as i32 + 1).unwrap();
    out.extend_from_slice(text.as_bytes());
    out.push(0);
}

/// Build a header file: summary, names, imports, one export, a trailer.
///
/// Imports are `[class_package, class_name, object_name]` name indices.
pub fn build_asset(names: &[Name<'_>], imports: &[[i32; 3]]) -> Vec<u8> {
    let summary_len = summary(&[0; 9], 0, 0).len();

    let mut body = Vec::new();
    for name in names {
        write_name(&mut body, name);
    }
    let import_offset = summary_len + body.len();
    for [package, class, object] in imports {
        body.write_i64::<LittleEndian>(i64::from(*package)).unwrap();
        body.write_i64::<LittleEndian>(i64::from(*class)).unwrap();
        body.write_i32::<LittleEndian>(0).unwrap();
        body.write_i32::<LittleEndian>(*object).unwrap();
        body.write_i32::<LittleEndian>(0).unwrap();
    }
    let export_offset = summary_len + body.len();
    // One export record named by index 0
    body.extend([0u8; 104]);
    let depends_offset = summary_len + body.len();
    body.extend([0u8; 4]);
    let thumbnail_offset = summary_len + body.len();
    body.extend([0u8; 4]);
    let registry_offset = summary_len + body.len();
    body.extend([0u8; 4]);
    let total = summary_len + body.len();

    let offsets = [
        total,
        summary_len,
        export_offset,
        import_offset,
        depends_offset,
        thumbnail_offset,
        thumbnail_offset,
        registry_offset,
        total,
    ]
    .map(|v| v as i64);
    let mut out = summary(&offsets, names.len(), imports.len());
    out.extend(body);
    out
}

/// `offsets`: total size, names, exports, imports, depends, soft refs,
/// thumbnails, asset registry, bulk data start.
fn summary(offsets: &[i64; 9], name_count: usize, import_count: usize) -> Vec<u8> {
    let [total, names, exports, imports, depends, soft_refs, thumbnails, registry, bulk] = *offsets;
    let mut out = Vec::new();
    let w = &mut out;
    w.write_u32::<LittleEndian>(0x9E2A_83C1).unwrap();
    w.write_i32::<LittleEndian>(-7).unwrap();
    w.write_i32::<LittleEndian>(864).unwrap();
    w.write_i32::<LittleEndian>(0).unwrap();
    w.write_i32::<LittleEndian>(0).unwrap();
    w.write_i32::<LittleEndian>(0).unwrap();
    w.write_i32::<LittleEndian>(total as i32).unwrap();
    fstring(w, "None");
    w.write_u32::<LittleEndian>(0).unwrap();
    w.write_i32::<LittleEndian>(name_count as i32).unwrap();
    w.write_i32::<LittleEndian>(names as i32).unwrap();
    w.write_i32::<LittleEndian>(1).unwrap();
    w.write_i32::<LittleEndian>(exports as i32).unwrap();
    w.write_i32::<LittleEndian>(import_count as i32).unwrap();
    w.write_i32::<LittleEndian>(imports as i32).unwrap();
    w.write_i32::<LittleEndian>(depends as i32).unwrap();
    w.write_i32::<LittleEndian>(0).unwrap();
    w.write_i32::<LittleEndian>(soft_refs as i32).unwrap();
    w.write_i32::<LittleEndian>(0).unwrap();
    w.write_i32::<LittleEndian>(thumbnails as i32).unwrap();
    w.extend_from_slice(&[0u8; 16]);
    w.write_i32::<LittleEndian>(0).unwrap();
    for _ in 0..2 {
        w.extend_from_slice(&[4, 0, 22, 0, 0, 0, 0, 0, 0, 0]);
        fstring(w, "");
    }
    w.write_u32::<LittleEndian>(0).unwrap();
    w.write_i32::<LittleEndian>(0).unwrap();
    w.write_u32::<LittleEndian>(0).unwrap();
    w.write_i32::<LittleEndian>(0).unwrap();
    w.write_i32::<LittleEndian>(registry as i32).unwrap();
    w.write_i64::<LittleEndian>(bulk).unwrap();
    w.write_i32::<LittleEndian>(0).unwrap();
    w.write_i32::<LittleEndian>(0).unwrap();
    w.write_i32::<LittleEndian>(0).unwrap();
    w.write_i32::<LittleEndian>(0).unwrap();
    out
}
