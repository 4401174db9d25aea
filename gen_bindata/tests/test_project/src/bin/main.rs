use std::io::Read;

use flate2::read::GzDecoder;

include!(concat!(env!("OUT_DIR"), "/bindata.rs"));

static BLOB: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/bindata"));

fn unpack(name: &str) -> String {
    let (offset, size) = assets::bin_data(name).unwrap_or_else(|| panic!("{name} is not in the index"));
    let compressed = &BLOB[offset as usize..(offset + size) as usize];

    let mut content = String::new();
    GzDecoder::new(compressed)
        .read_to_string(&mut content)
        .expect("asset is not valid gzip");
    content
}

fn main() {
    assert_eq!(BLOB.len() as u64, assets::BIN_DATA_SIZE);
    assert_eq!(assets::BIN_DATA.len(), 2);

    let content = unpack("/file.txt.gz");
    println!("{content}");
    assert_eq!(content, "Contents of file.txt\n");

    let other = unpack("/other.txt.gz");
    assert_eq!(other, "second asset, packed after file.txt\n");

    assert!(assets::bin_data("/missing.txt.gz").is_none());

    println!("Decompressed data matches original.");
}
