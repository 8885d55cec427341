#![no_main]

use caucus_store::{decode_members, PagedMemberStore, StoredMember};
use libfuzzer_sys::fuzz_target;

// Committee pages come back from indexers as raw bytes; decoding must never panic.
fuzz_target!(|data: &[u8]| {
    let _ = StoredMember::decode(data);

    // Split the input into pages at every 0xFF byte.
    let pages: Vec<&[u8]> = data.split(|b| *b == 0xFF).collect();
    let _ = decode_members(&pages);

    // Whole records appended to a small-page store read back unchanged.
    let whole = data.len() - data.len() % StoredMember::SIZE;
    if let Ok(mut store) = PagedMemberStore::for_members(24) {
        if store.append(&data[..whole]).is_ok() {
            for (i, chunk) in data[..whole].chunks_exact(StoredMember::SIZE).enumerate() {
                assert_eq!(store.get_at(i as u64).ok(), Some(chunk));
            }
            while !store.is_empty() {
                assert!(store.truncate_last().is_ok());
            }
            assert_eq!(store.meta().page_count(), 0);
        }
    }
});
