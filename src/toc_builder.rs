//! TOC builder: turns the writer's flat list of entries into the container
//! tree, entry table, hash table and string pool that make up the
//! uncompressed TOC block.
//!
//! This is the Rust shape of the source's `writeToc`, split into the four
//! steps that function performs in one long loop: (1) grow the container
//! tree path by path, (2) group entries under their resolved container,
//! (3) lay out the string pool, (4) relocate every intra-structure offset
//! to be TOC-absolute.

use byteorder::{ByteOrder, LittleEndian};

use crate::format::{Compression, Container, Entry, Hash, Header, HEADER_ON_DISK_SIZE, MAX_BLOCK_SIZE, NULL_OFFSET};
use crate::path::split_segments;

/// One file recorded by the writer, ready to be folded into a TOC.
#[derive(Debug, Clone)]
pub struct WriterEntry {
    pub path: String,
    pub data_offset: u32,
    pub compression: Compression,
    pub size_original: u32,
    pub size_compressed: u32,
    pub hash: Hash,
}

struct ContainerBuilder {
    parent: Option<usize>,
    children: Option<usize>,
    next_sibling: Option<usize>,
    name: String,
}

/// Builds the uncompressed TOC byte block for `entries`. Entries are
/// assumed already path-normalized (see [`crate::path::normalize`]).
///
/// Opening two writer entries with the same path is permitted upstream;
/// this function does not deduplicate — both show up in the entry table,
/// appended in write order within their container's run. A path-based
/// lookup scans the whole run and keeps the last match (see
/// [`crate::toc::Toc::find_entry`]), so only the most recently written of
/// the two is reachable by path. Hash lookup still reaches both.
pub fn build_toc(entries: &[WriterEntry]) -> (Vec<u8>, Header) {
    let mut containers = vec![ContainerBuilder {
        parent: None,
        children: None,
        next_sibling: None,
        name: String::new(),
    }];

    let mut entry_container = vec![0usize; entries.len()];
    let mut entry_name = Vec::with_capacity(entries.len());

    for (i, entry) in entries.iter().enumerate() {
        let (dirs, name) = split_segments(&entry.path);
        entry_name.push(name.to_string());

        let mut current = 0usize;
        for seg in dirs {
            let mut found = None;
            let mut cursor = containers[current].children;
            while let Some(c) = cursor {
                if containers[c].name == seg {
                    found = Some(c);
                    break;
                }
                cursor = containers[c].next_sibling;
            }
            current = found.unwrap_or_else(|| {
                let new_idx = containers.len();
                let old_children = containers[current].children;
                containers.push(ContainerBuilder {
                    parent: Some(current),
                    children: None,
                    next_sibling: old_children,
                    name: seg.to_string(),
                });
                containers[current].children = Some(new_idx);
                new_idx
            });
        }
        entry_container[i] = current;
    }

    // Group entries by container, containers visited in index order so that
    // each container's run is contiguous in the final entry array.
    let mut final_order: Vec<usize> = Vec::with_capacity(entries.len());
    let mut container_entries_offset: Vec<Option<u32>> = vec![None; containers.len()];
    let mut container_entries_count: Vec<u32> = vec![0; containers.len()];

    for cidx in 0..containers.len() {
        let start = final_order.len();
        for (i, &c) in entry_container.iter().enumerate() {
            if c == cidx {
                final_order.push(i);
            }
        }
        let count = (final_order.len() - start) as u32;
        if count > 0 {
            container_entries_offset[cidx] = Some((start * Entry::SIZE) as u32);
        }
        container_entries_count[cidx] = count;
    }

    // String pool: container names (root excluded) then entry names, in
    // that layout order — matches the relocation formula in §4.6 step 5,
    // which places the pool after the hash array regardless of which
    // names were written first.
    let mut string_pool: Vec<u8> = Vec::new();
    let mut container_name_offset = vec![NULL_OFFSET; containers.len()];
    for (idx, c) in containers.iter().enumerate().skip(1) {
        let offset = string_pool.len() as u32;
        string_pool.extend_from_slice(c.name.as_bytes());
        string_pool.push(0);
        container_name_offset[idx] = offset;
    }

    let mut entry_name_offset = vec![NULL_OFFSET; final_order.len()];
    for (slot, &orig_idx) in final_order.iter().enumerate() {
        let name = &entry_name[orig_idx];
        if name.is_empty() {
            continue;
        }
        let offset = string_pool.len() as u32;
        string_pool.extend_from_slice(name.as_bytes());
        string_pool.push(0);
        entry_name_offset[slot] = offset;
    }

    let containers_len = containers.len() as u32;
    let entries_len = final_order.len() as u32;
    let header_size = HEADER_ON_DISK_SIZE as u32;
    let containers_offset = header_size;
    let entries_offset = containers_offset + containers_len * Container::SIZE as u32;
    let hashes_offset = entries_offset + entries_len * Entry::SIZE as u32;
    let strings_offset = hashes_offset + entries_len * 20;
    let total_size = strings_offset + string_pool.len() as u32;

    let relocate_container = |idx: Option<usize>| -> u32 {
        idx.map(|i| containers_offset + (i * Container::SIZE) as u32)
            .unwrap_or(NULL_OFFSET)
    };

    let out_containers: Vec<Container> = containers
        .iter()
        .enumerate()
        .map(|(idx, c)| {
            let name_offset = if container_name_offset[idx] == NULL_OFFSET {
                NULL_OFFSET
            } else {
                container_name_offset[idx] + strings_offset
            };
            let (entries_off, entries_cnt) = match container_entries_offset[idx] {
                Some(pre) => (pre + entries_offset, container_entries_count[idx]),
                None => (NULL_OFFSET, 0),
            };
            Container {
                parent: relocate_container(c.parent),
                children: relocate_container(c.children),
                next_sibling: relocate_container(c.next_sibling),
                name_offset,
                entries_offset: entries_off,
                entries_count: entries_cnt,
            }
        })
        .collect();

    let out_entries: Vec<Entry> = final_order
        .iter()
        .enumerate()
        .map(|(slot, &orig_idx)| {
            let entry = &entries[orig_idx];
            let name_offset = if entry_name_offset[slot] == NULL_OFFSET {
                NULL_OFFSET
            } else {
                entry_name_offset[slot] + strings_offset
            };
            Entry {
                data_offset: entry.data_offset,
                name_offset,
                compression: entry.compression.to_tag(),
                block_size: MAX_BLOCK_SIZE as u32,
                size_original: entry.size_original,
                size_compressed: entry.size_compressed,
            }
        })
        .collect();

    let out_hashes: Vec<Hash> = final_order.iter().map(|&orig_idx| entries[orig_idx].hash).collect();

    let header = Header {
        size: total_size,
        flags: 0,
        containers_offset,
        containers_count: containers_len,
        entries_offset,
        entries_count: entries_len,
        hashes_offset,
    };

    let mut bytes = vec![0u8; total_size as usize];
    let mut hdr_buf = vec![0u8; Header::SIZE];
    header.write(&mut hdr_buf);
    bytes[0..Header::SIZE].copy_from_slice(&hdr_buf);
    LittleEndian::write_u32(&mut bytes[Header::SIZE..Header::SIZE + 4], header.hashes_offset);

    for (i, c) in out_containers.iter().enumerate() {
        let start = containers_offset as usize + i * Container::SIZE;
        c.write(&mut bytes[start..start + Container::SIZE]);
    }
    for (i, e) in out_entries.iter().enumerate() {
        let start = entries_offset as usize + i * Entry::SIZE;
        e.write(&mut bytes[start..start + Entry::SIZE]);
    }
    for (i, h) in out_hashes.iter().enumerate() {
        let start = hashes_offset as usize + i * 20;
        bytes[start..start + 20].copy_from_slice(h);
    }
    bytes[strings_offset as usize..].copy_from_slice(&string_pool);

    (bytes, header)
}
