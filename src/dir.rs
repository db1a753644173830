//! Directory enumeration. Mirrors the source's `fa_open_dir` / `fa_read_dir`
//! cluster: a container's subdirectories are yielded first (in sibling-list
//! order, which is reverse insertion order — see [`crate::toc_builder`]),
//! followed by its own files in write order.

use crate::format::{Compression, Entry, NULL_OFFSET};
use crate::info::{DirEntry, EntryKind};
use crate::toc::Toc;

pub struct DirIter<'a> {
    toc: &'a Toc,
    next_child: u32,
    entries_offset: u32,
    entries_count: u32,
    entry_pos: u32,
}

impl<'a> DirIter<'a> {
    pub(crate) fn new(toc: &'a Toc, container_offset: u32) -> Self {
        let container = toc.container(container_offset);
        DirIter {
            toc,
            next_child: container.children,
            entries_offset: container.entries_offset,
            entries_count: container.entries_count,
            entry_pos: 0,
        }
    }
}

impl<'a> Iterator for DirIter<'a> {
    type Item = DirEntry;

    fn next(&mut self) -> Option<DirEntry> {
        if self.next_child != NULL_OFFSET {
            let child = self.toc.container(self.next_child);
            let name = self.toc.name_at(child.name_offset).to_string();
            self.next_child = child.next_sibling;
            return Some(DirEntry::dir(name));
        }

        if self.entry_pos < self.entries_count {
            let offset = self.entries_offset + self.entry_pos * Entry::SIZE as u32;
            let entry = self.toc.entry(offset);
            let idx = self.toc.entry_index_of(offset);
            let hash = self.toc.hash_at_index(idx);
            self.entry_pos += 1;
            return Some(DirEntry {
                name: self.toc.name_at(entry.name_offset).to_string(),
                kind: EntryKind::File,
                compression: Compression::from_tag(entry.compression).unwrap_or(Compression::None),
                size_original: entry.size_original,
                size_compressed: entry.size_compressed,
                hash,
            });
        }

        None
    }
}
