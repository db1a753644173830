//! In-memory view over a parsed table of contents.
//!
//! The TOC is kept as the raw decompressed byte block plus the parsed
//! [`Header`]; containers, entries, hashes and names are all read lazily by
//! offset out of that block rather than copied into owned Rust structures.
//! This mirrors the source's approach of retaining the TOC as one
//! contiguous allocation and computing child pointers on the fly.

use crate::error::{FarcError, Result};
use crate::format::{Container, Entry, Hash, Header, HEADER_COOKIE, HEADER_ON_DISK_SIZE, NULL_OFFSET};

pub struct Toc {
    bytes: Vec<u8>,
    header: Header,
}

impl Toc {
    /// Parses a freshly decompressed TOC block. Verifies the header cookie
    /// and version but not the digest — digest verification happens once,
    /// over the whole decompressed block, by the archive reader.
    pub fn parse(bytes: Vec<u8>) -> Result<Toc> {
        if bytes.len() < HEADER_ON_DISK_SIZE {
            return Err(FarcError::Format("TOC shorter than header".into()));
        }
        let (cookie, version, header) =
            Header::read(&bytes).ok_or_else(|| FarcError::Format("TOC header truncated".into()))?;
        if cookie != HEADER_COOKIE {
            return Err(FarcError::Format("TOC header cookie mismatch".into()));
        }
        if version != crate::format::FORMAT_VERSION {
            return Err(FarcError::Format(format!("unsupported TOC version {version}")));
        }
        let toc = Toc { bytes, header };
        toc.validate_offsets()?;
        Ok(toc)
    }

    fn validate_offsets(&self) -> Result<()> {
        let len = self.bytes.len() as u32;
        let check = |offset: u32| -> Result<()> {
            if offset != NULL_OFFSET && offset >= len {
                return Err(FarcError::Format("offset outside TOC bounds".into()));
            }
            Ok(())
        };
        check(self.header.containers_offset)?;
        check(self.header.entries_offset)?;
        check(self.header.hashes_offset)?;
        Ok(())
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn root_offset(&self) -> u32 {
        self.header.containers_offset
    }

    pub fn container(&self, offset: u32) -> Container {
        let start = offset as usize;
        Container::read(&self.bytes[start..start + Container::SIZE])
    }

    pub fn container_count(&self) -> u32 {
        self.header.containers_count
    }

    pub fn entry(&self, offset: u32) -> Entry {
        let start = offset as usize;
        Entry::read(&self.bytes[start..start + Entry::SIZE])
    }

    pub fn entry_index_of(&self, entry_offset: u32) -> u32 {
        (entry_offset - self.header.entries_offset) / Entry::SIZE as u32
    }

    pub fn entry_at_index(&self, index: u32) -> Entry {
        self.entry(self.header.entries_offset + index * Entry::SIZE as u32)
    }

    pub fn hash_at_index(&self, index: u32) -> Hash {
        let start = (self.header.hashes_offset + index * 20) as usize;
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&self.bytes[start..start + 20]);
        hash
    }

    /// Reads a NUL-terminated name at `offset`, or `""` for [`NULL_OFFSET`].
    pub fn name_at(&self, offset: u32) -> &str {
        if offset == NULL_OFFSET {
            return "";
        }
        let start = offset as usize;
        let end = self.bytes[start..]
            .iter()
            .position(|&b| b == 0)
            .map(|p| start + p)
            .unwrap_or(self.bytes.len());
        std::str::from_utf8(&self.bytes[start..end]).unwrap_or("")
    }

    /// Resolves a `/`-separated directory path to a container offset,
    /// descending by exact child-name match. The empty path resolves to
    /// the root. Returns `None` if any segment fails to resolve.
    pub fn find_container(&self, segments: &[&str]) -> Option<u32> {
        let mut current = self.root_offset();
        'seg: for seg in segments {
            let container = self.container(current);
            let mut child = container.children;
            while child != NULL_OFFSET {
                let candidate = self.container(child);
                if self.name_at(candidate.name_offset) == *seg {
                    current = child;
                    continue 'seg;
                }
                child = candidate.next_sibling;
            }
            return None;
        }
        Some(current)
    }

    /// Linear scan of a container's owned entry run for an exact name
    /// match. Returns the entry's absolute index into the global entry
    /// array.
    ///
    /// When the same name was written more than once (duplicate-path
    /// writes are permitted, see [`crate::toc_builder`]), the *last*
    /// matching entry in the run wins — a container's run preserves write
    /// order, so this surfaces the most recently written physical entry,
    /// leaving earlier ones reachable only through [`Toc::find_by_hash`].
    pub fn find_entry(&self, container_offset: u32, name: &str) -> Option<u32> {
        let container = self.container(container_offset);
        let mut found = None;
        for i in 0..container.entries_count {
            let offset = container.entries_offset + i * Entry::SIZE as u32;
            let entry = self.entry(offset);
            if self.name_at(entry.name_offset) == name {
                found = Some(self.entry_index_of(offset));
            }
        }
        found
    }

    /// Linear scan of the hash array for an exact 20-byte match. No
    /// ordering requirement, matching the source.
    pub fn find_by_hash(&self, hash: &Hash) -> Option<u32> {
        for i in 0..self.header.entries_count {
            if self.hash_at_index(i) == *hash {
                return Some(i);
            }
        }
        None
    }

    pub fn raw(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc_builder::{build_toc, WriterEntry};
    use crate::format::Compression;

    fn sample_toc() -> Toc {
        let entries = vec![WriterEntry {
            path: "a/b/c.txt".to_string(),
            data_offset: 0,
            compression: Compression::None,
            size_original: 5,
            size_compressed: 5,
            hash: [0u8; 20],
        }];
        let (built, _) = build_toc(&entries);
        Toc::parse(built).unwrap()
    }

    #[test]
    fn find_container_descends_nested_path() {
        let toc = sample_toc();
        let container_offset = toc.find_container(&["a", "b"]).unwrap();
        let container = toc.container(container_offset);
        assert_eq!(toc.name_at(container.name_offset), "b");
    }

    #[test]
    fn find_entry_locates_file_in_container() {
        let toc = sample_toc();
        let container_offset = toc.find_container(&["a", "b"]).unwrap();
        let idx = toc.find_entry(container_offset, "c.txt").unwrap();
        let entry = toc.entry_at_index(idx);
        assert_eq!(entry.size_original, 5);
    }

    #[test]
    fn missing_segment_returns_none() {
        let toc = sample_toc();
        assert!(toc.find_container(&["a", "missing"]).is_none());
    }
}
