//! Append-only paged record storage.
//!
//! Records of a fixed size are written sequentially into fixed-capacity pages.
//! A record never straddles two pages: when the tail page cannot take another
//! record a new page is opened. Every page except the last is therefore full,
//! which makes index → `(page, offset)` a pure function of the layout.
//!
//! The store exposes append, indexed reads and removal of the last record only.
//! Keeping records ordered is the caller's job.

use crate::{StoreError, StoredMember};
use serde::{Deserialize, Serialize};

/// Layout and fill level of a page set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSetMeta {
    /// Maximum bytes per page.
    pub page_capacity: u32,
    /// Bytes per record.
    pub record_size: u32,
    /// Bytes used across all pages.
    pub total_byte_length: u64,
    /// Bytes used in each allocated page.
    pub page_byte_lengths: Vec<u32>,
}

impl PageSetMeta {
    /// Number of stored records.
    pub fn record_count(&self) -> u64 {
        self.total_byte_length / u64::from(self.record_size)
    }

    pub fn records_per_page(&self) -> u64 {
        u64::from(self.page_capacity / self.record_size)
    }

    pub fn page_count(&self) -> usize {
        self.page_byte_lengths.len()
    }

    /// Usable bytes per page (capacity rounded down to whole records).
    fn usable_page_bytes(&self) -> usize {
        (self.records_per_page() * u64::from(self.record_size)) as usize
    }

    /// Page index and intra-page byte offset of record `index`.
    pub fn locate(&self, index: u64) -> (usize, usize) {
        let per_page = self.records_per_page();
        let page = (index / per_page) as usize;
        let offset = ((index % per_page) * u64::from(self.record_size)) as usize;
        (page, offset)
    }
}

/// Paged store of fixed-size records.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PagedMemberStore {
    meta: PageSetMeta,
    pages: Vec<Vec<u8>>,
}

impl PagedMemberStore {
    /// Allocate an empty store.
    pub fn create(page_capacity: u32, record_size: u32) -> Result<Self, StoreError> {
        if record_size == 0 || page_capacity < record_size {
            return Err(StoreError::InvalidLayout {
                page_capacity,
                record_size,
            });
        }
        Ok(Self {
            meta: PageSetMeta {
                page_capacity,
                record_size,
                total_byte_length: 0,
                page_byte_lengths: Vec::new(),
            },
            pages: Vec::new(),
        })
    }

    /// A store laid out for [`StoredMember`] records.
    pub fn for_members(page_capacity: u32) -> Result<Self, StoreError> {
        Self::create(page_capacity, StoredMember::SIZE as u32)
    }

    pub fn meta(&self) -> &PageSetMeta {
        &self.meta
    }

    /// Number of stored records.
    pub fn len(&self) -> u64 {
        self.meta.record_count()
    }

    pub fn is_empty(&self) -> bool {
        self.meta.total_byte_length == 0
    }

    /// Raw bytes of page `page`, if allocated.
    pub fn page(&self, page: usize) -> Option<&[u8]> {
        self.pages.get(page).map(Vec::as_slice)
    }

    /// Check that the layout agrees with the stored pages.
    ///
    /// Run on stores decoded from untrusted bytes before any read or write.
    pub fn validate(&self) -> Result<(), StoreError> {
        let meta = &self.meta;
        if meta.record_size == 0 || meta.page_capacity < meta.record_size {
            return Err(StoreError::InvalidLayout {
                page_capacity: meta.page_capacity,
                record_size: meta.record_size,
            });
        }
        if self.pages.len() != meta.page_byte_lengths.len() {
            return Err(StoreError::CorruptLayout(format!(
                "{} pages but {} page lengths",
                self.pages.len(),
                meta.page_byte_lengths.len()
            )));
        }
        let usable = meta.usable_page_bytes();
        let last = self.pages.len().saturating_sub(1);
        let mut total = 0u64;
        for (i, (page, len)) in self.pages.iter().zip(&meta.page_byte_lengths).enumerate() {
            let len = *len as usize;
            if page.len() != len {
                return Err(StoreError::CorruptLayout(format!(
                    "page {i} holds {} bytes, recorded {len}",
                    page.len()
                )));
            }
            if len == 0 || len > usable || len % meta.record_size as usize != 0 {
                return Err(StoreError::CorruptLayout(format!(
                    "page {i} length {len} is not a whole number of records within {usable} bytes"
                )));
            }
            if i < last && len != usable {
                return Err(StoreError::CorruptLayout(format!("page {i} is not full")));
            }
            total += len as u64;
        }
        if total != meta.total_byte_length {
            return Err(StoreError::CorruptLayout(format!(
                "pages hold {total} bytes, recorded {}",
                meta.total_byte_length
            )));
        }
        Ok(())
    }

    /// Append one or more whole records. May open several pages in one call.
    pub fn append(&mut self, records: &[u8]) -> Result<(), StoreError> {
        let record_size = self.meta.record_size as usize;
        if records.len() % record_size != 0 {
            return Err(StoreError::RecordSizeMismatch {
                len: records.len(),
                record_size: self.meta.record_size,
            });
        }
        let usable = self.meta.usable_page_bytes();
        for record in records.chunks_exact(record_size) {
            let needs_page = self
                .pages
                .last()
                .map_or(true, |page| page.len() + record_size > usable);
            if needs_page {
                self.pages.push(Vec::with_capacity(usable));
                self.meta.page_byte_lengths.push(0);
            }
            let tail = self.pages.len() - 1;
            self.pages[tail].extend_from_slice(record);
            self.meta.page_byte_lengths[tail] += self.meta.record_size;
        }
        self.meta.total_byte_length += records.len() as u64;
        Ok(())
    }

    /// Raw bytes of record `index`.
    pub fn get_at(&self, index: u64) -> Result<&[u8], StoreError> {
        let len = self.len();
        if index >= len {
            return Err(StoreError::IndexOutOfBounds { index, len });
        }
        let (page, offset) = self.meta.locate(index);
        let record_size = self.meta.record_size as usize;
        Ok(&self.pages[page][offset..offset + record_size])
    }

    /// Remove the most recently appended record, releasing its page if it empties.
    pub fn truncate_last(&mut self) -> Result<(), StoreError> {
        let record_size = self.meta.record_size as usize;
        let Some(tail) = self.pages.last_mut() else {
            return Err(StoreError::Empty);
        };
        tail.truncate(tail.len() - record_size);
        let emptied = tail.is_empty();
        let last = self.meta.page_byte_lengths.len() - 1;
        self.meta.page_byte_lengths[last] -= self.meta.record_size;
        self.meta.total_byte_length -= record_size as u64;
        if emptied {
            self.pages.pop();
            self.meta.page_byte_lengths.pop();
        }
        Ok(())
    }

    /// Append members in order.
    pub fn append_members(&mut self, members: &[StoredMember]) -> Result<(), StoreError> {
        let bytes: Vec<u8> = members.iter().flat_map(|m| m.encode()).collect();
        self.append(&bytes)
    }

    /// Decode the member at `index`.
    pub fn member_at(&self, index: u64) -> Result<StoredMember, StoreError> {
        StoredMember::decode(self.get_at(index)?)
    }

    /// The last stored member, if any.
    pub fn last_member(&self) -> Result<Option<StoredMember>, StoreError> {
        match self.len() {
            0 => Ok(None),
            len => self.member_at(len - 1).map(Some),
        }
    }
}
