// Static data emission: string literals and array headers

use crate::allocator::AddressAllocator;
use crate::types::STRING_HEADER;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub address: u32,
    pub bytes: Vec<u8>,
}

/// Initialized memory the module carries. Each distinct string literal is
/// stored once, length-prefixed.
#[derive(Debug, Default)]
pub struct DataSection {
    strings: HashMap<String, u32>,
    segments: Vec<Segment>,
}

impl DataSection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address of the literal `text`, claiming storage on first use.
    pub fn intern(&mut self, allocator: &mut AddressAllocator, text: &str) -> u32 {
        if let Some(&address) = self.strings.get(text) {
            return address;
        }
        let len = text.len() as u32;
        let address = allocator.claim(format!("string {:?}", text), STRING_HEADER + len);
        let mut bytes = len.to_le_bytes().to_vec();
        bytes.extend_from_slice(text.as_bytes());
        self.segments.push(Segment { address, bytes });
        self.strings.insert(text.to_string(), address);
        address
    }

    /// Write the element count of a statically placed array.
    pub fn array_header(&mut self, address: u32, count: u32) {
        self.segments.push(Segment { address, bytes: count.to_le_bytes().to_vec() });
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push_str(&format!("  (data (i32.const {}) \"{}\")\n", segment.address, escape(&segment.bytes)));
        }
        out
    }
}

/// WAT string literal body: printable ASCII verbatim, everything else as
/// `\hh`.
fn escape(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if (0x20..0x7f).contains(&b) && b != b'"' && b != b'\\' {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("\\{:02x}", b));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_are_deduplicated() {
        let mut alloc = AddressAllocator::new(1024);
        let mut data = DataSection::new();
        let a = data.intern(&mut alloc, "hi");
        let b = data.intern(&mut alloc, "there");
        let c = data.intern(&mut alloc, "hi");
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(data.segments().len(), 2);
        assert_eq!(alloc.allocations().len(), 2);
    }

    #[test]
    fn string_segment_is_length_prefixed() {
        let mut alloc = AddressAllocator::new(1024);
        let mut data = DataSection::new();
        data.intern(&mut alloc, "a\"b\n");
        assert_eq!(data.render(), "  (data (i32.const 1024) \"\\04\\00\\00\\00a\\22b\\0a\")\n");
    }

    #[test]
    fn array_header_segment() {
        let mut data = DataSection::new();
        data.array_header(2048, 10);
        assert_eq!(data.segments()[0].bytes, vec![10, 0, 0, 0]);
    }
}
