/// One static block handed out by the allocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub label: String,
    pub address: u32,
    pub size: u32,
}

/// Bump allocator for the static data area. Addresses only ever grow and
/// nothing is released: every block lives as long as the module.
#[derive(Debug)]
pub struct AddressAllocator {
    base: u32,
    next: u32,
    allocations: Vec<Allocation>,
}

/// Every block starts on an 8-byte boundary so `f64` elements are aligned.
const ALIGN: u32 = 8;

/// Blocks that would end past this address are left to the run-time heap.
pub const STATIC_LIMIT: u32 = 1 << 24;

impl AddressAllocator {
    pub fn new(base: u32) -> Self {
        let base = base.next_multiple_of(ALIGN);
        Self { base, next: base, allocations: Vec::new() }
    }

    /// Reserve `size` bytes and return the block's address.
    pub fn claim(&mut self, label: impl Into<String>, size: u32) -> u32 {
        let address = self.next;
        let label = label.into();
        tracing::debug!(%label, address, size, "static claim");
        self.next = address.saturating_add(size).checked_next_multiple_of(ALIGN).unwrap_or(u32::MAX);
        self.allocations.push(Allocation { label, address, size });
        address
    }

    /// Reserve `size` bytes only if the block ends within [`STATIC_LIMIT`].
    pub fn try_claim(&mut self, label: impl Into<String>, size: u32) -> Option<u32> {
        let end = self.next.checked_add(size)?;
        if end > STATIC_LIMIT {
            tracing::debug!(size, "static claim refused");
            return None;
        }
        Some(self.claim(label, size))
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    /// First address past all static data; the run-time heap starts here.
    pub fn end(&self) -> u32 {
        self.next
    }

    /// Every claim, in the order it was made.
    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_are_sequential_and_aligned() {
        let mut alloc = AddressAllocator::new(1024);
        assert_eq!(alloc.claim("a", 5), 1024);
        assert_eq!(alloc.claim("b", 8), 1032);
        assert_eq!(alloc.claim("c", 1), 1040);
        assert_eq!(alloc.end(), 1048);
        let labels: Vec<_> = alloc.allocations().iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn base_is_rounded_up() {
        let alloc = AddressAllocator::new(1001);
        assert_eq!(alloc.base(), 1008);
        assert_eq!(alloc.end(), 1008);
    }

    #[test]
    fn oversized_claim_is_refused() {
        let mut alloc = AddressAllocator::new(1024);
        assert_eq!(alloc.try_claim("huge", u32::MAX), None);
        assert_eq!(alloc.try_claim("too big", STATIC_LIMIT), None);
        assert!(alloc.allocations().is_empty());
        assert_eq!(alloc.try_claim("fits", 16), Some(1024));
        assert_eq!(alloc.end(), 1040);
    }

    #[test]
    fn empty_claim_does_not_move() {
        let mut alloc = AddressAllocator::new(64);
        assert_eq!(alloc.claim("nothing", 0), 64);
        assert_eq!(alloc.claim("next", 4), 64);
    }
}
