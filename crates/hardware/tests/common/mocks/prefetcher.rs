use cachesim_core::prefetch::Prefetcher;

/// Requests the next `degree` sequential blocks after every miss.
#[derive(Debug)]
pub struct SequentialPrefetcher {
    pub block_size: u32,
    pub degree: u32,
}

impl Prefetcher for SequentialPrefetcher {
    fn observe(&mut self, block_addr: u32, hit: bool) -> Vec<u32> {
        if hit {
            return Vec::new();
        }
        (1..=self.degree)
            .map(|i| block_addr.wrapping_add(i * self.block_size))
            .collect()
    }
}

/// Requests the same addresses after every access, hit or miss.
#[derive(Debug)]
pub struct FixedPrefetcher(pub Vec<u32>);

impl Prefetcher for FixedPrefetcher {
    fn observe(&mut self, _block_addr: u32, _hit: bool) -> Vec<u32> {
        self.0.clone()
    }
}
