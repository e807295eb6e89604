/// Scripted prefetchers.
pub mod prefetcher;
