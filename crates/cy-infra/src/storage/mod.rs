mod file_kv;
mod memory;

pub use file_kv::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
