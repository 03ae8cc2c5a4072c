use crate::memory::BufferMemory;
use crate::traits::Memory;
use std::sync::Arc;

pub fn create_memory() -> Arc<dyn Memory> {
    Arc::new(BufferMemory::new())
}
