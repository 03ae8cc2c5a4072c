pub mod buffer;
pub mod factory;

pub use buffer::BufferMemory;
pub use factory::create_memory;
