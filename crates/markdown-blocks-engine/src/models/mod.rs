pub mod block;
pub mod ids;
pub mod registry;

pub use block::{Attributes, Block, BlockType, ListKind};
pub use ids::{IdGenerator, SequentialIds, ShortIdGenerator};
pub use registry::{BlockRegistry, BlockSpec};
