pub mod item;
pub mod item_type;
pub mod naming;

pub use item::{ItemRecord, DEFAULT_MAX_STACK_SIZE, DEFAULT_VALUE, PLAIN_TIMESTAMP_FORMAT};

pub use item_type::{ItemRarity, SourceTag};

pub use naming::{derived_display_name, fallback_display_name, qualified_id, title_case};
