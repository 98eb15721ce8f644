pub mod entity;
pub mod po_line;

pub use entity::Entity;
pub use po_line::PoLine;
