// Attribute system
//
// Depletable / regenerating numeric resources (health, mana, stamina) and the
// per-character set that owns them. Changes are reported as a batch of
// `AttributeEvent`s pushed into a caller-provided buffer.

pub mod attribute;
pub mod set;

pub use attribute::{Attribute, AttributeEvent, AttributeKind, AttributeTemplate};
pub use set::{AttributeSet, HEALTH, MANA, STAMINA};
