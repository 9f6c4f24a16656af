// Typed façades over the dispatcher, one per resource family.

pub mod catalog;
pub mod goods;
