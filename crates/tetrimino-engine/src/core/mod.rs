pub use self::{catalog::*, geometry::*, grid::*, piece::*};

mod catalog;
mod geometry;
mod grid;
mod piece;
