//! Export of diagram graphs to text formats.

pub mod dot;
