pub mod interval;
pub mod region;
pub mod segment;

// re-export for cleaner imports
pub use self::interval::Interval;
pub use self::region::Region;
pub use self::segment::{AlignmentSegment, Strand};
