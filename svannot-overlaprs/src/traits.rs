use num_traits::{PrimInt, Unsigned};

pub use svannot_core::models::Interval;

/// Common interface of the overlap data structures. Query coordinates are closed:
/// `find(start, end)` returns every stored interval sharing at least one base with
/// `[start, end]`.
pub trait Overlapper<I, T>: Send + Sync
where
    I: PrimInt + Unsigned + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(intervals: Vec<Interval<I, T>>) -> Self
    where
        Self: Sized;

    fn find(&self, start: I, end: I) -> Vec<Interval<I, T>>;

    fn find_iter<'a>(
        &'a self,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a>;
}
