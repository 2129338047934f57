//! Threading a value through a series of stages.

/// Pass the value through every stage, left to right, returning what the
/// last stage returns. Without stages the value comes back as is.
///
/// ```
/// use toru_dash::pipeline;
///
/// let stages: [fn(i32) -> i32; 2] = [|n| n + 1, |n| n * 10];
/// assert_eq!(pipeline::through(1, stages), 20);
/// ```
pub fn through<T, I, F>(passable: T, stages: I) -> T
where
    I: IntoIterator<Item = F>,
    F: FnOnce(T) -> T,
{
    stages.into_iter().fold(passable, |passable, stage| stage(passable))
}

/// Pass the value through every fallible stage, left to right, stopping at
/// the first error.
///
/// Stages after a failing one are not invoked. This is how
/// [`partial`](crate::partial) stages are chained.
pub fn try_through<T, E, I, F>(passable: T, stages: I) -> Result<T, E>
where
    I: IntoIterator<Item = F>,
    F: FnOnce(T) -> Result<T, E>,
{
    stages
        .into_iter()
        .try_fold(passable, |passable, stage| stage(passable))
}
