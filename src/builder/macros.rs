//! Macros for writing vote maps inline.

/// Build a [`StateUpdate`](crate::core::StateUpdate) carrying the listed
/// entity votes, in the order written.
///
/// Each entry is `name => (dem, rep, toss)`.
///
/// # Example
///
/// ```
/// use ecmap_status::core::VoteCount;
/// use ecmap_status::state_votes;
///
/// let update = state_votes! {
///     "Ohio" => (0, 18, 0),
///     "Maine" => (3, 0, 1),
/// }
/// .year(2012);
///
/// assert_eq!(update.entity_names(), vec!["Ohio", "Maine"]);
/// assert_eq!(update.state_votes().unwrap()[1].1, VoteCount::new(3, 0, 1));
/// ```
#[macro_export]
macro_rules! state_votes {
    () => {
        $crate::core::StateUpdate::new().all_votes(::std::vec::Vec::<(
            ::std::string::String,
            $crate::core::VoteCount,
        )>::new())
    };
    ($($name:expr => ($dem:expr, $rep:expr, $toss:expr)),+ $(,)?) => {
        $crate::core::StateUpdate::new().all_votes(::std::vec![
            $((
                ::std::string::String::from($name),
                $crate::core::VoteCount::new($dem, $rep, $toss),
            )),+
        ])
    };
}
