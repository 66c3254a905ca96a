/// Adds a reaction to a network using `species => coefficient` lists.
///
/// Expands to [`ReactionNetwork::add_reaction`](crate::network::ReactionNetwork::add_reaction)
/// and evaluates to its result.
///
/// ```
/// use rxnet::{network::ReactionNetwork, reaction};
///
/// let mut network = ReactionNetwork::new();
/// network.add_species("A").unwrap();
/// network.add_species("B").unwrap();
///
/// reaction!(network, 2.0, ["A" => 2] -> ["B" => 1]).unwrap();
/// reaction!(network, 0.5, [] -> ["A" => 1]).unwrap();
/// assert_eq!(network.num_reactions(), 2);
/// ```
#[macro_export]
macro_rules! reaction {
    (
        $network:expr,
        $rate:expr,
        [$($substrate:expr => $s_coefficient:expr),* $(,)?]
        -> [$($product:expr => $p_coefficient:expr),* $(,)?]
    ) => {
        $network.add_reaction(
            $rate,
            &[$(($substrate, $s_coefficient)),*],
            &[$(($product, $p_coefficient)),*],
        )
    };
}
