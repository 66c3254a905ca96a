use ndarray::Array2;

use crate::network::{Reaction, ReactionNetwork, StoichTerm};

/// Derives the substrate stoichiometry matrix of a network.
///
/// Each row corresponds to a species (in registration order) and each column
/// to a reaction (in insertion order). Entries are the substrate coefficients.
///
/// # Arguments
///
/// * `network` - The network to derive the matrix from
///
/// # Returns
///
/// * `Array2<i64>` - A `num_species x num_reactions` matrix
pub fn substrate_matrix(network: &ReactionNetwork) -> Array2<i64> {
    side_matrix(network, |reaction| reaction.substrates())
}

/// Derives the product stoichiometry matrix of a network.
///
/// Same layout as [`substrate_matrix`], with product coefficients.
pub fn product_matrix(network: &ReactionNetwork) -> Array2<i64> {
    side_matrix(network, |reaction| reaction.products())
}

/// Derives the net stoichiometry matrix of a network.
///
/// The entry `(i, j)` is the product coefficient minus the substrate
/// coefficient of species `i` in reaction `j`. Negative values mark species
/// consumed by the reaction, positive values species produced by it.
pub fn net_stoichiometry_matrix(network: &ReactionNetwork) -> Array2<i64> {
    let mut matrix = Array2::zeros((network.num_species(), network.num_reactions()));

    for (j, reaction) in network.reactions().iter().enumerate() {
        for (i, coefficient) in reaction.net_stoichiometry() {
            matrix[(i, j)] = coefficient;
        }
    }

    matrix
}

fn side_matrix<'a, F>(network: &'a ReactionNetwork, side: F) -> Array2<i64>
where
    F: Fn(&'a Reaction) -> &'a [StoichTerm],
{
    let mut matrix = Array2::zeros((network.num_species(), network.num_reactions()));

    for (j, reaction) in network.reactions().iter().enumerate() {
        for term in side(reaction) {
            matrix[(term.species, j)] = i64::from(term.coefficient);
        }
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::Rate;
    use ndarray::arr2;

    /// Creates a network with two reactions
    /// 2A + B -> C
    /// C -> 3D
    fn create_test_network() -> ReactionNetwork {
        let mut network = ReactionNetwork::new();
        for name in ["A", "B", "C", "D"] {
            network.add_species(name).unwrap();
        }
        network.add_parameter("k").unwrap();

        network
            .add_reaction(
                Rate::symbolic("k").unwrap(),
                &[("A", 2), ("B", 1)],
                &[("C", 1)],
            )
            .unwrap();
        network.add_reaction(0.5, &[("C", 1)], &[("D", 3)]).unwrap();
        network
    }

    #[test]
    fn test_net_stoichiometry_matrix() {
        let network = create_test_network();
        let matrix = net_stoichiometry_matrix(&network);

        // Species/Reactions  R1  R2
        // A                [-2,  0]
        // B                [-1,  0]
        // C                [ 1, -1]
        // D                [ 0,  3]
        let expected = arr2(&[[-2, 0], [-1, 0], [1, -1], [0, 3]]);
        assert_eq!(matrix, expected);
    }

    #[test]
    fn test_side_matrices() {
        let network = create_test_network();

        let substrates = substrate_matrix(&network);
        let products = product_matrix(&network);

        assert_eq!(substrates, arr2(&[[2, 0], [1, 0], [0, 1], [0, 0]]));
        assert_eq!(products, arr2(&[[0, 0], [0, 0], [1, 0], [0, 3]]));
        assert_eq!(products - substrates, net_stoichiometry_matrix(&network));
    }

    #[test]
    fn test_reversible_reaction_columns() {
        let mut network = ReactionNetwork::new();
        network.add_species("A").unwrap();
        network.add_species("B").unwrap();
        network
            .add_reaction(Rate::reversible(1.0, 2.0), &[("A", 1)], &[("B", 1)])
            .unwrap();

        let matrix = net_stoichiometry_matrix(&network);
        assert_eq!(matrix, arr2(&[[-1, 1], [1, -1]]));
    }

    #[test]
    fn test_empty_network() {
        let mut network = ReactionNetwork::new();
        network.add_species("A").unwrap();

        let matrix = net_stoichiometry_matrix(&network);
        assert_eq!(matrix.shape(), &[1, 0]);
    }
}
