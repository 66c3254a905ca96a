#[cfg(test)]
mod test_network {
    use pretty_assertions::assert_eq;
    use rxnet::{
        prelude::*,
        reaction,
        system::{rate_law, SystemError},
        validation::check_consistency,
    };

    /// Builds the Michaelis-Menten network one call at a time
    ///
    /// S + E <--> SE (kB, kD)
    /// SE --> P + E  (kP)
    fn michaelis_menten_incremental() -> ReactionNetwork {
        let mut network = ReactionNetwork::new();
        for name in ["S", "E", "SE", "P"] {
            network.add_species(name).unwrap();
        }
        for name in ["kB", "kD", "kP"] {
            network.add_parameter(name).unwrap();
        }

        network
            .add_reaction(
                Rate::reversible(Rate::symbolic("kB").unwrap(), Rate::symbolic("kD").unwrap()),
                &[("S", 1), ("E", 1)],
                &[("SE", 1)],
            )
            .unwrap();
        network
            .add_reaction(
                Rate::symbolic("kP").unwrap(),
                &[("SE", 1)],
                &[("P", 1), ("E", 1)],
            )
            .unwrap();
        network
    }

    #[test]
    fn test_batch_and_incremental_construction_agree() {
        // ARRANGE
        let incremental = michaelis_menten_incremental();
        let source = std::fs::read_to_string("tests/data/michaelis_menten.rxn").unwrap();

        // ACT
        let batch = parse_network(&source).unwrap();
        let document = load_network("tests/data/michaelis_menten.json").unwrap();

        // ASSERT
        for network in [&batch, &document] {
            assert_eq!(network.species(), incremental.species());
            assert_eq!(network.parameters(), incremental.parameters());
            assert_eq!(network.num_reactions(), incremental.num_reactions());
            for i in 0..network.num_reactions() {
                assert_eq!(
                    network.net_stoichiometry(i).unwrap(),
                    incremental.net_stoichiometry(i).unwrap()
                );
                assert_eq!(
                    network.rate_expression(i).unwrap(),
                    incremental.rate_expression(i).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_reversible_counts_as_two() {
        let network = michaelis_menten_incremental();
        assert_eq!(network.num_reactions(), 3);
        assert_eq!(network.reaction_equation(0).unwrap(), "S + E --> SE");
        assert_eq!(network.reaction_equation(1).unwrap(), "SE --> S + E");
        assert_eq!(network.reaction_equation(2).unwrap(), "SE --> P + E");
    }

    #[test]
    fn test_net_stoichiometry_is_products_minus_substrates() {
        let network = load_declaration("tests/data/repressilator.rxn", &ParserConfig::default())
            .unwrap();

        for reaction in network.reactions() {
            let net = reaction.net_stoichiometry();
            for species in 0..network.num_species() {
                let coefficient = |terms: &[StoichTerm]| {
                    terms
                        .iter()
                        .filter(|t| t.species == species)
                        .map(|t| i64::from(t.coefficient))
                        .sum::<i64>()
                };
                let expected = coefficient(reaction.products()) - coefficient(reaction.substrates());
                let actual = net
                    .iter()
                    .find(|(s, _)| *s == species)
                    .map_or(0, |(_, c)| *c);
                assert_eq!(actual, expected);
            }
        }
    }

    #[test]
    fn test_dependents_contain_substrates() {
        let network = load_declaration("tests/data/repressilator.rxn", &ParserConfig::default())
            .unwrap();

        for i in 0..network.num_reactions() {
            let dependents = network.dependents(i).unwrap();
            for term in network.substrates(i).unwrap() {
                assert!(dependents.contains(&term.species));
            }
        }

        // m1 transcription reads the repressor P3
        let p3 = network.species_index("P3").unwrap();
        assert_eq!(network.dependents(0).unwrap(), &[p3]);
    }

    #[test]
    fn test_reaction_to_reaction_graph_property() {
        let network = load_declaration("tests/data/repressilator.rxn", &ParserConfig::default())
            .unwrap();
        let changed = network.reaction_to_species_graph();
        let graph = network.reaction_to_reaction_graph();

        for (r, species) in changed.iter().enumerate() {
            for other in 0..network.num_reactions() {
                let dependents = network.dependents(other).unwrap();
                if species.iter().any(|s| dependents.contains(s)) {
                    assert!(graph[r].contains(&other), "{r} should affect {other}");
                }
            }
        }

        // Producing P1 (translation of m1, reaction 9) affects transcription of m2
        assert!(graph[9].contains(&1));
    }

    #[test]
    fn test_two_reaction_cycle() {
        let mut network = ReactionNetwork::new();
        network.add_species("A").unwrap();
        network.add_species("B").unwrap();
        network.add_parameter("k").unwrap();

        reaction!(network, Rate::symbolic("k").unwrap(), ["A" => 1] -> ["B" => 1]).unwrap();
        reaction!(network, Rate::symbolic("k").unwrap(), ["B" => 1] -> ["A" => 1]).unwrap();

        assert_eq!(network.net_stoichiometry(0).unwrap(), vec![(0, -1), (1, 1)]);
        assert_eq!(network.dependents(0).unwrap(), &[0]);
        assert_eq!(network.reaction_to_species_graph()[0], vec![0, 1]);
        assert!(network.reaction_to_reaction_graph()[0].contains(&1));
    }

    #[test]
    fn test_duplicate_names_leave_size_unchanged() {
        let mut network = michaelis_menten_incremental();

        for name in ["S", "kB"] {
            assert!(matches!(
                network.add_species(name),
                Err(NetworkError::DuplicateName { .. })
            ));
            assert!(matches!(
                network.add_parameter(name),
                Err(NetworkError::DuplicateName { .. })
            ));
        }

        assert_eq!(network.num_species(), 4);
        assert_eq!(network.num_parameters(), 3);
    }

    #[test]
    fn test_large_coefficients_fail_without_panicking() {
        // ARRANGE
        let mut network = michaelis_menten_incremental();

        // ACT
        let summed = network.add_reaction(1.0, &[("S", u32::MAX), ("S", 1)], &[("P", 1)]);
        network
            .add_reaction(Rate::symbolic("kP").unwrap(), &[("S", 21)], &[("P", 1)])
            .unwrap();

        // ASSERT
        assert!(matches!(summed, Err(NetworkError::CoefficientOverflow(_))));
        assert_eq!(network.num_reactions(), 4);
        assert_eq!(network.net_stoichiometry(3).unwrap(), vec![(0, -21), (3, 1)]);
        assert!(matches!(
            rate_law(&network, 3, &SystemConfig::default()),
            Err(SystemError::CombinatoricOverflow(3))
        ));
        assert!(OdeSystem::from_network(&network, &SystemConfig::default()).is_err());
    }

    #[test]
    fn test_rate_expressions_compare_structurally() {
        let network = load_declaration("tests/data/repressilator.rxn", &ParserConfig::default())
            .unwrap();

        // degradation of m1 and m2 share the rate 'delta'
        assert_eq!(
            network.rate_expression(3).unwrap(),
            network.rate_expression(5).unwrap()
        );
        assert_ne!(
            network.rate_expression(0).unwrap(),
            network.rate_expression(1).unwrap()
        );
    }

    #[test]
    fn test_downstream_views() {
        let network = michaelis_menten_incremental();

        let matrix = net_stoichiometry_matrix(&network);
        assert_eq!(matrix.shape(), &[4, 3]);
        assert_eq!(matrix.column(2).to_vec(), vec![0, 1, -1, 1]);

        assert_eq!(
            rate_law(&network, 0, &SystemConfig::default()).unwrap(),
            "kB * S * E"
        );

        let system = OdeSystem::from_network(&network, &SystemConfig::default()).unwrap();
        let du = system
            .rhs(&[1.0, 2.0, 0.5, 0.0], &[1.0, 2.0, 4.0], 0.0)
            .unwrap();
        // dS = -kB*S*E + kD*SE = -2 + 1
        assert_eq!(du[0], -1.0);
        // dP = kP*SE
        assert_eq!(du[3], 2.0);

        let report = check_consistency(&network);
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
    }
}
