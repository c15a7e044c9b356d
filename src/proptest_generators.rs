#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::{Constraint, Operand, Operator, Triplet};
    use proptest::prelude::*;

    fn valid_field() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9]{0,11}"
    }

    fn valid_operator() -> impl Strategy<Value = Operator> {
        prop::sample::select(Operator::ALL.to_vec())
    }

    fn valid_operands() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[A-Za-z0-9_-]{1,8}", 1..5)
    }

    fn arb_triplet() -> impl Strategy<Value = Triplet> {
        (valid_field(), valid_operator(), valid_operands()).prop_map(|(field, op, operands)| {
            Triplet::new(&field, op.as_str(), operands)
        })
    }

    // Fragments the notation grammar must drop without inventing anything
    fn junk_fragment() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("Bogus|things".to_string()),
            Just("Fee_#Fhi_$Foe".to_string()),
            Just("A_$eq_$b_$c".to_string()),
            "[a-z|]{0,10}",
        ]
    }

    fn arb_notation() -> impl Strategy<Value = (Vec<String>, String)> {
        prop::collection::vec(
            prop_oneof![
                3 => arb_triplet().prop_map(|t| (true, t.to_string())),
                1 => junk_fragment().prop_map(|s| (false, s)),
            ],
            0..8,
        )
        .prop_map(|fragments| {
            let valid = fragments
                .iter()
                .filter(|(valid, _)| *valid)
                .map(|(_, s)| s.clone())
                .collect();
            let notation = fragments
                .into_iter()
                .map(|(_, s)| s)
                .collect::<Vec<_>>()
                .join(",");
            (valid, notation)
        })
    }

    proptest! {
        #[test]
        fn triplet_round_trips(triplet in arb_triplet()) {
            prop_assert!(triplet.is_valid());
            let parsed = Triplet::from_notation(&triplet.to_string()).unwrap();
            prop_assert_eq!(parsed, triplet);
        }

        #[test]
        fn constraint_notation_is_idempotent((_, notation) in arb_notation()) {
            let once = Constraint::from_notation(&notation).to_string();
            let twice = Constraint::from_notation(&once).to_string();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn constraint_never_invents_criteria((valid, notation) in arb_notation()) {
            let known: HashSet<String> = valid.into_iter().collect();
            let rendered = Constraint::from_notation(&notation).to_string();
            for criterion in rendered.split(',').filter(|c| !c.is_empty()) {
                prop_assert!(known.contains(criterion), "invented {}", criterion);
            }
        }

        #[test]
        fn same_pair_replaces(
            field in valid_field(),
            op in valid_operator(),
            first in valid_operands(),
            second in valid_operands(),
        ) {
            let mut subject = Constraint::new();
            subject.set_field(&field, op.as_str(), first, false);
            subject.set_field(&field, op.as_str(), second.clone(), false);
            let expected: Vec<Operand> = second.into_iter().map(Operand::Text).collect();
            prop_assert_eq!(&subject.get_field(&field)[&op], &expected);
            prop_assert_eq!(subject.get_field(&field).len(), 1);
        }

        #[test]
        fn clone_is_independent((_, notation) in arb_notation(), field in valid_field()) {
            let original = Constraint::from_notation(&notation);
            let before = original.to_string();
            let mut copy = original.clone();
            prop_assert_eq!(&copy, &original);
            prop_assert_eq!(copy.to_string(), before.clone());
            copy.set_field(&field, "exists", "true", true);
            prop_assert_eq!(original.to_string(), before);
        }
    }
}
