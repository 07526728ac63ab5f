//! # Property Checks
//!
//! Randomized checks of the mapping engine against a plain in-memory model.

#[cfg(test)]
mod tests {
    use crate::paper::{self, CommercialPaper, PaperState};
    use cc_01_state_mapping::{ErrorKind, State};
    use proptest::prelude::*;
    use shared_types::MockStub;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone)]
    enum Op {
        Insert { number: u8, ext: u8 },
        Put { number: u8, ext: u8 },
        Delete { number: u8 },
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..6, 0u8..6).prop_map(|(number, ext)| Op::Insert { number, ext }),
            (0u8..6, 0u8..6).prop_map(|(number, ext)| Op::Put { number, ext }),
            (0u8..6).prop_map(|number| Op::Delete { number }),
        ]
    }

    fn paper(number: u8, ext: u8) -> CommercialPaper {
        CommercialPaper {
            issuer: "M".into(),
            number: number.to_string(),
            owner: "M".into(),
            face_value: 1,
            external_id: format!("E-{ext}"),
            state: PaperState::Issued,
            issued_at: None,
        }
    }

    proptest! {
        /// Without unique-value changes through `put`, every stored paper is
        /// reachable through its external id and every index entry points
        /// at a stored paper.
        #[test]
        fn prop_unique_index_matches_model(ops in prop::collection::vec(op(), 1..40)) {
            let stub = MockStub::new();
            let registry = paper::entity_registry().unwrap();
            let state = State::new(&stub, &registry);
            let mut model: BTreeMap<u8, u8> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert { number, ext } => {
                        let taken = model.contains_key(&number)
                            || model.values().any(|e| *e == ext);
                        let result = state.insert(&paper(number, ext));
                        prop_assert_eq!(result.is_ok(), !taken);
                        if let Err(err) = result {
                            prop_assert_eq!(err.kind(), ErrorKind::KeyAlreadyExists);
                        } else {
                            model.insert(number, ext);
                        }
                    }
                    Op::Put { number, ext } => {
                        // Only re-put with the same unique value.
                        if let Some(&current) = model.get(&number) {
                            prop_assert!(state.put(&paper(number, current)).is_ok());
                        } else if !model.values().any(|e| *e == ext) {
                            prop_assert!(state.put(&paper(number, ext)).is_ok());
                            model.insert(number, ext);
                        }
                    }
                    Op::Delete { number } => {
                        let number_text = number.to_string();
                        let result =
                            state.delete::<CommercialPaper>(["M", number_text.as_str()]);
                        prop_assert_eq!(result.is_ok(), model.remove(&number).is_some());
                    }
                }
            }

            for (number, ext) in &model {
                let by_ext: CommercialPaper = state
                    .get_by_unique_key(paper::EXTERNAL_ID, format!("E-{ext}"))
                    .unwrap();
                prop_assert_eq!(by_ext.number, number.to_string());
            }
            let listed = state.list::<CommercialPaper>().unwrap();
            prop_assert_eq!(listed.items.len(), model.len());
            // One primary and one index entry per paper.
            prop_assert_eq!(stub.len(), model.len() * 2);
        }
    }
}
