//! Property-based checks of the point store invariants.

use pv_core::{PointId, Property};
use pv_model::{DataModel, PointInput};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(Vec<(usize, f64)>),
    Delete(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => prop::collection::vec((0usize..11, -1.0e3..1.0e3_f64), 0..4).prop_map(Op::Add),
        1 => (0usize..8).prop_map(Op::Delete),
    ]
}

proptest! {
    #[test]
    fn ids_strictly_increase_and_columns_stay_parallel(ops in prop::collection::vec(op(), 1..40)) {
        let mut model = DataModel::new("mp.H2O");
        let mut last_id: Option<PointId> = None;

        for op in ops {
            match op {
                Op::Add(values) => {
                    let input: PointInput = values
                        .into_iter()
                        .map(|(i, v)| (Property::ALL[i], v))
                        .collect();
                    let was_empty_model = model.points().is_empty();
                    if let Some(rec) = model.add_point(input).unwrap() {
                        match last_id {
                            Some(prev) if !was_empty_model => prop_assert!(rec.ptid > prev),
                            _ => {}
                        }
                        last_id = Some(rec.ptid);
                    }
                }
                Op::Delete(slot) => {
                    let ids = model.points().ptids().to_vec();
                    if let Some(&victim) = ids.get(slot) {
                        model.delete_point(victim).unwrap();
                        prop_assert!(model.points().index_of(victim).is_none());
                    }
                }
            }

            let len = model.points().len();
            for (_, column) in model.points().columns() {
                prop_assert_eq!(column.len(), len);
            }
            let ids = model.points().ptids();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn ids_start_at_one_without_repeats(count in 1usize..50) {
        let mut model = DataModel::new("ig.air");
        for expected in 1..=count {
            let mut input = PointInput::new();
            input.insert(Property::T, 300.0 + expected as f64);
            let rec = model.add_point(input).unwrap().unwrap();
            prop_assert_eq!(rec.ptid.get() as usize, expected);
        }
    }
}
