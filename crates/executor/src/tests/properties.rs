//! Generated queries.

use proptest::prelude::*;

use super::*;
use crate::{split_query, SEPARATOR};

fn token() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["quit", "emit", "pass", "fail", "sink", "nope", ""])
}

fn segment() -> impl Strategy<Value = String> {
    (token(), "[a-z0-9 :]{0,12}").prop_map(|(t, rest)| format!("{} {}", t, rest))
}

fn query() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..5).prop_map(|s| s.join(SEPARATOR))
}

proptest! {
    #[test]
    fn parse_is_deterministic(q in query()) {
        let engine = stub_engine(&Trace::default());
        let first = engine.parse(&q);
        let second = engine.parse(&q);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            _ => prop_assert!(false, "parse of {:?} changed its verdict", q),
        }
    }

    #[test]
    fn separator_needs_both_spaces(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
        prop_assert_eq!(split_query(&format!("{}:{}", a, b)).len(), 1);
        prop_assert_eq!(split_query(&format!("{} :{}", a, b)).len(), 1);
        prop_assert_eq!(split_query(&format!("{}: {}", a, b)).len(), 1);
        prop_assert_eq!(split_query(&format!("{} : {}", a, b)).len(), 2);
    }

    #[test]
    fn valid_plans_respect_roles(q in query()) {
        let engine = stub_engine(&Trace::default());
        if let Ok(plan) = engine.parse(&q) {
            let n = plan.len();
            for (i, segment) in plan.segments().iter().enumerate() {
                prop_assert!(segment.role().is_legal(i, n));
            }
            prop_assert!(!plan.segments()[0].role().accepts_result());
        }
    }
}
