//! Property-based tests for ring buffer invariants
//!
//! Random operation sequences are replayed against the ring and a `VecDeque`
//! model. After every step:
//! - count matches the model and stays within capacity
//! - head/tail are multiples of the record size inside the used span
//! - removed and peeked records come out in insertion order

use proptest::prelude::*;
use ringbuf::{InstanceRegistry, RingBuffer, RingConfig, RingError};
use std::collections::VecDeque;

const CAP: usize = 8;

#[derive(Debug, Clone)]
enum Op {
    Insert(u8),
    Remove,
    PeekOldest,
    PeekNewest,
    Reset,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u8>().prop_map(Op::Insert),
        3 => Just(Op::Remove),
        1 => Just(Op::PeekOldest),
        1 => Just(Op::PeekNewest),
        1 => Just(Op::Reset),
    ]
}

fn arb_record_size() -> impl Strategy<Value = usize> {
    prop_oneof![Just(1usize), Just(2), Just(4), Just(8), Just(16)]
}

proptest! {
    #[test]
    fn prop_matches_fifo_model(
        record_size in arb_record_size(),
        ops in prop::collection::vec(arb_op(), 1..200)
    ) {
        let registry = InstanceRegistry::new();
        let mut memory = vec![0u8; record_size * CAP];
        let mut ring = RingBuffer::<CAP>::bind_with(
            &mut memory,
            &RingConfig::new(record_size, 1),
            &registry,
        ).map_err(|e| TestCaseError::fail(e.to_string()))?;

        let mut model: VecDeque<u8> = VecDeque::new();
        let mut out = vec![0u8; record_size];

        for op in ops {
            match op {
                Op::Insert(value) => {
                    let result = ring.insert(&vec![value; record_size]);
                    if model.len() == CAP {
                        prop_assert_eq!(result, Err(RingError::Full));
                    } else {
                        prop_assert_eq!(result, Ok(()));
                        model.push_back(value);
                    }
                }
                Op::Remove => match model.pop_front() {
                    Some(expected) => {
                        prop_assert_eq!(ring.remove_oldest(&mut out), Ok(()));
                        prop_assert!(out.iter().all(|&b| b == expected));
                    }
                    None => prop_assert_eq!(ring.remove_oldest(&mut out), Err(RingError::Empty)),
                },
                Op::PeekOldest => match model.front() {
                    Some(&expected) => {
                        prop_assert_eq!(ring.peek_oldest(&mut out), Ok(()));
                        prop_assert!(out.iter().all(|&b| b == expected));
                    }
                    None => prop_assert_eq!(ring.peek_oldest(&mut out), Err(RingError::Empty)),
                },
                Op::PeekNewest => match model.back() {
                    Some(&expected) => {
                        prop_assert_eq!(ring.peek_newest(&mut out), Ok(()));
                        prop_assert!(out.iter().all(|&b| b == expected));
                    }
                    None => prop_assert_eq!(ring.peek_newest(&mut out), Err(RingError::Empty)),
                },
                Op::Reset => {
                    ring.reset();
                    model.clear();
                }
            }

            let span = record_size * CAP;
            prop_assert_eq!(ring.count(), model.len());
            prop_assert!(ring.count() <= CAP);
            prop_assert_eq!(ring.head_offset() % record_size, 0);
            prop_assert_eq!(ring.tail_offset() % record_size, 0);
            prop_assert!(ring.head_offset() < span);
            prop_assert!(ring.tail_offset() < span);
            prop_assert_eq!(ring.is_empty(), model.is_empty());
            prop_assert_eq!(ring.is_full(), model.len() == CAP);

            let stored: Vec<u8> = ring.records().map(|r| r[0]).collect();
            let expected: Vec<u8> = model.iter().copied().collect();
            prop_assert_eq!(stored, expected);
        }
    }

    #[test]
    fn prop_round_trip_preserves_order(
        values in prop::collection::vec(any::<u8>(), 0..=CAP)
    ) {
        let registry = InstanceRegistry::new();
        let mut memory = [0u8; 4 * CAP];
        let mut ring = RingBuffer::<CAP>::bind_with(&mut memory, &RingConfig::new(4, 1), &registry)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        for &value in &values {
            prop_assert_eq!(ring.insert(&[value; 4]), Ok(()));
        }
        prop_assert_eq!(ring.count(), values.len());

        let mut out = [0u8; 4];
        for &value in &values {
            prop_assert_eq!(ring.remove_oldest(&mut out), Ok(()));
            prop_assert_eq!(out, [value; 4]);
        }
        prop_assert!(ring.is_empty());
    }
}
