#![cfg(feature = "persistent")]
//! Example-based tests for PersistentVector.
//!
//! Organized by operation; tree-shape checks live in the unit tests next to
//! the implementation.

use rrb_vector::persistent::{IndexOutOfRange, PersistentVector};
use rstest::rstest;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

fn range_vector(range: std::ops::Range<i32>) -> PersistentVector<i32> {
    range.collect()
}

// =============================================================================
// Construction and length
// =============================================================================

#[rstest]
fn test_new_creates_empty_vector() {
    let vector: PersistentVector<i32> = PersistentVector::new();
    assert!(vector.is_empty());
    assert_eq!(vector.len(), 0);
    assert_eq!(vector.height(), 0);
    assert_eq!(vector, PersistentVector::default());
}

#[rstest]
fn test_singleton() {
    let vector = PersistentVector::singleton("only");
    assert_eq!(vector.len(), 1);
    assert_eq!(vector.first(), Some(&"only"));
    assert_eq!(vector.last(), Some(&"only"));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(31)]
#[case(32)]
#[case(33)]
#[case(1_000)]
#[case(1_025)]
#[case(33_000)]
fn test_from_iter_round_trips_through_to_vec(#[case] length: i32) {
    let expected: Vec<i32> = (0..length).collect();
    let vector = PersistentVector::from_slice(&expected);
    assert_eq!(vector.len(), expected.len());
    assert_eq!(vector.to_vec(), expected);
    assert_eq!(vector.clone().into_iter().collect::<Vec<_>>(), expected);
    assert_eq!(vector.iter().len(), expected.len());
}

#[rstest]
#[case(32, 0)]
#[case(33, 1)]
#[case(100, 1)]
#[case(1_024, 1)]
#[case(1_025, 2)]
fn test_height_grows_with_length(#[case] length: i32, #[case] expected: usize) {
    assert_eq!(range_vector(0..length).height(), expected);
}

// =============================================================================
// get / set
// =============================================================================

#[rstest]
fn test_get_on_empty_returns_none() {
    let vector: PersistentVector<i32> = PersistentVector::new();
    assert_eq!(vector.get(0), None);
    assert_eq!(vector.first(), None);
    assert_eq!(vector.last(), None);
}

#[rstest]
fn test_get_every_index() {
    let vector = range_vector(0..5_000);
    for index in 0..5_000 {
        assert_eq!(vector.get(index), Some(&i32::try_from(index).unwrap()));
    }
    assert_eq!(vector.get(5_000), None);
}

#[rstest]
fn test_try_get_reports_index_and_length() {
    let vector = range_vector(0..10);
    assert_eq!(vector.try_get(9), Ok(&9));
    assert_eq!(vector.try_get(10), Err(IndexOutOfRange::new(10, 10)));
}

#[rstest]
fn test_set_leaves_original_untouched() {
    let vector = range_vector(0..100);
    let updated = vector.set(42, -1).unwrap();
    assert_eq!(updated.get(42), Some(&-1));
    assert_eq!(vector.get(42), Some(&42));
    for index in (0..100).filter(|&index| index != 42) {
        assert_eq!(updated.get(index), vector.get(index));
    }
}

#[rstest]
fn test_set_out_of_range_is_reported() {
    let vector = range_vector(0..3);
    assert!(vector.set(3, 0).is_none());
    assert_eq!(vector.try_set(7, 0).unwrap_err(), IndexOutOfRange::new(7, 3));
    assert!(vector.update_with(3, |x| x + 1).is_none());
}

#[rstest]
fn test_index_operator() {
    let vector = range_vector(0..64);
    assert_eq!(vector[0], 0);
    assert_eq!(vector[63], 63);
}

#[rstest]
#[should_panic(expected = "index 64 is out of range for a vector of length 64")]
fn test_index_operator_panics_past_the_end() {
    let vector = range_vector(0..64);
    let _ = vector[64];
}

// =============================================================================
// push
// =============================================================================

#[rstest]
fn test_push_back_many() {
    let vector = (0..2_000).fold(PersistentVector::new(), |vector, element| {
        vector.push_back(element)
    });
    assert_eq!(vector, range_vector(0..2_000));
}

#[rstest]
fn test_push_back_keeps_every_version() {
    let versions: Vec<PersistentVector<i32>> = (0..100)
        .scan(PersistentVector::new(), |vector, element| {
            *vector = vector.push_back(element);
            Some(vector.clone())
        })
        .collect();
    for (index, version) in versions.iter().enumerate() {
        assert_eq!(version.len(), index + 1);
        assert_eq!(version.last(), Some(&i32::try_from(index).unwrap()));
    }
}

#[rstest]
fn test_push_front() {
    let vector = (0..300).rev().fold(PersistentVector::new(), |vector, element| {
        vector.push_front(element)
    });
    assert_eq!(vector, range_vector(0..300));
}

#[rstest]
fn test_pop_until_empty() {
    let mut vector = range_vector(0..70);
    let mut popped = Vec::new();
    while let Some((rest, element)) = vector.pop_back() {
        popped.push(element);
        vector = rest;
    }
    assert!(vector.is_empty());
    assert_eq!(popped, (0..70).rev().collect::<Vec<_>>());
}

// =============================================================================
// append
// =============================================================================

#[rstest]
#[case(0, 0)]
#[case(0, 10)]
#[case(10, 0)]
#[case(5, 7)]
#[case(20, 20)]
#[case(32, 32)]
#[case(33, 1)]
#[case(1, 1_500)]
#[case(1_500, 1)]
#[case(1_000, 1_000)]
#[case(40_000, 77)]
fn test_append_concatenates(#[case] left_length: i32, #[case] right_length: i32) {
    let left = range_vector(0..left_length);
    let right = range_vector(left_length..left_length + right_length);
    let joined = left.append(&right);
    assert_eq!(joined, range_vector(0..left_length + right_length));
    assert_eq!(left.len(), usize::try_from(left_length).unwrap());
    assert_eq!(right.len(), usize::try_from(right_length).unwrap());
}

#[rstest]
fn test_extend_appends() {
    let mut vector = range_vector(0..10);
    vector.extend(10..50);
    assert_eq!(vector, range_vector(0..50));
}

// =============================================================================
// slice
// =============================================================================

#[rstest]
#[case(0, 100, 0, 100)]
#[case(10, 90, 10, 90)]
#[case(-10, 100, 90, 100)]
#[case(0, -1, 0, 99)]
#[case(-1000, 5, 0, 5)]
#[case(95, 1000, 95, 100)]
#[case(50, 50, 0, 0)]
#[case(60, 40, 0, 0)]
#[case(-5, -10, 0, 0)]
fn test_slice_resolves_and_clamps(
    #[case] from: isize,
    #[case] to: isize,
    #[case] expected_start: i32,
    #[case] expected_end: i32,
) {
    let vector = range_vector(0..100);
    assert_eq!(vector.slice(from, to), range_vector(expected_start..expected_end));
}

#[rstest]
#[case(1_023, 1_025, 0)]
#[case(32_767, 32_769, 0)]
#[case(1_000, 1_100, 1)]
#[case(100, 39_900, 3)]
fn test_slice_height_fits_the_kept_length(
    #[case] from: isize,
    #[case] to: isize,
    #[case] expected_height: usize,
) {
    let vector = range_vector(0..40_000);
    let sliced = vector.slice(from, to);
    assert_eq!(sliced.height(), expected_height);
    assert_eq!(
        sliced.to_vec(),
        (i32::try_from(from).unwrap()..i32::try_from(to).unwrap()).collect::<Vec<_>>()
    );
}

#[rstest]
fn test_slice_of_empty_vector_is_empty() {
    let vector: PersistentVector<i32> = PersistentVector::new();
    assert!(vector.slice(0, 10).is_empty());
    assert!(vector.slice(-3, -1).is_empty());
}

#[rstest]
fn test_take_drop_and_split_at() {
    let vector = range_vector(0..1_000);
    assert_eq!(vector.take(333), range_vector(0..333));
    assert_eq!(vector.drop_first(333), range_vector(333..1_000));
    assert_eq!(vector.take(5_000), vector);
    assert!(vector.drop_first(5_000).is_empty());

    let (left, right) = vector.split_at(640);
    assert_eq!(left.append(&right), vector);
}

// =============================================================================
// map and folds
// =============================================================================

#[rstest]
fn test_map_and_indexed_map() {
    let vector = range_vector(0..100).append(&range_vector(100..130));
    assert_eq!(
        vector.map(|x| x * 3).to_vec(),
        (0..130).map(|x| x * 3).collect::<Vec<_>>()
    );
    assert_eq!(
        vector.indexed_map(|index, x| usize::try_from(*x).unwrap() == index),
        std::iter::repeat_n(true, 130).collect::<PersistentVector<bool>>()
    );
}

#[rstest]
fn test_fold_order() {
    let vector: PersistentVector<char> = "persistent".chars().collect();
    let forwards = vector.fold_left(String::new(), |mut accumulator, letter| {
        accumulator.push(*letter);
        accumulator
    });
    let backwards = vector.fold_right(String::new(), |letter, mut accumulator| {
        accumulator.push(*letter);
        accumulator
    });
    assert_eq!(forwards, "persistent");
    assert_eq!(backwards, "tnetsisrep");
}

#[rstest]
fn test_fold_on_empty_returns_seed() {
    let vector: PersistentVector<i32> = PersistentVector::new();
    assert_eq!(vector.fold_left(7, |accumulator, x| accumulator + x), 7);
    assert_eq!(vector.fold_right(7, |x, accumulator| accumulator + x), 7);
}

#[rstest]
fn test_find_index() {
    let vector = range_vector(0..500);
    assert_eq!(vector.find_index(|x| *x > 250), Some(251));
    assert_eq!(vector.find_index(|x| *x < 0), None);
}

// =============================================================================
// Trait implementations
// =============================================================================

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[rstest]
fn test_equal_vectors_with_different_shapes_hash_equally() {
    let built = range_vector(0..2_000);
    let joined = range_vector(0..7).append(&range_vector(7..2_000));
    assert_eq!(built, joined);
    assert_eq!(hash_of(&built), hash_of(&joined));
    assert_ne!(built, range_vector(0..1_999));
}

#[rstest]
fn test_display_and_debug() {
    let vector = range_vector(1..4);
    assert_eq!(format!("{vector}"), "[1, 2, 3]");
    assert_eq!(format!("{vector:?}"), "[1, 2, 3]");
}

// =============================================================================
// Walkthrough
// =============================================================================

#[rstest]
fn test_hundred_element_walkthrough() {
    let vector = range_vector(0..100);
    assert_eq!(vector.len(), 100);
    assert_eq!(vector.height(), 1);
    assert_eq!(vector.get(37), Some(&37));

    let middle = vector.slice(10, 90);
    assert_eq!(middle.len(), 80);
    assert_eq!(middle.get(0), Some(&10));
    assert_eq!(middle.get(79), Some(&89));

    let pushed = vector.push_back(100);
    assert_eq!(pushed.len(), 101);
    assert_eq!(pushed.get(100), Some(&100));
    assert_eq!(vector.len(), 100);
    assert_eq!(vector.get(100), None);

    let rejoined = vector.slice(0, 50).append(&vector.slice(50, 100));
    assert_eq!(rejoined, vector);
    assert_eq!(rejoined.to_vec(), (0..100).collect::<Vec<_>>());
}
