use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rstest::rstest;
use toru::error::{self, Error, ErrorKind};
use toru::{array, itera, Pair, Sequence, Value};

mod common;

use common::{kv, letters, pairs, values, PullCounter};

#[test]
fn test_chain_concatenates_values() -> error::Result<()> {
    let first = array!["x" => 1, "y" => 2];
    let second = array!["x" => 3];
    let mut expected = values(first.clone())?;
    expected.extend(values(second.clone())?);
    assert_eq!(values(itera::chain([first, second]))?, expected);
    Ok(())
}

#[test]
fn test_chain_keeps_duplicate_keys() -> error::Result<()> {
    let chained = itera::chain([array!["a"], array!["b"]]);
    assert_eq!(
        pairs(chained)?,
        vec![kv(0, "a"), kv(0, "b")]
    );
    Ok(())
}

#[test]
fn test_chain_opens_lazily() -> error::Result<()> {
    let second = Sequence::one_shot([(0, "b")]);
    let chained = itera::chain([Sequence::from(array!["a"]), second.clone()]);
    assert_eq!(itera::first_value(chained)?, Value::from("a"));
    // the second sequence was never opened, so it can still be consumed
    assert_eq!(values(second)?, vec![Value::from("b")]);
    Ok(())
}

#[rstest]
#[case(0)]
#[case(-1)]
fn test_limit_non_positive_never_pulls(#[case] n: i64) -> error::Result<()> {
    let counter = PullCounter::default();
    let limited = itera::limit(counter.watch(letters()), n);
    assert_eq!(itera::count(limited.clone())?, 0);
    assert!(values(limited)?.is_empty());
    assert_eq!(counter.count(), 0);
    Ok(())
}

#[test]
fn test_limit_does_not_pull_past_limit() -> error::Result<()> {
    let counter = PullCounter::default();
    let limited = itera::limit(counter.watch(itera::repeat("x")), 3);
    assert_eq!(values(limited)?.len(), 3);
    assert_eq!(counter.count(), 3);
    Ok(())
}

#[test]
fn test_omit_zero_is_unchanged() -> error::Result<()> {
    let sequence = Sequence::from(letters());
    assert_eq!(itera::omit(sequence.clone(), 0), sequence);
    assert_eq!(pairs(itera::omit(sequence.clone(), -2))?, pairs(sequence)?);
    Ok(())
}

#[rstest]
#[case(0, 0)]
#[case(0, 2)]
#[case(1, 1)]
#[case(2, 5)]
#[case(4, 1)]
fn test_slice_is_limit_of_omit(#[case] offset: i64, #[case] length: i64) -> error::Result<()> {
    let sequence = array!["a", "b", "c", "d"];
    assert_eq!(
        pairs(itera::slice(sequence.clone(), offset, length))?,
        pairs(itera::limit(itera::omit(sequence, offset), length))?
    );
    Ok(())
}

#[test]
fn test_slice_keeps_keys() -> error::Result<()> {
    let sliced = itera::slice(letters(), 1, 1);
    assert_eq!(pairs(sliced)?, vec![kv(1, "b")]);
    Ok(())
}

#[rstest]
#[case(Value::Null)]
#[case(Value::from(0))]
#[case(Value::from("init"))]
fn test_reduce_empty_returns_initial(#[case] initial: Value) -> error::Result<()> {
    let reduced = itera::reduce(Sequence::empty(), |_, _, _| Value::from("touched"), initial.clone())?;
    assert_eq!(reduced, initial);
    Ok(())
}

#[test]
fn test_reduce_left_to_right() -> error::Result<()> {
    let joined = itera::reduce(
        letters(),
        |carry, value, key| format!("{carry}{key}{value}"),
        "",
    )?;
    assert_eq!(joined, Value::from("0a1b2c"));
    Ok(())
}

#[test]
fn test_first_on_empty() {
    let first_value = itera::first_value(Sequence::empty());
    assert!(matches!(first_value, Err(Error::EmptyCollection { .. })));
    let first_key = itera::first_key(array![]).unwrap_err();
    assert_eq!(first_key.kind(), ErrorKind::Exceptional);
    assert_eq!(first_key.input(), Some(&Sequence::from(array![])));
}

#[test]
fn test_first_or_default() -> error::Result<()> {
    assert_eq!(
        itera::first_value_or_default(Sequence::empty(), "d")?,
        Value::from("d")
    );
    assert_eq!(itera::first_key_or_default(array![], 7)?, Value::from(7));
    assert_eq!(
        itera::first_key_or_default(array!["k" => "v"], 7)?,
        Value::from("k")
    );
    Ok(())
}

#[test]
fn test_materialization_collisions() -> error::Result<()> {
    let colliding = || {
        itera::chain([
            array![0 => "a", "x" => "b"],
            array!["c"],
        ])
    };
    assert_eq!(
        itera::to_array_merge(colliding())?,
        array![0 => "a", "x" => "b", 1 => "c"]
    );
    assert_eq!(itera::to_array(colliding())?, array![0 => "c", "x" => "b"]);
    assert_eq!(itera::to_array_values(colliding())?, array!["a", "b", "c"]);
    Ok(())
}

#[test]
fn test_flip_twice_restores() -> error::Result<()> {
    let sequence = array!["x" => "a", "y" => "b", 3 => "c"];
    assert_eq!(
        itera::to_array(itera::flip(itera::flip(sequence.clone())))?,
        sequence
    );
    Ok(())
}

#[test]
fn test_produce_calls_per_pull() -> error::Result<()> {
    let indices = Rc::new(RefCell::new(Vec::new()));
    let seen = indices.clone();
    let produced = itera::produce(move |index| {
        seen.borrow_mut().push(index);
        index * 10
    });
    let limited = itera::limit(produced, 4);
    assert!(indices.borrow().is_empty());
    assert_eq!(
        pairs(limited)?,
        vec![
            kv(0, 0),
            kv(1, 10),
            kv(2, 20),
            kv(3, 30)
        ]
    );
    assert_eq!(*indices.borrow(), vec![0usize, 1, 2, 3]);
    Ok(())
}

#[test]
fn test_loop_keeps_cycle_keys() -> error::Result<()> {
    let looped = itera::limit(itera::r#loop(letters()), 7);
    let (keys, values): (Vec<Value>, Vec<Value>) = pairs(looped)?.into_iter().unzip();
    assert_eq!(keys, [0, 1, 2, 0, 1, 2, 0].map(Value::from));
    assert_eq!(values, ["a", "b", "c", "a", "b", "c", "a"].map(Value::from));
    Ok(())
}

#[test]
fn test_loop_over_nothing_ends() -> error::Result<()> {
    assert!(values(itera::r#loop(Sequence::empty()))?.is_empty());
    let nothing = itera::filter(letters(), |_, _| false);
    assert_eq!(itera::count(itera::r#loop(nothing))?, 0);
    Ok(())
}

#[rstest]
#[case(3, 9)]
#[case(1, 3)]
#[case(0, 0)]
#[case(-2, 0)]
fn test_replicate(#[case] times: i64, #[case] expected: usize) -> error::Result<()> {
    let replicated = itera::replicate(itera::filter(letters(), |_, _| true), times);
    assert_eq!(values(replicated)?.len(), expected);
    Ok(())
}

#[test]
fn test_cycling_spent_source() {
    let looped = itera::limit(itera::r#loop(Sequence::one_shot([(0, "a")])), 3);
    assert!(matches!(values(looped), Err(Error::SpentSource)));
    let replicated = itera::replicate(itera::make(["a", "b"]), 2);
    let err = values(replicated).unwrap_err();
    assert!(matches!(err, Error::SpentSource));
    assert_eq!(err.kind(), ErrorKind::Misuse);
}

#[test]
fn test_combinators_are_lazy() -> error::Result<()> {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let mapped = itera::map(letters(), move |value, _| {
        counter.set(counter.get() + 1);
        value.clone()
    });
    let filtered = itera::filter(mapped, |_, _| true);
    assert_eq!(calls.get(), 0);
    assert_eq!(itera::first_value(filtered)?, Value::from("a"));
    assert_eq!(calls.get(), 1);
    Ok(())
}

#[test]
fn test_multi_pass_chain() -> error::Result<()> {
    let sequence = itera::map(letters(), |value, key| format!("{key}:{value}"));
    assert_eq!(values(sequence.clone())?, values(sequence)?);
    Ok(())
}

#[test]
fn test_values_and_keys_only() -> error::Result<()> {
    let sequence = array!["x" => 1, "y" => 2];
    assert_eq!(
        pairs(itera::values_only(sequence.clone()))?,
        vec![kv(0, 1), kv(1, 2)]
    );
    assert_eq!(
        pairs(itera::keys_only(sequence))?,
        vec![kv(0, "x"), kv(1, "y")]
    );
    Ok(())
}

#[test]
fn test_reindex() -> error::Result<()> {
    let reindexed = itera::reindex(letters(), |value, _| format!("_{value}"));
    assert_eq!(
        itera::to_array(reindexed)?,
        array!["_a" => "a", "_b" => "b", "_c" => "c"]
    );
    Ok(())
}

#[test]
fn test_unfold() -> error::Result<()> {
    let unfolded = itera::unfold(array![1, 2], |value, _| {
        let n = value.as_int().unwrap_or(0);
        array![n, -n]
    });
    assert_eq!(values(unfolded)?, [1, -1, 2, -2].map(Value::from));
    Ok(())
}

#[test]
fn test_unfold_not_iterable() {
    let unfolded = itera::unfold(letters(), |value, _| value.clone());
    let err = values(unfolded).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Expected an iterable collection, got `string`.");
}

#[test]
fn test_tap_sees_every_pair() -> error::Result<()> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    let tapped = itera::each(letters(), move |value, key| {
        log.borrow_mut().push(format!("{key}={value}"))
    });
    assert_eq!(values(tapped)?, values(letters())?);
    assert_eq!(*seen.borrow(), vec!["0=a", "1=b", "2=c"]);
    Ok(())
}

#[test]
fn test_search() -> error::Result<()> {
    let sequence = array!["a" => 1, "b" => 2, "c" => 3];
    assert_eq!(
        itera::search(sequence.clone(), |value, _| value.as_int() > Some(1), Value::Null)?,
        Value::from(2)
    );
    assert_eq!(
        itera::search(sequence.clone(), |_, key| key.as_str() == Some("z"), "none")?,
        Value::from("none")
    );
    let err = itera::search_or_fail(sequence, |_, _| false).unwrap_err();
    insta::assert_snapshot!(
        err.to_string(),
        @"No element matching the search criteria found in the collection."
    );
    Ok(())
}

#[test]
fn test_count() -> error::Result<()> {
    assert_eq!(itera::count(letters())?, 3);
    assert_eq!(itera::count(itera::make([1, 2, 3, 4]))?, 4);
    assert_eq!(itera::count(itera::filter(letters(), |v, _| v.as_str() != Some("b")))?, 2);
    Ok(())
}

#[test]
fn test_count_pulls_through_tap() -> error::Result<()> {
    let counter = PullCounter::default();
    assert_eq!(itera::count(counter.watch(letters()))?, 3);
    assert_eq!(counter.count(), 3);
    let mapped = itera::map(counter.watch(letters()), |v, _| v.clone());
    assert_eq!(itera::count(mapped)?, 3);
    assert_eq!(counter.count(), 6);
    Ok(())
}

#[test]
fn test_to_iterator_preserves_position() -> error::Result<()> {
    let sequence = itera::make(["a", "b", "c"]);
    let mut cursor = itera::to_iterator(sequence.clone())?;
    assert_eq!(cursor.next().transpose()?, Some(Pair::new(0, "a")));
    assert_eq!(values(sequence)?, vec![Value::from("b"), Value::from("c")]);
    Ok(())
}

#[test]
fn test_reentrant_pull() {
    let slot: Rc<RefCell<Option<Sequence>>> = Rc::default();
    let inner = slot.clone();
    let sequence = Sequence::one_shot_fallible((0..2).map(move |i| -> error::Result<Pair> {
        if let Some(myself) = inner.borrow().as_ref() {
            myself.open()?;
        }
        Ok(Pair::new(i, i))
    }));
    *slot.borrow_mut() = Some(sequence.clone());
    assert!(matches!(
        itera::first_value(sequence),
        Err(Error::ReentrantPull)
    ));
}
