use rstest::rstest;
use toru::error;
use toru::{array, itera, Array, Callable, Sequence, Value};
use toru_dash::{partial, pipeline, Dash, Operation, Returned};

fn input() -> Array {
    array!["a" => 1, "b" => 2, "c" => 3, 3 => 4]
}

fn double() -> Value {
    Callable::new(|args| Value::from(args[0].as_int().unwrap_or(0) * 2)).into()
}

fn key_text() -> Value {
    Callable::new(|args| Value::from(format!("k{}", args[1]))).into()
}

fn is_odd() -> Value {
    Callable::new(|args| Value::from(args[0].as_int().unwrap_or(0) % 2 == 1)).into()
}

fn sum() -> Value {
    Callable::new(|args| {
        Value::from(args[0].as_int().unwrap_or(0) + args[1].as_int().unwrap_or(0))
    })
    .into()
}

fn pair_of() -> Value {
    Callable::new(|args| array![args[0].clone(), args[1].clone()].into()).into()
}

fn noop() -> Value {
    Callable::new(|_| Value::Null).into()
}

// Sequences are compared by their first pairs, as some are endless.
fn settle(value: Value) -> error::Result<Value> {
    match value {
        Value::Sequence(sequence) => {
            let pairs = itera::to_iterator(itera::limit(sequence, 12))?
                .map(|pair| pair.map(|pair| Value::from(array![pair.key, pair.value])))
                .collect::<error::Result<Vec<_>>>()?;
            Ok(Value::from(Array::from_values(pairs)))
        }
        value => Ok(value),
    }
}

#[rstest]
#[case("adjust", vec![double(), key_text()])]
#[case("adjust", vec![Value::Null, key_text()])]
#[case("map", vec![double()])]
#[case("apply", vec![double()])]
#[case("reindex", vec![key_text()])]
#[case("filter", vec![is_odd()])]
#[case("limit", vec![Value::from(2)])]
#[case("omit", vec![Value::from(1)])]
#[case("slice", vec![Value::from(1), Value::from(2)])]
#[case("chain", vec![array!["x"].into(), array!["y" => "z"].into()])]
#[case("append", vec![array!["x"].into()])]
#[case("tap", vec![noop()])]
#[case("each", vec![noop()])]
#[case("unfold", vec![pair_of()])]
#[case("valuesOnly", vec![])]
#[case("keysOnly", vec![])]
#[case("flip", vec![])]
#[case("repeat", vec![])]
#[case("loop", vec![])]
#[case("replicate", vec![Value::from(2)])]
#[case("reduce", vec![sum(), Value::from(0)])]
#[case("search", vec![is_odd(), Value::Null])]
#[case("searchOrFail", vec![is_odd()])]
#[case("firstValue", vec![])]
#[case("firstKey", vec![])]
#[case("firstValueOrDefault", vec![Value::from("d")])]
#[case("firstKeyOrDefault", vec![Value::from("d")])]
#[case("count", vec![])]
#[case("toArray", vec![])]
#[case("toArrayMerge", vec![])]
#[case("toArrayValues", vec![])]
fn test_surfaces_agree(#[case] name: &str, #[case] args: Vec<Value>) -> error::Result<()> {
    let direct = Operation::from_call(name, &args)?.apply(input().into())?.into_value();
    let fluent = Dash::collect(input()).call(name, &args)?.into_value();
    let staged = partial::named(name, &args)?(input().into())?;

    let direct = settle(direct)?;
    assert_eq!(settle(fluent)?, direct, "dash disagrees on {name}");
    assert_eq!(settle(staged)?, direct, "partial disagrees on {name}");
    Ok(())
}

#[test]
fn test_typed_surfaces_agree() -> error::Result<()> {
    let direct = itera::to_array(itera::slice(
        itera::map(itera::filter(input(), |v, _| v.as_int() != Some(2)), |v, k| {
            format!("{k}:{v}")
        }),
        1,
        2,
    ))?;

    let fluent = Dash::collect(input())
        .filter(|v, _| v.as_int() != Some(2))
        .map(|v, k| format!("{k}:{v}"))
        .slice(1, 2)
        .to_array()?;

    let staged = pipeline::try_through(
        Value::from(input()),
        [
            partial::filter(|v, _| v.as_int() != Some(2)),
            partial::map(|v, k| format!("{k}:{v}")),
            partial::slice(1, 2),
            partial::to_array(),
        ],
    )?;

    assert_eq!(direct, array!["c" => "c:3", 3 => "3:4"]);
    assert_eq!(fluent, direct);
    assert_eq!(staged, Value::from(direct));
    Ok(())
}

#[test]
fn test_repeat_surfaces() -> error::Result<()> {
    let fluent = Dash::collect(input()).repeat().limit(2).to_array_values()?;
    let staged = partial::named("repeat", &[])?(input().into())?;
    let staged = itera::to_array_values(itera::limit(Sequence::try_from(staged)?, 2))?;
    assert_eq!(fluent, array![input(), input()]);
    assert_eq!(staged, fluent);
    Ok(())
}

#[test]
fn test_reduction_rewrapped() -> error::Result<()> {
    let merged = Dash::collect(array![array![1], array![2, 3]]).call(
        "reduce",
        &[
            Callable::new(|args| {
                Value::from(itera::chain([
                    args[0].to_sequence().unwrap_or_default(),
                    args[1].to_sequence().unwrap_or_default(),
                ]))
            })
            .into(),
            Value::from(Sequence::empty()),
        ],
    )?;
    let Returned::Wrapped(merged) = merged else {
        panic!("expected a wrapper");
    };
    assert_eq!(merged.to_array_values()?, array![1, 2, 3]);
    Ok(())
}

#[test]
fn test_builder_collect() -> error::Result<()> {
    let dash = Dash::builder()
        .wrap(|sequence| itera::filter(sequence, |v, _| !v.is_null()))
        .collect(array![1, Value::Null, 2]);
    assert_eq!(dash.values_only().to_array()?, array![1, 2]);
    Ok(())
}
