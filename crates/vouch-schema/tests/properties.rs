//! # Pipeline Properties
//!
//! Property tests over generated inputs:
//!
//! - supplied values are never replaced by defaults, whatever they are;
//! - re-validating a successful result's values succeeds with the same
//!   values;
//! - fallbacks only touch fields that failed.

use proptest::prelude::*;
use vouch_core::{Context, Data, Value};
use vouch_schema::{DeclareOptions, Expectation, Namespace, Provider, Rule};

/// Helper: `inputs { count: int = 10, flag: bool = () -> true, label: string?,
/// size: int (fallback 5, must be 0..=99) }`.
fn namespace() -> Namespace {
    let mut ns = Namespace::new("Props");
    ns.declare("inputs", DeclareOptions::default()).unwrap();
    ns.define("input", Expectation::builder("count").typed("int").default_value(10).build().unwrap())
        .unwrap();
    ns.define(
        "input",
        Expectation::builder("flag").typed("bool").default_with(Provider::new(|| true)).build().unwrap(),
    )
    .unwrap();
    ns.define("input", Expectation::builder("label").typed("string").optional().build().unwrap())
        .unwrap();
    ns.define("input", Expectation::builder("size").typed("int").fallback_value(5).build().unwrap())
        .unwrap();
    ns.define_rule(
        "input_rule",
        Rule::field("size", |ctx| {
            if ctx.value().as_i64().is_some_and(|n| !(0..100).contains(&n)) {
                ctx.failure("must be between 0 and 99");
            }
        }),
    )
    .unwrap();
    ns
}

fn optional_entries() -> impl Strategy<Value = (Option<i64>, Option<bool>, Option<String>)> {
    (
        proptest::option::of(any::<i64>()),
        proptest::option::of(any::<bool>()),
        proptest::option::of("[a-z]{0,8}"),
    )
}

proptest! {
    #[test]
    fn supplied_values_survive_defaults(
        (count, flag, label) in optional_entries(),
        size in 0i64..100,
    ) {
        let ns = namespace();
        let mut data = Data::new();
        data.insert("size".into(), Value::Int(size));
        if let Some(c) = count { data.insert("count".into(), Value::Int(c)); }
        if let Some(f) = flag { data.insert("flag".into(), Value::Bool(f)); }
        if let Some(l) = &label { data.insert("label".into(), Value::from(l.as_str())); }

        let result = ns.validate("inputs", &data, &Context::new()).unwrap();
        prop_assert!(result.success());
        prop_assert_eq!(result.get("count").cloned(), Some(Value::Int(count.unwrap_or(10))));
        prop_assert_eq!(result.get("flag").cloned(), Some(Value::Bool(flag.unwrap_or(true))));
        prop_assert_eq!(result.get("label").cloned(), label.map(Value::from));
        prop_assert_eq!(result.get("size").cloned(), Some(Value::Int(size)));
    }

    #[test]
    fn successful_values_validate_again(
        (count, flag, label) in optional_entries(),
        size in any::<i64>(),
    ) {
        let ns = namespace();
        let mut data = Data::new();
        data.insert("size".into(), Value::Int(size));
        if let Some(c) = count { data.insert("count".into(), Value::Int(c)); }
        if let Some(f) = flag { data.insert("flag".into(), Value::Bool(f)); }
        if let Some(l) = label { data.insert("label".into(), Value::from(l)); }

        let first = ns.validate("inputs", &data, &Context::new()).unwrap();
        prop_assert!(first.success());
        let second = ns.validate("inputs", first.values(), &Context::new()).unwrap();
        prop_assert!(second.success());
        prop_assert_eq!(second.values(), first.values());
    }

    #[test]
    fn fallback_only_touches_failing_fields(count in any::<i64>(), size in 100i64..) {
        let ns = namespace();
        let mut data = Data::new();
        data.insert("count".into(), Value::Int(count));
        data.insert("size".into(), Value::Int(size));

        let result = ns.validate("inputs", &data, &Context::new()).unwrap();
        prop_assert!(result.success());
        prop_assert_eq!(result.get("size").cloned(), Some(Value::Int(5)));
        prop_assert_eq!(result.get("count").cloned(), Some(Value::Int(count)));
    }
}
