//! # Rules — Cross-Field Predicates
//!
//! A [`Rule`] runs after type coercion. It is scoped to one field, to an
//! ordered list of fields, or to the whole value map (global). Field and
//! multi-field rules are skipped when any of their fields failed
//! type-level validation; global rules always run.
//!
//! The predicate receives a [`RuleContext`] through which it reads coerced
//! values, the caller's context map and the bound owner, and reports
//! failures.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use vouch_core::{Context, Data, Value};

/// What a rule is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleScope {
    /// A single field.
    Field(String),
    /// An ordered list of fields.
    Fields(Vec<String>),
    /// The whole value map.
    Global,
}

impl RuleScope {
    /// The field names this scope covers, in order.
    pub fn keys(&self) -> &[String] {
        match self {
            RuleScope::Field(name) => std::slice::from_ref(name),
            RuleScope::Fields(names) => names,
            RuleScope::Global => &[],
        }
    }

    /// Whether this is a global rule.
    pub fn is_global(&self) -> bool {
        matches!(self, RuleScope::Global)
    }
}

static NULL: Value = Value::Null;

type Predicate = dyn Fn(&mut RuleContext<'_>) + Send + Sync;

/// A rule descriptor: a scope and a predicate.
#[derive(Clone)]
pub struct Rule {
    scope: RuleScope,
    predicate: Arc<Predicate>,
}

impl Rule {
    /// Build a rule with an explicit scope.
    pub fn new<F>(scope: RuleScope, predicate: F) -> Self
    where
        F: Fn(&mut RuleContext<'_>) + Send + Sync + 'static,
    {
        Self {
            scope,
            predicate: Arc::new(predicate),
        }
    }

    /// A rule on one field.
    pub fn field<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&mut RuleContext<'_>) + Send + Sync + 'static,
    {
        Self::new(RuleScope::Field(name.into()), predicate)
    }

    /// A rule on several fields.
    pub fn fields<I, S, F>(names: I, predicate: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&mut RuleContext<'_>) + Send + Sync + 'static,
    {
        let names = names.into_iter().map(Into::into).collect();
        Self::new(RuleScope::Fields(names), predicate)
    }

    /// A rule on the whole value map.
    pub fn global<F>(predicate: F) -> Self
    where
        F: Fn(&mut RuleContext<'_>) + Send + Sync + 'static,
    {
        Self::new(RuleScope::Global, predicate)
    }

    /// The rule's scope.
    pub fn scope(&self) -> &RuleScope {
        &self.scope
    }

    /// The fields the rule is scoped to.
    pub fn keys(&self) -> &[String] {
        self.scope.keys()
    }

    /// Run the predicate and collect what it reported.
    pub(crate) fn apply(
        &self,
        values: &Data,
        context: &Context,
        owner: Option<&dyn Any>,
    ) -> Vec<Failure> {
        let mut ctx = RuleContext {
            scope: &self.scope,
            values,
            context,
            owner,
            failures: Vec::new(),
        };
        (self.predicate)(&mut ctx);
        ctx.failures
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("scope", &self.scope).finish_non_exhaustive()
    }
}

/// A failure reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Failure {
    /// Attached to a field.
    Field { field: String, message: String },
    /// Attached to the result as a whole.
    Base(String),
}

/// What a rule predicate sees.
pub struct RuleContext<'a> {
    scope: &'a RuleScope,
    values: &'a Data,
    context: &'a Context,
    owner: Option<&'a dyn Any>,
    failures: Vec<Failure>,
}

impl<'a> RuleContext<'a> {
    /// The coerced value of the first scoped field.
    ///
    /// Global rules have no scoped field and always see `Null`.
    pub fn value(&self) -> &'a Value {
        match self.scope.keys().first() {
            Some(key) => self.value_of(key),
            None => &NULL,
        }
    }

    /// The coerced value of any field. Absent fields read as `Null`.
    pub fn value_of(&self, field: &str) -> &'a Value {
        self.values.get(field).unwrap_or(&NULL)
    }

    /// All coerced values.
    pub fn values(&self) -> &'a Data {
        self.values
    }

    /// The caller-supplied context map.
    pub fn context(&self) -> &'a Context {
        self.context
    }

    /// One context entry, if present.
    pub fn context_value(&self, key: &str) -> Option<&'a Value> {
        self.context.get(key)
    }

    /// The bound owner, if the validation was bound to one.
    pub fn instance(&self) -> Option<&'a dyn Any> {
        self.owner
    }

    /// The bound owner, if it is a `T`.
    pub fn instance_as<T: Any>(&self) -> Option<&'a T> {
        self.owner.and_then(|o| o.downcast_ref::<T>())
    }

    /// Report a failure on the first scoped field. In a global rule this is
    /// a base failure.
    pub fn failure(&mut self, message: impl Into<String>) {
        let message = message.into();
        let failure = match self.scope.keys().first() {
            Some(field) => Failure::Field {
                field: field.clone(),
                message,
            },
            None => Failure::Base(message),
        };
        self.failures.push(failure);
    }

    /// Report a failure on a specific field.
    pub fn failure_at(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.failures.push(Failure::Field {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Report a failure not attached to any field.
    pub fn base_failure(&mut self, message: impl Into<String>) {
        self.failures.push(Failure::Base(message.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_core::data;

    #[test]
    fn scope_keys() {
        assert_eq!(RuleScope::Field("a".into()).keys(), ["a".to_owned()]);
        assert_eq!(
            RuleScope::Fields(vec!["a".into(), "b".into()]).keys(),
            ["a".to_owned(), "b".to_owned()]
        );
        assert!(RuleScope::Global.keys().is_empty());
        assert!(RuleScope::Global.is_global());
    }

    #[test]
    fn field_rule_reports_on_its_field() {
        let rule = Rule::field("per_page", |ctx| {
            if ctx.value().as_i64().is_some_and(|n| n > 100) {
                ctx.failure("must be less than or equal to 100");
            }
        });
        let failures = rule.apply(&data! { "per_page" => 200 }, &Context::new(), None);
        assert_eq!(
            failures,
            vec![Failure::Field {
                field: "per_page".into(),
                message: "must be less than or equal to 100".into()
            }]
        );
        assert!(rule.apply(&data! { "per_page" => 20 }, &Context::new(), None).is_empty());
    }

    #[test]
    fn global_failure_is_a_base_failure() {
        let rule = Rule::global(|ctx| {
            assert!(ctx.value().is_null());
            ctx.failure("nothing given");
        });
        let failures = rule.apply(&Data::new(), &Context::new(), None);
        assert_eq!(failures, vec![Failure::Base("nothing given".into())]);
    }

    #[test]
    fn reads_context_and_owner() {
        struct Limits {
            max: i64,
        }
        let rule = Rule::field("per_page", |ctx| {
            let from_context = ctx.context_value("per_page_max").and_then(Value::as_i64);
            let from_owner = ctx.instance_as::<Limits>().map(|l| l.max);
            let max = from_context.or(from_owner).unwrap_or(i64::MAX);
            if ctx.value().as_i64().is_some_and(|n| n > max) {
                ctx.failure_at("per_page", format!("must be at most {max}"));
            }
        });
        let values = data! { "per_page" => 150 };

        let context = data! { "per_page_max" => 100 };
        assert_eq!(rule.apply(&values, &context, None).len(), 1);

        let owner = Limits { max: 120 };
        let failures = rule.apply(&values, &Context::new(), Some(&owner));
        assert_eq!(
            failures,
            vec![Failure::Field {
                field: "per_page".into(),
                message: "must be at most 120".into()
            }]
        );
    }
}
