//! Rule Chains
//!
//! Ordered `(predicate, outcome)` lists where the first enabled rule whose
//! predicate holds decides the outcome. A disabled rule is never evaluated, so
//! it consumes no randomness.

/// Predicate over a mutable evaluation context.
pub type Check<C, E> = fn(&mut C) -> Result<bool, E>;

pub struct Rule<C, O, E> {
    pub name: &'static str,
    pub enabled: bool,
    pub outcome: O,
    check: Check<C, E>,
}

impl<C, O, E> Rule<C, O, E> {
    pub fn new(name: &'static str, outcome: O, check: Check<C, E>) -> Self {
        Self {
            name,
            enabled: true,
            outcome,
            check,
        }
    }

    /// Builder: sets whether the rule takes part in evaluation
    pub fn enabled_if(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Ordered rules with an outcome used when none matches.
pub struct RuleChain<C, O, E> {
    rules: Vec<Rule<C, O, E>>,
    fallback: O,
}

impl<C, O, E> RuleChain<C, O, E> {
    pub fn new(fallback: O) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Builder: appends a rule after the existing ones
    pub fn rule(mut self, rule: Rule<C, O, E>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Outcome of the first enabled rule whose predicate holds.
    pub fn evaluate(&self, ctx: &mut C) -> Result<&O, E> {
        Ok(self
            .matching(ctx)?
            .map(|rule| &rule.outcome)
            .unwrap_or(&self.fallback))
    }

    /// The first enabled rule whose predicate holds, if any.
    pub fn matching(&self, ctx: &mut C) -> Result<Option<&Rule<C, O, E>>, E> {
        for rule in self.rules.iter().filter(|r| r.enabled) {
            if (rule.check)(ctx)? {
                return Ok(Some(rule));
            }
        }
        Ok(None)
    }

    /// Names of the enabled rules in evaluation order.
    pub fn enabled_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().filter(|r| r.enabled).map(|r| r.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Probe {
        value: i32,
        evaluated: Vec<&'static str>,
    }

    fn chain(second_enabled: bool) -> RuleChain<Probe, char, ()> {
        RuleChain::new('z')
            .rule(Rule::new("big", 'a', |p: &mut Probe| {
                p.evaluated.push("big");
                Ok(p.value > 10)
            }))
            .rule(
                Rule::new("positive", 'b', |p: &mut Probe| {
                    p.evaluated.push("positive");
                    Ok(p.value > 0)
                })
                .enabled_if(second_enabled),
            )
            .rule(Rule::new("even", 'c', |p: &mut Probe| {
                p.evaluated.push("even");
                Ok(p.value % 2 == 0)
            }))
    }

    #[test]
    fn test_first_match_wins() {
        let chain = chain(true);
        let mut probe = Probe {
            value: 12,
            ..Probe::default()
        };
        assert_eq!(chain.evaluate(&mut probe), Ok(&'a'));
        assert_eq!(probe.evaluated, vec!["big"]);

        let mut probe = Probe {
            value: 4,
            ..Probe::default()
        };
        assert_eq!(chain.evaluate(&mut probe), Ok(&'b'));
        assert_eq!(probe.evaluated, vec!["big", "positive"]);
    }

    #[test]
    fn test_disabled_rule_is_not_evaluated() {
        let chain = chain(false);
        let mut probe = Probe {
            value: 4,
            ..Probe::default()
        };
        assert_eq!(chain.evaluate(&mut probe), Ok(&'c'));
        assert_eq!(probe.evaluated, vec!["big", "even"]);
        assert_eq!(chain.enabled_names().collect::<Vec<_>>(), vec!["big", "even"]);
    }

    #[test]
    fn test_fallback() {
        let chain = chain(true);
        let mut probe = Probe {
            value: -3,
            ..Probe::default()
        };
        assert_eq!(chain.evaluate(&mut probe), Ok(&'z'));
        assert_eq!(probe.evaluated.len(), 3);
    }

    #[test]
    fn test_errors_propagate() {
        let chain: RuleChain<Probe, char, &str> = RuleChain::new('z')
            .rule(Rule::new("fails", 'a', |_: &mut Probe| Err("boom")))
            .rule(Rule::new("never", 'b', |_: &mut Probe| Ok(true)));
        assert_eq!(chain.evaluate(&mut Probe::default()), Err("boom"));
    }
}
