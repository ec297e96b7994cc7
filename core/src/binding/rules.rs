use once_cell::sync::Lazy;
use regex::Regex;

/// Class bound to populations created through `sim.addSubpop*`.
pub const SUBPOPULATION_CLASS: &str = "Subpopulation";

/// Class bound to script blocks returned by the `register*` calls.
pub const EVENT_BLOCK_CLASS: &str = "SLiMEidosBlock";

/// What a matching rule binds its first capture to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingTarget {
    /// The class named by the second capture (`x = new Foo`).
    Captured,
    /// A fixed class name.
    Fixed(&'static str),
}

/// One line pattern of the scanner. Capture 1 is always the bound identifier.
#[derive(Debug)]
pub struct BindingRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub target: BindingTarget,
}

impl BindingRule {
    fn new(name: &'static str, pattern: &str, target: BindingTarget) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("invalid binding rule {name}: {e}")),
            target,
        }
    }

    /// Apply the rule to one line, yielding `(identifier, class)`.
    pub fn apply<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = self.pattern.captures(line)?;
        let ident = caps.get(1)?.as_str();
        let class = match self.target {
            BindingTarget::Captured => caps.get(2)?.as_str(),
            BindingTarget::Fixed(class) => class,
        };
        Some((ident, class))
    }
}

const COMMUNITY_REGISTRATIONS: &[&str] = &[
    "registerEarlyEvent",
    "registerFirstEvent",
    "registerInteractionCallback",
    "registerLateEvent",
];

const SPECIES_REGISTRATIONS: &[&str] = &[
    "registerFitnessEffectCallback",
    "registerMateChoiceCallback",
    "registerModifyChildCallback",
    "registerMutationCallback",
    "registerMutationEffectCallback",
    "registerRecombinationCallback",
    "registerReproductionCallback",
    "registerSurvivalCallback",
];

/// Scanner rules in priority order; the first rule matching a line wins.
pub static BINDING_RULES: Lazy<Vec<BindingRule>> = Lazy::new(|| {
    let mut rules = vec![
        BindingRule::new(
            "new",
            r"([A-Za-z0-9_]+)\s*=\s*new\s+([A-Za-z0-9_]+)",
            BindingTarget::Captured,
        ),
        BindingRule::new(
            "addSubpop",
            r#"sim\.addSubpop\("([A-Za-z0-9_]+)",\s*\d+(?:,\s*[^)]*)?\)"#,
            BindingTarget::Fixed(SUBPOPULATION_CLASS),
        ),
        BindingRule::new(
            "addSubpopSplit",
            r#"sim\.addSubpopSplit\("([A-Za-z0-9_]+)",\s*\d+(?:,\s*[^)]*)?\)"#,
            BindingTarget::Fixed(SUBPOPULATION_CLASS),
        ),
    ];

    let registrations = COMMUNITY_REGISTRATIONS
        .iter()
        .map(|call| ("community", *call))
        .chain(SPECIES_REGISTRATIONS.iter().map(|call| ("species", *call)));
    for (receiver, call) in registrations {
        rules.push(BindingRule::new(
            call,
            &format!(r#"{receiver}\.{call}\("([A-Za-z0-9_]+)",\s*[^)]*\)"#),
            BindingTarget::Fixed(EVENT_BLOCK_CLASS),
        ));
    }
    rules
});

/// First rule binding for `line`, if any.
pub fn match_line(line: &str) -> Option<(&str, &str)> {
    BINDING_RULES.iter().find_map(|rule| rule.apply(line))
}
