//! Propositional and epistemic formulas.
//!
//! Formulas are immutable trees. Goals and preconditions are wrapped in an
//! `Arc` and shared by every world and state that evaluates them.

use std::collections::BTreeSet;
use std::fmt;

use crate::agent::Agent;
use crate::error::ModelError;
use crate::model::{State, WorldArena, WorldId};
use crate::predicate::Predicate;

/// A formula of epistemic logic with individual knowledge operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formula {
    /// Always true.
    Top,
    /// Always false.
    Bottom,
    /// A ground predicate.
    Atom(Predicate),
    /// Negation.
    Not(Box<Formula>),
    /// Binary conjunction.
    And(Box<Formula>, Box<Formula>),
    /// Binary disjunction.
    Or(Box<Formula>, Box<Formula>),
    /// Material implication.
    Implies(Box<Formula>, Box<Formula>),
    /// Conjunction over a list; empty is true.
    Conjunction(Vec<Formula>),
    /// Disjunction over a list; empty is false.
    Disjunction(Vec<Formula>),
    /// The agent knows the formula.
    Knows(Agent, Box<Formula>),
}

impl Formula {
    /// `p`
    #[must_use]
    pub fn atom(predicate: &Predicate) -> Self {
        Self::Atom(predicate.clone())
    }

    /// `¬f`
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(f: Self) -> Self {
        Self::Not(Box::new(f))
    }

    /// `a ∧ b`
    #[must_use]
    pub fn and(a: Self, b: Self) -> Self {
        Self::And(Box::new(a), Box::new(b))
    }

    /// `a ∨ b`
    #[must_use]
    pub fn or(a: Self, b: Self) -> Self {
        Self::Or(Box::new(a), Box::new(b))
    }

    /// `a → b`
    #[must_use]
    pub fn implies(a: Self, b: Self) -> Self {
        Self::Implies(Box::new(a), Box::new(b))
    }

    /// Conjunction of all operands.
    #[must_use]
    pub fn all(operands: impl IntoIterator<Item = Self>) -> Self {
        Self::Conjunction(operands.into_iter().collect())
    }

    /// Disjunction of all operands.
    #[must_use]
    pub fn any(operands: impl IntoIterator<Item = Self>) -> Self {
        Self::Disjunction(operands.into_iter().collect())
    }

    /// `K_agent f`
    #[must_use]
    pub fn knows(agent: &Agent, f: Self) -> Self {
        Self::Knows(agent.clone(), Box::new(f))
    }

    /// Truth of this formula at `world` of `state`.
    ///
    /// `Knows(a, f)` holds iff `f` holds at every world `a` cannot
    /// distinguish from `world`, including `world` itself.
    pub fn evaluate(&self, arena: &WorldArena, state: &State, world: WorldId) -> Result<bool, ModelError> {
        Ok(match self {
            Self::Top => true,
            Self::Bottom => false,
            Self::Atom(p) => arena[world].valuation().holds(p),
            Self::Not(f) => !f.evaluate(arena, state, world)?,
            Self::And(a, b) => a.evaluate(arena, state, world)? && b.evaluate(arena, state, world)?,
            Self::Or(a, b) => a.evaluate(arena, state, world)? || b.evaluate(arena, state, world)?,
            Self::Implies(a, b) => !a.evaluate(arena, state, world)? || b.evaluate(arena, state, world)?,
            Self::Conjunction(fs) => {
                for f in fs {
                    if !f.evaluate(arena, state, world)? {
                        return Ok(false);
                    }
                }
                true
            }
            Self::Disjunction(fs) => {
                for f in fs {
                    if f.evaluate(arena, state, world)? {
                        return Ok(true);
                    }
                }
                false
            }
            Self::Knows(agent, f) => {
                for other in state.relation().accessible(agent, world)? {
                    if !f.evaluate(arena, state, other)? {
                        return Ok(false);
                    }
                }
                true
            }
        })
    }

    /// Agents mentioned by knowledge operators.
    #[must_use]
    pub fn agents(&self) -> BTreeSet<Agent> {
        let mut out = BTreeSet::new();
        self.collect_agents(&mut out);
        out
    }

    fn collect_agents(&self, out: &mut BTreeSet<Agent>) {
        match self {
            Self::Top | Self::Bottom | Self::Atom(_) => {}
            Self::Not(f) => f.collect_agents(out),
            Self::And(a, b) | Self::Or(a, b) | Self::Implies(a, b) => {
                a.collect_agents(out);
                b.collect_agents(out);
            }
            Self::Conjunction(fs) | Self::Disjunction(fs) => {
                for f in fs {
                    f.collect_agents(out);
                }
            }
            Self::Knows(agent, f) => {
                out.insert(agent.clone());
                f.collect_agents(out);
            }
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, operands: &[Formula], op: &str, empty: &str) -> fmt::Result {
    if operands.is_empty() {
        return write!(f, "{empty}");
    }
    write!(f, "(")?;
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, " {op} ")?;
        }
        write!(f, "{operand}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "true"),
            Self::Bottom => write!(f, "false"),
            Self::Atom(p) => write!(f, "{p}"),
            Self::Not(inner) => write!(f, "!{inner}"),
            Self::And(a, b) => write!(f, "({a} & {b})"),
            Self::Or(a, b) => write!(f, "({a} | {b})"),
            Self::Implies(a, b) => write!(f, "({a} -> {b})"),
            Self::Conjunction(fs) => join(f, fs, "&", "true"),
            Self::Disjunction(fs) => join(f, fs, "|", "false"),
            Self::Knows(agent, inner) => write!(f, "K[{agent}]{inner}"),
        }
    }
}
