//! Comparison and combination operators usable in WHERE clauses.

use std::fmt;

/// An operator as it appears in a rendered statement.
///
/// Symbol operators render as punctuation (`=`, `!=`, `<=`); phrase
/// operators render as bare keywords (`AND`, `CONTAINS`, `INSIDE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    // Symbol operators
    Exact,
    NotEqual,
    AllEqual,
    AnyEqual,
    Equal,
    NotLike,
    AllLike,
    AnyLike,
    Like,
    LessThanOrEqual,
    LessThan,
    MoreThanOrEqual,
    MoreThan,
    Add,
    Sub,
    Mul,
    Div,

    // Phrase operators
    And,
    Or,
    ContainAll,
    ContainAny,
    ContainNone,
    NotContain,
    Contain,
    AllInside,
    AnyInside,
    NoneInside,
    NotInside,
    Inside,
    Outside,
    Intersects,
}

impl Operator {
    /// The exact text this operator contributes to a statement.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Exact => "==",
            Operator::NotEqual => "!=",
            Operator::AllEqual => "*=",
            Operator::AnyEqual => "?=",
            Operator::Equal => "=",
            Operator::NotLike => "!~",
            Operator::AllLike => "*~",
            Operator::AnyLike => "?~",
            Operator::Like => "~",
            Operator::LessThanOrEqual => "<=",
            Operator::LessThan => "<",
            Operator::MoreThanOrEqual => ">=",
            Operator::MoreThan => ">",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::ContainAll => "CONTAINSALL",
            Operator::ContainAny => "CONTAINSANY",
            Operator::ContainNone => "CONTAINSNONE",
            Operator::NotContain => "CONTAINSNOT",
            Operator::Contain => "CONTAINS",
            Operator::AllInside => "ALLINSIDE",
            Operator::AnyInside => "ANYINSIDE",
            Operator::NoneInside => "NONEINSIDE",
            Operator::NotInside => "NOTINSIDE",
            Operator::Inside => "INSIDE",
            Operator::Outside => "OUTSIDE",
            Operator::Intersects => "INTERSECTS",
        }
    }

    /// True for keyword operators, false for punctuation.
    pub fn is_phrase(&self) -> bool {
        matches!(
            self,
            Operator::And
                | Operator::Or
                | Operator::ContainAll
                | Operator::ContainAny
                | Operator::ContainNone
                | Operator::NotContain
                | Operator::Contain
                | Operator::AllInside
                | Operator::AnyInside
                | Operator::NoneInside
                | Operator::NotInside
                | Operator::Inside
                | Operator::Outside
                | Operator::Intersects
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
