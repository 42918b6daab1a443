//! Score card builder shared by all scorers.

use crate::types::ConditionCheck;

/// A scoring rule and the points it contributes when met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub id: &'static str,
    pub label: &'static str,
    pub points: u8,
}

impl Rule {
    pub const fn new(id: &'static str, label: &'static str, points: u8) -> Self {
        Self { id, label, points }
    }
}

/// Consuming builder: every evaluated rule is recorded, met or not, and its
/// points are added to the total only when met.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreCard {
    conditions: Vec<ConditionCheck>,
    points: u32,
    budget: u32,
}

impl ScoreCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(mut self, rule: Rule, met: bool, value: Option<String>) -> Self {
        self.budget += u32::from(rule.points);
        if met {
            self.points += u32::from(rule.points);
        }
        self.conditions.push(ConditionCheck {
            id: rule.id.to_string(),
            label: rule.label.to_string(),
            met,
            value,
        });
        self
    }

    /// Total points, clamped to 100.
    pub fn score(&self) -> u8 {
        self.points.min(100) as u8
    }

    /// Sum of all evaluated rules' points, met or not.
    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn conditions(&self) -> &[ConditionCheck] {
        &self.conditions
    }

    pub fn into_parts(self) -> (u8, Vec<ConditionCheck>) {
        let score = self.score();
        (score, self.conditions)
    }
}

/// Format an optional number for a condition value.
pub fn show(value: Option<f64>, decimals: usize) -> Option<String> {
    Some(match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "n/a".to_string(),
    })
}
