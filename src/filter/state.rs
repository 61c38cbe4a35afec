//! Typed faceted filter state.
//!
//! A `FilterState` maps each dimension to the set of values the user picked.
//! It only changes through `toggle`, one value at a time. A dimension whose
//! set becomes empty is dropped, so "absent" and "empty" are the same state
//! and compare equal.

use crate::catalog::{Category, Grade, ParseError, SkillCode, Stage, Subject};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// One axis of filtering. Dimensions combine by logical AND.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FilterDimension {
    Stage,
    Grade,
    Subject,
    Category,
    CurricularSkill,
}

impl FilterDimension {
    pub const ALL: &'static [FilterDimension] = &[
        FilterDimension::Stage,
        FilterDimension::Grade,
        FilterDimension::Subject,
        FilterDimension::Category,
        FilterDimension::CurricularSkill,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterDimension::Stage => "stage",
            FilterDimension::Grade => "grade",
            FilterDimension::Subject => "subject",
            FilterDimension::Category => "category",
            FilterDimension::CurricularSkill => "curricularSkill",
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterDimension {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "stage" => Ok(FilterDimension::Stage),
            "grade" => Ok(FilterDimension::Grade),
            "subject" => Ok(FilterDimension::Subject),
            "category" => Ok(FilterDimension::Category),
            "curricularSkill" | "skill" => Ok(FilterDimension::CurricularSkill),
            other => Err(ParseError::UnknownDimension(other.to_string())),
        }
    }
}

/// A selectable value, tagged with the dimension it belongs to.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FilterValue {
    Stage(Stage),
    Grade(Grade),
    Subject(Subject),
    Category(Category),
    Skill(SkillCode),
}

impl FilterValue {
    pub fn dimension(&self) -> FilterDimension {
        match self {
            FilterValue::Stage(_) => FilterDimension::Stage,
            FilterValue::Grade(_) => FilterDimension::Grade,
            FilterValue::Subject(_) => FilterDimension::Subject,
            FilterValue::Category(_) => FilterDimension::Category,
            FilterValue::Skill(_) => FilterDimension::CurricularSkill,
        }
    }

    /// Parse a raw label into the closed enumeration of `dimension`.
    ///
    /// Skill codes are opaque: any non-empty code is accepted.
    pub fn parse(dimension: FilterDimension, raw: &str) -> Result<Self, ParseError> {
        Ok(match dimension {
            FilterDimension::Stage => FilterValue::Stage(Stage::from_label(raw)?),
            FilterDimension::Grade => FilterValue::Grade(Grade::from_label(raw)?),
            FilterDimension::Subject => FilterValue::Subject(Subject::from_label(raw)?),
            FilterDimension::Category => FilterValue::Category(Category::from_label(raw)?),
            FilterDimension::CurricularSkill => FilterValue::Skill(SkillCode::parse(raw)?),
        })
    }

    pub fn label(&self) -> &str {
        match self {
            FilterValue::Stage(stage) => stage.as_str(),
            FilterValue::Grade(grade) => grade.as_str(),
            FilterValue::Subject(subject) => subject.as_str(),
            FilterValue::Category(category) => category.as_str(),
            FilterValue::Skill(code) => code.as_str(),
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.dimension(), self.label())
    }
}

impl From<Stage> for FilterValue {
    fn from(value: Stage) -> Self {
        FilterValue::Stage(value)
    }
}

impl From<Grade> for FilterValue {
    fn from(value: Grade) -> Self {
        FilterValue::Grade(value)
    }
}

impl From<Subject> for FilterValue {
    fn from(value: Subject) -> Self {
        FilterValue::Subject(value)
    }
}

impl From<Category> for FilterValue {
    fn from(value: Category) -> Self {
        FilterValue::Category(value)
    }
}

impl From<SkillCode> for FilterValue {
    fn from(value: SkillCode) -> Self {
        FilterValue::Skill(value)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct FilterState {
    selected: BTreeMap<FilterDimension, BTreeSet<FilterValue>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `value` if it is not selected, deselect it otherwise.
    ///
    /// Returns whether the value is selected afterwards.
    pub fn toggle(&mut self, value: impl Into<FilterValue>) -> bool {
        let value = value.into();
        let dimension = value.dimension();
        let set = self.selected.entry(dimension).or_default();
        let now_selected = if set.remove(&value) {
            false
        } else {
            set.insert(value);
            true
        };
        if set.is_empty() {
            self.selected.remove(&dimension);
        }
        now_selected
    }

    /// Pure form of `toggle`.
    pub fn toggled(&self, value: impl Into<FilterValue>) -> Self {
        let mut next = self.clone();
        next.toggle(value);
        next
    }

    /// Parse `dimension`/`raw` at the boundary and toggle the result.
    pub fn toggle_raw(&mut self, dimension: &str, raw: &str) -> Result<bool, ParseError> {
        let dimension: FilterDimension = dimension.parse()?;
        let value = FilterValue::parse(dimension, raw)?;
        Ok(self.toggle(value))
    }

    pub fn is_selected(&self, value: &FilterValue) -> bool {
        self.selected
            .get(&value.dimension())
            .is_some_and(|set| set.contains(value))
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// True when no dimension constrains the catalog.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected values of one dimension, in stable order.
    pub fn selected(&self, dimension: FilterDimension) -> impl Iterator<Item = &FilterValue> {
        self.selected.get(&dimension).into_iter().flatten()
    }

    /// Dimensions that currently carry at least one value.
    pub fn active_dimensions(&self) -> impl Iterator<Item = FilterDimension> + '_ {
        self.selected.keys().copied()
    }

    pub(crate) fn constraints(
        &self,
    ) -> impl Iterator<Item = (FilterDimension, &BTreeSet<FilterValue>)> {
        self.selected.iter().map(|(dimension, set)| (*dimension, set))
    }
}

impl fmt::Display for FilterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{}");
        }
        let parts: Vec<String> = self
            .selected
            .iter()
            .map(|(dimension, set)| {
                let labels: Vec<&str> = set.iter().map(FilterValue::label).collect();
                format!("{dimension}:[{}]", labels.join(", "))
            })
            .collect();
        write!(f, "{{{}}}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut state = FilterState::new();
        assert!(state.toggle(Stage::LowerSecondary));
        assert!(state.is_selected(&FilterValue::Stage(Stage::LowerSecondary)));
        assert!(!state.toggle(Stage::LowerSecondary));
        assert!(!state.is_selected(&FilterValue::Stage(Stage::LowerSecondary)));
        assert!(state.is_empty());
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let base = FilterState::new()
            .toggled(Subject::Mathematics)
            .toggled(Grade::Eighth);
        let values: Vec<FilterValue> = vec![
            Stage::UpperSecondary.into(),
            Grade::Eighth.into(),
            Subject::Arts.into(),
            Category::Sensors.into(),
            SkillCode("EF08CI02".into()).into(),
        ];
        for value in values {
            let twice = base.toggled(value.clone()).toggled(value.clone());
            assert_eq!(twice, base, "double toggle of {value} changed the state");
        }
        assert_eq!(FilterState::new().toggled(Grade::Sixth).toggled(Grade::Sixth), FilterState::new());
    }

    #[test]
    fn dimensions_parse_closed_set() {
        assert_eq!("stage".parse::<FilterDimension>(), Ok(FilterDimension::Stage));
        assert_eq!("skill".parse::<FilterDimension>(), Ok(FilterDimension::CurricularSkill));
        assert_eq!("curricularSkill".parse::<FilterDimension>(), Ok(FilterDimension::CurricularSkill));
        assert_eq!(
            "serie".parse::<FilterDimension>(),
            Err(ParseError::UnknownDimension("serie".into()))
        );
        for dimension in FilterDimension::ALL {
            assert_eq!(dimension.as_str().parse::<FilterDimension>(), Ok(*dimension));
        }
    }

    #[test]
    fn toggle_raw_rejects_values_outside_the_dimension() {
        let mut state = FilterState::new();
        assert_eq!(state.toggle_raw("stage", "EF2"), Ok(true));
        assert!(matches!(
            state.toggle_raw("stage", "8º"),
            Err(ParseError::UnknownValue { kind: "stage", .. })
        ));
        assert!(matches!(
            state.toggle_raw("grade", "EF2"),
            Err(ParseError::UnknownValue { kind: "grade", .. })
        ));
        assert_eq!(state.toggle_raw("skill", " "), Err(ParseError::EmptySkillCode));
        assert_eq!(
            state.toggle_raw("skill", "EF08CI02 "),
            Err(ParseError::SkillCodeWhitespace("EF08CI02 ".into()))
        );
        assert_eq!(state.toggle_raw("curricularSkill", "XYZ"), Ok(true));
        assert_eq!(state.active_dimensions().count(), 2);
    }

    #[test]
    fn clear_and_display() {
        let mut state = FilterState::new();
        state.toggle(Category::AiEthics);
        state.toggle(Category::Sensors);
        state.toggle(Stage::LowerSecondary);
        assert_eq!(state.to_string(), "{stage:[EF2] category:[Sensores, IA & Ética]}");
        let labels: Vec<&str> = state
            .selected(FilterDimension::Category)
            .map(FilterValue::label)
            .collect();
        assert_eq!(labels, vec!["Sensores", "IA & Ética"]);
        assert_eq!(state.selected(FilterDimension::Grade).count(), 0);
        state.clear();
        assert!(state.is_empty());
        assert_eq!(state.to_string(), "{}");
    }
}
