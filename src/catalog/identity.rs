use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rejection raised when a raw label does not belong to a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },
    #[error(
        "unknown filter dimension '{0}' (expected stage|grade|subject|category|curricularSkill)"
    )]
    UnknownDimension(String),
    #[error("curricular skill code must not be empty")]
    EmptySkillCode,
    #[error("curricular skill code '{0}' contains whitespace")]
    SkillCodeWhitespace(String),
}

/// Stable identifier for a catalog entry.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub String);

/// Stable identifier for a learning track.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub String);

/// Opaque curricular skill code (e.g. `EF08CI02`).
///
/// Codes reference an external skill registry. The catalog never checks them
/// against that registry; `grade_hint`/`stage_hint` only decode the prefix
/// convention used by the national curriculum. Deserialization goes through
/// `parse`, so catalog files and filter values accept the same codes.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(transparent)]
pub struct SkillCode(pub String);

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SkillCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SkillCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(serde::de::Error::custom)
    }
}

impl SkillCode {
    /// Accept a code verbatim. Blank codes and codes containing whitespace
    /// are rejected rather than normalized.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        if raw.trim().is_empty() {
            return Err(ParseError::EmptySkillCode);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(ParseError::SkillCodeWhitespace(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stage encoded in the code prefix (`EF` or `EM`), if any.
    pub fn stage_hint(&self) -> Option<Stage> {
        if self.0.starts_with("EF") {
            Some(Stage::LowerSecondary)
        } else if self.0.starts_with("EM") {
            Some(Stage::UpperSecondary)
        } else {
            None
        }
    }

    /// Grade encoded in lower-secondary codes (`EF08…` is 8º).
    ///
    /// Upper-secondary codes span the whole stage (`EM13…`) and yield `None`.
    pub fn grade_hint(&self) -> Option<Grade> {
        match self.0.get(..4)? {
            "EF06" => Some(Grade::Sixth),
            "EF07" => Some(Grade::Seventh),
            "EF08" => Some(Grade::Eighth),
            "EF09" => Some(Grade::Ninth),
            _ => None,
        }
    }
}

/// Declares a closed enumeration with fixed wire labels.
///
/// Unknown labels are rejected on deserialization instead of being carried
/// through as free strings.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_label(value: &str) -> Result<Self, ParseError> {
                match value {
                    $($label => Ok($name::$variant),)+
                    other => Err(ParseError::UnknownValue {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::from_label(value)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = String::deserialize(deserializer)?;
                Self::from_label(&value).map_err(serde::de::Error::custom)
            }
        }
    };
}

labelled_enum! {
    /// Broad schooling level a content item targets.
    Stage, "stage" {
        LowerSecondary => "EF2",
        UpperSecondary => "EM",
    }
}

labelled_enum! {
    /// Specific school year. Each grade belongs to exactly one stage.
    Grade, "grade" {
        Sixth => "6º",
        Seventh => "7º",
        Eighth => "8º",
        Ninth => "9º",
        FirstUpper => "1º",
        SecondUpper => "2º",
        ThirdUpper => "3º",
    }
}

labelled_enum! {
    Subject, "subject" {
        TechnologyRobotics => "Tecnologia/Robótica",
        Mathematics => "Matemática",
        Science => "Ciências",
        Physics => "Física",
        Chemistry => "Química",
        Biology => "Biologia",
        Geography => "Geografia",
        History => "História",
        Portuguese => "Língua Portuguesa",
        English => "Inglês",
        Arts => "Artes",
        LifeProject => "Projeto de Vida",
    }
}

labelled_enum! {
    /// Organizational tag attached to content.
    Category, "category" {
        BasicElectronics => "Eletrônica Básica",
        Sensors => "Sensores",
        BlockProgramming => "Programação por Blocos",
        AlgorithmsLogic => "Algoritmos & Lógica",
        AiEthics => "IA & Ética",
        DigitalCitizenship => "Cidadania Digital",
        DataSecurity => "Segurança de Dados",
        Interdisciplinary => "Interdisciplinar",
        Assessment => "Avaliação",
        TeacherGuide => "Guia do Professor",
        Simulators => "Simuladores",
    }
}

labelled_enum! {
    ContentType, "content type" {
        Theoretical => "Teórica",
        Practical => "Prática",
        Interdisciplinary => "Interdisciplinar",
        Assessment => "Avaliação",
        TeacherGuide => "Guia do Professor",
    }
}

labelled_enum! {
    Format, "format" {
        Text => "Texto",
        Pdf => "PDF",
        Spreadsheet => "Planilha",
        Slide => "Slide",
        Video => "Vídeo",
        Simulator => "Simulador",
        ExternalLink => "Link Externo",
    }
}

labelled_enum! {
    EstimatedTime, "estimated time" {
        OneClass => "1 aula (40-50 min)",
        TwoClasses => "2 aulas (80-100 min)",
        MoreThanTwoClasses => ">2 aulas",
    }
}

labelled_enum! {
    Visibility, "visibility" {
        Public => "publico",
        Private => "privado",
    }
}

labelled_enum! {
    /// Knowledge area a curricular skill belongs to.
    KnowledgeArea, "knowledge area" {
        Mathematics => "Matemática",
        Languages => "Linguagens",
        NaturalSciences => "Ciências da Natureza",
        HumanSciences => "Ciências Humanas",
    }
}

impl Stage {
    /// Grades permitted for content targeting this stage.
    pub fn grades(&self) -> &'static [Grade] {
        match self {
            Stage::LowerSecondary => &[Grade::Sixth, Grade::Seventh, Grade::Eighth, Grade::Ninth],
            Stage::UpperSecondary => &[Grade::FirstUpper, Grade::SecondUpper, Grade::ThirdUpper],
        }
    }

    pub fn allows(&self, grade: Grade) -> bool {
        grade.stage() == *self
    }

    /// Human-facing name of the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::LowerSecondary => "Ensino Fundamental II",
            Stage::UpperSecondary => "Ensino Médio",
        }
    }
}

impl Grade {
    pub fn stage(&self) -> Stage {
        match self {
            Grade::Sixth | Grade::Seventh | Grade::Eighth | Grade::Ninth => Stage::LowerSecondary,
            Grade::FirstUpper | Grade::SecondUpper | Grade::ThirdUpper => Stage::UpperSecondary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_labels_round_trip_and_reject_unknown() {
        let json = serde_json::to_string(&Stage::LowerSecondary).unwrap();
        assert_eq!(json, "\"EF2\"");
        let back: Stage = serde_json::from_str("\"EM\"").unwrap();
        assert_eq!(back, Stage::UpperSecondary);

        let err = serde_json::from_str::<Stage>("\"EF1\"").unwrap_err();
        assert!(err.to_string().contains("unknown stage 'EF1'"));
    }

    #[test]
    fn every_grade_belongs_to_its_stage_table() {
        for stage in Stage::ALL {
            for grade in stage.grades() {
                assert_eq!(grade.stage(), *stage);
                assert!(stage.allows(*grade));
            }
        }
        let listed: usize = Stage::ALL.iter().map(|s| s.grades().len()).sum();
        assert_eq!(listed, Grade::ALL.len());
        assert!(!Stage::UpperSecondary.allows(Grade::Eighth));
    }

    #[test]
    fn labels_with_punctuation_parse() {
        assert_eq!(Category::from_label("IA & Ética"), Ok(Category::AiEthics));
        assert_eq!(
            "Tecnologia/Robótica".parse::<Subject>(),
            Ok(Subject::TechnologyRobotics)
        );
        assert_eq!(
            EstimatedTime::from_label(">2 aulas"),
            Ok(EstimatedTime::MoreThanTwoClasses)
        );
        assert!(matches!(
            Format::from_label("pdf"),
            Err(ParseError::UnknownValue { kind: "format", .. })
        ));
    }

    #[test]
    fn skill_code_hints_follow_prefix() {
        let lower = SkillCode::parse("EF08CI02").unwrap();
        assert_eq!(lower.as_str(), "EF08CI02");
        assert_eq!(lower.stage_hint(), Some(Stage::LowerSecondary));
        assert_eq!(lower.grade_hint(), Some(Grade::Eighth));

        let upper = SkillCode("EM13CNT101".to_string());
        assert_eq!(upper.stage_hint(), Some(Stage::UpperSecondary));
        assert_eq!(upper.grade_hint(), None);

        let odd = SkillCode("X".to_string());
        assert_eq!(odd.stage_hint(), None);
        assert_eq!(odd.grade_hint(), None);

        assert_eq!(SkillCode::parse("   "), Err(ParseError::EmptySkillCode));
        assert_eq!(
            SkillCode::parse(" EF08CI02"),
            Err(ParseError::SkillCodeWhitespace(" EF08CI02".to_string()))
        );
    }

    #[test]
    fn skill_codes_deserialize_through_parse() {
        let code: SkillCode = serde_json::from_str("\"EM13CNT101\"").unwrap();
        assert_eq!(code.as_str(), "EM13CNT101");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"EM13CNT101\"");

        let padded = serde_json::from_str::<SkillCode>("\"EF08CI02 \"").unwrap_err();
        assert!(padded.to_string().contains("contains whitespace"), "{padded}");
        let blank = serde_json::from_str::<SkillCode>("\"  \"").unwrap_err();
        assert!(blank.to_string().contains("must not be empty"), "{blank}");
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = ContentId("1".to_string());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1\"");
        let parsed: TrackId = serde_json::from_str("\"t1\"").unwrap();
        assert_eq!(parsed, TrackId("t1".to_string()));
    }
}
